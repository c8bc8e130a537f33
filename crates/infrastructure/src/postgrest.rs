//! Remote store boundary: the queryable todos table.
//!
//! `TodoStore` abstracts the handful of row operations the access
//! service needs; `PostgrestStore` implements it against Supabase's
//! REST endpoint. Tests substitute an in-memory store.

use domain::{TodoError, TodoId, UserId};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use shared::Config;
use tracing::{debug, error};

use crate::records::{TodoInsert, TodoPatch, TodoRecord};

/// Sort column and direction for a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub ascending: bool,
}

impl SortSpec {
    pub fn new(column: &str, ascending: bool) -> Self {
        Self {
            column: column.to_string(),
            ascending,
        }
    }
}

/// A scoped list query: inclusive row range plus sort. Built by the
/// access service; the store only executes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub from: u64,
    pub to: u64,
    pub sort: SortSpec,
}

/// Row operations of the remote todos table. Every method scopes a
/// single round trip to the owning user.
pub trait TodoStore {
    /// Rows for the inclusive range, plus the exact count of all rows
    /// owned by `owner` independent of the range.
    fn select_page(
        &self,
        owner: &UserId,
        query: &PageQuery,
    ) -> impl std::future::Future<Output = Result<(Vec<TodoRecord>, u64), TodoError>> + Send;

    /// Single row scoped to `(id, owner)`; zero matching rows is an
    /// error.
    fn select_one(
        &self,
        owner: &UserId,
        id: &TodoId,
    ) -> impl std::future::Future<Output = Result<TodoRecord, TodoError>> + Send;

    /// Inserts one row and returns it as stored (server-assigned id and
    /// timestamps included).
    fn insert(
        &self,
        row: TodoInsert,
    ) -> impl std::future::Future<Output = Result<TodoRecord, TodoError>> + Send;

    /// Applies `patch` to the row scoped to `(id, owner)` and returns
    /// the updated row; zero matching rows is an error.
    fn update(
        &self,
        owner: &UserId,
        id: &TodoId,
        patch: TodoPatch,
    ) -> impl std::future::Future<Output = Result<TodoRecord, TodoError>> + Send;

    /// Deletes the row scoped to `(id, owner)`. Zero matching rows
    /// still succeeds.
    fn delete(
        &self,
        owner: &UserId,
        id: &TodoId,
    ) -> impl std::future::Future<Output = Result<(), TodoError>> + Send;
}

/// `TodoStore` over a PostgREST endpoint (`{url}/rest/v1/{table}`).
#[derive(Clone)]
pub struct PostgrestStore {
    client: reqwest::Client,
    table_url: String,
    anon_key: String,
}

impl PostgrestStore {
    pub fn new(config: &Config) -> Self {
        let base = config.supabase_url.trim_end_matches('/');
        Self {
            client: reqwest::Client::new(),
            table_url: format!("{}/rest/v1/{}", base, config.todos_table),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.anon_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.anon_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers
    }

    /// Headers asking PostgREST for exactly one object instead of an
    /// array; zero matching rows then comes back as an error status.
    fn single_object_headers(&self) -> HeaderMap {
        let mut headers = self.auth_headers();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.pgrst.object+json"),
        );
        headers
    }

    async fn read_failure(id: &TodoId, response: reqwest::Response) -> TodoError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND || status == StatusCode::NOT_ACCEPTABLE {
            // PostgREST reports zero rows for a single-object request
            // with one of these; "not found" and "not owned" are
            // indistinguishable here.
            return TodoError::NotFound(id.to_string());
        }
        error!("Remote store rejected request: status={status}, body={body}");
        TodoError::Remote(format!("status {status}: {body}"))
    }
}

fn order_param(sort: &SortSpec) -> String {
    let direction = if sort.ascending { "asc" } else { "desc" };
    format!("{}.{}", sort.column, direction)
}

fn owner_filter(owner: &UserId) -> String {
    format!("eq.{}", owner.as_str())
}

fn id_filter(id: &TodoId) -> String {
    format!("eq.{}", id.as_str())
}

/// Extracts the exact total from a `Content-Range` value such as
/// `items 0-9/25` or `*/0`.
fn parse_content_range_total(value: &str) -> Result<u64, TodoError> {
    value
        .rsplit('/')
        .next()
        .and_then(|total| total.parse::<u64>().ok())
        .ok_or_else(|| TodoError::Remote(format!("unparseable Content-Range: {value}")))
}

impl TodoStore for PostgrestStore {
    async fn select_page(
        &self,
        owner: &UserId,
        query: &PageQuery,
    ) -> Result<(Vec<TodoRecord>, u64), TodoError> {
        debug!(
            "Listing todos: owner={}, range={}-{}, order={}",
            owner,
            query.from,
            query.to,
            order_param(&query.sort)
        );

        let response = self
            .client
            .get(&self.table_url)
            .headers(self.auth_headers())
            .header("Range-Unit", "items")
            .header("Range", format!("{}-{}", query.from, query.to))
            .header("Prefer", "count=exact")
            .query(&[
                ("select", "*".to_string()),
                ("user_id", owner_filter(owner)),
                ("order", order_param(&query.sort)),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Error listing todos: {e}");
                TodoError::Remote(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Remote store rejected list: status={status}, body={body}");
            return Err(TodoError::Remote(format!("status {status}: {body}")));
        }

        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .map(parse_content_range_total)
            .transpose()?
            .unwrap_or(0);

        let rows = response.json::<Vec<TodoRecord>>().await.map_err(|e| {
            error!("Error decoding todo page: {e}");
            TodoError::Remote(e.to_string())
        })?;

        Ok((rows, total))
    }

    async fn select_one(&self, owner: &UserId, id: &TodoId) -> Result<TodoRecord, TodoError> {
        let response = self
            .client
            .get(&self.table_url)
            .headers(self.single_object_headers())
            .query(&[
                ("select", "*".to_string()),
                ("id", id_filter(id)),
                ("user_id", owner_filter(owner)),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Error fetching todo {id}: {e}");
                TodoError::Remote(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(Self::read_failure(id, response).await);
        }

        response.json::<TodoRecord>().await.map_err(|e| {
            error!("Error decoding todo {id}: {e}");
            TodoError::Remote(e.to_string())
        })
    }

    async fn insert(&self, row: TodoInsert) -> Result<TodoRecord, TodoError> {
        let response = self
            .client
            .post(&self.table_url)
            .headers(self.single_object_headers())
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await
            .map_err(|e| {
                error!("Error inserting todo: {e}");
                TodoError::Remote(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Remote store rejected insert: status={status}, body={body}");
            return Err(TodoError::Remote(format!("status {status}: {body}")));
        }

        response.json::<TodoRecord>().await.map_err(|e| {
            error!("Error decoding inserted todo: {e}");
            TodoError::Remote(e.to_string())
        })
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &TodoId,
        patch: TodoPatch,
    ) -> Result<TodoRecord, TodoError> {
        let response = self
            .client
            .patch(&self.table_url)
            .headers(self.single_object_headers())
            .header("Prefer", "return=representation")
            .query(&[
                ("id", id_filter(id)),
                ("user_id", owner_filter(owner)),
            ])
            .json(&patch)
            .send()
            .await
            .map_err(|e| {
                error!("Error updating todo {id}: {e}");
                TodoError::Remote(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(Self::read_failure(id, response).await);
        }

        response.json::<TodoRecord>().await.map_err(|e| {
            error!("Error decoding updated todo {id}: {e}");
            TodoError::Remote(e.to_string())
        })
    }

    async fn delete(&self, owner: &UserId, id: &TodoId) -> Result<(), TodoError> {
        let response = self
            .client
            .delete(&self.table_url)
            .headers(self.auth_headers())
            .query(&[
                ("id", id_filter(id)),
                ("user_id", owner_filter(owner)),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Error deleting todo {id}: {e}");
                TodoError::Remote(e.to_string())
            })?;

        // Zero matched rows still returns success; deletion is
        // idempotent from the caller's perspective.
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Remote store rejected delete: status={status}, body={body}");
            return Err(TodoError::Remote(format!("status {status}: {body}")));
        }

        Ok(())
    }
}
