//! The todo access service: owner-scoped CRUD and paginated listing
//! over a [`TodoStore`], with the current user resolved from a
//! [`CurrentUser`] accessor.

use domain::{
    AddTodoRequest, PaginatedResponse, PaginationParams, Todo, TodoError, TodoId, UserId,
};
use shared::CurrentUser;
use tracing::{debug, info};

use crate::postgrest::{PageQuery, SortSpec, TodoStore};
use crate::records::{TodoInsert, TodoPatch};

/// Rows come back newest-first when the caller does not ask for a sort.
const DEFAULT_SORT_COLUMN: &str = "created_at";

/// Owner-scoped todo operations. Constructed explicitly with its store
/// client and current-user accessor so both can be substituted with
/// test doubles. Holds no mutable state; independent calls may be in
/// flight concurrently.
#[derive(Clone)]
pub struct TodoRepository<S, C> {
    store: S,
    auth: C,
}

impl<S: TodoStore, C: CurrentUser> TodoRepository<S, C> {
    pub fn new(store: S, auth: C) -> Self {
        Self { store, auth }
    }

    /// Resolves the caller before any remote round trip. No session
    /// means the operation fails without touching the store.
    fn owner(&self) -> Result<UserId, TodoError> {
        self.auth
            .current_user()
            .ok_or(TodoError::AuthenticationRequired)
    }

    /// One page of the caller's todos. Explicit sort field and order
    /// are passed through; otherwise rows are ordered by creation time,
    /// most recent first.
    pub async fn list_page(
        &self,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<Todo>, TodoError> {
        let owner = self.owner()?;

        let (from, to) = params.range();
        let sort = match (&params.sort_field, params.sort_order) {
            (Some(field), Some(order)) => SortSpec::new(field, order.is_ascending()),
            _ => SortSpec::new(DEFAULT_SORT_COLUMN, false),
        };
        let query = PageQuery { from, to, sort };

        debug!(
            "Fetching todo page: owner={}, page={}, page_size={}",
            owner, params.page, params.page_size
        );

        let (rows, total) = self.store.select_page(&owner, &query).await?;
        let todos = rows
            .into_iter()
            .map(Todo::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResponse::new(todos, total, params))
    }

    /// Creates a todo for the caller. The completion flag and owner in
    /// the stored row come from this layer, never from the request.
    pub async fn create(&self, request: AddTodoRequest) -> Result<Todo, TodoError> {
        let owner = self.owner()?;

        info!("Creating todo: owner={}, title={}", owner, request.title);
        let row = self
            .store
            .insert(TodoInsert::from_request(&request, &owner))
            .await?;
        Todo::try_from(row)
    }

    /// Persists only the completion flag (and `updated_at`). Either the
    /// flag is stored or the call fails with the row unchanged; callers
    /// doing optimistic UI updates roll back on the failure.
    pub async fn set_completion(&self, id: &TodoId, is_completed: bool) -> Result<Todo, TodoError> {
        let owner = self.owner()?;

        info!(
            "Updating todo completion: owner={}, id={}, is_completed={}",
            owner, id, is_completed
        );
        let row = self
            .store
            .update(&owner, id, TodoPatch::completion(is_completed))
            .await?;
        Todo::try_from(row)
    }

    /// Deletes the caller's row with this id. Zero matched rows —
    /// nonexistent or foreign-owned — still succeeds; no existence
    /// check distinguishes the two.
    pub async fn remove(&self, id: &TodoId) -> Result<(), TodoError> {
        let owner = self.owner()?;

        info!("Deleting todo: owner={}, id={}", owner, id);
        self.store.delete(&owner, id).await
    }

    /// Fetches the caller's row with this id; zero matching rows is
    /// `NotFound`.
    pub async fn get_by_id(&self, id: &TodoId) -> Result<Todo, TodoError> {
        let owner = self.owner()?;

        debug!("Fetching todo: owner={}, id={}", owner, id);
        let row = self.store.select_one(&owner, id).await?;
        Todo::try_from(row)
    }

    /// Full replace of the editable fields, scoped to `(id, owner)`.
    pub async fn update(&self, todo: &Todo) -> Result<Todo, TodoError> {
        let owner = self.owner()?;

        info!("Updating todo: owner={}, id={}", owner, todo.id);
        let row = self
            .store
            .update(&owner, &todo.id, TodoPatch::from_todo(todo))
            .await?;
        Todo::try_from(row)
    }
}
