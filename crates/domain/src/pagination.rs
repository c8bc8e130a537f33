use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortOrder::Asc)
    }
}

/// Page geometry and optional sort for a list request. `page` is 1-based.
/// Absent sort fields mean the default ordering (most recently created
/// first).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaginationParams {
    pub page: u32,
    pub page_size: u32,
    pub sort_field: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl PaginationParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            sort_field: None,
            sort_order: None,
        }
    }

    pub fn sorted_by(page: u32, page_size: u32, field: &str, order: SortOrder) -> Self {
        Self {
            page,
            page_size,
            sort_field: Some(field.to_string()),
            sort_order: Some(order),
        }
    }

    /// Inclusive row range for this page:
    /// `[(page-1)*page_size, (page-1)*page_size + page_size - 1]`.
    pub fn range(&self) -> (u64, u64) {
        let page = self.page.max(1) as u64;
        let page_size = self.page_size.max(1) as u64;
        let from = (page - 1) * page_size;
        let to = from + page_size - 1;
        (from, to)
    }
}

/// One page of results together with the total count and page geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, params: &PaginationParams) -> Self {
        Self {
            data,
            total,
            page: params.page,
            page_size: params.page_size,
            total_pages: total.div_ceil(params.page_size.max(1) as u64),
        }
    }
}
