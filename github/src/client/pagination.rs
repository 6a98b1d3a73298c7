use serde::Serialize;

/// Query parameters sizing the first page of a listing endpoint
#[derive(Debug, Default, Serialize)]
pub struct PaginationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<usize>,
}
