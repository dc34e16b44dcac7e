/// Paging query parameters
use serde::Deserialize;
use taskapp_shared::models::page::{PageRequest, DEFAULT_PAGE_SIZE};

use crate::error::ApiError;

/// `?page=&size=` on list endpoints; both optional
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageParams {
    pub fn to_request(&self) -> Result<PageRequest, ApiError> {
        page_request(self.page, self.size)
    }
}

/// Applies defaults and rejects a zero page size
pub fn page_request(page: Option<u32>, size: Option<u32>) -> Result<PageRequest, ApiError> {
    PageRequest::new(page.unwrap_or(0), size.unwrap_or(DEFAULT_PAGE_SIZE))
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageParams::default().to_request().unwrap();
        assert_eq!(request, PageRequest::default());
    }

    #[test]
    fn test_zero_size() {
        let params = PageParams {
            page: Some(1),
            size: Some(0),
        };

        match params.to_request() {
            Err(ApiError::BadRequest(msg)) => {
                assert_eq!(msg, "Page size must not be less than one")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
