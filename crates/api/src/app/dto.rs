//! Query-string DTOs.

use serde::Deserialize;

use dscommerce_core::{DomainError, PageRequest, Sort};

/// `GET /products?name=&page=&size=&sort=`
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub name: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

impl ListProductsQuery {
    pub fn name_filter(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn page_request(&self, default_size: u32) -> Result<PageRequest, DomainError> {
        let request = PageRequest::new(self.page, self.size, default_size);
        match self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Ok(request.with_sort(raw.parse::<Sort>()?)),
            None => Ok(request),
        }
    }
}
