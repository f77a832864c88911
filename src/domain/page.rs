//! Page addressing for listings.
//!
//! Callers count pages from 1; the store is queried with a 0-based index.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("pageIndex and pageSize must be at least 1 (got pageIndex={page_index}, pageSize={page_size})")]
pub struct InvalidPageRequest {
    pub page_index: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    index: u32,
    size: u32,
}

impl PageRequest {
    /// Builds a request from a 1-based `page_index`.
    pub fn of(page_index: u32, page_size: u32) -> Result<Self, InvalidPageRequest> {
        if page_index == 0 || page_size == 0 {
            return Err(InvalidPageRequest { page_index, page_size });
        }
        Ok(Self { index: page_index - 1, size: page_size })
    }

    /// 0-based index.
    pub fn index(&self) -> u32 { self.index }

    pub fn size(&self) -> u32 { self.size }

    pub fn offset(&self) -> u64 { u64::from(self.index) * u64::from(self.size) }

    pub fn limit(&self) -> u32 { self.size }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_index: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(u64::from(request.size()));
        let index = u64::from(request.index());
        Self {
            content,
            page_index: request.index() + 1,
            page_size: request.size(),
            total_elements,
            total_pages,
            first: index == 0,
            last: index + 1 >= total_pages,
        }
    }
}
