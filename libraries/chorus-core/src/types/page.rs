/// Pagination parameters for the track list projector
use serde::{Deserialize, Serialize};

/// Default page size when the caller does not specify one
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest allowed page size
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validated pagination window (1-based page number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    page: u32,
    page_size: u32,
}

impl Page {
    /// Build a page window. Returns `None` unless `page >= 1` and
    /// `1 <= page_size <= 100`.
    pub fn new(page: u32, page_size: u32) -> Option<Self> {
        if page == 0 || page_size == 0 || page_size > MAX_PAGE_SIZE {
            return None;
        }
        Some(Self { page, page_size })
    }

    pub fn number(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.page_size
    }

    /// Row offset of the first item on this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
