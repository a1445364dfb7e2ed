//! Pagination helpers

/// Rows per page rendered by the console (server-determined page size)
pub const DEFAULT_PAGE_SIZE: u64 = 5;

/// Number of pages needed for `total` records at `page_size` per page
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}
