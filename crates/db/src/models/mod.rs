//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - Query-parameter structs for filtered listing where applicable

pub mod collection;
pub mod nft;
pub mod transaction;
pub mod user;

use serde::Serialize;

/// One page of a filtered listing.
///
/// `pages` is `ceil(total / limit)` so clients can render pagination controls
/// without a second request.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            items,
            total,
            page,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        let page = Page::<i32>::new(vec![], 25, 1, 12);
        assert_eq!(page.pages, 3);

        let page = Page::<i32>::new(vec![], 24, 1, 12);
        assert_eq!(page.pages, 2);

        let page = Page::<i32>::new(vec![], 0, 1, 12);
        assert_eq!(page.pages, 0);
    }
}
