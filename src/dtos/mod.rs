pub mod purchasedtos;
pub mod referraldtos;
pub mod userdtos;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

/// Pagination metadata attached to every paginated listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct Pagination {
    pub total: i64,
    pub page: u32,
    pub limit: usize,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: u32, limit: usize) -> Self {
        let total_pages = (total + limit as i64 - 1) / limit as i64;
        Pagination {
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_rounds_up() {
        let meta = Pagination::new(21, 1, 10);
        assert_eq!(meta.total_pages, 3);

        let meta = Pagination::new(20, 1, 10);
        assert_eq!(meta.total_pages, 2);

        let meta = Pagination::new(0, 1, 10);
        assert_eq!(meta.total_pages, 0);
    }
}
