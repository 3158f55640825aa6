use serde::Serialize;

/// Page size used by list views when the caller does not ask for one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Row offset for the requested page. Pages past the end saturate and
    /// simply come back empty.
    pub fn offset(&self) -> i64 {
        let rows = (self.page.max(1) - 1).saturating_mul(self.per_page);
        i64::try_from(rows).unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

/// A page of items together with the information needed to render pagers.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, total_items: usize, per_page: usize) -> Self {
        Self {
            items,
            page: page.max(1),
            total_pages: total_items.div_ceil(per_page.max(1)),
            total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_treats_page_zero_as_first_page() {
        let pagination = Pagination {
            page: 0,
            per_page: 10,
        };
        assert_eq!(pagination.offset(), 0);

        let pagination = Pagination {
            page: 3,
            per_page: 10,
        };
        assert_eq!(pagination.offset(), 20);
        assert_eq!(pagination.limit(), 10);
    }

    #[test]
    fn huge_page_numbers_saturate() {
        let pagination = Pagination {
            page: usize::MAX,
            per_page: 20,
        };
        assert_eq!(pagination.offset(), i64::MAX);
    }

    #[test]
    fn paginated_rounds_total_pages_up() {
        let page = Paginated::new(vec![1, 2, 3], 2, 41, 20);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_items, 41);
    }
}
