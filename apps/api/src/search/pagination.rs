use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A "load more" window over an already filtered and sorted result.
///
/// Page `n` holds the first `n * page_size` items, so each request returns
/// everything shown so far plus the next batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
}

pub fn paginate<T>(mut items: Vec<T>, page: Option<u32>, page_size: Option<u32>) -> Page<T> {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let total = items.len();
    let visible = (page as usize).saturating_mul(page_size as usize).min(total);
    items.truncate(visible);

    Page {
        items,
        total,
        page,
        page_size,
        has_more: visible < total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_defaults() {
        let page = paginate((0..25).collect::<Vec<i32>>(), None, None);
        assert_eq!(page.items, (0..10).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
        assert_eq!(page.page, 1);
        assert!(page.has_more);
    }

    #[test]
    fn test_load_more_is_cumulative() {
        let page = paginate((0..25).collect::<Vec<i32>>(), Some(2), Some(10));
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.items[0], 0);
        assert!(page.has_more);

        let last = paginate((0..25).collect::<Vec<i32>>(), Some(3), Some(10));
        assert_eq!(last.items.len(), 25);
        assert!(!last.has_more);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let page = paginate((0..5).collect::<Vec<i32>>(), Some(0), Some(0));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.items, vec![0]);

        let huge = paginate((0..500).collect::<Vec<i32>>(), Some(u32::MAX), Some(10_000));
        assert_eq!(huge.page_size, MAX_PAGE_SIZE);
        assert_eq!(huge.items.len(), 500);
        assert!(!huge.has_more);
    }

    #[test]
    fn test_empty_result() {
        let page = paginate(Vec::<i32>::new(), None, None);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert!(!page.has_more);
    }
}
