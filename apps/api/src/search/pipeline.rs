use super::predicates::Predicate;
use super::Searchable;

/// Returns the items that match `query` and pass every predicate, in input order.
///
/// `query` must already be normalized; `None` matches everything.
pub fn filter_items<T: Searchable + Clone>(
    items: &[T],
    query: Option<&str>,
    predicates: &[Predicate],
) -> Vec<T> {
    items
        .iter()
        .filter(|item| query.map_or(true, |q| matches_query(*item, q)))
        .filter(|item| predicates.iter().all(|p| p.test(*item)))
        .cloned()
        .collect()
}

/// Free-text match over title, company name, skills and description.
fn matches_query<T: Searchable + ?Sized>(item: &T, query: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(query);

    contains(item.title())
        || contains(item.company_name())
        || item.skills().iter().any(|s| contains(s.as_str()))
        || item.description().is_some_and(contains)
}
