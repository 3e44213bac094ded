/// Normalizes free-text search input: trims and case-folds it.
/// Empty or whitespace-only input means "no search constraint" and yields `None`.
pub fn normalize_query(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
