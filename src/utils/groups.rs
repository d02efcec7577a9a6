/// Splits a comma-separated group list, trimming tokens and dropping
/// empty ones.
pub fn parse_group_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect()
}

/// Whether a user's group passes a poll's target-group list.
///
/// An empty list targets every group. A non-empty list requires the user's
/// group to appear verbatim; a user with no known group never matches it.
pub fn group_matches(user_group: Option<&str>, raw_target: &str) -> bool {
    let groups = parse_group_list(raw_target);
    if groups.is_empty() {
        return true;
    }

    match user_group {
        Some(group) => groups.iter().any(|g| g == group),
        None => false,
    }
}
