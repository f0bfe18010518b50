/// Lowercases and strips all whitespace so "Front End" and "frontend" compare equal.
pub(crate) fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
