// src/normalization/codes.rs

pub const RAW_CODE_SEPARATOR: char = '|';
pub const CANONICAL_CODE_SEPARATOR: &str = ", ";

/// Canonical form of a multi-valued industry code field: split on `|`,
/// trimmed, sorted, de-duplicated and re-joined with `", "`.
///
/// Already-canonical values pass through unchanged, since they contain no `|`.
/// Returns `None` when no non-empty code remains: a value made only of
/// separators carries no code, and an empty canonical string would count as
/// populated when the completeness resolver picks a master.
pub fn normalize_code_list(raw: &str) -> Option<String> {
    let mut codes: Vec<&str> = raw
        .split(RAW_CODE_SEPARATOR)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    if codes.is_empty() {
        return None;
    }
    codes.sort_unstable();
    codes.dedup();
    Some(codes.join(CANONICAL_CODE_SEPARATOR))
}
