//! Utility functions for string formatting and matching.

/// Case-insensitive substring match, used by the pokedex search.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a height in metres for display
pub fn format_height(height_m: f64) -> String {
    format!("{:.1} m", height_m)
}

/// Format a weight in kilograms for display
pub fn format_weight(weight_kg: f64) -> String {
    format!("{:.1} kg", weight_kg)
}
