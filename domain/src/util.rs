//! Shared utility functions.

/// Shorten `s` to at most `max_chars` characters for log previews,
/// appending `...` when anything was cut.
pub fn preview(s: &str, max_chars: usize) -> String {
    let mut chars = s.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_is_unchanged() {
        assert_eq!(preview("salad", 10), "salad");
    }

    #[test]
    fn preview_cuts_with_ellipsis() {
        assert_eq!(preview("vegetables", 3), "veg...");
    }

    #[test]
    fn preview_counts_chars_not_bytes() {
        assert_eq!(preview("野菜を食べる", 2), "野菜...");
    }

    #[test]
    fn preview_exact_length() {
        assert_eq!(preview("kale", 4), "kale");
    }
}
