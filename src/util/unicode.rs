use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Remove the last grapheme cluster, as Backspace does in a text box.
pub fn pop_grapheme(s: &mut String) -> bool {
    let last = s.grapheme_indices(true).next_back().map(|(start, _)| start);
    match last {
        Some(start) => {
            s.truncate(start);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width("♥ Liked (3)"), 11);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_to_width("hi", 10), "hi");
        assert_eq!(truncate_to_width("hello", 5), "hello");
        assert_eq!(truncate_to_width("hello world", 8), "hello w\u{2026}");
    }

    #[test]
    fn truncate_wide_chars() {
        assert_eq!(truncate_to_width("你好世界", 5), "你好\u{2026}");
        let result = truncate_to_width("你好世界", 4);
        assert!(display_width(&result) <= 4);
        assert!(result.ends_with('\u{2026}'));
    }

    #[test]
    fn truncate_degenerate() {
        assert_eq!(truncate_to_width("hello", 0), "");
        assert_eq!(truncate_to_width("hello", 1), "\u{2026}");
    }

    #[test]
    fn pop_removes_whole_cluster() {
        let mut s = "cafe\u{0301}".to_string();
        assert!(pop_grapheme(&mut s));
        assert_eq!(s, "caf");

        let mut s = "a🎉".to_string();
        assert!(pop_grapheme(&mut s));
        assert_eq!(s, "a");

        let mut empty = String::new();
        assert!(!pop_grapheme(&mut empty));
    }
}
