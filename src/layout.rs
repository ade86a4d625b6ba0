// Line tracking for the word display.
//
// The caller owns the rendering and the actual scroll offset; this module only
// turns layout positions into "did the active word change row" and "where
// should the view scroll to".

use unicode_width::UnicodeWidthStr;

/// Outcome of moving the active word from one position to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAdvance {
    pub row_changed: bool,
    /// New scroll offset, when the view should move
    pub scroll_to: Option<u32>,
}

/// Compare the rows of the previous and the newly active word.
///
/// The view scrolls once the active word lands on a different row that starts
/// beyond the first line; the new offset is exactly that row's top.
pub fn line_advance(previous_top: u32, active_top: u32, line_height: u32) -> LineAdvance {
    let row_changed = previous_top != active_top;
    let scroll_to = (row_changed && active_top > line_height).then_some(active_top);
    LineAdvance {
        row_changed,
        scroll_to,
    }
}

/// Scroll position of the word display, reset with every new session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: u32,
}

impl ScrollState {
    pub fn on_word_change(&mut self, previous_top: u32, active_top: u32, line_height: u32) -> bool {
        let advance = line_advance(previous_top, active_top, line_height);
        if let Some(offset) = advance.scroll_to {
            self.offset = offset;
        }
        advance.row_changed
    }
}

/// Row index of every word when laid out left to right in `width` columns,
/// with one column of spacing between words
pub fn wrap_rows(words: &[String], width: u16) -> Vec<u32> {
    let width = width.max(1) as usize;
    let mut rows = Vec::with_capacity(words.len());
    let mut row = 0u32;
    let mut used = 0usize;

    for word in words {
        let w = word.width();
        let needed = if used == 0 { w } else { used + 1 + w };
        if used > 0 && needed > width {
            row += 1;
            used = w;
        } else {
            used = needed;
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_same_row_does_nothing() {
        let advance = line_advance(40, 40, 55);
        assert!(!advance.row_changed);
        assert_eq!(advance.scroll_to, None);
    }

    #[test]
    fn test_second_line_does_not_scroll() {
        let advance = line_advance(0, 55, 55);
        assert!(advance.row_changed);
        assert_eq!(advance.scroll_to, None);
    }

    #[test]
    fn test_third_line_scrolls_to_row_top() {
        let advance = line_advance(55, 110, 55);
        assert!(advance.row_changed);
        assert_eq!(advance.scroll_to, Some(110));
    }

    #[test]
    fn test_scroll_state_tracks_offset() {
        let mut scroll = ScrollState::default();

        assert!(!scroll.on_word_change(0, 0, 1));
        assert!(scroll.on_word_change(0, 1, 1));
        assert_eq!(scroll.offset, 0);

        assert!(scroll.on_word_change(1, 2, 1));
        assert_eq!(scroll.offset, 2);

        assert!(!scroll.on_word_change(2, 2, 1));
        assert_eq!(scroll.offset, 2);
    }

    #[test]
    fn test_wrap_rows() {
        // "the be" fits in 7 columns, "of" wraps
        let rows = wrap_rows(&words(&["the", "be", "of", "and"]), 7);
        assert_eq!(rows, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_wrap_rows_exact_fit() {
        let rows = wrap_rows(&words(&["ab", "cd", "ef"]), 5);
        assert_eq!(rows, vec![0, 0, 1]);
    }

    #[test]
    fn test_wrap_rows_long_word_gets_own_row() {
        let rows = wrap_rows(&words(&["a", "extraordinary", "b"]), 5);
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_wrap_rows_empty() {
        assert!(wrap_rows(&[], 10).is_empty());
    }
}
