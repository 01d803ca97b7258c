//! Word wrapping measured in terminal columns.
//!
//! Layout needs to know how many rows a paragraph takes before anything is
//! drawn, and the widgets must then break lines the same way, so both go
//! through [`wrap`].

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of `text` in columns.
pub fn width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Break `text` into lines no wider than `max_width` columns.
///
/// Words are kept whole where they fit; a single word wider than the line is
/// split by character.  Always returns at least one line.
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = width(word);
            let gap = usize::from(!line.is_empty());

            if line_width + gap + word_width <= max_width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += gap + word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            if word_width <= max_width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }

            // Hard-break an over-long word.
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(1);
                if line_width + ch_width > max_width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(ch);
                line_width += ch_width;
            }
        }

        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Number of rows `text` takes at `max_width`.
pub fn height(text: &str, max_width: usize) -> usize {
    wrap(text, max_width).len()
}

/// Truncate to `max_width` columns, ending in `…` when cut.
pub fn ellipsize(text: &str, max_width: usize) -> String {
    if width(text) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(1);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}
