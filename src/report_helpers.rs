use std::path::Path;

use unicode_width::UnicodeWidthStr;

/// Compute the max display width for paths, with a minimum of `min`.
pub fn max_path_width<'a>(paths: impl Iterator<Item = &'a Path>, min: usize) -> usize {
    paths
        .map(|p| p.display().to_string().width())
        .max()
        .unwrap_or(min)
        .max(min)
}

/// Max display width of free text (author names are often non-ASCII).
pub fn max_text_width<'a>(texts: impl Iterator<Item = &'a str>, min: usize) -> usize {
    texts.map(|t| t.width()).max().unwrap_or(min).max(min)
}

/// Left-align `text` to `width` display columns.
pub fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Print a horizontal separator of box-drawing chars.
pub fn separator(width: usize) -> String {
    "\u{2500}".repeat(width)
}

/// Show at most `top` rows; `0` means all.
pub fn limit<T>(rows: &[T], top: usize) -> &[T] {
    if top == 0 || top >= rows.len() {
        rows
    } else {
        &rows[..top]
    }
}

#[cfg(test)]
#[path = "report_helpers_test.rs"]
mod tests;
