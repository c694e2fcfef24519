use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns.
///
/// Unicode-aware: CJK characters and emoji count as 2 columns,
/// zero-width characters as 0, ASCII as 1.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` terminal columns,
/// appending "..." when text was cut off.
///
/// Returns `Cow::Borrowed` when the string already fits. For widths of
/// 3 or less there is no room for a character plus the ellipsis, so the
/// result is simply as many leading characters as fit, without ellipsis.
///
/// # Examples
///
/// ```
/// use homedeck::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let keep = if max_width <= ELLIPSIS_WIDTH {
        max_width
    } else {
        max_width - ELLIPSIS_WIDTH
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > keep {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    if max_width <= ELLIPSIS_WIDTH {
        Cow::Owned(s[..end].to_string())
    } else {
        Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
    }
}

/// Strips terminal control characters and ANSI escape sequences from
/// store-sourced text (category names, link titles, note contents).
///
/// Removes C0 controls (except tab/newline/CR), DEL, CSI sequences
/// (`ESC [` ... final byte) and OSC sequences (`ESC ]` ... BEL or ST).
/// Returns `Cow::Borrowed` when the input is already clean.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    fn is_banned(c: char) -> bool {
        c == '\u{1b}' || c == '\u{7f}' || (c.is_control() && c != '\t' && c != '\n' && c != '\r')
    }

    if !s.chars().any(is_banned) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            match chars.peek() {
                Some('[') => {
                    // CSI: skip parameter bytes until the final byte 0x40-0x7e
                    chars.next();
                    for n in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&n) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    // OSC: skip until BEL or ST (ESC \)
                    chars.next();
                    while let Some(n) = chars.next() {
                        if n == '\u{07}' {
                            break;
                        }
                        if n == '\u{1b}' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {} // bare ESC: drop it
            }
        } else if !is_banned(c) {
            out.push(c);
        }
    }

    Cow::Owned(out)
}
