//! Sanitizing of log-controlled text before it reaches a terminal
//!
//! Session logs contain arbitrary tool output. Text rendering passes message text and
//! thinking through [`strip_ansi_codes`] so escape sequences recorded in a log cannot
//! move the cursor or clear the screen of whoever reads the transcript.

use std::borrow::Cow;

/// Strips ANSI CSI escape sequences and stray control characters
///
/// Tab, newline and carriage return are kept. Text without anything to strip is
/// returned borrowed.
///
/// ```
/// use artifact_extractor::utils::terminal::strip_ansi_codes;
///
/// assert_eq!(strip_ansi_codes("\x1b[31mRed\x1b[0m text"), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_stripped_control) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        // ESC [ params letter
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        if !is_stripped_control(ch) {
            result.push(ch);
        }
    }

    Cow::Owned(result)
}

fn is_stripped_control(ch: char) -> bool {
    ch.is_control() && !matches!(ch, '\t' | '\n' | '\r')
}
