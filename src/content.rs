//! Page content streams.
//!
//! Operators are appended to a [`ContentLog`] as text fragments. Some content
//! (cell borders and fills of a paragraph) is only known once the text that
//! sits on top of it has been laid out, so the log can hand out [`Mark`]s and
//! later insert fragments *at* a mark. Fragments inserted at the same mark keep
//! the order in which they were inserted, and they all paint underneath
//! anything appended after the mark was taken.

use std::fmt::Write as _;

/// Format a number the way content stream operators expect it: fixed, six decimals
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1_000_000.0).round() / 1_000_000.0;
    // avoid "-0.000000"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.6}")
}

/// Escape a string of single-byte codes for use inside a PDF literal string `( ... )`
pub fn escape_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{b:03o}");
            }
        }
    }
    out
}

/// Encode two-byte codes as a PDF hex string body
pub fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02X}");
    }
    out
}

/// A position in a [`ContentLog`] at which content can later be inserted
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark(usize);

/// Where drawing operators go
pub trait ContentSink {
    /// Add operators at the end of the content
    fn append(&mut self, operators: &str);
    /// Remember the current end of the content
    fn mark(&mut self) -> Mark;
    /// Insert operators at a previously taken mark, after anything already inserted there
    fn insert_at(&mut self, mark: Mark, operators: &str);
}

#[derive(Debug, Default, Clone)]
struct Slot {
    inserted: Vec<String>,
    body: String,
}

/// An append-only log of content fragments, split into slots at each mark
#[derive(Debug, Clone)]
pub struct ContentLog {
    slots: Vec<Slot>,
}

impl Default for ContentLog {
    fn default() -> Self {
        ContentLog::new()
    }
}

impl ContentLog {
    pub fn new() -> ContentLog {
        ContentLog {
            slots: vec![Slot::default()],
        }
    }

    /// The mark at the very beginning of the log
    pub fn start(&self) -> Mark {
        Mark(0)
    }

    pub fn is_empty(&self) -> bool {
        self.slots
            .iter()
            .all(|s| s.body.is_empty() && s.inserted.is_empty())
    }

    /// Flatten the log into the final operator text
    pub fn resolve(&self) -> String {
        let mut out = String::new();
        for slot in self.slots.iter() {
            for fragment in slot.inserted.iter() {
                out.push_str(fragment);
                out.push('\n');
            }
            out.push_str(&slot.body);
        }
        out
    }
}

impl ContentSink for ContentLog {
    fn append(&mut self, operators: &str) {
        if let Some(slot) = self.slots.last_mut() {
            slot.body.push_str(operators);
            slot.body.push('\n');
        }
    }

    fn mark(&mut self) -> Mark {
        self.slots.push(Slot::default());
        Mark(self.slots.len() - 1)
    }

    fn insert_at(&mut self, mark: Mark, operators: &str) {
        if let Some(slot) = self.slots.get_mut(mark.0) {
            slot.inserted.push(operators.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_have_six_decimals() {
        assert_eq!(fmt_num(1.0), "1.000000");
        assert_eq!(fmt_num(-0.0000001), "0.000000");
        assert_eq!(fmt_num(12.3456789), "12.345679");
    }

    #[test]
    fn literal_strings_are_escaped() {
        assert_eq!(escape_literal(b"a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape_literal(&[0xe9]), "\\351");
    }

    #[test]
    fn insertions_at_a_mark_keep_their_order() {
        let mut log = ContentLog::new();
        log.append("header");
        let mark = log.mark();
        log.append("text one");
        log.append("text two");
        log.insert_at(mark, "border one");
        log.insert_at(mark, "border two");
        assert_eq!(
            log.resolve(),
            "header\nborder one\nborder two\ntext one\ntext two\n"
        );
    }

    #[test]
    fn later_marks_do_not_disturb_earlier_ones() {
        let mut log = ContentLog::new();
        let first = log.mark();
        log.append("a");
        let second = log.mark();
        log.append("b");
        log.insert_at(second, "under b");
        log.insert_at(first, "under a");
        assert_eq!(log.resolve(), "under a\na\nunder b\nb\n");
        assert!(!log.is_empty());
        assert!(ContentLog::new().is_empty());
    }
}
