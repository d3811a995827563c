//! Greedy word wrapping.
//!
//! A [`LineBreaker`] measures a run of characters once and collects the
//! places a line may end. [`LineBreaker::break_line`] then walks forward from
//! a start index until the accumulated width overflows and retreats to the
//! last candidate.

use crate::metrics::{GlyphRun, TextMetrics, NO_BREAK_SPACE, SOFT_HYPHEN};
use std::ops::Range;

const NEWLINE: u32 = 10;
const HYPHEN: u32 = 45;

/// One line of a wrapped run
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    /// characters on the line, not counting the break character
    pub range: Range<usize>,
    /// width of the characters in `range`, plus the hyphen when one is added
    pub width: f64,
    /// the line ended at a newline
    pub explicit_break: bool,
    /// the line ended at a hyphenation point and gets a visible hyphen
    pub soft_hyphen: bool,
    /// where the next line starts
    pub resume: usize,
    /// the run is exhausted
    pub finished: bool,
}

impl LineSegment {
    /// Nothing was consumed. On a line that already holds other content this
    /// means "continue on the next line"; on an empty line it means the width
    /// can't hold a single character. An empty line that ends at a space is
    /// not a stall.
    pub fn stalled(&self) -> bool {
        self.resume == self.range.start && !self.explicit_break && !self.finished
    }
}

/// Word wrapper over a measured run of characters, in logical order
#[derive(Debug, Clone)]
pub struct LineBreaker {
    codes: Vec<u32>,
    run: GlyphRun,
    candidates: Vec<bool>,
    /// width of the widest line the page body can hold
    page_width: f64,
    hyphen_width: f64,
}

fn is_letter(code: Option<u32>) -> bool {
    code.and_then(char::from_u32)
        .map(char::is_alphabetic)
        .unwrap_or(false)
}

fn is_space(code: u32) -> bool {
    code != NO_BREAK_SPACE && char::from_u32(code).map(char::is_whitespace).unwrap_or(false)
}

impl LineBreaker {
    pub fn new(codes: &[u32], metrics: &TextMetrics, page_width: f64) -> LineBreaker {
        let run = metrics.run(codes);
        let n = codes.len();
        let candidates = (0..n)
            .map(|i| {
                let c = codes[i];
                if c == NEWLINE || c == NO_BREAK_SPACE {
                    return false;
                }
                c == SOFT_HYPHEN
                    || is_space(c)
                    || (c == HYPHEN
                        && i > 0
                        && i + 1 < n
                        && is_letter(codes.get(i - 1).copied())
                        && is_letter(codes.get(i + 1).copied()))
            })
            .collect();
        LineBreaker {
            codes: codes.to_vec(),
            run,
            candidates,
            page_width,
            hyphen_width: metrics.char_width(HYPHEN, false),
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    /// Width of `range` as measured
    pub fn width_of(&self, range: Range<usize>) -> f64 {
        range.map(|i| self.run.advance(i)).sum()
    }

    /// Width of the first word of the text from `from`, leading spaces skipped
    fn first_word_width(&self, from: usize) -> f64 {
        let start = (from..self.len())
            .find(|&i| !is_space(self.codes[i]))
            .unwrap_or(self.len());
        let end = (start..self.len())
            .find(|&i| is_space(self.codes[i]))
            .unwrap_or(self.len());
        self.width_of(start..end)
    }

    fn hyphen_for(&self, sep: usize) -> f64 {
        if sep > 0 && self.codes[sep - 1] == HYPHEN {
            0.0
        } else {
            self.hyphen_width
        }
    }

    /// The next line starting at `start` that fits `available`. `mid_line`
    /// tells that the line already holds content, so a word that doesn't fit
    /// may move to the next line as a whole.
    pub fn break_line(&self, start: usize, available: f64, mid_line: bool) -> LineSegment {
        let n = self.len();
        let mut width = 0.0;
        let mut sep: Option<usize> = None;
        let mut prev_sep: Option<usize> = None;
        let mut shy = false;
        let mut prev_shy = false;
        let mut shy_width = 0.0;

        for i in start..n {
            let c = self.codes[i];
            if c == NEWLINE {
                return LineSegment {
                    range: start..i,
                    width,
                    explicit_break: true,
                    soft_hyphen: false,
                    resume: i + 1,
                    finished: false,
                };
            }
            // a hyphen opening the line can't end it
            if self.candidates[i] && !(c == HYPHEN && i == start) {
                prev_sep = sep;
                sep = Some(i);
                if c == SOFT_HYPHEN || c == HYPHEN {
                    prev_shy = shy;
                    shy = true;
                    shy_width = self.hyphen_for(i);
                } else {
                    shy = false;
                }
            }

            width += self.run.advance(i);
            let shy_overflow = c == SOFT_HYPHEN && width + shy_width >= available;
            if width <= available && !shy_overflow {
                continue;
            }
            let hyphen_overflow = c == HYPHEN && sep == Some(i);
            if (c == SOFT_HYPHEN && width + shy_width > available) || hyphen_overflow {
                sep = prev_sep;
                shy = prev_shy;
            }

            return match sep {
                None if mid_line => self.stall(start),
                None => self.truncate(start, i),
                Some(s) if self.first_word_width(s) > self.page_width => self.truncate(start, i),
                Some(s) => {
                    let hyphen = shy && !(self.codes[s] == SOFT_HYPHEN && self.hyphen_for(s) == 0.0);
                    let mut w = self.width_of(start..s);
                    if hyphen {
                        w += self.hyphen_width;
                    }
                    LineSegment {
                        range: start..s,
                        width: w,
                        explicit_break: false,
                        soft_hyphen: hyphen,
                        resume: s + 1,
                        finished: false,
                    }
                }
            };
        }

        LineSegment {
            range: start.min(n)..n,
            width,
            explicit_break: false,
            soft_hyphen: false,
            resume: n,
            finished: true,
        }
    }

    fn stall(&self, start: usize) -> LineSegment {
        LineSegment {
            range: start..start,
            width: 0.0,
            explicit_break: false,
            soft_hyphen: false,
            resume: start,
            finished: false,
        }
    }

    /// Cut the line before `at`; the character at `at` starts the next line
    fn truncate(&self, start: usize, at: usize) -> LineSegment {
        if at == start {
            return self.stall(start);
        }
        LineSegment {
            range: start..at,
            width: self.width_of(start..at),
            explicit_break: false,
            soft_hyphen: false,
            resume: at,
            finished: false,
        }
    }

    /// Characters of `segment` as they are drawn: soft hyphens dropped, the
    /// visible hyphen appended when the line was hyphenated
    pub fn line_codes(&self, segment: &LineSegment) -> Vec<u32> {
        let mut out: Vec<u32> = self.codes[segment.range.clone()]
            .iter()
            .copied()
            .filter(|&c| c != SOFT_HYPHEN)
            .collect();
        if segment.soft_hyphen {
            out.push(HYPHEN);
        }
        out
    }

    /// Wrap the whole run into lines of at most `available`, every line
    /// starting empty
    pub fn lines(&self, available: f64) -> Lines<'_> {
        Lines {
            breaker: self,
            available,
            next: 0,
            done: false,
        }
    }
}

/// Iterator over the lines of a [`LineBreaker`] at a fixed width
pub struct Lines<'a> {
    breaker: &'a LineBreaker,
    available: f64,
    next: usize,
    done: bool,
}

impl Iterator for Lines<'_> {
    type Item = LineSegment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let segment = self.breaker.break_line(self.next, self.available, false);
        // a run ending in a newline has no further line
        if segment.stalled() || (segment.finished && segment.range.is_empty()) {
            self.done = true;
            return None;
        }
        self.next = segment.resume;
        self.done = segment.finished;
        Some(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{codes_of, string_of, tests::Fixed};

    fn breaker(text: &str) -> LineBreaker {
        LineBreaker::new(&codes_of(text), &TextMetrics::new(&Fixed, 10.0), 1000.0)
    }

    fn wrap(text: &str, available: f64) -> Vec<String> {
        let b = breaker(text);
        b.lines(available)
            .map(|seg| string_of(&b.line_codes(&seg)))
            .collect()
    }

    #[test]
    fn wraps_at_the_last_space() {
        // "aaa bbb" is 65 wide
        assert_eq!(wrap("aaa bbb ccc", 65.0), vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn newlines_always_break() {
        assert_eq!(wrap("line1\nline2", 1000.0), vec!["line1", "line2"]);
        assert_eq!(wrap("a\n\nb", 1000.0), vec!["a", "", "b"]);
        assert_eq!(wrap("a\n", 1000.0), vec!["a"]);
    }

    #[test]
    fn soft_hyphen_becomes_visible_only_at_a_break() {
        let text = "abc\u{ad}def";
        assert_eq!(wrap(text, 1000.0), vec!["abcdef"]);
        assert_eq!(wrap(text, 45.0), vec!["abc-", "def"]);
    }

    #[test]
    fn hyphen_between_letters_is_a_break_candidate() {
        assert_eq!(wrap("well-known", 55.0), vec!["well-", "known"]);
        // not between two letters
        assert_eq!(wrap("ab -cd", 45.0), vec!["ab", "-cd"]);
    }

    #[test]
    fn hyphen_that_overflows_is_not_a_break() {
        let b = breaker("well-known");
        let seg = b.break_line(0, 45.0, false);
        assert_eq!(seg.range, 0..4);
        assert!(!seg.soft_hyphen);
        assert_eq!(seg.width, 40.0);
        for seg in b.lines(45.0) {
            assert!(seg.width <= 45.0, "{seg:?}");
        }
    }

    #[test]
    fn line_opening_with_a_space_breaks_there() {
        // the first line ends at the first of two spaces
        let b = breaker("aaaaa  bbbbbb");
        let first = b.break_line(0, 52.0, false);
        assert_eq!(first.range, 0..5);
        assert_eq!(first.resume, 6);
        // "bbbbbb" fits the page but not the line after the leading space
        let second = b.break_line(6, 52.0, false);
        assert!(second.range.is_empty());
        assert_eq!(second.resume, 7);
        assert!(!second.stalled());
        let lines: Vec<String> = b.lines(52.0).map(|seg| string_of(&b.line_codes(&seg))).collect();
        assert_eq!(lines, vec!["aaaaa", "", "bbbbb", "b"]);
    }

    #[test]
    fn no_break_space_holds_words_together() {
        assert_eq!(wrap("aa\u{a0}bb cc", 60.0), vec!["aa\u{a0}bb", "cc"]);
    }

    #[test]
    fn long_word_is_cut_at_the_edge() {
        assert_eq!(wrap("abcdefgh", 35.0), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn word_wider_than_the_page_is_cut_even_after_a_space() {
        let b = LineBreaker::new(&codes_of("ab cdefghij"), &TextMetrics::new(&Fixed, 10.0), 60.0);
        let seg = b.break_line(0, 60.0, false);
        assert_eq!(seg.range, 0..6);
        assert_eq!(seg.resume, 6);
    }

    #[test]
    fn segments_never_overflow() {
        let text = "the quick brown fox jumps over the lazy well-known dog and keeps on running far away";
        let b = breaker(text);
        for available in [40.0, 45.0, 55.0, 73.0, 120.0] {
            for seg in b.lines(available) {
                assert!(seg.width <= available + 1e-9, "{seg:?} at {available}");
            }
        }
    }

    #[test]
    fn single_glyph_wider_than_the_line_stalls() {
        let b = breaker("abc");
        let seg = b.break_line(0, 5.0, false);
        assert!(seg.stalled());
        assert_eq!(b.lines(5.0).count(), 0);
    }

    #[test]
    fn started_line_moves_the_word_down() {
        let b = breaker("abcdef");
        let seg = b.break_line(0, 20.0, true);
        assert!(seg.stalled());
        assert_eq!(seg.resume, 0);
        let seg = b.break_line(0, 100.0, false);
        assert!(seg.finished);
        assert_eq!(seg.width, 60.0);
    }
}
