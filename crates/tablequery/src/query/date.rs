//! Natural-language date-range recognition.
//!
//! Six grammars are tried in a fixed priority order; the first match wins.
//! Each grammar is a small cursor-based scanner with fixed lookahead, so
//! matching work stays linear in the input even on adversarial text. The
//! guard in [`parse_date_range`] additionally bounds input length and
//! repetition-prone characters before any grammar runs.

use chrono::{Datelike, Duration, NaiveDate};

const MAX_INPUT_CHARS: usize = 200;
const MAX_SPACES: usize = 50;
const MAX_HYPHENS: usize = 20;

/// A calendar date range in `YYYY-MM-DD` form. Grammars do not enforce
/// `start <= end`; reversed input is preserved as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

fn month_number(word: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, number)| *number)
}

/// Recognize a date-range phrase, returning `None` for anything that does
/// not match — including input rejected by the guard. Never errors.
///
/// Supported phrasings, in priority order:
/// 1. `week 35 of 2025` (the `of` is optional)
/// 2. `august 25-31, 2025`
/// 3. `2025-08-25 to 2025-08-31`
/// 4. `august 25, 2025 to september 5, 2025`
/// 5. `between august 25, 2025 and september 5, 2025`
/// 6. `august 25 to september 5, 2025`
pub fn parse_date_range(text: &str) -> Option<DateRange> {
    if !passes_guard(text) {
        return None;
    }
    let text = text.trim().to_lowercase();

    parse_week(&text)
        .or_else(|| parse_month_day_span(&text))
        .or_else(|| parse_iso_pair(&text))
        .or_else(|| parse_cross_month(&text))
        .or_else(|| parse_between(&text))
        .or_else(|| parse_year_at_end(&text))
}

/// Bound the work the grammars can do on attacker-influenced text.
fn passes_guard(text: &str) -> bool {
    if text.chars().count() > MAX_INPUT_CHARS {
        return false;
    }
    let spaces = text.chars().filter(|&c| c == ' ').count();
    let hyphens = text.chars().filter(|&c| c == '-').count();
    spaces <= MAX_SPACES && hyphens <= MAX_HYPHENS
}

// ── grammar 1: week <N> [of] <YYYY> ─────────────────────────────

fn parse_week(text: &str) -> Option<DateRange> {
    let mut from = 0;
    while let Some(found) = text[from..].find("week ") {
        let at = from + found;
        let mut s = Scanner::new(text, at + "week ".len());
        let matched = (|| {
            let week = s.eat_digits(1, 2)?;
            s.eat_char(b' ')?;
            let _ = s.eat_literal("of ");
            let year = s.eat_digits(4, 4)?;
            week_range(year as i32, week)
        })();
        if matched.is_some() {
            return matched;
        }
        from = at + 1;
    }
    None
}

/// ISO week range, Monday start. January 4 is guaranteed to fall inside
/// week 1, so the week-1 Monday is derived from it.
fn week_range(year: i32, week: u32) -> Option<DateRange> {
    let jan_4 = NaiveDate::from_ymd_opt(year, 1, 4)?;
    let to_monday = Duration::days(i64::from(jan_4.weekday().num_days_from_monday()));
    let start = jan_4 - to_monday + Duration::weeks(i64::from(week) - 1);
    let end = start + Duration::days(6);
    Some(DateRange {
        start: start.format("%Y-%m-%d").to_string(),
        end: end.format("%Y-%m-%d").to_string(),
    })
}

// ── grammar 2: <Month> <D1>-<D2>, <YYYY> ────────────────────────

fn parse_month_day_span(text: &str) -> Option<DateRange> {
    for at in word_starts(text) {
        let mut s = Scanner::new(text, at);
        let matched = (|| {
            let word = s.eat_word()?;
            s.eat_char(b' ')?;
            let d1 = s.eat_digits(1, 2)?;
            s.eat_char(b'-')?;
            let d2 = s.eat_digits(1, 2)?;
            s.eat_char(b',')?;
            let _ = s.eat_char(b' ');
            let year = s.eat_digits(4, 4)?;
            Some((word, d1, d2, year))
        })();
        if let Some((word, d1, d2, year)) = matched {
            // First syntactic match decides; an unknown month name makes
            // the whole grammar report no-match rather than scanning on.
            let month = month_number(word)?;
            return Some(DateRange {
                start: format_date(year, month, d1),
                end: format_date(year, month, d2),
            });
        }
    }
    None
}

// ── grammar 3: <YYYY-MM-DD> to <YYYY-MM-DD> ─────────────────────

fn parse_iso_pair(text: &str) -> Option<DateRange> {
    let bytes = text.as_bytes();
    for at in 0..bytes.len() {
        if !bytes[at].is_ascii_digit() {
            continue;
        }
        let mut s = Scanner::new(text, at);
        let matched = (|| {
            let start = eat_iso_date(&mut s)?;
            s.eat_literal(" to ")?;
            let end = eat_iso_date(&mut s)?;
            Some(DateRange { start, end })
        })();
        if matched.is_some() {
            return matched;
        }
    }
    None
}

fn eat_iso_date(s: &mut Scanner<'_>) -> Option<String> {
    let year = s.eat_digits(4, 4)?;
    s.eat_char(b'-')?;
    let month = s.eat_digits(2, 2)?;
    s.eat_char(b'-')?;
    let day = s.eat_digits(2, 2)?;
    Some(format_date(year, month, day))
}

// ── grammar 4: <Month1> <D1>[,] <Y1> to <Month2> <D2>[,] <Y2> ───

fn parse_cross_month(text: &str) -> Option<DateRange> {
    for at in word_starts(text) {
        let mut s = Scanner::new(text, at);
        let matched = (|| {
            let (w1, d1, y1) = eat_month_day_year(&mut s)?;
            s.eat_literal(" to ")?;
            let (w2, d2, y2) = eat_month_day_year(&mut s)?;
            Some((w1, d1, y1, w2, d2, y2))
        })();
        if let Some((w1, d1, y1, w2, d2, y2)) = matched {
            let m1 = month_number(w1)?;
            let m2 = month_number(w2)?;
            return Some(DateRange {
                start: format_date(y1, m1, d1),
                end: format_date(y2, m2, d2),
            });
        }
    }
    None
}

// ── grammar 5: between ... and ... ──────────────────────────────

fn parse_between(text: &str) -> Option<DateRange> {
    let mut from = 0;
    while let Some(found) = text[from..].find("between ") {
        let at = from + found;
        let mut s = Scanner::new(text, at + "between ".len());
        let matched = (|| {
            let (w1, d1, y1) = eat_month_day_year(&mut s)?;
            s.eat_literal(" and ")?;
            let (w2, d2, y2) = eat_month_day_year(&mut s)?;
            Some((w1, d1, y1, w2, d2, y2))
        })();
        if let Some((w1, d1, y1, w2, d2, y2)) = matched {
            let m1 = month_number(w1)?;
            let m2 = month_number(w2)?;
            return Some(DateRange {
                start: format_date(y1, m1, d1),
                end: format_date(y2, m2, d2),
            });
        }
        from = at + 1;
    }
    None
}

// ── grammar 6: <Month1> <D1> to <Month2> <D2>[,] <Y> ────────────

fn parse_year_at_end(text: &str) -> Option<DateRange> {
    for at in word_starts(text) {
        let mut s = Scanner::new(text, at);
        let matched = (|| {
            let w1 = s.eat_word()?;
            s.eat_char(b' ')?;
            let d1 = s.eat_digits(1, 2)?;
            s.eat_literal(" to ")?;
            let w2 = s.eat_word()?;
            s.eat_char(b' ')?;
            let d2 = s.eat_digits(1, 2)?;
            let _ = s.eat_char(b',');
            s.eat_char(b' ')?;
            let year = s.eat_digits(4, 4)?;
            Some((w1, d1, w2, d2, year))
        })();
        if let Some((w1, d1, w2, d2, year)) = matched {
            let m1 = month_number(w1)?;
            let m2 = month_number(w2)?;
            return Some(DateRange {
                start: format_date(year, m1, d1),
                end: format_date(year, m2, d2),
            });
        }
    }
    None
}

/// `<word> <day>[,] <year>` — comma after the day optional, single space
/// before the year required.
fn eat_month_day_year<'a>(s: &mut Scanner<'a>) -> Option<(&'a str, u32, u32)> {
    let word = s.eat_word()?;
    s.eat_char(b' ')?;
    let day = s.eat_digits(1, 2)?;
    let _ = s.eat_char(b',');
    s.eat_char(b' ')?;
    let year = s.eat_digits(4, 4)?;
    Some((word, day, year))
}

/// Zero-padded date text. Deliberately no calendar validation: the output
/// mirrors whatever the phrase said.
fn format_date(year: u32, month: u32, day: u32) -> String {
    format!("{year:04}-{month:02}-{day:02}")
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Byte offsets where a word run begins.
fn word_starts(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut starts = Vec::new();
    for i in 0..bytes.len() {
        if is_word_byte(bytes[i]) && (i == 0 || !is_word_byte(bytes[i - 1])) {
            starts.push(i);
        }
    }
    starts
}

/// Fixed-lookahead cursor over the input bytes. Every `eat_*` method
/// either consumes exactly what it matched or leaves the cursor alone.
struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str, pos: usize) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos,
        }
    }

    fn eat_char(&mut self, c: u8) -> Option<()> {
        if self.bytes.get(self.pos) == Some(&c) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    fn eat_literal(&mut self, literal: &str) -> Option<()> {
        let end = self.pos + literal.len();
        if end <= self.bytes.len() && &self.bytes[self.pos..end] == literal.as_bytes() {
            self.pos = end;
            Some(())
        } else {
            None
        }
    }

    /// A full digit run of between `min` and `max` digits. A longer run
    /// does not match, so `125` never yields day `12`.
    fn eat_digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let start = self.pos;
        let mut end = start;
        while end < self.bytes.len() && self.bytes[end].is_ascii_digit() {
            end += 1;
        }
        let len = end - start;
        if len < min || len > max {
            return None;
        }
        let value: u32 = std::str::from_utf8(&self.bytes[start..end])
            .ok()?
            .parse()
            .ok()?;
        self.pos = end;
        Some(value)
    }

    /// A full word run of 3 to 9 word characters, matching the original
    /// grammar's token width.
    fn eat_word(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let mut end = start;
        while end < self.bytes.len() && is_word_byte(self.bytes[end]) {
            end += 1;
        }
        let len = end - start;
        if !(3..=9).contains(&len) {
            return None;
        }
        self.pos = end;
        std::str::from_utf8(&self.bytes[start..end]).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> DateRange {
        DateRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    #[test]
    fn guard_rejects_long_input() {
        let text = "a".repeat(201);
        assert_eq!(parse_date_range(&text), None);
    }

    #[test]
    fn guard_rejects_space_flood() {
        let text = " ".repeat(51);
        assert_eq!(parse_date_range(&text), None);
    }

    #[test]
    fn guard_rejects_hyphen_flood() {
        let text = "-".repeat(21);
        assert_eq!(parse_date_range(&text), None);
    }

    #[test]
    fn guard_admits_boundary_lengths() {
        // Exactly at the limits the guard must still pass input through.
        let padding = " ".repeat(50);
        let text = format!("2025-08-25 to 2025-08-31{padding}");
        assert!(text.chars().count() <= 200);
        assert_eq!(
            parse_date_range(&text),
            Some(range("2025-08-25", "2025-08-31"))
        );
    }

    #[test]
    fn week_with_of() {
        assert_eq!(
            parse_date_range("week 35 of 2025"),
            Some(range("2025-08-25", "2025-08-31"))
        );
    }

    #[test]
    fn week_without_of() {
        assert_eq!(
            parse_date_range("Week 35 2025"),
            Some(range("2025-08-25", "2025-08-31"))
        );
    }

    #[test]
    fn week_start_is_monday() {
        let range = parse_date_range("week 1 of 2025").expect("range");
        let start = NaiveDate::parse_from_str(&range.start, "%Y-%m-%d").unwrap();
        assert_eq!(start.weekday(), chrono::Weekday::Mon);
        assert_eq!(range.start, "2024-12-30");
    }

    #[test]
    fn week_embedded_in_phrase() {
        assert_eq!(
            parse_date_range("incidents created week 35 of 2025 please"),
            Some(range("2025-08-25", "2025-08-31"))
        );
    }

    #[test]
    fn month_day_span() {
        assert_eq!(
            parse_date_range("August 25-31, 2025"),
            Some(range("2025-08-25", "2025-08-31"))
        );
    }

    #[test]
    fn month_day_span_without_space_after_comma() {
        assert_eq!(
            parse_date_range("august 25-31,2025"),
            Some(range("2025-08-25", "2025-08-31"))
        );
    }

    #[test]
    fn month_day_span_requires_comma() {
        assert_eq!(parse_date_range("august 25-31 2025"), None);
    }

    #[test]
    fn unknown_month_falls_through_not_errors() {
        // "aug" is not in the month table; no grammar should claim this.
        assert_eq!(parse_date_range("aug 25-31, 2025"), None);
    }

    #[test]
    fn iso_pair_wins_over_cross_month() {
        assert_eq!(
            parse_date_range("2025-08-25 to 2025-08-31"),
            Some(range("2025-08-25", "2025-08-31"))
        );
    }

    #[test]
    fn iso_pair_reversed_is_preserved() {
        assert_eq!(
            parse_date_range("2025-08-31 to 2025-08-25"),
            Some(range("2025-08-31", "2025-08-25"))
        );
    }

    #[test]
    fn cross_month_with_commas() {
        assert_eq!(
            parse_date_range("from August 25, 2025 to September 5, 2025"),
            Some(range("2025-08-25", "2025-09-05"))
        );
    }

    #[test]
    fn cross_year_without_commas() {
        assert_eq!(
            parse_date_range("december 29 2024 to january 4 2025"),
            Some(range("2024-12-29", "2025-01-04"))
        );
    }

    #[test]
    fn between_connective() {
        assert_eq!(
            parse_date_range("between August 25, 2025 and September 5, 2025"),
            Some(range("2025-08-25", "2025-09-05"))
        );
    }

    #[test]
    fn year_at_end_applies_to_both() {
        assert_eq!(
            parse_date_range("from August 25 to September 5, 2025"),
            Some(range("2025-08-25", "2025-09-05"))
        );
    }

    #[test]
    fn plain_text_is_no_match() {
        assert_eq!(parse_date_range("all critical incidents"), None);
    }

    #[test]
    fn single_date_is_no_match() {
        assert_eq!(parse_date_range("2025-08-25"), None);
    }

    #[test]
    fn days_are_not_calendar_validated() {
        // Matches the permissive source behavior: the phrase is formatted
        // as written even when the day does not exist.
        assert_eq!(
            parse_date_range("february 28-31, 2025"),
            Some(range("2025-02-28", "2025-02-31"))
        );
    }

    #[test]
    fn three_digit_day_does_not_truncate() {
        assert_eq!(parse_date_range("august 125-31, 2025"), None);
    }
}
