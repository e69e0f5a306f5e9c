//! Text helpers shared by the templates.

use chrono::NaiveDate;

/// Format a `YYYY-MM` or `YYYY-MM-DD` date as `Jan 2023`
///
/// Empty input gives an empty string; anything unparseable is returned as is.
pub fn format_date(date: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        return String::new();
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", date), "%Y-%m-%d"))
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// `Jan 2020 - Present`, `Jan 2020 - Mar 2022`, or whichever side is known
pub fn date_range(start: &str, end: &str, current: bool) -> String {
    let start = format_date(start);
    let end = if current {
        "Present".to_string()
    } else {
        format_date(end)
    };
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{} - {}", start, end),
        (false, true) => start,
        (true, false) => end,
        (true, true) => String::new(),
    }
}

/// Cut `text` to `max_chars` characters, appending `...` when shortened
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Greedy word wrap into lines of at most `max_chars` characters
///
/// Explicit newlines start new lines; words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > max_chars {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if line_len == 0 { word.len() } else { line_len + 1 + word.len() };
            if needed > max_chars {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line_len += word.len();
            line.extend(word);
        }

        if line_len > 0 {
            lines.push(line);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2023-01"), "Jan 2023");
        assert_eq!(format_date("2019-11-30"), "Nov 2019");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("Summer 2020"), "Summer 2020");
    }

    #[test]
    fn test_date_range() {
        assert_eq!(date_range("2020-01", "2022-03", false), "Jan 2020 - Mar 2022");
        assert_eq!(date_range("2020-01", "", true), "Jan 2020 - Present");
        assert_eq!(date_range("2020-01", "", false), "Jan 2020");
        assert_eq!(date_range("", "", false), "");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("", 3), "");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_wrap_keeps_paragraphs_and_splits_long_words() {
        assert_eq!(wrap_text("ab\ncd", 10), vec!["ab", "cd"]);
        assert_eq!(wrap_text("x abcdefgh", 3), vec!["x", "abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_lines_fit() {
        let text = "Led a team of five engineers building a distributed cache with consistent hashing";
        for width in 1..40 {
            for line in wrap_text(text, width) {
                assert!(line.chars().count() <= width, "{:?} wider than {}", line, width);
            }
        }
    }
}
