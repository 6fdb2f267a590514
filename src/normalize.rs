use anyhow::{Context, Result};
use regex::Regex;

const PUNCTUATION_MAP: [(char, &str); 7] = [
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2026}', "..."),
];

const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{000B}', '\u{000C}', '\u{001C}', '\u{001D}', '\u{001E}', '\u{0085}',
    '\u{2028}', '\u{2029}',
];

pub fn normalize_punctuation(text: &str) -> String {
    if !text.contains(|ch: char| PUNCTUATION_MAP.iter().any(|(from, _)| *from == ch)) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match PUNCTUATION_MAP.iter().find(|(from, _)| *from == ch) {
            Some((_, to)) => out.push_str(to),
            None => out.push(ch),
        }
    }
    out
}

pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(LINE_BREAKS)
}

pub fn starts_with_lowercase(text: &str) -> bool {
    text.chars()
        .next()
        .map(|character| character.is_ascii_lowercase())
        .unwrap_or(false)
}

#[derive(Debug)]
pub struct TextNormalizer {
    code_span: Regex,
    bold_span: Regex,
    trailing_number: Regex,
    punctuation_run: Regex,
}

impl TextNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            code_span: Regex::new(r"`([^`]+)`").context("failed to compile code span regex")?,
            bold_span: Regex::new(r"_?\*\*(.*?)\*\*_?")
                .context("failed to compile bold span regex")?,
            trailing_number: Regex::new(r"(?:\b\d+\s*)+$")
                .context("failed to compile trailing number regex")?,
            punctuation_run: Regex::new(r#"[.\-,"=]{2,}"#)
                .context("failed to compile punctuation run regex")?,
        })
    }

    pub fn strip_inline_bold(&self, text: &str) -> String {
        let mut current = self.cleanup_pass(text);
        loop {
            let next = self.cleanup_pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn cleanup_pass(&self, text: &str) -> String {
        let text = normalize_punctuation(text);
        let text = self.code_span.replace_all(&text, "${1}");
        let text = text.replace('`', "");
        let text = self.bold_span.replace_all(&text, "${1}");
        let text = self.trailing_number.replace(&text, "");
        let text = self.punctuation_run.replace_all(&text, "");

        text.split_whitespace().collect::<Vec<&str>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new().expect("normalizer regexes should compile")
    }

    #[test]
    fn normalize_punctuation_maps_typographic_characters() {
        let input = "\u{2018}a\u{2019} \u{201C}b\u{201D} c\u{2013}d\u{2014}e\u{2026}";
        assert_eq!(normalize_punctuation(input), "'a' \"b\" c-d-e...");
    }

    #[test]
    fn normalize_punctuation_is_identity_without_matches() {
        assert_eq!(normalize_punctuation(""), "");
        assert_eq!(normalize_punctuation("Plain ASCII - text"), "Plain ASCII - text");
        let accented = "caf\u{00E9} \u{00AB}x\u{00BB}";
        assert_eq!(normalize_punctuation(accented), accented);
    }

    #[test]
    fn normalize_punctuation_leaves_no_mapped_characters() {
        let input = "\u{2026}\u{2026}\u{2014}\u{2018}\u{201D}mixed\u{2013}\u{2019}\u{201C}";
        let output = normalize_punctuation(input);
        for (from, _) in PUNCTUATION_MAP {
            assert!(!output.contains(from), "{from:?} survived in {output:?}");
        }
    }

    #[test]
    fn strip_inline_bold_unwraps_code_spans_and_stray_backticks() {
        let normalizer = normalizer();
        assert_eq!(normalizer.strip_inline_bold("Use `cargo` now"), "Use cargo now");
        assert_eq!(normalizer.strip_inline_bold("Broken ` tick"), "Broken tick");
        assert_eq!(normalizer.strip_inline_bold("``"), "");
    }

    #[test]
    fn strip_inline_bold_removes_bold_markers_non_greedily() {
        let normalizer = normalizer();
        assert_eq!(normalizer.strip_inline_bold("**Intro**"), "Intro");
        assert_eq!(normalizer.strip_inline_bold("_**Wrapped Title**_"), "Wrapped Title");
        assert_eq!(
            normalizer.strip_inline_bold("**One** and **Two**"),
            "One and Two"
        );
    }

    #[test]
    fn strip_inline_bold_drops_trailing_page_number_at_word_boundary() {
        let normalizer = normalizer();
        assert_eq!(normalizer.strip_inline_bold("Introduction 12"), "Introduction");
        assert_eq!(normalizer.strip_inline_bold("Introduction.....5"), "Introduction");
        assert_eq!(
            normalizer.strip_inline_bold("Chapter One**bold**99"),
            "Chapter Onebold99"
        );
        assert_eq!(normalizer.strip_inline_bold("2024"), "");
    }

    #[test]
    fn strip_inline_bold_drops_whole_trailing_number_run() {
        let normalizer = normalizer();
        assert_eq!(normalizer.strip_inline_bold("Chapter 3 12"), "Chapter");
        assert_eq!(normalizer.strip_inline_bold("Heading 5 \n"), "Heading");
        assert_eq!(normalizer.strip_inline_bold("Totals -- 4 -- 9"), "Totals");

        let long_run = format!("A{}", " 1".repeat(20_000));
        assert_eq!(normalizer.strip_inline_bold(&long_run), "A");
    }

    #[test]
    fn strip_inline_bold_removes_mixed_punctuation_runs() {
        let normalizer = normalizer();
        assert_eq!(normalizer.strip_inline_bold("Scope ---- Details"), "Scope Details");
        assert_eq!(normalizer.strip_inline_bold("A.-,\"=B"), "AB");
        assert_eq!(normalizer.strip_inline_bold("Wait\u{2026}"), "Wait");
        assert_eq!(normalizer.strip_inline_bold("v1.2 release"), "v1.2 release");
    }

    #[test]
    fn strip_inline_bold_collapses_whitespace() {
        let normalizer = normalizer();
        assert_eq!(
            normalizer.strip_inline_bold("  Spread \t out\u{00A0} words  "),
            "Spread out words"
        );
        assert_eq!(normalizer.strip_inline_bold(""), "");
    }

    #[test]
    fn strip_inline_bold_keeps_single_quotes_and_dashes() {
        let normalizer = normalizer();
        assert_eq!(
            normalizer.strip_inline_bold("\u{201C}Quoted\u{201D} \u{2014} isn\u{2019}t"),
            "\"Quoted\" - isn't"
        );
    }

    #[test]
    fn strip_inline_bold_is_idempotent() {
        let normalizer = normalizer();
        let samples = [
            "",
            "Table 3 4",
            "Heading 5 ",
            "**A** **B** 7",
            "_**x**_ `y` ... 1 2 3",
            "Appendix \u{2014}\u{2014} 42",
            "****",
            "Mixed `code` and **bold** text 10",
        ];

        for sample in samples {
            let once = normalizer.strip_inline_bold(sample);
            let twice = normalizer.strip_inline_bold(&once);
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn split_lines_handles_mixed_line_endings() {
        let lines = split_lines("a\nb\r\nc\rd\u{2028}e").collect::<Vec<&str>>();
        assert_eq!(lines, vec!["a", "b", "", "c", "d", "e"]);
    }

    #[test]
    fn starts_with_lowercase_checks_ascii_only() {
        assert!(starts_with_lowercase("appendix"));
        assert!(!starts_with_lowercase("Appendix"));
        assert!(!starts_with_lowercase("\u{00E9}tude"));
        assert!(!starts_with_lowercase(""));
    }
}
