use anyhow::{Context, Result};
use regex::Regex;

use crate::model::{HeadingEntry, HeadingLevel, OutlineResult, PageText, UNTITLED};
use crate::normalize::{TextNormalizer, normalize_punctuation, split_lines, starts_with_lowercase};

mod rules;

use rules::{HEADING_RULES, HeadingRule, TITLE_PREFIX};

#[derive(Debug)]
pub struct OutlineBuilder {
    normalizer: TextNormalizer,
    separator_line: Regex,
    bold_line: Regex,
    rules: &'static [HeadingRule],
}

impl OutlineBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            normalizer: TextNormalizer::new()?,
            separator_line: Regex::new(r#"^[.\-*,="']{2,}$"#)
                .context("failed to compile separator line regex")?,
            bold_line: Regex::new(r"^_?\*\*(.*?)\*\*_?$")
                .context("failed to compile bold line regex")?,
            rules: &HEADING_RULES,
        })
    }

    pub fn build_outline(&self, pages: &[PageText]) -> OutlineResult {
        let title = self.extract_title(pages);
        let mut outline = Vec::new();

        for (page_index, page) in pages.iter().enumerate() {
            let mut entries = self.classify_page_headings(&page.text, page_index);
            let pattern_count = entries.len();

            for toc_item in &page.toc_items {
                let text = self.normalizer.strip_inline_bold(&toc_item.text);
                if starts_with_lowercase(&text) {
                    continue;
                }
                if entries[..pattern_count].iter().any(|entry| entry.text == text) {
                    continue;
                }

                entries.push(HeadingEntry {
                    level: HeadingLevel::from_declared(toc_item.level),
                    text,
                    page: page_index + 1,
                });
            }

            outline.extend(entries);
        }

        OutlineResult { title, outline }
    }

    pub fn extract_title(&self, pages: &[PageText]) -> String {
        for page in pages {
            for raw_line in split_lines(&page.text) {
                let line = normalize_punctuation(raw_line.trim());
                let Some(rest) = line.strip_prefix(TITLE_PREFIX) else {
                    continue;
                };

                let candidate = self.normalizer.strip_inline_bold(rest.trim());
                if !starts_with_lowercase(&candidate) {
                    return candidate;
                }
            }
        }

        UNTITLED.to_string()
    }

    pub fn classify_page_headings(&self, page_text: &str, page_index: usize) -> Vec<HeadingEntry> {
        split_lines(page_text)
            .filter_map(|raw_line| self.classify_line(raw_line))
            .map(|(level, text)| HeadingEntry {
                level,
                text,
                page: page_index + 1,
            })
            .collect()
    }

    fn classify_line(&self, raw_line: &str) -> Option<(HeadingLevel, String)> {
        let trimmed = raw_line.trim();
        if self.separator_line.is_match(trimmed) {
            return None;
        }

        let line = normalize_punctuation(trimmed);
        let (level, extracted) = self.rules.iter().find_map(|rule| {
            rule.extract(&line, &self.bold_line)
                .map(|extracted| (rule.level, extracted))
        })?;

        let text = self.normalizer.strip_inline_bold(extracted);
        if text.is_empty() || starts_with_lowercase(&text) {
            return None;
        }

        Some((level, text))
    }
}
