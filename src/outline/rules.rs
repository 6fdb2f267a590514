use regex::Regex;

use crate::model::HeadingLevel;

pub const TITLE_PREFIX: &str = "# ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePattern {
    Prefix(&'static str),
    BoldLine,
}

#[derive(Debug, Clone, Copy)]
pub struct HeadingRule {
    pub pattern: LinePattern,
    pub level: HeadingLevel,
}

pub const HEADING_RULES: [HeadingRule; 5] = [
    HeadingRule {
        pattern: LinePattern::Prefix(TITLE_PREFIX),
        level: HeadingLevel::H1,
    },
    HeadingRule {
        pattern: LinePattern::Prefix("## "),
        level: HeadingLevel::H1,
    },
    HeadingRule {
        pattern: LinePattern::Prefix("### "),
        level: HeadingLevel::H2,
    },
    HeadingRule {
        pattern: LinePattern::Prefix("#### "),
        level: HeadingLevel::H3,
    },
    HeadingRule {
        pattern: LinePattern::BoldLine,
        level: HeadingLevel::H3,
    },
];

impl HeadingRule {
    pub fn extract<'a>(&self, line: &'a str, bold_line: &Regex) -> Option<&'a str> {
        match self.pattern {
            LinePattern::Prefix(prefix) => line.strip_prefix(prefix).map(str::trim),
            LinePattern::BoldLine => bold_line.is_match(line).then_some(line),
        }
    }
}
