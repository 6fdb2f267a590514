use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    pub text: String,
    pub toc_items: Vec<TocItem>,
}

impl PageText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            toc_items: Vec::new(),
        }
    }

    pub fn with_toc(text: impl Into<String>, toc_items: Vec<TocItem>) -> Self {
        Self {
            text: text.into(),
            toc_items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocItem {
    pub level: i64,
    pub text: String,
}

impl TocItem {
    pub fn new(level: i64, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn from_declared(level: i64) -> Self {
        match level {
            1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineResult {
    pub title: String,
    pub outline: Vec<HeadingEntry>,
}

impl OutlineResult {
    pub fn heading_count(&self) -> usize {
        self.outline.len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub source: String,
    pub sha256: Option<String>,
    pub output: Option<String>,
    pub title: Option<String>,
    pub heading_count: usize,
    pub status: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub started_at: String,
    pub generated_at: String,
    pub input_directory: String,
    pub output_directory: String,
    pub input_format: String,
    pub input_count: usize,
    pub processed_count: usize,
    pub failed_count: usize,
    pub entries: Vec<BatchEntry>,
}
