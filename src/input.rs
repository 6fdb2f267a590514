use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::cli::InputFormat;
use crate::model::{PageText, TocItem};

const PAGE_BREAK: char = '\u{000C}';

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PageChunksDocument {
    Pages(Vec<RawPage>),
    Wrapped { pages: Vec<RawPage> },
}

#[derive(Debug, Default, Deserialize)]
struct RawPage {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    toc_items: Option<Vec<Value>>,
}

pub fn resolve_format(path: &Path, format: InputFormat) -> InputFormat {
    match format {
        InputFormat::Auto => {
            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
            if is_json {
                InputFormat::Json
            } else {
                InputFormat::Text
            }
        }
        explicit => explicit,
    }
}

pub fn load_pages(path: &Path, format: InputFormat) -> Result<Vec<PageText>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read input file: {}", path.display()))?;

    let resolved = resolve_format(path, format);
    let pages = match resolved {
        InputFormat::Json => parse_page_chunks(&raw)
            .with_context(|| format!("failed to parse page chunks: {}", path.display()))?,
        InputFormat::Text | InputFormat::Auto => split_text_pages(&raw),
    };

    debug!(
        path = %path.display(),
        format = resolved.as_str(),
        pages = pages.len(),
        toc_items = pages.iter().map(|page| page.toc_items.len()).sum::<usize>(),
        "loaded pages"
    );

    Ok(pages)
}

pub fn parse_page_chunks(raw: &str) -> Result<Vec<PageText>> {
    let document: PageChunksDocument =
        serde_json::from_str(raw).context("input is not a page-chunks JSON document")?;
    let raw_pages = match document {
        PageChunksDocument::Pages(pages) => pages,
        PageChunksDocument::Wrapped { pages } => pages,
    };

    let mut skipped_toc_items = 0usize;
    let pages = raw_pages
        .into_iter()
        .map(|page| {
            let raw_items = page.toc_items.unwrap_or_default();
            let toc_items = raw_items
                .iter()
                .filter_map(toc_item_from_value)
                .collect::<Vec<TocItem>>();
            skipped_toc_items += raw_items.len() - toc_items.len();

            PageText::with_toc(page.text.unwrap_or_default(), toc_items)
        })
        .collect::<Vec<PageText>>();

    if skipped_toc_items > 0 {
        debug!(skipped = skipped_toc_items, "skipped malformed toc items");
    }

    Ok(pages)
}

pub fn split_text_pages(raw: &str) -> Vec<PageText> {
    let mut pages = raw
        .split(PAGE_BREAK)
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect::<Vec<String>>();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    pages.into_iter().map(PageText::new).collect()
}

fn toc_item_from_value(value: &Value) -> Option<TocItem> {
    match value {
        Value::Array(fields) if fields.len() >= 2 => {
            let level = toc_level(&fields[0])?;
            let text = fields[1].as_str()?;
            Some(TocItem::new(level, text))
        }
        Value::Object(fields) => {
            let level = toc_level(fields.get("level")?)?;
            let text = fields.get("text")?.as_str()?;
            Some(TocItem::new(level, text))
        }
        _ => None,
    }
}

fn toc_level(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_u64().map(|_| i64::MAX))
}
