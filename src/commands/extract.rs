use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::{ExtractArgs, InputFormat};
use crate::input::load_pages;
use crate::model::OutlineResult;
use crate::outline::OutlineBuilder;
use crate::util::{write_json_pretty, write_json_stdout};

pub fn run(args: ExtractArgs) -> Result<()> {
    let Some(input_path) = input_path_from_words(&args.input) else {
        bail!("no input path provided");
    };

    let builder = OutlineBuilder::new()?;
    let result = extract_file(&builder, &input_path, args.format)?;

    match args.output {
        Some(output_path) => {
            write_json_pretty(&output_path, &result)?;
            info!(path = %output_path.display(), "saved outline");
        }
        None => write_json_stdout(&result)?,
    }

    Ok(())
}

pub fn extract_file(
    builder: &OutlineBuilder,
    path: &Path,
    format: InputFormat,
) -> Result<OutlineResult> {
    let pages =
        load_pages(path, format).with_context(|| format!("failed to process {}", path.display()))?;
    let result = builder.build_outline(&pages);

    info!(
        path = %path.display(),
        pages = pages.len(),
        headings = result.heading_count(),
        title = %result.title,
        "extracted outline"
    );

    Ok(result)
}

fn input_path_from_words(words: &[String]) -> Option<PathBuf> {
    if words.is_empty() {
        return None;
    }

    Some(PathBuf::from(words.join(" ")))
}
