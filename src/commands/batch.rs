use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::{BatchArgs, InputFormat};
use crate::commands::extract::extract_file;
use crate::model::{BatchEntry, BatchRunManifest, OutlineResult};
use crate::outline::OutlineBuilder;
use crate::util::{
    ensure_directory, sha256_file, utc_compact_string, utc_rfc3339_string, write_json_pretty,
};

const JSON_EXTENSIONS: &[&str] = &["json"];
const TEXT_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

struct ProcessedInput {
    sha256: String,
    output_path: PathBuf,
    result: OutlineResult,
}

pub fn run(args: BatchArgs) -> Result<()> {
    let started_ts = Utc::now();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    if !args.input_dir.is_dir() {
        bail!("input directory not found: {}", args.input_dir.display());
    }

    let inputs = discover_inputs(&args.input_dir, args.format)?;
    if inputs.is_empty() {
        bail!(
            "no {} input files found in {}",
            args.format.as_str(),
            args.input_dir.display()
        );
    }

    ensure_directory(&args.output_dir)?;
    info!(
        run_id = %run_id,
        input_dir = %args.input_dir.display(),
        input_count = inputs.len(),
        "starting batch"
    );

    let builder = OutlineBuilder::new()?;
    let mut entries = Vec::with_capacity(inputs.len());

    for path in &inputs {
        let source = display_name(path);
        match process_input(&builder, path, &args.output_dir, args.format) {
            Ok(processed) => {
                info!(
                    source = %source,
                    output = %processed.output_path.display(),
                    "processed input"
                );
                entries.push(BatchEntry {
                    source,
                    sha256: Some(processed.sha256),
                    output: Some(processed.output_path.display().to_string()),
                    heading_count: processed.result.heading_count(),
                    title: Some(processed.result.title),
                    status: "processed".to_string(),
                    error: None,
                });
            }
            Err(error) => {
                let message = format!("{error:#}");
                warn!(source = %source, error = %message, "failed to process input");
                entries.push(BatchEntry {
                    source,
                    sha256: None,
                    output: None,
                    title: None,
                    heading_count: 0,
                    status: "failed".to_string(),
                    error: Some(message),
                });
            }
        }
    }

    let processed_count = entries
        .iter()
        .filter(|entry| entry.status == "processed")
        .count();
    let manifest = BatchRunManifest {
        manifest_version: 1,
        run_id,
        started_at: utc_rfc3339_string(started_ts),
        generated_at: utc_rfc3339_string(Utc::now()),
        input_directory: args.input_dir.display().to_string(),
        output_directory: args.output_dir.display().to_string(),
        input_format: args.format.as_str().to_string(),
        input_count: inputs.len(),
        processed_count,
        failed_count: entries.len() - processed_count,
        entries,
    };

    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        args.output_dir.join("manifests").join(format!(
            "outline_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });
    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %manifest_path.display(), "wrote batch manifest");
    info!(
        processed = manifest.processed_count,
        failed = manifest.failed_count,
        output_dir = %args.output_dir.display(),
        "batch completed"
    );

    Ok(())
}

fn process_input(
    builder: &OutlineBuilder,
    path: &Path,
    output_dir: &Path,
    format: InputFormat,
) -> Result<ProcessedInput> {
    let output_path = output_path_for(output_dir, path)?;
    if output_path == path {
        bail!("output would overwrite input: {}", path.display());
    }

    let sha256 = sha256_file(path)?;
    let result = extract_file(builder, path, format)?;
    write_json_pretty(&output_path, &result)?;

    Ok(ProcessedInput {
        sha256,
        output_path,
        result,
    })
}

fn discover_inputs(input_dir: &Path, format: InputFormat) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        if accepts_extension(&path, format) {
            inputs.push(path);
        }
    }

    inputs.sort();
    Ok(inputs)
}

fn accepts_extension(path: &Path, format: InputFormat) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    let matches = |allowed: &[&str]| {
        allowed
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    };

    match format {
        InputFormat::Json => matches(JSON_EXTENSIONS),
        InputFormat::Text => matches(TEXT_EXTENSIONS),
        InputFormat::Auto => matches(JSON_EXTENSIONS) || matches(TEXT_EXTENSIONS),
    }
}

fn output_path_for(output_dir: &Path, input_path: &Path) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("invalid UTF-8 filename: {}", input_path.display()))?;

    Ok(output_dir.join(format!("{stem}.json")))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
