use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::{build_pipeline, load_resolved};
use crate::config::ResolveOptions;
use crate::file::FileTranslator;
use crate::status;
use crate::ui::{ChunkProgress, Style};

pub struct FileOptions {
    pub input: PathBuf,
    /// Defaults to `<name>.<target>.<ext>` next to the input.
    pub output: Option<PathBuf>,
    pub resolve: ResolveOptions,
}

pub async fn run_file(options: FileOptions) -> Result<()> {
    let resolved = load_resolved(&options.resolve)?;
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&options.input, &resolved.target));
    let pipeline = build_pipeline(&resolved)?;
    let translator = FileTranslator::new(&pipeline, resolved.chunk_size);

    let label = options
        .input
        .file_name()
        .map_or_else(|| options.input.display().to_string(), |n| n.to_string_lossy().into_owned());
    let progress = ChunkProgress::new(&format!("Translating {label}"));
    let summary = translator
        .translate_file(
            &options.input,
            &output,
            &resolved.source,
            &resolved.target,
            |done, total| progress.update(done, total),
        )
        .await?;
    progress.finish();

    if let Some(failure) = summary.failure {
        return Err(anyhow::Error::new(failure)).with_context(|| {
            format!(
                "Translation stopped after {} of {} chunks; no output was written",
                summary.chunks_completed, summary.chunks_total
            )
        });
    }

    status!(
        "{} Translated {} characters ({} lines, {} chunks) in {:.1}s",
        Style::success("✓"),
        summary.total_chars,
        summary.total_lines,
        summary.chunks_total,
        summary.elapsed_seconds
    );
    status!(
        "  {} {}",
        Style::label("saved to"),
        Style::value(output.display())
    );
    Ok(())
}

/// `notes.md` translated to `es` becomes `notes.es.md` in the same directory.
pub fn default_output_path(input: &Path, target: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "translation".into(), |s| s.to_string_lossy());
    let name = match input.extension() {
        Some(ext) => format!("{stem}.{target}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{target}"),
    };
    input.with_file_name(name)
}
