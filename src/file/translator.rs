use anyhow::Result;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::chunker::chunk_text;
use crate::error::TranslateError;
use crate::fs::atomic_write;
use crate::input::{InputReader, MAX_FILE_SIZE};
use crate::translation::{
    AUTO, FALLBACK_LANGUAGE, Pipeline, TranslationResult, now_timestamp, validate_source,
    validate_target,
};

/// Outcome of a file translation.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub total_chars: usize,
    pub total_lines: usize,
    pub elapsed_seconds: f64,
    pub success: bool,
    pub chunks_completed: usize,
    pub chunks_total: usize,
    pub resolved_source: Option<String>,
    /// Set when a chunk failed; no output was written in that case.
    pub failure: Option<TranslateError>,
}

/// Translates whole files chunk by chunk through a [`Pipeline`].
///
/// Chunks are translated strictly in order. The output file is only written
/// once every chunk has succeeded.
pub struct FileTranslator<'a> {
    pipeline: &'a Pipeline,
    chunk_size: usize,
}

impl<'a> FileTranslator<'a> {
    /// `chunk_size` is capped at the pipeline's maximum text length.
    pub fn new(pipeline: &'a Pipeline, chunk_size: usize) -> Self {
        Self {
            pipeline,
            chunk_size: chunk_size.clamp(1, pipeline.max_text_length().max(1)),
        }
    }

    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Translates `input` into `output`.
    ///
    /// `on_progress` is called with `(completed, total)` before the first
    /// chunk and after each one. I/O and argument problems are returned as
    /// errors; a provider failure mid-file is reported through the summary.
    pub async fn translate_file<F>(
        &self,
        input: &Path,
        output: &Path,
        source: &str,
        target: &str,
        mut on_progress: F,
    ) -> Result<FileSummary>
    where
        F: FnMut(usize, usize),
    {
        let started = Instant::now();
        let target = validate_target(target)?;
        let source = validate_source(source)?;
        if source != AUTO && source == target {
            return Err(TranslateError::validation(format!(
                "Source and target language are both '{source}'"
            ))
            .into());
        }

        let text = InputReader::read_file(input, MAX_FILE_SIZE)?;
        let chunks = chunk_text(&text, self.chunk_size);
        info!(
            input = %input.display(),
            chars = text.chars().count(),
            chunks = chunks.len(),
            "translating file"
        );

        let mut summary = FileSummary {
            total_chars: text.chars().count(),
            total_lines: text.lines().count(),
            elapsed_seconds: 0.0,
            success: false,
            chunks_completed: 0,
            chunks_total: chunks.len(),
            resolved_source: (source != AUTO).then(|| source.to_string()),
            failure: None,
        };

        on_progress(0, chunks.len());
        let mut translated = String::with_capacity(text.len());
        for (index, chunk) in chunks.iter().enumerate() {
            match self
                .translate_chunk(chunk, &mut summary.resolved_source, target)
                .await
            {
                Ok(piece) => translated.push_str(&piece),
                Err(e) => {
                    warn!(chunk = index + 1, total = chunks.len(), error = %e, "file translation aborted");
                    summary.failure = Some(e);
                    summary.elapsed_seconds = started.elapsed().as_secs_f64();
                    return Ok(summary);
                }
            }
            summary.chunks_completed = index + 1;
            on_progress(summary.chunks_completed, chunks.len());
        }

        atomic_write(output, &translated)?;
        summary.success = true;
        summary.elapsed_seconds = started.elapsed().as_secs_f64();

        let result = TranslationResult {
            translated_text: format!("[file] {}", output.display()),
            resolved_source: summary
                .resolved_source
                .clone()
                .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string()),
            target: target.to_string(),
            confidence: None,
            provider: self.pipeline.provider(),
            timestamp: now_timestamp(),
        };
        self.pipeline
            .record(&format!("[file] {}", input.display()), &result);

        Ok(summary)
    }

    /// Translates one chunk, keeping its surrounding whitespace.
    ///
    /// The first chunk with content is translated from `auto`; the source the
    /// pipeline resolves for it is reused for the rest of the file.
    async fn translate_chunk(
        &self,
        chunk: &str,
        resolved_source: &mut Option<String>,
        target: &str,
    ) -> Result<String, TranslateError> {
        let core = chunk.trim();
        if core.is_empty() {
            return Ok(chunk.to_string());
        }

        let body = match resolved_source.clone() {
            Some(source) if source == target => {
                debug!(language = target, "chunk already in target language");
                core.to_string()
            }
            Some(source) => {
                self.pipeline
                    .translate_segment(core, &source, target)
                    .await?
                    .translated_text
            }
            None => {
                let result = self.pipeline.translate_segment(core, AUTO, target).await?;
                *resolved_source = Some(result.resolved_source);
                result.translated_text
            }
        };

        let leading = &chunk[..chunk.len() - chunk.trim_start().len()];
        let trailing = &chunk[chunk.trim_end().len()..];
        Ok(format!("{leading}{body}{trailing}"))
    }
}
