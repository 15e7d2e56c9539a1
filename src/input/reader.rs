use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Upper bound for text piped through stdin.
pub const MAX_STDIN_SIZE: usize = 1024 * 1024; // 1MB

/// Upper bound for files handed to the file translator.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB

const UTF8_BOM: char = '\u{feff}';

pub struct InputReader;

impl InputReader {
    /// Reads all of stdin as UTF-8, refusing more than [`MAX_STDIN_SIZE`] bytes.
    #[allow(clippy::significant_drop_tightening)]
    pub fn read_stdin() -> Result<String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];
        let mut stdin = io::stdin().lock();

        loop {
            let bytes_read = stdin
                .read(&mut chunk)
                .context("Failed to read from stdin")?;

            if bytes_read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);

            if buffer.len() > MAX_STDIN_SIZE {
                bail!(
                    "Input size ({}) exceeds maximum allowed size ({}).\n\n\
                     Write the text to a file and use --file instead.",
                    format_size(buffer.len()),
                    format_size(MAX_STDIN_SIZE)
                );
            }
        }

        let text = String::from_utf8(buffer).context("Input is not valid UTF-8")?;
        Ok(strip_bom(text))
    }

    /// Reads a UTF-8 text file of at most `max_size` bytes, dropping a leading BOM.
    pub fn read_file(path: &Path, max_size: usize) -> Result<String> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to access file: {}", path.display()))?;

        if !metadata.is_file() {
            bail!("Not a regular file: {}", path.display());
        }

        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max_size {
            bail!(
                "File size ({}) exceeds maximum allowed size ({}).\n\n\
                 Consider splitting the file into smaller parts.",
                format_size(size),
                format_size(max_size)
            );
        }

        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        let text = String::from_utf8(bytes)
            .with_context(|| format!("File is not valid UTF-8: {}", path.display()))?;
        Ok(strip_bom(text))
    }
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: usize) -> String {
    let mb = bytes as f64 / 1024.0 / 1024.0;
    if mb >= 0.1 {
        format!("{mb:.1} MB")
    } else {
        format!("{bytes} bytes")
    }
}
