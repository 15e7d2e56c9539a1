//! Chunked translation of whole text files.

mod chunker;
mod translator;

pub use chunker::chunk_text;
pub use translator::{FileSummary, FileTranslator};
