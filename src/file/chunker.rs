//! Splits long text into provider-sized pieces.

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Splits `text` into chunks of at most `chunk_size` characters.
///
/// Each chunk ends after the last sentence terminator (`.`, `!`, `?`) that
/// fits; failing that, after the last whitespace character; failing that, at
/// exactly `chunk_size` characters. Concatenating the chunks yields `text`
/// unchanged. Empty input yields no chunks. A `chunk_size` of zero is treated
/// as one.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let Some((window_end, _)) = rest.char_indices().nth(chunk_size) else {
            chunks.push(rest.to_string());
            break;
        };
        let window = &rest[..window_end];
        let split = sentence_boundary(window)
            .or_else(|| word_boundary(window))
            .unwrap_or(window_end);

        let (chunk, tail) = rest.split_at(split);
        chunks.push(chunk.to_string());
        rest = tail;
    }

    chunks
}

/// Byte offset just past the last sentence terminator in `window`.
fn sentence_boundary(window: &str) -> Option<usize> {
    window.rfind(SENTENCE_TERMINATORS).map(|i| i + 1)
}

/// Byte offset just past the last whitespace character in `window`.
fn word_boundary(window: &str) -> Option<usize> {
    window
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
}
