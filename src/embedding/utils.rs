use std::io;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};

use crate::embedding::clip::TOKENIZER_FILE;

/// Loads `tokenizer.json` with truncation at `max_len` tokens.
///
/// `path` may be the tokenizer file itself or the model directory containing it.
pub fn load_tokenizer_with_truncation(path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let tokenizer_path = if path.is_dir() {
        path.join(TOKENIZER_FILE)
    } else {
        path.to_path_buf()
    };

    let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    Ok(tokenizer)
}

/// Right-pads every sequence with `pad_id` to the length of the longest one.
///
/// Returns the padded rows and their common width.
pub fn pad_sequences(mut rows: Vec<Vec<u32>>, pad_id: u32) -> (Vec<Vec<u32>>, usize) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, pad_id);
    }
    (rows, width)
}
