//! Fixed-ratio token/character conversion and chunking
//!
//! This is a heuristic, not a tokenizer: one token is taken to be four
//! characters. Character counts are Unicode scalar values, so chunks never
//! split a multi-byte sequence.

/// Characters assumed per token
pub const CHARS_PER_TOKEN: usize = 4;

/// `floor(char_count / 4)`
pub fn chars_to_tokens(char_count: usize) -> usize {
    char_count / CHARS_PER_TOKEN
}

/// `token_count * 4`
pub fn tokens_to_chars(token_count: usize) -> usize {
    token_count.saturating_mul(CHARS_PER_TOKEN)
}

/// Cut `content` into consecutive pieces of `tokens_to_chars(target_tokens)`
/// characters; the last piece holds the remainder.
///
/// A zero target means no splitting: non-empty content comes back whole.
pub fn chunkify(content: &str, target_tokens: usize) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }

    let width = tokens_to_chars(target_tokens);
    if width == 0 {
        return vec![content.to_string()];
    }

    let mut chunks = Vec::with_capacity(content.len() / width + 1);
    let mut start = 0;
    let mut chars_in_chunk = 0;

    for (idx, _) in content.char_indices() {
        if chars_in_chunk == width {
            chunks.push(content[start..idx].to_string());
            start = idx;
            chars_in_chunk = 0;
        }
        chars_in_chunk += 1;
    }
    chunks.push(content[start..].to_string());

    chunks
}

/// Token estimator trait for different tokenization strategies
pub trait TokenEstimator: Send + Sync {
    /// Estimate the number of tokens in the given text
    fn estimate(&self, text: &str) -> usize;

    /// Estimate tokens for multiple texts
    fn estimate_batch(&self, texts: &[&str]) -> Vec<usize> {
        texts.iter().map(|t| self.estimate(t)).collect()
    }
}

/// Four characters per token
#[derive(Debug, Clone, Copy, Default)]
pub struct CharRatioEstimator;

impl TokenEstimator for CharRatioEstimator {
    fn estimate(&self, text: &str) -> usize {
        chars_to_tokens(text.chars().count())
    }
}
