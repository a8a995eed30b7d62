use once_cell::sync::Lazy;
use tiktoken_rs::{cl100k_base, CoreBPE};

/// Shared cl100k tokenizer. `None` when the BPE ranks fail to load.
pub(crate) static TOKENIZER: Lazy<Option<CoreBPE>> = Lazy::new(|| cl100k_base().ok());

/// Token count, falling back to a whitespace word count without a tokenizer.
pub fn count_tokens(text: &str) -> usize {
    match TOKENIZER.as_ref() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => text.split_whitespace().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens() {
        assert_eq!(count_tokens(""), 0);
        assert!(count_tokens("hello world") >= 2);
    }
}
