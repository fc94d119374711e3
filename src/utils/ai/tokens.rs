//! Token estimation for scheduler budgeting
//!
//! Estimates only. The scheduler never measures real usage, so these numbers
//! just need to be stable and err on the high side.

pub struct TokenUtils;

impl TokenUtils {
    /// Characters per token for English prose
    const CHARS_PER_TOKEN: f64 = 4.0;
    /// Tokens per whitespace-separated word
    const TOKENS_PER_WORD: f64 = 1.3;

    /// Larger of the character-based and word-based estimates
    pub fn estimate_tokens(text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }

        let by_chars = (text.chars().count() as f64 / Self::CHARS_PER_TOKEN).ceil();
        let by_words = (text.split_whitespace().count() as f64 * Self::TOKENS_PER_WORD).ceil();
        by_chars.max(by_words).min(u32::MAX as f64) as u32
    }

    /// Estimate for several texts, each cut to at most `max_chars` characters
    pub fn estimate_truncated<'a, I>(texts: I, max_chars: usize) -> u32
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts
            .into_iter()
            .map(|text| Self::estimate_tokens(Self::truncate_chars(text, max_chars)))
            .fold(0u32, u32::saturating_add)
    }

    /// Prefix of `text` holding at most `max_chars` characters
    pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
        match text.char_indices().nth(max_chars) {
            Some((index, _)) => &text[..index],
            None => text,
        }
    }
}
