//! Text tokenization shared by the scorer and highlighter.
//!
//! A token is a maximal run of ASCII alphanumeric characters, lowercased.
//! Everything else (punctuation, hyphens, non-ASCII letters) separates
//! tokens, so `"Zero-shot RL"` yields `["zero", "shot", "rl"]`.

use std::collections::HashSet;

/// Split `text` into lowercase alphanumeric tokens, in occurrence order.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            current.push(ch.to_ascii_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Distinct tokens of `text`.
pub fn unique_tokens(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_lowercases() {
        assert_eq!(
            tokenize("Zero-shot RL, revisited!"),
            vec!["zero", "shot", "rl", "revisited"]
        );
    }

    #[test]
    fn digits_are_part_of_tokens() {
        assert_eq!(tokenize("GPT-4 beats gpt4?"), vec!["gpt", "4", "beats", "gpt4"]);
    }

    #[test]
    fn non_ascii_letters_separate_tokens() {
        // Accented characters are not ASCII alphanumerics and act as breaks.
        assert_eq!(tokenize("naïve café"), vec!["na", "ve", "caf"]);
    }

    #[test]
    fn empty_and_symbol_only_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("--- !!! ...").is_empty());
    }

    #[test]
    fn unique_tokens_drops_duplicates() {
        let set = unique_tokens("graph graphs graph");
        assert_eq!(set.len(), 2);
        assert!(set.contains("graph"));
        assert!(set.contains("graphs"));
    }
}
