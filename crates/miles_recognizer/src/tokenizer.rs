//! Input tokenization.
//!
//! Splits a command string on whitespace. The punctuation marks `,` `.` `:`
//! and `;` always form tokens of their own, whether or not whitespace
//! surrounds them. Case is preserved; analyzers compare case-insensitively.

/// Characters that are always emitted as single-character tokens.
pub const SEPARATORS: [char; 4] = [',', '.', ':', ';'];

/// Tokenizes command strings.
pub struct Tokenizer;

impl Tokenizer {
    /// Tokenizes a raw input string.
    #[must_use]
    pub fn tokenize(input: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();

        for ch in input.trim().chars() {
            if ch.is_whitespace() {
                Self::flush(&mut tokens, &mut current);
            } else if SEPARATORS.contains(&ch) {
                Self::flush(&mut tokens, &mut current);
                tokens.push(ch.to_string());
            } else {
                current.push(ch);
            }
        }
        Self::flush(&mut tokens, &mut current);
        tokens
    }

    fn flush(tokens: &mut Vec<String>, current: &mut String) {
        if !current.is_empty() {
            tokens.push(std::mem::take(current));
        }
    }
}
