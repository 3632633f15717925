//! Run tokenizer
//!
//! Splits text into typed runs: a maximal run of letters, a maximal run of
//! digits, a maximal run of whitespace, or a single other character. The
//! tokens partition the input exactly, so concatenating their text gives the
//! input back and every character belongs to exactly one token.

use serde::Serialize;

use crate::mapping::CharSpan;

/// Kind of run a token was cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Letters,
    Digits,
    Whitespace,
    Other,
}

impl TokenKind {
    /// Runs of this kind absorb following chars of the same kind
    fn extends(self) -> bool {
        !matches!(self, TokenKind::Other)
    }
}

/// Represents a single token with its position in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text
    pub text: String,

    pub kind: TokenKind,

    /// Span in UTF-16 code units
    pub span: CharSpan,

    /// Span in UTF-8 bytes, for slicing the source
    pub byte_span: CharSpan,

    /// Token index in the sequence
    pub index: usize,
}

impl Token {
    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }
}

fn classify_char(ch: char) -> TokenKind {
    // Letter-like numerals (Nl) are alphabetic and numeric at once; they and
    // non-decimal numbers stay single other-char tokens
    if ch.is_alphabetic() && !ch.is_numeric() {
        TokenKind::Letters
    } else if ch.is_ascii_digit() {
        TokenKind::Digits
    } else if ch.is_whitespace() {
        TokenKind::Whitespace
    } else {
        TokenKind::Other
    }
}

/// Tokenize `text` into letter, digit, whitespace and single-char runs
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current: Option<(TokenKind, usize, usize)> = None;
    let mut unit = 0;

    for (pos, ch) in text.char_indices() {
        let kind = classify_char(ch);

        match current {
            Some((prev, _, _)) if prev == kind && kind.extends() => {
                // Continue current run
            }
            Some((prev, byte_start, unit_start)) => {
                tokens.push(create_token(text, prev, byte_start, pos, unit_start, unit, tokens.len()));
                current = Some((kind, pos, unit));
            }
            None => {
                current = Some((kind, pos, unit));
            }
        }

        unit += ch.len_utf16();
    }

    if let Some((kind, byte_start, unit_start)) = current {
        tokens.push(create_token(text, kind, byte_start, text.len(), unit_start, unit, tokens.len()));
    }

    tokens
}

fn create_token(
    text: &str,
    kind: TokenKind,
    byte_start: usize,
    byte_end: usize,
    unit_start: usize,
    unit_end: usize,
    index: usize,
) -> Token {
    Token {
        text: text[byte_start..byte_end].to_string(),
        kind,
        span: CharSpan::new(unit_start, unit_end),
        byte_span: CharSpan::new(byte_start, byte_end),
        index,
    }
}

/// Token texts, in order, for feeding the sequence matcher
pub fn token_texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// UTF-16 span covered by `tokens[range]`
///
/// An empty range maps to a point at the start of the token that follows it,
/// or at `text_len` when the range sits at the end of the sequence.
pub fn range_span(tokens: &[Token], range: std::ops::Range<usize>, text_len: usize) -> CharSpan {
    if range.start < range.end {
        CharSpan::new(tokens[range.start].span.start, tokens[range.end - 1].span.end)
    } else {
        CharSpan::point(tokens.get(range.start).map_or(text_len, |t| t.span.start))
    }
}

/// Byte span covered by `tokens[range]`, with the same empty-range rule as
/// [`range_span`]
pub fn range_byte_span(tokens: &[Token], range: std::ops::Range<usize>, text_len: usize) -> CharSpan {
    if range.start < range.end {
        CharSpan::new(tokens[range.start].byte_span.start, tokens[range.end - 1].byte_span.end)
    } else {
        CharSpan::point(tokens.get(range.start).map_or(text_len, |t| t.byte_span.start))
    }
}
