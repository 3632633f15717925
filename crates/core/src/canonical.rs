//! Canonical text preparation
//!
//! All offsets in this crate are measured against canonical text: line
//! endings unified to `\n` and Unicode normalized to NFC. Callers that hold
//! raw user input run it through [`canonicalize`] once and then treat the
//! result as ground truth.

use unicode_normalization::UnicodeNormalization;

/// Unify line endings and apply NFC normalization
pub fn canonicalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    unified.nfc().collect()
}

/// Whether `text` is already canonical
pub fn is_canonical(text: &str) -> bool {
    !text.contains('\r') && unicode_normalization::is_nfc(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_endings() {
        assert_eq!(canonicalize("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_composes_combining_marks() {
        let decomposed = "nin\u{0303}o";
        let result = canonicalize(decomposed);
        assert_eq!(result, "niño");
        assert_eq!(result.chars().count(), 4);
    }

    #[test]
    fn test_is_canonical() {
        assert!(is_canonical("El niño paso a la tienda."));
        assert!(!is_canonical("nin\u{0303}o"));
        assert!(!is_canonical("a\r\nb"));
        assert!(is_canonical(&canonicalize("nin\u{0303}o\r\n")));
    }
}
