//! Tolerant base64 decoding for tool-call payloads.
//!
//! Tool transcripts carry their calls and results as base64 blobs embedded
//! in message text. Payloads that arrive truncated, unpadded, or not base64
//! at all must still render, so decoding never fails: anything that cannot
//! be decoded to UTF-8 text is passed through unchanged.

use base64::prelude::{BASE64_STANDARD, BASE64_STANDARD_NO_PAD};
use base64::Engine;

/// Decode standard base64 to text, returning the input unchanged when the
/// payload is not decodable.
///
/// Whitespace is stripped before decoding (fragments split out of a
/// transcript keep the whitespace that followed their marker), and unpadded
/// payloads are accepted.
pub fn safe_base64_decode(input: &str) -> String {
    let compact: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let decoded = BASE64_STANDARD
        .decode(compact.as_bytes())
        .or_else(|_| BASE64_STANDARD_NO_PAD.decode(compact.trim_end_matches('=').as_bytes()));

    match decoded {
        Ok(bytes) => String::from_utf8(bytes).unwrap_or_else(|_| input.to_string()),
        Err(_) => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_standard_base64() {
        assert_eq!(safe_base64_decode("aGVsbG8="), "hello");
    }

    #[test]
    fn decodes_unpadded_base64() {
        assert_eq!(safe_base64_decode("aGVsbG8"), "hello");
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        assert_eq!(safe_base64_decode("  aGVsbG8=\n"), "hello");
    }

    #[test]
    fn passes_through_invalid_base64() {
        assert_eq!(safe_base64_decode("not base64!!!"), "not base64!!!");
    }

    #[test]
    fn passes_through_non_utf8_payloads() {
        // 0xff 0xfe is valid base64 but not valid UTF-8.
        assert_eq!(safe_base64_decode("//4="), "//4=");
    }

    #[test]
    fn empty_input_decodes_to_empty() {
        assert_eq!(safe_base64_decode(""), "");
    }
}
