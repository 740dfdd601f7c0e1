use std::fmt;
use std::fmt::{Display, Formatter};

use encoding_rs::{UTF_8, WINDOWS_1252};
use serde::Deserialize;
use tracing::debug;

use crate::decoder::DecodeError;

/// Text encodings the decoder knows how to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SourceEncoding {
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
    #[serde(rename = "windows-1252", alias = "cp1252")]
    Windows1252
}

impl SourceEncoding {
    /// Default fallback order: a universal encoding first, then two legacy single-byte ones.
    pub const DEFAULT_ORDER: [SourceEncoding; 3] = [Self::Utf8, Self::Latin1, Self::Windows1252];

    /// Strictly decodes `bytes`, returning `None` if any byte sequence is invalid.
    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => {
                let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
                (!had_errors).then(|| text.into_owned())
            }
            //NOTE: Latin-1 assigns every byte to the code point of the same value, so it cannot fail
            Self::Latin1 => Some(bytes.iter().map(|&byte| char::from(byte)).collect()),
            Self::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned())
        }
    }
}

impl Display for SourceEncoding {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Windows1252 => "windows-1252"
        };
        formatter.write_str(name)
    }
}

/// Text produced by a successful decode, tagged with the encoding that worked.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub encoding: SourceEncoding
}

/// One non-blank delimited line of decoded input.
#[derive(Debug, Clone)]
pub struct RawLine {
    /// 1-based physical line number.
    pub line_number: u64,
    /// Byte offset of the line start within the decoded text.
    pub byte_offset: u64,
    /// Whitespace-trimmed fields.
    pub fields: Vec<String>
}

impl Decoded {
    /// Splits the text into delimited lines, skipping blank ones.
    ///
    /// There is no quoting: stray quote characters in a product name are data.
    pub fn raw_lines(&self, delimiter: char) -> Vec<RawLine> {
        let mut lines = Vec::new();
        let mut byte_offset = 0u64;

        for (index, line) in self.text.split_inclusive('\n').enumerate() {
            let start = byte_offset;
            byte_offset += line.len() as u64;

            let content = line.trim_end_matches(['\r', '\n']);

            if content.trim().is_empty() {
                continue;
            }

            lines.push(RawLine {
                line_number: index as u64 + 1,
                byte_offset: start,
                fields: content.split(delimiter).map(|field| field.trim().to_string()).collect()
            });
        }

        debug!("Split decoded input into {} non-blank lines", lines.len());

        lines
    }
}

/// Decodes `bytes` with the first candidate that accepts them.
///
/// Candidates are tried strictly in order; no detection happens beyond the list,
/// so the same bytes and list always produce the same result.
pub fn decode(bytes: &[u8], candidates: &[SourceEncoding]) -> Result<Decoded, DecodeError> {
    if candidates.is_empty() {
        return Err(DecodeError::NoCandidates);
    }

    for &encoding in candidates {
        match encoding.decode(bytes) {
            Some(text) => {
                debug!("Decoded {} bytes using {encoding}", bytes.len());
                return Ok(Decoded { text, encoding });
            }
            None => {
                debug!("Input is not valid {encoding}, trying next candidate");
            }
        }
    }

    Err(DecodeError::Exhausted { attempted: candidates.to_vec() })
}
