use crate::utils::{Result, TabularIoError};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Character encodings the delimited reader knows how to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Codec {
    Utf8,
    Latin1,
    Ascii,
    Utf16,
    Utf32,
}

/// Tried after the caller's preferred codec, in this order.
pub const DEFAULT_FALLBACKS: [Codec; 5] = [
    Codec::Utf8,
    Codec::Latin1,
    Codec::Ascii,
    Codec::Utf16,
    Codec::Utf32,
];

impl Codec {
    pub fn name(&self) -> &'static str {
        match self {
            Codec::Utf8 => "utf8",
            Codec::Latin1 => "iso-8859-1",
            Codec::Ascii => "ascii",
            Codec::Utf16 => "utf-16",
            Codec::Utf32 => "utf-32",
        }
    }

    /// Strict decode. `None` means the bytes are not valid in this encoding;
    /// nothing is ever replaced with U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Codec::Utf8 => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8
                    .decode_without_bom_handling_and_without_replacement(body)
                    .map(|s| s.into_owned())
            }
            Codec::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes).into_owned()),
            Codec::Ascii => {
                if encoding_rs::mem::is_ascii(bytes) {
                    Some(encoding_rs::mem::decode_latin1(bytes).into_owned())
                } else {
                    None
                }
            }
            Codec::Utf16 => {
                let (encoding, skip) = match Encoding::for_bom(bytes) {
                    Some((enc, len)) if enc == UTF_16LE || enc == UTF_16BE => (enc, len),
                    _ => (UTF_16LE, 0),
                };
                encoding
                    .decode_without_bom_handling_and_without_replacement(&bytes[skip..])
                    .map(|s| s.into_owned())
            }
            Codec::Utf32 => decode_utf32(bytes),
        }
    }
}

fn decode_utf32(bytes: &[u8]) -> Option<String> {
    let (body, big_endian) = if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE, 0x00, 0x00]) {
        (rest, false)
    } else if let Some(rest) = bytes.strip_prefix(&[0x00, 0x00, 0xFE, 0xFF]) {
        (rest, true)
    } else {
        (bytes, false)
    };

    if body.len() % 4 != 0 {
        return None;
    }

    body.chunks_exact(4)
        .map(|unit| {
            let unit = [unit[0], unit[1], unit[2], unit[3]];
            let value = if big_endian {
                u32::from_be_bytes(unit)
            } else {
                u32::from_le_bytes(unit)
            };
            char::from_u32(value)
        })
        .collect()
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Codec {
    type Err = TabularIoError;

    fn from_str(label: &str) -> Result<Self> {
        let normalized: String = label
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| *c != '-' && *c != '_' && *c != ' ')
            .collect();

        match normalized.as_str() {
            "utf8" | "u8" => Ok(Codec::Utf8),
            "iso88591" | "latin1" | "l1" | "cp819" | "iso8859" => Ok(Codec::Latin1),
            "ascii" | "usascii" | "646" => Ok(Codec::Ascii),
            "utf16" | "u16" => Ok(Codec::Utf16),
            "utf32" | "u32" => Ok(Codec::Utf32),
            _ => Err(TabularIoError::UnknownEncoding(label.to_string())),
        }
    }
}

/// Ordered, de-duplicated list of codecs to try: `preferred` first, then
/// `fallbacks` in their given order.
pub fn candidates(preferred: Codec, fallbacks: &[Codec]) -> Vec<Codec> {
    let mut list = Vec::with_capacity(fallbacks.len() + 1);
    for codec in std::iter::once(preferred).chain(fallbacks.iter().copied()) {
        if !list.contains(&codec) {
            list.push(codec);
        }
    }
    list
}
