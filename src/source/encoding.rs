//! Ordered text decoding for source files.
//!
//! Source trees submitted for registration are frequently a mix of UTF-8 and
//! legacy Chinese code pages, so each file is tried against a fixed list of
//! candidate encodings and the first strict decode wins. A decode is strict when
//! it would need no replacement characters; `latin-1` maps every byte and so
//! never fails, which makes it the natural last resort.

use std::borrow::Cow;
use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TextEncoding {
    Utf8,
    Gbk,
    Gb2312,
    Latin1,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Gbk => "gbk",
            TextEncoding::Gb2312 => "gb2312",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// The fallback order used when nothing else is configured.
    pub fn defaults() -> &'static [TextEncoding] {
        &[
            TextEncoding::Utf8,
            TextEncoding::Gbk,
            TextEncoding::Gb2312,
            TextEncoding::Latin1,
        ]
    }

    /// Decode `bytes` without substituting replacement characters.
    ///
    /// Returns `None` if the bytes are not valid in this encoding. A UTF-8 byte
    /// order mark is kept as content rather than stripped.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            TextEncoding::Utf8 => {
                encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
            }
            // encoding_rs decodes both labels with its gb18030 decoder, which also
            // takes a lone 0x80 and four-byte sequences; those are rejected here
            TextEncoding::Gbk => {
                let trail = |b: u8| (0x40..=0xFE).contains(&b) && b != 0x7F;
                if !is_double_byte(bytes, 0x81..=0xFE, trail) {
                    return None;
                }
                encoding_rs::GBK.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::Gb2312 => {
                if !is_double_byte(bytes, 0xA1..=0xF7, |b: u8| (0xA1..=0xFE).contains(&b)) {
                    return None;
                }
                encoding_rs::GBK.decode_without_bom_handling_and_without_replacement(bytes)
            }
            // ISO-8859-1 maps each byte to the code point of the same value;
            // encoding_rs only offers the windows-1252 superset under that label
            TextEncoding::Latin1 => Some(Cow::Owned(
                bytes.iter().copied().map(char::from).collect(),
            )),
        }
    }
}

/// Whether `bytes` is ASCII mixed with two-byte characters whose lead and trail
/// bytes fall in the given ranges.
fn is_double_byte(
    bytes: &[u8],
    lead: std::ops::RangeInclusive<u8>,
    trail: impl Fn(u8) -> bool,
) -> bool {
    let mut rest = bytes;
    while let Some((&first, tail)) = rest.split_first() {
        if first.is_ascii() {
            rest = tail;
            continue;
        }
        if !lead.contains(&first) {
            return false;
        }
        match tail.split_first() {
            Some((&second, tail)) if trail(second) => rest = tail,
            _ => return false,
        }
    }
    true
}

/// Try each candidate in order, returning the decoded text and the encoding that
/// produced it. `None` means every candidate rejected the bytes.
pub fn decode_first<'a>(
    bytes: &'a [u8],
    candidates: &[TextEncoding],
) -> Option<(Cow<'a, str>, TextEncoding)> {
    candidates
        .iter()
        .find_map(|encoding| encoding.decode(bytes).map(|text| (text, *encoding)))
}
