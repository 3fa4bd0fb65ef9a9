//! Tag string handling.

use crate::core::io::BufStream;
use log::warn;
use std::convert::TryFrom;

/// A text encoding for in-band tag strings.
///
/// The wire representation of an encoding is the byte value that identifies it in a
/// frame body, handled by the frame encoding codec. ID3v2.2 and ID3v2.3 only allow
/// [`Latin1`](Encoding::Latin1) and [`Utf16`](Encoding::Utf16), while ID3v2.4 allows
/// all four.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Encoding {
    /// ISO-8859-1, also known as Latin1. All Unicode text outside of the Latin1 range
    /// will be flattened into "?" characters when written with this encoding.
    Latin1,
    /// UTF-16 with a BOM. In practice, this will be UTF-16LE with a `0xFFFE` BOM.
    Utf16,
    /// UTF-16BE with no BOM. This is only allowed in ID3v2.4.
    Utf16Be,
    /// UTF-8. This is only allowed in ID3v2.4.
    Utf8,
}

impl Encoding {
    /// The length of this encoding's NUL terminator, in bytes.
    pub(crate) fn nul_size(&self) -> usize {
        match self {
            Self::Utf8 | Self::Latin1 => 1,
            _ => 2,
        }
    }
}

/// Consumes the rest of this stream and decodes it into a string according
/// to the encoding.
pub(crate) fn read(encoding: Encoding, stream: &mut BufStream) -> String {
    decode(encoding, stream.take_rest())
}

/// Searches and consumes the stream up until a NUL terminator and decodes it into a
/// string according to the encoding. The string will not include the terminator.
pub(crate) fn read_terminated(encoding: Encoding, stream: &mut BufStream) -> String {
    // The terminator is a lone NUL for the byte-wide encodings but a NUL code unit
    // for UTF-16, so the search has to stay aligned to the unit width.
    let data = match encoding.nul_size() {
        1 => stream.search(&[0]),
        _ => stream.search(&[0, 0]),
    };

    decode(encoding, data)
}

/// Renders a string according to the encoding.
pub(crate) fn render(encoding: Encoding, string: &str) -> Vec<u8> {
    match encoding {
        Encoding::Latin1 => encode_latin1(string),
        Encoding::Utf16 => encode_utf16(string),
        Encoding::Utf16Be => encode_utf16be(string),
        Encoding::Utf8 => string.as_bytes().to_vec(),
    }
}

/// Renders a string plus a NUL terminator according to the encoding.
pub(crate) fn render_terminated(encoding: Encoding, string: &str) -> Vec<u8> {
    let mut result = render(encoding, string);

    result.extend(std::iter::repeat(0).take(encoding.nul_size()));

    result
}

fn decode(encoding: Encoding, data: &[u8]) -> String {
    // BufStream::search hands back the terminator along with the string data, and
    // plenty of taggers terminate even the final string of a frame body where no
    // terminator is needed. Either way, the NUL is not part of the text.
    let data = strip_terminator(encoding, data);

    // Every caller ends up owning its text, so decoding copies unconditionally.
    match encoding {
        Encoding::Latin1 => decode_latin1(data),
        Encoding::Utf16 => decode_utf16(data),
        Encoding::Utf16Be => decode_utf16_units(data, u16::from_be_bytes),
        Encoding::Utf8 => String::from_utf8_lossy(data).to_string(),
    }
}

fn strip_terminator(encoding: Encoding, data: &[u8]) -> &[u8] {
    match encoding.nul_size() {
        1 => data.strip_suffix(&[0]).unwrap_or(data),
        _ => data.strip_suffix(&[0, 0]).unwrap_or(data),
    }
}

fn decode_latin1(data: &[u8]) -> String {
    // Latin1 occupies the first 256 code points of Unicode, so each byte maps
    // straight to a char. Going through str::from_utf8 would misread bytes above
    // 0x7F as the start of a multi-byte sequence.
    data.iter().copied().map(char::from).collect()
}

fn decode_utf16(data: &[u8]) -> String {
    // The endianness is declared by a leading BOM. A buffer too short to hold one
    // holds no text either.
    match data {
        [0xFF, 0xFE, rest @ ..] => decode_utf16_units(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16_units(rest, u16::from_be_bytes),
        [_, _, ..] => {
            warn!("UTF-16 text without a BOM, assuming big-endian");
            decode_utf16_units(data, u16::from_be_bytes)
        }
        _ => String::new(),
    }
}

fn decode_utf16_units(data: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    // A stray trailing byte is dropped by the chunking, and lone surrogates decay
    // into replacement characters.
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();

    String::from_utf16_lossy(&units)
}

fn encode_latin1(string: &str) -> Vec<u8> {
    // Anything beyond the Latin1 range has no representation and decays to '?'.
    string
        .chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}

fn encode_utf16(string: &str) -> Vec<u8> {
    // Always little-endian, with the matching BOM up front.
    let mut result = vec![0xFF, 0xFE];

    result.extend(string.encode_utf16().flat_map(u16::to_le_bytes));

    result
}

fn encode_utf16be(string: &str) -> Vec<u8> {
    string.encode_utf16().flat_map(u16::to_be_bytes).collect()
}
