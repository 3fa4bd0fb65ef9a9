//! Text encoding bytes.

use crate::core::io::BufStream;
use crate::core::string::Encoding;
use crate::tag::Version;
use crate::{ParseError, ParseResult};
use log::error;

const FLAG_LATIN1: u8 = 0x00;
const FLAG_UTF16: u8 = 0x01;
const FLAG_UTF16BE: u8 = 0x02;
const FLAG_UTF8: u8 = 0x03;

pub fn parse(stream: &mut BufStream) -> ParseResult<Encoding> {
    match stream.read_u8()? {
        FLAG_LATIN1 => Ok(Encoding::Latin1),
        FLAG_UTF16 => Ok(Encoding::Utf16),
        FLAG_UTF16BE => Ok(Encoding::Utf16Be),
        FLAG_UTF8 => Ok(Encoding::Utf8),
        enc => {
            error!("unrecognised text encoding {:#04x}", enc);
            Err(ParseError::MalformedData)
        }
    }
}

pub fn render(enc: Encoding) -> u8 {
    match enc {
        Encoding::Latin1 => FLAG_LATIN1,
        Encoding::Utf16 => FLAG_UTF16,
        Encoding::Utf16Be => FLAG_UTF16BE,
        Encoding::Utf8 => FLAG_UTF8,
    }
}

/// Checks whether `enc` may be written into a tag of `version`.
///
/// ID3v2.2 and ID3v2.3 define Latin1 and BOM-prefixed UTF-16 only; ID3v2.4 added
/// UTF-16BE and UTF-8.
pub fn check_version(enc: Encoding, version: Version) -> Result<(), String> {
    match enc {
        Encoding::Utf16Be | Encoding::Utf8 if version < Version::V24 => Err(format![
            "the {:?} text encoding is only supported in ID3v2.4",
            enc
        ]),
        _ => Ok(()),
    }
}
