//! Tag headers and meta information.
//!
//! This module contains the items for the ID3v2 header, version, and extended header.

use crate::core::io::BufStream;
use crate::{syncdata, ParseError, ParseResult};
use log::error;
use std::fmt::{self, Display, Formatter};

const ID: &[u8] = b"ID3";

/// The header beginning every ID3v2 tag.
///
/// A header carries the tag version, the declared size of the tag payload [excluding
/// the 10 header bytes], and the tag-wide flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagHeader {
    version: Version,
    tag_size: u32,
    flags: TagFlags,
}

impl TagHeader {
    pub(crate) fn parse(raw: [u8; 10]) -> ParseResult<Self> {
        // Verify that this header has a valid ID3 identifier.
        if &raw[0..3] != ID {
            error!("no id3v2 identifier found");
            return Err(ParseError::NotFound);
        }

        // Get the version of this tag. The revision byte is ignored, as a revision
        // only ever adds backwards-compatible material.
        let version = match raw[3] {
            2 => Version::V22,
            3 => Version::V23,
            4 => Version::V24,
            m => {
                error!("ID3v2.{} is not supported", m);
                return Err(ParseError::Unsupported);
            }
        };

        let flags = raw[5];

        if version == Version::V22 && flags & 0x40 != 0 {
            // The ID3v2.2 compression flag has no defined scheme. The spec instructs
            // readers to ignore the entire tag when it is set.
            error!("ID3v2.2 tag-level compression is not supported");
            return Err(ParseError::Unsupported);
        }

        // Treat any unused flags being set as malformed data.
        if (version == Version::V22 && flags & 0x3F != 0)
            || (version == Version::V23 && flags & 0x1F != 0)
            || (version == Version::V24 && flags & 0x0F != 0)
        {
            error!("unused flags are set on the tag header");
            return Err(ParseError::MalformedData);
        }

        let flags = TagFlags {
            unsync: flags & 0x80 != 0,
            extended: version != Version::V22 && flags & 0x40 != 0,
            experimental: version != Version::V22 && flags & 0x20 != 0,
            footer: version == Version::V24 && flags & 0x10 != 0,
        };

        // Tag size is always 4 bytes, so we can unwrap here.
        let mut size_raw = [0; 4];
        size_raw.copy_from_slice(&raw[6..10]);
        let tag_size = syncdata::to_u28(size_raw)?;

        Ok(Self {
            version,
            tag_size,
            flags,
        })
    }

    pub(crate) fn render(&self) -> [u8; 10] {
        let mut header = [b'I', b'D', b'3', 0, 0, 0, 0, 0, 0, 0];

        header[3] = match self.version {
            Version::V22 => 2,
            Version::V23 => 3,
            Version::V24 => 4,
        };

        header[5] |= u8::from(self.flags.unsync) * 0x80;

        if self.version != Version::V22 {
            header[5] |= u8::from(self.flags.extended) * 0x40;
            header[5] |= u8::from(self.flags.experimental) * 0x20;
        }

        if self.version == Version::V24 {
            header[5] |= u8::from(self.flags.footer) * 0x10;
        }

        // ID3v2 tag sizes are always synchsafe.
        header[6..10].copy_from_slice(&syncdata::from_u28(self.tag_size));

        header
    }

    pub(crate) fn new(version: Version, tag_size: u32, flags: TagFlags) -> Self {
        Self {
            version,
            tag_size,
            flags,
        }
    }

    /// Returns the version of this tag.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the declared size of the tag payload, in bytes.
    ///
    /// The size covers the extended header and the frame stream, but not the 10
    /// header bytes themselves.
    pub fn size(&self) -> u32 {
        self.tag_size
    }

    /// Returns the flags of this tag.
    pub fn flags(&self) -> TagFlags {
        self.flags
    }
}

/// The tag-wide flags.
///
/// The flag byte layout differs between versions; flags that do not exist in the tag's
/// version are always `false`.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagFlags {
    /// The frame stream has been unsynchronised.
    pub unsync: bool,
    /// An extended header follows the tag header. Not present in ID3v2.2.
    pub extended: bool,
    /// The tag is in an experimental stage. Not present in ID3v2.2.
    pub experimental: bool,
    /// A footer trails the tag. ID3v2.4 only; this codec reads the flag but never
    /// writes a footer.
    pub footer: bool,
}

/// The version of an ID3v2 tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Version {
    /// ID3v2.2.
    V22,
    /// ID3v2.3.
    V23,
    /// ID3v2.4.
    V24,
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::V22 => write![f, "ID3v2.2"],
            Self::V23 => write![f, "ID3v2.3"],
            Self::V24 => write![f, "ID3v2.4"],
        }
    }
}

/// The optional block between the tag header and the frame stream.
///
/// The extended header carries information about the tag as it was written. ID3v2.2
/// has no extended header, and the ID3v2.3 and ID3v2.4 bodies share no fields except
/// the CRC. When encoding, the extended header is emitted only when one of its fields
/// is actually populated.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ExtendedHeader {
    /// The padding size the writer left after the frame stream. ID3v2.3 only.
    pub padding_size: Option<u32>,
    /// A CRC-32 of the frame stream. The codec round-trips this value verbatim.
    pub crc32: Option<u32>,
    /// The tag is an update of a previous tag in the file. ID3v2.4 only.
    pub is_update: bool,
    /// Restrictions the tag was written under. ID3v2.4 only.
    pub restrictions: Option<Restrictions>,
}

impl ExtendedHeader {
    pub(crate) fn parse(stream: &mut BufStream, version: Version) -> ParseResult<Self> {
        match version {
            Version::V22 => Err(ParseError::Unsupported),
            Version::V23 => parse_ext_v3(stream),
            Version::V24 => parse_ext_v4(stream),
        }
    }

    pub(crate) fn render(&self, version: Version) -> Vec<u8> {
        match version {
            Version::V22 => Vec::new(),
            Version::V23 => render_ext_v3(self),
            Version::V24 => render_ext_v4(self),
        }
    }
}

fn parse_ext_v3(stream: &mut BufStream) -> ParseResult<ExtendedHeader> {
    let size = stream.read_be_u32()?;

    // A fixed 6-byte body, four more when a CRC is attached. Anything else means
    // the flag was set over garbage.
    if size != 6 && size != 10 {
        error!("an ID3v2.3 extended header cannot be {} bytes", size);
        return Err(ParseError::MalformedData);
    }

    let flags = stream.read_be_u16()?;
    let padding_size = stream.read_be_u32()?;

    let crc32 = if flags & 0x8000 != 0 {
        Some(stream.read_be_u32()?)
    } else {
        None
    };

    Ok(ExtendedHeader {
        padding_size: Some(padding_size),
        crc32,
        is_update: false,
        restrictions: None,
    })
}

fn parse_ext_v4(stream: &mut BufStream) -> ParseResult<ExtendedHeader> {
    let size = syncdata::to_u28(stream.read_array()?)?;

    if !(6..=15).contains(&size) {
        error!("{} bytes is outside the ID3v2.4 extended header range", size);
        return Err(ParseError::MalformedData);
    }

    // One flag byte, by definition.
    if stream.read_u8()? != 1 {
        error!("expected a single extended flag byte");
        return Err(ParseError::MalformedData);
    }

    let flags = stream.read_u8()?;
    let mut header = ExtendedHeader::default();

    // Every set flag is followed by a length byte and that much attached data,
    // even when the length is zero.

    if flags & 0x40 != 0 {
        expect_flag_data(stream, 0)?;
        header.is_update = true;
    }

    if flags & 0x20 != 0 {
        // The CRC rides in a 35-bit synchsafe integer.
        expect_flag_data(stream, 5)?;
        header.crc32 = Some(syncdata::to_u35(stream.read_array()?)?);
    }

    // Restrictions describe how the tag was written, not how to read it, so they
    // only round-trip.
    if flags & 0x10 != 0 {
        expect_flag_data(stream, 1)?;
        header.restrictions = Some(Restrictions::parse(stream.read_u8()?));
    }

    Ok(header)
}

fn expect_flag_data(stream: &mut BufStream, len: u8) -> ParseResult<()> {
    let found = stream.read_u8()?;

    if found != len {
        error!("extended flag data should be {} bytes, found {}", len, found);
        return Err(ParseError::MalformedData);
    }

    Ok(())
}

fn render_ext_v3(header: &ExtendedHeader) -> Vec<u8> {
    let size: u32 = if header.crc32.is_some() { 10 } else { 6 };
    let flags: u16 = if header.crc32.is_some() { 0x8000 } else { 0 };

    let mut data = Vec::with_capacity(size as usize + 4);

    data.extend(size.to_be_bytes());
    data.extend(flags.to_be_bytes());

    // ID3v2.4 dropped this field, so it lives behind an Option that defaults
    // to no padding.
    data.extend(header.padding_size.unwrap_or_default().to_be_bytes());

    if let Some(crc) = header.crc32 {
        data.extend(crc.to_be_bytes());
    }

    data
}

fn render_ext_v4(header: &ExtendedHeader) -> Vec<u8> {
    // Gather the flag byte and its attached data first; the declared size counts
    // those plus the six leading accounting bytes.
    let mut flags = 0;
    let mut attached = Vec::new();

    if header.is_update {
        flags |= 0x40;
        attached.push(0);
    }

    if let Some(crc) = header.crc32 {
        flags |= 0x20;
        attached.push(5);
        attached.extend(syncdata::from_u35(crc));
    }

    if let Some(restrictions) = header.restrictions {
        flags |= 0x10;
        attached.push(1);
        attached.push(restrictions.render());
    }

    let mut data = Vec::with_capacity(6 + attached.len());

    data.extend(syncdata::from_u28(6 + attached.len() as u32));
    data.push(1);
    data.push(flags);
    data.extend(attached);

    data
}

/// The restrictions a tag was encoded under, from the ID3v2.4 extended header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Restrictions {
    pub tag_size: TagSizeRestriction,
    pub text_encoding: TextEncodingRestriction,
    pub text_size: TextSizeRestriction,
    pub image_encoding: ImageEncodingRestriction,
    pub image_size: ImageSizeRestriction,
}

impl Restrictions {
    fn parse(raw: u8) -> Self {
        let tag_size = match raw >> 6 {
            0 => TagSizeRestriction::Max128Frames1Mb,
            1 => TagSizeRestriction::Max64Frames128Kb,
            2 => TagSizeRestriction::Max32Frames40Kb,
            3 => TagSizeRestriction::Max32Frames4Kb,
            _ => unreachable!(),
        };

        let text_encoding = match (raw & 0x20) >> 5 {
            0 => TextEncodingRestriction::None,
            1 => TextEncodingRestriction::Latin1OrUtf8,
            _ => unreachable!(),
        };

        let text_size = match (raw & 0x18) >> 3 {
            0 => TextSizeRestriction::None,
            1 => TextSizeRestriction::LessThan1024Chars,
            2 => TextSizeRestriction::LessThan128Chars,
            3 => TextSizeRestriction::LessThan30Chars,
            _ => unreachable!(),
        };

        let image_encoding = match (raw & 0x4) >> 2 {
            0 => ImageEncodingRestriction::None,
            1 => ImageEncodingRestriction::OnlyPngOrJpeg,
            _ => unreachable!(),
        };

        let image_size = match raw & 0x3 {
            0 => ImageSizeRestriction::None,
            1 => ImageSizeRestriction::LessThan256x256,
            2 => ImageSizeRestriction::LessThan64x64,
            3 => ImageSizeRestriction::Exactly64x64,
            _ => unreachable!(),
        };

        Self {
            tag_size,
            text_encoding,
            text_size,
            image_encoding,
            image_size,
        }
    }

    fn render(&self) -> u8 {
        let mut bits = 0;
        bits |= (self.tag_size as u8) << 6;
        bits |= (self.text_encoding as u8) << 5;
        bits |= (self.text_size as u8) << 3;
        bits |= (self.image_encoding as u8) << 2;
        bits |= self.image_size as u8;
        bits
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TagSizeRestriction {
    Max128Frames1Mb = 0,
    Max64Frames128Kb = 1,
    Max32Frames40Kb = 2,
    Max32Frames4Kb = 3,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextEncodingRestriction {
    None = 0,
    Latin1OrUtf8 = 1,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextSizeRestriction {
    None = 0,
    LessThan1024Chars = 1,
    LessThan128Chars = 2,
    LessThan30Chars = 3,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImageEncodingRestriction {
    None = 0,
    OnlyPngOrJpeg = 1,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImageSizeRestriction {
    None = 0,
    LessThan256x256 = 1,
    LessThan64x64 = 2,
    Exactly64x64 = 3,
}
