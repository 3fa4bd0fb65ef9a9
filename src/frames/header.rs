//! Frame header parsing and rendering.
//!
//! The frame header is the one part of a frame that every version lays out differently:
//! ID3v2.2 uses a 3-character identifier, a 3-byte size and no flags, ID3v2.3 a
//! 4-character identifier, a plain 32-bit size and a flag word, and ID3v2.4 the same
//! shape as ID3v2.3 but with a synchsafe size and reshuffled flag bits.

use crate::core::io::BufStream;
use crate::frames::FrameId;
use crate::tag::Version;
use crate::{compat, syncdata, ParseError, ParseResult, SaveError, SaveResult};
use log::error;
use std::convert::TryInto;

/// Identifiers that default to `file_should_discard`, as the information they carry
/// is bound to the exact audio data of the file.
const DISCARD_IDS: &[&[u8; 4]] = &[
    b"ASPI", b"AENC", b"ETCO", b"EQUA", b"EQU2", b"MLLT", b"POSS", b"SEEK", b"SYLT", b"SYTC",
    b"RVAD", b"RVA2", b"TENC", b"TLEN", b"TSIZ",
];

pub(crate) struct FrameHeader {
    pub id: FrameId,
    pub size: usize,
    pub flags: FrameFlags,
}

impl FrameHeader {
    pub(crate) fn parse(version: Version, stream: &mut BufStream) -> ParseResult<Self> {
        match version {
            Version::V22 => parse_header_v2(stream),
            Version::V23 => parse_header_v3(stream),
            Version::V24 => parse_header_v4(stream),
        }
    }
}

fn parse_header_v2(stream: &mut BufStream) -> ParseResult<FrameHeader> {
    // ID3v2.2 frames are identified by their 4-character analogue from the moment
    // they are read; an identifier without an analogue is unrecognisable to the
    // dispatch step and therefore fatal.
    let id = compat::upgrade_id(&stream.read_array()?)?;
    let size = stream.read_be_u24()? as usize;

    if size == 0 {
        error!("frame {} has an empty body", id);
        return Err(ParseError::MalformedData);
    }

    Ok(FrameHeader {
        id,
        size,
        flags: FrameFlags::default(),
    })
}

fn parse_header_v3(stream: &mut BufStream) -> ParseResult<FrameHeader> {
    let id = FrameId::parse(&stream.read_array()?)?;
    let size = stream.read_be_u32()? as usize;
    let flags = FrameFlags::parse_v3(stream.read_be_u16()?);

    if size == 0 {
        error!("frame {} has an empty body", id);
        return Err(ParseError::MalformedData);
    }

    Ok(FrameHeader { id, size, flags })
}

fn parse_header_v4(stream: &mut BufStream) -> ParseResult<FrameHeader> {
    let id = FrameId::parse(&stream.read_array()?)?;
    let size = syncdata::to_u28(stream.read_array()?)? as usize;
    let flags = FrameFlags::parse_v4(stream.read_be_u16()?);

    if size == 0 {
        error!("frame {} has an empty body", id);
        return Err(ParseError::MalformedData);
    }

    Ok(FrameHeader { id, size, flags })
}

/// Renders the frame header for a frame of length `size`, returning the header bytes
/// with the identifier remapped to `version`.
pub(crate) fn render(
    id: FrameId,
    version: Version,
    flags: FrameFlags,
    size: usize,
) -> SaveResult<Vec<u8>> {
    let mut data = Vec::with_capacity(10);

    match version {
        Version::V22 => {
            data.extend(compat::downgrade_id(id)?);

            if size > 0xFFFFFF {
                return Err(SaveError::TooLarge);
            }

            data.extend(&(size as u32).to_be_bytes()[1..]);
        }

        Version::V23 => {
            data.extend(id.inner());

            let size: u32 = size.try_into().map_err(|_| SaveError::TooLarge)?;

            data.extend(size.to_be_bytes());
            data.extend(flags.render(version));
        }

        Version::V24 => {
            data.extend(id.inner());

            // ID3v2.4 frame sizes are synchsafe, so frames can never be more than 256mb.
            if size > 0xFFFFFFF {
                return Err(SaveError::TooLarge);
            }

            data.extend(syncdata::from_u28(size as u32));
            data.extend(flags.render(version));
        }
    }

    Ok(data)
}

/// The flags of a single frame.
///
/// ID3v2.2 frame headers have no flag bytes; ID3v2.3 and ID3v2.4 lay the same flags
/// out at different bit positions, with [`unsync`](FrameFlags::unsync) and
/// [`has_data_len`](FrameFlags::has_data_len) only existing in ID3v2.4. Flags are
/// round-tripped by the codec, but compressed or encrypted payloads are not
/// transformed.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameFlags {
    /// The frame should be discarded if the tag is altered.
    pub tag_should_discard: bool,
    /// The frame should be discarded if the file [but not the tag] is altered.
    pub file_should_discard: bool,
    /// The frame contents are intended to be read-only.
    pub read_only: bool,
    /// The frame belongs to a group, marked by a group byte in the frame data.
    pub has_group: bool,
    /// The frame data is zlib-compressed.
    pub compressed: bool,
    /// The frame data is encrypted, marked by a method byte in the frame data.
    pub encrypted: bool,
    /// The frame data is unsynchronised. ID3v2.4 only.
    pub unsync: bool,
    /// A data length indicator precedes the frame data. ID3v2.4 only.
    pub has_data_len: bool,
}

impl FrameFlags {
    /// Returns the default flags for a frame identified by `id`: everything unset,
    /// except `file_should_discard` for the identifiers the standard ties to the
    /// audio stream.
    pub fn defaults_for(id: FrameId) -> Self {
        FrameFlags {
            file_should_discard: DISCARD_IDS.contains(&id.inner()),
            ..Self::default()
        }
    }

    pub(crate) fn parse_v3(raw: u16) -> Self {
        FrameFlags {
            tag_should_discard: raw & 0x8000 != 0,
            file_should_discard: raw & 0x4000 != 0,
            read_only: raw & 0x2000 != 0,
            compressed: raw & 0x0080 != 0,
            encrypted: raw & 0x0040 != 0,
            has_group: raw & 0x0020 != 0,
            unsync: false,
            has_data_len: false,
        }
    }

    pub(crate) fn parse_v4(raw: u16) -> Self {
        FrameFlags {
            tag_should_discard: raw & 0x4000 != 0,
            file_should_discard: raw & 0x2000 != 0,
            read_only: raw & 0x1000 != 0,
            has_group: raw & 0x0040 != 0,
            compressed: raw & 0x0008 != 0,
            encrypted: raw & 0x0004 != 0,
            unsync: raw & 0x0002 != 0,
            has_data_len: raw & 0x0001 != 0,
        }
    }

    pub(crate) fn render(&self, version: Version) -> [u8; 2] {
        let mut raw: u16 = 0;

        match version {
            Version::V22 => {}

            Version::V23 => {
                raw |= u16::from(self.tag_should_discard) * 0x8000;
                raw |= u16::from(self.file_should_discard) * 0x4000;
                raw |= u16::from(self.read_only) * 0x2000;
                raw |= u16::from(self.compressed) * 0x0080;
                raw |= u16::from(self.encrypted) * 0x0040;
                raw |= u16::from(self.has_group) * 0x0020;
            }

            Version::V24 => {
                raw |= u16::from(self.tag_should_discard) * 0x4000;
                raw |= u16::from(self.file_should_discard) * 0x2000;
                raw |= u16::from(self.read_only) * 0x1000;
                raw |= u16::from(self.has_group) * 0x0040;
                raw |= u16::from(self.compressed) * 0x0008;
                raw |= u16::from(self.encrypted) * 0x0004;
                raw |= u16::from(self.unsync) * 0x0002;
                raw |= u16::from(self.has_data_len) * 0x0001;
            }
        }

        raw.to_be_bytes()
    }

    fn any(&self) -> bool {
        *self != Self::default()
    }

    /// Checks whether these flags can be represented in `version`.
    pub(crate) fn check_version(&self, version: Version) -> Result<(), String> {
        match version {
            Version::V22 if self.any() => {
                Err(String::from("frame flags cannot be represented in ID3v2.2"))
            }

            Version::V23 if self.unsync || self.has_data_len => Err(String::from(
                "the unsynchronisation and data length flags are only supported in ID3v2.4",
            )),

            _ => Ok(()),
        }
    }
}
