//! ID3v2 tag reading and writing.
//!
//! ID3v2 is the primary metadata format for MP3 files, with it being present in other
//! formats as well. This crate is the codec for that format: [`decode`](decode) turns
//! a byte buffer into a tag header and a list of typed frames, and [`encode`](encode)
//! turns a list of typed frames back into a byte buffer, targeting any of ID3v2.2,
//! ID3v2.3 and ID3v2.4. Reading tags out of files, streams, or anything else is the
//! caller's business; the codec begins and ends at byte buffers.
//!
//! This crate assumes that the user has a working knowledge of the ID3v2 standard.
//! If not, then one should familiarize themselves with the following documents:
//!
//! - [ID3v2.3](https://id3.org/id3v2.3.0)
//! - [ID3v2.4 Structure](https://id3.org/id3v2.4.0-structure)
//! - [ID3v2.4 Frames](https://id3.org/id3v2.4.0-frames)
//!
//! # Decoding
//!
//! ```
//! use tagweld::frames::FrameBody;
//!
//! # fn main() -> Result<(), tagweld::ParseError> {
//! # let buf: &[u8] = b"ID3\x03\x00\x00\x00\x00\x00\x10TIT2\x00\x00\x00\x06\x00\x00\x00Angel";
//! let tag = tagweld::decode(buf)?;
//!
//! for frame in &tag.frames {
//!     println!("{}: {}", frame.key(), frame);
//! }
//!
//! if let FrameBody::Text(title) = &tag.frames[0].body {
//!     assert_eq!(title.text, "Angel");
//! }
//! #   Ok(())
//! # }
//! ```
//!
//! Decoding is strict: a tag with a malformed header, a misdeclared frame size, or a
//! frame identifier the codec does not know is rejected as a whole rather than
//! partially decoded.
//!
//! # Encoding
//!
//! ```
//! use tagweld::{EncodeOptions, Frame, text_frame};
//!
//! # fn main() -> Result<(), tagweld::SaveError> {
//! let frames = [
//!     Frame::new(text_frame![b"TIT2"; "All I Need"]),
//!     Frame::new(text_frame![b"TPE1"; "Air"]),
//! ];
//!
//! let buf = tagweld::encode(&frames, &EncodeOptions::default())?;
//! assert_eq!(&buf[..3], b"ID3");
//! #   Ok(())
//! # }
//! ```
//!
//! When no version is pinned in [`EncodeOptions`](EncodeOptions), the encoder picks
//! the highest version every frame and option can be represented in. Pinning a
//! version that cannot represent the input fails with a
//! [`VersionError`](VersionError) that lists every incompatibility at once.

#![forbid(unsafe_code)]

#[macro_use]
mod macros;

pub mod collections;
mod compat;
pub mod core;
pub mod frames;
mod syncdata;
pub mod tag;

use crate::core::io::{BufStream, StreamError};
use crate::core::string::Encoding;
use crate::frames::encoding;
use crate::tag::{ExtendedHeader, Restrictions, TagFlags, TagHeader, Version};

pub use frames::{Frame, FrameBody};

use log::error;
use std::error;
use std::fmt::{self, Display, Formatter};

const ID: &[u8] = b"ID3";

/// A decoded ID3v2 tag.
///
/// The frames are in the exact order they appeared in the buffer; re-encoding a tag's
/// frames preserves that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// The tag header.
    pub header: TagHeader,
    /// The tag's extended header, if one was present.
    pub extended_header: Option<ExtendedHeader>,
    /// The frames of the tag, in their original order.
    pub frames: Vec<Frame>,
}

/// The configuration for [`encode`](encode).
///
/// The `Default` instance pins nothing: the version is selected automatically, the
/// text encoding is the version default [ISO-8859-1 below ID3v2.4, UTF-8 on it], and
/// no optional tag structures are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeOptions {
    /// Pin the output to a single version instead of selecting the highest
    /// compatible one.
    pub version: Option<Version>,
    /// The encoding for all text written into frame bodies.
    pub text_encoding: Option<Encoding>,
    /// Apply the unsynchronisation scheme to the emitted frame stream.
    pub unsync: bool,
    /// Set the experimental flag. Not representable in ID3v2.2.
    pub experimental: bool,
    /// Mark the tag as an update of an earlier tag. ID3v2.4 only.
    pub is_update: bool,
    /// A CRC-32 of the frame stream to write into the extended header. The codec
    /// passes the value through verbatim. Not representable in ID3v2.2.
    pub crc_data: Option<u32>,
    /// Tag restrictions to write into the extended header. ID3v2.4 only.
    pub restrictions: Option<Restrictions>,
}

/// Decodes the ID3v2 tag in `data`.
///
/// The buffer is scanned for the `ID3` signature, and the tag is decoded from
/// wherever it is found. Frames follow the tag header [and the extended header, if
/// flagged] until the declared tag size is exhausted or padding is reached.
///
/// # Errors
/// If the buffer holds no tag, ends before the tag does, or any header or frame in
/// the tag is malformed, an error is returned. Decoding is all-or-nothing; specific
/// information about the failure is logged.
pub fn decode(data: &[u8]) -> ParseResult<Tag> {
    // Locate the ID3 signature. Callers usually hand us a buffer that starts with
    // it, but the codec does not require that.
    let start = data
        .windows(ID.len())
        .position(|window| window == ID)
        .ok_or(ParseError::NotFound)?;

    let mut stream = BufStream::new(&data[start..]);
    let header = TagHeader::parse(stream.read_array()?)?;

    // Bound the stream to the declared payload. A buffer that ends early just
    // truncates the frame region.
    let len = usize::min(header.size() as usize, stream.remaining());
    let mut stream = stream.slice_stream(len)?;

    let mut extended_header = None;

    if header.flags().extended {
        extended_header = Some(ExtendedHeader::parse(&mut stream, header.version())?);
    }

    // The frame region is unsynchronised as a whole; the extended header precedes it.
    let decoded;
    let mut stream = if header.flags().unsync {
        decoded = syncdata::decode(stream.take_rest());
        BufStream::new(&decoded)
    } else {
        stream
    };

    let min_header_size = match header.version() {
        Version::V22 => 6,
        _ => 10,
    };

    let mut frames = Vec::new();

    while stream.remaining() >= min_header_size {
        // Two zero bytes cannot begin a frame header, only the padding area.
        if stream.peek(0..2)? == [0, 0] {
            break;
        }

        frames.push(frames::parse(header.version(), &mut stream)?);
    }

    Ok(Tag {
        header,
        extended_header,
        frames,
    })
}

/// Encodes `frames` into a complete ID3v2 tag.
///
/// The output version is `options.version` if pinned, otherwise the highest version
/// that can represent every frame and option. Frames are written in the order given.
///
/// # Errors
/// If no version can represent the input, an error aggregating every per-frame and
/// per-option reason is returned. Frames with out-of-range values and tags beyond
/// the representable size fail as well.
pub fn encode(frames: &[Frame], options: &EncodeOptions) -> SaveResult<Vec<u8>> {
    let version = select_version(frames, options)?;

    let encoding = options
        .text_encoding
        .unwrap_or_else(|| default_encoding(version));

    let mut frame_data = Vec::new();

    for frame in frames {
        frame_data.extend(frames::render(frame, version, encoding)?);
    }

    if options.unsync {
        frame_data = syncdata::encode(&frame_data);
    }

    let extended_header = build_extended_header(version, options);

    let ext_data = match &extended_header {
        Some(ext) => ext.render(version),
        None => Vec::new(),
    };

    let tag_size = ext_data.len() + frame_data.len();

    // Tag sizes are synchsafe, so tags can never be more than 256mb.
    if tag_size > 0xFFFFFFF {
        return Err(SaveError::TooLarge);
    }

    let header = TagHeader::new(
        version,
        tag_size as u32,
        TagFlags {
            unsync: options.unsync,
            extended: extended_header.is_some(),
            experimental: options.experimental,
            footer: false,
        },
    );

    let mut data = Vec::with_capacity(10 + tag_size);

    data.extend(header.render());
    data.extend(ext_data);
    data.extend(frame_data);

    Ok(data)
}

/// The extended header is only emitted when something would actually be in it:
/// a CRC for ID3v2.3, and any of the update flag, CRC, or restrictions for ID3v2.4.
fn build_extended_header(version: Version, options: &EncodeOptions) -> Option<ExtendedHeader> {
    match version {
        Version::V22 => None,

        Version::V23 => options.crc_data.map(|crc| ExtendedHeader {
            padding_size: Some(0),
            crc32: Some(crc),
            ..Default::default()
        }),

        Version::V24 => {
            if options.is_update || options.crc_data.is_some() || options.restrictions.is_some() {
                Some(ExtendedHeader {
                    padding_size: None,
                    crc32: options.crc_data,
                    is_update: options.is_update,
                    restrictions: options.restrictions,
                })
            } else {
                None
            }
        }
    }
}

fn default_encoding(version: Version) -> Encoding {
    match version {
        Version::V22 | Version::V23 => Encoding::Latin1,
        Version::V24 => Encoding::Utf8,
    }
}

fn select_version(frames: &[Frame], options: &EncodeOptions) -> SaveResult<Version> {
    if let Some(version) = options.version {
        let reasons = version_reasons(frames, options, version);

        if reasons.is_empty() {
            return Ok(version);
        }

        error!("cannot encode tag as {}", version);

        return Err(SaveError::Unsupported(VersionError {
            attempts: vec![(version, reasons)],
        }));
    }

    let mut attempts = Vec::new();

    for version in [Version::V24, Version::V23, Version::V22] {
        let reasons = version_reasons(frames, options, version);

        if reasons.is_empty() {
            return Ok(version);
        }

        attempts.push((version, reasons));
    }

    error!("no ID3v2 version can represent this tag");

    Err(SaveError::Unsupported(VersionError { attempts }))
}

/// Collects every reason `version` cannot represent the given frames and options.
/// An empty result means the version is usable.
fn version_reasons(frames: &[Frame], options: &EncodeOptions, version: Version) -> Vec<String> {
    let mut reasons = Vec::new();

    for frame in frames {
        if let Err(reason) = frame.check_version(version) {
            reasons.push(format!["{}: {}", frame.key(), reason]);
        }
    }

    if let Some(enc) = options.text_encoding {
        if let Err(reason) = encoding::check_version(enc, version) {
            reasons.push(reason);
        }
    }

    if version == Version::V22 {
        if options.experimental {
            reasons.push(String::from(
                "the experimental flag is not supported in ID3v2.2",
            ));
        }

        if options.crc_data.is_some() {
            reasons.push(String::from("CRC data is not supported in ID3v2.2"));
        }
    }

    if version < Version::V24 {
        if options.is_update {
            reasons.push(String::from(
                "the tag update flag is only supported in ID3v2.4",
            ));
        }

        if options.restrictions.is_some() {
            reasons.push(String::from(
                "tag restrictions are only supported in ID3v2.4",
            ));
        }
    }

    reasons
}

/// The result given after a decoding operation.
pub type ParseResult<T> = Result<T, ParseError>;

/// The error type returned when decoding ID3v2 tags.
#[derive(Debug)]
pub enum ParseError {
    /// No ID3v2 tag was found in the buffer.
    NotFound,
    /// A part of the tag was not valid.
    MalformedData,
    /// The tag or an element of the tag is unsupported.
    Unsupported,
    /// The buffer ended before the tag did.
    Truncated(StreamError),
}

impl From<StreamError> for ParseError {
    fn from(other: StreamError) -> Self {
        ParseError::Truncated(other)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::NotFound => write![f, "no ID3v2 tag was found"],
            Self::MalformedData => write![f, "malformed data"],
            Self::Unsupported => write![f, "unsupported"],
            Self::Truncated(err) => err.fmt(f),
        }
    }
}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Truncated(err) => Some(err),
            _ => None,
        }
    }
}

/// The result given after an encoding operation.
pub type SaveResult<T> = Result<T, SaveError>;

/// The error type returned when encoding ID3v2 tags.
#[derive(Debug)]
pub enum SaveError {
    /// The targeted version [or every version] cannot represent the input.
    Unsupported(VersionError),
    /// A frame field does not fit into its wire representation.
    OutOfRange(String),
    /// The tag [or an element in the tag] was too large to be written.
    TooLarge,
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Unsupported(err) => err.fmt(f),
            Self::OutOfRange(what) => write![f, "{}", what],
            Self::TooLarge => write![f, "tag is too large to be written"],
        }
    }
}

impl error::Error for SaveError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Unsupported(err) => Some(err),
            _ => None,
        }
    }
}

/// Every reason version selection failed.
///
/// When a version was pinned there is a single attempt; automatic selection records
/// one attempt per version it tried. Each attempt carries a human-readable reason
/// per incompatible frame or option.
#[derive(Debug)]
pub struct VersionError {
    attempts: Vec<(Version, Vec<String>)>,
}

impl VersionError {
    /// The versions that were tried, each with the reasons it was rejected.
    pub fn attempts(&self) -> &[(Version, Vec<String>)] {
        &self.attempts
    }
}

impl Display for VersionError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.attempts.as_slice() {
            [(version, reasons)] => {
                write![f, "cannot encode tag as {}: {}", version, reasons.join("; ")]
            }

            attempts => {
                write![f, "no ID3v2 version can represent this tag:"]?;

                for (version, reasons) in attempts {
                    write![f, " {} [{}]", version, reasons.join("; ")]?;
                }

                Ok(())
            }
        }
    }
}

impl error::Error for VersionError {
    // Nothing to implement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{
        AttachedPictureFrame, AudioEncryptionFrame, CommentsFrame, EqualisationFrame,
        EqualisationFrame2, EventTimingCodesFrame, FileIdFrame, FrameFlags, GeneralObjectFrame,
        Language, MpegLookupTableFrame, MusicCdIdFrame, PlayCounterFrame, PopularimeterFrame,
        RecommendedBufferFrame, RelativeVolumeFrame, RelativeVolumeFrame2, ReverbFrame,
        SyncedLyricsFrame, SyncedTempoCodesFrame, UnsyncLyricsFrame, UserTextFrame, UserUrlFrame,
    };

    fn options_for(version: Version) -> EncodeOptions {
        EncodeOptions {
            version: Some(version),
            ..Default::default()
        }
    }

    #[test]
    fn minimal_v23_round_trip() {
        let frames = [
            Frame::new(crate::text_frame![b"TIT2"; "Hello"]),
            Frame::new(crate::text_frame![b"TPE1"; "World"]),
        ];

        let options = EncodeOptions {
            version: Some(Version::V23),
            text_encoding: Some(Encoding::Latin1),
            ..Default::default()
        };

        let data = encode(&frames, &options).unwrap();

        assert_eq!(&data[..10], b"ID3\x03\x00\x00\x00\x00\x00\x20");
        assert_eq!(&data[10..26], b"TIT2\x00\x00\x00\x06\x00\x00\x00Hello");
        assert_eq!(&data[26..], b"TPE1\x00\x00\x00\x06\x00\x00\x00World");

        let tag = decode(&data).unwrap();

        assert_eq!(tag.header.version(), Version::V23);
        assert_eq!(tag.frames.len(), 2);
        assert_eq!(tag.frames[0].body, frames[0].body);
        assert_eq!(tag.frames[1].body, frames[1].body);
    }

    #[test]
    fn v24_synchsafe_size() {
        let frames = [Frame::new(crate::text_frame![b"TIT2"; "a".repeat(200)])];

        let options = EncodeOptions {
            version: Some(Version::V24),
            text_encoding: Some(Encoding::Utf8),
            ..Default::default()
        };

        let data = encode(&frames, &options).unwrap();

        // One frame of 10 header bytes, the encoding byte, and 200 bytes of text.
        assert_eq!(data[6..10], syncdata::from_u28(211));
        assert!(data[6..10].iter().all(|&byte| byte < 0x80));
    }

    #[test]
    fn unsync_transparency() {
        let frames = [Frame::new(MusicCdIdFrame {
            data: vec![0xFF, 0xE0, 0xFF, 0x00, 0xFF],
        })];

        let options = EncodeOptions {
            unsync: true,
            ..Default::default()
        };

        let data = encode(&frames, &options).unwrap();

        assert_ne!(data[5] & 0x80, 0);
        assert_eq!(&data[20..28], b"\xFF\x00\xE0\xFF\x00\x00\xFF\x00");

        let tag = decode(&data).unwrap();
        assert_eq!(tag.frames[0].body, frames[0].body);
    }

    #[test]
    fn version_downgrade_rejection() {
        let frames = [Frame::new(EqualisationFrame2::default())];

        let err = encode(&frames, &options_for(Version::V23)).unwrap_err();

        assert!(err.to_string().contains("only supported in ID3v2.4"));
    }

    #[test]
    fn v22_identifier_remap() {
        let mut data = Vec::new();

        data.extend(b"ID3\x02\x00\x00");
        data.extend(syncdata::from_u28(13));
        data.extend(b"COM\x00\x00\x07");
        data.extend(b"\x00eng\x00Hi");

        let tag = decode(&data).unwrap();

        assert_eq!(tag.header.version(), Version::V22);
        assert_eq!(tag.frames[0].flags, None);
        assert_eq!(
            tag.frames[0].body,
            FrameBody::Comments(CommentsFrame {
                lang: Language::new(b"eng").unwrap(),
                desc: String::new(),
                text: String::from("Hi"),
            })
        );

        // Re-encoding into ID3v2.4 grows the frame header from 6 to 10 bytes and
        // renames the frame.
        let options = EncodeOptions {
            version: Some(Version::V24),
            text_encoding: Some(Encoding::Latin1),
            ..Default::default()
        };

        let out = encode(&tag.frames, &options).unwrap();

        assert_eq!(&out[10..14], b"COMM");
        assert_eq!(&out[14..20], b"\x00\x00\x00\x07\x00\x00");
        assert_eq!(&out[20..], b"\x00eng\x00Hi");
    }

    #[test]
    fn picture_across_versions() {
        let picture = AttachedPictureFrame {
            mime: String::from("image/png"),
            desc: String::from("cover"),
            picture: b"\x89PNG\r\n".to_vec(),
            ..Default::default()
        };

        let v22 = encode(&[Frame::new(picture.clone())], &options_for(Version::V22)).unwrap();

        assert_eq!(&v22[10..13], b"PIC");
        assert_eq!(&v22[17..20], b"PNG");

        let v24 = encode(&[Frame::new(picture)], &options_for(Version::V24)).unwrap();

        assert_eq!(&v24[10..14], b"APIC");
        assert_eq!(&v24[21..31], b"image/png\0");

        // Both versions decode into the same structured value.
        let t22 = decode(&v22).unwrap();
        let t24 = decode(&v24).unwrap();

        assert_eq!(t22.frames[0].body, t24.frames[0].body);
    }

    #[test]
    fn automatic_version_selection() {
        // Nothing stands in the way of ID3v2.4.
        let data = encode(&[Frame::new(crate::text_frame![b"TIT2"; "a"])], &Default::default())
            .unwrap();
        assert_eq!(decode(&data).unwrap().header.version(), Version::V24);

        // TYER was removed in ID3v2.4, so the selector falls back to ID3v2.3.
        let data = encode(
            &[Frame::new(crate::text_frame![b"TYER"; "2004"])],
            &Default::default(),
        )
        .unwrap();
        assert_eq!(decode(&data).unwrap().header.version(), Version::V23);

        let data = encode(
            &[Frame::new(RelativeVolumeFrame::default())],
            &Default::default(),
        )
        .unwrap();
        assert_eq!(decode(&data).unwrap().header.version(), Version::V23);

        // A pinned version that works must also be admissible to the selector.
        encode(
            &[Frame::new(crate::text_frame![b"TYER"; "2004"])],
            &options_for(Version::V23),
        )
        .unwrap();
    }

    #[test]
    fn aggregated_version_failure() {
        // EQU2 only exists in ID3v2.4 and RVAD only before it, so no version fits.
        let frames = [
            Frame::new(EqualisationFrame2::default()),
            Frame::new(RelativeVolumeFrame::default()),
        ];

        let err = encode(&frames, &Default::default()).unwrap_err();

        let attempts = match &err {
            SaveError::Unsupported(err) => err.attempts(),
            other => panic!("expected a version error, got {:?}", other),
        };

        assert_eq!(attempts.len(), 3);

        let message = err.to_string();
        assert!(message.contains("ID3v2.4"));
        assert!(message.contains("ID3v2.3"));
        assert!(message.contains("ID3v2.2"));
    }

    #[test]
    fn incompatible_flags_are_rejected() {
        let flags = FrameFlags {
            unsync: true,
            ..Default::default()
        };

        let frames = [Frame::with_flags(crate::text_frame![b"TIT2"; "a"], flags)];

        assert!(encode(&frames, &options_for(Version::V23)).is_err());
        assert!(encode(&frames, &options_for(Version::V24)).is_ok());
    }

    fn v24_frames() -> Vec<Frame> {
        vec![
            Frame::new(crate::text_frame![b"TIT2"; "Dayvan Cowboy"]),
            Frame::new(UserTextFrame {
                desc: String::from("BARCODE"),
                text: String::from("724384260958"),
            }),
            Frame::new(crate::url_frame![b"WOAR"; "https://example.com"]),
            Frame::new(UserUrlFrame {
                desc: String::from("Label"),
                url: String::from("https://example.com"),
            }),
            Frame::new(FileIdFrame {
                owner: String::from("https://musicdb.example/ids"),
                identifier: vec![0x0F, 0x27, 0x41, 0x88],
            }),
            Frame::new(MusicCdIdFrame {
                data: vec![1, 2, 3, 4],
            }),
            Frame::new(EventTimingCodesFrame::default()),
            Frame::new(MpegLookupTableFrame {
                frames_between_refs: 4,
                bytes_between_refs: 1500,
                millis_between_refs: 104,
                references: vec![crate::frames::mllt::MpegReference {
                    byte_deviation: 3,
                    millis_deviation: 1,
                }],
            }),
            Frame::new(SyncedTempoCodesFrame::default()),
            Frame::new(UnsyncLyricsFrame {
                lang: Language::new(b"eng").unwrap(),
                desc: String::from("lyrics"),
                text: String::from("I dream I'm flying"),
            }),
            Frame::new(SyncedLyricsFrame::default()),
            Frame::new(CommentsFrame {
                lang: Language::new(b"eng").unwrap(),
                desc: String::new(),
                text: String::from("From the demo sessions"),
            }),
            Frame::new(RelativeVolumeFrame2 {
                ident: String::from("album"),
                channels: Vec::new(),
            }),
            Frame::new(EqualisationFrame2::default()),
            Frame::new(ReverbFrame::default()),
            Frame::new(AttachedPictureFrame {
                mime: String::from("image/png"),
                desc: String::from("cover"),
                picture: b"\x89PNG\r\n".to_vec(),
                ..Default::default()
            }),
            Frame::new(GeneralObjectFrame {
                mime: String::from("text/txt"),
                filename: String::from("lyrics.txt"),
                desc: String::from("lyrics"),
                data: b"%PDF".to_vec(),
            }),
            Frame::new(PlayCounterFrame { plays: 5000 }),
            Frame::new(PopularimeterFrame {
                email: String::from("ratings@muzik.example"),
                rating: 196,
                plays: 4,
            }),
            Frame::new(RecommendedBufferFrame {
                buffer_size: 4096,
                embedded_info: false,
                next_tag_offset: None,
            }),
            Frame::new(AudioEncryptionFrame {
                owner: String::from("encrypt@example.com"),
                preview_start: 0,
                preview_length: 192,
                encryption_info: vec![0xAB],
            }),
        ]
    }

    #[test]
    fn v24_order_preserving_round_trip() {
        let frames = v24_frames();
        let data = encode(&frames, &Default::default()).unwrap();
        let tag = decode(&data).unwrap();

        assert_eq!(tag.header.version(), Version::V24);
        assert_eq!(tag.frames.len(), frames.len());

        for (parsed, original) in tag.frames.iter().zip(&frames) {
            assert_eq!(parsed.body, original.body);
        }
    }

    #[test]
    fn v23_order_preserving_round_trip() {
        // Swap the ID3v2.4-only frames for their older counterparts.
        let mut frames = v24_frames();

        frames[12] = Frame::new(RelativeVolumeFrame::default());
        frames[13] = Frame::new(EqualisationFrame::default());
        frames.push(Frame::new(crate::frames::CreditsFrame {
            people: vec![(String::from("Producer"), String::from("Nadia Berg"))],
        }));

        for options in [options_for(Version::V23), Default::default()] {
            let data = encode(&frames, &options).unwrap();
            let tag = decode(&data).unwrap();

            assert_eq!(tag.header.version(), Version::V23);

            for (parsed, original) in tag.frames.iter().zip(&frames) {
                assert_eq!(parsed.body, original.body);
            }
        }
    }

    #[test]
    fn v22_round_trip() {
        let frames = [
            Frame::new(crate::text_frame![b"TIT2"; "Night Owl"]),
            Frame::new(CommentsFrame {
                lang: Language::new(b"eng").unwrap(),
                desc: String::new(),
                text: String::from("From the demo sessions"),
            }),
            Frame::new(AttachedPictureFrame {
                mime: String::from("image/jpg"),
                desc: String::from("cover"),
                picture: b"\x89PNG\r\n".to_vec(),
                ..Default::default()
            }),
        ];

        let data = encode(&frames, &options_for(Version::V22)).unwrap();
        let tag = decode(&data).unwrap();

        assert_eq!(tag.header.version(), Version::V22);
        assert_eq!(tag.frames.len(), frames.len());

        for (parsed, original) in tag.frames.iter().zip(&frames) {
            assert_eq!(parsed.flags, None);
            assert_eq!(parsed.body, original.body);
        }
    }

    #[test]
    fn byte_stable_re_encode() {
        let options = EncodeOptions::default();

        let first = encode(&v24_frames(), &options).unwrap();
        let tag = decode(&first).unwrap();
        let second = encode(&tag.frames, &options).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn padding_safe_decode() {
        let frames = [Frame::new(crate::text_frame![b"TIT2"; "Hello"])];
        let data = encode(&frames, &options_for(Version::V23)).unwrap();

        let mut padded = data.clone();
        padded.extend([0; 16]);

        let new_size = (padded.len() - 10) as u32;
        padded[6..10].copy_from_slice(&syncdata::from_u28(new_size));

        assert_eq!(decode(&data).unwrap().frames, decode(&padded).unwrap().frames);
    }

    #[test]
    fn extended_header_round_trip() {
        let frames = [Frame::new(crate::text_frame![b"TIT2"; "Hello"])];

        let options = EncodeOptions {
            version: Some(Version::V23),
            crc_data: Some(0xDEADBEEF),
            ..Default::default()
        };

        let tag = decode(&encode(&frames, &options).unwrap()).unwrap();

        assert!(tag.header.flags().extended);
        assert_eq!(tag.extended_header.unwrap().crc32, Some(0xDEADBEEF));
        assert_eq!(tag.frames[0].body, frames[0].body);

        let options = EncodeOptions {
            is_update: true,
            crc_data: Some(0x30A1C24D),
            ..Default::default()
        };

        let tag = decode(&encode(&frames, &options).unwrap()).unwrap();
        let extended = tag.extended_header.unwrap();

        assert_eq!(tag.header.version(), Version::V24);
        assert!(extended.is_update);
        assert_eq!(extended.crc32, Some(0x30A1C24D));
    }

    #[test]
    fn unknown_frame_is_fatal() {
        let mut data = Vec::new();

        data.extend(b"ID3\x03\x00\x00");
        data.extend(syncdata::from_u28(11));
        data.extend(b"XYZW\x00\x00\x00\x01\x00\x00\x2A");

        assert!(matches!(decode(&data), Err(ParseError::Unsupported)));
    }

    #[test]
    fn tag_not_at_buffer_start() {
        let frames = [Frame::new(crate::text_frame![b"TIT2"; "Hello"])];
        let mut data = vec![0xAA; 24];

        data.extend(encode(&frames, &Default::default()).unwrap());

        let tag = decode(&data).unwrap();
        assert_eq!(tag.frames[0].body, frames[0].body);
    }

    #[test]
    fn utf16_options_round_trip() {
        let frames = [Frame::new(crate::text_frame![b"TIT2"; "Ω naïve ✓"])];

        let options = EncodeOptions {
            version: Some(Version::V23),
            text_encoding: Some(Encoding::Utf16),
            ..Default::default()
        };

        let tag = decode(&encode(&frames, &options).unwrap()).unwrap();
        assert_eq!(tag.frames[0].body, frames[0].body);

        // UTF-8 text has no ID3v2.3 representation.
        let options = EncodeOptions {
            version: Some(Version::V23),
            text_encoding: Some(Encoding::Utf8),
            ..Default::default()
        };

        assert!(matches!(
            encode(&frames, &options),
            Err(SaveError::Unsupported(_))
        ));
    }
}
