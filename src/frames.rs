//! Frame parsing and implementations.
//!
//! An ID3v2 tag is primarily made up of chunks of data, called "Frames" by the spec.
//! Frames are highly structured and can contain a variety of information about the audio,
//! including audio adjustments and binary data.
//!
//! Frames are extremely heterogenous, so every kind gets its own body type with its own
//! typed fields, collected under the [`FrameBody`](FrameBody) sum. A [`Frame`](Frame)
//! pairs a body with the optional frame flags; identifiers are dealt with by the codec,
//! with a frame only carrying one when the identifier actually distinguishes it
//! [e.g `TIT2` vs `TPE1`].

pub mod audio_v3;
pub mod audio_v4;
pub mod bin;
pub mod comments;
pub(crate) mod encoding;
pub mod events;
pub mod file;
mod header;
pub mod lang;
pub mod lyrics;
pub mod mllt;
pub mod stats;
pub mod text;
pub mod url;

pub use audio_v3::{EqualisationFrame, RelativeVolumeFrame, ReverbFrame};
pub use audio_v4::{EqualisationFrame2, RelativeVolumeFrame2};
pub use bin::{AudioEncryptionFrame, FileIdFrame, MusicCdIdFrame, RecommendedBufferFrame};
pub use comments::CommentsFrame;
pub use events::{EventTimingCodesFrame, SyncedTempoCodesFrame, TimestampFormat};
pub use file::{AttachedPictureFrame, GeneralObjectFrame};
pub use header::FrameFlags;
pub use lang::Language;
pub use lyrics::{SyncedLyricsFrame, UnsyncLyricsFrame};
pub use mllt::MpegLookupTableFrame;
pub use stats::{PlayCounterFrame, PopularimeterFrame};
pub use text::{CreditsFrame, TextFrame, UserTextFrame};
pub use url::{UrlFrame, UserUrlFrame};

use crate::core::io::BufStream;
use crate::core::string::Encoding;
use crate::tag::Version;
use crate::{syncdata, ParseError, ParseResult, SaveResult};
use header::FrameHeader;
use log::error;
use std::fmt::{self, Display, Formatter};
use std::str;

/// A frame identifier in its ID3v2.3/ID3v2.4 form.
///
/// Identifiers are 4 uppercase ASCII characters or numbers. ID3v2.2 identifiers are
/// 3 characters wide and are remapped to this form as soon as they are read; the
/// reverse remap happens when a frame is written into an ID3v2.2 tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct FrameId([u8; 4]);

impl FrameId {
    /// Creates a new `FrameId` from `id`.
    ///
    /// # Panics
    /// Panics if the identifier is not 4 uppercase ASCII characters or numbers, as
    /// that is usually a programmer error.
    pub fn new(id: &[u8; 4]) -> Self {
        Self::parse(id).expect("Frame IDs must be 4 uppercase ASCII characters or numbers.")
    }

    pub(crate) fn parse(id: &[u8; 4]) -> ParseResult<Self> {
        for ch in id {
            // Valid frame IDs can only contain uppercase ASCII chars and numbers.
            if !ch.is_ascii_uppercase() && !ch.is_ascii_digit() {
                return Err(ParseError::MalformedData);
            }
        }

        Ok(Self(*id))
    }

    /// Returns the inner identifier bytes.
    pub fn inner(&self) -> &[u8; 4] {
        &self.0
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        // We've asserted that this identifier is ASCII, so we can unwrap.
        str::from_utf8(&self.0).unwrap()
    }

    /// Returns whether the identifier begins with `ch`.
    pub fn starts_with(&self, ch: u8) -> bool {
        self.0[0] == ch
    }
}

impl Display for FrameId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.as_str()]
    }
}

impl PartialEq<[u8; 4]> for FrameId {
    fn eq(&self, other: &[u8; 4]) -> bool {
        self.0 == *other
    }
}

impl PartialEq<&[u8; 4]> for FrameId {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        self == *other
    }
}

/// A single frame of an ID3v2 tag.
///
/// A frame is the combination of a typed [body](FrameBody) and the optional frame
/// flags. Frames decoded from an ID3v2.2 tag have no flags, as the ID3v2.2 frame
/// header has no room for them; frames constructed programmatically usually leave the
/// flags empty as well, in which case version-appropriate defaults are written.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The frame flags, or `None` to use the defaults when written.
    pub flags: Option<FrameFlags>,
    /// The typed content of this frame.
    pub body: FrameBody,
}

impl Frame {
    /// Creates a new flagless frame from `body`.
    pub fn new(body: impl Into<FrameBody>) -> Self {
        Self {
            flags: None,
            body: body.into(),
        }
    }

    /// Creates a new frame from `body` with explicit `flags`.
    pub fn with_flags(body: impl Into<FrameBody>, flags: FrameFlags) -> Self {
        Self {
            flags: Some(flags),
            body: body.into(),
        }
    }

    /// Returns the identifier of this frame, in its ID3v2.3/ID3v2.4 form.
    pub fn id(&self) -> FrameId {
        self.body.id()
    }

    /// Returns the key that makes this frame unique in a tag.
    ///
    /// See [`FrameBody::key`](FrameBody::key).
    pub fn key(&self) -> String {
        self.body.key()
    }

    pub(crate) fn check_version(&self, version: Version) -> Result<(), String> {
        self.body.check_version(version)?;

        if let Some(flags) = self.flags {
            flags.check_version(version)?;
        }

        Ok(())
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.body.fmt(f)
    }
}

macro_rules! frame_bodies {(
    $(#[$meta:meta])*
    $vis:vis enum $name:ident {
        $($(#[$vmeta:meta])* $variant:ident($body:ty),)*
    }
) => {
        $(#[$meta])*
        $vis enum $name {
            $($(#[$vmeta])*
            $variant($body),)*
        }

        $(impl From<$body> for $name {
            fn from(body: $body) -> Self {
                Self::$variant(body)
            }
        })*

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                match self {
                    $(Self::$variant(body) => body.fmt(f),)*
                }
            }
        }
    }
}

frame_bodies! {
    /// The typed content of a frame, one variant per frame kind.
    ///
    /// Identifiers are given in their `ID3v2.2/ID3v2.3+` pairs. Frame kinds whose
    /// identifier carries meaning [text information and URL links] store it in their
    /// body; for every other kind the identifier is implied by the variant.
    #[derive(Debug, Clone, PartialEq)]
    pub enum FrameBody {
        /// Text information [`T***` except `TXX`/`TXXX`].
        Text(TextFrame),
        /// User-defined text information [`TXX`/`TXXX`].
        UserText(UserTextFrame),
        /// URL link [`W***` except `WXX`/`WXXX`].
        Url(UrlFrame),
        /// User-defined URL link [`WXX`/`WXXX`].
        UserUrl(UserUrlFrame),
        /// Unique file identifier [`UFI`/`UFID`].
        FileId(FileIdFrame),
        /// Involved people list [`IPL`/`IPLS`].
        Credits(CreditsFrame),
        /// Music CD identifier [`MCI`/`MCDI`].
        MusicCdId(MusicCdIdFrame),
        /// Event timing codes [`ETC`/`ETCO`].
        EventTimingCodes(EventTimingCodesFrame),
        /// MPEG location lookup table [`MLL`/`MLLT`].
        MpegLookupTable(MpegLookupTableFrame),
        /// Synchronised tempo codes [`STC`/`SYTC`].
        SyncedTempoCodes(SyncedTempoCodesFrame),
        /// Unsynchronised lyrics [`ULT`/`USLT`].
        UnsyncLyrics(UnsyncLyricsFrame),
        /// Synchronised lyrics [`SLT`/`SYLT`].
        SyncedLyrics(SyncedLyricsFrame),
        /// Comment [`COM`/`COMM`].
        Comments(CommentsFrame),
        /// Relative volume adjustment [`RVA`/`RVAD`, ID3v2.2/ID3v2.3 only].
        RelativeVolume(RelativeVolumeFrame),
        /// Relative volume adjustment 2 [`RVA2`, ID3v2.4 only].
        RelativeVolume2(RelativeVolumeFrame2),
        /// Equalisation [`EQU`/`EQUA`, ID3v2.2/ID3v2.3 only].
        Equalisation(EqualisationFrame),
        /// Equalisation 2 [`EQU2`, ID3v2.4 only].
        Equalisation2(EqualisationFrame2),
        /// Reverb [`REV`/`RVRB`].
        Reverb(ReverbFrame),
        /// Attached picture [`PIC`/`APIC`].
        AttachedPicture(AttachedPictureFrame),
        /// General encapsulated object [`GEO`/`GEOB`].
        GeneralObject(GeneralObjectFrame),
        /// Play counter [`CNT`/`PCNT`].
        PlayCounter(PlayCounterFrame),
        /// Popularimeter [`POP`/`POPM`].
        Popularimeter(PopularimeterFrame),
        /// Recommended buffer size [`BUF`/`RBUF`].
        RecommendedBuffer(RecommendedBufferFrame),
        /// Audio encryption [`CRA`/`AENC`].
        AudioEncryption(AudioEncryptionFrame),
    }
}

impl FrameBody {
    /// Returns the identifier of this frame, in its ID3v2.3/ID3v2.4 form.
    pub fn id(&self) -> FrameId {
        match self {
            Self::Text(body) => body.id(),
            Self::UserText(_) => FrameId::new(b"TXXX"),
            Self::Url(body) => body.id(),
            Self::UserUrl(_) => FrameId::new(b"WXXX"),
            Self::FileId(_) => FrameId::new(b"UFID"),
            Self::Credits(_) => FrameId::new(b"IPLS"),
            Self::MusicCdId(_) => FrameId::new(b"MCDI"),
            Self::EventTimingCodes(_) => FrameId::new(b"ETCO"),
            Self::MpegLookupTable(_) => FrameId::new(b"MLLT"),
            Self::SyncedTempoCodes(_) => FrameId::new(b"SYTC"),
            Self::UnsyncLyrics(_) => FrameId::new(b"USLT"),
            Self::SyncedLyrics(_) => FrameId::new(b"SYLT"),
            Self::Comments(_) => FrameId::new(b"COMM"),
            Self::RelativeVolume(_) => FrameId::new(b"RVAD"),
            Self::RelativeVolume2(_) => FrameId::new(b"RVA2"),
            Self::Equalisation(_) => FrameId::new(b"EQUA"),
            Self::Equalisation2(_) => FrameId::new(b"EQU2"),
            Self::Reverb(_) => FrameId::new(b"RVRB"),
            Self::AttachedPicture(_) => FrameId::new(b"APIC"),
            Self::GeneralObject(_) => FrameId::new(b"GEOB"),
            Self::PlayCounter(_) => FrameId::new(b"PCNT"),
            Self::Popularimeter(_) => FrameId::new(b"POPM"),
            Self::RecommendedBuffer(_) => FrameId::new(b"RBUF"),
            Self::AudioEncryption(_) => FrameId::new(b"AENC"),
        }
    }

    /// Returns the key that makes this frame unique in a tag.
    ///
    /// The key is the identifier plus whatever sub-field the standard allows duplicate
    /// frames to be distinguished by, e.g. `COMM:<desc>:<lang>` or `APIC:<desc>`. Two
    /// frames with the same key cannot legally coexist in one tag.
    pub fn key(&self) -> String {
        match self {
            Self::UserText(body) => format!["TXXX:{}", body.desc],
            Self::UserUrl(body) => format!["WXXX:{}", body.desc],
            Self::FileId(body) => format!["UFID:{}", body.owner],
            Self::UnsyncLyrics(body) => format!["USLT:{}:{}", body.desc, body.lang],
            Self::SyncedLyrics(body) => format!["SYLT:{}:{}", body.desc, body.lang],
            Self::Comments(body) => format!["COMM:{}:{}", body.desc, body.lang],
            Self::RelativeVolume2(body) => format!["RVA2:{}", body.ident],
            Self::Equalisation2(body) => format!["EQU2:{}", body.ident],
            Self::AttachedPicture(body) => format!["APIC:{}", body.desc],
            Self::GeneralObject(body) => format!["GEOB:{}", body.desc],
            Self::Popularimeter(body) => format!["POPM:{}", body.email],
            Self::AudioEncryption(body) => format!["AENC:{}", body.owner],
            _ => self.id().to_string(),
        }
    }

    /// Checks whether this frame can be represented in `version`, by its content.
    pub(crate) fn check_version(&self, version: Version) -> Result<(), String> {
        match self {
            Self::Text(body) => body.check_version(version),
            Self::Url(body) => body.check_version(version),
            Self::AttachedPicture(body) => body.check_version(version),

            Self::Credits(_) | Self::RelativeVolume(_) | Self::Equalisation(_)
                if version == Version::V24 =>
            {
                Err(format!["{} is not supported in ID3v2.4", self.id()])
            }

            Self::RelativeVolume2(_) | Self::Equalisation2(_) if version < Version::V24 => {
                Err(format!["{} is only supported in ID3v2.4", self.id()])
            }

            _ => Ok(()),
        }
    }
}

pub(crate) fn parse(version: Version, stream: &mut BufStream) -> ParseResult<Frame> {
    let header = FrameHeader::parse(version, stream)?;
    let mut body_stream = stream.slice_stream(header.size)?;
    let flags = header.flags;

    // Compressed and encrypted payloads are opaque to this codec, and parsing one as
    // plain frame data would only yield garbage.
    if flags.compressed || flags.encrypted {
        error!(
            "compressed or encrypted frame {} cannot be parsed",
            header.id
        );
        return Err(ParseError::Unsupported);
    }

    // ID3v2.4 frame-level unsynchronisation covers everything after the frame header,
    // so it has to be reversed before the remaining flag data is read.
    let decoded;

    if version == Version::V24 && flags.unsync {
        decoded = syncdata::decode(body_stream.take_rest());
        body_stream = BufStream::new(&decoded);
    }

    if flags.has_group {
        body_stream.skip(1)?;
    }

    if flags.has_data_len {
        body_stream.skip(4)?;
    }

    let body = parse_body(header.id, version, &mut body_stream)?;

    // ID3v2.2 frame headers have no flag bytes.
    let flags = match version {
        Version::V22 => None,
        _ => Some(flags),
    };

    Ok(Frame { flags, body })
}

fn parse_body(id: FrameId, version: Version, stream: &mut BufStream) -> ParseResult<FrameBody> {
    // To parse most frames, we have to manually go through and determine what kind of
    // frame to create based on the frame id. There are many frame possibilities, so
    // there are many match arms.

    let body: FrameBody = match id.inner() {
        // Unique file identifier [Frames 4.1]
        b"UFID" => FileIdFrame::parse(stream)?.into(),

        // User-defined text information [Frames 4.2.2]
        b"TXXX" => UserTextFrame::parse(stream)?.into(),

        // Involved people list [Frames 4.4 in ID3v2.3]
        b"IPLS" => CreditsFrame::parse(stream)?.into(),

        // User-defined URL link [Frames 4.3.2]
        b"WXXX" => UserUrlFrame::parse(stream)?.into(),

        // Music CD identifier [Frames 4.5]
        b"MCDI" => MusicCdIdFrame::parse(stream).into(),

        // Event timing codes [Frames 4.6]
        b"ETCO" => EventTimingCodesFrame::parse(stream)?.into(),

        // MPEG location lookup table [Frames 4.7]
        b"MLLT" => MpegLookupTableFrame::parse(stream)?.into(),

        // Synchronised tempo codes [Frames 4.8]
        b"SYTC" => SyncedTempoCodesFrame::parse(stream)?.into(),

        // Unsynchronised lyrics [Frames 4.9]
        b"USLT" => UnsyncLyricsFrame::parse(stream)?.into(),

        // Synchronised lyrics [Frames 4.10]
        b"SYLT" => SyncedLyricsFrame::parse(stream)?.into(),

        // Comments [Frames 4.11]
        b"COMM" => CommentsFrame::parse(stream)?.into(),

        // Relative volume adjustment [Frames 4.12 in ID3v2.3]
        b"RVAD" => RelativeVolumeFrame::parse(stream)?.into(),

        // Relative volume adjustment 2 [Frames 4.11 in ID3v2.4]
        b"RVA2" => RelativeVolumeFrame2::parse(stream)?.into(),

        // Equalisation [Frames 4.13 in ID3v2.3]
        b"EQUA" => EqualisationFrame::parse(stream)?.into(),

        // Equalisation 2 [Frames 4.12 in ID3v2.4]
        b"EQU2" => EqualisationFrame2::parse(stream)?.into(),

        // Reverb [Frames 4.14]
        b"RVRB" => ReverbFrame::parse(stream)?.into(),

        // Attached picture [Frames 4.15]. The ID3v2.2 body differs structurally.
        b"APIC" if version == Version::V22 => AttachedPictureFrame::parse_v2(stream)?.into(),
        b"APIC" => AttachedPictureFrame::parse(stream)?.into(),

        // General encapsulated object [Frames 4.16]
        b"GEOB" => GeneralObjectFrame::parse(stream)?.into(),

        // Play counter [Frames 4.17]
        b"PCNT" => PlayCounterFrame::parse(stream).into(),

        // Popularimeter [Frames 4.18]
        b"POPM" => PopularimeterFrame::parse(stream)?.into(),

        // Recommended buffer size [Frames 4.19]
        b"RBUF" => RecommendedBufferFrame::parse(stream)?.into(),

        // Audio encryption [Frames 4.20]
        b"AENC" => AudioEncryptionFrame::parse(stream)?.into(),

        // Generic text information
        _ if TextFrame::is_id(id) => TextFrame::parse(id, stream)?.into(),

        // Generic URL link
        _ if UrlFrame::is_id(id) => UrlFrame::parse(id, stream)?.into(),

        _ => {
            error!("unrecognised frame {}", id);
            return Err(ParseError::Unsupported);
        }
    };

    Ok(body)
}

pub(crate) fn render(frame: &Frame, version: Version, encoding: Encoding) -> SaveResult<Vec<u8>> {
    let mut body = frame.body.render(version, encoding)?;

    let flags = match (version, frame.flags) {
        // ID3v2.2 frame headers carry no flags.
        (Version::V22, _) => FrameFlags::default(),
        (_, Some(flags)) => flags,
        (_, None) => FrameFlags::defaults_for(frame.body.id()),
    };

    // Flag data that counts into the frame size but precedes the body proper.
    let mut flag_data = Vec::new();

    match version {
        Version::V22 => {}

        Version::V23 => {
            if flags.compressed {
                flag_data.extend((body.len() as u32).to_be_bytes());
            }

            if flags.encrypted {
                flag_data.push(0);
            }

            if flags.has_group {
                flag_data.push(0);
            }
        }

        Version::V24 => {
            if flags.has_group {
                flag_data.push(0);
            }

            if flags.encrypted {
                flag_data.push(0);
            }

            if flags.has_data_len {
                flag_data.extend(syncdata::from_u28(body.len() as u32));
            }

            if flags.unsync {
                body = syncdata::encode(&body);
            }
        }
    }

    let mut data = header::render(frame.body.id(), version, flags, flag_data.len() + body.len())?;
    data.extend(flag_data);
    data.extend(body);

    Ok(data)
}

impl FrameBody {
    pub(crate) fn render(&self, version: Version, encoding: Encoding) -> SaveResult<Vec<u8>> {
        let data = match self {
            Self::Text(body) => body.render(encoding),
            Self::UserText(body) => body.render(encoding),
            Self::Url(body) => body.render(),
            Self::UserUrl(body) => body.render(encoding),
            Self::FileId(body) => body.render()?,
            Self::Credits(body) => body.render(encoding),
            Self::MusicCdId(body) => body.render(),
            Self::EventTimingCodes(body) => body.render(),
            Self::MpegLookupTable(body) => body.render()?,
            Self::SyncedTempoCodes(body) => body.render(),
            Self::UnsyncLyrics(body) => body.render(encoding),
            Self::SyncedLyrics(body) => body.render(encoding),
            Self::Comments(body) => body.render(encoding),
            Self::RelativeVolume(body) => body.render(),
            Self::RelativeVolume2(body) => body.render(),
            Self::Equalisation(body) => body.render()?,
            Self::Equalisation2(body) => body.render(),
            Self::Reverb(body) => body.render(),
            Self::AttachedPicture(body) if version == Version::V22 => body.render_v2(encoding),
            Self::AttachedPicture(body) => body.render(encoding),
            Self::GeneralObject(body) => body.render(encoding),
            Self::PlayCounter(body) => body.render(),
            Self::Popularimeter(body) => body.render(),
            Self::RecommendedBuffer(body) => body.render()?,
            Self::AudioEncryption(body) => body.render(),
        };

        Ok(data)
    }
}
