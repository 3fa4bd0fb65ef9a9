//! Text information frames.
//!
//! Text frames store specific text information, such as a song name. Any frame whose
//! identifier begins with `T` is a text frame, with `TXXX` and `IPLS` carrying extra
//! structure on top of the base layout.
//!
//! The set of valid text identifiers shifted between versions: `TYER`, `TDAT`, `TIME`,
//! `TORY`, `TRDA` and `TSIZ` were dropped in ID3v2.4, which added the timestamp and
//! sort-order frames in their place. The version checks on these frames reflect that;
//! the codec never rewrites one frame into another.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::frames::{encoding, FrameId};
use crate::tag::Version;
use crate::{compat, ParseResult};
use log::info;
use std::fmt::{self, Display, Formatter};

/// Specific text-based metadata.
///
/// This frame corresponds to every `T***` identifier except `TXXX`, from `TIT2`
/// [title] and `TPE1` [artist] to the numeric `TLEN` [length]. Many identifiers
/// imply an invariant on the string [e.g `TYER` must be a 4-digit year] that this
/// codec does not enforce.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFrame {
    frame_id: FrameId,
    /// The text content of this frame.
    pub text: String,
}

impl TextFrame {
    /// Creates a new instance of this frame from `frame_id`.
    ///
    /// For a more ergonomic instantiation of this frame, try the
    /// [`text_frame!`](crate::text_frame) macro.
    ///
    /// # Panics
    /// This function will panic if the Frame ID is not a valid `TextFrame` ID.
    pub fn new(frame_id: FrameId) -> Self {
        if !Self::is_id(frame_id) {
            panic!("expected a valid text frame id, found {}", frame_id);
        }

        Self {
            frame_id,
            text: String::new(),
        }
    }

    /// Returns if `frame_id` is valid for this frame.
    pub fn is_id(frame_id: FrameId) -> bool {
        frame_id.starts_with(b'T') && frame_id != b"TXXX"
    }

    /// Returns the identifier of this frame.
    pub fn id(&self) -> FrameId {
        self.frame_id
    }

    pub(crate) fn parse(frame_id: FrameId, stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let text = string::read(encoding, stream);

        Ok(Self { frame_id, text })
    }

    pub(crate) fn render(&self, encoding: Encoding) -> Vec<u8> {
        let mut result = vec![encoding::render(encoding)];

        // The frame size bounds the text, so no terminator is written.
        result.extend(string::render(encoding, &self.text));

        result
    }

    pub(crate) fn check_version(&self, version: Version) -> Result<(), String> {
        match version {
            Version::V22 if compat::downgrade_id(self.frame_id).is_err() => {
                Err(format!["{} has no ID3v2.2 analogue", self.frame_id])
            }

            Version::V23 if compat::V4_ADDED.contains(&self.frame_id.inner()) => {
                Err(format!["{} is only supported in ID3v2.4", self.frame_id])
            }

            Version::V24 if compat::V4_REMOVED.contains(&self.frame_id.inner()) => {
                Err(format!["{} is not supported in ID3v2.4", self.frame_id])
            }

            _ => Ok(()),
        }
    }
}

impl Display for TextFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.text]
    }
}

/// Text information not represented by other frames.
///
/// This frame can be used to add program-defined tags without having to create a new
/// frame implementation. Identifying information should be put into the
/// [`desc`](UserTextFrame::desc) field.
///
/// Notable examples of these frames include:
/// - ReplayGain tags [ex. `replaygain_track_gain`]
/// - MusicBrainz tags
#[derive(Default, Debug, Clone, PartialEq)]
pub struct UserTextFrame {
    /// A description of the contents in this frame. This should be unique
    /// and non-empty.
    pub desc: String,
    /// The text content of this frame.
    pub text: String,
}

impl UserTextFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let desc = string::read_terminated(encoding, stream);
        let text = string::read(encoding, stream);

        Ok(Self { desc, text })
    }

    pub(crate) fn render(&self, encoding: Encoding) -> Vec<u8> {
        let mut result = vec![encoding::render(encoding)];

        result.extend(string::render_terminated(encoding, &self.desc));
        result.extend(string::render(encoding, &self.text));

        result
    }
}

impl Display for UserTextFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.text]
    }
}

/// A mapping between involved people and their roles.
///
/// Every entry pairs a role with the people who filled it; multiple people are
/// usually delimited with a comma inside the second string. The frame only exists in
/// ID3v2.2 and ID3v2.3, where it is `IPL` and `IPLS` respectively.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct CreditsFrame {
    /// The role-people pairs, in their original order.
    pub people: Vec<(String, String)>,
}

impl CreditsFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let mut strings = Vec::new();

        while !stream.is_empty() {
            strings.push(string::read_terminated(encoding, stream));
        }

        if strings.len() % 2 != 0 {
            // The spec says that this frame must contain an even number of entries.
            // If this frame does have an incomplete pair, we just pop it off and move on.
            info!("found an uneven amount of entries in IPLS, truncating");
            strings.pop();
        }

        let mut people = Vec::with_capacity(strings.len() / 2);
        let mut strings = strings.into_iter();

        while let Some(role) = strings.next() {
            // We eliminated the possibility of an incomplete pair earlier, so we can
            // just unwrap here.
            people.push((role, strings.next().unwrap()));
        }

        Ok(Self { people })
    }

    pub(crate) fn render(&self, encoding: Encoding) -> Vec<u8> {
        let mut result = vec![encoding::render(encoding)];

        for (i, (role, people)) in self.people.iter().enumerate() {
            // Terminate the previous pair's people string. The final string of the
            // body is left unterminated.
            if i > 0 {
                result.resize(result.len() + encoding.nul_size(), 0);
            }

            result.extend(string::render_terminated(encoding, role));
            result.extend(string::render(encoding, people));
        }

        result
    }
}

impl Display for CreditsFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, (role, people)) in self.people.iter().enumerate() {
            if i > 0 {
                writeln![f]?;
            }

            write![f, "{}: {}", role, people]?;
        }

        Ok(())
    }
}
