//! Lyrics frames.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::frames::{encoding, Language, TimestampFormat};
use crate::ParseResult;
use std::fmt::{self, Display, Formatter};

/// Unsynchronised lyrics or a text transcription.
///
/// The wire format is identical to [`CommentsFrame`](crate::frames::CommentsFrame);
/// the two only differ in intent.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct UnsyncLyricsFrame {
    /// The language the lyrics are written in.
    pub lang: Language,
    /// A description of the lyrics. Can be empty.
    pub desc: String,
    /// The lyrics themselves.
    pub text: String,
}

impl UnsyncLyricsFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let lang = Language::parse(stream)?;
        let desc = string::read_terminated(encoding, stream);
        let text = string::read(encoding, stream);

        Ok(Self { lang, desc, text })
    }

    pub(crate) fn render(&self, encoding: Encoding) -> Vec<u8> {
        let mut result = vec![encoding::render(encoding)];

        result.extend(&self.lang);
        result.extend(string::render_terminated(encoding, &self.desc));
        result.extend(string::render(encoding, &self.text));

        result
    }
}

impl Display for UnsyncLyricsFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.text]
    }
}

/// Lyrics synchronised to points in the audio.
///
/// Every entry pairs a fragment of text with the time it occurs at, in the units
/// given by [`format`](SyncedLyricsFrame::format). The entries should be sorted in
/// chronological order.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SyncedLyricsFrame {
    /// The language the lyrics are written in.
    pub lang: Language,
    /// The units of every entry's timestamp.
    pub format: TimestampFormat,
    /// What the synchronised text is, e.g `0x01` for lyrics. The content types are
    /// listed in the ID3v2 specification.
    pub content_type: u8,
    /// A description of the lyrics. Can be empty.
    pub desc: String,
    /// The synchronised text entries.
    pub lyrics: Vec<LyricEntry>,
}

/// A single entry of [`SyncedLyricsFrame`](SyncedLyricsFrame).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricEntry {
    /// The text of this entry, usually a single line or syllable.
    pub text: String,
    /// When this entry occurs.
    pub time: i32,
}

impl SyncedLyricsFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let lang = Language::parse(stream)?;
        let format = TimestampFormat::parse(stream.read_u8()?);
        let content_type = stream.read_u8()?;
        let desc = string::read_terminated(encoding, stream);

        let mut lyrics = Vec::new();

        while !stream.is_empty() {
            let text = string::read_terminated(encoding, stream);
            let time = stream.read_be_i32()?;

            lyrics.push(LyricEntry { text, time });
        }

        Ok(Self {
            lang,
            format,
            content_type,
            desc,
            lyrics,
        })
    }

    pub(crate) fn render(&self, encoding: Encoding) -> Vec<u8> {
        let mut result = vec![encoding::render(encoding)];

        result.extend(&self.lang);
        result.push(self.format as u8);
        result.push(self.content_type);
        result.extend(string::render_terminated(encoding, &self.desc));

        for entry in &self.lyrics {
            result.extend(string::render_terminated(encoding, &entry.text));
            result.extend(entry.time.to_be_bytes());
        }

        result
    }
}

impl Display for SyncedLyricsFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, entry) in self.lyrics.iter().enumerate() {
            if i > 0 {
                writeln![f]?;
            }

            write![f, "{}", entry.text]?;
        }

        Ok(())
    }
}
