//! URL link frames.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::frames::{encoding, FrameId};
use crate::tag::Version;
use crate::{compat, ParseResult};
use std::fmt::{self, Display, Formatter};

/// A link to information relevant to the audio.
///
/// This frame corresponds to every `W***` identifier except `WXXX`, such as `WOAR`
/// [artist webpage] or `WCOP` [copyright information]. URLs are always ISO-8859-1.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlFrame {
    frame_id: FrameId,
    /// The URL this frame links to.
    pub url: String,
}

impl UrlFrame {
    /// Creates a new instance of this frame from `frame_id`.
    ///
    /// For a more ergonomic instantiation of this frame, try the
    /// [`url_frame!`](crate::url_frame) macro.
    ///
    /// # Panics
    /// This function will panic if the Frame ID is not a valid `UrlFrame` ID.
    pub fn new(frame_id: FrameId) -> Self {
        if !Self::is_id(frame_id) {
            panic!("expected a valid url frame id, found {}", frame_id);
        }

        Self {
            frame_id,
            url: String::new(),
        }
    }

    /// Returns if `frame_id` is valid for this frame.
    pub fn is_id(frame_id: FrameId) -> bool {
        frame_id.starts_with(b'W') && frame_id != b"WXXX"
    }

    /// Returns the identifier of this frame.
    pub fn id(&self) -> FrameId {
        self.frame_id
    }

    pub(crate) fn parse(frame_id: FrameId, stream: &mut BufStream) -> ParseResult<Self> {
        let url = string::read(Encoding::Latin1, stream);

        Ok(Self { frame_id, url })
    }

    pub(crate) fn render(&self) -> Vec<u8> {
        string::render(Encoding::Latin1, &self.url)
    }

    pub(crate) fn check_version(&self, version: Version) -> Result<(), String> {
        match version {
            Version::V22 if compat::downgrade_id(self.frame_id).is_err() => {
                Err(format!["{} has no ID3v2.2 analogue", self.frame_id])
            }

            _ => Ok(()),
        }
    }
}

impl Display for UrlFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.url]
    }
}

/// A link not represented by other frames.
///
/// Like [`UserTextFrame`](crate::frames::UserTextFrame), identifying information
/// should be put into the [`desc`](UserUrlFrame::desc) field. The description uses
/// the tag text encoding, while the URL itself is always ISO-8859-1.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct UserUrlFrame {
    /// A description of the contents in this frame. This should be unique
    /// and non-empty.
    pub desc: String,
    /// The URL this frame links to.
    pub url: String,
}

impl UserUrlFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let desc = string::read_terminated(encoding, stream);
        let url = string::read(Encoding::Latin1, stream);

        Ok(Self { desc, url })
    }

    pub(crate) fn render(&self, encoding: Encoding) -> Vec<u8> {
        let mut result = vec![encoding::render(encoding)];

        result.extend(string::render_terminated(encoding, &self.desc));
        result.extend(string::render(Encoding::Latin1, &self.url));

        result
    }
}

impl Display for UserUrlFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.url]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::FrameBody;

    const WOAR_DATA: &[u8] = b"WOAR\x00\x00\x00\x13\x00\x00\
                               https://example.com";

    const WXXX_DATA: &[u8] = b"WXXX\x00\x00\x00\x1A\x00\x00\
                               \x00\
                               Label\0\
                               https://example.com";

    #[test]
    fn parse_url() {
        make_frame!(FrameBody::Url, WOAR_DATA, frame);

        assert_eq!(frame.id(), b"WOAR");
        assert_eq!(frame.url, "https://example.com");
    }

    #[test]
    fn parse_wxxx() {
        make_frame!(FrameBody::UserUrl, WXXX_DATA, frame);

        assert_eq!(frame.desc, "Label");
        assert_eq!(frame.url, "https://example.com");
    }

    #[test]
    fn render_url() {
        let frame = crate::url_frame![b"WOAR"; "https://example.com"];

        assert_render!(frame, Encoding::Latin1, WOAR_DATA);
    }

    #[test]
    fn render_wxxx() {
        let frame = UserUrlFrame {
            desc: String::from("Label"),
            url: String::from("https://example.com"),
        };

        assert_render!(frame, Encoding::Latin1, WXXX_DATA);
    }
}
