//! Frames around opaque binary data.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::{ParseError, ParseResult, SaveError, SaveResult};
use log::error;
use std::fmt::{self, Display, Formatter};

/// A database identifier for the audio file.
///
/// The owner names the database [usually as a URL or email] and must not be empty;
/// the identifier itself is at most 64 bytes of arbitrary data.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct FileIdFrame {
    /// The database the identifier belongs to.
    pub owner: String,
    /// The identifier data.
    pub identifier: Vec<u8>,
}

impl FileIdFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let owner = string::read_terminated(Encoding::Latin1, stream);

        if owner.is_empty() {
            error!("file identifiers must have an owner");
            return Err(ParseError::MalformedData);
        }

        let identifier = stream.take_rest().to_vec();

        if identifier.len() > 64 {
            error!("file identifiers cannot exceed 64 bytes");
            return Err(ParseError::MalformedData);
        }

        Ok(Self { owner, identifier })
    }

    pub(crate) fn render(&self) -> SaveResult<Vec<u8>> {
        if self.owner.is_empty() {
            return Err(SaveError::OutOfRange(String::from(
                "file identifiers must have an owner",
            )));
        }

        if self.identifier.len() > 64 {
            return Err(SaveError::OutOfRange(String::from(
                "file identifiers cannot exceed 64 bytes",
            )));
        }

        let mut result = string::render_terminated(Encoding::Latin1, &self.owner);
        result.extend(self.identifier.iter());

        Ok(result)
    }
}

impl Display for FileIdFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.owner]
    }
}

/// The table of contents of the CD the audio was ripped from.
///
/// The contents are the raw CD table of contents, which this codec treats as opaque
/// bytes.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct MusicCdIdFrame {
    pub data: Vec<u8>,
}

impl MusicCdIdFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> Self {
        Self {
            data: stream.take_rest().to_vec(),
        }
    }

    pub(crate) fn render(&self) -> Vec<u8> {
        self.data.clone()
    }
}

impl Display for MusicCdIdFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{} bytes", self.data.len()]
    }
}

/// A hint for how much buffer a streaming server should recommend to clients.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendedBufferFrame {
    /// The recommended buffer size, in bytes. Limited to 24 bits.
    pub buffer_size: u32,
    /// Whether an ID3 tag might be embedded in the stream itself.
    pub embedded_info: bool,
    /// The offset from the end of this tag to the next one, if known.
    /// Limited to 24 bits.
    pub next_tag_offset: Option<u32>,
}

impl RecommendedBufferFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let buffer_size = stream.read_be_u24()?;
        let embedded_info = stream.read_u8()? & 0x01 != 0;

        let next_tag_offset = if stream.is_empty() {
            None
        } else {
            Some(stream.read_be_u24()?)
        };

        Ok(Self {
            buffer_size,
            embedded_info,
            next_tag_offset,
        })
    }

    pub(crate) fn render(&self) -> SaveResult<Vec<u8>> {
        for (field, value) in [
            ("buffer size", Some(self.buffer_size)),
            ("next tag offset", self.next_tag_offset),
        ] {
            if value.unwrap_or_default() > 0xFFFFFF {
                return Err(SaveError::OutOfRange(format![
                    "recommended buffer {} does not fit into 24 bits",
                    field
                ]));
            }
        }

        let mut result = Vec::with_capacity(7);

        result.extend(&self.buffer_size.to_be_bytes()[1..]);
        result.push(u8::from(self.embedded_info));

        if let Some(offset) = self.next_tag_offset {
            result.extend(&offset.to_be_bytes()[1..]);
        }

        Ok(result)
    }
}

impl Display for RecommendedBufferFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{} bytes", self.buffer_size]
    }
}

/// A marker that the audio stream is encrypted.
///
/// The owner names the organisation responsible for the encryption scheme; the
/// preview fields bound an unencrypted part of the audio that players can fall
/// back to.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct AudioEncryptionFrame {
    /// The organisation or scheme that encrypted the audio.
    pub owner: String,
    /// The start of the unencrypted preview, in MPEG frames.
    pub preview_start: u16,
    /// The length of the unencrypted preview, in MPEG frames.
    pub preview_length: u16,
    /// Scheme-specific encryption information.
    pub encryption_info: Vec<u8>,
}

impl AudioEncryptionFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let owner = string::read_terminated(Encoding::Latin1, stream);
        let preview_start = stream.read_be_u16()?;
        let preview_length = stream.read_be_u16()?;
        let encryption_info = stream.take_rest().to_vec();

        Ok(Self {
            owner,
            preview_start,
            preview_length,
            encryption_info,
        })
    }

    pub(crate) fn render(&self) -> Vec<u8> {
        let mut result = string::render_terminated(Encoding::Latin1, &self.owner);

        result.extend(self.preview_start.to_be_bytes());
        result.extend(self.preview_length.to_be_bytes());
        result.extend(self.encryption_info.iter());

        result
    }
}

impl Display for AudioEncryptionFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.owner]
    }
}
