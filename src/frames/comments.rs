//! Comment frames.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::frames::{encoding, Language};
use crate::ParseResult;
use std::fmt::{self, Display, Formatter};

/// A frame that contains a comment.
///
/// This frame differs from [`UserTextFrame`](crate::frames::UserTextFrame) in that
/// instead of containing program-defined text information, the frame contains
/// user-defined text information without any specific format. In practice the two are
/// used interchangeably, such as with `iTunNORM` comments, so one should be prepared
/// to parse custom information from either.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct CommentsFrame {
    /// The language that `desc` and `text` are written in.
    pub lang: Language,
    /// The description of the text, usually written by a user. Can be empty.
    pub desc: String,
    /// The text contents of this frame.
    pub text: String,
}

impl CommentsFrame {
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

impl Display for CommentsFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.text]
    }
}
