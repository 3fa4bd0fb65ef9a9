//! Media statistics frames.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::ParseResult;
use log::warn;
use std::fmt::{self, Display, Formatter};

/// How many times the audio has been played.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayCounterFrame {
    pub plays: u64,
}

impl PlayCounterFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> Self {
        Self {
            plays: read_play_count(stream),
        }
    }

    pub(crate) fn render(&self) -> Vec<u8> {
        render_play_count(self.plays)
    }
}

impl Display for PlayCounterFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.plays]
    }
}

/// A rating of the audio alongside a per-user play count.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PopularimeterFrame {
    /// The email of the user this rating belongs to.
    pub email: String,
    /// The rating, from 1 [worst] to 255 [best], with 0 meaning unrated.
    pub rating: u8,
    pub plays: u64,
}

impl PopularimeterFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let email = string::read_terminated(Encoding::Latin1, stream);
        let rating = stream.read_u8()?;
        let plays = read_play_count(stream);

        Ok(Self {
            email,
            rating,
            plays,
        })
    }

    pub(crate) fn render(&self) -> Vec<u8> {
        let mut result = string::render_terminated(Encoding::Latin1, &self.email);

        result.push(self.rating);
        result.extend(render_play_count(self.plays));

        result
    }

    /// This rating expressed as the usual 0-5 stars.
    pub fn rating_simple(&self) -> u8 {
        match self.rating {
            0 => 0,
            1..=63 => 1,
            64..=127 => 2,
            128..=195 => 3,
            196..=254 => 4,
            255 => 5,
        }
    }
}

impl Display for PopularimeterFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![
            f,
            "{} [{}/255, plays={}]",
            self.email, self.rating, self.plays
        ]
    }
}

fn read_play_count(stream: &mut BufStream) -> u64 {
    // A play counter is at least 4 bytes, but grows a byte at a time once it overflows
    // its current width. We cap it to a u64, which would take half a million years of
    // continuous listening to exceed. A missing counter is simply zero plays.
    let mut plays: u64 = 0;

    for &byte in stream.take_rest() {
        if plays > u64::MAX >> 8 {
            warn!("play count exceeds a u64, clamping");
            return u64::MAX;
        }

        plays = plays << 8 | u64::from(byte);
    }

    plays
}

fn render_play_count(play_count: u64) -> Vec<u8> {
    let bytes = play_count.to_be_bytes();

    for i in 0..4 {
        // The value is wider than 4 bytes, so return the 4 low bytes plus the
        // populated bytes we just found.
        if bytes[i] > 0 {
            return bytes[i..].into();
        }
    }

    // Otherwise return the low 4 bytes, the minimum width set by the spec.
    bytes[4..].into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::FrameBody;

    // A 4-out-of-5-star rating and 761 plays.
    const POPM_DATA: &[u8] = b"POPM\x00\x00\x00\x1B\x00\x00\
                               ratings@muzik.example\0\
                               \xE0\
                               \x00\x00\x02\xF9";

    const PCNT_DATA: &[u8] = b"PCNT\x00\x00\x00\x04\x00\x00\
                               \x00\x01\x67\xD1";

    #[test]
    fn parse_popm() {
        make_frame!(FrameBody::Popularimeter, POPM_DATA, frame);

        assert_eq!(frame.email, "ratings@muzik.example");
        assert_eq!(frame.rating, 0xE0);
        assert_eq!(frame.rating_simple(), 4);
        assert_eq!(frame.plays, 761);
    }

    #[test]
    fn parse_pcnt() {
        make_frame!(FrameBody::PlayCounter, PCNT_DATA, frame);

        assert_eq!(frame.plays, 92113);
    }

    #[test]
    fn parse_widened_pcnt() {
        // A counter that has already overflowed its fifth byte.
        let mut stream = BufStream::new(b"\x21\x00\x00\x00\x00");
        let frame = PlayCounterFrame::parse(&mut stream);

        assert_eq!(frame.plays, 0x21_0000_0000);
    }

    #[test]
    fn render_popm() {
        let frame = PopularimeterFrame {
            email: String::from("ratings@muzik.example"),
            rating: 0xE0,
            plays: 761,
        };

        assert_render!(frame, Encoding::Latin1, POPM_DATA);
    }

    #[test]
    fn render_pcnt() {
        let frame = PlayCounterFrame { plays: 92113 };

        assert_render!(frame, Encoding::Latin1, PCNT_DATA);
    }

    #[test]
    fn widened_play_counts() {
        // Once a counter no longer fits into 4 bytes, only the bytes that carry
        // value are added.
        assert_eq!(render_play_count(0x21_0000_0000), b"\x21\x00\x00\x00\x00");
        assert_eq!(
            render_play_count(0x0460_37F1_9C02),
            b"\x04\x60\x37\xF1\x9C\x02"
        );
    }
}
