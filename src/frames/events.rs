//! Frames for timed media events.

use crate::core::io::BufStream;
use crate::ParseResult;
use log::warn;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// Key events within the audio, synchronised to points in the stream.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct EventTimingCodesFrame {
    /// The units of every event's timestamp.
    pub format: TimestampFormat,
    /// The timed events.
    pub events: Vec<Event>,
}

impl EventTimingCodesFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let format = TimestampFormat::parse(stream.read_u8()?);
        let mut events: Vec<Event> = Vec::new();

        while !stream.is_empty() {
            let event_type = EventType::parse(stream.read_u8()?);
            let time = stream.read_be_i32()?;

            events.push(Event { event_type, time });
        }

        Ok(Self { format, events })
    }

    pub(crate) fn render(&self) -> Vec<u8> {
        let mut result = vec![self.format as u8];

        // Technically events should be sorted by their time, but nobody seems to care
        // about this.
        for event in &self.events {
            result.push(event.event_type as u8);
            result.extend(event.time.to_be_bytes());
        }

        result
    }
}

impl Display for EventTimingCodesFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                write![f, ", "]?;
            }

            write![f, "{}", event]?;
        }

        Ok(())
    }
}

/// A single entry of [`EventTimingCodesFrame`](EventTimingCodesFrame).
#[derive(Debug, Eq, PartialEq, Clone, Copy, Default)]
pub struct Event {
    pub event_type: EventType,
    pub time: i32,
}

impl Ord for Event {
    /// Compares the time first, then event type.
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time.cmp(&other.time) {
            Ordering::Equal => self.event_type.cmp(&other.event_type),
            ord => ord,
        }
    }
}

impl PartialOrd<Self> for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{:?}", self.event_type]
    }
}

byte_enum! {
    #[derive(Ord, PartialOrd)]
    pub enum EventType {
        Padding = 0x00,
        EndOfInitialSilence = 0x01,
        IntroStart = 0x02,
        MainPartStart = 0x03,
        OutroStart = 0x04,
        OutroEnd = 0x05,
        VerseStart = 0x06,
        RefrainStart = 0x07,
        InterludeStart = 0x08,
        ThemeStart = 0x09,
        VariationStart = 0x0A,
        KeyChange = 0x0B,
        TimeChange = 0x0C,
        MomentaryUnwantedNoise = 0x0D,
        SustainedNoise = 0x0E,
        SustainedNoiseEnd = 0x0F,
        IntroEnd = 0x10,
        MainPartEnd = 0x11,
        VerseEnd = 0x12,
        RefrainEnd = 0x13,
        ThemeEnd = 0x14,
        Profanity = 0x15,
        ProfanityEnd = 0x16,
        Sync0 = 0xE0,
        Sync1 = 0xE1,
        Sync2 = 0xE2,
        Sync3 = 0xE3,
        Sync4 = 0xE4,
        Sync5 = 0xE5,
        Sync6 = 0xE6,
        Sync7 = 0xE7,
        Sync8 = 0xE8,
        Sync9 = 0xE9,
        SyncA = 0xEA,
        SyncB = 0xEB,
        SyncC = 0xEC,
        SyncD = 0xED,
        SyncE = 0xEE,
        SyncF = 0xEF,
        AudioEnd = 0xFD,
        AudioFileEnd = 0xFE,
    };
    EventType::Padding
}

impl Default for EventType {
    fn default() -> Self {
        EventType::Padding
    }
}

/// Tempo changes, synchronised to points in the stream.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SyncedTempoCodesFrame {
    /// The units of every tempo's timestamp.
    pub format: TimestampFormat,
    /// The timed tempo changes.
    pub tempos: Vec<Tempo>,
}

impl SyncedTempoCodesFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let format = TimestampFormat::parse(stream.read_u8()?);
        let mut tempos = Vec::new();

        while !stream.is_empty() {
            tempos.push(Tempo::parse(stream)?);
        }

        Ok(Self { format, tempos })
    }

    pub(crate) fn render(&self) -> Vec<u8> {
        let mut data = vec![self.format as u8];

        for tempo in &self.tempos {
            data.extend(tempo.render());
        }

        data
    }
}

impl Display for SyncedTempoCodesFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, tempo) in self.tempos.iter().enumerate() {
            if i > 0 {
                write![f, ", "]?;
            }

            write![f, "{}", tempo.bpm]?;
        }

        Ok(())
    }
}

/// A single entry of [`SyncedTempoCodesFrame`](SyncedTempoCodesFrame).
///
/// The tempo descriptor is one byte on the wire unless the tempo exceeds `0xFF`, in
/// which case a second byte carries the remainder. This caps the representable tempo
/// at 510 BPM; larger values are clamped when written. A BPM of 0 indicates a
/// beat-free interval and 1 a single beat followed by a beat-free interval.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Tempo {
    pub bpm: u16,
    pub time: i32,
}

impl Tempo {
    fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let mut bpm = u16::from(stream.read_u8()?);

        if bpm == 0xFF {
            bpm += u16::from(stream.read_u8()?);
        }

        let time = stream.read_be_i32()?;

        Ok(Self { bpm, time })
    }

    fn render(&self) -> Vec<u8> {
        let bpm = if self.bpm > 510 {
            warn!("tempo {} exceeds 510 BPM, clamping", self.bpm);
            510
        } else {
            self.bpm
        };

        let mut data: Vec<u8> = match bpm.checked_sub(0xFF) {
            Some(remainder) => vec![0xFF, remainder as u8],
            None => vec![bpm as u8],
        };

        data.extend(self.time.to_be_bytes());
        data
    }
}

byte_enum! {
    /// The units of a timestamp in a synchronised frame.
    ///
    /// For the best compatibility with other programs,
    /// [`Millis`](TimestampFormat::Millis) should be used.
    pub enum TimestampFormat {
        /// No unit was specified.
        Other = 0x00,
        /// Timestamps are in MPEG frames.
        MpegFrames = 0x01,
        /// Timestamps are in milliseconds.
        Millis = 0x02,
    };
    TimestampFormat::Other
}

impl Default for TimestampFormat {
    fn default() -> Self {
        TimestampFormat::Millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::FrameBody;

    // ETCO and SYTC default to the "discard on file alteration" flag.
    const ETCO_DATA: &[u8] = b"ETCO\x00\x00\x00\x10\x20\x00\
                               \x02\
                               \x06\
                               \x00\x00\x09\xC4\
                               \x07\
                               \x00\x00\x75\x30\
                               \xFD\
                               \x00\x02\xD2\xA8";

    const SYTC_DATA: &[u8] = b"SYTC\x00\x00\x00\x1D\x20\x00\
                               \x01\
                               \x00\
                               \x00\x00\x00\x00\
                               \x78\
                               \x00\x00\x13\x88\
                               \xFF\x00\
                               \x00\x00\xEA\x60\
                               \xFF\x2D\
                               \x00\x01\xD4\xC0\
                               \xFF\xFF\
                               \x00\x03\xA9\x80";

    #[test]
    fn parse_etco() {
        make_frame!(FrameBody::EventTimingCodes, ETCO_DATA, frame);

        assert_eq!(frame.format, TimestampFormat::Millis);
        assert_eq!(frame.events[0].event_type, EventType::VerseStart);
        assert_eq!(frame.events[0].time, 2500);
        assert_eq!(frame.events[1].event_type, EventType::RefrainStart);
        assert_eq!(frame.events[1].time, 30000);
        assert_eq!(frame.events[2].event_type, EventType::AudioEnd);
        assert_eq!(frame.events[2].time, 185_000);
    }

    #[test]
    fn render_etco() {
        let frame = EventTimingCodesFrame {
            format: TimestampFormat::Millis,
            events: vec![
                Event {
                    event_type: EventType::VerseStart,
                    time: 2500,
                },
                Event {
                    event_type: EventType::RefrainStart,
                    time: 30000,
                },
                Event {
                    event_type: EventType::AudioEnd,
                    time: 185_000,
                },
            ],
        };

        assert_render!(frame, crate::core::string::Encoding::Latin1, ETCO_DATA);
    }

    #[test]
    fn parse_sytc() {
        make_frame!(FrameBody::SyncedTempoCodes, SYTC_DATA, frame);

        assert_eq!(frame.format, TimestampFormat::MpegFrames);
        assert_eq!(frame.tempos[0], Tempo { bpm: 0, time: 0 });
        assert_eq!(frame.tempos[1], Tempo { bpm: 120, time: 5000 });
        assert_eq!(frame.tempos[2], Tempo { bpm: 255, time: 60000 });
        assert_eq!(frame.tempos[3], Tempo { bpm: 300, time: 120_000 });
        assert_eq!(frame.tempos[4], Tempo { bpm: 510, time: 240_000 });
    }

    #[test]
    fn render_sytc() {
        let frame = SyncedTempoCodesFrame {
            format: TimestampFormat::MpegFrames,
            tempos: vec![
                Tempo { bpm: 0, time: 0 },
                Tempo { bpm: 120, time: 5000 },
                Tempo { bpm: 255, time: 60000 },
                Tempo { bpm: 300, time: 120_000 },
                Tempo { bpm: 510, time: 240_000 },
            ],
        };

        assert_render!(frame, crate::core::string::Encoding::Latin1, SYTC_DATA);
    }

    #[test]
    fn parse_timestamp_format() {
        assert_eq!(TimestampFormat::parse(0), TimestampFormat::Other);
        assert_eq!(TimestampFormat::parse(1), TimestampFormat::MpegFrames);
        assert_eq!(TimestampFormat::parse(2), TimestampFormat::Millis);

        for i in 3..u8::MAX {
            assert_eq!(TimestampFormat::parse(i), TimestampFormat::Other);
        }
    }
}
