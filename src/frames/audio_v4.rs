//! Audio adjustment frames from ID3v2.4.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::{ParseError, ParseResult};
use log::error;
use std::fmt::{self, Display, Formatter};

/// A relative volume adjustment keyed by channel type. ID3v2.4 only.
///
/// Unlike its ID3v2.3 counterpart, this frame can appear multiple times in a tag,
/// distinguished by its identification string.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RelativeVolumeFrame2 {
    /// The identification of this adjustment, e.g the situation it applies to.
    pub ident: String,
    /// The adjustments, one per channel type.
    pub channels: Vec<ChannelVolume>,
}

/// The volume adjustment of a single channel in
/// [`RelativeVolumeFrame2`](RelativeVolumeFrame2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelVolume {
    /// The channel the adjustment applies to.
    pub channel: ChannelType,
    /// The adjustment in dB, as a signed fixed-point value of 512ths.
    pub gain: i16,
    /// The peak volume of the channel. Zero means no peak was recorded, which is
    /// written as a zero-width field.
    pub peak: u32,
}

impl RelativeVolumeFrame2 {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let ident = string::read_terminated(Encoding::Latin1, stream);
        let mut channels = Vec::new();

        while !stream.is_empty() {
            let channel = ChannelType::parse(stream.read_u8()?);
            let gain = stream.read_be_i16()?;

            // The width of the peak field is declared per-channel, in bits.
            let bits = stream.read_u8()?;

            if bits > 32 {
                error!("a {}-bit peak volume cannot be represented", bits);
                return Err(ParseError::MalformedData);
            }

            let peak = stream.read_uint((usize::from(bits) + 7) / 8)?;

            channels.push(ChannelVolume {
                channel,
                gain,
                peak,
            });
        }

        Ok(Self { ident, channels })
    }

    pub(crate) fn render(&self) -> Vec<u8> {
        let mut result = string::render_terminated(Encoding::Latin1, &self.ident);

        for chan in &self.channels {
            result.push(chan.channel as u8);
            result.extend(chan.gain.to_be_bytes());

            let bits = peak_bits(chan.peak);

            result.push(bits);
            result.extend(&chan.peak.to_be_bytes()[4 - usize::from(bits / 8)..]);
        }

        result
    }
}

impl Display for RelativeVolumeFrame2 {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.ident]
    }
}

byte_enum! {
    /// The channel an adjustment applies to.
    #[derive(Ord, PartialOrd)]
    pub enum ChannelType {
        Other = 0x00,
        MasterVolume = 0x01,
        FrontRight = 0x02,
        FrontLeft = 0x03,
        BackRight = 0x04,
        BackLeft = 0x05,
        FrontCenter = 0x06,
        BackCenter = 0x07,
        Subwoofer = 0x08,
    };
    ChannelType::Other
}

/// An equalisation curve. ID3v2.4 only.
///
/// Like [`RelativeVolumeFrame2`](RelativeVolumeFrame2), this frame is distinguished
/// by its identification string, and replaced the incompatible ID3v2.3 `EQUA` frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualisationFrame2 {
    /// How the curve should be interpolated between the adjustment points.
    pub method: InterpolationMethod,
    /// The identification of this curve, e.g the situation it applies to.
    pub ident: String,
    /// The adjustment points, ordered by increasing frequency.
    pub adjustments: Vec<EqPoint>,
}

/// A single point of [`EqualisationFrame2`](EqualisationFrame2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EqPoint {
    /// The frequency of the point, in intervals of 1/2 Hz.
    pub frequency: u16,
    /// The volume adjustment in dB, as a signed fixed-point value of 512ths.
    pub volume: i16,
}

impl EqualisationFrame2 {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let method = InterpolationMethod::parse(stream.read_u8()?);
        let ident = string::read_terminated(Encoding::Latin1, stream);

        let mut adjustments = Vec::new();

        while !stream.is_empty() {
            let frequency = stream.read_be_u16()?;
            let volume = stream.read_be_i16()?;

            adjustments.push(EqPoint { frequency, volume });
        }

        Ok(Self {
            method,
            ident,
            adjustments,
        })
    }

    pub(crate) fn render(&self) -> Vec<u8> {
        let mut result = vec![self.method as u8];

        result.extend(string::render_terminated(Encoding::Latin1, &self.ident));

        for point in &self.adjustments {
            result.extend(point.frequency.to_be_bytes());
            result.extend(point.volume.to_be_bytes());
        }

        result
    }
}

impl Display for EqualisationFrame2 {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.ident]
    }
}

impl Default for EqualisationFrame2 {
    fn default() -> Self {
        Self {
            method: InterpolationMethod::Linear,
            ident: String::new(),
            adjustments: Vec::new(),
        }
    }
}

byte_enum! {
    /// The interpolation of an equalisation curve between its points.
    pub enum InterpolationMethod {
        /// No interpolation: an adjustment applies from its frequency up to the next
        /// point's frequency.
        Band = 0x00,
        /// Linear interpolation between adjustment points.
        Linear = 0x01,
    };
    InterpolationMethod::Band
}

/// The smallest whole-byte bit count that fits `peak`, or zero for no peak.
fn peak_bits(peak: u32) -> u8 {
    ((32 - peak.leading_zeros() as u8) + 7) / 8 * 8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::FrameBody;

    // RVA2 and EQU2 default to the "discard on file alteration" flag.
    const RVA2_DATA: &[u8] = b"RVA2\x00\x00\x00\x14\x20\x00\
                               stereo mix\0\
                               \x02\x02\x00\x08\xE5\
                               \x03\xFE\x00\x00";

    const EQU2_DATA: &[u8] = b"EQU2\x00\x00\x00\x14\x20\x00\
                               \x00\
                               bass boost\0\
                               \x00\x78\x06\x00\
                               \x07\xD0\xFF\x00";

    #[test]
    fn parse_rva2() {
        make_frame!(FrameBody::RelativeVolume2, RVA2_DATA, frame);

        assert_eq!(frame.ident, "stereo mix");

        assert_eq!(frame.channels[0].channel, ChannelType::FrontRight);
        assert_eq!(frame.channels[0].gain, 512);
        assert_eq!(frame.channels[0].peak, 0xE5);

        assert_eq!(frame.channels[1].channel, ChannelType::FrontLeft);
        assert_eq!(frame.channels[1].gain, -512);
        assert_eq!(frame.channels[1].peak, 0);
    }

    #[test]
    fn render_rva2() {
        let frame = RelativeVolumeFrame2 {
            ident: String::from("stereo mix"),
            channels: vec![
                ChannelVolume {
                    channel: ChannelType::FrontRight,
                    gain: 512,
                    peak: 0xE5,
                },
                ChannelVolume {
                    channel: ChannelType::FrontLeft,
                    gain: -512,
                    peak: 0,
                },
            ],
        };

        assert_render!(frame, Encoding::Latin1, RVA2_DATA);
    }

    #[test]
    fn parse_equ2() {
        make_frame!(FrameBody::Equalisation2, EQU2_DATA, frame);

        assert_eq!(frame.method, InterpolationMethod::Band);
        assert_eq!(frame.ident, "bass boost");

        assert_eq!(
            frame.adjustments[0],
            EqPoint {
                frequency: 120,
                volume: 1536
            }
        );

        assert_eq!(
            frame.adjustments[1],
            EqPoint {
                frequency: 2000,
                volume: -256
            }
        );
    }

    #[test]
    fn render_equ2() {
        let frame = EqualisationFrame2 {
            method: InterpolationMethod::Band,
            ident: String::from("bass boost"),
            adjustments: vec![
                EqPoint {
                    frequency: 120,
                    volume: 1536,
                },
                EqPoint {
                    frequency: 2000,
                    volume: -256,
                },
            ],
        };

        assert_render!(frame, Encoding::Latin1, EQU2_DATA);
    }

    #[test]
    fn peak_bit_widths() {
        assert_eq!(peak_bits(0), 0);
        assert_eq!(peak_bits(0xE5), 8);
        assert_eq!(peak_bits(0x3FF), 16);
        assert_eq!(peak_bits(0x0100_0000), 32);
    }
}
