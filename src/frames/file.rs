//! Frames that contain files.

use crate::core::io::BufStream;
use crate::core::string::{self, Encoding};
use crate::frames::encoding;
use crate::tag::Version;
use crate::ParseResult;
use log::{info, warn};
use std::fmt::{self, Display, Formatter};

/// A picture attached to the audio, such as an album cover.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct AttachedPictureFrame {
    /// The MIME type of `picture`. An empty MIME type implies `image/`.
    pub mime: String,
    /// What the picture depicts.
    pub pic_type: PictureType,
    /// A description of the picture. Must be unique within a tag.
    pub desc: String,
    /// The image data itself.
    pub picture: Vec<u8>,
}

impl AttachedPictureFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;

        let mut mime = string::read_terminated(Encoding::Latin1, stream);

        // image/ is implied when there is no MIME type.
        if mime.is_empty() {
            info!("found empty MIME type, assuming image/");
            mime.push_str("image/");
        }

        let pic_type = PictureType::parse(stream.read_u8()?);
        let desc = string::read_terminated(encoding, stream);

        let picture = stream.take_rest().to_vec();

        Ok(Self {
            mime,
            pic_type,
            desc,
            picture,
        })
    }

    pub(crate) fn parse_v2(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;

        // ID3v2.2 PIC frames have a 3-byte image format instead of a MIME type, with
        // only PNG and JPG defined. The format is re-canonicalised into a MIME type
        // so that the picture value is identical no matter the version it came from.
        let mime = match &stream.read_array::<3>()? {
            b"PNG" => String::from("image/png"),
            b"JPG" => String::from("image/jpg"),
            format => {
                warn!(
                    "unknown ID3v2.2 image format {}, assuming image/",
                    String::from_utf8_lossy(&format[..])
                );
                String::from("image/")
            }
        };

        let pic_type = PictureType::parse(stream.read_u8()?);
        let desc = string::read_terminated(encoding, stream);

        let picture = stream.take_rest().to_vec();

        Ok(Self {
            mime,
            pic_type,
            desc,
            picture,
        })
    }

    pub(crate) fn render(&self, encoding: Encoding) -> Vec<u8> {
        let mut result = vec![encoding::render(encoding)];

        result.extend(string::render_terminated(Encoding::Latin1, &self.mime));
        result.push(self.pic_type as u8);
        result.extend(string::render_terminated(encoding, &self.desc));
        result.extend(self.picture.iter());

        result
    }

    pub(crate) fn render_v2(&self, encoding: Encoding) -> Vec<u8> {
        let mut result = vec![encoding::render(encoding)];

        result.extend(self.image_format());
        result.push(self.pic_type as u8);
        result.extend(string::render_terminated(encoding, &self.desc));
        result.extend(self.picture.iter());

        result
    }

    /// The 3-byte ID3v2.2 image format of this picture's MIME type.
    fn image_format(&self) -> [u8; 3] {
        match self.mime.as_str() {
            "image/png" => *b"PNG",
            "image/jpg" | "image/jpeg" => *b"JPG",
            _ => {
                // Fall back to the last three characters of the MIME type, the part
                // that names the image format.
                let mut format = [b' '; 3];

                for (dest, ch) in format
                    .iter_mut()
                    .zip(self.mime.bytes().rev().take(3).rev())
                {
                    *dest = ch.to_ascii_uppercase();
                }

                format
            }
        }
    }

    pub(crate) fn check_version(&self, version: Version) -> Result<(), String> {
        match self.mime.as_str() {
            "image/png" | "image/jpg" | "image/jpeg" if version == Version::V22 => Ok(()),
            mime if version == Version::V22 => Err(format![
                "the picture MIME type {} cannot be represented in ID3v2.2",
                mime
            ]),
            _ => Ok(()),
        }
    }
}

impl Display for AttachedPictureFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{} ", self.mime]?;

        if !self.desc.is_empty() {
            write![f, "\"{}\" ", self.desc]?;
        }

        write![f, "[{:?}]", self.pic_type]
    }
}

byte_enum! {
    /// What an attached picture depicts.
    pub enum PictureType {
        Other = 0x00,
        FileIcon = 0x01,
        OtherFileIcon = 0x02,
        FrontCover = 0x03,
        BackCover = 0x04,
        LeafletPage = 0x05,
        Media = 0x06,
        LeadArtist = 0x07,
        Artist = 0x08,
        Conductor = 0x09,
        Band = 0x0A,
        Composer = 0x0B,
        Writer = 0x0C,
        RecordingLocation = 0x0D,
        DuringRecording = 0x0E,
        DuringPerformance = 0x0F,
        MovieScreenCapture = 0x10,
        ColoredFish = 0x11,
        Illustration = 0x12,
        BandLogo = 0x13,
        PublisherLogo = 0x14,
    };
    PictureType::Other
}

impl Default for PictureType {
    fn default() -> Self {
        PictureType::FrontCover
    }
}

/// Any file wrapped into a frame.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct GeneralObjectFrame {
    /// The MIME type of `data`.
    pub mime: String,
    /// The original filename of the object.
    pub filename: String,
    /// A description of the object. Must be unique within a tag.
    pub desc: String,
    /// The file data itself.
    pub data: Vec<u8>,
}

impl GeneralObjectFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let encoding = encoding::parse(stream)?;
        let mime = string::read_terminated(Encoding::Latin1, stream);
        let filename = string::read_terminated(encoding, stream);
        let desc = string::read_terminated(encoding, stream);

        let data = stream.take_rest().to_vec();

        Ok(Self {
            mime,
            filename,
            desc,
            data,
        })
    }

    pub(crate) fn render(&self, encoding: Encoding) -> Vec<u8> {
        let mut result = vec![encoding::render(encoding)];

        result.extend(string::render_terminated(Encoding::Latin1, &self.mime));
        result.extend(string::render_terminated(encoding, &self.filename));
        result.extend(string::render_terminated(encoding, &self.desc));
        result.extend(self.data.iter());

        result
    }
}

impl Display for GeneralObjectFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if !self.mime.is_empty() {
            write![f, "{} ", self.mime]?;
        }

        if !self.filename.is_empty() {
            write![f, "\"{}\"", self.filename]?;
        }

        if !self.desc.is_empty() {
            write![f, " [{}]", self.desc]?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::FrameBody;

    const APIC_DATA: &[u8] = b"APIC\x00\x00\x00\x19\x00\x00\
                               \x00\
                               image/png\0\
                               \x04\
                               back art\0\
                               \xAB\xCD\xEF\x01";

    const PIC_DATA: &[u8] = b"PIC\x00\x00\x12\
                              \x00\
                              PNG\
                              \x04\
                              back art\0\
                              \xAB\xCD\xEF\x01";

    const GEOB_DATA: &[u8] = b"GEOB\x00\x00\x00\x31\x00\x00\
                               \x00\
                               application/pdf\0\
                               booklet.pdf\0\
                               digital booklet\0\
                               \x25\x50\x44\x46";

    fn back_cover() -> AttachedPictureFrame {
        AttachedPictureFrame {
            mime: String::from("image/png"),
            pic_type: PictureType::BackCover,
            desc: String::from("back art"),
            picture: b"\xAB\xCD\xEF\x01".to_vec(),
        }
    }

    #[test]
    fn parse_apic() {
        make_frame!(FrameBody::AttachedPicture, APIC_DATA, frame);

        assert_eq!(frame, back_cover());
    }

    #[test]
    fn parse_pic() {
        make_frame!(
            FrameBody::AttachedPicture,
            PIC_DATA,
            crate::tag::Version::V22,
            frame
        );

        assert_eq!(frame, back_cover());
    }

    #[test]
    fn parse_geob() {
        make_frame!(FrameBody::GeneralObject, GEOB_DATA, frame);

        assert_eq!(frame.mime, "application/pdf");
        assert_eq!(frame.filename, "booklet.pdf");
        assert_eq!(frame.desc, "digital booklet");
        assert_eq!(frame.data, b"\x25\x50\x44\x46")
    }

    #[test]
    fn render_apic() {
        assert_render!(back_cover(), Encoding::Latin1, APIC_DATA);
    }

    #[test]
    fn render_pic() {
        assert_render!(
            back_cover(),
            crate::tag::Version::V22,
            Encoding::Latin1,
            PIC_DATA
        );
    }

    #[test]
    fn render_geob() {
        let frame = GeneralObjectFrame {
            mime: String::from("application/pdf"),
            filename: String::from("booklet.pdf"),
            desc: String::from("digital booklet"),
            data: b"\x25\x50\x44\x46".to_vec(),
        };

        assert_render!(frame, Encoding::Latin1, GEOB_DATA);
    }

    #[test]
    fn picture_versions() {
        let mut frame = AttachedPictureFrame {
            mime: String::from("image/png"),
            ..Default::default()
        };

        assert!(frame.check_version(Version::V22).is_ok());

        frame.mime = String::from("image/bmp");
        assert!(frame.check_version(Version::V22).is_err());
        assert!(frame.check_version(Version::V23).is_ok());
        assert!(frame.check_version(Version::V24).is_ok());
    }
}
