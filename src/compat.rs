//! ID3v2.2 identifier compatibility.
//!
//! ID3v2.2 identifiers are 3 characters wide, while ID3v2.3 and ID3v2.4 identifiers are 4.
//! This module holds the fixed remap table between the two forms. Remapping between
//! ID3v2.3 and ID3v2.4 is the identity, with the frames removed in ID3v2.4 handled by the
//! per-kind version checks.

use crate::frames::FrameId;
use crate::{ParseError, ParseResult, SaveError, SaveResult};
use log::error;

const V2_V3_CONV: &[(&[u8; 3], &[u8; 4])] = &[
    (b"BUF", b"RBUF"), // Recommended buffer size
    (b"CNT", b"PCNT"), // Play counter
    (b"COM", b"COMM"), // Comment
    (b"CRA", b"AENC"), // Audio encryption
    (b"ETC", b"ETCO"), // Event timing codes
    (b"EQU", b"EQUA"), // Equalisation
    (b"GEO", b"GEOB"), // General object
    (b"IPL", b"IPLS"), // Involved people list
    (b"LNK", b"LINK"), // Linked frame
    (b"MCI", b"MCDI"), // Music CD identifier
    (b"MLL", b"MLLT"), // MPEG lookup table
    (b"PIC", b"APIC"), // Attached picture
    (b"POP", b"POPM"), // Popularimeter
    (b"REV", b"RVRB"), // Reverb
    (b"RVA", b"RVAD"), // Relative volume adjustment
    (b"SLT", b"SYLT"), // Synced lyrics/text
    (b"STC", b"SYTC"), // Synced tempo codes
    (b"TAL", b"TALB"), // Album/Movie/Show title
    (b"TBP", b"TBPM"), // BPM
    (b"TCM", b"TCOM"), // Composer
    (b"TCO", b"TCON"), // Content type
    (b"TCR", b"TCOP"), // Copyright message
    (b"TDA", b"TDAT"), // Date
    (b"TDY", b"TDLY"), // Playlist delay
    (b"TFT", b"TFLT"), // File type
    (b"TEN", b"TENC"), // Encoded by
    (b"TIM", b"TIME"), // Recording time
    (b"TKE", b"TKEY"), // Initial key
    (b"TLA", b"TLAN"), // Language(s)
    (b"TLE", b"TLEN"), // Length
    (b"TMT", b"TMED"), // Media type
    (b"TOA", b"TOPE"), // Original artist(s)/performer(s)
    (b"TOF", b"TOFN"), // Original filename
    (b"TOL", b"TOLY"), // Original lyricist(s)/text writer(s)
    (b"TOR", b"TORY"), // Original release year
    (b"TOT", b"TOAL"), // Original album/movie/show title
    (b"TP1", b"TPE1"), // Lead artist(s)/performer(s)
    (b"TP2", b"TPE2"), // Band/Orchestra/Accompaniment
    (b"TP3", b"TPE3"), // Conductor/Performer refinement
    (b"TP4", b"TPE4"), // Interpreted, remixed, or otherwise modified by
    (b"TPA", b"TPOS"), // Part of a set
    (b"TPB", b"TPUB"), // Publisher
    (b"TRC", b"TSRC"), // ISRC
    (b"TRD", b"TRDA"), // Recording dates
    (b"TRK", b"TRCK"), // Track
    (b"TSI", b"TSIZ"), // Size
    (b"TSS", b"TSSE"), // Software/hardware and settings used for encoding
    (b"TT1", b"TIT1"), // Content group description
    (b"TT2", b"TIT2"), // Title/Song name/Content description
    (b"TT3", b"TIT3"), // Subtitle/Description refinement
    (b"TXT", b"TEXT"), // Lyricist/text writer
    (b"TXX", b"TXXX"), // User-defined text
    (b"TYE", b"TYER"), // Year
    (b"UFI", b"UFID"), // Unique file identifier
    (b"ULT", b"USLT"), // Unsynced lyrics/text
    (b"WAF", b"WOAF"), // Official audio file webpage
    (b"WAR", b"WOAR"), // Official artist/performer webpage
    (b"WAS", b"WOAS"), // Official audio source webpage
    (b"WCM", b"WCOM"), // Commercial information
    (b"WCP", b"WCOP"), // Copyright information
    (b"WPB", b"WPUB"), // Publishers official webpage
    (b"WXX", b"WXXX"), // User-defined URL
];

/// Remaps an ID3v2.2 identifier to its ID3v2.3/ID3v2.4 form.
///
/// # Errors
/// If the identifier has no entry in the remap table, an error is returned.
pub fn upgrade_id(id: &[u8; 3]) -> ParseResult<FrameId> {
    for (v2_id, v3_id) in V2_V3_CONV {
        if *v2_id == id {
            return Ok(FrameId::new(v3_id));
        }
    }

    error!(
        "no ID3v2.3 analogue exists for {}",
        String::from_utf8_lossy(&id[..])
    );

    Err(ParseError::MalformedData)
}

/// Remaps an ID3v2.3/ID3v2.4 identifier to its ID3v2.2 form.
///
/// # Errors
/// If the identifier has no entry in the remap table, an error is returned.
pub fn downgrade_id(id: FrameId) -> SaveResult<[u8; 3]> {
    for (v2_id, v3_id) in V2_V3_CONV {
        if id == *v3_id {
            return Ok(**v2_id);
        }
    }

    Err(SaveError::OutOfRange(format![
        "no ID3v2.2 analogue exists for {}",
        id
    ]))
}

/// Text information identifiers that were removed in ID3v2.4.
pub(crate) const V4_REMOVED: &[&[u8; 4]] = &[
    b"TDAT", b"TIME", b"TORY", b"TRDA", b"TSIZ", b"TYER",
];

/// Text information identifiers that only exist in ID3v2.4.
pub(crate) const V4_ADDED: &[&[u8; 4]] = &[
    b"TDEN", b"TDOR", b"TDRC", b"TDRL", b"TDTG", b"TMOO", b"TPRO", b"TSOA", b"TSOP", b"TSOT",
    b"TSST",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_v2_ids() {
        assert_eq!(upgrade_id(b"COM").unwrap(), b"COMM");
        assert_eq!(upgrade_id(b"PIC").unwrap(), b"APIC");
        assert_eq!(upgrade_id(b"UFI").unwrap(), b"UFID");
        assert_eq!(upgrade_id(b"TT2").unwrap(), b"TIT2");
        assert!(upgrade_id(b"XYZ").is_err());
    }

    #[test]
    fn downgrade_v3_ids() {
        assert_eq!(downgrade_id(FrameId::new(b"COMM")).unwrap(), *b"COM");
        assert_eq!(downgrade_id(FrameId::new(b"APIC")).unwrap(), *b"PIC");
        assert!(downgrade_id(FrameId::new(b"TDRC")).is_err());
    }

    #[test]
    fn remap_involution() {
        for (v2_id, _) in V2_V3_CONV {
            let upgraded = upgrade_id(v2_id).unwrap();
            assert_eq!(downgrade_id(upgraded).unwrap(), **v2_id);
        }
    }
}
