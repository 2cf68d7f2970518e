//! NMEA 0183 position sentence parsing.
//!
//! Only the two sentences that carry a position fix are understood:
//!
//! - `RMC` - recommended minimum data, valid when status is `A`
//! - `GGA` - fix data, valid when fix quality is non-zero
//!
//! Any talker id is accepted (`GP`, `GN`, `II`, ...). The checksum is
//! verified when present.

use thiserror::Error;

/// Position extracted from a sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct NmeaFix {
    /// Two-letter talker id, e.g. `GP`.
    pub talker: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NmeaError {
    #[error("Not an NMEA sentence")]
    NotASentence,

    #[error("Checksum mismatch: sentence says {expected:02X}, computed {computed:02X}")]
    Checksum { expected: u8, computed: u8 },

    /// Well-formed sentence of a type we do not use.
    #[error("Unsupported sentence type {0}")]
    Unsupported(String),

    #[error("Malformed {sentence} sentence: {reason}")]
    Malformed { sentence: String, reason: String },

    /// Sentence parsed but the receiver reports no valid fix.
    #[error("No valid fix")]
    NoFix,
}

/// Parse one sentence, e.g. `$GPRMC,...*6A`.
pub fn parse_sentence(line: &str) -> Result<NmeaFix, NmeaError> {
    let line = line.trim();
    let body = line.strip_prefix('$').ok_or(NmeaError::NotASentence)?;

    let body = match body.split_once('*') {
        Some((body, checksum)) => {
            let expected =
                u8::from_str_radix(checksum.trim(), 16).map_err(|_| NmeaError::NotASentence)?;
            let computed = body.bytes().fold(0u8, |acc, b| acc ^ b);
            if expected != computed {
                return Err(NmeaError::Checksum { expected, computed });
            }
            body
        }
        None => body,
    };

    let fields: Vec<&str> = body.split(',').collect();
    let address = fields[0];
    if address.len() != 5 || !address.is_ascii() || address.starts_with('P') {
        return Err(NmeaError::Unsupported(address.to_string()));
    }
    let (talker, sentence) = address.split_at(2);

    let (lat_idx, valid) = match sentence {
        "RMC" => (3, field(&fields, 2, sentence)? == "A"),
        "GGA" => (
            2,
            field(&fields, 6, sentence)?
                .parse::<u8>()
                .map(|quality| quality > 0)
                .unwrap_or(false),
        ),
        other => return Err(NmeaError::Unsupported(other.to_string())),
    };
    if !valid || field(&fields, lat_idx, sentence)?.is_empty() {
        return Err(NmeaError::NoFix);
    }

    let latitude = coordinate(
        field(&fields, lat_idx, sentence)?,
        field(&fields, lat_idx + 1, sentence)?,
        ('N', 'S'),
        90.0,
        sentence,
    )?;
    let longitude = coordinate(
        field(&fields, lat_idx + 2, sentence)?,
        field(&fields, lat_idx + 3, sentence)?,
        ('E', 'W'),
        180.0,
        sentence,
    )?;

    Ok(NmeaFix {
        talker: talker.to_string(),
        latitude,
        longitude,
    })
}

fn field<'a>(fields: &[&'a str], index: usize, sentence: &str) -> Result<&'a str, NmeaError> {
    fields.get(index).copied().ok_or_else(|| NmeaError::Malformed {
        sentence: sentence.to_string(),
        reason: format!("missing field {}", index),
    })
}

/// Convert `dddmm.mmmm` plus hemisphere to signed decimal degrees.
fn coordinate(
    value: &str,
    hemisphere: &str,
    (positive, negative): (char, char),
    limit: f64,
    sentence: &str,
) -> Result<f64, NmeaError> {
    let malformed = |reason: String| NmeaError::Malformed {
        sentence: sentence.to_string(),
        reason,
    };

    let raw: f64 = value
        .parse()
        .map_err(|_| malformed(format!("bad coordinate '{}'", value)))?;
    let degrees = (raw / 100.0).trunc();
    let minutes = raw - degrees * 100.0;
    if !(0.0..60.0).contains(&minutes) {
        return Err(malformed(format!("bad minutes in '{}'", value)));
    }

    let magnitude = degrees + minutes / 60.0;
    if magnitude > limit {
        return Err(malformed(format!("coordinate '{}' out of range", value)));
    }

    match hemisphere.chars().next() {
        Some(h) if h == positive => Ok(magnitude),
        Some(h) if h == negative => Ok(-magnitude),
        _ => Err(malformed(format!("bad hemisphere '{}'", hemisphere))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_parse_rmc() {
        let fix = parse_sentence(
            "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A",
        )
        .unwrap();

        assert_eq!(fix.talker, "GP");
        assert!(approx(fix.latitude, 48.1173));
        assert!(approx(fix.longitude, 11.0 + 31.0 / 60.0));
    }

    #[test]
    fn test_parse_gga() {
        let fix = parse_sentence(
            "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n",
        )
        .unwrap();

        assert!(approx(fix.latitude, 48.1173));
        assert!(approx(fix.longitude, 11.516666666));
    }

    #[test]
    fn test_southern_western_hemisphere_without_checksum() {
        let fix = parse_sentence("$GNRMC,000000,A,3352.128,S,15112.558,W,0.0,0.0,010124,,").unwrap();

        assert_eq!(fix.talker, "GN");
        assert!(approx(fix.latitude, -(33.0 + 52.128 / 60.0)));
        assert!(approx(fix.longitude, -(151.0 + 12.558 / 60.0)));
    }

    #[test]
    fn test_checksum_mismatch() {
        let err = parse_sentence(
            "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*00",
        )
        .unwrap_err();
        assert_eq!(
            err,
            NmeaError::Checksum {
                expected: 0x00,
                computed: 0x6A
            }
        );
    }

    #[test]
    fn test_void_fixes() {
        assert_eq!(
            parse_sentence("$GPRMC,123519,V,,,,,,,230394,,"),
            Err(NmeaError::NoFix)
        );
        assert_eq!(
            parse_sentence("$GPGGA,123519,4807.038,N,01131.000,E,0,00,,,M,,M,,"),
            Err(NmeaError::NoFix)
        );
    }

    #[test]
    fn test_unsupported_sentences() {
        assert_eq!(
            parse_sentence("$IIMWV,045.0,R,10.2,N,A"),
            Err(NmeaError::Unsupported("MWV".into()))
        );
        assert!(matches!(
            parse_sentence("$PGRME,15.0,M,45.0,M,25.0,M"),
            Err(NmeaError::Unsupported(_))
        ));
        assert_eq!(parse_sentence("!AIVDM,1,1"), Err(NmeaError::NotASentence));
    }

    #[test]
    fn test_non_ascii_address_is_unsupported() {
        // U+FFFD is what a lossy decode makes of a stray byte
        assert!(matches!(
            parse_sentence("$a\u{FFFD}c,123519,A,4807.038,N,01131.000,E"),
            Err(NmeaError::Unsupported(_))
        ));
        assert!(matches!(
            parse_sentence("$\u{00E9}RMC,123519,A,4807.038,N,01131.000,E"),
            Err(NmeaError::Unsupported(_))
        ));
    }

    #[test]
    fn test_malformed_coordinate() {
        assert!(matches!(
            parse_sentence("$GPRMC,123519,A,48x7.038,N,01131.000,E,,,230394,,"),
            Err(NmeaError::Malformed { .. })
        ));
        assert!(matches!(
            parse_sentence("$GPRMC,123519,A,4807.038,Q,01131.000,E,,,230394,,"),
            Err(NmeaError::Malformed { .. })
        ));
        assert!(matches!(
            parse_sentence("$GPRMC,123519,A,4807.038"),
            Err(NmeaError::Malformed { .. })
        ));
    }
}
