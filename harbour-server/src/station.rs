//! Station code type.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid CRS code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid CRS code: {reason}")]
pub struct InvalidCrs {
    reason: &'static str,
}

/// A valid 3-letter CRS (Computer Reservation System) station code.
///
/// CRS codes are 3 ASCII letters; parsing uppercases the input so that
/// codes arriving from configuration or upstream JSON in either case
/// produce the same value. Serializes as a plain string.
///
/// # Examples
///
/// ```
/// use harbour_server::station::Crs;
///
/// let pby = Crs::parse("pby").unwrap();
/// assert_eq!(pby.as_str(), "PBY");
///
/// assert!(Crs::parse("PB").is_err());
/// assert!(Crs::parse("P8Y").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs([u8; 3]);

impl Crs {
    /// Pembrey & Burry Port, the station this service is deployed for.
    pub const PBY: Crs = Crs(*b"PBY");

    /// Parse a CRS code, accepting either case.
    pub fn parse(s: &str) -> Result<Self, InvalidCrs> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidCrs {
                reason: "must be exactly 3 characters",
            });
        }

        let mut code = [0u8; 3];
        for (slot, &b) in code.iter_mut().zip(bytes) {
            if !b.is_ascii_alphabetic() {
                return Err(InvalidCrs {
                    reason: "must be ASCII letters A-Z",
                });
            }
            *slot = b.to_ascii_uppercase();
        }

        Ok(Crs(code))
    }

    /// Returns the CRS code as an uppercase string slice.
    pub fn as_str(&self) -> &str {
        // Only uppercase ASCII letters are ever stored
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Debug for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Crs({})", self.as_str())
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Crs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Crs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Crs::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert_eq!(Crs::parse("PBY").unwrap().as_str(), "PBY");
        assert_eq!(Crs::parse("SWA").unwrap().as_str(), "SWA");
        assert_eq!(Crs::parse("CDF").unwrap().as_str(), "CDF");
    }

    #[test]
    fn pby_constant_matches_parse() {
        assert_eq!(Crs::PBY, Crs::parse("PBY").unwrap());
        assert_eq!(Crs::PBY.as_str(), "PBY");
    }

    #[test]
    fn parse_normalizes_case() {
        assert_eq!(Crs::parse("pby").unwrap(), Crs::parse("PBY").unwrap());
        assert_eq!(Crs::parse("Pby").unwrap().as_str(), "PBY");
    }

    #[test]
    fn reject_wrong_length() {
        assert!(Crs::parse("").is_err());
        assert!(Crs::parse("PB").is_err());
        assert!(Crs::parse("PBYX").is_err());
        // Three characters but four bytes; the length guard counts bytes.
        assert!(Crs::parse("PÖY").is_err());
    }

    #[test]
    fn reject_non_letters() {
        assert!(Crs::parse("P8Y").is_err());
        assert!(Crs::parse("P-Y").is_err());
        assert!(Crs::parse("P Y").is_err());
    }

    #[test]
    fn display_and_debug() {
        let crs = Crs::parse("PBY").unwrap();
        assert_eq!(format!("{}", crs), "PBY");
        assert_eq!(format!("{:?}", crs), "Crs(PBY)");
    }

    #[test]
    fn serde_roundtrip() {
        let crs = Crs::parse("PBY").unwrap();
        let json = serde_json::to_string(&crs).unwrap();
        assert_eq!(json, "\"PBY\"");

        let back: Crs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, crs);
    }

    #[test]
    fn deserialize_rejects_invalid() {
        assert!(serde_json::from_str::<Crs>("\"toolong\"").is_err());
        assert!(serde_json::from_str::<Crs>("\"P8Y\"").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any 3-letter string parses, regardless of case.
        #[test]
        fn letters_always_parse(s in "[a-zA-Z]{3}") {
            prop_assert!(Crs::parse(&s).is_ok());
        }

        /// Parsing is case-insensitive: upper and lower forms agree.
        #[test]
        fn case_insensitive(s in "[A-Z]{3}") {
            let upper = Crs::parse(&s).unwrap();
            let lower = Crs::parse(&s.to_lowercase()).unwrap();
            prop_assert_eq!(upper, lower);
            prop_assert_eq!(upper.as_str(), s.as_str());
        }

        /// Wrong-length strings are always rejected.
        #[test]
        fn wrong_length_rejected(s in "[A-Z]{0,2}|[A-Z]{4,10}") {
            prop_assert!(Crs::parse(&s).is_err());
        }
    }
}
