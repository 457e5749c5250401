use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::Error;

/// One of the eight ABO/Rh blood types.
///
/// Values are parsed from their conventional notation (`"O-"`, `"AB+"`, ...)
/// and serialized back to it. Parsing is the only place an unknown blood type
/// can be rejected; everything downstream is total over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BloodType {
    /// O negative.
    ONeg,
    /// O positive.
    OPos,
    /// A negative.
    ANeg,
    /// A positive.
    APos,
    /// B negative.
    BNeg,
    /// B positive.
    BPos,
    /// AB negative.
    AbNeg,
    /// AB positive.
    AbPos,
}

impl BloodType {
    /// All blood types, in canonical order.
    pub const ALL: [Self; 8] = [
        Self::ONeg,
        Self::OPos,
        Self::ANeg,
        Self::APos,
        Self::BNeg,
        Self::BPos,
        Self::AbNeg,
        Self::AbPos,
    ];

    /// Returns the conventional notation, e.g. `"AB-"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ONeg => "O-",
            Self::OPos => "O+",
            Self::ANeg => "A-",
            Self::APos => "A+",
            Self::BNeg => "B-",
            Self::BPos => "B+",
            Self::AbNeg => "AB-",
            Self::AbPos => "AB+",
        }
    }

    /// Whether the type carries the RhD antigen.
    #[must_use]
    pub const fn is_rh_positive(self) -> bool {
        matches!(self, Self::OPos | Self::APos | Self::BPos | Self::AbPos)
    }

    /// Position of this type in [`BloodType::ALL`].
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|blood_type| blood_type.as_str() == normalised)
            .ok_or_else(|| Error::InvalidBloodType(s.to_string()))
    }
}

impl TryFrom<String> for BloodType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for BloodType {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BloodType> for String {
    fn from(blood_type: BloodType) -> Self {
        blood_type.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("O-", BloodType::ONeg; "o negative")]
    #[test_case("O+", BloodType::OPos; "o positive")]
    #[test_case("A-", BloodType::ANeg; "a negative")]
    #[test_case("A+", BloodType::APos; "a positive")]
    #[test_case("B-", BloodType::BNeg; "b negative")]
    #[test_case("B+", BloodType::BPos; "b positive")]
    #[test_case("AB-", BloodType::AbNeg; "ab negative")]
    #[test_case("AB+", BloodType::AbPos; "ab positive")]
    #[test_case("ab+", BloodType::AbPos; "lowercase")]
    #[test_case("  o- ", BloodType::ONeg; "surrounding whitespace")]
    fn parses_notation(input: &str, expected: BloodType) {
        assert_eq!(input.parse::<BloodType>().unwrap(), expected);
    }

    #[test_case("C+"; "unknown group")]
    #[test_case("O"; "missing rh")]
    #[test_case("A +"; "inner whitespace")]
    #[test_case(""; "empty")]
    fn rejects_unknown_notation(input: &str) {
        assert_eq!(
            input.parse::<BloodType>(),
            Err(Error::InvalidBloodType(input.to_string()))
        );
    }

    #[test]
    fn display_matches_parse() {
        for blood_type in BloodType::ALL {
            assert_eq!(blood_type.to_string().parse::<BloodType>(), Ok(blood_type));
        }
    }

    #[test]
    fn index_matches_canonical_order() {
        for (i, blood_type) in BloodType::ALL.into_iter().enumerate() {
            assert_eq!(blood_type.index(), i);
        }
    }

    #[test]
    fn deserialises_from_notation() {
        let parsed: Vec<BloodType> = serde_json::from_str(r#"["AB-", "o+"]"#).unwrap();
        assert_eq!(parsed, vec![BloodType::AbNeg, BloodType::OPos]);

        let error = serde_json::from_str::<BloodType>(r#""Z-""#).unwrap_err();
        assert!(error.to_string().contains("Invalid blood type 'Z-'"));
    }
}
