//! National id number (CPF) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`NationalId`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum NationalIdError {
    /// The input string is empty.
    #[error("national id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("national id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A Brazilian CPF, stored as entered (punctuation included).
///
/// The write boundary only enforces presence and length, matching the system
/// contract; [`NationalId::checksum_ok`] exposes the full digit-check for
/// callers that want it (seed data does).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
    /// Maximum length including punctuation (`000.000.000-00`).
    pub const MAX_LENGTH: usize = 14;

    /// Parse a `NationalId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or longer than 14 characters.
    pub fn parse(s: &str) -> Result<Self, NationalIdError> {
        if s.is_empty() {
            return Err(NationalIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(NationalIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the national id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `NationalId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Verify the CPF check digits.
    ///
    /// Strips punctuation, requires exactly 11 digits, rejects the repeated
    /// single-digit sequences, then validates both verifier digits.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // digit positions fit in u32
    pub fn checksum_ok(&self) -> bool {
        let digits: Vec<u32> = self.0.chars().filter_map(|c| c.to_digit(10)).collect();

        if digits.len() != 11 {
            return false;
        }

        let Some(&first) = digits.first() else {
            return false;
        };
        if digits.iter().all(|&d| d == first) {
            return false;
        }

        for t in [9usize, 10] {
            let Some(&check) = digits.get(t) else {
                return false;
            };
            let sum: u32 = digits
                .iter()
                .take(t)
                .enumerate()
                .map(|(c, &d)| d * ((t + 1 - c) as u32))
                .sum();
            let expected = ((10 * sum) % 11) % 10;
            if check != expected {
                return false;
            }
        }

        true
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NationalId {
    type Err = NationalIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for NationalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for NationalId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for NationalId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for NationalId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_punctuated() {
        assert!(NationalId::parse("123.456.789-01").is_ok());
        assert!(NationalId::parse("12345678901").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(NationalId::parse(""), Err(NationalIdError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            NationalId::parse("123.456.789-012"),
            Err(NationalIdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_checksum_valid() {
        // 529.982.247-25 is a well-formed CPF
        let id = NationalId::parse("529.982.247-25").unwrap();
        assert!(id.checksum_ok());
    }

    #[test]
    fn test_checksum_bad_digit() {
        let id = NationalId::parse("529.982.247-26").unwrap();
        assert!(!id.checksum_ok());
    }

    #[test]
    fn test_checksum_repeated_digits() {
        let id = NationalId::parse("111.111.111-11").unwrap();
        assert!(!id.checksum_ok());
    }

    #[test]
    fn test_checksum_wrong_length() {
        let id = NationalId::parse("1234567890").unwrap();
        assert!(!id.checksum_ok());
    }

    #[test]
    fn test_serde_transparent() {
        let id = NationalId::parse("987.654.321-00").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"987.654.321-00\"");
    }
}
