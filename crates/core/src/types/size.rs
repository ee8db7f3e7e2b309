//! Cup sizes offered for every drink and pastry.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown cup size.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid cup size: {0}")]
pub struct CupSizeError(pub String);

/// A cup size on an order line.
///
/// Sizes are stored in the database and carried on the wire as their
/// capitalized display names (`"Small"`, `"Medium"`, `"Large"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CupSize {
    Small,
    Medium,
    Large,
}

impl CupSize {
    /// All sizes, in menu order.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// The display / storage name of the size.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

impl std::fmt::Display for CupSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CupSize {
    type Err = CupSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Small" => Ok(Self::Small),
            "Medium" => Ok(Self::Medium),
            "Large" => Ok(Self::Large),
            other => Err(CupSizeError(other.to_owned())),
        }
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CupSize {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CupSize {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CupSize {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_sizes() {
        for size in CupSize::ALL {
            let parsed: CupSize = size.as_str().parse().unwrap();
            assert_eq!(parsed, size);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("Venti".parse::<CupSize>().is_err());
        assert!("small".parse::<CupSize>().is_err());
        assert!("".parse::<CupSize>().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&CupSize::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");
    }
}
