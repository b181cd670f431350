//! Wire helpers
//!
//! Records written by older storefront builds carry numeric identifiers and
//! `null` amounts. These helpers pin identifiers to strings and read missing
//! amounts as zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Unsigned(n) => n.to_string(),
            RawId::Signed(n) => n.to_string(),
        }
    }
}

/// Deserialize an identifier that may be stored as a string or an integer.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

/// Deserialize a numeric amount, treating `null` as zero.
///
/// Goes through `Option<Decimal>` so a `null` buffered by an untagged parent
/// (seen as a unit value) still reads as absent.
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Decimal>::deserialize(deserializer).map(Option::unwrap_or_default)
}
