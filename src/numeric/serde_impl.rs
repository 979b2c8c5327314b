// ============================================================================
// Serde Support
// Decimals travel as canonical strings
// ============================================================================

use super::decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

impl<const S: u32> Serialize for Decimal<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_str(self)
    }
}

struct DecimalVisitor<const S: u32>(PhantomData<Decimal<S>>);

impl<'de, const S: u32> Visitor<'de> for DecimalVisitor<S> {
    type Value = Decimal<S>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Decimal::from_f64(v).map_err(E::custom)
    }
}

impl<'de, const S: u32> Deserialize<'de> for Decimal<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_as_canonical_string() {
        let x: Decimal = "12.500".parse().unwrap();
        assert_eq!(serde_json::to_string(&x).unwrap(), "\"12.5\"");
    }

    #[test]
    fn test_deserialize_string_and_numbers() {
        let a: Decimal = serde_json::from_str("\"-0.25\"").unwrap();
        assert_eq!(a.to_string(), "-0.25");
        let b: Decimal = serde_json::from_str("42").unwrap();
        assert_eq!(b.to_string(), "42");
        let c: Decimal = serde_json::from_str("0.1").unwrap();
        assert_eq!(c.to_string(), "0.1");
        assert!(serde_json::from_str::<Decimal>("\"abc\"").is_err());
    }
}
