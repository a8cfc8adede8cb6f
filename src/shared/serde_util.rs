//! Custom serde helpers for backend wire formats.

/// Optional ISO-8601 timestamp that tolerates `""` and `null`.
///
/// Form-backed fields such as `date_of_birth` come back as empty strings when
/// the user never filled them in.
pub mod lenient_datetime {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(dt.with_timezone(&Utc)));
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| Some(dt.and_utc()))
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid date: {}", raw)))
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}

/// `Option<String>` that maps `""` to `None`.
pub mod empty_as_none {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
    }
}

/// `Decimal` sent as a JSON number, a numeric string, or `null` (zero).
///
/// Numbers are parsed from their textual form so `0.1` stays exactly `0.1`.
pub mod lenient_decimal {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use std::str::FromStr;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Decimal::ZERO),
            Value::Number(n) => parse(&n.to_string()).map_err(serde::de::Error::custom),
            Value::String(s) if s.trim().is_empty() => Ok(Decimal::ZERO),
            Value::String(s) => parse(s.trim()).map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!(
                "Invalid amount: {}",
                other
            ))),
        }
    }

    fn parse(s: &str) -> Result<Decimal, String> {
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_err(|e| format!("Invalid amount {}: {}", s, e))
    }

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serde::Serialize::serialize(value, serializer)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Datelike, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, with = "super::lenient_datetime")]
        at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "super::empty_as_none::deserialize")]
        note: Option<String>,
        #[serde(default, with = "super::lenient_decimal")]
        amount: Decimal,
    }

    #[test]
    fn test_lenient_decimal_variants() {
        let p: Probe = serde_json::from_str(r#"{"amount":0.1}"#).unwrap();
        assert_eq!(p.amount, dec!(0.1));
        let p: Probe = serde_json::from_str(r#"{"amount":"2500.50"}"#).unwrap();
        assert_eq!(p.amount, dec!(2500.50));
        let p: Probe = serde_json::from_str(r#"{"amount":null}"#).unwrap();
        assert_eq!(p.amount, Decimal::ZERO);
        let p: Probe = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.amount, Decimal::ZERO);
        assert!(serde_json::from_str::<Probe>(r#"{"amount":"ten"}"#).is_err());
    }

    #[test]
    fn test_lenient_datetime_variants() {
        let p: Probe = serde_json::from_str(r#"{"at":"2024-03-01T10:00:00.000Z"}"#).unwrap();
        assert_eq!(p.at.unwrap().month(), 3);
        let p: Probe = serde_json::from_str(r#"{"at":"1990-05-15"}"#).unwrap();
        assert_eq!(p.at.unwrap().year(), 1990);
        let p: Probe = serde_json::from_str(r#"{"at":""}"#).unwrap();
        assert!(p.at.is_none());
        let p: Probe = serde_json::from_str(r#"{}"#).unwrap();
        assert!(p.at.is_none());
        assert!(serde_json::from_str::<Probe>(r#"{"at":"yesterday"}"#).is_err());
    }

    #[test]
    fn test_empty_as_none() {
        let p: Probe = serde_json::from_str(r#"{"note":"  "}"#).unwrap();
        assert!(p.note.is_none());
        let p: Probe = serde_json::from_str(r#"{"note":"hi"}"#).unwrap();
        assert_eq!(p.note.as_deref(), Some("hi"));
    }
}
