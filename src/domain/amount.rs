//! Native amounts arrive either as JSON numbers or as decimal strings.
use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(u64),
    Text(String),
}

impl RawAmount {
    fn into_minor_units<E: de::Error>(self) -> Result<u64, E> {
        match self {
            RawAmount::Number(n) => Ok(n),
            RawAmount::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| E::custom(format!("invalid native amount '{}'", s))),
        }
    }
}

pub(crate) fn de_minor_units<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    RawAmount::deserialize(deserializer)?.into_minor_units()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "de_minor_units")]
        value: u64,
    }

    #[test]
    fn accepts_numbers_and_strings() {
        let a: Probe = serde_json::from_str(r#"{"value": 20000000}"#).unwrap();
        let b: Probe = serde_json::from_str(r#"{"value": "20000000"}"#).unwrap();
        assert_eq!(a.value, b.value);
        assert!(serde_json::from_str::<Probe>(r#"{"value": "12.5"}"#).is_err());
        assert!(serde_json::from_str::<Probe>(r#"{"value": -3}"#).is_err());
    }
}
