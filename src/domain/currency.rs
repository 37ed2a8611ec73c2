use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Fiat currencies the rate endpoints quote against. Codes are lowercase on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FiatCurrency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cny,
    Krw,
    Inr,
    Aud,
    Cad,
    Chf,
    Sek,
    Nok,
    Dkk,
    Pln,
    Brl,
    Mxn,
    Sgd,
    Hkd,
    Nzd,
    Zar,
    Try,
    Thb,
}

impl FiatCurrency {
    pub fn code(&self) -> String {
        self.to_string()
    }

    /// Every supported code, in selector order.
    pub fn codes() -> Vec<String> {
        Self::iter().map(|c| c.code()).collect()
    }
}

/// A conversion rate for one time selection, or no rate at all.
///
/// `Unavailable` must never be rendered as a zero amount.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum FiatRate {
    #[default]
    Unavailable,
    Known(f64),
}

impl FiatRate {
    /// Only positive finite numbers count as a rate.
    pub fn from_raw(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            FiatRate::Known(value)
        } else {
            FiatRate::Unavailable
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            FiatRate::Known(v) => Some(*v),
            FiatRate::Unavailable => None,
        }
    }
}
