use chrono::{DateTime, Utc};
use reqwest::Url;

use super::sign::CorrelationId;
use crate::utils::TimeUtils;

/// What the page URL says about the view to open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryContext {
    pub address: Option<String>,
    /// Initial confirmed time-machine instant.
    pub ledger_timestamp: Option<DateTime<Utc>>,
    /// Sign session to resume after an external redirect.
    pub correlation_id: Option<CorrelationId>,
}

impl EntryContext {
    /// Parses `/account/<id>?ledgerTimestamp=..&uuid=..`. Unparseable URLs yield an empty context.
    pub fn from_url(raw: &str) -> Self {
        let url = match Url::parse(raw) {
            Ok(u) => u,
            Err(e) => {
                log::warn!("Ignoring unparseable entry url '{}': {}", raw, e);
                return Self::default();
            }
        };

        let mut ctx = Self {
            address: address_from_path(&url),
            ..Self::default()
        };

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "id" if ctx.address.is_none() && !value.is_empty() => {
                    ctx.address = Some(value.into_owned());
                }
                "ledgerTimestamp" => ctx.ledger_timestamp = TimeUtils::parse_instant(&value),
                "uuid" => ctx.correlation_id = CorrelationId::parse(&value),
                _ => {}
            }
        }
        ctx
    }
}

fn address_from_path(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    // Skip any locale prefix, e.g. `/ko/account/<id>`.
    segments.find(|s| *s == "account")?;
    segments
        .next()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
