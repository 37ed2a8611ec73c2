//! Wire shapes of the indexing API and their mapping into domain results.
use serde::Deserialize;
use serde_json::Value;

use crate::ExplorerError;
use crate::config::{ADDRESS_QUERY_FLAGS, SESSION};
use crate::domain::{
    AccountIdentity, AccountSnapshot, CorrelationId, FiatCurrency, FiatRate, NetworkParameters,
    SessionPoll, SignRequest, TimeSelection, WalletKind,
};
use crate::utils::TimeUtils;

pub(crate) const MALFORMED: &str = "malformed-response";

/// Query string for an address lookup.
pub(crate) fn address_query(
    time: TimeSelection,
    bypass_cache: bool,
    now_ms: i64,
) -> Vec<(String, String)> {
    let mut query: Vec<(String, String)> = ADDRESS_QUERY_FLAGS
        .iter()
        .map(|flag| (flag.to_string(), "true".to_string()))
        .collect();

    if bypass_cache {
        query.push(("timestamp".to_string(), now_ms.to_string()));
    }

    if let TimeSelection::At(instant) = time {
        query.push((
            "ledgerTimestamp".to_string(),
            TimeUtils::to_iso_millis(&instant),
        ));
    }
    query
}

/// `{ "error": "<code>" }` is how the API rejects a well-formed request.
fn error_code(body: &Value) -> Option<String> {
    body.get("error").and_then(|e| match e {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

pub(crate) fn parse_address_payload(body: Value) -> Result<AccountSnapshot, ExplorerError> {
    if body.get("address").is_some_and(|a| !a.is_null()) {
        return serde_json::from_value(body).map_err(|e| {
            log::warn!("Address payload did not match the snapshot shape: {}", e);
            ExplorerError::transport(MALFORMED)
        });
    }
    match error_code(&body) {
        Some(code) => Err(ExplorerError::domain(code)),
        None => Err(ExplorerError::transport(MALFORMED)),
    }
}

pub(crate) fn parse_username_payload(body: Value) -> Result<Option<String>, ExplorerError> {
    if let Some(code) = error_code(&body) {
        return Err(ExplorerError::domain(code));
    }
    Ok(body
        .get("username")
        .and_then(Value::as_str)
        .map(str::to_string))
}

pub(crate) fn parse_server_payload(body: Value) -> Result<NetworkParameters, ExplorerError> {
    if let Some(code) = error_code(&body) {
        return Err(ExplorerError::domain(code));
    }
    serde_json::from_value(body).map_err(|_| ExplorerError::transport(MALFORMED))
}

/// Rates come back keyed by the lowercase currency code, as a number or a numeric string.
pub(crate) fn parse_rate_payload(
    body: &Value,
    currency: FiatCurrency,
) -> Result<FiatRate, ExplorerError> {
    if let Some(code) = error_code(body) {
        return Err(ExplorerError::domain(code));
    }
    let raw = match body.get(currency.code()) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.parse::<f64>().ok(),
        _ => None,
    };
    Ok(raw.map(FiatRate::from_raw).unwrap_or_default())
}

pub(crate) fn sign_payload_body(request: &SignRequest) -> Value {
    let txjson = request
        .operation
        .as_ref()
        .map(|op| op.tx_json())
        .unwrap_or_else(|| serde_json::json!({ "TransactionType": "SignIn" }));

    serde_json::json!({
        "txjson": txjson,
        "options": {
            "submit": !request.sign_only && request.operation.is_some(),
            "expire": SESSION.payload_expiry_minutes,
        },
        "custom_meta": {
            "blob": {
                "action": request.action.map(|a| a.to_string()),
                "redirect": request.redirect,
            }
        }
    })
}

#[derive(Deserialize)]
struct OpenedPayload {
    uuid: String,
}

pub(crate) fn parse_opened_payload(body: Value) -> Result<CorrelationId, ExplorerError> {
    if let Some(code) = error_code(&body) {
        return Err(ExplorerError::domain(code));
    }
    let opened: OpenedPayload =
        serde_json::from_value(body).map_err(|_| ExplorerError::transport(MALFORMED))?;
    CorrelationId::parse(&opened.uuid).ok_or_else(|| ExplorerError::transport(MALFORMED))
}

#[derive(Deserialize, Default)]
struct PollMeta {
    #[serde(default)]
    resolved: bool,
    #[serde(default)]
    signed: bool,
    #[serde(default)]
    expired: bool,
    #[serde(default)]
    cancelled: bool,
}

#[derive(Deserialize, Default)]
struct PollResponse {
    #[serde(default)]
    account: Option<String>,
}

#[derive(Deserialize)]
struct PolledPayload {
    #[serde(default)]
    meta: PollMeta,
    #[serde(default)]
    response: PollResponse,
}

pub(crate) fn parse_poll_payload(body: Value) -> Result<SessionPoll, ExplorerError> {
    if let Some(code) = error_code(&body) {
        return Err(ExplorerError::domain(code));
    }
    let polled: PolledPayload =
        serde_json::from_value(body).map_err(|_| ExplorerError::transport(MALFORMED))?;
    let meta = polled.meta;

    if meta.cancelled {
        return Ok(SessionPoll::Rejected {
            reason: "cancelled".into(),
        });
    }
    if meta.expired {
        return Ok(SessionPoll::Rejected {
            reason: "expired".into(),
        });
    }
    if !meta.resolved {
        return Ok(SessionPoll::Pending);
    }
    if !meta.signed {
        return Ok(SessionPoll::Rejected {
            reason: "rejected".into(),
        });
    }
    match polled.response.account {
        Some(address) => Ok(SessionPoll::Signed(AccountIdentity {
            address,
            wallet: WalletKind::Xaman,
            username: None,
        })),
        None => Err(ExplorerError::transport(MALFORMED)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn address_query_adds_cache_buster_and_timestamp() {
        let at = TimeSelection::At(TimeUtils::from_unix_secs(1_700_000_000).unwrap());
        let q = address_query(at, true, 42);
        assert!(q.contains(&("ledgerInfo".into(), "true".into())));
        assert!(q.contains(&("timestamp".into(), "42".into())));
        assert!(q.contains(&(
            "ledgerTimestamp".into(),
            "2023-11-14T22:13:20.000Z".into()
        )));

        let live = address_query(TimeSelection::Live, false, 42);
        assert!(live.iter().all(|(k, _)| k != "timestamp" && k != "ledgerTimestamp"));
    }

    #[test]
    fn address_payload_maps_error_and_garbage() {
        let err = parse_address_payload(json!({ "error": "invalidAddress" })).unwrap_err();
        assert_eq!(err, ExplorerError::domain("invalidAddress"));

        let garbage = parse_address_payload(json!({ "hello": 1 })).unwrap_err();
        assert_eq!(garbage, ExplorerError::transport(MALFORMED));

        let body = json!({ "address": "rAlice", "ledgerInfo": { "balance": "10" } });
        let ok = parse_address_payload(body).unwrap();
        assert_eq!(ok.ledger_info.unwrap().balance, 10);
    }

    #[test]
    fn rate_payload_missing_currency_is_unavailable() {
        let body = json!({ "eur": 0.48 });
        assert_eq!(
            parse_rate_payload(&body, FiatCurrency::Usd).unwrap(),
            FiatRate::Unavailable
        );
        assert_eq!(
            parse_rate_payload(&body, FiatCurrency::Eur).unwrap(),
            FiatRate::Known(0.48)
        );
        assert_eq!(
            parse_rate_payload(&json!({ "usd": "0.5" }), FiatCurrency::Usd).unwrap(),
            FiatRate::Known(0.5)
        );
    }

    #[test]
    fn poll_payload_states() {
        assert_eq!(
            parse_poll_payload(json!({ "meta": { "resolved": false } })).unwrap(),
            SessionPoll::Pending
        );
        assert_eq!(
            parse_poll_payload(json!({ "meta": { "resolved": true, "signed": false } })).unwrap(),
            SessionPoll::Rejected {
                reason: "rejected".into()
            }
        );
        let signed = json!({
            "meta": { "resolved": true, "signed": true },
            "response": { "account": "rBob" }
        });
        match parse_poll_payload(signed).unwrap() {
            SessionPoll::Signed(id) => {
                assert_eq!(id.address, "rBob");
                assert_eq!(id.wallet, WalletKind::Xaman);
            }
            other => panic!("unexpected poll result {:?}", other),
        }
    }
}
