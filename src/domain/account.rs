use serde::{Deserialize, Serialize};

use super::amount::de_minor_units;

/// Full account detail as returned by the address lookup, live or as of a past instant.
///
/// One snapshot belongs to one viewing session. It is replaced wholesale on every
/// successful fetch and never patched field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub address: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub service: Option<ServiceInfo>,
    #[serde(default)]
    pub ledger_info: Option<LedgerInfo>,
    #[serde(default)]
    pub xaman_meta: Option<XamanMeta>,
    /// Unix seconds of the account's creation.
    #[serde(default)]
    pub inception: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerInfo {
    /// Native minor units.
    #[serde(deserialize_with = "de_minor_units")]
    pub balance: u64,
    #[serde(default)]
    pub owner_count: u64,
    #[serde(default)]
    pub activated: bool,
    #[serde(default)]
    pub blackholed: bool,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub did: Option<serde_json::Value>,
    /// Ledger index of the first reward claim, present once opted in (Xahau).
    #[serde(default)]
    pub reward_lgr_first: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct XamanMeta {
    #[serde(default)]
    pub xumm_pro: bool,
    #[serde(default)]
    pub kyc_approved: bool,
    #[serde(default)]
    pub globalid: Option<GlobalId>,
    #[serde(default)]
    pub xumm_profile: Option<XummProfile>,
    #[serde(default)]
    pub monetisation: Option<Monetisation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalId {
    #[serde(default)]
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XummProfile {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub owner_alias: Option<String>,
    #[serde(default)]
    pub account_alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monetisation {
    /// `PAYMENT_REQUIRED`, `COMING_UP`, ...
    pub status: String,
}

/// What the header / search collaborators show for the viewed account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageIdentity {
    pub username: Option<String>,
    pub service: Option<String>,
    pub address: String,
}

impl AccountSnapshot {
    /// Service name, else username, else the bare address.
    pub fn display_name(&self) -> &str {
        self.service
            .as_ref()
            .map(|s| s.name.as_str())
            .or(self.username.as_deref())
            .unwrap_or(&self.address)
    }

    pub fn page_identity(&self) -> PageIdentity {
        PageIdentity {
            username: self.username.clone(),
            service: self.service.as_ref().map(|s| s.name.clone()),
            address: self.address.clone(),
        }
    }

    pub fn is_blackholed(&self) -> bool {
        self.ledger_info.as_ref().is_some_and(|l| l.blackholed)
    }

    pub fn is_activated(&self) -> bool {
        self.ledger_info.as_ref().is_some_and(|l| l.activated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "address": "rExampleAccount",
        "username": "alice",
        "service": { "name": "Alice Exchange", "domain": "alice.example" },
        "inception": 1600000000,
        "ledgerInfo": {
            "balance": "20000000",
            "ownerCount": 3,
            "activated": true,
            "blackholed": false,
            "domain": "alice.example"
        },
        "xamanMeta": {
            "xummPro": true,
            "kycApproved": false,
            "monetisation": { "status": "COMING_UP" }
        },
        "bithomp": { "unrelated": true }
    }"#;

    #[test]
    fn parses_address_payload() {
        let snap: AccountSnapshot = serde_json::from_str(PAYLOAD).unwrap();
        let ledger = snap.ledger_info.as_ref().unwrap();
        assert_eq!(ledger.balance, 20_000_000);
        assert_eq!(ledger.owner_count, 3);
        assert_eq!(snap.inception, Some(1_600_000_000));
        assert!(snap.xaman_meta.as_ref().unwrap().xumm_pro);
        assert_eq!(snap.display_name(), "Alice Exchange");
    }

    #[test]
    fn display_name_falls_back_to_address() {
        let snap = AccountSnapshot {
            address: "rBare".into(),
            username: None,
            service: None,
            ledger_info: None,
            xaman_meta: None,
            inception: None,
        };
        assert_eq!(snap.display_name(), "rBare");
        assert!(!snap.is_activated());
        assert_eq!(
            snap.page_identity(),
            PageIdentity {
                username: None,
                service: None,
                address: "rBare".into(),
            }
        );
    }

    #[test]
    fn page_identity_carries_service_and_username() {
        let snap: AccountSnapshot = serde_json::from_str(PAYLOAD).unwrap();
        let page = snap.page_identity();
        assert_eq!(page.address, "rExampleAccount");
        assert_eq!(page.username.as_deref(), Some("alice"));
        assert_eq!(page.service.as_deref(), Some("Alice Exchange"));
    }
}
