use serde::{Deserialize, Serialize};
use strum_macros::Display;
use uuid::Uuid;

use super::identity::AccountIdentity;

/// Opaque token linking an externally signed action back to the session that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Entry URLs carry arbitrary text; only well-formed UUIDs are treated as a session.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Follow-up form the page opens once the signature lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    SignIn,
    RewardsOptIn,
    RewardsOptOut,
    SetAvatar,
    SetDomain,
    SetDid,
}

/// Transaction handed to the wallet, serialised the way wallets expect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "TransactionType")]
pub enum Operation {
    #[serde(rename_all = "PascalCase")]
    ClaimReward {
        account: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        issuer: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flags: Option<u32>,
    },
    #[serde(rename_all = "PascalCase")]
    AccountSet { account: String },
    #[serde(rename = "DIDSet", rename_all = "PascalCase")]
    DidSet { account: String },
}

impl Operation {
    pub fn tx_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    #[serde(default)]
    pub action: Option<ActionKind>,
    /// `None` means a plain sign-in.
    #[serde(default)]
    pub operation: Option<Operation>,
    /// Wallet signs but does not submit to the network.
    #[serde(default)]
    pub sign_only: bool,
    /// Page the user lands on after signing.
    #[serde(default)]
    pub redirect: Option<String>,
}

impl SignRequest {
    pub fn sign_in() -> Self {
        Self {
            action: Some(ActionKind::SignIn),
            operation: None,
            sign_only: false,
            redirect: Some("account".to_string()),
        }
    }

    pub fn intent(&self) -> PostSignIntent {
        if self.operation.is_none() || self.redirect.as_deref() == Some("account") {
            PostSignIntent::AdoptIdentity
        } else {
            PostSignIntent::OneOff
        }
    }
}

/// What a successful resolution does to page state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PostSignIntent {
    /// Signed address becomes the active account.
    #[default]
    AdoptIdentity,
    /// Only the operation's outcome is surfaced; active identity untouched.
    OneOff,
}

/// One poll of the wallet service for a pending session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPoll {
    Pending,
    Signed(AccountIdentity),
    /// User rejected, payload expired or was cancelled.
    Rejected { reason: String },
}
