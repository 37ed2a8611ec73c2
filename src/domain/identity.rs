use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Wallet the user signed in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    /// Xaman, still called `xumm` on the wire.
    #[strum(serialize = "xumm")]
    #[serde(rename = "xumm")]
    Xaman,
    Ledger,
    Gemwallet,
    Crossmark,
    Metamask,
    Walletconnect,
    Trezor,
    #[serde(other)]
    Other,
}

/// The signed-in account shared by every view of one engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    pub address: String,
    pub wallet: WalletKind,
    #[serde(default)]
    pub username: Option<String>,
}
