use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Minor units (drops) per whole native unit.
pub const NATIVE_SCALE: u64 = 1_000_000;

/// Rewards hook account on Xahau. `ClaimReward` opt-in names it as issuer.
pub const REWARDS_HOOK_ISSUER: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum NetworkKind {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
    Xahau,
    XahauTestnet,
}

impl NetworkKind {
    pub fn is_xahau(&self) -> bool {
        matches!(self, Self::Xahau | Self::XahauTestnet)
    }

    pub fn is_devnet(&self) -> bool {
        matches!(self, Self::Devnet)
    }
}
