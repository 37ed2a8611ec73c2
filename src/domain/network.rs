use serde::{Deserialize, Serialize};

use super::amount::de_minor_units;

/// Network-wide reserve policy, in native minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkParameters {
    /// Flat minimum every activated account must hold.
    #[serde(deserialize_with = "de_minor_units")]
    pub reserve_base: u64,
    /// Charged once per ledger object the account owns.
    #[serde(deserialize_with = "de_minor_units")]
    pub reserve_increment: u64,
}
