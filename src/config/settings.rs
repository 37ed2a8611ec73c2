use super::api::API;
use super::network::NetworkKind;

/// Runtime settings: the CLI on native, defaults in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerSettings {
    pub api_base: String,
    pub api_token: Option<String>,
    pub network: NetworkKind,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            api_base: API.default_base_url(),
            api_token: None,
            network: NetworkKind::default(),
        }
    }
}
