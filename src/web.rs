//! Browser entry point: a handle the JS rendering layer drives once per animation frame.
use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::ExplorerError;
use crate::config::{ExplorerSettings, PERSISTENCE};
use crate::data::{HttpExplorerApi, LocalStorageStore};
use crate::domain::{EntryContext, FiatCurrency, SignRequest};
use crate::engine::{ExplorerEngine, TaskSpawner};
use crate::utils::TimeUtils;

pub fn init_log() {
    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let _ = fern::Dispatch::new()
        .level(global_level)
        .level_for(env!("CARGO_CRATE_NAME"), my_code_level)
        .chain(fern::Output::call(|record| {
            let msg = record.args().to_string();
            match record.level() {
                log::Level::Error => web_sys::console::error_1(&msg.into()),
                log::Level::Warn => web_sys::console::warn_1(&msg.into()),
                log::Level::Info => web_sys::console::info_1(&msg.into()),
                log::Level::Debug | log::Level::Trace => web_sys::console::log_1(&msg.into()),
            }
        }))
        .apply();
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    init_log();
}

fn js_error(e: &ExplorerError) -> JsValue {
    JsValue::from_str(&e.message_key())
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[wasm_bindgen]
pub struct WebExplorer {
    engine: ExplorerEngine,
}

#[wasm_bindgen]
impl WebExplorer {
    /// Reads the entry context from `window.location` and client state from localStorage.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebExplorer, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let href = window.location().href()?;
        let entry = EntryContext::from_url(&href);

        let settings = ExplorerSettings::default();
        let api = Arc::new(
            HttpExplorerApi::new(&settings.api_base, settings.api_token.as_deref())
                .map_err(|e| JsValue::from_str(&format!("{:#}", e)))?,
        );
        let store = Box::new(LocalStorageStore::new(PERSISTENCE.browser.storage_key));

        let mut engine =
            ExplorerEngine::new(api.clone(), api, store, TaskSpawner::new(), settings, entry);
        engine.start();
        Ok(Self { engine })
    }

    pub fn update(&mut self) {
        self.engine.update();
    }

    pub fn set_address(&mut self, address: &str) {
        self.engine.set_address(address);
    }

    pub fn refresh(&mut self) {
        self.engine.refresh();
    }

    /// Candidate instant in epoch milliseconds. Rejected with `error.time-machine-out-of-range`.
    pub fn select_instant(&mut self, unix_ms: f64) -> Result<(), JsValue> {
        let instant = TimeUtils::from_unix_ms(unix_ms as i64)
            .ok_or_else(|| JsValue::from_str("error.time-machine-out-of-range"))?;
        self.engine.select_instant(instant).map_err(|e| js_error(&e))
    }

    pub fn confirm_instant(&mut self) -> bool {
        self.engine.confirm_instant()
    }

    pub fn reset_time_machine(&mut self) -> bool {
        self.engine.reset_time_machine()
    }

    pub fn set_currency(&mut self, code: &str) -> Result<(), JsValue> {
        let currency: FiatCurrency = code
            .parse()
            .map_err(|_| JsValue::from_str("error.unknown-currency"))?;
        self.engine.set_currency(currency);
        Ok(())
    }

    pub fn sign_in(&mut self) {
        self.engine.request_sign(SignRequest::sign_in());
    }

    /// Signs the `index`th entry of `actions_json`. False when there is no such enabled action.
    pub fn request_action(&mut self, index: usize) -> bool {
        let Some(action) = self
            .engine
            .offered_actions()
            .into_iter()
            .nth(index)
            .filter(|a| a.enabled)
        else {
            return false;
        };
        self.engine.request_sign(action.request);
        true
    }

    pub fn dismiss_sign(&mut self) {
        self.engine.dismiss_sign();
    }

    pub fn sign_out(&mut self) {
        self.engine.sign_out();
    }

    pub fn is_loading(&self) -> bool {
        self.engine.view().is_loading()
    }

    pub fn is_signing(&self) -> bool {
        self.engine.is_signing()
    }

    pub fn error_key(&self) -> Option<String> {
        self.engine.view().error().map(|e| e.message_key())
    }

    pub fn sign_error_key(&self) -> Option<String> {
        self.engine.sign_error().map(|e| e.message_key())
    }

    pub fn currency(&self) -> String {
        self.engine.currency().to_string()
    }

    /// Codes accepted by `set_currency`.
    pub fn currencies_json(&self) -> String {
        to_json(&FiatCurrency::codes())
    }

    /// `undefined` while the rate is unavailable.
    pub fn rate(&self) -> Option<f64> {
        self.engine.view().fiat_rate().value()
    }

    pub fn snapshot_json(&self) -> String {
        to_json(&self.engine.view().snapshot().map(|s| &**s))
    }

    /// `{ username, service, address }` for the page header and search box.
    pub fn page_identity_json(&self) -> String {
        to_json(&self.engine.view().snapshot().map(|s| s.page_identity()))
    }

    pub fn balances_json(&self) -> String {
        to_json(&self.engine.view().balances())
    }

    pub fn fiat_balances_json(&self) -> String {
        to_json(&self.engine.view().fiat_balances())
    }

    pub fn selection_json(&self) -> String {
        to_json(&self.engine.view().selection())
    }

    pub fn identity_json(&self) -> String {
        to_json(&self.engine.active_identity())
    }

    pub fn actions_json(&self) -> String {
        to_json(&self.engine.offered_actions())
    }
}
