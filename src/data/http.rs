use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Url,
    header::{HeaderMap, HeaderValue},
};
use serde_json::Value;

use super::payload::{
    MALFORMED, address_query, parse_address_payload, parse_opened_payload, parse_poll_payload,
    parse_rate_payload, parse_server_payload, parse_username_payload, sign_payload_body,
};
use super::provider::{ExplorerApi, SignService};
use crate::ExplorerError;
use crate::config::API;
use crate::domain::{
    AccountSnapshot, CorrelationId, FiatCurrency, FiatRate, NetworkParameters, SessionPoll,
    SignRequest, TimeSelection,
};
use crate::utils::TimeUtils;

/// `reqwest` adapter for the indexing API and the wallet-payload endpoints.
#[derive(Clone)]
pub struct HttpExplorerApi {
    client: Client,
    base_url: String,
}

impl HttpExplorerApi {
    pub fn new(base_url: &str, api_token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = api_token {
            headers.insert(
                API.token_header,
                HeaderValue::from_str(token).context("API token is not a valid header value")?,
            );
        }

        let builder = Client::builder().default_headers(headers);
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(API.request_timeout);

        let client = builder.build().context("Failed to build HTTP client")?;

        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn account_url(&self, address: &str) -> Result<Url, ExplorerError> {
        account_url(&self.base_url, address)
    }

    /// Reads a JSON body whatever the status: the API puts `{ "error": .. }` in 4xx bodies.
    async fn send_json(&self, request: RequestBuilder) -> Result<Value, ExplorerError> {
        let response = request
            .send()
            .await
            .map_err(|e| ExplorerError::transport(transport_reason(&e)))?;
        let status = response.status();

        match response.json::<Value>().await {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => Err(ExplorerError::transport(format!(
                "http-{}",
                status.as_u16()
            ))),
            Err(_) => Err(ExplorerError::transport(MALFORMED)),
        }
    }
}

/// The address always lands as one percent-encoded path segment, whatever it contains.
fn account_url(base_url: &str, address: &str) -> Result<Url, ExplorerError> {
    let prefix = API.address_path.trim_end_matches("{address}");
    let mut url = Url::parse(&format!("{}{}", base_url, prefix))
        .map_err(|_| ExplorerError::transport("invalid-url"))?;
    url.path_segments_mut()
        .map_err(|_| ExplorerError::transport("invalid-url"))?
        .pop_if_empty()
        .push(address);
    Ok(url)
}

fn transport_reason(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        return "timeout".to_string();
    }
    #[cfg(not(target_arch = "wasm32"))]
    if e.is_connect() {
        return "connection".to_string();
    }
    if e.is_decode() {
        return MALFORMED.to_string();
    }
    match e.status() {
        Some(status) => format!("http-{}", status.as_u16()),
        None => "network".to_string(),
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ExplorerApi for HttpExplorerApi {
    async fn fetch_account(
        &self,
        address: &str,
        time: TimeSelection,
        bypass_cache: bool,
    ) -> Result<AccountSnapshot, ExplorerError> {
        let url = self.account_url(address)?;
        let query = address_query(time, bypass_cache, TimeUtils::now_timestamp_ms());
        let body = self.send_json(self.client.get(url).query(&query)).await?;
        parse_address_payload(body)
    }

    async fn fetch_username(&self, address: &str) -> Result<Option<String>, ExplorerError> {
        let url = self.account_url(address)?;
        let body = self
            .send_json(self.client.get(url).query(&[("username", "true")]))
            .await?;
        parse_username_payload(body)
    }

    async fn fetch_network_parameters(&self) -> Result<NetworkParameters, ExplorerError> {
        let body = self
            .send_json(self.client.get(self.url(API.server_info_path)))
            .await?;
        parse_server_payload(body)
    }

    async fn fetch_rate(
        &self,
        currency: FiatCurrency,
        time: TimeSelection,
    ) -> Result<FiatRate, ExplorerError> {
        let code = currency.code();
        let request = match time {
            TimeSelection::Live => self
                .client
                .get(self.url(&API.rate_current_path.replace("{currency}", &code))),
            TimeSelection::At(instant) => self
                .client
                .get(self.url(&API.rate_history_path.replace("{currency}", &code)))
                .query(&[("date", instant.timestamp_millis().to_string())]),
        };
        let body = self.send_json(request).await?;
        parse_rate_payload(&body, currency)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl SignService for HttpExplorerApi {
    async fn open(&self, request: &SignRequest) -> Result<CorrelationId, ExplorerError> {
        let body = self
            .send_json(
                self.client
                    .post(self.url(API.sign_payload_path))
                    .json(&sign_payload_body(request)),
            )
            .await?;
        parse_opened_payload(body)
    }

    async fn poll(&self, id: CorrelationId) -> Result<SessionPoll, ExplorerError> {
        let url = self.url(&format!("{}/{}", API.sign_payload_path, id));
        let body = self.send_json(self.client.get(url)).await?;
        parse_poll_payload(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://bithomp.com/api/";

    #[test]
    fn plain_address_becomes_last_path_segment() {
        let url = account_url(BASE, "rAlice").unwrap();
        assert_eq!(url.as_str(), "https://bithomp.com/api/v2/address/rAlice");
    }

    #[test]
    fn query_and_fragment_characters_stay_in_the_path() {
        let raw = "rAlice?ledgerTimestamp=2020-01-01T00:00:00.000Z#";
        let url = account_url(BASE, raw).unwrap();
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
        assert_eq!(
            url.path_segments().unwrap().last(),
            Some("rAlice%3FledgerTimestamp=2020-01-01T00:00:00.000Z%23")
        );

        let url = account_url(BASE, "../server").unwrap();
        assert_eq!(url.path(), "/api/v2/address/..%2Fserver");
    }
}
