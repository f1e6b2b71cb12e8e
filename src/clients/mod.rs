/// Remote risk service client
use crate::config::AppConfig;
use crate::domain::{
    AnalysisInfo, AnalysisRequest, Contract, CreateAnalysisRequest, CreateAnalysisResponse,
    Events3DData, HealthStatus, SimulationResult,
};
use crate::errors::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &AppConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.http.connect_timeout_seconds))
            .user_agent(format!("debris-dashboard/{}", config.app_version))
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// Per-call options: method, optional JSON body, extra headers
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::get()
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Client for the orbital risk API
pub struct RiskApiClient {
    http_client: HttpClient,
    base_url: String,
}

impl RiskApiClient {
    pub fn new(config: &AppConfig) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(config)?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request and decode the body into `T`.
    ///
    /// The JSON content type is always sent; caller headers override it.
    /// Cancelling `cancel` drops the in-flight request and yields
    /// [`ApiError::Cancelled`].
    pub async fn execute<T>(
        &self,
        endpoint: &str,
        options: RequestOptions,
        cancel: &CancellationToken,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned + Contract,
    {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let url = format!("{}{}", self.base_url, endpoint);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(options.headers);

        let mut req = self
            .http_client
            .get_client()
            .request(options.method.clone(), &url)
            .headers(headers);
        if let Some(body) = &options.body {
            req = req.body(serde_json::to_vec(body)?);
        }

        debug!("{} {}", options.method, url);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            res = send_and_decode::<T>(req) => res,
        };

        match &result {
            Err(ApiError::Cancelled) => debug!("{} {} cancelled", options.method, url),
            Err(e) => warn!("{} {} failed: {}", options.method, url, e),
            Ok(_) => {}
        }
        result
    }

    /// Check service health
    pub async fn health(&self, cancel: &CancellationToken) -> ApiResult<HealthStatus> {
        self.execute("/health", RequestOptions::get(), cancel).await
    }

    /// Run a simulation; `None` runs the server's demo scenario with no body
    pub async fn simulate(
        &self,
        request: Option<&AnalysisRequest>,
        cancel: &CancellationToken,
    ) -> ApiResult<SimulationResult> {
        let mut options = RequestOptions::post();
        if let Some(request) = request {
            options = options.json(serde_json::to_value(request)?);
        }
        self.execute("/simulate", options, cancel).await
    }

    /// Fetch close-approach events for the demo scenario
    pub async fn events(&self, cancel: &CancellationToken) -> ApiResult<Events3DData> {
        self.execute("/events", RequestOptions::get(), cancel).await
    }

    /// Register an analysis; the server assigns its id
    pub async fn create_analysis(
        &self,
        body: &CreateAnalysisRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<CreateAnalysisResponse> {
        let options = RequestOptions::post().json(serde_json::to_value(body)?);
        self.execute("/debris", options, cancel).await
    }

    pub async fn analysis_info(
        &self,
        analysis_id: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<AnalysisInfo> {
        let id = checked_id(analysis_id)?;
        self.execute(&format!("/debris/{}", id), RequestOptions::get(), cancel)
            .await
    }

    pub async fn simulate_analysis(
        &self,
        analysis_id: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<SimulationResult> {
        let id = checked_id(analysis_id)?;
        self.execute(&format!("/simulate/{}", id), RequestOptions::post(), cancel)
            .await
    }

    pub async fn analysis_events(
        &self,
        analysis_id: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<Events3DData> {
        let id = checked_id(analysis_id)?;
        self.execute(&format!("/events/{}", id), RequestOptions::get(), cancel)
            .await
    }
}

/// Analysis ids are interpolated into paths, so only a safe alphabet is allowed
pub(crate) fn checked_id(analysis_id: &str) -> ApiResult<&str> {
    let ok = !analysis_id.is_empty()
        && analysis_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(analysis_id)
    } else {
        Err(ApiError::InvalidInput(format!(
            "invalid analysis id {:?}",
            analysis_id
        )))
    }
}

async fn send_and_decode<T>(req: RequestBuilder) -> ApiResult<T>
where
    T: DeserializeOwned + Contract,
{
    let resp = req.send().await?;
    let status = resp.status();
    let bytes = resp.bytes().await?;

    if !status.is_success() {
        return Err(http_error(status, &bytes));
    }
    decode(&bytes)
}

fn http_error(status: StatusCode, body: &[u8]) -> ApiError {
    let detail = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));
    ApiError::Http {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("").to_string(),
        detail,
    }
}

fn decode<T>(bytes: &[u8]) -> ApiResult<T>
where
    T: DeserializeOwned + Contract,
{
    let value: T = serde_json::from_slice(bytes)?;
    value.check().map_err(ApiError::Decode)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_id_accepts_uuid_like() {
        assert!(checked_id("3f2a-9b_01").is_ok());
    }

    #[test]
    fn test_checked_id_rejects_path_tricks() {
        assert!(matches!(checked_id("../admin"), Err(ApiError::InvalidInput(_))));
        assert!(matches!(checked_id(""), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_http_error_reads_detail() {
        let err = http_error(StatusCode::NOT_FOUND, br#"{"detail":"Analysis not found"}"#);
        assert_eq!(err.to_string(), "Analysis not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_http_error_ignores_non_json_body() {
        let err = http_error(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert_eq!(err.to_string(), "API Error: 502 Bad Gateway");
    }

    #[test]
    fn test_decode_runs_contract() {
        let body = br#"{"analysis_id": ""}"#;
        let res: ApiResult<CreateAnalysisResponse> = decode(body);
        assert!(matches!(res, Err(ApiError::Decode(_))));
    }
}
