//! Calculation client trait and its HTTP implementation

use super::{CalculationRequest, CalculationResponse};
use crate::config::ResolvedClientConfig;
use crate::error::{CalcError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use tracing::{debug, warn};

/// Trait for the remote calculation service
#[async_trait]
pub trait CalculatorClient: Send + Sync {
    /// Send one calculation request.
    ///
    /// `Ok` carries whatever the service answered, including
    /// `success: false`. `Err` means the answer never arrived or could not
    /// be read.
    async fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResponse>;

    /// Where requests are sent, for display and logs
    fn endpoint(&self) -> &str;
}

/// Client talking JSON over HTTP to the calculation endpoint.
///
/// No timeout is configured; a stuck request ends only when the transport
/// gives up.
pub struct HttpCalculatorClient {
    client: Client,
    url: String,
}

impl HttpCalculatorClient {
    /// Create a new client from resolved config
    pub fn new(config: &ResolvedClientConfig) -> Result<Self> {
        let url = config.endpoint_url();
        if url::Url::parse(&url).is_err() {
            return Err(CalcError::InvalidEndpoint { url }.into());
        }

        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Skipping invalid header '{}'", key),
            }
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl CalculatorClient for HttpCalculatorClient {
    async fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResponse> {
        debug!(url = %self.url, kind = %request.kind, "Sending calculation request");

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| CalcError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| CalcError::Network {
            message: e.to_string(),
        })?;

        let parsed = serde_json::from_str::<CalculationResponse>(&body);

        // An error status still counts as an answer when it carries a
        // readable failure body
        if !status.is_success() {
            return match parsed {
                Ok(parsed) if !parsed.success => Ok(parsed),
                _ => Err(CalcError::Status {
                    status: status.as_u16(),
                    message: body,
                }
                .into()),
            };
        }

        let parsed = parsed.map_err(|e| CalcError::MalformedResponse {
            message: e.to_string(),
        })?;
        debug!(success = parsed.success, "Calculation answered");
        Ok(parsed)
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::IntegralKind;
    use crate::error::Error;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request() -> CalculationRequest {
        CalculationRequest::new("x^2", IntegralKind::Indefinite, "", "", "-10,10").unwrap()
    }

    #[tokio::test]
    async fn test_posts_json_body() {
        let seen = Arc::new(Mutex::new(None::<Value>));
        let seen_clone = seen.clone();
        let router = Router::new().route(
            "/calculate",
            post(move |Json(body): Json<Value>| {
                let seen = seen_clone.clone();
                async move {
                    *seen.lock().unwrap() = Some(body);
                    Json(json!({
                        "success": true,
                        "result_latex": "\\frac{x^{3}}{3} + C",
                        "steps": [],
                        "graph": {"x": [0.0], "y": [0.0], "y_int": [0.0]}
                    }))
                }
            }),
        );
        let base = spawn_server(router).await;

        let client = HttpCalculatorClient::new(&ResolvedClientConfig::new(base)).unwrap();
        let response = client.calculate(&request()).await.unwrap();

        assert!(response.success);
        assert_eq!(
            seen.lock().unwrap().clone().unwrap(),
            json!({
                "function": "x^2",
                "type": "indefinite",
                "lower_limit": "",
                "upper_limit": "",
                "graph_range": "-10,10"
            })
        );
    }

    #[tokio::test]
    async fn test_server_error_body_is_a_response() {
        let router = Router::new().route(
            "/calculate",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"success": false, "error": "boom"})),
                )
            }),
        );
        let base = spawn_server(router).await;

        let client = HttpCalculatorClient::new(&ResolvedClientConfig::new(base)).unwrap();
        let response = client.calculate(&request()).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_non_json_error_status() {
        let router = Router::new().route(
            "/calculate",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let base = spawn_server(router).await;

        let client = HttpCalculatorClient::new(&ResolvedClientConfig::new(base)).unwrap();
        let err = client.calculate(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Calc(CalcError::Status { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ResolvedClientConfig::new(format!("http://{}", addr));
        let client = HttpCalculatorClient::new(&config).unwrap();
        let err = client.calculate(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Calc(CalcError::Network { .. })));
    }

    #[test]
    fn test_endpoint() {
        let config = ResolvedClientConfig::new("http://localhost:5000".to_string());
        let client = HttpCalculatorClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/calculate");
    }
}
