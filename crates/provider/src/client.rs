//! API client for the transaction aggregation provider.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

use banksync_core::accounts::CredentialHandle;
use banksync_core::provider::{ProviderTransactionsClient, TransactionsPage};

use crate::error::{ProviderApiError, Result};
use crate::models::{
    into_domain_transaction, ApiErrorResponse, TransactionsGetRequest, TransactionsGetResponse,
};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_LOG_BODY_CHARS: usize = 512;

/// Client for the aggregation provider REST API.
///
/// Holds no credentials itself; the per-item access token is passed with
/// each call and only its masked form ever reaches the logs.
#[derive(Debug, Clone)]
pub struct AggregationApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl AggregationApiClient {
    /// Create a new provider client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the provider API (e.g., "https://api.aggregator.example")
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create headers for an API request.
    fn headers(&self, access_token: &CredentialHandle) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth_value = HeaderValue::from_str(&format!("Bearer {}", access_token.expose()))
            .map_err(|_| ProviderApiError::Auth("Invalid access token format".to_string()))?;
        headers.insert(AUTHORIZATION, auth_value);

        Ok(headers)
    }

    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("Provider response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("Provider response error ({}): {}", status, preview);
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(ProviderApiError::api(
                    status.as_u16(),
                    format!("{}: {}", error.code, error.message),
                ));
            }
            return Err(ProviderApiError::api(
                status.as_u16(),
                format!("Request failed: {}", body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to deserialize provider response: {}", e);
            ProviderApiError::api(status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }

    /// Fetch one page of transactions for a window.
    ///
    /// POST /transactions/get
    pub async fn transactions_get(
        &self,
        access_token: &CredentialHandle,
        request: TransactionsGetRequest,
    ) -> Result<TransactionsGetResponse> {
        let url = format!("{}/transactions/get", self.base_url);
        debug!(
            "Fetching transactions for account {} offset {} (token {})",
            request.account_id,
            request.offset,
            access_token.masked()
        );

        let response = self
            .client
            .post(&url)
            .headers(self.headers(access_token)?)
            .json(&request)
            .send()
            .await?;

        let parsed: TransactionsGetResponse = Self::parse_response(response).await?;

        if let Some(error) = parsed.error.as_deref() {
            return Err(ProviderApiError::api(200, error.to_string()));
        }
        if !parsed.success {
            return Err(ProviderApiError::api(
                200,
                "provider reported an unsuccessful fetch",
            ));
        }

        Ok(parsed)
    }
}

#[async_trait]
impl ProviderTransactionsClient for AggregationApiClient {
    async fn fetch_transactions(
        &self,
        account_id: &str,
        access_token: &CredentialHandle,
        start_date: NaiveDate,
        end_date: NaiveDate,
        offset: usize,
        count: usize,
    ) -> banksync_core::Result<TransactionsPage> {
        let request = TransactionsGetRequest {
            account_id: account_id.to_string(),
            start_date,
            end_date,
            offset,
            count,
        };

        let response = self
            .transactions_get(access_token, request)
            .await
            .map_err(banksync_core::Error::from)?;

        let transactions = response
            .transactions
            .into_iter()
            .map(into_domain_transaction)
            .collect::<Result<Vec<_>>>()
            .map_err(banksync_core::Error::from)?;

        Ok(TransactionsPage {
            transactions,
            total_for_window: response.total_for_window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex as TokioMutex;

    #[derive(Debug, Clone)]
    struct CapturedRequest {
        authorization: Option<String>,
        body: String,
    }

    fn header_end_offset(buffer: &[u8]) -> Option<usize> {
        buffer.windows(4).position(|window| window == b"\r\n\r\n")
    }

    async fn read_http_request(stream: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
        let mut buffer = Vec::new();
        loop {
            let mut chunk = [0_u8; 2048];
            let read = stream.read(&mut chunk).await.ok()?;
            if read == 0 {
                return None;
            }
            buffer.extend_from_slice(&chunk[..read]);
            if header_end_offset(&buffer).is_some() {
                break;
            }
        }

        let header_end = header_end_offset(&buffer)?;
        let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();

        let mut authorization = None;
        let mut content_length = 0usize;
        for line in head.lines().skip(1) {
            if let Some((name, value)) = line.split_once(':') {
                match name.trim().to_ascii_lowercase().as_str() {
                    "authorization" => authorization = Some(value.trim().to_string()),
                    "content-length" => content_length = value.trim().parse().unwrap_or(0),
                    _ => {}
                }
            }
        }

        let mut body = buffer[header_end + 4..].to_vec();
        while body.len() < content_length {
            let mut chunk = [0_u8; 2048];
            let read = stream.read(&mut chunk).await.ok()?;
            if read == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..read]);
        }

        Some(CapturedRequest {
            authorization,
            body: String::from_utf8_lossy(&body).to_string(),
        })
    }

    async fn start_mock_server(
        responses: Vec<(u16, String)>,
    ) -> (
        String,
        Arc<TokioMutex<Vec<CapturedRequest>>>,
        tokio::task::JoinHandle<()>,
    ) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let captured = Arc::new(TokioMutex::new(Vec::new()));
        let scripted = Arc::new(TokioMutex::new(VecDeque::from(responses)));
        let captured_clone = Arc::clone(&captured);

        let handle = tokio::spawn(async move {
            loop {
                let (mut stream, _) = match listener.accept().await {
                    Ok(value) => value,
                    Err(_) => break,
                };
                let Some(request) = read_http_request(&mut stream).await else {
                    continue;
                };
                captured_clone.lock().await.push(request);

                let (status, body) = scripted
                    .lock()
                    .await
                    .pop_front()
                    .unwrap_or((500, r#"{"code":"INTERNAL","message":"unexpected"}"#.to_string()));
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.flush().await;
            }
        });

        (format!("http://{}", addr), captured, handle)
    }

    fn page_body() -> String {
        r#"{"transactions":[
            {"transactionId":"t1","accountId":"acc-1","amount":10.5,"date":"2026-07-01","name":"COFFEE"},
            {"transactionId":"t2","accountId":"acc-1","amount":-3.25,"date":"2026-07-02","pending":true}
        ],"totalForWindow":2,"success":true}"#
            .to_string()
    }

    fn window() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2026, 8, 1).expect("valid date"),
        )
    }

    #[tokio::test]
    async fn fetch_maps_wire_transactions_into_domain() {
        let (base_url, captured, server) = start_mock_server(vec![(200, page_body())]).await;
        let client = AggregationApiClient::new(&base_url);
        let token = CredentialHandle::new("access-sandbox-token");
        let (start, end) = window();

        let page = client
            .fetch_transactions("acc-1", &token, start, end, 0, 500)
            .await
            .expect("page fetched");

        assert_eq!(page.total_for_window, 2);
        assert_eq!(page.transactions.len(), 2);
        assert!(page.transactions[1].pending);

        let requests = captured.lock().await.clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].authorization.as_deref(),
            Some("Bearer access-sandbox-token")
        );
        assert!(requests[0].body.contains("\"offset\":0"));
        assert!(requests[0].body.contains("\"count\":500"));
        // The token belongs in the header, never the body.
        assert!(!requests[0].body.contains("access-sandbox-token"));

        server.abort();
    }

    #[tokio::test]
    async fn api_error_body_surfaces_code_and_message() {
        let (base_url, _captured, server) = start_mock_server(vec![(
            429,
            r#"{"code":"RATE_LIMIT","message":"too many requests"}"#.to_string(),
        )])
        .await;
        let client = AggregationApiClient::new(&base_url);
        let (start, end) = window();

        let err = client
            .transactions_get(
                &CredentialHandle::new("token"),
                TransactionsGetRequest {
                    account_id: "acc-1".to_string(),
                    start_date: start,
                    end_date: end,
                    offset: 0,
                    count: 500,
                },
            )
            .await
            .expect_err("rate limited");

        match &err {
            ProviderApiError::Api { status, message } => {
                assert_eq!(*status, 429);
                assert!(message.contains("RATE_LIMIT"));
            }
            other => panic!("expected API error, got {:?}", other),
        }
        assert_eq!(err.retry_class(), crate::ApiRetryClass::Retryable);

        server.abort();
    }

    #[tokio::test]
    async fn unsuccessful_fetch_flag_is_an_error() {
        let (base_url, _captured, server) = start_mock_server(vec![(
            200,
            r#"{"transactions":[],"totalForWindow":0,"success":false}"#.to_string(),
        )])
        .await;
        let client = AggregationApiClient::new(&base_url);
        let (start, end) = window();

        let err = client
            .fetch_transactions(
                "acc-1",
                &CredentialHandle::new("token"),
                start,
                end,
                0,
                500,
            )
            .await
            .expect_err("unsuccessful response");

        assert!(matches!(err, banksync_core::Error::Provider(_)));
        server.abort();
    }

    #[tokio::test]
    async fn half_formed_transaction_fails_boundary_validation() {
        let (base_url, _captured, server) = start_mock_server(vec![(
            200,
            r#"{"transactions":[{"amount":1.0,"date":"2026-07-01"}],"totalForWindow":1,"success":true}"#
                .to_string(),
        )])
        .await;
        let client = AggregationApiClient::new(&base_url);
        let (start, end) = window();

        let err = client
            .fetch_transactions(
                "acc-1",
                &CredentialHandle::new("token"),
                start,
                end,
                0,
                500,
            )
            .await
            .expect_err("missing transactionId");

        let rendered = err.to_string();
        assert!(rendered.contains("transactionId"));
        server.abort();
    }
}
