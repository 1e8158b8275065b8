//! The diagnosis engine HTTP client.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use triage_types::{DiagnosisRequest, DiagnosisResponse, ParseRequest, ParseResponse};

use crate::{EngineConfig, EngineError, EngineResult};

const HEADER_APP_ID: &str = "App-Id";
const HEADER_APP_KEY: &str = "App-Key";
const HEADER_MODEL: &str = "Model";
const HEADER_INTERVIEW_ID: &str = "Interview-Id";

/// HTTP client for the external diagnosis engine.
///
/// Wraps a `reqwest::Client` built with the configured timeout and sends the
/// `App-Id`/`App-Key`/`Model` headers on every call. Responses with a status
/// below 500 are decoded as success so engine-reported validation errors
/// flow back to the caller unmodified; 5xx responses, connection failures,
/// and timeouts fail the call.
#[derive(Clone, Debug)]
pub struct EngineClient {
    http: reqwest::Client,
    config: EngineConfig,
}

impl EngineClient {
    /// Create a new `EngineClient` from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ClientBuild`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(EngineError::ClientBuild)?;

        Ok(Self { http, config })
    }

    /// Forward a free-text symptom description to the engine's NLP endpoint.
    pub async fn parse(&self, request: &ParseRequest) -> EngineResult<ParseResponse> {
        self.post_json("/parse", request, None).await
    }

    /// Forward the accumulated evidence to the engine's diagnosis endpoint.
    ///
    /// `interview_id` is attached as the `Interview-Id` session-correlation
    /// header when present.
    pub async fn diagnosis(
        &self,
        request: &DiagnosisRequest,
        interview_id: Option<&str>,
    ) -> EngineResult<DiagnosisResponse> {
        self.post_json("/diagnosis", request, interview_id).await
    }

    async fn post_json<B, R>(
        &self,
        endpoint: &str,
        body: &B,
        interview_id: Option<&str>,
    ) -> EngineResult<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url(), endpoint);

        let mut request = self
            .http
            .post(&url)
            .header(HEADER_APP_ID, self.config.app_id())
            .header(HEADER_APP_KEY, self.config.app_key())
            .header(HEADER_MODEL, self.config.model())
            .json(body);
        if let Some(id) = interview_id {
            request = request.header(HEADER_INTERVIEW_ID, id);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::Timeout(self.config.timeout().as_secs())
            } else if e.is_connect() {
                EngineError::Connection(e)
            } else {
                EngineError::Transport(e)
            }
        })?;

        let status = response.status();
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str(&body).unwrap_or(Value::String(body));
            tracing::error!(status = status.as_u16(), endpoint, "engine call failed");
            return Err(EngineError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        response.json::<R>().await.map_err(EngineError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use triage_types::{
        Age, DiagnosisExtras, DiagnosisRequest, EvidenceItem, EvidenceSource, ParseRequest, Sex,
    };
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(server: &MockServer) -> EngineConfig {
        EngineConfig::new(server.uri(), "app-id", "app-key", "engine-en").expect("valid config")
    }

    fn parse_request(text: &str) -> ParseRequest {
        ParseRequest {
            text: Some(text.to_string()),
            age: Age { value: 30 },
            sex: Sex::Male,
            include_tokens: true,
            correct_spelling: true,
        }
    }

    fn diagnosis_request() -> DiagnosisRequest {
        DiagnosisRequest {
            sex: Sex::Female,
            age: Age { value: 45 },
            evidence: vec![EvidenceItem {
                id: "s_21".to_string(),
                choice_id: "present".to_string(),
                source: Some(EvidenceSource::Initial),
            }],
            extras: DiagnosisExtras {
                disable_groups: true,
            },
        }
    }

    #[tokio::test]
    async fn parse_sends_credentials_and_returns_mentions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/parse"))
            .and(header("App-Id", "app-id"))
            .and(header("App-Key", "app-key"))
            .and(header("Model", "engine-en"))
            .and(body_partial_json(json!({
                "text": "I have a headache",
                "age": {"value": 30},
                "sex": "male",
                "include_tokens": true,
                "correct_spelling": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "mentions": [
                    {"id": "s_21", "common_name": "Headache", "choice_id": "present"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = EngineClient::new(config(&server)).expect("client");
        let response = client
            .parse(&parse_request("I have a headache"))
            .await
            .expect("parse succeeds");

        assert_eq!(response.mentions.len(), 1);
        assert_eq!(response.mentions[0].id, "s_21");
        assert_eq!(response.mentions[0].common_name, "Headache");
        // Unmodelled engine fields survive the round trip.
        assert_eq!(response.mentions[0].extra["choice_id"], json!("present"));
    }

    #[tokio::test]
    async fn diagnosis_forwards_the_interview_id_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/diagnosis"))
            .and(header("Interview-Id", "token-1"))
            .and(body_partial_json(json!({
                "sex": "female",
                "age": {"value": 45},
                "evidence": [
                    {"id": "s_21", "choice_id": "present", "source": "initial"}
                ],
                "extras": {"disable_groups": true},
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "conditions": [
                    {"id": "c_1", "common_name": "Flu", "probability": 0.92}
                ],
                "question": null,
                "should_stop": false,
                "interview_token": "token-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = EngineClient::new(config(&server)).expect("client");
        let response = client
            .diagnosis(&diagnosis_request(), Some("token-1"))
            .await
            .expect("diagnosis succeeds");

        assert_eq!(response.conditions.len(), 1);
        assert_eq!(response.should_stop, Some(false));
        assert_eq!(response.extra["interview_token"], json!("token-1"));
    }

    #[tokio::test]
    async fn diagnosis_without_token_omits_the_interview_id_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/diagnosis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"conditions": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = EngineClient::new(config(&server)).expect("client");
        client
            .diagnosis(&diagnosis_request(), None)
            .await
            .expect("diagnosis succeeds");

        let requests = server
            .received_requests()
            .await
            .expect("recorded requests");
        assert!(requests[0].headers.get("Interview-Id").is_none());
    }

    #[tokio::test]
    async fn server_errors_carry_the_upstream_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/parse"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"message": "internal engine error"})),
            )
            .mount(&server)
            .await;

        let client = EngineClient::new(config(&server)).expect("client");
        let err = client
            .parse(&parse_request("I have a headache"))
            .await
            .expect_err("should fail on 5xx");

        match &err {
            EngineError::Upstream { status, detail } => {
                assert_eq!(*status, 500);
                assert_eq!(detail["message"], json!("internal engine error"));
            }
            other => panic!("expected Upstream error, got {other:?}"),
        }
        assert_eq!(err.detail(), json!({"message": "internal engine error"}));
    }

    #[tokio::test]
    async fn non_json_server_errors_fall_back_to_the_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/parse"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = EngineClient::new(config(&server)).expect("client");
        let err = client
            .parse(&parse_request("I have a headache"))
            .await
            .expect_err("should fail on 5xx");

        assert_eq!(err.detail(), json!("bad gateway"));
    }

    #[tokio::test]
    async fn engine_validation_errors_pass_through_as_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/parse"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"message": "text is required"})),
            )
            .mount(&server)
            .await;

        let client = EngineClient::new(config(&server)).expect("client");
        let response = client
            .parse(&parse_request(""))
            .await
            .expect("sub-500 statuses decode as success");

        assert!(response.mentions.is_empty());
        assert_eq!(response.extra["message"], json!("text is required"));
    }

    #[tokio::test]
    async fn slow_responses_time_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/parse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"mentions": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = config(&server).with_timeout(Duration::from_millis(100));
        let client = EngineClient::new(config).expect("client");
        let err = client
            .parse(&parse_request("I have a headache"))
            .await
            .expect_err("should time out");

        assert!(matches!(err, EngineError::Timeout(_)));
    }
}
