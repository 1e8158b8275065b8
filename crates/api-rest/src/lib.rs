//! # API REST
//!
//! REST surface of the triage proxy.
//!
//! Handles:
//! - HTTP endpoints with axum (`/parse`, `/diagnosis`, `/health`)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialisation, CORS, panic recovery)
//!
//! The diagnosis handler is the composition point of the system: it forwards
//! the request through `engine-client`, applies the `triage-core` policy to
//! the raw conditions, normalises the follow-up question, and returns the
//! engine payload merged with the enrichment. Handlers are stateless per
//! request; the caller owns the evidence list across interview turns.

#![warn(rust_2018_idioms)]

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use engine_client::EngineClient;
use triage_core::constants::{DEFAULT_PATIENT_AGE, DEFAULT_PATIENT_SEX};
use triage_core::{question, TriagePolicy};
use triage_types::{
    Age, Condition, ConfidenceLevel, DiagnosisExtras, DiagnosisReq, DiagnosisRequest, DiagnosisRes,
    DiagnosisStatus, ErrorRes, EvidenceItem, EvidenceSource, HealthRes, InterviewStatus, Mention,
    ParseReq, ParseRequest, ParseResponse, Question, QuestionChoice, QuestionItem, Sex,
};

/// Inbound session-correlation header, accepted as a fallback when the body
/// carries no `interview_token`.
const INTERVIEW_ID_HEADER: HeaderName = HeaderName::from_static("interview-id");

/// Application state shared across REST API handlers
///
/// Contains the engine client used for outbound calls and the triage policy
/// applied to diagnosis responses. Both are resolved once at startup; request
/// handling reads them immutably.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<EngineClient>,
    policy: TriagePolicy,
}

impl AppState {
    pub fn new(engine: EngineClient, policy: TriagePolicy) -> Self {
        Self {
            engine: Arc::new(engine),
            policy,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, parse_symptoms, create_diagnosis),
    components(schemas(
        HealthRes,
        ErrorRes,
        ParseReq,
        ParseResponse,
        Mention,
        Age,
        Sex,
        DiagnosisReq,
        EvidenceItem,
        EvidenceSource,
        DiagnosisRes,
        Condition,
        Question,
        QuestionItem,
        QuestionChoice,
        DiagnosisStatus,
        InterviewStatus,
        ConfidenceLevel,
    ))
)]
struct ApiDoc;

/// Build the REST router.
///
/// CORS is restricted to the single `cors_origin`, with methods
/// GET/POST/OPTIONS and credentialed requests permitted. Panics inside
/// handlers are converted into a generic 500 JSON body instead of tearing
/// the connection down.
///
/// # Errors
///
/// Returns an error if `cors_origin` is not a valid header value.
pub fn router(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    let origin: HeaderValue = cors_origin.parse()?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            INTERVIEW_ID_HEADER,
        ])
        .allow_credentials(true);

    Ok(Router::new()
        .route("/health", get(health))
        .route("/parse", post(parse_symptoms))
        .route("/diagnosis", post(create_diagnosis))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state))
}

/// Convert an unexpected handler panic into a generic 500 response.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Request handler panicked: {detail}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorRes {
            error: "Internal server error".to_string(),
            details: Value::String(detail),
        }),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the triage proxy.
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Triage proxy is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/parse",
    request_body = ParseReq,
    responses(
        (status = 200, description = "Engine parse response, passed through", body = ParseResponse),
        (status = 500, description = "Engine call failed", body = ErrorRes)
    )
)]
/// Parse a free-text symptom description
///
/// Forwards the text and patient demographics to the external NLP endpoint
/// with spelling correction and token inclusion enabled, and returns the
/// engine's mention list unmodified. Age defaults to 30 and sex to male when
/// the caller omits them; absent text is forwarded as-is and left for the
/// engine to reject.
///
/// # Errors
/// Returns `500 Internal Server Error` with the upstream detail if:
/// - the engine call fails, times out, or answers with a 5xx status.
#[axum::debug_handler]
async fn parse_symptoms(
    State(state): State<AppState>,
    Json(req): Json<ParseReq>,
) -> Result<Json<ParseResponse>, (StatusCode, Json<ErrorRes>)> {
    tracing::info!(
        text = req.text.as_deref().unwrap_or(""),
        "parsing symptom description"
    );

    let request = ParseRequest {
        text: req.text,
        age: req.age.unwrap_or(Age {
            value: DEFAULT_PATIENT_AGE,
        }),
        sex: req.sex.unwrap_or(DEFAULT_PATIENT_SEX),
        include_tokens: true,
        correct_spelling: true,
    };

    match state.engine.parse(&request).await {
        Ok(response) => {
            for mention in &response.mentions {
                tracing::info!(symptom = %mention.common_name, "detected symptom");
            }
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!("Parse error: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes {
                    error: "Failed to parse symptoms".to_string(),
                    details: e.detail(),
                }),
            ))
        }
    }
}

#[utoipa::path(
    post,
    path = "/diagnosis",
    request_body = DiagnosisReq,
    params(
        ("Interview-Id" = Option<String>, Header,
         description = "Session-correlation token; the body's interview_token takes precedence")
    ),
    responses(
        (status = 200, description = "Engine diagnosis response merged with the triage enrichment", body = DiagnosisRes),
        (status = 500, description = "Engine call failed", body = ErrorRes)
    )
)]
/// Compute a diagnosis from the accumulated evidence
///
/// Forwards the full evidence list and demographics to the external
/// diagnosis engine (with grouped conditions flattened), then applies the
/// local triage policy to the raw response: conditions are filtered to the
/// significant ones and sorted, the stop criteria and confidence level are
/// derived, and the follow-up question is normalised to canonical answer
/// choices. The response is the engine payload merged with that enrichment.
///
/// The caller owns the evidence list: the proxy stores nothing between
/// turns, and the session token is only passed through to the engine.
///
/// # Errors
/// Returns `500 Internal Server Error` with the upstream detail if:
/// - the engine call fails, times out, or answers with a 5xx status.
/// No partial result is returned in that case.
#[axum::debug_handler]
async fn create_diagnosis(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<DiagnosisReq>,
) -> Result<Json<DiagnosisRes>, (StatusCode, Json<ErrorRes>)> {
    let evidence_count = req.evidence.len();
    tracing::info!(
        sex = ?req.sex,
        age = req.age.value,
        evidence_count,
        "computing diagnosis"
    );

    let interview_id = req.interview_token.clone().or_else(|| {
        headers
            .get(INTERVIEW_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    });

    let request = DiagnosisRequest {
        sex: req.sex,
        age: req.age,
        evidence: req.evidence,
        extras: DiagnosisExtras {
            disable_groups: true,
        },
    };

    match state
        .engine
        .diagnosis(&request, interview_id.as_deref())
        .await
    {
        Ok(response) => {
            let assessment = state.policy.assess(&response.conditions, evidence_count);
            let normalized = response.question.as_ref().map(question::normalize);
            if let (Some(raw), Some(normalized)) = (&response.question, &normalized) {
                tracing::debug!(?raw, ?normalized, "normalised follow-up question");
            }

            Ok(Json(DiagnosisRes {
                conditions: assessment.conditions,
                question: normalized,
                should_stop: assessment.should_stop,
                evidence_count,
                diagnosis_status: assessment.status,
                extra: response.extra,
            }))
        }
        Err(e) => {
            tracing::error!("Diagnosis error: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes {
                    error: "Failed to process diagnosis".to_string(),
                    details: e.detail(),
                }),
            ))
        }
    }
}
