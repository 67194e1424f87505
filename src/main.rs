use anyhow::Context;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use ecg_core::{ClassifierConfig, DiagnosticSummary, EcgClassifier, EcgError, RawEcgRecord};

/// Application state shared across REST API handlers
#[derive(Clone)]
struct AppState {
    classifier: EcgClassifier,
}

#[derive(Serialize, Deserialize, ToSchema)]
struct HealthRes {
    ok: bool,
    message: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
struct ClassifyReq {
    #[schema(value_type = Object)]
    record: RawEcgRecord,
}

#[derive(Serialize, Deserialize, ToSchema)]
struct ClassifyRes {
    request_id: String,
    #[schema(value_type = Object)]
    summary: DiagnosticSummary,
}

#[derive(Serialize, Deserialize, ToSchema)]
struct ClassifyBatchReq {
    #[schema(value_type = Vec<Object>)]
    records: Vec<RawEcgRecord>,
}

/// One entry per submitted record, in submission order. Exactly one of `summary`/`error` is set.
#[derive(Serialize, Deserialize, ToSchema)]
struct BatchItem {
    #[schema(value_type = Object)]
    summary: Option<DiagnosticSummary>,
    error: Option<ErrorRes>,
}

#[derive(Serialize, Deserialize, ToSchema)]
struct ClassifyBatchRes {
    request_id: String,
    results: Vec<BatchItem>,
}

#[derive(Serialize, Deserialize, ToSchema)]
struct ErrorRes {
    error: String,
    field: Option<String>,
}

impl From<&EcgError> for ErrorRes {
    fn from(err: &EcgError) -> Self {
        Self {
            error: err.to_string(),
            field: err.field().map(str::to_owned),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorRes>);

fn api_error(err: EcgError) -> ApiError {
    let status = match err {
        EcgError::Validation { .. }
        | EcgError::InsufficientData { .. }
        | EcgError::Translation(_) => StatusCode::BAD_REQUEST,
        _ => {
            tracing::error!("classification error: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorRes::from(&err)))
}

#[derive(OpenApi)]
#[openapi(
    paths(health, classify, classify_batch),
    components(schemas(
        HealthRes,
        ClassifyReq,
        ClassifyRes,
        ClassifyBatchReq,
        ClassifyBatchRes,
        BatchItem,
        ErrorRes
    ))
)]
struct ApiDoc;

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/classify", post(classify))
        .route("/classify/batch", post(classify_batch))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resolve classifier thresholds once at startup.
///
/// Reads YAML overrides from the file named by `ECG_CONFIG` when set; published defaults otherwise.
fn load_classifier_config() -> anyhow::Result<ClassifierConfig> {
    match std::env::var("ECG_CONFIG") {
        Ok(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read ECG_CONFIG file {path}"))?;
            let config = ClassifierConfig::from_yaml(&text)
                .with_context(|| format!("invalid ECG_CONFIG file {path}"))?;
            tracing::info!("++ Using threshold overrides from {}", path);
            Ok(config)
        }
        Err(_) => Ok(ClassifierConfig::default()),
    }
}

/// Main entry point for the ECG classification service
///
/// # Environment Variables
/// - `ECG_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `ECG_CONFIG`: optional YAML file with threshold overrides
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("ecg=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("ECG_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let classifier = EcgClassifier::new(load_classifier_config()?)?;

    tracing::info!("++ Starting ECG REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr)
        .await
        .with_context(|| format!("failed to bind {rest_addr}"))?;
    axum::serve(listener, app(AppState { classifier })).await?;

    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "ECG classifier is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/classify",
    request_body = ClassifyReq,
    responses(
        (status = 200, description = "Diagnostic summary", body = ClassifyRes),
        (status = 400, description = "Record rejected by validation", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Classify one ECG parameter record
///
/// Validation failures are returned as 400 with the offending field named. Ambiguous or
/// missing conduction evidence is not an error; it is reported inside the summary.
async fn classify(
    State(state): State<AppState>,
    Json(req): Json<ClassifyReq>,
) -> Result<Json<ClassifyRes>, ApiError> {
    let request_id = Uuid::new_v4().simple().to_string();
    let span = tracing::info_span!("classify_request", %request_id);
    let _guard = span.enter();

    let summary = state.classifier.classify(&req.record).map_err(api_error)?;
    tracing::info!(rhythm = %summary.rhythm, "record classified");

    Ok(Json(ClassifyRes {
        request_id,
        summary,
    }))
}

#[utoipa::path(
    post,
    path = "/classify/batch",
    request_body = ClassifyBatchReq,
    responses(
        (status = 200, description = "One result per record", body = ClassifyBatchRes)
    )
)]
/// Classify several independent records
///
/// Each record succeeds or fails on its own; the response is 200 even when some records are
/// rejected.
async fn classify_batch(
    State(state): State<AppState>,
    Json(req): Json<ClassifyBatchReq>,
) -> Json<ClassifyBatchRes> {
    let request_id = Uuid::new_v4().simple().to_string();
    let span = tracing::info_span!("classify_batch_request", %request_id);
    let _guard = span.enter();

    let results: Vec<BatchItem> = state
        .classifier
        .classify_batch(&req.records)
        .into_iter()
        .map(|result| match result {
            Ok(summary) => BatchItem {
                summary: Some(summary),
                error: None,
            },
            Err(err) => BatchItem {
                summary: None,
                error: Some(ErrorRes::from(&err)),
            },
        })
        .collect();

    tracing::info!(records = results.len(), "batch classified");
    Json(ClassifyBatchRes {
        request_id,
        results,
    })
}
