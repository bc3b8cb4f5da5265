//! API request handlers
//!
//! Upload endpoints take the raw .xlsx bytes as the request body.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::config::{DedupPolicy, ForecastConfig};
use crate::error::{ForecastError, ForecastResult};
use crate::excel::export_to_bytes;
use crate::pipeline::{forecast_from_bytes, run_pipeline, ForecastReport};
use crate::present::{monthly_totals, BarChartRenderer};
use crate::schema::EXPORT_FILE_NAME;

use super::server::AppState;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Status code for a pipeline failure
pub fn error_status(error: &ForecastError) -> StatusCode {
    match error {
        e if e.is_input_error() => StatusCode::UNPROCESSABLE_ENTITY,
        ForecastError::Config(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: ForecastError) -> Response {
    let status = error_status(&error);
    warn!(status = status.as_u16(), error = %error, "forecast request failed");
    (status, Json(ApiResponse::<()>::err(error.to_string()))).into_response()
}

/// Run CPU-bound workbook work on the blocking pool
pub async fn run_blocking<T, F>(work: F) -> ForecastResult<T>
where
    F: FnOnce() -> ForecastResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ForecastError::Task(e.to_string()))?
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

fn endpoint(path: &str, method: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Forecast API Server".to_string(),
        version: state.version.clone(),
        description: "Upload an opportunities workbook, get a monthly revenue forecast".to_string(),
        endpoints: vec![
            endpoint("/health", "GET", "Health check endpoint"),
            endpoint("/version", "GET", "Get server version"),
            endpoint(
                "/api/v1/forecast",
                "POST",
                "Forecast table, monthly totals and SVG chart as JSON",
            ),
            endpoint("/api/v1/forecast/chart", "POST", "Monthly totals bar chart (SVG)"),
            endpoint("/api/v1/forecast/export", "POST", "Forecast as forecast_data.xlsx"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "forecast".to_string(),
            "chart".to_string(),
            "export".to_string(),
        ],
    }))
}

/// Per-request overrides of the server's default configuration
#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub sheet: Option<String>,
    pub stale_days: Option<i64>,
    pub dedup: Option<DedupPolicy>,
}

impl ForecastQuery {
    pub fn apply(self, defaults: &ForecastConfig) -> ForecastConfig {
        let mut config = defaults.clone();
        if let Some(sheet) = self.sheet {
            config.sheet = sheet;
        }
        if let Some(days) = self.stale_days {
            config.stale_after_days = days;
        }
        if let Some(dedup) = self.dedup {
            config.dedup = dedup;
        }
        config
    }
}

/// POST /api/v1/forecast - Table, totals and chart as JSON
pub async fn forecast(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ForecastQuery>,
    body: Bytes,
) -> Response {
    let config = query.apply(&state.defaults);
    match run_blocking(move || run_pipeline(&body, &config)).await {
        Ok(report) => Json(ApiResponse::<ForecastReport>::ok(report)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/forecast/chart - SVG bar chart of monthly totals
pub async fn chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ForecastQuery>,
    body: Bytes,
) -> Response {
    let config = query.apply(&state.defaults);
    let svg = run_blocking(move || {
        forecast_from_bytes(&body, &config)
            .and_then(|table| BarChartRenderer::default().render(&monthly_totals(&table)))
    })
    .await;

    match svg {
        Ok(svg) => ([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/forecast/export - forecast_data.xlsx download
pub async fn export(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ForecastQuery>,
    body: Bytes,
) -> Response {
    let config = query.apply(&state.defaults);
    let bytes = run_blocking(move || {
        forecast_from_bytes(&body, &config).and_then(|table| export_to_bytes(&table))
    })
    .await;

    match bytes {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== ApiResponse Tests ====================

    #[test]
    fn test_api_response_ok_creates_success_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test data".to_string());
        assert!(response.success);
        assert_eq!(response.data, Some("test data".to_string()));
        assert!(response.error.is_none());
        // UUID format (8-4-4-4-12)
        assert_eq!(response.request_id.len(), 36);
    }

    #[test]
    fn test_api_response_err_creates_error_response() {
        let response: ApiResponse<String> = ApiResponse::err("Something went wrong");
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("Something went wrong".to_string()));
    }

    #[test]
    fn test_api_response_request_id_is_unique() {
        let response1: ApiResponse<String> = ApiResponse::ok("test1".to_string());
        let response2: ApiResponse<String> = ApiResponse::ok("test2".to_string());
        assert_ne!(response1.request_id, response2.request_id);
    }

    // ==================== Error Mapping Tests ====================

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&ForecastError::MissingColumn("Owner".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(&ForecastError::SheetNotFound {
                sheet: "opportunities".into(),
                available: "Sheet1".into()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(&ForecastError::Config("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&ForecastError::ExportFailed("disk".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    // ==================== Blocking Pool Tests ====================

    #[tokio::test]
    async fn test_run_blocking_returns_result() {
        assert_eq!(run_blocking(|| Ok(21 * 2)).await.unwrap(), 42);

        let err = run_blocking(|| -> ForecastResult<()> { Err(ForecastError::Config("bad".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::Config(_)));
    }

    #[tokio::test]
    async fn test_run_blocking_panic_is_internal_error() {
        let err = run_blocking(|| -> ForecastResult<()> { panic!("worker died") })
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::Task(_)));
        assert_eq!(error_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ==================== Query Tests ====================

    #[test]
    fn test_query_overrides_defaults() {
        let query = ForecastQuery {
            sheet: Some("pipeline".to_string()),
            stale_days: Some(14),
            dedup: Some(DedupPolicy::LatestUpdated),
        };
        let config = query.apply(&ForecastConfig::default());
        assert_eq!(config.sheet, "pipeline");
        assert_eq!(config.stale_after_days, 14);
        assert_eq!(config.dedup, DedupPolicy::LatestUpdated);
    }

    #[test]
    fn test_empty_query_keeps_defaults() {
        let config = ForecastQuery::default().apply(&ForecastConfig::default());
        assert_eq!(config, ForecastConfig::default());
    }

    #[test]
    fn test_query_deserializes_kebab_case_dedup() {
        let query: ForecastQuery =
            serde_json::from_str(r#"{"dedup": "latest-updated", "stale_days": 3}"#).unwrap();
        assert_eq!(query.dedup, Some(DedupPolicy::LatestUpdated));
        assert_eq!(query.stale_days, Some(3));
        assert!(query.sheet.is_none());
    }
}
