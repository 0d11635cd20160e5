//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{info, warn};

use super::AppState;
use super::types::{ErrorResponse, EvaluateRequest, OptimizeRequest, OptimizeResponse};
use crate::error::OptimizeError;
use crate::model::engine::{Evaluation, evaluate};
use crate::model::types::Configuration;
use crate::optimizer::{SearchOptions, optimize_with};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// `GET /config` → 200 + the server `Configuration` JSON
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<Configuration> {
    Json(state.config.clone())
}

/// Evaluates one sizing.
///
/// `POST /evaluate` → 200 + `Evaluation` JSON
/// invalid configuration or sizing → 400 + `ErrorResponse`
pub async fn post_evaluate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<Evaluation>, ApiError> {
    let config = req.config.as_ref().unwrap_or(&state.config);
    evaluate(config, &req.sizing).map(Json).map_err(|e| {
        warn!(error = %e, "rejected evaluate request");
        api_error(StatusCode::BAD_REQUEST, e)
    })
}

/// Runs a grid search on the blocking pool.
///
/// `POST /optimize` → 200 + `OptimizeResponse` JSON
/// invalid configuration or axis → 400, no feasible candidate → 422
pub async fn post_optimize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let config = req.config.unwrap_or_else(|| state.config.clone());
    let space = req.space.unwrap_or_else(|| state.space.clone());
    let objective = req.objective;
    let options = SearchOptions {
        parallel: req.parallel,
        cancel: None,
    };
    info!(%objective, candidates = space.size(), "optimize request");

    let result = tokio::task::spawn_blocking(move || optimize_with(&config, objective, &space, &options))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("search task failed: {e}")))?;

    match result {
        Ok(outcome) => Ok(Json(OptimizeResponse::from(outcome))),
        Err(e) => {
            warn!(error = %e, "optimize request failed");
            let status = match e {
                OptimizeError::InvalidConfig(_) | OptimizeError::InvalidAxis { .. } => {
                    StatusCode::BAD_REQUEST
                }
                OptimizeError::NoFeasibleSolution { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                OptimizeError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
            };
            Err(api_error(status, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::model::types::fixtures::reference;
    use crate::optimizer::{Axis, SearchSpace};

    fn make_test_state() -> Arc<AppState> {
        Arc::new(AppState {
            config: reference(),
            space: SearchSpace {
                solar_thermal_area_m2: Axis::new(0.0, 5000.0, 2),
                pv_area_m2: Axis::new(0.0, 10_000.0, 2),
                heat_pump_kw: Axis::new(0.0, 2000.0, 2),
                storage_kwh: Axis::new(0.0, 5000.0, 2),
            },
        })
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn config_returns_200() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/config")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["baseline"]["cop"], 2.5);
        assert_eq!(json["economics"]["lifespan_years"], 20);
    }

    #[tokio::test]
    async fn evaluate_zero_sizing() {
        let app = router(make_test_state());
        let body = r#"{"sizing":{"solar_thermal_area_m2":0,"pv_area_m2":0,"heat_pump_kw":0,"storage_kwh":0}}"#;
        let resp = app.oneshot(post_json("/evaluate", body)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["metrics"]["payback"]["status"], "immediate");
        assert_eq!(json["metrics"]["irr"]["status"], "undefined");
        assert_eq!(json["metrics"]["npv"], 0.0);
        assert_eq!(json["metrics"]["cash_flows"].as_array().map(Vec::len), Some(21));
    }

    #[tokio::test]
    async fn evaluate_negative_sizing_returns_400() {
        let app = router(make_test_state());
        let body = r#"{"sizing":{"solar_thermal_area_m2":-1,"pv_area_m2":0,"heat_pump_kw":0,"storage_kwh":0}}"#;
        let resp = app.oneshot(post_json("/evaluate", body)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        assert!(json["error"].as_str().is_some_and(|e| e.contains("sizing.solar_thermal_area_m2")));
    }

    #[tokio::test]
    async fn optimize_uses_server_space() {
        let app = router(make_test_state());
        let resp = app
            .oneshot(post_json("/optimize", r#"{"objective":"npv"}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["objective"], "npv");
        assert_eq!(json["evaluated"], 16);
        assert_eq!(json["skipped"], 0);
        assert!(json.get("best_sizing").is_some());
        assert!(json.get("candidates").is_none());
    }

    #[tokio::test]
    async fn optimize_oversized_grid_returns_400() {
        let app = router(make_test_state());
        let body = format!(r#"{{"space":{{"pv_area_m2":{{"min":0,"max":1000,"steps":{}}}}}}}"#, u64::MAX);
        let resp = app.oneshot(post_json("/optimize", &body)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        assert!(json["error"].as_str().is_some_and(|e| e.contains("pv_area_m2")));
    }

    #[tokio::test]
    async fn optimize_invalid_axis_returns_400() {
        let app = router(make_test_state());
        let body = r#"{"space":{"heat_pump_kw":{"min":100,"max":50,"steps":2}}}"#;
        let resp = app.oneshot(post_json("/optimize", body)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        assert!(json["error"].as_str().is_some_and(|e| e.contains("heat_pump_kw")));
    }
}
