use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    DEFAULT_MAX_MONTHS, HistoryGranularity, ParameterError, ProjectionConfig, ProjectionError,
    SimulationParameters, run_projection,
};
use crate::report::ProjectionReport;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiGranularity {
    #[serde(alias = "year", alias = "annual")]
    Yearly,
    #[serde(alias = "month")]
    Monthly,
}

impl From<ApiGranularity> for HistoryGranularity {
    fn from(value: ApiGranularity) -> Self {
        match value {
            ApiGranularity::Yearly => HistoryGranularity::Yearly,
            ApiGranularity::Monthly => HistoryGranularity::Monthly,
        }
    }
}

/// Request body or query string. Rates are monthly percentages.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    current_age: Option<u32>,
    initial_capital: Option<f64>,
    monthly_inflation: Option<f64>,
    monthly_yield: Option<f64>,
    monthly_contribution: Option<f64>,
    desired_income: Option<f64>,
    life_expectancy: Option<u32>,

    granularity: Option<ApiGranularity>,
    max_months: Option<u32>,
}

#[derive(Debug)]
struct ApiRequest {
    params: SimulationParameters,
    config: ProjectionConfig,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    log::info!("projection HTTP API listening on http://{addr}");
    println!("Retirement projection API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload, Local::now().date_naive())
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload, Local::now().date_naive())
}

fn project_handler_impl(payload: ProjectPayload, today: NaiveDate) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };

    match build_project_response(&request, today) {
        Ok(report) => json_response(StatusCode::OK, report),
        Err(err @ ProjectionError::DidNotConverge { .. }) => {
            log::warn!("{err}");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string())
        }
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

fn build_project_response(
    request: &ApiRequest,
    today: NaiveDate,
) -> Result<ProjectionReport, ProjectionError> {
    let result = run_projection(&request.params, request.config)?;
    Ok(ProjectionReport::new(&request.params, result, today))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: ProjectPayload) -> Result<ApiRequest, ParameterError> {
    let defaults = SimulationParameters::default();
    let params = SimulationParameters {
        current_age: payload.current_age.unwrap_or(defaults.current_age),
        initial_capital: payload.initial_capital.unwrap_or(defaults.initial_capital),
        monthly_inflation: payload
            .monthly_inflation
            .map(|pct| pct / 100.0)
            .unwrap_or(defaults.monthly_inflation),
        monthly_yield: payload
            .monthly_yield
            .map(|pct| pct / 100.0)
            .unwrap_or(defaults.monthly_yield),
        monthly_contribution: payload
            .monthly_contribution
            .unwrap_or(defaults.monthly_contribution),
        desired_income: payload.desired_income.unwrap_or(defaults.desired_income),
        life_expectancy: payload.life_expectancy.unwrap_or(defaults.life_expectancy),
    };
    params.validate()?;

    let config = ProjectionConfig {
        granularity: payload
            .granularity
            .map(HistoryGranularity::from)
            .unwrap_or_default(),
        max_months: payload.max_months.unwrap_or(DEFAULT_MAX_MONTHS),
    };
    config.validate()?;

    Ok(ApiRequest { params, config })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    #[test]
    fn empty_payload_uses_defaults() {
        let request = api_request_from_json("{}").expect("valid request");
        assert_eq!(request.params, SimulationParameters::default());
        assert_eq!(request.config.granularity, HistoryGranularity::Yearly);
        assert_eq!(request.config.max_months, DEFAULT_MAX_MONTHS);
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let request = api_request_from_json(
            r#"{
                "currentAge": 40,
                "initialCapital": 50000,
                "monthlyInflation": 0.4,
                "monthlyYield": 0.8,
                "monthlyContribution": 2000,
                "desiredIncome": 3000,
                "lifeExpectancy": 90,
                "granularity": "monthly",
                "maxMonths": 600
            }"#,
        )
        .expect("valid request");

        assert_eq!(request.params.current_age, 40);
        assert_approx(request.params.initial_capital, 50_000.0);
        assert_approx(request.params.monthly_inflation, 0.004);
        assert_approx(request.params.monthly_yield, 0.008);
        assert_approx(request.params.monthly_contribution, 2_000.0);
        assert_approx(request.params.desired_income, 3_000.0);
        assert_eq!(request.params.life_expectancy, 90);
        assert_eq!(request.config.granularity, HistoryGranularity::Monthly);
        assert_eq!(request.config.max_months, 600);
    }

    #[test]
    fn api_request_rejects_invalid_values() {
        let err = api_request_from_json(r#"{"desiredIncome": -5}"#).expect_err("negative income");
        assert!(err.contains("--desired-income"));

        let err = api_request_from_json(r#"{"maxMonths": 0}"#).expect_err("zero bound");
        assert!(err.contains("--max-months"));

        let err = api_request_from_json(r#"{"granularity": "weekly"}"#).expect_err("unknown");
        assert!(err.starts_with("Invalid API JSON payload"));
    }

    #[test]
    fn project_response_serialization_contains_expected_fields() {
        let request = api_request_from_json("{}").expect("valid request");
        let report = build_project_response(&request, today()).expect("converges");
        let value = serde_json::to_value(&report).expect("serializable");

        for key in [
            "monthsWorked",
            "yearsWorked",
            "retirementDate",
            "retirementAge",
            "nominalIncome",
            "desiredIncome",
            "granularity",
            "history",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["monthsWorked"], 81);
    }

    #[test]
    fn divergent_projection_maps_to_unprocessable_entity() {
        let request = api_request_from_json(
            r#"{"initialCapital": 0, "monthlyContribution": 0, "maxMonths": 3}"#,
        )
        .expect("valid request");
        let response = project_handler_impl(
            ProjectPayload {
                initial_capital: Some(0.0),
                monthly_contribution: Some(0.0),
                max_months: Some(3),
                ..ProjectPayload::default()
            },
            today(),
        );

        assert!(matches!(
            build_project_response(&request, today()),
            Err(ProjectionError::DidNotConverge { max_months: 3 })
        ));
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );
    }

    #[test]
    fn invalid_payload_maps_to_bad_request() {
        let response = project_handler_impl(
            ProjectPayload {
                current_age: Some(95),
                ..ProjectPayload::default()
            },
            today(),
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
