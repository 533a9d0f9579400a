use axum::{
    Router,
    extract::{Json, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::config::{InputArgs, build_inputs};
use crate::core::{
    CacheError, CacheStats, FinancialInputs, ResultCache, RetirementAgeSearch, SearchRange,
    WealthSimulationResult, find_optimal_retirement_age, lock_cache, shared_cache,
};

/// Flat camelCase overlay on `InputArgs::default()`; the same shape works as
/// a query string and as a JSON body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InputPayload {
    gross_salary_usd: Option<f64>,
    eur_usd_rate: Option<f64>,
    thb_eur_rate: Option<f64>,
    tax_rate: Option<f64>,
    tax_free_years: Option<u32>,

    housing: Option<f64>,
    utilities: Option<f64>,
    food: Option<f64>,
    transportation: Option<f64>,
    healthcare: Option<f64>,
    insurance: Option<f64>,
    entertainment: Option<f64>,
    personal_care: Option<f64>,
    education: Option<f64>,
    clothing: Option<f64>,
    travel: Option<f64>,
    other: Option<f64>,

    total_debt: Option<f64>,
    total_savings: Option<f64>,
    total_investments: Option<f64>,

    current_age: Option<u32>,
    lifespan: Option<u32>,
    retirement_age: Option<u32>,
    investment_return_rate: Option<f64>,
    emergency_fund_months: Option<f64>,

    phase1_debt: Option<f64>,
    phase1_savings: Option<f64>,
    phase1_investment: Option<f64>,
    phase2_debt: Option<f64>,
    phase2_savings: Option<f64>,
    phase2_investment: Option<f64>,
    phase3_savings: Option<f64>,
    phase3_investment: Option<f64>,

    // Only read by /api/optimal-age.
    earliest_age: Option<u32>,
    latest_age: Option<u32>,
}

#[derive(Debug)]
struct ApiRequest {
    inputs: FinancialInputs,
    range: Option<SearchRange>,
}

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<Mutex<ResultCache>>,
}

impl AppState {
    pub fn new(cache: Arc<Mutex<ResultCache>>) -> Self {
        Self { cache }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse<'a> {
    cached: bool,
    #[serde(flatten)]
    result: &'a WealthSimulationResult,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum OptimalAgeResponse<'a> {
    #[serde(rename_all = "camelCase")]
    Found {
        retirement_age: u32,
        candidates_evaluated: u32,
        result: &'a WealthSimulationResult,
    },
    #[serde(rename_all = "camelCase")]
    Infeasible {
        earliest_age: u32,
        latest_age: u32,
        message: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClearResponse {
    cleared: usize,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route(
            "/api/optimal-age",
            get(optimal_age_get_handler).post(optimal_age_post_handler),
        )
        .route("/api/cache/stats", get(cache_stats_handler))
        .route("/api/cache/clear", post(cache_clear_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(AppState::new(shared_cache()));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "wealthpath HTTP API listening");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<InputPayload>,
) -> Response {
    simulate_handler_impl(&state, payload)
}

async fn simulate_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<InputPayload>,
) -> Response {
    simulate_handler_impl(&state, payload)
}

fn simulate_handler_impl(state: &AppState, payload: InputPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return bad_request(&msg),
    };

    let lookup = lock_cache(&state.cache).get_or_simulate(&request.inputs);
    match lookup {
        Ok(lookup) => {
            tracing::debug!(cached = lookup.cached, "simulate request served");
            json_response(
                StatusCode::OK,
                SimulateResponse {
                    cached: lookup.cached,
                    result: &lookup.result,
                },
            )
        }
        Err(CacheError::Validation(err)) => bad_request(&err.to_string()),
        Err(err) => {
            tracing::error!(error = %err, "simulate request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

async fn optimal_age_get_handler(Query(payload): Query<InputPayload>) -> Response {
    optimal_age_handler_impl(payload)
}

async fn optimal_age_post_handler(Json(payload): Json<InputPayload>) -> Response {
    optimal_age_handler_impl(payload)
}

fn optimal_age_handler_impl(payload: InputPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return bad_request(&msg),
    };

    let search = match find_optimal_retirement_age(&request.inputs, request.range) {
        Ok(search) => search,
        Err(err) => return bad_request(&err.to_string()),
    };

    let response = match &search {
        RetirementAgeSearch::Found {
            retirement_age,
            candidates_evaluated,
            result,
        } => OptimalAgeResponse::Found {
            retirement_age: *retirement_age,
            candidates_evaluated: *candidates_evaluated,
            result,
        },
        RetirementAgeSearch::Infeasible { earliest, latest } => OptimalAgeResponse::Infeasible {
            earliest_age: *earliest,
            latest_age: *latest,
            message: format!(
                "no retirement age between {earliest} and {latest} keeps wealth non-negative"
            ),
        },
    };
    json_response(StatusCode::OK, response)
}

async fn cache_stats_handler(State(state): State<AppState>) -> Response {
    let stats: CacheStats = lock_cache(&state.cache).stats();
    json_response(StatusCode::OK, stats)
}

async fn cache_clear_handler(State(state): State<AppState>) -> Response {
    let mut cache = lock_cache(&state.cache);
    let cleared = cache.len();
    cache.clear();
    drop(cache);
    tracing::info!(cleared, "result cache cleared");
    json_response(StatusCode::OK, ClearResponse { cleared })
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn bad_request(msg: &str) -> Response {
    tracing::warn!(error = msg, "rejected request");
    error_response(StatusCode::BAD_REQUEST, msg)
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
    let payload = serde_json::from_str::<InputPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: InputPayload) -> Result<ApiRequest, String> {
    let mut args = InputArgs::default();

    macro_rules! overlay {
        ($($field:ident),* $(,)?) => {
            $(
                if let Some(v) = payload.$field {
                    args.$field = v;
                }
            )*
        };
    }

    overlay!(
        gross_salary_usd,
        eur_usd_rate,
        thb_eur_rate,
        tax_rate,
        tax_free_years,
        housing,
        utilities,
        food,
        transportation,
        healthcare,
        insurance,
        entertainment,
        personal_care,
        education,
        clothing,
        travel,
        other,
        total_debt,
        total_savings,
        total_investments,
        current_age,
        lifespan,
        retirement_age,
        investment_return_rate,
        emergency_fund_months,
        phase1_debt,
        phase1_savings,
        phase1_investment,
        phase2_debt,
        phase2_savings,
        phase2_investment,
        phase3_savings,
        phase3_investment,
    );

    // A shorter horizon drags the default retirement age along with it.
    if payload.retirement_age.is_none() && args.retirement_age > args.lifespan {
        args.retirement_age = args.lifespan;
    }
    if payload.retirement_age.is_none() && args.retirement_age < args.current_age {
        args.retirement_age = args.current_age;
    }

    let inputs = build_inputs(&args)?;
    let range = SearchRange::with_overrides(&inputs, payload.earliest_age, payload.latest_age);

    Ok(ApiRequest { inputs, range })
}
