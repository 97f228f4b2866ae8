use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, error::ErrorKind};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{ProjectionYear, SimulationParameters, SimulationSummary, simulate_with_trace};

pub mod report;

use report::{format_currency, text_summary, year_table};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    initial_investment: Option<f64>,
    annual_interest_rate: Option<f64>,
    annual_fee_rate: Option<f64>,
    years: Option<u32>,
    monthly_contribution: Option<f64>,
    yearly_salary: Option<f64>,
    employer_match_rate: Option<f64>,
    employer_match_cap: Option<f64>,
    annual_lump_sum: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "feedrag",
    about = "Projected account growth with and without management fees"
)]
struct Cli {
    #[arg(long, default_value_t = 10_000.0, help = "Starting principal")]
    initial_investment: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Nominal annual return in percent, e.g. 7"
    )]
    annual_interest_rate: f64,
    #[arg(long, default_value_t = 1.0, help = "Annual fee rate in percent")]
    annual_fee_rate: f64,
    #[arg(long, default_value_t = 30)]
    years: u32,
    #[arg(long, default_value_t = 500.0)]
    monthly_contribution: f64,
    #[arg(long, default_value_t = 60_000.0)]
    yearly_salary: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Maximum annual employer contribution in percent of salary"
    )]
    employer_match_rate: f64,
    #[arg(
        long,
        default_value_t = 0.5,
        help = "Employer dollars matched per dollar contributed"
    )]
    employer_match_cap: f64,
    #[arg(long, default_value_t = 5_000.0)]
    annual_lump_sum: f64,
    #[arg(long, help = "Print the year-by-year comparison table")]
    yearly: bool,
    #[arg(long, help = "Print the projection as JSON instead of text")]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartLabels {
    final_balance: String,
    final_balance_without_fees: String,
    fee_gap: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    parameters: SimulationParameters,
    summary: SimulationSummary,
    yearly_balances: Vec<f64>,
    yearly_balances_without_fees: Vec<f64>,
    years: Vec<ProjectionYear>,
    labels: ChartLabels,
    text_summary: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_parameters(cli: &Cli) -> Result<SimulationParameters, String> {
    if !(10..=60).contains(&cli.years) {
        return Err("--years must be between 10 and 60".to_string());
    }

    for (name, value, min, max) in [
        ("--initial-investment", cli.initial_investment, 0.0, 10_000_000.0),
        ("--annual-interest-rate", cli.annual_interest_rate, 0.0, 20.0),
        ("--annual-fee-rate", cli.annual_fee_rate, 0.0, 5.0),
        ("--monthly-contribution", cli.monthly_contribution, 0.0, 20_000.0),
        ("--yearly-salary", cli.yearly_salary, 20_000.0, 2_000_000.0),
        ("--employer-match-rate", cli.employer_match_rate, 0.0, 20.0),
        ("--employer-match-cap", cli.employer_match_cap, 0.0, 1.0),
        ("--annual-lump-sum", cli.annual_lump_sum, 0.0, 10_000_000.0),
    ] {
        if !(min..=max).contains(&value) {
            return Err(format!("{name} must be between {min} and {max}"));
        }
    }

    Ok(SimulationParameters {
        initial_investment: cli.initial_investment,
        annual_interest_rate: cli.annual_interest_rate / 100.0,
        annual_fee_rate: cli.annual_fee_rate / 100.0,
        years: cli.years,
        monthly_contribution: cli.monthly_contribution,
        yearly_salary: cli.yearly_salary,
        employer_match_rate: cli.employer_match_rate / 100.0,
        employer_match_cap: cli.employer_match_cap,
        annual_lump_sum: cli.annual_lump_sum,
    })
}

fn build_project_response(params: SimulationParameters) -> Result<ProjectResponse, String> {
    let (result, years) = simulate_with_trace(&params).map_err(|e| e.to_string())?;
    let summary = result.summary;

    log::debug!(
        "projected {} years: final balance {:.2}, fees {:.2}",
        params.years,
        summary.final_balance,
        summary.total_fees_paid
    );

    Ok(ProjectResponse {
        parameters: params,
        summary,
        yearly_balances_without_fees: years.iter().map(|y| y.balance_without_fees).collect(),
        yearly_balances: result.yearly_balances,
        years,
        labels: ChartLabels {
            final_balance: format_currency(summary.final_balance),
            final_balance_without_fees: format_currency(summary.final_balance_without_fees),
            fee_gap: format_currency(summary.total_fees_paid),
        },
        text_summary: text_summary(&summary),
    })
}

/// Parses CLI flags and renders the projection report. `--help` and
/// `--version` render their text as the report.
pub fn run_cli<I, T>(args: I) -> Result<String, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return Ok(e.to_string());
        }
        Err(e) => return Err(e.to_string()),
    };
    let params = build_parameters(&cli)?;
    let response = build_project_response(params)?;

    if cli.json {
        return serde_json::to_string_pretty(&response)
            .map_err(|e| format!("Failed to serialize projection: {e}"));
    }

    let mut out = String::new();
    if cli.yearly {
        out.push_str(&year_table(&response.years));
        out.push('\n');
    }
    out.push_str(&response.text_summary);
    out.push_str(&format!(
        "\n\nWithout fees: {} ({} lost to fees)",
        response.labels.final_balance_without_fees, response.labels.fee_gap
    ));
    Ok(out)
}

fn app() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("feedrag HTTP API listening on http://{addr}");
    log::info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(
    payload: Result<Query<ProjectPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => project_handler_impl(payload).await,
        Err(rejection) => rejected_payload(rejection.body_text()),
    }
}

async fn project_post_handler(payload: Result<Json<ProjectPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => project_handler_impl(payload).await,
        Err(rejection) => rejected_payload(rejection.body_text()),
    }
}

fn rejected_payload(reason: String) -> Response {
    log::warn!("rejected projection payload: {reason}");
    error_response(
        StatusCode::BAD_REQUEST,
        &format!("Invalid API payload: {reason}"),
    )
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let response = api_parameters_from_payload(payload).and_then(build_project_response);
    match response {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => {
            log::warn!("rejected projection request: {msg}");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
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
fn api_parameters_from_json(json: &str) -> Result<SimulationParameters, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_parameters_from_payload(payload)
}

fn api_parameters_from_payload(payload: ProjectPayload) -> Result<SimulationParameters, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.initial_investment {
        cli.initial_investment = v;
    }
    if let Some(v) = payload.annual_interest_rate {
        cli.annual_interest_rate = v;
    }
    if let Some(v) = payload.annual_fee_rate {
        cli.annual_fee_rate = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v;
    }
    if let Some(v) = payload.yearly_salary {
        cli.yearly_salary = v;
    }
    if let Some(v) = payload.employer_match_rate {
        cli.employer_match_rate = v;
    }
    if let Some(v) = payload.employer_match_cap {
        cli.employer_match_cap = v;
    }
    if let Some(v) = payload.annual_lump_sum {
        cli.annual_lump_sum = v;
    }

    build_parameters(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        initial_investment: 10_000.0,
        annual_interest_rate: 7.0,
        annual_fee_rate: 1.0,
        years: 30,
        monthly_contribution: 500.0,
        yearly_salary: 60_000.0,
        employer_match_rate: 5.0,
        employer_match_cap: 0.5,
        annual_lump_sum: 5_000.0,
        yearly: false,
        json: false,
    }
}
