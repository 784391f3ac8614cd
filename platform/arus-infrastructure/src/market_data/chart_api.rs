use arus_domain::repositories::market_data::{DailyHistoryRepository, HistoryQuery};
use arus_domain::value_objects::bar::Bar;
use chrono::{DateTime, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://query1.finance.yahoo.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("arus/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

/// Per-field arrays aligned on `timestamp`. Entries are null on holidays
/// and partially-reported sessions, hence the nested Options.
#[derive(Debug, Deserialize)]
struct ChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

/// Decodes a chart API JSON body into bars, dropping rows where any price
/// field is null.
pub fn parse_chart_response(body: &str) -> Result<Vec<Bar>, String> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|err| format!("failed to parse chart json: {err}"))?;

    if let Some(error) = envelope.chart.error {
        return Err(format!(
            "chart api error {}: {}",
            error.code.unwrap_or_else(|| "unknown".to_string()),
            error.description.unwrap_or_default()
        ));
    }

    let result = envelope
        .chart
        .result
        .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
        .ok_or_else(|| "chart api returned no result".to_string())?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| "chart api returned no quote series".to_string())?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let row = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = row else {
            continue;
        };
        // Same invariant the csv source enforces: prices must be positive.
        if open <= 0.0 || high <= 0.0 || low <= 0.0 || close <= 0.0 {
            continue;
        }
        let Some(date) = timestamp_to_date(*ts) else {
            continue;
        };
        bars.push(Bar {
            date,
            open,
            high,
            low,
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0.0),
        });
    }
    Ok(bars)
}

fn timestamp_to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

/// HTTP-backed history source against a Yahoo-style chart endpoint.
#[derive(Debug, Clone)]
pub struct ChartApiDailyHistory {
    base_url: String,
    client: Client,
}

impl ChartApiDailyHistory {
    pub fn new(base_url: Option<String>) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            client,
        })
    }
}

impl DailyHistoryRepository for ChartApiDailyHistory {
    fn load_history(&self, query: &HistoryQuery) -> Result<Vec<Bar>, String> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url.trim_end_matches('/'),
            query.symbol,
            query.range
        );
        tracing::debug!(url = %url, "fetching daily history");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| format!("chart api request failed for {}: {}", query.symbol, err))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|err| format!("failed to read chart api response: {err}"))?;
        if !status.is_success() {
            return Err(format!(
                "chart api returned {} for {}",
                status, query.symbol
            ));
        }

        parse_chart_response(&body)
    }
}
