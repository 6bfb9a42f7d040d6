use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::UpstreamError;
use crate::models::{InsightPayload, MetricRecord, Period};

pub const DEFAULT_STATS_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_STATS_API_TIMEOUT_SECS: u64 = 15;

/// Whose numbers are being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsScope<'a> {
    /// Every user, as shown on the admin panel.
    Team,
    /// One user's own counts plus everyone else's for comparison.
    Personal { username: &'a str },
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamRequest {
    Get {
        path: &'static str,
        query: Vec<(&'static str, String)>,
    },
    Post {
        path: &'static str,
        body: Value,
    },
}

impl UpstreamRequest {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Get { path, .. } | Self::Post { path, .. } => path,
        }
    }
}

/// Maps a reporting period to the stats API call that serves it.
pub fn plan_request(period: Period, scope: StatsScope<'_>) -> Result<UpstreamRequest, UpstreamError> {
    let get = |path: &'static str| UpstreamRequest::Get {
        path,
        query: Vec::new(),
    };

    match scope {
        StatsScope::Team => Ok(match period {
            Period::Today => get("/get_all_daily_count"),
            Period::Yesterday => get("/get_all_yesterday_count"),
            Period::Week => get("/get_all_weekly_count"),
            Period::Month => get("/get_all_monthly_count"),
            Period::LastWeek => get("/get_all_last_week_count"),
            Period::LastMonth => get("/get_all_last_month_count"),
            Period::Custom(date) => UpstreamRequest::Get {
                path: "/get_all_day_count",
                query: vec![("date", date.format("%Y-%m-%d").to_string())],
            },
        }),
        StatsScope::Personal { username } => {
            let post = |path: &'static str| UpstreamRequest::Post {
                path,
                body: json!({ "username": username }),
            };

            match period {
                Period::Today => Ok(post("/get_bid_insight")),
                Period::Yesterday => Ok(post("/get_bid_insight_yesterday")),
                Period::Week => Ok(post("/get_bid_insight_weekly")),
                Period::Month => Ok(post("/get_bid_insight_monthly")),
                Period::Custom(date) => Ok(UpstreamRequest::Post {
                    path: "/get_bid_insight_custom",
                    body: json!({
                        "username": username,
                        "date": date.format("%Y-%m-%d").to_string(),
                    }),
                }),
                Period::LastWeek | Period::LastMonth => Err(UpstreamError::UnsupportedPeriod {
                    period: period.code(),
                }),
            }
        }
    }
}

/// Client for the external stats API that owns the raw counts.
#[derive(Debug, Clone)]
pub struct StatsClient {
    http: reqwest::Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_all_stats(&self, period: Period) -> Result<Vec<MetricRecord>, UpstreamError> {
        let request = plan_request(period, StatsScope::Team)?;
        self.send(request).await
    }

    pub async fn fetch_insight(
        &self,
        username: &str,
        period: Period,
    ) -> Result<InsightPayload, UpstreamError> {
        let request = plan_request(period, StatsScope::Personal { username })?;
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: UpstreamRequest) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, request.path());
        tracing::debug!(url = %url, "Calling stats API");

        let builder = match &request {
            UpstreamRequest::Get { query, .. } => self.http.get(&url).query(query),
            UpstreamRequest::Post { body, .. } => self.http.post(&url).json(body),
        };

        let response = builder.send().await.map_err(|error| {
            tracing::warn!(url = %url, "Stats API unreachable: {}", error);
            UpstreamError::Request(error)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url = %url, status = %status, "Stats API returned an error");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(UpstreamError::Decode)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use axum::{
        Json, Router,
        extract::Query,
        http::StatusCode,
        routing::{get, post},
    };
    use serde_json::{Value, json};

    /// In-process stand-in for the stats API. Returns its base URL.
    pub async fn spawn_stats_stub() -> String {
        let app = Router::new()
            .route(
                "/get_all_daily_count",
                get(|| async {
                    Json(json!([
                        { "username": "alice", "proposals": 5, "interviews": 1, "hire": 0,
                          "proposalsTime": "2024-01-01T10:00:00Z" },
                        { "username": "bob", "displayName": "Bob B.", "proposals": 5, "interviews": 2,
                          "hire": 1, "proposalsTime": "2024-01-01T09:00:00Z" },
                        { "username": "carol", "proposals": 3 }
                    ]))
                }),
            )
            .route(
                "/get_all_day_count",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    let date = params.get("date").cloned().unwrap_or_default();
                    Json(json!([{ "username": format!("on-{}", date), "proposals": 1 }]))
                }),
            )
            .route(
                "/get_all_weekly_count",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "stats store offline") }),
            )
            .route(
                "/get_all_monthly_count",
                get(|| async { "definitely not json" }),
            )
            .route(
                "/get_bid_insight",
                post(|| async {
                    Json(json!({
                        "myStats": { "proposals": 0, "interviews": 0, "hire": 0 },
                        "allStats": [{ "username": "zoe", "proposals": 4 }]
                    }))
                }),
            )
            .route(
                "/get_bid_insight_custom",
                post(|Json(body): Json<Value>| async move {
                    let username = body["username"].as_str().unwrap_or_default().to_string();
                    let date = body["date"].as_str().unwrap_or_default().to_string();
                    Json(json!({
                        "myStats": { "proposals": 2, "interviews": 1, "hire": 0 },
                        "allStats": [
                            { "username": "zoe", "proposals": 4 },
                            { "username": username, "proposals": 2, "interviews": 1,
                              "proposalsTime": format!("{}T08:00:00Z", date) }
                        ]
                    }))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }
}
