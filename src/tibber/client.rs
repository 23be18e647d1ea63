use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde_json::json;

use crate::config::TibberConfig;
use crate::error::{Result, TimerError};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use crate::poller::PriceSource;
use crate::tibber::types::{GraphQlResponse, choose_home};
use crate::timeline::PriceTimeline;

/// GraphQL query for the current marker plus today's and tomorrow's prices
pub const PRICE_INFO_QUERY: &str = r"
query PriceInfoQuery {
    viewer {
        homes {
            id
            currentSubscription {
                priceInfo {
                    current { total level startsAt }
                    today { total level startsAt }
                    tomorrow { total level startsAt }
                }
            }
        }
    }
}
";

/// Tibber API client
#[derive(Debug, Clone)]
pub struct TibberClient {
    access_token: String,
    home_id: Option<String>,
    endpoint: String,
    http: reqwest::Client,
    logger: StructuredLogger,
}

impl TibberClient {
    /// Create new Tibber client from configuration
    pub fn new(cfg: &TibberConfig) -> Result<Self> {
        if cfg.access_token.trim().is_empty() {
            return Err(TimerError::auth("No Tibber access token configured"));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;
        let home_id = Some(cfg.home_id.trim().to_string()).filter(|h| !h.is_empty());
        let logger = get_logger_with_context(
            LogContext::new("tibber").with_field("endpoint", cfg.endpoint.clone()),
        );
        Ok(Self {
            access_token: cfg.access_token.trim().to_string(),
            home_id,
            endpoint: cfg.endpoint.clone(),
            http,
            logger,
        })
    }

    pub fn home_id(&self) -> Option<&str> {
        self.home_id.as_deref()
    }

    /// POST the price query and return the raw response body
    async fn request(&self) -> Result<String> {
        let resp = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, concat!("tibber-timer/", env!("APP_VERSION")))
            .json(&json!({ "query": PRICE_INFO_QUERY, "variables": {} }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        Ok(resp.text().await?)
    }

    /// Decode a GraphQL response body into a price timeline
    pub fn decode(&self, body: &str) -> Result<PriceTimeline> {
        let (timeline, fell_back) = decode_price_timeline(body, self.home_id())?;
        if fell_back {
            self.logger.warn(&format!(
                "Home {} not found in Tibber account, using first home",
                self.home_id().unwrap_or_default()
            ));
        }
        Ok(timeline)
    }
}

#[async_trait]
impl PriceSource for TibberClient {
    async fn fetch_price_timeline(&self) -> Result<PriceTimeline> {
        let body = self.request().await?;
        let timeline = self.decode(&body)?;
        self.logger.debug(&format!(
            "Fetched prices: now={} today={} tomorrow={}",
            timeline.now(),
            timeline.today.len(),
            timeline.tomorrow.len()
        ));
        Ok(timeline)
    }
}

fn status_error(status: StatusCode, body: &str) -> TimerError {
    let snippet: String = body.chars().take(200).collect();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            TimerError::auth(format!("Tibber rejected access token ({status})"))
        }
        _ if snippet.is_empty() => TimerError::api(format!("Tibber API error: {status}")),
        _ => TimerError::api(format!("Tibber API error: {status}: {snippet}")),
    }
}

/// Decode a Tibber GraphQL response body.
///
/// Returns the timeline of the selected home and whether the configured
/// `home_id` was missing so the first home was used instead.
pub fn decode_price_timeline(body: &str, home_id: Option<&str>) -> Result<(PriceTimeline, bool)> {
    if body.trim().is_empty() {
        return Err(TimerError::api("No result from Tibber API"));
    }
    let response: GraphQlResponse = serde_json::from_str(body)?;

    if let Some(first) = response.errors.as_ref().and_then(|errs| errs.first()) {
        if first.is_unauthenticated() {
            return Err(TimerError::auth(first.message.clone()));
        }
        return Err(TimerError::api(format!(
            "Tibber API GraphQL error: {}",
            first.message
        )));
    }

    let homes = response
        .data
        .and_then(|d| d.viewer.homes)
        .unwrap_or_default();
    if homes.is_empty() {
        return Err(TimerError::api("No homes in Tibber account"));
    }

    let Some((home, fell_back)) = choose_home(homes, home_id) else {
        return Err(TimerError::api("No homes in Tibber account"));
    };
    let price_info = home
        .current_subscription
        .ok_or_else(|| TimerError::api("Home has no active Tibber subscription"))?
        .price_info
        .ok_or_else(|| TimerError::api("Subscription has no price information"))?;

    let timeline = PriceTimeline::try_from(price_info)?;
    Ok((timeline, fell_back))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_classify_auth() {
        let err = status_error(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, TimerError::Auth { .. }));
        let err = status_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(err, TimerError::Api { .. }));
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn client_requires_token() {
        let err = TibberClient::new(&TibberConfig::default()).unwrap_err();
        assert!(matches!(err, TimerError::Auth { .. }));
    }

    #[test]
    fn client_keeps_trimmed_home_id() {
        let cfg = TibberConfig {
            access_token: " token ".to_string(),
            home_id: "  ".to_string(),
            ..TibberConfig::default()
        };
        let client = TibberClient::new(&cfg).unwrap();
        assert!(client.home_id().is_none());
    }
}
