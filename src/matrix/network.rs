//! Network-derived matrix construction.
//!
//! Queries a routing service for the travel cost of every ordered station
//! pair, strictly sequentially with a fixed inter-request delay between
//! queries. Each completed row is appended to the
//! [`MatrixStore`] immediately, so an interrupted build resumes from the
//! rows already on disk.

use std::thread;
use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;

use super::store::MatrixStore;
use super::types::DistanceMatrix;
use crate::error::{Result, RouteError};
use crate::station::{Station, StationRegistry};

/// Which cost the routing service's answer contributes to the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// Travel distance in meters (the file's native unit).
    #[default]
    Distance,
    /// Travel duration in seconds.
    Duration,
}

impl Metric {
    fn of(&self, leg: &RouteLeg) -> f64 {
        match self {
            Metric::Distance => leg.distance_m,
            Metric::Duration => leg.duration_s,
        }
    }
}

/// One routed leg between two stations, in the service's native units.
#[derive(Debug, Clone, Copy)]
pub struct RouteLeg {
    pub distance_m: f64,
    pub duration_s: f64,
}

/// A source of routed legs. The production implementation is
/// [`OsrmClient`]; tests substitute a stub.
pub trait RoutingApi {
    fn leg(&self, from: &Station, to: &Station) -> Result<RouteLeg>;
}

/// Bounded retry with a fixed pause between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            pause: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
}

/// Blocking client for an OSRM-compatible `/route/v1` endpoint.
pub struct OsrmClient {
    base_url: String,
    profile: String,
    retry: RetryPolicy,
    http: reqwest::blocking::Client,
}

impl OsrmClient {
    /// `base_url` like `http://localhost:5000`; `profile` like `bicycle`.
    pub fn new(base_url: impl Into<String>, profile: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            profile: profile.into(),
            retry: RetryPolicy::default(),
            http,
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn route_url(&self, from: &Station, to: &Station) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=false",
            self.base_url, self.profile, from.lng, from.lat, to.lng, to.lat
        )
    }

    fn try_once(&self, url: &str) -> Result<RouteLeg> {
        let response = self.http.get(url).send()?.error_for_status()?;
        let body: OsrmResponse = response.json()?;
        let route = body.routes.first().ok_or_else(|| {
            RouteError::ExternalService {
                url: url.to_string(),
                attempts: 1,
            }
        })?;
        Ok(RouteLeg {
            distance_m: route.distance,
            duration_s: route.duration,
        })
    }
}

impl RoutingApi for OsrmClient {
    fn leg(&self, from: &Station, to: &Station) -> Result<RouteLeg> {
        let url = self.route_url(from, to);
        for attempt in 1..=self.retry.max_attempts {
            match self.try_once(&url) {
                Ok(leg) => return Ok(leg),
                Err(err) => {
                    warn!(
                        "routing request failed (attempt {attempt}/{}): {err}",
                        self.retry.max_attempts
                    );
                    if attempt < self.retry.max_attempts {
                        thread::sleep(self.retry.pause);
                    }
                }
            }
        }
        Err(RouteError::ExternalService {
            url,
            attempts: self.retry.max_attempts,
        })
    }
}

/// Builds a cost matrix from a [`RoutingApi`], persisting row-by-row.
///
/// A pair whose requests all fail is marked unavailable (empty cell in the
/// store) rather than aborting the build; the final [`MatrixStore::load`]
/// then reports the file as incomplete.
pub struct NetworkMatrixBuilder {
    metric: Metric,
    request_delay: Duration,
}

impl NetworkMatrixBuilder {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            // Matches the pacing the routing service was provisioned for.
            request_delay: Duration::from_millis(5),
        }
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Builds (or finishes) the matrix for `registry`, returning the
    /// loaded result in kilometers.
    pub fn build<A: RoutingApi>(
        &self,
        registry: &StationRegistry,
        api: &A,
        store: &MatrixStore,
    ) -> Result<DistanceMatrix> {
        let n = registry.len();
        let done = if store.exists() {
            store.load_rows(registry)?.len()
        } else {
            0
        };
        if done > 0 {
            info!(
                "resuming matrix build at row {done}/{n} from {}",
                store.path().display()
            );
        } else {
            info!("building {n}x{n} network matrix into {}", store.path().display());
        }

        let mut appender = store.appender(registry)?;
        for i in done..n {
            let from = registry.get(i).unwrap();
            let mut row = Vec::with_capacity(n);
            for j in 0..n {
                if i == j {
                    row.push(Some(0.0));
                    continue;
                }
                let to = registry.get(j).unwrap();
                match api.leg(from, to) {
                    Ok(leg) => row.push(Some(self.metric.of(&leg))),
                    Err(err) => {
                        warn!("marking entry ({i}, {j}) unavailable: {err}");
                        row.push(None);
                    }
                }
                thread::sleep(self.request_delay);
            }
            appender.append_row(from.id, &row)?;
        }
        drop(appender);

        store.load(registry)
    }
}
