// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{RateKind, RateSet};
use crate::utils::{del_setting, get_setting, http_client, set_setting};

pub const CACHE_TTL_MINUTES: i64 = 5;
pub const DEFAULT_SOURCE_URL: &str = "https://ve.dolarapi.com/v1/dolares";

pub(crate) const CACHE_KEY: &str = "rates_cache";
const SOURCE_URL_KEY: &str = "rate_source_url";

// Approximation used only when the feed carries no euro quote.
fn euro_factor() -> Decimal {
    Decimal::new(1156, 3) // 1.156
}

/// A live fetch may come back partial; gaps are filled from cache,
/// derivation or defaults by the service.
#[derive(Debug, Clone, Default)]
pub struct LiveRates {
    pub bcv: Option<Decimal>,
    pub euro: Option<Decimal>,
    pub usdt: Option<Decimal>,
}

pub trait RateSource {
    fn fetch_live(&self) -> Result<LiveRates>;
}

#[derive(Debug, Deserialize)]
struct DolarQuote {
    fuente: String,
    promedio: f64,
}

/// DolarApi-style feed: an array of quotes keyed by `fuente`, VES per USD.
/// `oficial` is the BCV rate and `paralelo` the informal/crypto-referenced
/// one; a `euro` entry is used when the mirror provides it.
pub struct HttpRateSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpRateSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(HttpRateSource {
            client: http_client(std::time::Duration::from_secs(8))?,
            url: url.into(),
        })
    }

    pub fn from_settings(conn: &Connection) -> Result<Self> {
        let url = get_setting(conn, SOURCE_URL_KEY)?.unwrap_or_else(|| DEFAULT_SOURCE_URL.into());
        Self::new(url)
    }
}

impl RateSource for HttpRateSource {
    fn fetch_live(&self) -> Result<LiveRates> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("fetch rates from {}", self.url))?;
        let quotes: Vec<DolarQuote> = resp.json().context("decode rate feed")?;
        let mut live = LiveRates::default();
        for q in quotes {
            let value = Decimal::try_from(q.promedio).ok().filter(|v| *v > Decimal::ZERO);
            match q.fuente.to_lowercase().as_str() {
                "oficial" | "bcv" => live.bcv = value,
                "paralelo" | "usdt" => live.usdt = value,
                "euro" => live.euro = value,
                _ => {}
            }
        }
        Ok(live)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedRates {
    bcv: Decimal,
    euro: Decimal,
    usdt: Decimal,
    fetched_at: DateTime<Utc>,
}

/// Named-rate provider with a persisted cache window.
///
/// The snapshot lives in the settings table so the 5-minute window spans
/// CLI invocations. Instances are independent: construct one per caller,
/// inject a fake source in tests.
pub struct RateService<S: RateSource> {
    source: S,
    ttl: Duration,
}

impl<S: RateSource> RateService<S> {
    pub fn new(source: S) -> Self {
        RateService {
            source,
            ttl: Duration::minutes(CACHE_TTL_MINUTES),
        }
    }

    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        RateService { source, ttl }
    }

    /// Current snapshot: fresh cache if younger than the window, else a
    /// live fetch with gap-filling, else last-known/defaults. This read
    /// path never hard-fails on network trouble.
    pub fn get_all(&self, conn: &Connection) -> Result<RateSet> {
        let cached = read_cache(conn)?;
        if let Some(c) = &cached {
            let age = Utc::now() - c.fetched_at;
            let set = RateSet {
                bcv: c.bcv,
                euro: c.euro,
                usdt: c.usdt,
            };
            if age < self.ttl && set.is_usable() {
                debug!(age_secs = age.num_seconds(), "rate cache hit");
                return Ok(set);
            }
        }
        match self.source.fetch_live() {
            Ok(live) => {
                let set = self.merge_and_store(conn, live, cached.as_ref())?;
                Ok(set)
            }
            Err(e) => {
                warn!("live rate fetch failed: {e:#}; using last-known rates");
                Ok(match cached {
                    Some(c) => RateSet {
                        bcv: c.bcv,
                        euro: c.euro,
                        usdt: c.usdt,
                    },
                    None => RateSet::defaults(),
                })
            }
        }
    }

    /// Force a live fetch regardless of the cache window. Unlike
    /// [`get_all`](Self::get_all) this propagates fetch errors: the caller
    /// asked for fresh data explicitly.
    pub fn refresh(&self, conn: &Connection) -> Result<RateSet> {
        let cached = read_cache(conn)?;
        let live = self.source.fetch_live()?;
        self.merge_and_store(conn, live, cached.as_ref())
    }

    pub fn invalidate(&self, conn: &Connection) -> Result<()> {
        del_setting(conn, CACHE_KEY)
    }

    /// Convenience accessor; an unspecified kind resolves to bcv.
    pub fn rate_value(&self, conn: &Connection, kind: Option<RateKind>) -> Result<Decimal> {
        let rates = self.get_all(conn)?;
        Ok(rates.value_of(kind.unwrap_or(RateKind::Bcv)))
    }

    fn merge_and_store(
        &self,
        conn: &Connection,
        live: LiveRates,
        cached: Option<&CachedRates>,
    ) -> Result<RateSet> {
        let defaults = RateSet::defaults();
        let bcv = live
            .bcv
            .or(cached.map(|c| c.bcv))
            .filter(|v| *v > Decimal::ZERO)
            .unwrap_or(defaults.bcv);
        let usdt = live
            .usdt
            .or(cached.map(|c| c.usdt))
            .filter(|v| *v > Decimal::ZERO)
            .unwrap_or(defaults.usdt);
        // Prefer a live euro quote; derive from the fresh bcv otherwise
        // rather than trusting a stale cached euro.
        let euro = live
            .euro
            .filter(|v| *v > Decimal::ZERO)
            .unwrap_or(bcv * euro_factor());
        let snapshot = CachedRates {
            bcv,
            euro,
            usdt,
            fetched_at: Utc::now(),
        };
        set_setting(conn, CACHE_KEY, &serde_json::to_string(&snapshot)?)?;
        Ok(RateSet { bcv, euro, usdt })
    }
}

fn read_cache(conn: &Connection) -> Result<Option<CachedRates>> {
    let raw = match get_setting(conn, CACHE_KEY)? {
        Some(v) => v,
        None => return Ok(None),
    };
    match serde_json::from_str::<CachedRates>(&raw) {
        Ok(c) => Ok(Some(c)),
        Err(e) => {
            warn!("discarding unreadable rate cache: {e}");
            Ok(None)
        }
    }
}

/// Service wired to the configured HTTP feed; what the CLI handlers use.
pub fn service_from_settings(conn: &Connection) -> Result<RateService<HttpRateSource>> {
    Ok(RateService::new(HttpRateSource::from_settings(conn)?))
}
