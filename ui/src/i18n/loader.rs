//! Namespace loader: cache lookup, in-flight de-duplication and
//! retry-with-backoff fetching.
//!
//! Internally every load produces a `Result<Dictionary, LoadError>` so
//! failures stay visible to logging and stats. The public [`Loader::load`]
//! converts that into an infallible future: on total failure it resolves
//! to an empty dictionary, which the translator treats like a missing
//! namespace.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use rand::Rng;
use serde::Deserialize;

use super::cache::{CacheKey, SharedCache};
use super::dictionary::Dictionary;
use super::error::LoadError;
use super::fetch::{Endpoint, Fetch};
use super::stats::SharedStats;
use crate::core::timing::{self, Stopwatch};

type SharedLoad = Shared<LocalBoxFuture<'static, Rc<Dictionary>>>;

/// Exponential backoff with jitter.
///
/// The wait after failed attempt `n` (zero-based) is
/// `base^n * unit_ms + U[0, max_jitter_ms]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base: f64,
    pub unit_ms: u64,
    pub max_jitter_ms: u64,
}

impl RetryPolicy {
    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base: 1.0,
            unit_ms: 0,
            max_jitter_ms: 0,
        }
    }

    /// Deterministic part of the delay after failed attempt `attempt`.
    pub fn base_delay_ms(&self, attempt: u32) -> u64 {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let scaled = self.base.powi(exponent) * self.unit_ms as f64;
        if scaled.is_finite() && scaled < u64::MAX as f64 {
            scaled.round() as u64
        } else {
            u64::MAX
        }
    }

    pub fn delay_with<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> u64 {
        let jitter = if self.max_jitter_ms == 0 {
            0
        } else {
            rng.gen_range(0..=self.max_jitter_ms)
        };
        self.base_delay_ms(attempt).saturating_add(jitter)
    }

    pub fn delay_ms(&self, attempt: u32) -> u64 {
        self.delay_with(attempt, &mut rand::thread_rng())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base: 2.0,
            unit_ms: 500,
            max_jitter_ms: 250,
        }
    }
}

pub struct Loader {
    cache: SharedCache,
    fetcher: Rc<dyn Fetch>,
    endpoint: Endpoint,
    policy: RetryPolicy,
    stats: SharedStats,
    in_flight: RefCell<HashMap<CacheKey, SharedLoad>>,
}

impl Loader {
    pub fn new(
        cache: SharedCache,
        fetcher: Rc<dyn Fetch>,
        endpoint: Endpoint,
        policy: RetryPolicy,
        stats: SharedStats,
    ) -> Self {
        Self {
            cache,
            fetcher,
            endpoint,
            policy,
            stats,
            in_flight: RefCell::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn stats(&self) -> &SharedStats {
        &self.stats
    }

    /// Whether a fetch for this key is currently outstanding.
    pub fn is_loading(&self, language: &str, namespace: &str) -> bool {
        self.in_flight
            .borrow()
            .contains_key(&CacheKey::new(language, namespace))
    }

    /// Load a namespace for a language. Never fails: resolves to an empty
    /// dictionary once every attempt has failed.
    pub fn load(self: &Rc<Self>, language: &str, namespace: &str) -> LocalBoxFuture<'static, Rc<Dictionary>> {
        let cached = self.cache.borrow_mut().get(language, namespace);
        if let Some(dictionary) = cached {
            self.stats.borrow_mut().cache_hits += 1;
            return future::ready(dictionary).boxed_local();
        }

        let key = CacheKey::new(language, namespace);
        let pending = self.in_flight.borrow().get(&key).cloned();
        if let Some(pending) = pending {
            self.stats.borrow_mut().deduplicated += 1;
            return pending.boxed_local();
        }

        self.stats.borrow_mut().cache_misses += 1;
        let this = Rc::clone(self);
        let load_key = key.clone();
        let shared = async move {
            let outcome = this.try_load(&load_key).await;
            this.in_flight.borrow_mut().remove(&load_key);
            match outcome {
                Ok(dictionary) => dictionary,
                Err(err) => {
                    this.stats.borrow_mut().failures += 1;
                    tracing::error!(
                        key = %load_key,
                        attempts = this.policy.max_attempts,
                        %err,
                        "giving up on namespace; serving empty dictionary"
                    );
                    Rc::new(Dictionary::default())
                }
            }
        }
        .boxed_local()
        .shared();

        self.in_flight.borrow_mut().insert(key, shared.clone());
        shared.boxed_local()
    }

    async fn try_load(&self, key: &CacheKey) -> Result<Rc<Dictionary>, LoadError> {
        let url = self.endpoint.url(&key.language, &key.namespace);
        let stopwatch = Stopwatch::start();
        let attempts = self.policy.max_attempts.max(1);
        let mut last_error = LoadError::Transport("no attempt made".to_string());

        for attempt in 0..attempts {
            self.stats.borrow_mut().network_requests += 1;
            let outcome = match self.fetcher.fetch(&url).await {
                Ok(body) => Dictionary::from_json_str(&body),
                Err(err) => Err(err),
            };

            match outcome {
                Ok(dictionary) => {
                    let elapsed = stopwatch.elapsed_ms();
                    let stored = self
                        .cache
                        .borrow_mut()
                        .set(&key.language, &key.namespace, &dictionary);
                    self.stats.borrow_mut().record_load_time(key, elapsed);
                    tracing::debug!(key = %key, attempt = attempt + 1, elapsed_ms = elapsed, "namespace loaded");
                    return Ok(stored);
                }
                Err(err) => {
                    tracing::warn!(key = %key, attempt = attempt + 1, %err, "namespace load attempt failed");
                    last_error = err;
                    if attempt + 1 < attempts {
                        timing::sleep_ms(self.policy.delay_ms(attempt)).await;
                    }
                }
            }
        }

        Err(last_error)
    }
}
