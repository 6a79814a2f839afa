//! EDHREC combo lookups with a TTL cache in front of the network.
//!
//! Results are cached per raw card name, including the "no combos" answer, so
//! a card is fetched at most once per TTL window. Transient failures are not
//! cached and the next lookup retries.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::cache::ExpiringCache;
use crate::error::{ComboError, Result};
use crate::models::{ComboPage, ComboRecord};
use crate::normalize::normalize;

/// Cached lookup result. `None` means the card is known to have no combos.
type Cached = Option<Vec<ComboRecord>>;

/// Blocking client for the EDHREC combo JSON pages.
///
/// Safe to share between threads: the cache sits behind a mutex that is never
/// held across the network call.
pub struct ComboClient {
    base_url: String,
    http: Client,
    cache: Mutex<ExpiringCache<String, Cached>>,
}

impl ComboClient {
    /// Create a client for `base_url` (e.g. `https://json.edhrec.com/pages/combos`).
    pub fn new(base_url: impl Into<String>, ttl: Duration, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            cache: Mutex::new(ExpiringCache::new(ttl)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the combo page for `card_name`.
    pub fn combos_url(&self, card_name: &str) -> String {
        format!("{}/{}.json", self.base_url, normalize(card_name))
    }

    /// Look up the combos that include `card_name`.
    ///
    /// Returns `None` when the card has no combos or when the lookup failed.
    /// Failures are logged and left uncached; the other outcomes are cached
    /// under the raw name.
    pub fn fetch_combos(&self, card_name: &str) -> Option<Vec<ComboRecord>> {
        if let Some(cached) = self.cache().get(card_name) {
            debug!("Combo cache hit for {:?}", card_name);
            return cached;
        }

        match self.request(card_name) {
            Ok(combos) => {
                let value = if combos.is_empty() { None } else { Some(combos) };
                self.cache().set(card_name.to_string(), value.clone());
                value
            }
            Err(e) => {
                warn!("Combo lookup for {:?} failed: {}", card_name, e);
                None
            }
        }
    }

    /// Fetch and filter the combo page. A 403 means EDHREC has no page for
    /// the card, reported as an empty list.
    fn request(&self, card_name: &str) -> Result<Vec<ComboRecord>> {
        let slug = normalize(card_name);
        if slug.is_empty() {
            return Err(ComboError::InvalidArgument(format!(
                "card name {:?} has no usable characters",
                card_name
            )));
        }
        let url = format!("{}/{}.json", self.base_url, slug);
        debug!("Fetching {}", url);

        let resp = self.http.get(&url).send()?;
        let status = resp.status();
        if status == StatusCode::FORBIDDEN {
            debug!("No combo page for {:?}", card_name);
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(ComboError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.text()?;
        let page: ComboPage = serde_json::from_str(&body)?;
        Ok(page.into_combos_for(card_name, &slug))
    }

    /// Forget the cached result for `card_name`. Returns `true` if there was one.
    pub fn invalidate(&self, card_name: &str) -> bool {
        self.cache().remove(card_name)
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    /// Number of cached lookups, expired ones included until next read.
    pub fn cached_entries(&self) -> usize {
        self.cache().len()
    }

    fn cache(&self) -> MutexGuard<'_, ExpiringCache<String, Cached>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
