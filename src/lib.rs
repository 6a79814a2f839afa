//! EDHREC combo lens for deck-building pages.
//!
//! Detects the card a deck page is previewing, looks up the combos EDHREC
//! knows for it, and injects a panel listing them next to the page's own UI.
//! Lookups are cached per card for an hour so flicking between cards does not
//! hammer the API.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::{Arc, Mutex};
//! use edhrec_combos::{ComboLens, PageTree};
//!
//! let lens = Arc::new(ComboLens::builder().build().unwrap());
//!
//! // One-off lookup
//! let combos = lens.fetch_combos("Dockside Extortionist");
//!
//! // Keep a page in sync with its card preview
//! let page = Arc::new(Mutex::new(PageTree::default()));
//! let watcher = lens.watch(page.clone());
//! watcher.notify(); // call from whatever observes the page's mutations
//! watcher.stop();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod client;
pub mod config;
pub mod dom;
pub mod error;
pub mod generation;
pub mod models;
pub mod normalize;
pub mod render;
pub mod resolver;
pub mod watcher;

#[cfg(feature = "async")]
pub use async_client::AsyncComboLens;
pub use cache::ExpiringCache;
pub use client::ComboClient;
pub use config::Selectors;
pub use dom::{Document, Element, PageTree, Selector};
pub use error::{ComboError, Result};
pub use generation::{RequestToken, RequestTokens};
pub use models::ComboRecord;
pub use normalize::normalize;
pub use render::PanelRenderer;
pub use resolver::{extract_hash, CardResolver};
pub use watcher::{WatchConfig, WatchHandle, WatchState};

use watcher::WatchStopper;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use log::debug;

// ---------------------------------------------------------------------------
// ComboLensBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`ComboLens`].
///
/// Use [`ComboLens::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](ComboLensBuilder::build).
pub struct ComboLensBuilder {
    base_url: String,
    site_origin: String,
    panel_id: String,
    selectors: Selectors,
    ttl: Duration,
    timeout: Duration,
    watch: WatchConfig,
}

impl Default for ComboLensBuilder {
    fn default() -> Self {
        Self {
            base_url: config::API_BASE.to_string(),
            site_origin: config::SITE_ORIGIN.to_string(),
            panel_id: config::PANEL_ID.to_string(),
            selectors: Selectors::default(),
            ttl: config::DEFAULT_TTL,
            timeout: config::DEFAULT_TIMEOUT,
            watch: WatchConfig::default(),
        }
    }
}

impl ComboLensBuilder {
    /// Base URL of the combo JSON pages. Defaults to [`config::API_BASE`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Origin prepended to combo links in the panel. Defaults to
    /// [`config::SITE_ORIGIN`].
    pub fn site_origin(mut self, origin: impl Into<String>) -> Self {
        self.site_origin = origin.into();
        self
    }

    pub fn panel_id(mut self, id: impl Into<String>) -> Self {
        self.panel_id = id.into();
        self
    }

    /// Host page selectors, for pages whose markup differs from the default.
    pub fn selectors(mut self, selectors: Selectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// How long a lookup result stays cached. Defaults to one hour.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Quiet period before a burst of mutations triggers a refresh.
    /// Defaults to 100 ms.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.watch.debounce = debounce;
        self
    }

    /// Delay between attempts to find the watched subtree. Defaults to 500 ms.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.watch.retry_delay = delay;
        self
    }

    /// Build the lens. Fails only if the HTTP client cannot be created or an
    /// argument is empty.
    pub fn build(self) -> Result<ComboLens> {
        if self.panel_id.trim().is_empty() {
            return Err(ComboError::InvalidArgument("panel id is empty".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(ComboError::InvalidArgument("base URL is empty".into()));
        }
        let client = ComboClient::new(self.base_url, self.ttl, self.timeout)?;
        let renderer = PanelRenderer::new(
            self.panel_id,
            self.selectors.render_anchor.clone(),
            self.site_origin,
        );
        Ok(ComboLens {
            client,
            renderer,
            resolver: CardResolver::new(self.selectors),
            tokens: RequestTokens::new(),
            watch: self.watch,
            active_watch: Mutex::new(None),
        })
    }
}

// ---------------------------------------------------------------------------
// RefreshOutcome
// ---------------------------------------------------------------------------

/// What one resolve, fetch and render cycle did to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A panel listing `combos` combos for `card_name` was attached.
    Shown { card_name: String, combos: usize },
    /// No card, or no combos for it; any previous panel was removed.
    Cleared,
    /// Combos were found but the anchor element is missing.
    NoAnchor,
    /// A newer cycle started while this one was fetching; the page was left
    /// alone.
    Superseded,
}

// ---------------------------------------------------------------------------
// ComboLens
// ---------------------------------------------------------------------------

/// The main entry point: resolver, fetcher and renderer wired together.
///
/// Created via [`ComboLens::builder()`]. All methods take `&self`, so a lens
/// wrapped in an [`Arc`] can serve a watcher and direct callers at once.
pub struct ComboLens {
    client: ComboClient,
    resolver: CardResolver,
    renderer: PanelRenderer,
    tokens: RequestTokens,
    watch: WatchConfig,
    active_watch: Mutex<Option<WatchStopper>>,
}

impl ComboLens {
    pub fn builder() -> ComboLensBuilder {
        ComboLensBuilder::default()
    }

    pub fn client(&self) -> &ComboClient {
        &self.client
    }

    pub fn resolver(&self) -> &CardResolver {
        &self.resolver
    }

    pub fn renderer(&self) -> &PanelRenderer {
        &self.renderer
    }

    /// Name of the card `page` is previewing.
    pub fn current_card_name<D: Document + ?Sized>(&self, page: &D) -> Option<String> {
        self.resolver.current_card_name(page)
    }

    /// Combos that include `card_name`, or `None`. See [`ComboClient::fetch_combos`].
    pub fn fetch_combos(&self, card_name: &str) -> Option<Vec<ComboRecord>> {
        self.client.fetch_combos(card_name)
    }

    /// Run one resolve, fetch and render cycle against `page`.
    ///
    /// The page lock is released while fetching. If another cycle starts in
    /// the meantime, this one does not render and reports
    /// [`RefreshOutcome::Superseded`].
    pub fn refresh<D: Document>(&self, page: &Mutex<D>) -> RefreshOutcome {
        let token = self.tokens.issue();
        let card_name = self.resolver.current_card_name(&*lock(page));
        let combos = card_name
            .as_deref()
            .and_then(|name| self.client.fetch_combos(name));

        let mut page = lock(page);
        if !self.tokens.is_latest(token) {
            debug!(
                "Discarding combos for {:?}; request {} was superseded",
                card_name,
                token.value()
            );
            return RefreshOutcome::Superseded;
        }

        let Some(card_name) = card_name else {
            self.renderer.clear(&mut *page);
            return RefreshOutcome::Cleared;
        };
        match combos {
            Some(combos) => {
                if self.renderer.render(&mut *page, &card_name, Some(combos.as_slice())) {
                    RefreshOutcome::Shown {
                        card_name,
                        combos: combos.len(),
                    }
                } else {
                    RefreshOutcome::NoAnchor
                }
            }
            None => {
                self.renderer.render(&mut *page, &card_name, None);
                RefreshOutcome::Cleared
            }
        }
    }

    /// Keep `page` in sync with its card preview.
    ///
    /// The returned handle owns the watcher. Feed it mutation notifications
    /// with [`WatchHandle::notify`]; each settled burst refreshes the page on
    /// a worker thread.
    ///
    /// A lens drives one watcher at a time: starting a new one stops the
    /// watcher previously started from this lens.
    pub fn watch<D>(self: &Arc<Self>, page: Arc<Mutex<D>>) -> WatchHandle
    where
        D: Document + Send + 'static,
    {
        let mut active = lock(&self.active_watch);
        if let Some(previous) = active.take() {
            debug!("Stopping previous watcher");
            previous.stop();
        }

        let root = self.resolver.selectors().watch_root.clone();
        let root_page = page.clone();
        let lens = self.clone();
        let handle = watcher::start(
            self.watch,
            move || lock(&root_page).contains(&root),
            move || {
                let lens = lens.clone();
                let page = page.clone();
                thread::spawn(move || {
                    let outcome = lens.refresh(&page);
                    debug!("Refresh finished: {:?}", outcome);
                });
            },
        );
        *active = Some(handle.stopper());
        handle
    }

    /// Stop the watcher most recently started from this lens, if any.
    /// Returns `true` if there was one to stop.
    pub fn stop_watching(&self) -> bool {
        match lock(&self.active_watch).take() {
            Some(active) => {
                active.stop();
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for ComboLens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ComboLens(base_url={}, panel_id={}, cached={})",
            self.client.base_url(),
            self.renderer.panel_id(),
            self.client.cached_entries()
        )
    }
}

pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
