//! Async wrapper around [`ComboLens`] for use in async runtimes (Tokio, etc.).
//!
//! Lookups use a blocking HTTP client, so every call is moved onto Tokio's
//! blocking pool via [`tokio::task::spawn_blocking`], keeping the event loop
//! free.
//!
//! # Example
//!
//! ```no_run
//! use edhrec_combos::{AsyncComboLens, ComboLens};
//!
//! #[tokio::main]
//! async fn main() {
//!     let lens = AsyncComboLens::build(ComboLens::builder()).await.unwrap();
//!     let combos = lens.fetch_combos("Dockside Extortionist").await.unwrap();
//!     println!("{:?}", combos);
//! }
//! ```

use std::sync::{Arc, Mutex};

use crate::dom::Document;
use crate::error::{ComboError, Result};
use crate::models::ComboRecord;
use crate::{ComboLens, ComboLensBuilder, RefreshOutcome};

/// Async wrapper around [`ComboLens`].
///
/// Cheap to clone; clones share the lens and its cache.
#[derive(Clone)]
pub struct AsyncComboLens {
    inner: Arc<ComboLens>,
}

impl AsyncComboLens {
    /// Build the lens on the blocking pool. The blocking HTTP client must not
    /// be created on an async worker thread.
    pub async fn build(builder: ComboLensBuilder) -> Result<Self> {
        tokio::task::spawn_blocking(move || {
            let lens = builder.build()?;
            Ok(Self {
                inner: Arc::new(lens),
            })
        })
        .await
        .map_err(|e| ComboError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Run a sync lens operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ComboLens) -> T + Send + 'static,
        T: Send + 'static,
    {
        let lens = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&lens))
            .await
            .map_err(|e| ComboError::InvalidArgument(format!("Task join error: {e}")))
    }

    pub async fn fetch_combos(&self, card_name: &str) -> Result<Option<Vec<ComboRecord>>> {
        let card_name = card_name.to_string();
        self.run(move |lens| lens.fetch_combos(&card_name)).await
    }

    /// Run one refresh cycle against a shared page.
    pub async fn refresh<D>(&self, page: Arc<Mutex<D>>) -> Result<RefreshOutcome>
    where
        D: Document + Send + 'static,
    {
        self.run(move |lens| lens.refresh(&page)).await
    }

    /// The wrapped lens, e.g. to start a watcher.
    pub fn lens(&self) -> Arc<ComboLens> {
        self.inner.clone()
    }

    /// Release the lens on the blocking pool.
    ///
    /// Dropping the last reference on an async worker thread would drop the
    /// blocking HTTP client there, which Tokio forbids.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || drop(self.inner))
            .await
            .map_err(|e| ComboError::InvalidArgument(format!("Task join error: {e}")))
    }
}
