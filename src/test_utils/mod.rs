//! Test utilities for modinv
//!
//! Helpers shared by unit and integration tests:
//!
//! - [`init_test_logging`] - one-time tracing setup that plays well with the
//!   test harness
//! - [`InstrumentedQueryService`] - an in-memory query service that counts
//!   calls and simultaneous in-flight queries
//! - [`CountingLoader`] - a build list loader that counts how often it runs
//!
//! # Example
//!
//! ```rust,no_run
//! use modinv_cli::buildlist::{BuildList, BuildListAccessor};
//! use modinv_cli::module::ModuleVersion;
//! use modinv_cli::test_utils::CountingLoader;
//!
//! # async fn example() {
//! let list = BuildList::new(ModuleVersion::new("example.com/app", ""), vec![]).unwrap();
//! let loader = CountingLoader::new(list);
//! let accessor = BuildListAccessor::new(loader);
//! accessor.ensure_loaded().await.unwrap();
//! assert_eq!(accessor.loader().loads(), 1);
//! # }
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::buildlist::{BuildList, BuildListLoader};
use crate::core::ModinvError;
use crate::query::{IndexQueryService, QueryInfo, QueryService};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` if given, otherwise `RUST_LOG`; with neither, logging stays
/// off. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=modinv_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Query service wrapper that records how it is used.
///
/// Every call is delayed by a configurable amount so that concurrent callers
/// overlap, and the highest number of simultaneous calls is remembered.
#[derive(Debug)]
pub struct InstrumentedQueryService {
    inner: IndexQueryService,
    delay: Duration,
    failing: HashSet<String>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

/// Decrements the in-flight counter when a call finishes.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl InstrumentedQueryService {
    /// Wraps `inner` without delay.
    #[must_use]
    pub fn new(inner: IndexQueryService) -> Self {
        Self {
            inner,
            delay: Duration::ZERO,
            failing: HashSet::new(),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Delays every call by `delay`.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes every call for `path` fail with [`ModinvError::Other`].
    #[must_use]
    pub fn failing(mut self, path: impl Into<String>) -> Self {
        self.failing.insert(path.into());
        self
    }

    /// Highest number of calls observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Every call made so far, as `query path constraint` or `versions path`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    async fn enter(&self, call: String, path: &str) -> Result<(), ModinvError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.failing.contains(path) {
            return Err(ModinvError::Other {
                message: format!("injected failure for {path}"),
            });
        }
        Ok(())
    }
}

impl QueryService for InstrumentedQueryService {
    async fn query(&self, path: &str, constraint: &str) -> Result<QueryInfo, ModinvError> {
        self.enter(format!("query {path} {constraint}"), path).await?;
        self.inner.query(path, constraint).await
    }

    async fn versions(&self, path: &str) -> Result<Vec<String>, ModinvError> {
        self.enter(format!("versions {path}"), path).await?;
        self.inner.versions(path).await
    }
}

/// Build list loader that hands out a fixed build list and counts loads.
#[derive(Debug)]
pub struct CountingLoader {
    build_list: BuildList,
    loads: AtomicUsize,
}

impl CountingLoader {
    /// Creates a loader for `build_list`.
    #[must_use]
    pub const fn new(build_list: BuildList) -> Self {
        Self {
            build_list,
            loads: AtomicUsize::new(0),
        }
    }

    /// Number of times [`BuildListLoader::load`] ran.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl BuildListLoader for CountingLoader {
    async fn load(&self) -> Result<BuildList, ModinvError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.build_list.clone())
    }
}
