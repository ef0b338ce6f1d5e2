//! Module listing: selector resolution followed by optional enrichment.
//!
//! Listing runs in two phases:
//!
//! 1. [`resolve`] turns the argument list into an ordered, deduplicated list
//!    of descriptors. This phase is sequential because selector order decides
//!    which argument claims a build list entry.
//! 2. [`enrich`] attaches `update` and `versions` with bounded concurrency.
//!    Descriptor order is fixed before this phase starts.
//!
//! [`list_modules`] runs both.

pub mod enrich;
pub mod resolver;
pub mod selector;

pub use enrich::{EnrichOptions, enrich};
pub use resolver::{Resolution, resolve};
pub use selector::Selector;

use crate::buildlist::{BuildListAccessor, BuildListLoader};
use crate::core::ModinvError;
use crate::query::QueryService;

/// Options for [`list_modules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Enrichment to perform
    pub enrich: EnrichOptions,
    /// Maximum number of modules enriched at once
    pub max_parallel: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            enrich: EnrichOptions::default(),
            max_parallel: crate::constants::DEFAULT_ENRICH_PARALLELISM,
        }
    }
}

/// Resolves `args` and enriches the result.
///
/// # Errors
///
/// Propagates fatal errors from [`resolve`]; enrichment never fails.
pub async fn list_modules<L, Q>(
    args: &[String],
    build_list: &BuildListAccessor<L>,
    query: &Q,
    options: ListOptions,
) -> Result<Resolution, ModinvError>
where
    L: BuildListLoader,
    Q: QueryService,
{
    let mut resolution = resolve(args, build_list, query, options.enrich.versions).await?;
    enrich(&mut resolution.modules, query, options.enrich, options.max_parallel).await;
    Ok(resolution)
}
