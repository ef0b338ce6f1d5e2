//! Concurrent enrichment of module descriptors.
//!
//! Every descriptor, and every replacement target nested in one, contributes
//! an [`EnrichSlot`]. Slots sharing a module identity are grouped so that each
//! identity is queried once, then the groups run through a bounded
//! `buffer_unordered` pool. Each group exclusively borrows the fields it
//! writes, so workers share nothing mutable and no locking is involved.
//!
//! Failures only degrade the affected descriptors: they are logged at debug
//! level and the corresponding field stays empty.

use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, trace};

use crate::constants::LATEST_QUERY;
use crate::modinfo::{EnrichSlot, ModulePublicInfo};
use crate::module::ModuleVersion;
use crate::query::QueryService;
use crate::version::{self, VersionComparator};

/// Which enrichment fields to compute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichOptions {
    /// Attach `update` when a newer version exists
    pub update: bool,
    /// Attach the known `versions` list
    pub versions: bool,
}

impl EnrichOptions {
    /// Whether no enrichment was requested.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.update && !self.versions
    }
}

/// Enriches `modules` in place with at most `limit` identities in flight.
///
/// Returns once every submitted item has completed. The order of `modules`
/// is untouched. A `limit` of 0 is treated as 1.
pub async fn enrich<Q: QueryService>(
    modules: &mut [ModulePublicInfo],
    query: &Q,
    options: EnrichOptions,
    limit: usize,
) {
    if options.is_empty() {
        return;
    }
    let limit = limit.max(1);

    let groups = group_by_identity(modules);
    debug!("Enriching {} distinct modules with up to {} in flight", groups.len(), limit);

    stream::iter(groups)
        .map(|slots| enrich_group(slots, query, options))
        .buffer_unordered(limit)
        .collect::<Vec<()>>()
        .await;
}

/// Collects slots in discovery order, one group per distinct identity.
///
/// Unresolved slots never share a group with resolved ones.
fn group_by_identity(modules: &mut [ModulePublicInfo]) -> Vec<Vec<EnrichSlot<'_>>> {
    let mut groups: Vec<Vec<EnrichSlot<'_>>> = Vec::new();
    let mut positions: HashMap<(ModuleVersion, bool), usize> = HashMap::new();

    for info in modules.iter_mut() {
        for slot in info.enrich_slots() {
            match positions.entry((slot.identity(), slot.is_resolved())) {
                Entry::Occupied(position) => groups[*position.get()].push(slot),
                Entry::Vacant(position) => {
                    position.insert(groups.len());
                    groups.push(vec![slot]);
                }
            }
        }
    }
    groups
}

async fn enrich_group<Q: QueryService>(
    mut slots: Vec<EnrichSlot<'_>>,
    query: &Q,
    options: EnrichOptions,
) {
    let Some(first) = slots.first() else {
        return;
    };
    let (path, current, resolved) = (first.path, first.version, first.is_resolved());

    if options.update && resolved && !current.is_empty() {
        match query.query(path, LATEST_QUERY).await {
            Ok(latest) if VersionComparator::is_newer(&latest.version, current) => {
                trace!("'{}' can be updated from {} to {}", path, current, latest.version);
                for slot in &mut slots {
                    slot.set_update(&latest.version);
                }
            }
            Ok(_) => trace!("'{}' is up to date at {}", path, current),
            Err(e) => debug!("Update check for '{}@{}' failed: {}", path, current, e),
        }
    }

    if options.versions {
        match query.versions(path).await {
            Ok(mut versions) => {
                version::sort_versions(&mut versions);
                for slot in &mut slots {
                    slot.set_versions(versions.clone());
                }
            }
            Err(e) => debug!("Listing versions of '{}' failed: {}", path, e),
        }
    }
}
