// src/reconcile.rs
// =============================================================================
// Merges a fresh crawl with the snapshot saved by an earlier run.
//
// The crawler only ever sees what is on the page today. Two fields build up
// across runs instead: who else depends on a package (`dependents`) and when
// we first checked it (`last_checked_on`). Those come from the snapshot;
// everything else, provenance included, comes from the fresh crawl.
// =============================================================================

use crate::model::Package;

/// Carries `dependents` and `last_checked_on` over from `known`.
///
/// The first known record with the same name wins. The output has the same
/// length and order as `fresh`.
pub fn reconcile(mut fresh: Vec<Package>, known: &[Package]) -> Vec<Package> {
    for package in fresh.iter_mut() {
        if let Some(previous) = known.iter().find(|k| k.name == package.name) {
            package.dependents = previous.dependents.clone();
            package.last_checked_on = previous.last_checked_on.clone();
        }
    }
    fresh
}
