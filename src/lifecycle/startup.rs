//! Startup reconciliation.
//!
//! Brings the live bindings in line with the route store before the HTTP
//! listener starts accepting traffic.

use crate::observability::metrics;
use crate::registry::{RouteBinder, RouteStore, StoreError};

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records that were registered.
    pub registered: usize,
    /// Records skipped for a missing field or a disallowed method.
    pub skipped: usize,
}

/// Register every complete stored record with the binder.
///
/// A record counts as complete when `path`, `method` and `response` are all
/// present; a stored `response` of `null`, `false` or `0` is still present.
/// Incomplete records and records with a disallowed method are skipped with
/// a warning. Only a failure to read the routes directory is returned.
pub async fn reconcile(
    store: &RouteStore,
    binder: &RouteBinder,
) -> Result<ReconcileReport, StoreError> {
    let records = store.list().await?;
    let mut report = ReconcileReport::default();

    for doc in records {
        if let Some(field) = doc.missing_field() {
            tracing::warn!(path = ?doc.path, missing = %field, "Skipping incomplete route record");
            metrics::record_skipped("incomplete");
            report.skipped += 1;
            continue;
        }

        let (Some(path), Some(method), Some(response)) = (doc.path, doc.method, doc.response) else {
            continue;
        };

        match binder.register(&path, &method, response) {
            Ok(_) => report.registered += 1,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Skipping route record");
                metrics::record_skipped("method");
                report.skipped += 1;
            }
        }
    }

    tracing::info!(
        dir = %store.dir().display(),
        registered = report.registered,
        skipped = report.skipped,
        bound_routes = binder.bound_count(),
        "Reconciled stored routes"
    );
    Ok(report)
}
