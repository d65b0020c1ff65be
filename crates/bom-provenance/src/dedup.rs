//! Recency context for the next generation request

use crate::{LogError, ProvenanceLog};
use std::collections::HashSet;
use tracing::debug;

/// Up to `limit` distinct queries from the log, most recent first
///
/// Scans from the newest record backwards and stops as soon as `limit`
/// distinct strings are collected. Within a batch the last query is the most
/// recent one. Corrupt records are skipped.
///
/// The result is advisory context for the generator; nothing is filtered
/// against it.
pub fn recent_queries(log: &ProvenanceLog, limit: usize) -> Result<Vec<String>, LogError> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let mut recent = Vec::new();

    for record in log.records_rev()? {
        let batch = match record {
            Ok(batch) => batch,
            Err(e) => {
                debug!("Skipping log record during recency scan: {}", e);
                continue;
            }
        };

        for query in batch.queries.into_iter().rev() {
            if seen.insert(query.clone()) {
                recent.push(query);
                if recent.len() >= limit {
                    return Ok(recent);
                }
            }
        }
    }

    Ok(recent)
}
