//! History command implementation.

use crate::cli::HistoryArgs;
use crate::context::AppContext;
use crate::error::Result;
use crate::output::Formatter;
use bom_domain::QueryBatch;
use bom_provenance::ProvenanceLog;

/// Execute the history command.
pub async fn execute_history(
    args: HistoryArgs,
    ctx: &AppContext,
    formatter: &Formatter,
) -> Result<()> {
    let batches = load_history(&ctx.log(), args.limit)?;
    println!("{}", formatter.format_batches(&batches)?);
    Ok(())
}

/// Logged batches in chronological order, optionally only the last `limit`.
pub fn load_history(log: &ProvenanceLog, limit: Option<usize>) -> Result<Vec<QueryBatch>> {
    let mut batches: Vec<QueryBatch> = match limit {
        Some(limit) => log
            .records_rev()?
            .filter_map(|record| record.ok())
            .take(limit)
            .collect(),
        None => return Ok(log.read_all()?.collect()),
    };
    batches.reverse();
    Ok(batches)
}
