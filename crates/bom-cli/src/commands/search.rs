//! Search command implementation.

use crate::cli::SearchArgs;
use crate::context::AppContext;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the search command.
pub async fn execute_search(
    args: SearchArgs,
    ctx: &AppContext,
    formatter: &Formatter,
) -> Result<()> {
    let search = ctx.search()?;
    let candidates = search
        .search(&args.query, ctx.candidate_limit(args.limit))
        .await?;

    println!("{}", formatter.format_candidates(&candidates)?);
    Ok(())
}
