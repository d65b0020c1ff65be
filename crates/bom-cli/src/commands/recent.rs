//! Recent command implementation.

use crate::cli::RecentArgs;
use crate::context::AppContext;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the recent command.
pub async fn execute_recent(
    args: RecentArgs,
    ctx: &AppContext,
    formatter: &Formatter,
) -> Result<()> {
    let limit = args.limit.unwrap_or(ctx.config.generator.recent_limit);
    let queries = ctx.log().recent_queries(limit)?;

    println!("{}", formatter.format_queries(&queries)?);
    Ok(())
}
