//! Generate command implementation.

use crate::cli::GenerateArgs;
use crate::context::AppContext;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the generate command.
pub async fn execute_generate(
    args: GenerateArgs,
    ctx: &AppContext,
    formatter: &Formatter,
) -> Result<()> {
    let mut ctx = ctx.clone();
    if let Some(limit) = args.recent_limit {
        ctx.config.generator.recent_limit = limit;
    }

    let generator = ctx.generator()?;
    let model = ctx.model(args.model.as_deref());
    let generation = generator.generate(&model, !args.no_previous).await?;

    if generation.strategy.is_degraded() {
        eprintln!(
            "{}",
            formatter.warning("Provider output was not a list; queries were split on commas")
        );
    }
    println!("{}", formatter.format_batch(&generation.batch)?);

    Ok(())
}
