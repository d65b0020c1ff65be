//! Init command implementation.

use crate::context::AppContext;
use crate::error::Result;
use crate::output::Formatter;
use std::fs;

/// Execute the init command.
///
/// Safe to run repeatedly: an existing prompt file and log are left alone.
pub async fn execute_init(ctx: &AppContext, formatter: &Formatter) -> Result<()> {
    fs::create_dir_all(&ctx.paths.root)?;
    ctx.prompt_file().ensure_initialized()?;
    ctx.log().ensure_initialized()?;
    fs::create_dir_all(&ctx.paths.audio)?;

    println!(
        "{}",
        formatter.success(&format!("Initialized {}", ctx.paths.root.display()))
    );
    println!("  Prompt: {}", ctx.paths.prompt.display());
    println!("  Query log: {}", ctx.paths.log.display());
    println!("  Audio: {}", ctx.paths.audio.display());

    Ok(())
}
