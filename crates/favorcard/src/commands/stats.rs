//! Dashboard counters.

use favorcard_core::CardStats;

use crate::cli::GlobalOpts;
use crate::config::AppContext;
use crate::error::CliError;
use crate::output;

fn detail(s: &CardStats) -> String {
    format!(
        "Created:   {}\nReceived:  {}\nUsed:      {}",
        s.created, s.received, s.used
    )
}

pub async fn handle(ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    let stats = ctx.service.stats().await?;
    let out = output::render_single(&global.output, &stats, detail, |s| {
        format!("{} {} {}", s.created, s.received, s.used)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
