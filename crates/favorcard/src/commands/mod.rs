//! Command dispatch: bridges CLI args -> `CardService` calls -> output formatting.

pub mod auth;
pub mod cards;
pub mod config_cmd;
pub mod friends;
pub mod stats;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::AppContext;
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    ctx: &mut AppContext,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login { username } => auth::login(ctx, username, global).await,
        Command::Register {
            username,
            email,
            nickname,
        } => auth::register(ctx, &username, &email, nickname.as_deref(), global).await,
        Command::Logout => auth::logout(ctx, global),
        Command::Whoami => auth::whoami(ctx, global).await,
        Command::Profile(args) => auth::profile(ctx, args, global).await,
        Command::Cards(args) => cards::handle(ctx, args, global).await,
        Command::Friends(args) => friends::handle(ctx, args, global).await,
        Command::Stats => stats::handle(ctx, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "local command routed to the server dispatcher".into(),
        }),
    }
}
