//! Friend command handlers.

use tabled::Tabled;

use favorcard_core::{Friend, FriendCandidate};

use crate::cli::{FriendsArgs, FriendsCommand, GlobalOpts};
use crate::config::AppContext;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct FriendRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&Friend> for FriendRow {
    fn from(f: &Friend) -> Self {
        Self {
            id: f.id.clone(),
            username: f.username.clone(),
            name: f.display_name.clone(),
            email: f.email.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl CandidateRow {
    fn from_candidate(c: &FriendCandidate, color: bool) -> Self {
        Self {
            id: c.user.id.clone(),
            username: c.user.username.clone(),
            name: c.user.display_name.clone(),
            state: output::paint_invite(c.state, color),
            updated: c.updated_at.map(util::format_local).unwrap_or_default(),
        }
    }
}

fn print_friends(list: &[Friend], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output,
        list,
        |f| FriendRow::from(f),
        |f| f.username.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_candidates(list: &[FriendCandidate], global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        list,
        |c| CandidateRow::from_candidate(c, color),
        |c| c.user.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &AppContext, args: FriendsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let service = &ctx.service;

    match args.command {
        FriendsCommand::List => {
            let friends = service.friends().await?;
            print_friends(&friends, global)
        }

        FriendsCommand::Search { query, all: true } => {
            let found = service.search_users(&query).await?;
            print_friends(&found, global)
        }

        FriendsCommand::Search { query, all: false } => {
            let found = service.search_friends(&query).await?;
            print_candidates(&found, global)
        }

        FriendsCommand::Invites { received } => {
            let list = if received {
                service.received_invites().await?
            } else {
                service.sent_invites().await?
            };
            print_candidates(&list, global)
        }

        FriendsCommand::Invite { user_id } => {
            let message = service.invite(&user_id).await?;
            output::notice(
                &message.unwrap_or_else(|| format!("✓ Invitation sent to user {user_id}")),
                global.quiet,
            );
            Ok(())
        }

        FriendsCommand::Accept { user_id } => {
            let message = service.accept(&user_id).await?;
            output::notice(
                &message.unwrap_or_else(|| format!("✓ Accepted invitation from user {user_id}")),
                global.quiet,
            );
            Ok(())
        }
    }
}
