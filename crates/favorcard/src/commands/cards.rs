//! Card command handlers.

use chrono::Utc;
use tabled::Tabled;

use favorcard_core::{CardTile, NewCard, expanded_tiles, tiles};

use crate::cli::{CardsArgs, CardsCommand, GlobalOpts};
use crate::config::AppContext;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "From")]
    creator: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "#")]
    count: String,
    #[tabled(rename = "Expires")]
    expires: String,
    #[tabled(rename = "Left")]
    left: String,
    #[tabled(rename = "Actions")]
    actions: String,
}

impl CardRow {
    fn from_tile(t: &CardTile, color: bool) -> Self {
        Self {
            id: t.id.clone(),
            title: t.title.clone(),
            description: t.description.clone(),
            status: output::paint_status(&t.status, &t.status_label, color),
            creator: t.creator.clone(),
            owner: t.owner.clone(),
            count: if t.count > 1 {
                format!("×{}", t.count)
            } else {
                String::new()
            },
            expires: t.expires_at.map(util::format_local).unwrap_or_default(),
            left: t.remaining.map(|r| r.to_string()).unwrap_or_default(),
            actions: t.actions.to_string(),
        }
    }
}

fn print_tiles(tiles: &[CardTile], global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        tiles,
        |t| CardRow::from_tile(t, color),
        |t| t.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &AppContext, args: CardsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let service = &ctx.service;
    let now = Utc::now();

    match args.command {
        CardsCommand::List { received, expand } => {
            let records = if received {
                service.received_records().await?
            } else {
                service.created_records().await?
            };
            let viewer = service.viewer().await?;
            let rows = if expand {
                expanded_tiles(&records, &viewer, now)
            } else {
                tiles(&records, &viewer, now)
            };
            print_tiles(&rows, global)
        }

        CardsCommand::Create {
            title,
            description,
            expires,
        } => {
            let expires_at = expires
                .as_deref()
                .map(|e| util::parse_expiry(e, now))
                .transpose()?;
            let rows = service
                .create(
                    NewCard {
                        title,
                        description,
                        expires_at,
                    },
                    now,
                )
                .await?;
            output::notice("✓ Card created", global.quiet);
            print_tiles(&rows, global)
        }

        CardsCommand::Copy { id } => {
            let rows = service.copy(&id, now).await?;
            output::notice(&format!("✓ Card {id} copied"), global.quiet);
            print_tiles(&rows, global)
        }

        CardsCommand::Send { id, to } => {
            let rows = service.send(&id, &to, now).await?;
            output::notice(&format!("✓ Card {id} sent to {to}"), global.quiet);
            print_tiles(&rows, global)
        }

        CardsCommand::Use { id } => {
            if !util::confirm(
                &format!("Use card {id}? It cannot be used again."),
                "cards use",
                global.yes,
            )? {
                return Ok(());
            }
            let rows = service.use_card(&id, now).await?;
            output::notice(&format!("✓ Card {id} used"), global.quiet);
            print_tiles(&rows, global)
        }

        CardsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete card {id}? This cannot be undone."),
                "cards delete",
                global.yes,
            )? {
                return Ok(());
            }
            let rows = service.delete(&id, now).await?;
            output::notice(&format!("✓ Card {id} deleted"), global.quiet);
            print_tiles(&rows, global)
        }
    }
}
