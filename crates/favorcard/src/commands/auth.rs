//! Account command handlers: login, register, logout, profile.

use dialoguer::Input;

use favorcard_core::{ProfileUpdate, UserProfile};

use crate::cli::{GlobalOpts, ProfileArgs, ProfileCommand};
use crate::config::AppContext;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Detail view ─────────────────────────────────────────────────────

fn detail(p: &UserProfile) -> String {
    [
        format!("ID:        {}", p.id),
        format!("Username:  {}", p.username),
        format!("Name:      {}", p.display_name),
        format!("Email:     {}", p.email.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

fn print_profile(p: &UserProfile, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, p, detail, |p| p.username.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn login(
    ctx: &mut AppContext,
    username: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = match username.or_else(|| ctx.profile.username.clone()) {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password = util::read_password("Password: ")?;

    let profile = ctx.service.login(&username, &password).await?;
    ctx.remember_username(global, &username)?;

    output::notice(
        &format!("✓ Logged in as {} on profile '{}'", profile.display_name, ctx.profile_name),
        global.quiet,
    );
    Ok(())
}

pub async fn register(
    ctx: &mut AppContext,
    username: &str,
    email: &str,
    nickname: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = util::read_password("Choose a password: ")?;

    let profile = ctx
        .service
        .register(username, email, nickname, &password)
        .await?;
    ctx.remember_username(global, username)?;

    output::notice(
        &format!("✓ Account '{}' created and logged in", profile.username),
        global.quiet,
    );
    Ok(())
}

pub fn logout(ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.service.logout()?;
    output::notice(
        &format!("✓ Logged out of profile '{}'", ctx.profile_name),
        global.quiet,
    );
    Ok(())
}

pub async fn whoami(ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    let profile = ctx.service.profile().await?;
    print_profile(&profile, global)
}

pub async fn profile(ctx: &AppContext, args: ProfileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ProfileCommand::Show => whoami(ctx, global).await,

        ProfileCommand::Set { nickname, email } => {
            if nickname.is_none() && email.is_none() {
                return Err(CliError::Validation {
                    field: "profile".into(),
                    reason: "pass --nickname and/or --email".into(),
                });
            }
            let updated = ctx
                .service
                .update_profile(ProfileUpdate { nickname, email })
                .await?;
            output::notice("✓ Profile updated", global.quiet);
            print_profile(&updated, global)
        }
    }
}
