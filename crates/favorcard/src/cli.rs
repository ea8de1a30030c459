//! Clap derive structures for the `favorcard` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// favorcard -- give, send and redeem favor cards from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "favorcard",
    version,
    about = "Create, send and redeem favor cards from the command line",
    long_about = "A command-line client for a favorcard server.\n\n\
        Cards with the same title, description and creator are shown as one\n\
        row with a count; the soonest-expiring card represents the group.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "FAVORCARD_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "FAVORCARD_SERVER", global = true)]
    pub server: Option<String>,

    /// Config file path
    #[arg(long, env = "FAVORCARD_CONFIG", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FAVORCARD_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FAVORCARD_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "FAVORCARD_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login {
        /// Username (defaults to the profile's last username, else prompts)
        username: Option<String>,
    },

    /// Create an account and log in as it
    Register {
        /// Username for the new account
        username: String,

        /// Email address
        #[arg(long, short = 'e')]
        email: String,

        /// Display name
        #[arg(long, short = 'n')]
        nickname: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show the logged-in account
    Whoami,

    /// View or change your profile
    Profile(ProfileArgs),

    /// Manage favor cards
    #[command(alias = "c")]
    Cards(CardsArgs),

    /// Manage friends and invitations
    #[command(alias = "f")]
    Friends(FriendsArgs),

    /// Card counters: created, received, used
    Stats,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show profile details
    Show,

    /// Change nickname and/or email
    Set {
        /// New display name
        #[arg(long, short = 'n')]
        nickname: Option<String>,

        /// New email address
        #[arg(long, short = 'e')]
        email: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CARDS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CardsArgs {
    #[command(subcommand)]
    pub command: CardsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CardsCommand {
    /// List your cards (grouped)
    #[command(alias = "ls")]
    List {
        /// Show cards you received instead of cards you created
        #[arg(long, short = 'r')]
        received: bool,

        /// One row per card instead of one row per group
        #[arg(long, short = 'x')]
        expand: bool,
    },

    /// Create a card
    Create {
        /// Card title
        title: String,

        /// What the card is good for
        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Expiry: RFC 3339, YYYY-MM-DD, or relative like 7d / 12h
        #[arg(long, short = 'e')]
        expires: Option<String>,
    },

    /// Create another card like an existing one
    Copy {
        /// Card ID to copy
        id: String,
    },

    /// Send a card to another user
    Send {
        /// Card ID
        id: String,

        /// Recipient username
        #[arg(long, short = 't')]
        to: String,
    },

    /// Redeem a card you received
    Use {
        /// Card ID
        id: String,
    },

    /// Delete a card you created and still own
    #[command(alias = "rm")]
    Delete {
        /// Card ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FRIENDS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FriendsArgs {
    #[command(subcommand)]
    pub command: FriendsCommand,
}

#[derive(Debug, Subcommand)]
pub enum FriendsCommand {
    /// List accepted friends
    #[command(alias = "ls")]
    List,

    /// Find users to befriend
    Search {
        /// Username or nickname fragment (at least 2 characters)
        query: String,

        /// Search every user, without invitation state
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// List pending invitations
    Invites {
        /// Show invitations sent to you instead of by you
        #[arg(long, short = 'r')]
        received: bool,
    },

    /// Invite a user
    Invite {
        /// User ID
        user_id: String,
    },

    /// Accept an invitation
    Accept {
        /// User ID of the inviter
        user_id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (tokens redacted)
    Show,

    /// Print the config file path
    Path,

    /// Set a profile value
    Set {
        /// Key: server, username, friends_path, insecure, timeout, ca_cert
        key: String,
        /// Value
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
