mod cmd;
mod connect;
mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmd::{badges::BadgesSubcommand, social::ChatSubcommand, social::FriendsSubcommand};
use connect::ConnectFlags;
use draftpilot_core::config::AppConfig;
use draftpilot_core::Gateway;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "draftpilot",
    about = "Champion select autopilot and game client utilities",
    version,
    propagate_version = true
)]
struct Cli {
    /// YAML config file
    #[arg(long, global = true, env = "DRAFTPILOT_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the client's lockfile (default: platform install location)
    #[arg(long, global = true)]
    lockfile: Option<PathBuf>,

    /// Client API port (use with --password instead of a lockfile)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Client API password
    #[arg(long, global = true)]
    password: Option<String>,

    /// Full base URL of the client API
    #[arg(long, global = true, env = "DRAFTPILOT_BASE_URL", hide = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pick/ban autopilot; reads control commands from stdin
    Watch,

    /// List champions, or look one up
    Champions {
        /// Resolve a name the way the autopilot would
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Show at most this many
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show riot id, region, level and rank
    Summoner,

    /// Change the profile icon
    Icon { id: u32 },

    /// Change the profile background to a skin's splash art
    Background { skin_id: u32 },

    /// Change the chat status message (\n for line breaks)
    StatusMessage { text: String },

    /// Change riot id (name up to 16 characters, tag up to 5)
    RiotId { name: String, tag: String },

    /// Manage the friends list
    Friends {
        #[command(subcommand)]
        subcommand: FriendsSubcommand,
    },

    /// Chat connectivity
    Chat {
        #[command(subcommand)]
        subcommand: ChatSubcommand,
    },

    /// Open a porofessor lookup of your champion select teammates
    Reveal {
        /// Print the URL without opening a browser
        #[arg(long)]
        no_open: bool,
    },

    /// Leave the current champion select
    Dodge,

    /// Restart the client UI
    RestartUx,

    /// Edit profile badges
    Badges {
        #[command(subcommand)]
        subcommand: BadgesSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Watch => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load_or_default(cli.config.as_deref()).with_context(|| {
        let path = cli.config.as_deref().map(|p| p.display().to_string());
        format!("failed to load config {}", path.unwrap_or_default())
    })?;

    let flags = ConnectFlags {
        base_url: cli.base_url,
        port: cli.port,
        password: cli.password,
        lockfile: cli.lockfile,
        timeout_secs: cli.timeout,
    };
    let gateway: Arc<dyn Gateway> = Arc::new(connect::gateway(&flags, &config.connection)?);
    let gw = gateway.as_ref();
    let json = cli.json;

    match cli.command {
        Commands::Watch => cmd::watch::run(gateway.clone(), &config, json),
        Commands::Champions { search, limit } => {
            cmd::champions::run(gateway.clone(), search.as_deref(), limit, json)
        }
        Commands::Summoner => cmd::summoner::run(gw, json),
        Commands::Icon { id } => cmd::profile::icon(gw, id, json),
        Commands::Background { skin_id } => cmd::profile::background(gw, skin_id, json),
        Commands::StatusMessage { text } => cmd::profile::status_message(gw, &text, json),
        Commands::RiotId { name, tag } => cmd::profile::riot_id(gw, &name, &tag, json),
        Commands::Friends { subcommand } => cmd::social::friends(gw, subcommand, json),
        Commands::Chat { subcommand } => cmd::social::chat(gw, subcommand, json),
        Commands::Reveal { no_open } => cmd::lobby::reveal(gw, no_open, json),
        Commands::Dodge => cmd::lobby::dodge(gw, json),
        Commands::RestartUx => cmd::lobby::restart_ux(gw, json),
        Commands::Badges { subcommand } => cmd::badges::run(gw, subcommand, json),
    }
}
