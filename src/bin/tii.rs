//! Then Install It: find and install the Homebrew package behind a command
//! that was not found.
//!
//! Usage:
//!   tii fish
//!   tii --refresh-cache

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, error::ErrorKind};
use crossterm::style::Stylize;
use tii::{Action, Config, Session, ShellRunner, find_package, package_manager_present, refresh_cache};
use tracing_subscriber::EnvFilter;

const VERSION: &str = match option_env!("TII_VERSION_HINT") {
    Some(hint) => hint,
    None => env!("CARGO_PKG_VERSION"),
};

const ABOUT: &str = "Tii - Instantly install command when not found";

const LONG_ABOUT: &str = "\
Tii - Instantly install command when not found

Many GNU/Linux shells print a hint about which package provides a command that
was not found; macOS does not. Tii fills that gap for Homebrew: it searches
the formula and cask catalog for the name you typed, shows the closest
packages with their descriptions, and offers to install the one you pick.";

const AFTER_HELP: &str = "\
Examples:
   tii fish
   tii cowsay
   tii --help

Environment:
   TII_DISABLE_INTERACTIVE: when \"true\", never prompt and never install.
   TII_AUTO_INSTALL_EXACT_MATCHES: when \"true\", install exact matches
      without asking for confirmation.
   TII_CACHE_MAX_AGE_DAYS: rebuild the package cache once it is older than
      this many days. Unset keeps it until --refresh-cache.
   TII_LOG: log filter for diagnostics on stderr (default \"warn\").

Files:
   $XDG_DATA_HOME/tii/pkginfo.json: cached package names and descriptions.
      ~/.local/share is used when XDG_DATA_HOME is not set. Rebuild it with
      --refresh-cache.

Hooked into the shell's command-not-found handler, Tii runs automatically.
The name is an acronym for \"Then Install It\".";

#[derive(Parser, Debug)]
#[command(name = "tii", about = ABOUT, long_about = LONG_ABOUT)]
#[command(after_help = AFTER_HELP, disable_version_flag = true)]
struct Cli {
    /// Command or package name to look up.
    command: Option<String>,
    /// Rebuild the package cache from the remote catalog.
    #[arg(short = 'r', long = "refresh-cache")]
    refresh_cache: bool,
    /// Print version.
    #[arg(short = 'v', long = "version")]
    version: bool,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{} {err:#}", "Error:".red());
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TII_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp => {
                err.print().context("printing help")?;
                return Ok(());
            }
            _ => {
                let usage = tii::Error::Usage(usage_message(&err));
                Cli::command().print_help().context("printing help")?;
                println!();
                return Err(usage.into());
            }
        },
    };

    if cli.version {
        println!("Tii {VERSION}");
        return Ok(());
    }

    if cli.refresh_cache {
        let config = Config::from_env().context("reading configuration")?;
        let entries = refresh_cache(&config.cache_store(), &config.fetcher())?;
        tracing::info!(entries, "package cache rebuilt");
        println!("Cache refreshed!");
        return Ok(());
    }

    let Some(query) = cli.command else {
        Cli::command().print_long_help().context("printing help")?;
        println!();
        return Ok(());
    };

    let config = Config::from_env().context("reading configuration")?;
    let mut session = Session::stdio(config.flags(), ShellRunner::new(&config.shell));
    if !package_manager_present() {
        session.report("Homebrew is not installed. Install it to use Tii");
        session.run_action(&Action::InstallPackageManager);
        return Ok(());
    }
    if !config.interactive {
        session.say("Running Tii in non-interactive mode. ($TII_DISABLE_INTERACTIVE is true)");
    }

    find_package(&mut session, &config.cache_store(), &config.fetcher(), &query)?;
    Ok(())
}

/// First line of a clap error without its `error: ` prefix.
fn usage_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}
