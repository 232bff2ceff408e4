//! `fleet-console` command-line front end.
//!
//! Each invocation mounts one section against the configured record store,
//! performs a single action through the same controllers the screens use, and
//! prints the resulting screen.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use fleet_console::domain::RecordId;
use fleet_console::outbound::http::RecordStoreClient;
use fleet_console::{ConsoleSettings, RecordServices, Section, Shell};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `fleet-console` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "fleet-console",
    about = "Manage buses, routes, schedules, timetables, and users in the record store",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the console's sections.
    Home,
    /// Show the records in a section.
    List {
        /// Section name or path, e.g. `buses` or `/routes`.
        section: Section,
    },
    /// Show fleet-wide record counts.
    Dashboard,
    /// Create a record from `--field name=value` inputs.
    Create {
        section: Section,
        /// Form input, e.g. `--field totalSeats=50` or `--field busId=7`.
        #[arg(long = "field", value_name = "name=value", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Edit a loaded record, changing only the given inputs.
    Update {
        section: Section,
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(long = "field", value_name = "name=value", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Delete a record. Without `--yes` the request is cancelled.
    Delete {
        section: Section,
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build console runtime")?;
    runtime.block_on(run(args))
}

#[expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "the CLI reports rendered screens on stdout and prompts on stderr"
)]
async fn run(args: CliArgs) -> Result<()> {
    let settings = ConsoleSettings::load_from_iter([OsString::from("fleet-console")])
        .map_err(|error| eyre!("failed to load console settings: {error}"))?;
    let client = RecordStoreClient::new(settings.base_url()?, settings.request_timeout()?)?;
    let mut shell = Shell::new(RecordServices::http(&client));

    match args.command {
        Command::Home => {
            println!("{}", shell.render());
            Ok(())
        }
        Command::List { section } => show(&mut shell, section).await,
        Command::Dashboard => show(&mut shell, Section::Admin).await,
        Command::Create { section, fields } => {
            open(&mut shell, section).await?;
            let screen = shell.screen_mut();
            screen.begin_create()?;
            for (name, value) in &fields {
                screen.update_field(name, value)?;
            }
            let outcome = screen.submit().await;
            println!("{}", shell.render());
            outcome.wrap_err("create failed")
        }
        Command::Update {
            section,
            id,
            fields,
        } => {
            open(&mut shell, section).await?;
            let screen = shell.screen_mut();
            screen.begin_edit(&id)?;
            for (name, value) in &fields {
                screen.update_field(name, value)?;
            }
            let outcome = screen.submit().await;
            println!("{}", shell.render());
            outcome.wrap_err("update failed")
        }
        Command::Delete { section, id, yes } => {
            open(&mut shell, section).await?;
            let screen = shell.screen_mut();
            screen.request_delete(id)?;
            if let Some(prompt) = screen.confirmation_prompt() {
                eprintln!("{prompt}");
            }
            if yes {
                let outcome = screen.confirm_delete().await;
                println!("{}", shell.render());
                outcome.wrap_err("delete failed")
            } else {
                screen.cancel_delete()?;
                eprintln!("Delete cancelled; pass --yes to confirm.");
                Ok(())
            }
        }
    }
}

#[expect(clippy::print_stdout, reason = "rendered screens are the CLI output")]
async fn show(shell: &mut Shell, section: Section) -> Result<()> {
    let loaded = shell.navigate(section).await;
    println!("{}", shell.render());
    loaded.wrap_err_with(|| format!("failed to load {section}"))
}

async fn open(shell: &mut Shell, section: Section) -> Result<()> {
    shell
        .navigate(section)
        .await
        .wrap_err_with(|| format!("failed to load {section}"))
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (raw_name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    let name = raw_name.trim();
    if name.is_empty() {
        return Err("field name must not be empty".to_owned());
    }
    Ok((name.to_owned(), value.to_owned()))
}

fn parse_record_id(raw: &str) -> Result<RecordId, String> {
    RecordId::new(raw).map_err(|error| error.to_string())
}
