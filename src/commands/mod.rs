use std::io::{self, Write};

use crate::batch::{BatchReport, Mode};
use crate::cli::{
    AliasCommand, Cli, Command, DeleteArgs, JobsCommand, MailboxCommand, OutputFormat,
    TransportCommand,
};
use crate::client::{MailcowApi, MailcowClient};
use crate::config::Settings;
use crate::error::Error;
use crate::output;
use crate::resource::ResourceKind;
use crate::row::Row;

mod alias;
mod jobs;
mod mailbox;
mod transport;

/// Routes the parsed CLI to its command and returns the process exit code.
/// Fatal errors propagate; per-row failures are reflected in the code only.
pub async fn dispatch(cli: &Cli) -> Result<i32, Error> {
    let settings = Settings::from_cli(cli)?;

    match &cli.command {
        Command::Mailbox { command } => match command {
            MailboxCommand::Get(args) => mailbox::get(&settings, args).await,
            MailboxCommand::Add(args) => mailbox::add(&settings, args).await,
            MailboxCommand::Update(args) => mailbox::update(&settings, args).await,
            MailboxCommand::Delete(args) => delete(&settings, ResourceKind::Mailbox, args).await,
        },
        Command::Alias { command } => match command {
            AliasCommand::Get(args) => alias::get(&settings, args).await,
            AliasCommand::Add(args) => alias::add(&settings, args).await,
            AliasCommand::Update(args) => alias::update(&settings, args).await,
            AliasCommand::Delete(args) => delete(&settings, ResourceKind::Alias, args).await,
        },
        Command::Jobs { command } => match command {
            JobsCommand::Get(args) => jobs::get(&settings, args).await,
            JobsCommand::Add(args) => jobs::add(&settings, args).await,
            JobsCommand::Update(args) => jobs::update(&settings, args).await,
            JobsCommand::Delete(args) => delete(&settings, ResourceKind::SyncJob, args).await,
        },
        Command::Transport { command } => match command {
            TransportCommand::Get(args) => transport::get(&settings, args).await,
            TransportCommand::Add(args) => transport::add(&settings, args).await,
            TransportCommand::Update(args) => transport::update(&settings, args).await,
            TransportCommand::Delete(args) => {
                delete(&settings, ResourceKind::TransportMap, args).await
            }
        },
    }
}

/// "1"/"0", as the API expects for boolean fields.
pub(crate) fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Prints the batch report (plus a summary line in table mode) and maps the
/// row outcomes to the exit code: any invalid or failed row in create mode
/// makes the whole run non-zero.
pub(crate) fn finish_batch(
    report: &BatchReport,
    kind: ResourceKind,
    mode: Mode,
    format: OutputFormat,
) -> i32 {
    println!("{}", output::render_report(report, kind, format));

    if format == OutputFormat::Table {
        match mode {
            Mode::Preview => println!("\nTotal: {} {}(s) to create", report.len(), kind.label()),
            Mode::Create => println!(
                "\nCompleted: {} created, {} failed",
                report.created_count(),
                report.failed_count()
            ),
        }
    }

    if mode == Mode::Create && report.has_failures() {
        1
    } else {
        0
    }
}

/// Shared delete flow: confirm unless `-y`, then one API call for all ids.
pub(crate) async fn delete(
    settings: &Settings,
    kind: ResourceKind,
    args: &DeleteArgs,
) -> Result<i32, Error> {
    if !args.force {
        let prompt = format!(
            "About to delete {} {}(s): {}. Continue?",
            args.ids.len(),
            kind.label(),
            args.ids.join(", ")
        );
        if !confirm(&prompt) {
            println!("Aborted.");
            return Ok(0);
        }
    }

    let client = MailcowClient::new(settings)?;
    let message = client.delete(kind, &args.ids).await?;
    println!("Deleted {} {}(s): {}", args.ids.len(), kind.label(), message);
    Ok(0)
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N]: ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes" | "YES")
}

/// Echoes the attributes an update submitted, with credentials masked.
pub(crate) fn print_updates(attrs: &Row) {
    for (key, value) in attrs.iter() {
        if key.contains("password") {
            println!("  {key}: ********");
        } else {
            println!("  {key}: {value}");
        }
    }
}
