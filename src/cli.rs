use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "mailcow",
    version,
    about = "Manage Mailcow mailboxes, aliases, sync jobs, and transport maps via its admin API"
)]
pub struct Cli {
    /// Load `.env.<NAME>` instead of `.env` before reading environment variables.
    #[arg(short = 's', long, global = true, value_name = "NAME")]
    pub select_env: Option<String>,

    /// Mailcow server URL (env: MAILCOW_API_URL).
    #[arg(long, global = true, env = "MAILCOW_API_URL", hide_env_values = true)]
    pub api_url: Option<String>,

    /// Mailcow API key (env: MAILCOW_API_KEY).
    #[arg(long, global = true, env = "MAILCOW_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Verbose logging to stderr.
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage mailboxes.
    Mailbox {
        #[command(subcommand)]
        command: MailboxCommand,
    },

    /// Manage email aliases.
    Alias {
        #[command(subcommand)]
        command: AliasCommand,
    },

    /// Manage sync jobs (periodic IMAP imports into Mailcow).
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },

    /// Manage transport maps (relay routing).
    Transport {
        #[command(subcommand)]
        command: TransportCommand,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encryption {
    Ssl,
    Tls,
    Plain,
}

impl Encryption {
    /// Wire form expected by the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Encryption::Ssl => "SSL",
            Encryption::Tls => "TLS",
            Encryption::Plain => "PLAIN",
        }
    }
}

/// Shared by every `delete` subcommand: ids plus the confirmation bypass.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// One or more ids to delete.
    #[arg(required = true, value_name = "ID")]
    pub ids: Vec<String>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "force")]
    pub force: bool,
}

// --- Mailbox

#[derive(Subcommand, Debug)]
pub enum MailboxCommand {
    /// List mailboxes.
    Get(MailboxGetArgs),
    /// Create mailbox(es), from flags or a CSV file.
    Add(MailboxAddArgs),
    /// Update an existing mailbox.
    Update(MailboxUpdateArgs),
    /// Delete mailbox(es) by address.
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct MailboxGetArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Only show mailboxes in this domain.
    #[arg(short, long)]
    pub domain: Option<String>,
}

#[derive(Args, Debug)]
pub struct MailboxAddArgs {
    /// CSV file for batch mode (columns: local_part[,name[,password]]).
    #[arg(short, long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Domain for the mailbox(es) (env: MAILCOW_DOMAIN).
    #[arg(short, long, env = "MAILCOW_DOMAIN")]
    pub domain: Option<String>,

    /// Local part of the address (single mode).
    #[arg(long)]
    pub local_part: Option<String>,

    /// Full name; derived from the local part when omitted.
    #[arg(long)]
    pub name: Option<String>,

    /// Password (single mode; or use --gen-password).
    #[arg(long)]
    pub password: Option<String>,

    /// Generate passwords for rows that do not bring one.
    #[arg(long)]
    pub gen_password: bool,

    /// Quota in MB (0 = domain default).
    #[arg(long, default_value = "0")]
    pub quota: String,

    /// Activate the mailbox (default: true).
    #[arg(long)]
    pub active: Option<bool>,

    /// Force a password change on first login (default: false).
    #[arg(long)]
    pub force_pw_update: Option<bool>,

    /// Require TLS for incoming connections (default: true).
    #[arg(long)]
    pub tls_enforce_in: Option<bool>,

    /// Require TLS for outgoing connections (default: true).
    #[arg(long)]
    pub tls_enforce_out: Option<bool>,

    /// Validate and show what would be created, without calling the API.
    #[arg(long)]
    pub preview: bool,

    /// Output format for the batch report.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct MailboxUpdateArgs {
    /// Full address of the mailbox, e.g. john@example.com.
    pub username: String,

    /// Full name.
    #[arg(long)]
    pub name: Option<String>,

    /// New password.
    #[arg(long)]
    pub password: Option<String>,

    /// Quota in MB (0 = domain default).
    #[arg(long)]
    pub quota: Option<String>,

    /// Activate or deactivate the mailbox.
    #[arg(long)]
    pub active: Option<bool>,

    /// Force a password change on first login.
    #[arg(long)]
    pub force_pw_update: Option<bool>,

    /// Require TLS for incoming connections.
    #[arg(long)]
    pub tls_enforce_in: Option<bool>,

    /// Require TLS for outgoing connections.
    #[arg(long)]
    pub tls_enforce_out: Option<bool>,
}

// --- Alias

#[derive(Subcommand, Debug)]
pub enum AliasCommand {
    /// List aliases.
    Get(AliasGetArgs),
    /// Create alias(es), from flags or a CSV file.
    Add(AliasAddArgs),
    /// Update an existing alias.
    Update(AliasUpdateArgs),
    /// Delete alias(es) by id.
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AliasGetArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Only show aliases in this domain.
    #[arg(short, long)]
    pub domain: Option<String>,
}

#[derive(Args, Debug)]
pub struct AliasAddArgs {
    /// CSV file for batch mode (columns: address,goto).
    #[arg(short, long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Alias address (single mode).
    #[arg(long)]
    pub address: Option<String>,

    /// Comma-separated destination addresses (single mode).
    #[arg(long)]
    pub goto: Option<String>,

    /// Activate the alias (default: true).
    #[arg(long)]
    pub active: Option<bool>,

    /// Show the alias in SOGo (default: true).
    #[arg(long)]
    pub sogo_visible: Option<bool>,

    /// Validate and show what would be created, without calling the API.
    #[arg(long)]
    pub preview: bool,

    /// Output format for the batch report.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct AliasUpdateArgs {
    /// Alias id.
    pub id: String,

    /// New alias address.
    #[arg(long)]
    pub address: Option<String>,

    /// New comma-separated destination addresses.
    #[arg(long)]
    pub goto: Option<String>,

    /// Activate or deactivate the alias.
    #[arg(long)]
    pub active: Option<bool>,

    /// Show or hide the alias in SOGo.
    #[arg(long)]
    pub sogo_visible: Option<bool>,
}

// --- Sync jobs

#[derive(Subcommand, Debug)]
pub enum JobsCommand {
    /// List sync jobs.
    Get(JobsGetArgs),
    /// Create sync job(s), from flags or a CSV file.
    Add(JobsAddArgs),
    /// Update an existing sync job.
    Update(JobsUpdateArgs),
    /// Delete sync job(s) by id.
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct JobsGetArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Include sync logs in the response (can be slow).
    #[arg(long)]
    pub include_log: bool,
}

#[derive(Args, Debug)]
pub struct JobsAddArgs {
    /// CSV file for batch mode (columns: user1,password1,username).
    #[arg(short, long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Source IMAP host (env: MAILCOW_SRC_HOST).
    #[arg(long, env = "MAILCOW_SRC_HOST")]
    pub host1: Option<String>,

    /// Source IMAP port (env: MAILCOW_SRC_PORT).
    #[arg(long, env = "MAILCOW_SRC_PORT", default_value = "993")]
    pub port1: String,

    /// Source encryption (env: MAILCOW_SRC_ENC).
    #[arg(long, env = "MAILCOW_SRC_ENC", value_enum, ignore_case = true, default_value_t = Encryption::Ssl)]
    pub enc1: Encryption,

    /// Source mailbox login (single mode).
    #[arg(long)]
    pub user1: Option<String>,

    /// Source mailbox password (single mode).
    #[arg(long)]
    pub password1: Option<String>,

    /// Destination mailbox in Mailcow (single mode).
    #[arg(long)]
    pub username: Option<String>,

    /// Sync interval in minutes.
    #[arg(long, default_value = "20")]
    pub mins_interval: String,

    /// Regex of folders to exclude from syncing.
    #[arg(long, default_value = "(?i)spam|(?i)junk")]
    pub exclude: String,

    /// Delete duplicates on the destination (default: true).
    #[arg(long)]
    pub delete2duplicates: Option<bool>,

    /// Auto-map folder names (default: true).
    #[arg(long)]
    pub automap: Option<bool>,

    /// Subscribe to all folders (default: true).
    #[arg(long)]
    pub subscribeall: Option<bool>,

    /// Activate the job immediately (default: true).
    #[arg(long)]
    pub active: Option<bool>,

    /// Pass --dry to imapsync (simulate without transferring).
    #[arg(long)]
    pub dry: bool,

    /// Additional imapsync parameters.
    #[arg(long, default_value = "")]
    pub custom_params: String,

    /// Validate and show what would be created, without calling the API.
    #[arg(long)]
    pub preview: bool,

    /// Output format for the batch report.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct JobsUpdateArgs {
    /// Sync job id.
    pub id: String,

    /// Source IMAP host.
    #[arg(long)]
    pub host1: Option<String>,

    /// Source IMAP port.
    #[arg(long)]
    pub port1: Option<String>,

    /// Source encryption.
    #[arg(long, value_enum, ignore_case = true)]
    pub enc1: Option<Encryption>,

    /// Source mailbox login.
    #[arg(long)]
    pub user1: Option<String>,

    /// Source mailbox password.
    #[arg(long)]
    pub password1: Option<String>,

    /// Sync interval in minutes.
    #[arg(long)]
    pub mins_interval: Option<String>,

    /// Regex of folders to exclude from syncing.
    #[arg(long)]
    pub exclude: Option<String>,

    /// Delete duplicates on the destination.
    #[arg(long)]
    pub delete2duplicates: Option<bool>,

    /// Auto-map folder names.
    #[arg(long)]
    pub automap: Option<bool>,

    /// Subscribe to all folders.
    #[arg(long)]
    pub subscribeall: Option<bool>,

    /// Activate or deactivate the job.
    #[arg(long)]
    pub active: Option<bool>,

    /// Add --dry to the imapsync parameters.
    #[arg(long, conflicts_with = "no_dry")]
    pub dry: bool,

    /// Remove --dry from the imapsync parameters.
    #[arg(long)]
    pub no_dry: bool,

    /// Replace the additional imapsync parameters.
    #[arg(long)]
    pub custom_params: Option<String>,
}

// --- Transport maps

#[derive(Subcommand, Debug)]
pub enum TransportCommand {
    /// List transport maps.
    Get(TransportGetArgs),
    /// Create transport map(s), from flags or a CSV file.
    Add(TransportAddArgs),
    /// Update an existing transport map.
    Update(TransportUpdateArgs),
    /// Delete transport map(s) by id.
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct TransportGetArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct TransportAddArgs {
    /// CSV file for batch mode (columns: destination,nexthop[,username,password]).
    #[arg(short, long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Destination domain or pattern, e.g. example.com (single mode).
    #[arg(long)]
    pub destination: Option<String>,

    /// Next hop server, e.g. [smtp.relay.com]:587 (single mode).
    #[arg(long)]
    pub nexthop: Option<String>,

    /// SMTP auth username (empty for anonymous relay).
    #[arg(long)]
    pub username: Option<String>,

    /// SMTP auth password.
    #[arg(long)]
    pub password: Option<String>,

    /// Activate the transport (default: true).
    #[arg(long)]
    pub active: Option<bool>,

    /// Validate and show what would be created, without calling the API.
    #[arg(long)]
    pub preview: bool,

    /// Output format for the batch report.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct TransportUpdateArgs {
    /// Transport map id.
    pub id: String,

    /// Destination domain or pattern.
    #[arg(long)]
    pub destination: Option<String>,

    /// Next hop server.
    #[arg(long)]
    pub nexthop: Option<String>,

    /// SMTP auth username.
    #[arg(long)]
    pub username: Option<String>,

    /// SMTP auth password.
    #[arg(long)]
    pub password: Option<String>,

    /// Activate or deactivate the transport.
    #[arg(long)]
    pub active: Option<bool>,
}
