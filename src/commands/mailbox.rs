use serde_json::Value;

use crate::batch::{run_batch, BatchOptions, Mode};
use crate::cli::{MailboxAddArgs, MailboxGetArgs, MailboxUpdateArgs, OutputFormat};
use crate::client::{MailcowApi, MailcowClient};
use crate::config::Settings;
use crate::error::Error;
use crate::output;
use crate::resource::ResourceKind;
use crate::row::{read_csv, Row};

use super::{finish_batch, flag, print_updates};

pub async fn get(settings: &Settings, args: &MailboxGetArgs) -> Result<i32, Error> {
    let client = MailcowClient::new(settings)?;
    let mut records = client.list(ResourceKind::Mailbox, false).await?;

    if let Some(domain) = &args.domain {
        records.retain(|r| output::field_text(r, "domain") == *domain);
    }

    if records.is_empty() {
        println!("No mailboxes found.");
        return Ok(0);
    }

    if args.output == OutputFormat::Json {
        println!("{}", output::render_json(&Value::Array(records)));
        return Ok(0);
    }

    let headers = ["username", "name", "domain", "quota", "active"];
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                output::field_text(r, "username"),
                output::field_text(r, "name"),
                output::field_text(r, "domain"),
                quota_text(r),
                output::active_mark(r),
            ]
        })
        .collect();

    println!("{}", output::render_projected(&headers, &rows, args.output));
    if args.output == OutputFormat::Table {
        println!("\nTotal: {} mailbox(es)", records.len());
    }
    Ok(0)
}

/// "used/total" in MB, or "unlimited" when no quota is set.
fn quota_text(record: &Value) -> String {
    const MB: u64 = 1024 * 1024;
    let used = record.get("quota_used").and_then(Value::as_u64).unwrap_or(0);
    let total = record.get("quota").and_then(Value::as_u64).unwrap_or(0);
    if total == 0 {
        "unlimited".to_string()
    } else {
        format!("{}/{}", used / MB, total / MB)
    }
}

pub async fn add(settings: &Settings, args: &MailboxAddArgs) -> Result<i32, Error> {
    let domain = args
        .domain
        .as_deref()
        .ok_or_else(|| Error::usage("missing --domain (or set MAILCOW_DOMAIN)"))?;

    let mut rows = match &args.file {
        Some(path) => read_csv(path)?,
        None => {
            if !args.gen_password && args.password.as_deref().map_or(true, |p| p.trim().is_empty())
            {
                return Err(Error::usage(
                    "single mode requires --password or --gen-password",
                ));
            }
            let mut row = Row::new();
            if let Some(v) = &args.local_part {
                row.set("local_part", v);
            }
            if let Some(v) = &args.name {
                row.set("name", v);
            }
            if let Some(v) = &args.password {
                row.set("password", v);
            }
            vec![row]
        }
    };

    // Rows without a display name get one derived from the local part,
    // e.g. "ana.maria" -> "Ana Maria".
    for row in &mut rows {
        if row.is_blank("name") {
            if let Some(local_part) = row.get("local_part") {
                let name = name_from_local_part(local_part);
                if !name.is_empty() {
                    row.set("name", name);
                }
            }
        }
    }

    let options = BatchOptions {
        kind: ResourceKind::Mailbox,
        mode: if args.preview { Mode::Preview } else { Mode::Create },
        defaults: [
            ("domain", domain),
            ("quota", args.quota.as_str()),
            ("active", flag(args.active.unwrap_or(true))),
            ("force_pw_update", flag(args.force_pw_update.unwrap_or(false))),
            ("tls_enforce_in", flag(args.tls_enforce_in.unwrap_or(true))),
            ("tls_enforce_out", flag(args.tls_enforce_out.unwrap_or(true))),
        ]
        .into_iter()
        .collect(),
        generate_passwords: args.gen_password,
    };

    let client = MailcowClient::new(settings)?;
    let report = run_batch(&client, rows, &options).await;
    Ok(finish_batch(&report, options.kind, options.mode, args.output))
}

fn name_from_local_part(local_part: &str) -> String {
    local_part
        .split(['.', '_', '-'])
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub async fn update(settings: &Settings, args: &MailboxUpdateArgs) -> Result<i32, Error> {
    let mut attrs = Row::new();
    if let Some(v) = &args.name {
        attrs.set("name", v);
    }
    if let Some(v) = &args.password {
        attrs.set("password", v);
        attrs.set("password2", v);
    }
    if let Some(v) = &args.quota {
        attrs.set("quota", v);
    }
    if let Some(v) = args.active {
        attrs.set("active", flag(v));
    }
    if let Some(v) = args.force_pw_update {
        attrs.set("force_pw_update", flag(v));
    }
    if let Some(v) = args.tls_enforce_in {
        attrs.set("tls_enforce_in", flag(v));
    }
    if let Some(v) = args.tls_enforce_out {
        attrs.set("tls_enforce_out", flag(v));
    }

    if attrs.is_empty() {
        return Err(Error::usage("no updates specified"));
    }

    let client = MailcowClient::new(settings)?;
    let message = client
        .update(ResourceKind::Mailbox, &args.username, &attrs)
        .await?;
    println!("Updated mailbox {}: {}", args.username, message);
    print_updates(&attrs);
    Ok(0)
}
