use serde_json::Value;

use crate::batch::{run_batch, BatchOptions, Mode};
use crate::cli::{OutputFormat, TransportAddArgs, TransportGetArgs, TransportUpdateArgs};
use crate::client::{MailcowApi, MailcowClient};
use crate::config::Settings;
use crate::error::Error;
use crate::output;
use crate::resource::ResourceKind;
use crate::row::{read_csv, Row};

use super::{finish_batch, flag, print_updates};

pub async fn get(settings: &Settings, args: &TransportGetArgs) -> Result<i32, Error> {
    let client = MailcowClient::new(settings)?;
    let records = client.list(ResourceKind::TransportMap, false).await?;

    if records.is_empty() {
        println!("No transport maps found.");
        return Ok(0);
    }

    if args.output == OutputFormat::Json {
        println!("{}", output::render_json(&Value::Array(records)));
        return Ok(0);
    }

    let headers = ["id", "destination", "nexthop", "username", "active"];
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            let username = output::field_text(r, "username");
            vec![
                output::field_text(r, "id"),
                output::field_text(r, "destination"),
                output::field_text(r, "nexthop"),
                if username.is_empty() { "-".to_string() } else { username },
                output::active_mark(r),
            ]
        })
        .collect();

    println!("{}", output::render_projected(&headers, &rows, args.output));
    if args.output == OutputFormat::Table {
        println!("\nTotal: {} transport map(s)", records.len());
    }
    Ok(0)
}

pub async fn add(settings: &Settings, args: &TransportAddArgs) -> Result<i32, Error> {
    let rows = match &args.file {
        Some(path) => read_csv(path)?,
        None => {
            let mut row = Row::new();
            if let Some(v) = &args.destination {
                row.set("destination", v);
            }
            if let Some(v) = &args.nexthop {
                row.set("nexthop", v);
            }
            if let Some(v) = &args.username {
                row.set("username", v);
            }
            if let Some(v) = &args.password {
                row.set("password", v);
            }
            vec![row]
        }
    };

    let options = BatchOptions {
        kind: ResourceKind::TransportMap,
        mode: if args.preview { Mode::Preview } else { Mode::Create },
        // Anonymous relay unless the row brings credentials.
        defaults: [
            ("username", ""),
            ("password", ""),
            ("active", flag(args.active.unwrap_or(true))),
        ]
        .into_iter()
        .collect(),
        generate_passwords: false,
    };

    let client = MailcowClient::new(settings)?;
    let report = run_batch(&client, rows, &options).await;
    Ok(finish_batch(&report, options.kind, options.mode, args.output))
}

pub async fn update(settings: &Settings, args: &TransportUpdateArgs) -> Result<i32, Error> {
    let mut attrs = Row::new();
    if let Some(v) = &args.destination {
        attrs.set("destination", v);
    }
    if let Some(v) = &args.nexthop {
        attrs.set("nexthop", v);
    }
    if let Some(v) = &args.username {
        attrs.set("username", v);
    }
    if let Some(v) = &args.password {
        attrs.set("password", v);
    }
    if let Some(v) = args.active {
        attrs.set("active", flag(v));
    }

    if attrs.is_empty() {
        return Err(Error::usage("no updates specified"));
    }

    let client = MailcowClient::new(settings)?;
    let message = client
        .update(ResourceKind::TransportMap, &args.id, &attrs)
        .await?;
    println!("Updated transport map {}: {}", args.id, message);
    print_updates(&attrs);
    Ok(0)
}
