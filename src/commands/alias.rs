use serde_json::Value;

use crate::batch::{run_batch, BatchOptions, Mode};
use crate::cli::{AliasAddArgs, AliasGetArgs, AliasUpdateArgs, OutputFormat};
use crate::client::{MailcowApi, MailcowClient};
use crate::config::Settings;
use crate::error::Error;
use crate::output;
use crate::resource::ResourceKind;
use crate::row::{read_csv, Row};

use super::{finish_batch, flag, print_updates};

pub async fn get(settings: &Settings, args: &AliasGetArgs) -> Result<i32, Error> {
    let client = MailcowClient::new(settings)?;
    let mut records = client.list(ResourceKind::Alias, false).await?;

    if let Some(domain) = &args.domain {
        records.retain(|r| output::field_text(r, "domain") == *domain);
    }

    if records.is_empty() {
        println!("No aliases found.");
        return Ok(0);
    }

    if args.output == OutputFormat::Json {
        println!("{}", output::render_json(&Value::Array(records)));
        return Ok(0);
    }

    let headers = ["id", "address", "goto", "active"];
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                output::field_text(r, "id"),
                output::field_text(r, "address"),
                output::field_text(r, "goto"),
                output::active_mark(r),
            ]
        })
        .collect();

    println!("{}", output::render_projected(&headers, &rows, args.output));
    if args.output == OutputFormat::Table {
        println!("\nTotal: {} alias(es)", records.len());
    }
    Ok(0)
}

pub async fn add(settings: &Settings, args: &AliasAddArgs) -> Result<i32, Error> {
    let rows = match &args.file {
        Some(path) => read_csv(path)?,
        None => {
            let mut row = Row::new();
            if let Some(v) = &args.address {
                row.set("address", v);
            }
            if let Some(v) = &args.goto {
                row.set("goto", v);
            }
            vec![row]
        }
    };

    let options = BatchOptions {
        kind: ResourceKind::Alias,
        mode: if args.preview { Mode::Preview } else { Mode::Create },
        defaults: [
            ("active", flag(args.active.unwrap_or(true))),
            ("sogo_visible", flag(args.sogo_visible.unwrap_or(true))),
        ]
        .into_iter()
        .collect(),
        generate_passwords: false,
    };

    let client = MailcowClient::new(settings)?;
    let report = run_batch(&client, rows, &options).await;
    Ok(finish_batch(&report, options.kind, options.mode, args.output))
}

pub async fn update(settings: &Settings, args: &AliasUpdateArgs) -> Result<i32, Error> {
    let mut attrs = Row::new();
    if let Some(v) = &args.address {
        attrs.set("address", v);
    }
    if let Some(v) = &args.goto {
        attrs.set("goto", v);
    }
    if let Some(v) = args.active {
        attrs.set("active", flag(v));
    }
    if let Some(v) = args.sogo_visible {
        attrs.set("sogo_visible", flag(v));
    }

    if attrs.is_empty() {
        return Err(Error::usage("no updates specified"));
    }

    let client = MailcowClient::new(settings)?;
    let message = client.update(ResourceKind::Alias, &args.id, &attrs).await?;
    println!("Updated alias {}: {}", args.id, message);
    print_updates(&attrs);
    Ok(0)
}
