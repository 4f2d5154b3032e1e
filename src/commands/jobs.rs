use serde_json::Value;

use crate::batch::{run_batch, BatchOptions, Mode};
use crate::cli::{JobsAddArgs, JobsGetArgs, JobsUpdateArgs, OutputFormat};
use crate::client::{MailcowApi, MailcowClient};
use crate::config::Settings;
use crate::error::Error;
use crate::output;
use crate::resource::{ResourceKind, SYNC_DEFAULTS};
use crate::row::{read_csv, Row};

use super::{finish_batch, flag, print_updates};

pub async fn get(settings: &Settings, args: &JobsGetArgs) -> Result<i32, Error> {
    let client = MailcowClient::new(settings)?;
    let records = client
        .list(ResourceKind::SyncJob, args.include_log)
        .await?;

    if records.is_empty() {
        println!("No sync jobs found.");
        return Ok(0);
    }

    if args.output == OutputFormat::Json {
        println!("{}", output::render_json(&Value::Array(records)));
        return Ok(0);
    }

    let headers = ["id", "username", "user1", "host1", "active"];
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            // Older servers report the destination as user2.
            let mut username = output::field_text(r, "username");
            if username.is_empty() {
                username = output::field_text(r, "user2");
            }
            vec![
                output::field_text(r, "id"),
                username,
                output::field_text(r, "user1"),
                output::field_text(r, "host1"),
                output::active_mark(r),
            ]
        })
        .collect();

    println!("{}", output::render_projected(&headers, &rows, args.output));
    if args.output == OutputFormat::Table {
        println!("\nTotal: {} sync job(s)", records.len());
    }
    Ok(0)
}

pub async fn add(settings: &Settings, args: &JobsAddArgs) -> Result<i32, Error> {
    let host1 = args
        .host1
        .as_deref()
        .ok_or_else(|| Error::usage("missing --host1 (or set MAILCOW_SRC_HOST)"))?;

    let rows = match &args.file {
        Some(path) => read_csv(path)?,
        None => {
            let mut row = Row::new();
            if let Some(v) = &args.user1 {
                row.set("user1", v);
            }
            if let Some(v) = &args.password1 {
                row.set("password1", v);
            }
            if let Some(v) = &args.username {
                row.set("username", v);
            }
            vec![row]
        }
    };

    let mut custom_params = args.custom_params.trim().to_string();
    if args.dry {
        custom_params = format!("--dry {custom_params}").trim().to_string();
    }

    let mut defaults: Row = SYNC_DEFAULTS.iter().copied().collect();
    defaults.set("host1", host1);
    defaults.set("port1", args.port1.as_str());
    defaults.set("enc1", args.enc1.as_str());
    defaults.set("mins_interval", args.mins_interval.as_str());
    defaults.set("exclude", args.exclude.as_str());
    defaults.set("delete2duplicates", flag(args.delete2duplicates.unwrap_or(true)));
    defaults.set("automap", flag(args.automap.unwrap_or(true)));
    defaults.set("subscribeall", flag(args.subscribeall.unwrap_or(true)));
    defaults.set("active", flag(args.active.unwrap_or(true)));
    if !custom_params.is_empty() {
        defaults.set("custom_params", custom_params);
    }

    let options = BatchOptions {
        kind: ResourceKind::SyncJob,
        mode: if args.preview { Mode::Preview } else { Mode::Create },
        defaults,
        generate_passwords: false,
    };

    let client = MailcowClient::new(settings)?;
    let report = run_batch(&client, rows, &options).await;
    Ok(finish_batch(&report, options.kind, options.mode, args.output))
}

pub async fn update(settings: &Settings, args: &JobsUpdateArgs) -> Result<i32, Error> {
    let mut attrs = Row::new();
    if let Some(v) = &args.host1 {
        attrs.set("host1", v);
    }
    if let Some(v) = &args.port1 {
        attrs.set("port1", v);
    }
    if let Some(v) = args.enc1 {
        attrs.set("enc1", v.as_str());
    }
    if let Some(v) = &args.user1 {
        attrs.set("user1", v);
    }
    if let Some(v) = &args.password1 {
        attrs.set("password1", v);
    }
    if let Some(v) = &args.mins_interval {
        attrs.set("mins_interval", v);
    }
    if let Some(v) = &args.exclude {
        attrs.set("exclude", v);
    }
    if let Some(v) = args.delete2duplicates {
        attrs.set("delete2duplicates", flag(v));
    }
    if let Some(v) = args.automap {
        attrs.set("automap", flag(v));
    }
    if let Some(v) = args.subscribeall {
        attrs.set("subscribeall", flag(v));
    }
    if let Some(v) = args.active {
        attrs.set("active", flag(v));
    }
    if let Some(v) = &args.custom_params {
        attrs.set("custom_params", v);
    }
    if args.dry {
        let params = attrs.get("custom_params").unwrap_or("").to_string();
        attrs.set("custom_params", format!("--dry {params}").trim().to_string());
    }
    if args.no_dry {
        if let Some(params) = attrs.get("custom_params") {
            attrs.set("custom_params", params.replace("--dry", "").trim().to_string());
        }
    }

    if attrs.is_empty() {
        return Err(Error::usage("no updates specified"));
    }

    let client = MailcowClient::new(settings)?;
    let message = client
        .update(ResourceKind::SyncJob, &args.id, &attrs)
        .await?;
    println!("Updated sync job {}: {}", args.id, message);
    print_updates(&attrs);
    Ok(0)
}
