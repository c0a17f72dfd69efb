//! Subcommand handlers.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context as _, bail};

use courier_application::ports::EntityRepository as _;
use courier_domain::response::classify;
use courier_domain::{ApiSetting, HttpResponse, ListScope};

use crate::context::AppContext;

/// Imports an export file into a collection and returns the report.
pub async fn import(
    ctx: &AppContext,
    file: &Path,
    category: &str,
    collection: &str,
) -> anyhow::Result<String> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let output = ctx.importer().import(category, collection, &text).await?;

    let mut report = format!(
        "imported {} folders, {} requests, {} environments\n",
        output.folders, output.settings, output.environments
    );
    for id in &output.top_ids {
        writeln!(report, "{id}")?;
    }
    Ok(report)
}

/// Resolves every template function in `text`.
pub async fn resolve(
    ctx: &AppContext,
    collection: &str,
    text: &str,
    picks: &[String],
    base_dir: Option<&Path>,
) -> anyhow::Result<String> {
    Ok(ctx.engine(picks, base_dir).resolve(collection, text).await?)
}

/// Classifies a stored response and renders it for the terminal.
pub async fn inspect(file: &Path) -> anyhow::Result<String> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let resp: HttpResponse = serde_json::from_str(&text).context("not a response record")?;
    render(&resp)
}

fn render(resp: &HttpResponse) -> anyhow::Result<String> {
    let body = classify(resp)?;
    let mut out = String::new();
    writeln!(out, "{} ({})", resp.status, resp.status.severity())?;
    writeln!(out, "latency: {}ms", resp.latency)?;
    writeln!(out, "{}: {} bytes", body.category.as_str(), body.size)?;
    writeln!(out)?;
    out.push_str(&body.data);
    Ok(out)
}

/// Lists the cached responses of a request, newest first.
pub async fn cache(ctx: &AppContext, request_id: &str, clear: bool) -> anyhow::Result<String> {
    if clear {
        ctx.cache().clear(request_id).await?;
        return Ok(format!("cleared responses of {request_id}\n"));
    }
    let entries = ctx.cache().list(request_id).await?;
    let mut out = String::new();
    for entry in entries {
        writeln!(
            out,
            "{}  {}  {}ms  {} bytes",
            entry.created_at, entry.resp.status, entry.resp.latency, entry.resp.body_size
        )?;
    }
    Ok(out)
}

/// Sends a saved request through the native backend.
pub async fn send(ctx: &AppContext, setting_id: &str, picks: &[String]) -> anyhow::Result<String> {
    let sender = ctx.sender(picks)?;
    let settings: Vec<ApiSetting> = ctx
        .repositories()
        .settings
        .list(&ListScope::all())
        .await?;
    let Some(setting) = settings.into_iter().find(|s| s.id == setting_id) else {
        bail!("no saved request with id {setting_id}");
    };
    let resp = sender.execute(&setting).await?;
    render(&resp)
}
