//! Pipeline CLI: run one publish/modify/delete job end to end.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use validator::Validate;

use vredact_models::{BlackoutInterval, RedactionRequest, OUTPUT_PLAYLIST};
use vredact_pipeline::Coordinator;

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vredact=info".parse().unwrap())
        .add_directive("aws_config=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let coordinator = Coordinator::from_env().context("failed to configure pipeline")?;

    match args.first().map(String::as_str) {
        Some("publish") => {
            preflight()?;
            let request_path = args.get(1).context(USAGE)?;
            let request = load_request(request_path)?;
            let platform_id =
                std::env::var("VREDACT_PLATFORM_ID").unwrap_or_else(|_| "default".to_string());
            let user_id =
                std::env::var("VREDACT_USER_ID").unwrap_or_else(|_| "default".to_string());

            let outcome = coordinator
                .publish(
                    Path::new(&request.source),
                    &request.intervals,
                    &platform_id,
                    &user_id,
                )
                .await?;
            info!(
                content_id = %outcome.content_id,
                chunks = outcome.chunk_count,
                "Published"
            );
            println!("content_id: {}", outcome.content_id);
            println!("output:   {}", outcome.output_url);
            println!("blackout: {}", outcome.blackout_url);
        }
        Some("modify") => {
            preflight()?;
            let content_id = args.get(1).context(USAGE)?;
            let intervals_path = args.get(2).context(USAGE)?;
            let intervals = load_intervals(intervals_path)?;

            let outcome = match coordinator.modify(content_id, &intervals).await {
                Err(e) if e.is_not_found() => bail!("no published content with id {}", content_id),
                result => result?,
            };
            info!(content_id = %outcome.content_id, chunks = outcome.chunk_count, "Republished");
            println!("output:   {}", outcome.output_url);
            println!("blackout: {}", outcome.blackout_url);
        }
        Some("fetch") => {
            let content_id = args.get(1).context(USAGE)?;
            let name = args.get(2).map(String::as_str).unwrap_or(OUTPUT_PLAYLIST);
            let document = match coordinator.fetch_playlist(content_id, name).await {
                Err(e) if e.is_not_found() => bail!("no published playlist {} for {}", name, content_id),
                result => result?,
            };
            print!("{}", document);
        }
        Some("delete") => {
            let content_id = args.get(1).context(USAGE)?;
            let deleted = match coordinator.delete(content_id).await {
                Err(e) if e.is_not_found() => bail!("no published content with id {}", content_id),
                result => result?,
            };
            println!("deleted {} objects", deleted);
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

const USAGE: &str = "usage: vredact publish <request.json> | modify <content-id> <intervals.json> | fetch <content-id> [playlist] | delete <content-id>";

/// Transcoding commands need both tools; fail before any remote work.
fn preflight() -> Result<()> {
    vredact_media::check_ffmpeg()?;
    vredact_media::check_ffprobe()?;
    Ok(())
}

fn load_request(path: &str) -> Result<RedactionRequest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request file {}", path))?;
    let request: RedactionRequest =
        serde_json::from_str(&raw).with_context(|| format!("invalid request file {}", path))?;
    request
        .validate()
        .with_context(|| format!("invalid request in {}", path))?;
    Ok(request)
}

fn load_intervals(path: &str) -> Result<Vec<BlackoutInterval>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read intervals file {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid intervals file {}", path))
}
