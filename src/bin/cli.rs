use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use tracing::subscriber as tracing_subscriber_global;
use tracing_appender::rolling::RollingFileAppender;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use twitch_community_playlist as lib;
use lib::config::Config;
use lib::worker::PlaylistReport;

/// Build a Spotify playlist from a Twitch channel's song request redemptions.
#[derive(Parser)]
#[command(name = "twitch-community-playlist", version)]
struct Cli {}

fn truncate(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn print_report(report: &PlaylistReport) {
    let s = &report.summary;
    println!("\nCreated playlist: {}", report.playlist.name);
    if let Some(url) = &report.playlist.url {
        println!("  URL: {}", url);
    }

    println!("\nSummary:");
    println!("  Direct URL tracks: {}", s.direct_tracks);
    println!("  Search-based tracks: {}", s.search_tracks);
    println!("  Total tracks added: {}", s.added);
    if !s.failed.is_empty() {
        println!("  Failed to add: {}", s.failed.len());
    }
    if s.search_misses + s.search_errors > 0 {
        println!(
            "  Unresolved searches: {} ({} without results, {} errors)",
            s.search_misses + s.search_errors,
            s.search_misses,
            s.search_errors
        );
    }
    if s.discarded > 0 {
        println!("  Discarded redemptions: {}", s.discarded);
    }

    if !report.direct.is_empty() {
        println!("\nSample of direct URL requests:");
        for req in report.direct.iter().take(3) {
            println!(
                "  - Track ID: {} (requested by {}, status: {})",
                req.track_id,
                req.requester,
                req.status.as_str()
            );
        }
    }
    if !report.found.is_empty() {
        println!("\nSample of search-based requests:");
        for res in report.found.iter().take(3) {
            println!(
                "  - '{}' by {} (query: '{}', requested by {})",
                res.track_name,
                res.artist,
                truncate(&res.query, 40),
                res.requester
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();
    let _ = dotenvy::dotenv();

    let cfg = Config::load().context("loading configuration")?;

    // Initialize log->tracing bridge and structured logging.
    // Logs go to both stderr and a daily-rotated file in cfg.log_dir.
    let _ = LogTracer::init();
    std::fs::create_dir_all(&cfg.log_dir)
        .with_context(|| format!("creating log dir {}", cfg.log_dir.display()))?;
    let file_appender: RollingFileAppender =
        tracing_appender::rolling::daily(&cfg.log_dir, "community-playlist.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer);

    // We already bridged `log` above, so install without the subscriber's own log bridge.
    tracing_subscriber_global::set_global_default(subscriber)
        .context("failed to set global tracing subscriber")?;

    println!("{}", "=".repeat(60));
    println!("Twitch Community Playlist Maker");
    println!("{}", "=".repeat(60));

    print!("\nEnter Twitch channel name: ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let broadcaster_login = input.trim();
    if broadcaster_login.is_empty() {
        eprintln!("No channel name provided");
        std::process::exit(1);
    }

    let code = match lib::worker::run_once(&cfg, broadcaster_login).await {
        Ok(report) => {
            print_report(&report);
            println!("\n{}", "=".repeat(60));
            println!("Playlist created successfully!");
            println!("{}", "=".repeat(60));
            0
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            eprintln!("\n{}. Exiting.", e);
            1
        }
    };

    // Flush the file appender before exiting.
    drop(guard);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
