mod cli;

use vidshelf::{
    cache::ScanCache,
    config,
    context::AppContext,
    scanner::{self, ScanResult, Walker},
    sync::{ProgressCallback, ProgressEvent, ScanOptions},
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

async fn scan(config_path: Option<&Path>, options: ScanOptions) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    if config.volumes.is_empty() {
        println!("No volumes configured. Add [[volumes]] entries to the config file.");
        return Ok(());
    }

    let ctx = AppContext::open(config)?;
    let progress: ProgressCallback = Box::new(|event: ProgressEvent| match event.percentage {
        Some(p) => eprintln!("[{:>3}%] {}", p, event.message),
        None => eprintln!("       {}", event.message),
    });

    let outcome = ctx.orchestrator().scan(&options, Some(progress)).await?;

    println!();
    for volume in &outcome.volumes {
        println!("{} ({})", volume.name, volume.path.display());
        if let Some(ref error) = volume.error {
            println!("  ✗ {}", error);
            continue;
        }
        for persisted in &volume.persisted {
            println!(
                "  {} {} - {} seasons, +{} / ~{} episodes",
                if persisted.created { "+" } else { "~" },
                persisted.series.title,
                persisted.seasons,
                persisted.episodes_added,
                persisted.episodes_updated
            );
        }
        for failure in &volume.failures {
            println!("  ✗ {}: {}", failure.path.display(), failure.error);
        }
        for skipped in &volume.result.skipped {
            println!("  ! unreadable: {}", skipped.display());
        }
    }
    for id in &outcome.skipped_volumes {
        println!("{} (not connected, skipped)", id);
    }

    println!();
    println!("Series merged: {}", outcome.series_count());
    if !outcome.is_success() {
        anyhow::bail!("Scan finished with errors");
    }
    Ok(())
}

fn walk(path: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let result = Walker::new(config.walk_policy()).walk(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_scan_result(&result);
    }
    Ok(())
}

fn print_scan_result(result: &ScanResult) {
    println!("Root: {}", result.root.display());
    println!(
        "Series: {}, episodes: {}",
        result.series.len(),
        result.episode_count()
    );

    for series in &result.series {
        match series.year_hint {
            Some(year) => println!("\n{} ({})", series.title, year),
            None => println!("\n{}", series.title),
        }
        println!("  {}", series.root_path.display());
        for season in &series.seasons {
            println!("  Season {}", season.number);
            for episode in &season.episodes {
                println!(
                    "    {:>3}. {} (~{} min)",
                    episode.number, episode.file_name, episode.duration_minutes
                );
            }
        }
    }

    if !result.skipped.is_empty() {
        println!("\nUnreadable:");
        for path in &result.skipped {
            println!("  {}", path.display());
        }
    }
}

fn classify(name: &str) -> Result<()> {
    println!("Name: {}", name);

    match scanner::classify_season_folder(name) {
        Some(m) => println!("Season folder: yes (season {}, {:?})", m.number, m.pattern),
        None => println!("Season folder: no"),
    }

    match scanner::classify_episode_file(name) {
        Some(m) => {
            print!("Episode file: yes (episode {}", m.episode);
            if let Some(season) = m.season {
                print!(", season {}", season);
            }
            println!(", {:?})", m.pattern);
        }
        None => println!("Episode file: no"),
    }

    println!("Series title: {}", scanner::extract_series_title(name));
    if let Some(year) = scanner::extract_year_hint(name) {
        println!("Year hint: {}", year);
    }
    Ok(())
}

fn list(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let ctx = AppContext::open(config)?;
    let summaries = ctx.sync.list_summaries()?;

    if summaries.is_empty() {
        println!("Catalog is empty.");
        return Ok(());
    }

    for summary in &summaries {
        let series = &summary.series;
        let year = series.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        let mut flags = Vec::new();
        if series.watched {
            flags.push("watched");
        }
        if series.hidden {
            flags.push("hidden");
        }
        if !series.enriched {
            flags.push("unenriched");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };

        println!(
            "{}{} - {} seasons, {}/{} episodes watched{}",
            series.title,
            year,
            summary.season_count,
            summary.watched_count,
            summary.episode_count,
            flags
        );
        println!("  {}", series.hd_path);
    }
    Ok(())
}

fn clear_cache(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let cache = ScanCache::new(Walker::new(config.walk_policy())).with_disk_dir(config.cache_dir());
    let removed = cache.clear();
    println!("Removed {} cached walk(s) from {}", removed, config.cache_dir().display());
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Data dir: {}", config.resolved_data_dir().display());
    println!("  Cache TTL: {}h", config.scan.cache_ttl_hours);
    println!("  Max depth: {}", config.scan.max_depth);
    println!("  Metadata enabled: {}", config.metadata.enabled);
    println!("  Volumes: {}", config.volumes.len());
    for volume in &config.volumes {
        let state = if volume.path.is_dir() { "connected" } else { "not connected" };
        println!("    {} - {} ({})", volume.id, volume.path.display(), state);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vidshelf=trace,vidshelf_db=debug,vidshelf_common=debug".to_string()
        } else {
            "vidshelf=info,vidshelf_db=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan { force, volume } => {
            let rt = tokio::runtime::Runtime::new()?;
            let options = ScanOptions {
                force_refresh: force,
                volume,
            };
            rt.block_on(scan(cli.config.as_deref(), options))
        }
        Commands::Walk { path, json } => walk(&path, cli.config.as_deref(), json),
        Commands::Classify { name } => classify(&name),
        Commands::List => list(cli.config.as_deref()),
        Commands::ClearCache => clear_cache(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("vidshelf {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
