//! CLI entry point for `postcards`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use postcards::config::Config;
use postcards::export::text::{save_postcards, SaveMode};
use postcards::index::stats;
use postcards::model::postcard::Postcard;
use postcards::store::PostcardStore;

/// Index postcard files by date, sender and receiver, and query them.
#[derive(Parser)]
#[command(name = "postcards", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Load postcard files and show statistics
    Stats {
        /// Files to load; the first is loaded, the rest appended
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Search postcards (from:NAME to:NAME date:A..B before:D after:D)
    Search {
        query: String,
        /// Files to load; the first is loaded, the rest appended
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Save postcards to a text file or CSV
    Export {
        /// Files to load; the first is loaded, the rest appended
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
        /// Output format: txt or csv (defaults to the configured format)
        #[arg(short, long)]
        format: Option<String>,
        /// Append to the output file instead of overwriting it (txt only)
        #[arg(long)]
        append: bool,
        /// Only export postcards matching this query
        #[arg(long)]
        query: Option<String>,
    },
    /// Measure average lookup times of BTreeMap, HashMap and a sorted Vec
    Bench {
        #[arg(long)]
        start: Option<usize>,
        #[arg(long)]
        stop: Option<usize>,
        #[arg(long)]
        step: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the active configuration as TOML
    Config {
        /// Write the active configuration to the config file path
        #[arg(long)]
        init: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = postcards::config::load_config();

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Stats { files, json } => cmd_stats(&files, json),
        Commands::Search { query, files, json } => cmd_search(&files, &query, json),
        Commands::Export {
            files,
            output,
            format,
            append,
            query,
        } => {
            let format = format.unwrap_or_else(|| config.export.default_format.clone());
            cmd_export(&files, &output, &format, append, query.as_deref(), &config)
        }
        Commands::Bench {
            start,
            stop,
            step,
            seed,
            output,
        } => {
            let mut params = config.bench.clone();
            params.start = start.unwrap_or(params.start);
            params.stop = stop.unwrap_or(params.stop);
            params.step = step.unwrap_or(params.step);
            params.seed = seed.or(params.seed);
            params.output = output.unwrap_or(params.output);
            cmd_bench(&params)
        }
        Commands::Config { init } => cmd_config(&config, init),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_path = postcards::config::log_file_path(config);
    let log_dir = log_path
        .parent()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());
    if let (Some(log_dir), Some(file_name)) = (log_dir, log_path.file_name()) {
        let file_appender = tracing_appender::rolling::never(log_dir, file_name);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Load the first file and append the rest.
fn load_store(files: &[PathBuf]) -> anyhow::Result<PostcardStore> {
    let mut store = PostcardStore::new();
    for (i, path) in files.iter().enumerate() {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        if i == 0 {
            store.load_file(path)?;
        } else {
            store.append_file(path)?;
        }
    }
    Ok(store)
}

/// Load postcard files and print statistics.
fn cmd_stats(files: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let store = load_store(files)?;
    let elapsed = start.elapsed();

    let total_size: u64 = files
        .iter()
        .filter_map(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .sum();

    if json {
        print_stats_json(files, total_size, &store, elapsed)
    } else {
        print_stats_table(files, total_size, &store, elapsed);
        Ok(())
    }
}

/// Search postcards and print the matching lines.
fn cmd_search(files: &[PathBuf], query: &str, json: bool) -> anyhow::Result<()> {
    let store = load_store(files)?;
    let (_parsed, results) = postcards::search::execute(&store, query)?;

    if json {
        print_search_results_json(&store, &results)?;
    } else {
        for postcard in store.resolve(&results) {
            println!("{}", postcard.line());
        }
        eprintln!("{} result(s)", results.len());
    }
    Ok(())
}

/// Save postcards as text (overwrite or append) or CSV.
fn cmd_export(
    files: &[PathBuf],
    output: &Path,
    format: &str,
    append: bool,
    query: Option<&str>,
    config: &Config,
) -> anyhow::Result<()> {
    let store = load_store(files)?;

    let selected: Vec<&Postcard> = match query {
        Some(q) => {
            let (_, results) = postcards::search::execute(&store, q)?;
            store.resolve(&results)
        }
        None => store.iter().collect(),
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        "txt" | "text" => {
            let mode = if append {
                SaveMode::Append
            } else {
                SaveMode::Overwrite
            };
            let written = match (query, mode) {
                (None, SaveMode::Overwrite) => store.write_file(output)?,
                (None, SaveMode::Append) => store.update_file(output)?,
                (Some(_), mode) => save_postcards(selected.iter().copied(), output, mode)?,
            };
            let verb = if append { "Appended" } else { "Wrote" };
            println!("  {verb} {written} postcard(s) to {}", output.display());
        }
        "csv" => {
            if append {
                anyhow::bail!("--append is only supported for txt exports");
            }
            postcards::export::csv::export_csv(&selected, output, config.export.csv_separator)?;
            println!("  Exported {} postcard(s) as CSV to {}", selected.len(), output.display());
        }
        _ => {
            anyhow::bail!("Unknown export format '{}'. Supported: txt, csv", format);
        }
    }

    Ok(())
}

/// Run the lookup benchmark and write the results file.
fn cmd_bench(params: &postcards::config::BenchConfig) -> anyhow::Result<()> {
    let total = postcards::bench::sizes(params)?.len() as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Measuring [{bar:40.cyan/blue}] {pos}/{len} sizes ({eta})")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let results = postcards::bench::run(
        params,
        Some(&|current, total| {
            pb.set_length(total);
            pb.set_position(current);
        }),
    )?;
    pb.finish_and_clear();

    postcards::bench::write_results(&results, &params.output)?;

    if let Some(last) = results.last() {
        println!();
        println!("  {:<20} {}", "Sizes measured", results.len());
        println!("  {:<20} {}", "Largest size", last.keys);
        println!("  {:<20} {:.1} ns", "BTreeMap", last.btree_ns);
        println!("  {:<20} {:.1} ns", "HashMap", last.hash_ns);
        println!("  {:<20} {:.1} ns", "Sorted Vec", last.sorted_vec_ns);
        println!("  {:<20} {}", "Results file", params.output.display());
        println!();
    }
    Ok(())
}

/// Print or persist the active configuration.
fn cmd_config(config: &Config, init: bool) -> anyhow::Result<()> {
    if init {
        postcards::config::save_config(config)?;
        if let Some(path) = postcards::config::config_file_path() {
            println!("  Wrote {}", path.display());
        }
    } else {
        print!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "postcards", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Print search results as JSON.
fn print_search_results_json(store: &PostcardStore, results: &[usize]) -> anyhow::Result<()> {
    let items: Vec<serde_json::Value> = results
        .iter()
        .filter_map(|&idx| store.get(idx).map(|p| (idx, p)))
        .map(|(idx, p)| {
            serde_json::json!({
                "index": idx,
                "date": p.date.format("%Y-%m-%d").to_string(),
                "from": p.sender,
                "to": p.receiver,
                "line": p.line(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "result_count": results.len(),
        "results": items,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print statistics in a human-readable table.
fn print_stats_table(
    files: &[PathBuf],
    total_size: u64,
    store: &PostcardStore,
    elapsed: std::time::Duration,
) {
    use humansize::{format_size, BINARY};

    println!();
    for path in files {
        println!("  {:<20} {}", "File", path.display());
    }
    println!("  {:<20} {}", "Total size", format_size(total_size, BINARY));
    println!("  {:<20} {}", "Postcards", store.count());

    if let Some((min, max)) = store.index().date_span() {
        println!(
            "  {:<20} {} — {}",
            "Date range",
            min.format("%Y-%m-%d"),
            max.format("%Y-%m-%d")
        );
    }

    let (dates, senders, receivers) = stats::distinct_keys(store.index());
    println!("  {:<20} {dates} dates, {senders} senders, {receivers} receivers", "Distinct");
    println!("  {:<20} {:.2?}", "Load time", elapsed);

    for (title, top) in [
        ("Top senders", stats::top_senders(store.index(), 10)),
        ("Top receivers", stats::top_receivers(store.index(), 10)),
    ] {
        if !top.is_empty() {
            println!();
            println!("  {title}:");
            for (name, count) in &top {
                println!("    {count:>6}  {name}");
            }
        }
    }
    println!();
}

/// Print statistics as JSON.
fn print_stats_json(
    files: &[PathBuf],
    total_size: u64,
    store: &PostcardStore,
    elapsed: std::time::Duration,
) -> anyhow::Result<()> {
    let date_range = store.index().date_span().map(|(min, max)| {
        serde_json::json!({
            "oldest": min.format("%Y-%m-%d").to_string(),
            "newest": max.format("%Y-%m-%d").to_string(),
        })
    });

    let as_json = |top: Vec<(String, usize)>| -> Vec<serde_json::Value> {
        top.into_iter()
            .map(|(name, count)| serde_json::json!({ "name": name, "count": count }))
            .collect()
    };

    let (dates, senders, receivers) = stats::distinct_keys(store.index());
    let summary = serde_json::json!({
        "files": files.iter().map(|p| p.to_string_lossy()).collect::<Vec<_>>(),
        "total_size": total_size,
        "postcard_count": store.count(),
        "date_range": date_range,
        "distinct_dates": dates,
        "distinct_senders": senders,
        "distinct_receivers": receivers,
        "load_time_ms": elapsed.as_millis(),
        "top_senders": as_json(stats::top_senders(store.index(), 10)),
        "top_receivers": as_json(stats::top_receivers(store.index(), 10)),
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
