use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use trendlex_core::{
    ApiKey, DocumentVariant, PipelineConfig, ProcessedSchema, Table,
    config::MUSIC_CATEGORY_ID,
    dataset::require_latest_raw_csv,
    explore, format_exploration_report, format_fetch_summary, format_figure_summary,
    format_preprocess_summary, format_training_outcome, run_fetch, run_figures, run_preprocess,
    run_training,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for ProcessedSchema (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliSchema {
    #[default]
    Dual,
    Single,
}

impl From<CliSchema> for ProcessedSchema {
    fn from(cli: CliSchema) -> Self {
        match cli {
            CliSchema::Dual => ProcessedSchema::Dual,
            CliSchema::Single => ProcessedSchema::Single,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliVariant {
    #[default]
    Promo,
    Semantic,
}

impl From<CliVariant> for DocumentVariant {
    fn from(cli: CliVariant) -> Self {
        match cli {
            CliVariant::Promo => DocumentVariant::Promo,
            CliVariant::Semantic => DocumentVariant::Semantic,
        }
    }
}

#[derive(Parser)]
#[command(name = "trendlex")]
#[command(about = "Fetch, clean, chart and model YouTube trending video metadata")]
struct Cli {
    /// Project root holding data/, figures/ and assets/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Category id to keep (10 is Music)
    #[arg(long, global = true, default_value = MUSIC_CATEGORY_ID)]
    category: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download trending videos into a timestamped raw CSV
    Fetch {
        /// Comma-separated region codes
        #[arg(long, value_delimiter = ',', default_value = "US")]
        regions: Vec<String>,

        /// Videos to collect per region before filtering
        #[arg(long, default_value_t = 200)]
        per_region: usize,
    },
    /// Clean, tokenize and label the latest raw CSV
    Preprocess {
        #[arg(long, value_enum, default_value_t = CliSchema::Dual)]
        schema: CliSchema,

        /// Raw CSV to read instead of the latest one
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print descriptive statistics for a raw or processed CSV
    Explore {
        /// CSV to describe; defaults to the latest raw CSV
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Render the figure set of a processed dataset
    Figures {
        #[arg(long, value_enum, default_value_t = CliSchema::Dual)]
        schema: CliSchema,
    },
    /// Train the bag-of-words high_views classifier
    Train {
        #[arg(long, value_enum, default_value_t = CliSchema::Dual)]
        schema: CliSchema,

        /// Document form to train on (dual schema only)
        #[arg(long, value_enum, default_value_t = CliVariant::Promo)]
        variant: CliVariant,
    },
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .expect("static spinner template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn done(spinner: &ProgressBar, what: String, started: Instant) {
    spinner.finish_with_message(format!(
        "{} {} {}",
        style("✓").green().bold(),
        what,
        style(format!("[{}]", format_duration(started.elapsed()))).dim()
    ));
}

/// Clear the spinner when a stage fails so the error prints on a clean line
fn clear_on_err<T, E>(spinner: &ProgressBar, result: Result<T, E>) -> Result<T, E> {
    if result.is_err() {
        spinner.finish_and_clear();
    }
    result
}

fn print_files(files: &[PathBuf]) {
    for file in files {
        println!("  {}", style(file.display()).dim());
    }
}

fn header(title: &str) {
    println!(
        "\n{}  {}\n",
        style("trendlex").cyan().bold(),
        style(title).dim()
    );
    println!("{}", style("─".repeat(60)).dim());
}

async fn fetch(cfg: &PipelineConfig) -> Result<()> {
    // Validate API key early
    let api_key = match ApiKey::from_env() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    header("Fetch trending videos");
    let started = Instant::now();
    let spinner = create_spinner(&format!(
        "Fetching {} trending videos...",
        cfg.fetch.regions.join(", ")
    ));
    let (path, summary) = clear_on_err(&spinner, run_fetch(cfg, api_key).await)?;
    done(
        &spinner,
        format!(
            "Saved {} videos: {}",
            summary.kept,
            style(path.display()).dim()
        ),
        started,
    );
    print!("{}", format_fetch_summary(&summary));
    Ok(())
}

fn preprocess(cfg: &PipelineConfig, schema: ProcessedSchema, input: Option<&Path>) -> Result<()> {
    header("Build processed dataset");
    let started = Instant::now();
    let spinner = create_spinner("Cleaning and tokenizing...");
    let summary = clear_on_err(&spinner, run_preprocess(cfg, schema, input))?;
    done(
        &spinner,
        format!(
            "Processed {}: {}",
            style(summary.raw_path.display()).dim(),
            style(summary.output_path.display()).dim()
        ),
        started,
    );
    print!("{}", format_preprocess_summary(&summary));
    Ok(())
}

fn explore_csv(cfg: &PipelineConfig, input: Option<PathBuf>) -> Result<()> {
    header("Explore dataset");
    let path = match input {
        Some(path) => path,
        None => require_latest_raw_csv(&cfg.paths.raw_dir)?,
    };
    println!("{} Loading {}", style("✓").green().bold(), path.display());
    let table = Table::read(&path)?;
    let report = explore(&table)?;
    println!();
    print!("{}", format_exploration_report(&report));
    Ok(())
}

fn figures(cfg: &PipelineConfig, schema: ProcessedSchema) -> Result<()> {
    header("Render figures");
    let started = Instant::now();
    let spinner = create_spinner("Rendering figures...");
    let summary = clear_on_err(&spinner, run_figures(cfg, schema))?;
    done(
        &spinner,
        format!(
            "Saved {} figures to {}",
            summary.files.len(),
            style(cfg.paths.figures_dir.display()).dim()
        ),
        started,
    );
    print_files(&summary.files);
    println!("\n{}", style("=== SUMMARY ===").bold());
    print!("{}", format_figure_summary(&summary));
    Ok(())
}

fn train(cfg: &PipelineConfig, schema: ProcessedSchema, variant: DocumentVariant) -> Result<()> {
    header("Train classifier");
    let started = Instant::now();
    let spinner = create_spinner("Fitting bag-of-words logistic regression...");
    let outcome = clear_on_err(&spinner, run_training(cfg, schema, variant))?;
    done(
        &spinner,
        format!("Trained (AUC {:.3})", outcome.evaluation.auc),
        started,
    );
    print_files(&outcome.figures);
    println!();
    print!("{}", format_training_outcome(&outcome));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,trendlex=info,trendlex_core=info"),
    )
    .init();

    let cli = Cli::parse();
    let mut cfg = PipelineConfig::with_root(&cli.root);
    cfg.category_id = cli.category;
    if let Command::Fetch {
        regions,
        per_region,
    } = &cli.command
    {
        cfg.fetch.regions = regions.iter().map(|r| r.trim().to_uppercase()).collect();
        cfg.fetch.per_region_target = *per_region;
    }
    cfg.validate()?;

    let total_start = Instant::now();
    match cli.command {
        Command::Fetch { .. } => fetch(&cfg).await?,
        Command::Preprocess { schema, input } => preprocess(&cfg, schema.into(), input.as_deref())?,
        Command::Explore { input } => explore_csv(&cfg, input)?,
        Command::Figures { schema } => figures(&cfg, schema.into())?,
        Command::Train { schema, variant } => train(&cfg, schema.into(), variant.into())?,
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{} Done in {}",
        style("✓").green().bold(),
        style(format_duration(total_start.elapsed())).cyan()
    );
    Ok(())
}
