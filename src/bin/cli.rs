use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use vlr_dataset::config::{
    ErrorPolicy, Partition, ScoreComparison, ScrapeSettings, SplitSettings, TrainSettings,
    VLR_BASE_URL,
};
use vlr_dataset::pipeline::{run_clean, run_scrape, run_train};
use vlr_dataset::scrapers::HttpFetcher;

/// Build a VALORANT match dataset from vlr.gg and train a win predictor on it
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Region (partition directory) to work in; prompted for if omitted
    #[arg(long, short, global = true, env = "VLR_REGION")]
    region: Option<String>,

    /// Directory holding one subdirectory per region
    #[arg(long, global = true, env = "VLR_DATA_ROOT", default_value = ".")]
    data_root: PathBuf,

    /// Seed for the train/evaluation split and for training
    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect match links and scrape every match into data_set_unfiltered.csv
    Scrape(ScrapeArgs),
    /// Filter the scraped rows and split them into training/evaluation sets
    Clean(SplitArgs),
    /// Train the logistic model on the split datasets
    Train(TrainArgs),
    /// Scrape, clean and train in one go
    Run {
        #[command(flatten)]
        scrape: ScrapeArgs,
        #[command(flatten)]
        split: SplitArgs,
        #[command(flatten)]
        train: TrainArgs,
    },
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    #[arg(long, env = "VLR_BASE_URL", default_value = VLR_BASE_URL)]
    base_url: String,

    /// Matches scraped at the same time
    #[arg(long, env = "VLR_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Days before each match that team stats are averaged over
    #[arg(long, default_value_t = 90)]
    lookback_days: i64,

    #[arg(long, value_enum, default_value_t = ScoreComparison::Lexicographic)]
    score_mode: ScoreComparison,

    /// Abort the run or skip a match when it fails to scrape
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Abort)]
    on_error: ErrorPolicy,

    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(Args, Debug)]
struct SplitArgs {
    #[arg(long, default_value_t = 0.2)]
    eval_fraction: f64,
}

#[derive(Args, Debug)]
struct TrainArgs {
    #[arg(long, default_value_t = 200)]
    epochs: usize,

    #[arg(long, default_value_t = 0.5)]
    learning_rate: f64,

    #[arg(long, default_value_t = 128)]
    batch_size: usize,
}

impl ScrapeArgs {
    fn settings(&self) -> ScrapeSettings {
        ScrapeSettings {
            base_url: self.base_url.clone(),
            lookback_days: self.lookback_days,
            concurrency: self.concurrency,
            score_comparison: self.score_mode,
            error_policy: self.on_error,
            timeout: Duration::from_secs(self.timeout_secs),
            ..ScrapeSettings::default()
        }
    }
}

impl SplitArgs {
    fn settings(&self, seed: u64) -> SplitSettings {
        SplitSettings {
            eval_fraction: self.eval_fraction,
            seed,
        }
    }
}

impl TrainArgs {
    fn settings(&self, seed: u64) -> TrainSettings {
        TrainSettings {
            epochs: self.epochs,
            learning_rate: self.learning_rate,
            batch_size: self.batch_size,
            seed,
        }
    }
}

fn prompt_region() -> Result<String> {
    print!("Insert the region: ");
    std::io::stdout().flush()?;
    let mut region = String::new();
    std::io::stdin()
        .read_line(&mut region)
        .context("Failed to read region")?;
    Ok(region.trim().to_string())
}

async fn scrape(partition: &Partition, args: &ScrapeArgs) -> Result<()> {
    let settings = args.settings();
    let fetcher = HttpFetcher::new(&settings).context("Failed to build HTTP client")?;

    let report = run_scrape(&fetcher, &settings, partition)
        .await
        .context("Scrape failed")?;
    println!(
        "\nScraped {} of {} matches into {}",
        report.rows.len(),
        report.links,
        partition.unfiltered_csv().display()
    );
    if !report.failures.is_empty() {
        println!(
            "{} matches failed, see {}",
            report.failures.len(),
            partition.failures_file().display()
        );
    }
    Ok(())
}

fn clean(partition: &Partition, args: &SplitArgs, seed: u64) -> Result<()> {
    let report = run_clean(partition, &args.settings(seed)).context("Cleaning failed")?;
    println!(
        "Kept {} of {} matches: {} training, {} evaluation",
        report.filtered, report.unfiltered, report.training, report.evaluation
    );
    Ok(())
}

fn train(partition: &Partition, args: &TrainArgs, seed: u64) -> Result<()> {
    let report = run_train(partition, &args.settings(seed)).context("Training failed")?;
    println!("Training:   {}", report.training);
    println!("Evaluation: {}", report.evaluation);
    println!(
        "Weights (a_atk, a_def, b_atk, b_def): {:?}, bias {:.4}",
        report.model.weights, report.model.bias
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let region = match cli.region {
        Some(region) => region,
        None => prompt_region()?,
    };
    let partition = Partition::resolve(&cli.data_root, &region)
        .with_context(|| format!("Cannot use region {region:?}"))?;

    match &cli.command {
        Command::Scrape(args) => scrape(&partition, args).await?,
        Command::Clean(args) => clean(&partition, args, cli.seed)?,
        Command::Train(args) => train(&partition, args, cli.seed)?,
        Command::Run {
            scrape: scrape_args,
            split,
            train: train_args,
        } => {
            scrape(&partition, scrape_args).await?;
            clean(&partition, split, cli.seed)?;
            train(&partition, train_args, cli.seed)?;
        }
    }

    Ok(())
}
