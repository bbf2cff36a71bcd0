use crate::error::{Result, ScrapeError};
use clap::ValueEnum;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

pub const VLR_BASE_URL: &str = "https://www.vlr.gg";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// How the two map scores on a match page are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ScoreComparison {
    /// Compare the score text as strings ("9" beats "10")
    #[default]
    Lexicographic,
    /// Parse both scores as integers
    Numeric,
}

/// What to do when a single match fails to scrape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ErrorPolicy {
    /// Stop the whole run on the first failure
    #[default]
    Abort,
    /// Log the failure, record it and keep going
    Skip,
}

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub base_url: String,
    pub lookback_days: i64,
    pub concurrency: usize,
    pub score_comparison: ScoreComparison,
    pub error_policy: ErrorPolicy,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            base_url: VLR_BASE_URL.to_string(),
            lookback_days: 90,
            concurrency: 4,
            score_comparison: ScoreComparison::default(),
            error_policy: ErrorPolicy::default(),
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ScrapeSettings {
    /// Resolve a link from the site into an absolute URL
    pub fn absolute_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                href.trim_start_matches('/')
            )
        }
    }
}

#[derive(Debug, Clone)]
pub struct SplitSettings {
    pub eval_fraction: f64,
    pub seed: u64,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            eval_fraction: 0.2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainSettings {
    pub epochs: usize,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub seed: u64,
}

impl Default for TrainSettings {
    fn default() -> Self {
        Self {
            epochs: 200,
            learning_rate: 0.5,
            batch_size: 128,
            seed: 42,
        }
    }
}

/// A region directory holding every file of one scraping run
#[derive(Debug, Clone)]
pub struct Partition {
    region: String,
    root: PathBuf,
}

impl Partition {
    /// Resolve `region` under `data_root`. The label must be a single plain
    /// directory name and the directory must already exist.
    pub fn resolve(data_root: impl AsRef<Path>, region: &str) -> Result<Self> {
        let region = region.trim();
        if region.is_empty() {
            return Err(ScrapeError::InvalidPartition("region is empty".to_string()));
        }

        let mut components = Path::new(region).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => {
                return Err(ScrapeError::InvalidPartition(format!(
                    "{region:?} is not a plain directory name"
                )))
            }
        }

        let root = data_root.as_ref().join(region);
        if !root.is_dir() {
            return Err(ScrapeError::InvalidPartition(format!(
                "{} does not exist",
                root.display()
            )));
        }

        Ok(Self {
            region: region.to_string(),
            root,
        })
    }

    /// Check the tournament list exists before a scrape
    pub fn require_tournaments(&self) -> Result<PathBuf> {
        let path = self.tournaments_file();
        if !path.is_file() {
            return Err(ScrapeError::InvalidPartition(format!(
                "{} not found",
                path.display()
            )));
        }
        Ok(path)
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn tournaments_file(&self) -> PathBuf {
        self.root.join("tournaments.txt")
    }

    pub fn links_file(&self) -> PathBuf {
        self.root.join("matchesLinks.txt")
    }

    pub fn unfiltered_csv(&self) -> PathBuf {
        self.root.join("data_set_unfiltered.csv")
    }

    pub fn failures_file(&self) -> PathBuf {
        self.root.join("scrape_failures.json")
    }

    pub fn data_sets_dir(&self) -> PathBuf {
        self.root.join("data_sets")
    }

    pub fn filtered_csv(&self) -> PathBuf {
        self.data_sets_dir().join("data_set_filtered.csv")
    }

    pub fn training_csv(&self) -> PathBuf {
        self.data_sets_dir().join("training_dataset.csv")
    }

    pub fn evaluation_csv(&self) -> PathBuf {
        self.data_sets_dir().join("evaluation_dataset.csv")
    }
}
