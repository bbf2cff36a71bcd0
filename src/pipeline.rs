use crate::config::{ErrorPolicy, Partition, ScrapeSettings, SplitSettings, TrainSettings};
use crate::error::{Result, ScrapeError};
use crate::models::{FeatureRow, MatchFailure, MatchRow};
use crate::scrapers::vlr_match::extract_info_match;
use crate::scrapers::vlr_tournament::extract_match_links;
use crate::scrapers::PageFetcher;
use crate::utils::classifier::{evaluate, train_logistic, Evaluation, LogisticModel};
use crate::utils::data::{
    append_match_links, read_match_links, read_rows, read_tournament_urls, reset_links_file,
    save_failures, write_rows,
};
use crate::utils::dataset::{clean_partition, CleanReport};
use futures::stream::{self, StreamExt};

/// Everything a scrape produced, in link order
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub links: usize,
    pub rows: Vec<MatchRow>,
    pub failures: Vec<MatchFailure>,
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub model: LogisticModel,
    pub training: Evaluation,
    pub evaluation: Evaluation,
}

/// Rebuild the partition's link file from its tournament list and return
/// every link in it. Duplicates across tournaments are kept.
pub async fn collect_match_links<F>(
    fetcher: &F,
    settings: &ScrapeSettings,
    partition: &Partition,
) -> Result<Vec<String>>
where
    F: PageFetcher + ?Sized,
{
    let tournaments = read_tournament_urls(&partition.require_tournaments()?)?;
    let links_file = partition.links_file();
    reset_links_file(&links_file)?;

    for tournament_url in &tournaments {
        let hrefs = extract_match_links(fetcher, tournament_url).await?;
        let urls: Vec<String> = hrefs.iter().map(|h| settings.absolute_url(h)).collect();
        tracing::info!("{}: {} matches", tournament_url, urls.len());
        append_match_links(&links_file, &urls)?;
    }

    read_match_links(&links_file)
}

/// Scrape every match, at most `settings.concurrency` at a time. Rows come
/// back in the same order as `links`.
pub async fn scrape_matches<F>(
    fetcher: &F,
    settings: &ScrapeSettings,
    links: &[String],
) -> Result<ScrapeReport>
where
    F: PageFetcher + ?Sized,
{
    let total = links.len();
    let mut report = ScrapeReport {
        links: total,
        ..Default::default()
    };

    let mut results = stream::iter(links)
        .map(|url| async move { (url, extract_info_match(fetcher, settings, url).await) })
        .buffered(settings.concurrency.max(1));

    let mut done = 0usize;
    while let Some((url, result)) = results.next().await {
        done += 1;
        match result {
            Ok(row) => report.rows.push(row),
            Err(e) => match settings.error_policy {
                ErrorPolicy::Abort => {
                    return Err(ScrapeError::MatchFailed {
                        url: url.clone(),
                        source: Box::new(e),
                    })
                }
                ErrorPolicy::Skip => {
                    tracing::warn!("Skipping {}: {}", url, e);
                    report.failures.push(MatchFailure {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                }
            },
        }
        println!("Progress: {:.2}%", done as f64 / total as f64 * 100.0);
    }

    Ok(report)
}

/// Collect links, scrape every match and write `data_set_unfiltered.csv`
pub async fn run_scrape<F>(
    fetcher: &F,
    settings: &ScrapeSettings,
    partition: &Partition,
) -> Result<ScrapeReport>
where
    F: PageFetcher + ?Sized,
{
    let links = collect_match_links(fetcher, settings, partition).await?;
    tracing::info!(
        "Scraping {} matches for region {}",
        links.len(),
        partition.region()
    );

    let report = scrape_matches(fetcher, settings, &links).await?;
    write_rows(&partition.unfiltered_csv(), &report.rows)?;

    if !report.failures.is_empty() {
        save_failures(&partition.failures_file(), &report.failures)?;
        tracing::warn!(
            "{} matches failed, see {}",
            report.failures.len(),
            partition.failures_file().display()
        );
    }

    Ok(report)
}

/// Clean the unfiltered dataset and split it into training and evaluation files
pub fn run_clean(partition: &Partition, settings: &SplitSettings) -> Result<CleanReport> {
    clean_partition(partition, settings)
}

/// Train on `training_dataset.csv` and score against `evaluation_dataset.csv`
pub fn run_train(partition: &Partition, settings: &TrainSettings) -> Result<TrainReport> {
    let training: Vec<FeatureRow> = read_rows(&partition.training_csv())?;
    let evaluation: Vec<FeatureRow> = read_rows(&partition.evaluation_csv())?;

    let model = train_logistic(&training, settings)?;
    Ok(TrainReport {
        training: evaluate(&model, &training),
        evaluation: evaluate(&model, &evaluation),
        model,
    })
}
