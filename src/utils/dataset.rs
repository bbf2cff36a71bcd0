use crate::config::{Partition, SplitSettings};
use crate::error::{Result, ScrapeError};
use crate::models::{FeatureRow, MatchRow};
use crate::utils::data::{read_rows, write_rows};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row counts from a clean + split pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    pub unfiltered: usize,
    pub filtered: usize,
    pub training: usize,
    pub evaluation: usize,
}

/// A row is unusable when either team has no attack and no defense data
pub fn is_degenerate(row: &MatchRow) -> bool {
    row.team_a().has_no_side_data() || row.team_b().has_no_side_data()
}

/// Drop degenerate rows and keep only the model's feature columns
pub fn clean(rows: &[MatchRow]) -> Vec<FeatureRow> {
    rows.iter()
        .filter(|row| !is_degenerate(row))
        .map(FeatureRow::from)
        .collect()
}

/// Shuffle with a seeded RNG and hold out `ceil(len * eval_fraction)` rows.
/// Returns `(training, evaluation)`.
pub fn split<T: Clone>(rows: &[T], eval_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let eval_fraction = eval_fraction.clamp(0.0, 1.0);
    let n_eval = (rows.len() as f64 * eval_fraction).ceil() as usize;

    let mut shuffled = rows.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let training = shuffled.split_off(n_eval);
    (training, shuffled)
}

/// Clean the partition's unfiltered dataset and write the filtered, training
/// and evaluation files under `data_sets/`
pub fn clean_partition(partition: &Partition, settings: &SplitSettings) -> Result<CleanReport> {
    let unfiltered_path = partition.unfiltered_csv();
    if !unfiltered_path.is_file() {
        return Err(ScrapeError::EmptyDataset(format!(
            "{} not found, run a scrape first",
            unfiltered_path.display()
        )));
    }

    let rows: Vec<MatchRow> = read_rows(&unfiltered_path)?;
    let filtered = clean(&rows);
    tracing::info!(
        "Kept {} of {} matches for region {}",
        filtered.len(),
        rows.len(),
        partition.region()
    );

    std::fs::create_dir_all(partition.data_sets_dir())?;
    write_rows(&partition.filtered_csv(), &filtered)?;

    let (training, evaluation) = split(&filtered, settings.eval_fraction, settings.seed);
    write_rows(&partition.training_csv(), &training)?;
    write_rows(&partition.evaluation_csv(), &evaluation)?;

    Ok(CleanReport {
        unfiltered: rows.len(),
        filtered: filtered.len(),
        training: training.len(),
        evaluation: evaluation.len(),
    })
}
