use crate::config::TrainSettings;
use crate::error::{Result, ScrapeError};
use crate::models::FeatureRow;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;

const N_FEATURES: usize = 4;
// Win rates are percentages; the model sees them in [0, 1]
const FEATURE_SCALE: f64 = 100.0;
const EPSILON: f64 = 1e-7;

/// Single dense layer with a sigmoid output
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    pub weights: [f64; N_FEATURES],
    pub bias: f64,
}

/// Loss and accuracy over a dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub loss: f64,
    pub accuracy: f64,
    pub samples: usize,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "loss {:.4}, accuracy {:.1}% over {} matches",
            self.loss,
            self.accuracy * 100.0,
            self.samples
        )
    }
}

impl LogisticModel {
    fn zeros() -> Self {
        Self {
            weights: [0.0; N_FEATURES],
            bias: 0.0,
        }
    }

    /// Probability that team A wins
    pub fn predict(&self, row: &FeatureRow) -> f64 {
        let z = scaled(row)
            .iter()
            .zip(self.weights.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.bias;
        sigmoid(z)
    }
}

fn scaled(row: &FeatureRow) -> [f64; N_FEATURES] {
    row.features().map(|x| x / FEATURE_SCALE)
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn binary_cross_entropy(prob: f64, label: f64) -> f64 {
    let p = prob.clamp(EPSILON, 1.0 - EPSILON);
    -(label * p.ln() + (1.0 - label) * (1.0 - p).ln())
}

/// Fit a logistic model with shuffled mini-batch gradient descent
pub fn train_logistic(rows: &[FeatureRow], settings: &TrainSettings) -> Result<LogisticModel> {
    if rows.is_empty() {
        return Err(ScrapeError::EmptyDataset("no training rows".to_string()));
    }

    let batch_size = settings.batch_size.max(1);
    let mut model = LogisticModel::zeros();
    let mut order: Vec<usize> = (0..rows.len()).collect();
    let mut rng = StdRng::seed_from_u64(settings.seed);

    for epoch in 0..settings.epochs {
        order.shuffle(&mut rng);

        for batch in order.chunks(batch_size) {
            let mut grad_w = [0.0; N_FEATURES];
            let mut grad_b = 0.0;

            for &i in batch {
                let row = &rows[i];
                let error = model.predict(row) - row.team_a_won as f64;
                for (g, x) in grad_w.iter_mut().zip(scaled(row)) {
                    *g += error * x;
                }
                grad_b += error;
            }

            let step = settings.learning_rate / batch.len() as f64;
            for (w, g) in model.weights.iter_mut().zip(grad_w) {
                *w -= step * g;
            }
            model.bias -= step * grad_b;
        }

        if (epoch + 1) % 50 == 0 {
            tracing::debug!("Epoch {}: {}", epoch + 1, evaluate(&model, rows));
        }
    }

    Ok(model)
}

/// Mean binary cross-entropy and accuracy at a 0.5 threshold
pub fn evaluate(model: &LogisticModel, rows: &[FeatureRow]) -> Evaluation {
    if rows.is_empty() {
        return Evaluation {
            loss: 0.0,
            accuracy: 0.0,
            samples: 0,
        };
    }

    let mut loss = 0.0;
    let mut correct = 0usize;
    for row in rows {
        let prob = model.predict(row);
        let label = row.team_a_won as f64;
        loss += binary_cross_entropy(prob, label);
        if (prob >= 0.5) == (row.team_a_won == 1) {
            correct += 1;
        }
    }

    Evaluation {
        loss: loss / rows.len() as f64,
        accuracy: correct as f64 / rows.len() as f64,
        samples: rows.len(),
    }
}
