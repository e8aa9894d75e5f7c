//! Latent-factor recommender trained with stochastic gradient descent.
//!
//! [`train`] fits per-user and per-song factor vectors plus bias terms to a
//! [`RatingMatrix`]; [`LatentFactorModel::predict`] reads the fitted model.
//! The two are kept apart so each can be tested on its own.
//!
//! ```text
//! prediction(u, s) = global + user_bias[u] + song_bias[s] + <user_factors[u], song_factors[s]>
//! ```
//!
//! Training cost is `O(iterations × |ratings| × num_factors)` and is by far
//! the heaviest path in the crate. Updates are applied strictly in order, so
//! the same ratings, config and seed always produce the same model.

use crate::algorithm::{self, penalize_skipped};
use crate::ratings::RatingMatrix;
use crate::song::{SongId, UserId};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// SGD hyper-parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorizationConfig {
    pub num_factors: usize,
    pub learning_rate: f64,
    pub bias_learning_rate: f64,
    pub regularization: f64,
    /// Epochs. Lower it to bound training time.
    pub iterations: usize,
    /// Multiplier applied to both learning rates after every epoch.
    pub decay: f64,
}

impl Default for FactorizationConfig {
    fn default() -> Self {
        Self {
            num_factors: 10,
            learning_rate: 0.01,
            bias_learning_rate: 0.005,
            regularization: 0.01,
            iterations: 100,
            decay: 0.9,
        }
    }
}

/// Row-major matrix; every row has exactly `columns` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorMatrix {
    columns: usize,
    values: Vec<f64>,
}

impl FactorMatrix {
    /// Entries drawn uniformly from `[0, 0.1)`, row by row.
    fn random<R: Rng + ?Sized>(rows: usize, columns: usize, rng: &mut R) -> Self {
        let values = (0..rows * columns).map(|_| 0.1 * rng.gen::<f64>()).collect();
        Self { columns, values }
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        match self.columns {
            0 => 0,
            columns => self.values.len() / columns,
        }
    }

    #[must_use]
    pub fn row(&self, index: usize) -> &[f64] {
        &self.values[index * self.columns..(index + 1) * self.columns]
    }

    fn row_mut(&mut self, index: usize) -> &mut [f64] {
        &mut self.values[index * self.columns..(index + 1) * self.columns]
    }
}

/// A fitted model. Produced by one [`train`] call and read-only afterwards.
#[derive(Debug, Clone)]
pub struct LatentFactorModel {
    user_index: HashMap<UserId, usize>,
    song_index: HashMap<SongId, usize>,
    user_factors: FactorMatrix,
    song_factors: FactorMatrix,
    user_bias: Vec<f64>,
    song_bias: Vec<f64>,
    global_bias: f64,
}

impl LatentFactorModel {
    #[must_use]
    pub fn knows_user(&self, user_id: UserId) -> bool {
        self.user_index.contains_key(&user_id)
    }

    #[must_use]
    pub fn global_bias(&self) -> f64 {
        self.global_bias
    }

    #[must_use]
    pub fn user_factors(&self) -> &FactorMatrix {
        &self.user_factors
    }

    #[must_use]
    pub fn song_factors(&self) -> &FactorMatrix {
        &self.song_factors
    }

    /// Predicted rating. A user or song the model never saw contributes a
    /// zero bias and a zero factor vector.
    #[must_use]
    pub fn predict(&self, user_id: UserId, song_id: SongId) -> f64 {
        let user = self.user_index.get(&user_id).copied();
        let song = self.song_index.get(&song_id).copied();

        let mut prediction = self.global_bias;
        if let Some(u) = user {
            prediction += self.user_bias[u];
        }
        if let Some(s) = song {
            prediction += self.song_bias[s];
        }
        if let (Some(u), Some(s)) = (user, song) {
            prediction += dot(self.user_factors.row(u), self.song_factors.row(s));
        }
        prediction
    }

    fn predict_indexed(&self, u: usize, s: usize) -> f64 {
        self.global_bias
            + self.user_bias[u]
            + self.song_bias[s]
            + dot(self.user_factors.row(u), self.song_factors.row(s))
    }

    /// Root mean squared error over `ratings`; 0.0 when there are none.
    #[must_use]
    pub fn rmse(&self, ratings: &RatingMatrix) -> f64 {
        let (sum, count) = ratings
            .iter()
            .flat_map(|(user_id, songs)| songs.iter().map(move |(song_id, rating)| (*user_id, *song_id, *rating)))
            .fold((0.0, 0_usize), |(sum, count), (user_id, song_id, rating)| {
                let error = rating - self.predict(user_id, song_id);
                (sum + error * error, count + 1)
            });
        #[allow(clippy::cast_precision_loss)]
        let rmse = if count == 0 { 0.0 } else { (sum / count as f64).sqrt() };
        rmse
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn mean_rating(ratings: &RatingMatrix) -> f64 {
    let (sum, count) = ratings
        .values()
        .flat_map(BTreeMap::values)
        .fold((0.0, 0_usize), |(sum, count), rating| (sum + rating, count + 1));
    #[allow(clippy::cast_precision_loss)]
    let mean = if count == 0 { 0.0 } else { sum / count as f64 };
    mean
}

/// Fits a model to `ratings`.
///
/// Factors start uniform in `[0, 0.1)` (users ascending, then songs
/// ascending, drawn from `rng`), biases at zero, and the global bias at the
/// mean rating. Each epoch walks the ratings in the matrix's natural order
/// (user ascending, song ascending) and updates biases then factors, each
/// factor update using the other side's value from before the step. Both
/// learning rates are multiplied by `config.decay` after every epoch.
///
/// Always runs `config.iterations` epochs; the error trend is only logged.
pub fn train<R: Rng + ?Sized>(ratings: &RatingMatrix, config: &FactorizationConfig, rng: &mut R) -> LatentFactorModel {
    let users: Vec<UserId> = ratings.keys().copied().collect();
    let songs: BTreeSet<SongId> = ratings.values().flat_map(BTreeMap::keys).copied().collect();

    let user_index: HashMap<UserId, usize> = users.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let song_index: HashMap<SongId, usize> = songs.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let user_factors = FactorMatrix::random(users.len(), config.num_factors, rng);
    let song_factors = FactorMatrix::random(songs.len(), config.num_factors, rng);

    let mut model = LatentFactorModel {
        user_bias: vec![0.0; users.len()],
        song_bias: vec![0.0; songs.len()],
        global_bias: mean_rating(ratings),
        user_index,
        song_index,
        user_factors,
        song_factors,
    };

    // Flattened once so every epoch sees the same order without map lookups.
    let samples: Vec<(usize, usize, f64)> = ratings
        .iter()
        .flat_map(|(user_id, songs)| {
            let u = model.user_index[user_id];
            let song_index = &model.song_index;
            songs.iter().map(move |(song_id, rating)| (u, song_index[song_id], *rating))
        })
        .collect();

    log::debug!(
        "Training latent factors: {} users, {} songs, {} ratings, {} epochs",
        users.len(),
        songs.len(),
        samples.len(),
        config.iterations
    );

    let mut learning_rate = config.learning_rate;
    let mut bias_learning_rate = config.bias_learning_rate;
    let reg = config.regularization;

    for epoch in 0..config.iterations {
        let mut squared_error = 0.0;

        for &(u, s, rating) in &samples {
            let error = rating - model.predict_indexed(u, s);
            squared_error += error * error;

            model.user_bias[u] += bias_learning_rate * (error - reg * model.user_bias[u]);
            model.song_bias[s] += bias_learning_rate * (error - reg * model.song_bias[s]);

            let user_row = model.user_factors.row_mut(u);
            let song_row = model.song_factors.row_mut(s);
            for (p, q) in user_row.iter_mut().zip(song_row.iter_mut()) {
                let (user_value, song_value) = (*p, *q);
                *p += learning_rate * (error * song_value - reg * user_value);
                *q += learning_rate * (error * user_value - reg * song_value);
            }
        }

        learning_rate *= config.decay;
        bias_learning_rate *= config.decay;

        if !samples.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let rmse = (squared_error / samples.len() as f64).sqrt();
            log::trace!("Epoch {epoch}: rmse {rmse:.4}");
        }
    }

    model
}

/// Top `limit` of `candidates` the user has not rated yet, by predicted
/// rating. Skipped songs are scaled down by the skip penalty. A user the
/// model does not know gets nothing.
#[must_use]
pub fn recommend(
    model: &LatentFactorModel,
    ratings: &RatingMatrix,
    skipped: &BTreeSet<SongId>,
    candidates: &[SongId],
    user_id: UserId,
    limit: usize,
) -> Vec<SongId> {
    if !model.knows_user(user_id) {
        log::debug!("User `{user_id}' unknown to the factor model");
        return Vec::new();
    }

    let rated = ratings.get(&user_id);
    let scored: Vec<(SongId, f64)> = candidates
        .par_iter()
        .filter(|&&song_id| !rated.is_some_and(|songs| songs.contains_key(&song_id)))
        .map(|&song_id| {
            let predicted = model.predict(user_id, song_id);
            (song_id, penalize_skipped(predicted, skipped.contains(&song_id)))
        })
        .collect();

    algorithm::top_ids(scored, limit)
}
