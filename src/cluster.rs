//! Genre clustering: picks `k` representative songs from one genre.
//!
//! A k-medoids variant of k-means. Song features include a categorical genre
//! term that has no meaningful average, so each cluster is represented by its
//! medoid (the member with the lowest average distance to the others) rather
//! than a synthetic centroid.

use crate::similarity::{TEMPO_RANGE, YEAR_RANGE};
use crate::song::Song;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Clustering limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Assignment/update rounds before giving up on convergence.
    pub max_rounds: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self { max_rounds: 100 }
    }
}

/// Feature distance: genre mismatch + |Δyear|/100 + |Δtempo|/200 + |Δenergy|.
#[must_use]
pub fn distance(a: &Song, b: &Song) -> f64 {
    let genre = if a.genre() == b.genre() { 0.0 } else { 1.0 };
    let year = f64::from(a.release_year().abs_diff(b.release_year())) / YEAR_RANGE;
    let tempo = (a.tempo() - b.tempo()).abs() / TEMPO_RANGE;
    let energy = (a.energy() - b.energy()).abs();
    genre + year + tempo + energy
}

/// One cluster during a clustering call.
#[derive(Debug, Clone)]
pub struct Cluster<'a> {
    pub representative: &'a Song,
    pub members: Vec<&'a Song>,
}

impl<'a> Cluster<'a> {
    fn new(representative: &'a Song) -> Self {
        Self {
            representative,
            members: Vec::new(),
        }
    }

    /// Replaces the representative with the members' medoid.
    /// Returns whether it changed. Empty clusters keep their representative.
    fn update_representative(&mut self) -> bool {
        let Some(medoid) = medoid(&self.members) else {
            return false;
        };
        let changed = medoid.id() != self.representative.id();
        self.representative = medoid;
        changed
    }
}

/// Member with the lowest average distance to the other members; the first
/// such member on ties. A lone member has average distance 0.
#[must_use]
pub fn medoid<'a>(members: &[&'a Song]) -> Option<&'a Song> {
    let mut best: Option<(&Song, f64)> = None;
    for (i, candidate) in members.iter().enumerate() {
        let total: f64 = members
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, other)| distance(candidate, other))
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let average = if members.len() > 1 { total / (members.len() - 1) as f64 } else { 0.0 };

        if best.map_or(true, |(_, best_average)| average < best_average) {
            best = Some((candidate, average));
        }
    }
    best.map(|(song, _)| song)
}

fn nearest(song: &Song, clusters: &[Cluster<'_>]) -> usize {
    let mut nearest = 0;
    let mut min_distance = f64::INFINITY;
    for (i, cluster) in clusters.iter().enumerate() {
        let d = distance(song, cluster.representative);
        if d < min_distance {
            min_distance = d;
            nearest = i;
        }
    }
    nearest
}

/// Up to `k` representative songs of `genre`.
///
/// When the genre has at most `k` songs they are returned as they are, in
/// catalog order. Otherwise `k` distinct seeds are drawn from `rng` and the
/// assign/update loop runs until no representative moves or
/// `config.max_rounds` is reached.
pub fn cluster_genre<R: Rng + ?Sized>(
    catalog: &[Song],
    genre: &str,
    k: usize,
    config: &ClusterConfig,
    rng: &mut R,
) -> Vec<Song> {
    let songs: Vec<&Song> = catalog.iter().filter(|song| song.genre() == genre).collect();
    if songs.len() <= k {
        log::debug!("Genre `{genre}' has {} songs, no clustering needed", songs.len());
        return songs.into_iter().cloned().collect();
    }

    let mut clusters: Vec<Cluster<'_>> = index::sample(rng, songs.len(), k)
        .into_iter()
        .map(|i| Cluster::new(songs[i]))
        .collect();

    for round in 0..config.max_rounds {
        for cluster in &mut clusters {
            cluster.members.clear();
        }
        for song in &songs {
            let target = nearest(song, &clusters);
            clusters[target].members.push(song);
        }

        let mut changed = false;
        for cluster in &mut clusters {
            changed |= cluster.update_representative();
        }
        if !changed {
            log::debug!("Clustering `{genre}' converged after {} rounds", round + 1);
            break;
        }
    }

    clusters
        .into_iter()
        .map(|cluster| cluster.representative.clone())
        .collect()
}
