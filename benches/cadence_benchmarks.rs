//! # Cadence Performance Benchmarks
//!
//! ## Benchmark Categories
//!
//! - **Training**: SGD epochs over rating matrices of growing size
//! - **Recommendation**: collaborative filtering and content similarity
//! - **Search**: trie build, autocomplete and fuzzy matching
//!
//! ```bash
//! cargo bench
//! cargo bench search
//! ```

use cadence::collaborative::CollaborativeFilter;
use cadence::factorization::{self, FactorizationConfig};
use cadence::ratings;
use cadence::search::{self, Trie};
use cadence::similarity;
use cadence::song::{InteractionEvent, MembershipEdge, Song};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::hint::black_box;

const GENRES: [&str; 5] = ["rock", "jazz", "pop", "metal", "folk"];

fn create_test_songs(count: i64, rng: &mut StdRng) -> Vec<Song> {
    (1..=count)
        .map(|id| {
            Song::new(
                id,
                format!("Track {id}"),
                format!("Band {}", id % 97),
                GENRES[rng.gen_range(0..GENRES.len())],
                rng.gen_range(1960..2024),
                rng.gen_range(60.0..200.0),
                rng.gen_range(0.0..=1.0),
                rng.gen_range(120..420),
            )
            .expect("valid song")
        })
        .collect()
}

fn create_history(users: i64, songs: i64, rng: &mut StdRng) -> (Vec<MembershipEdge>, Vec<InteractionEvent>) {
    let mut memberships = Vec::new();
    let mut interactions = Vec::new();
    for user_id in 1..=users {
        for _ in 0..20 {
            memberships.push(MembershipEdge {
                user_id,
                song_id: rng.gen_range(1..=songs),
            });
        }
        for step in 0..30 {
            let song_id = rng.gen_range(1..=songs);
            let event = match rng.gen_bool(0.7) {
                true => InteractionEvent::completed(user_id, song_id),
                false => InteractionEvent::skipped(user_id, song_id, 20_000, 200_000),
            };
            interactions.push(event.at(step));
        }
    }
    (memberships, interactions)
}

fn benchmark_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10);
    let mut rng = StdRng::seed_from_u64(1);
    let config = FactorizationConfig {
        iterations: 20,
        ..FactorizationConfig::default()
    };

    for users in [10, 100, 500] {
        let (memberships, interactions) = create_history(users, 2000, &mut rng);
        let matrix = ratings::build_ratings(&memberships, &interactions);

        group.bench_with_input(BenchmarkId::new("sgd_20_epochs", users), &matrix, |b, matrix| {
            b.iter_batched(
                || StdRng::seed_from_u64(7),
                |mut rng| factorization::train(black_box(matrix), &config, &mut rng),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn benchmark_recommendation(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommendation");
    let mut rng = StdRng::seed_from_u64(2);
    let songs = create_test_songs(5000, &mut rng);
    let (memberships, interactions) = create_history(500, 5000, &mut rng);

    group.bench_function("build_ratings", |b| {
        b.iter(|| ratings::build_ratings(black_box(&memberships), black_box(&interactions)))
    });

    let graph = ratings::build_graph(&memberships, &interactions);
    let skipped = BTreeSet::new();
    group.bench_function("collaborative_scores", |b| {
        let filter = CollaborativeFilter::new(&graph, &skipped);
        b.iter(|| filter.scores(black_box(42)))
    });

    group.bench_function("similar_5000_songs", |b| {
        b.iter(|| similarity::similar(black_box(&songs), black_box(2500), 10))
    });

    group.finish();
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let mut rng = StdRng::seed_from_u64(3);

    for size in [100, 1000, 10_000] {
        let songs = create_test_songs(size, &mut rng);
        group.bench_with_input(BenchmarkId::new("trie_build", size), &songs, |b, songs| {
            b.iter(|| Trie::build(black_box(songs)))
        });
    }

    let songs = create_test_songs(10_000, &mut rng);
    let trie = Trie::build(&songs);
    group.bench_function("autocomplete_short_prefix", |b| {
        b.iter(|| trie.autocomplete(black_box("tr")))
    });
    group.bench_function("autocomplete_long_prefix", |b| {
        b.iter(|| trie.autocomplete(black_box("track 99")))
    });
    group.bench_function("fuzzy_10000_songs", |b| {
        b.iter(|| search::fuzzy_search(black_box(&songs), black_box("trakc 512"), 2))
    });
    group.bench_function("levenshtein", |b| {
        b.iter(|| search::levenshtein(black_box("bohemian rhapsody"), black_box("bohemain rapsody")))
    });

    group.finish();
}

criterion_group!(benches, benchmark_training, benchmark_recommendation, benchmark_search);
criterion_main!(benches);
