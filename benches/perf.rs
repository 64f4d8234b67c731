use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use league_table::csv_source::{self, CsvOptions};
use league_table::league::{League, LeagueBuilder};
use league_table::stats;

const TEAMS: usize = 20;

// Every pair meets twice, with random scores.
fn sample_league() -> League {
    let mut rng = StdRng::seed_from_u64(2024);
    let names: Vec<String> = (0..TEAMS).map(|i| format!("Club {i:02}")).collect();
    let mut b = LeagueBuilder::new();
    let mut round = 1;
    for home in 0..TEAMS {
        for away in 0..TEAMS {
            if home == away {
                continue;
            }
            b.add_match(
                round,
                &names[home],
                &names[away],
                rng.gen_range(0..5),
                rng.gen_range(0..4),
            )
            .expect("valid fixture");
            round = round % 38 + 1;
        }
    }
    b.finish()
}

fn sample_csv(league: &League) -> String {
    league
        .matches()
        .iter()
        .map(|m| {
            format!(
                "{};{};{};{};{}\n",
                m.round,
                league.team(m.home).name,
                league.team(m.away).name,
                m.home_goals,
                m.away_goals
            )
        })
        .collect()
}

fn bench_standings(c: &mut Criterion) {
    let league = sample_league();
    c.bench_function("standings", |b| {
        b.iter(|| {
            let table = stats::standings(black_box(&league)).unwrap();
            black_box(table.len());
        })
    });
}

fn bench_highlights(c: &mut Criterion) {
    let league = sample_league();
    c.bench_function("highlights", |b| {
        b.iter(|| {
            let top = stats::highlights(black_box(&league)).unwrap();
            black_box(top.most_goals.value);
        })
    });
}

fn bench_compute_report(c: &mut Criterion) {
    let league = sample_league();
    c.bench_function("compute_report", |b| {
        b.iter(|| {
            let report = stats::compute_report(black_box(&league)).unwrap();
            black_box(report.performance.len());
        })
    });
}

fn bench_csv_import(c: &mut Criterion) {
    let csv = sample_csv(&sample_league());
    let opts = CsvOptions::default();
    c.bench_function("csv_import", |b| {
        b.iter(|| {
            let rows = csv_source::parse_match_rows(black_box(csv.as_bytes()), &opts).unwrap();
            let league = csv_source::build_league(&rows).unwrap();
            black_box(league.matches().len());
        })
    });
}

criterion_group!(
    perf,
    bench_standings,
    bench_highlights,
    bench_compute_report,
    bench_csv_import
);
criterion_main!(perf);
