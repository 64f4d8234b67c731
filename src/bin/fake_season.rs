use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use league_table::config::{arg_value, has_flag};
use league_table::logging;

const TEAM_NAMES: &[&str] = &[
    "Arsenal",
    "Aston Villa",
    "Bournemouth",
    "Brentford",
    "Brighton",
    "Burnley",
    "Chelsea",
    "Crystal Palace",
    "Everton",
    "Fulham",
    "Leeds United",
    "Liverpool",
    "Manchester City",
    "Manchester United",
    "Newcastle United",
    "Nottingham Forest",
    "Sunderland",
    "Tottenham Hotspur",
    "West Ham United",
    "Wolverhampton",
];

const HOME_GOALS_MEAN: f64 = 1.55;
const AWAY_GOALS_MEAN: f64 = 1.20;

/// Writes a synthetic double round-robin season in the import format.
fn main() -> Result<()> {
    logging::init();
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    let teams = arg_value(&args, "--teams")
        .map(|raw| raw.parse::<usize>())
        .transpose()
        .context("--teams must be a number")?
        .unwrap_or(TEAM_NAMES.len());
    if teams < 2 {
        return Err(anyhow!("a season needs at least two teams"));
    }
    let out = arg_value(&args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("PremierLeague.csv"));
    let mut rng = match arg_value(&args, "--seed") {
        Some(raw) => StdRng::seed_from_u64(raw.parse().context("--seed must be a number")?),
        None => StdRng::from_entropy(),
    };

    let names = team_names(teams);
    let fixtures = double_round_robin(names.len());

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(&out)
        .with_context(|| format!("create {}", out.display()))?;
    if has_flag(&args, "--headers") {
        writer.write_record(["Round", "Home", "Away", "HomeGoals", "AwayGoals"])?;
    }
    for (round, home, away) in &fixtures {
        let home_goals = poisson(&mut rng, HOME_GOALS_MEAN);
        let away_goals = poisson(&mut rng, AWAY_GOALS_MEAN);
        writer.write_record([
            round.to_string(),
            names[*home].clone(),
            names[*away].clone(),
            home_goals.to_string(),
            away_goals.to_string(),
        ])?;
    }
    writer.flush().context("flush csv")?;

    log::info!(
        "Wrote {} fixtures for {} teams to {}",
        fixtures.len(),
        names.len(),
        out.display()
    );
    Ok(())
}

fn team_names(n: usize) -> Vec<String> {
    (0..n)
        .map(|idx| match TEAM_NAMES.get(idx) {
            Some(name) => name.to_string(),
            None => format!("Team {}", idx + 1),
        })
        .collect()
}

/// Circle-method schedule: `(round, home, away)`; the second half mirrors the
/// first with venues swapped.
fn double_round_robin(n: usize) -> Vec<(u32, usize, usize)> {
    // odd counts get a bye slot
    let slots = if n % 2 == 0 { n } else { n + 1 };
    let mut order: Vec<usize> = (0..slots).collect();
    let rounds = slots - 1;
    let mut first_half = Vec::new();

    for round in 0..rounds {
        for i in 0..slots / 2 {
            let (a, b) = (order[i], order[slots - 1 - i]);
            if a >= n || b >= n {
                continue;
            }
            let (home, away) = if (round + i) % 2 == 0 { (a, b) } else { (b, a) };
            first_half.push((round as u32 + 1, home, away));
        }
        order[1..].rotate_right(1);
    }

    let mut all = first_half.clone();
    all.extend(
        first_half
            .into_iter()
            .map(|(round, home, away)| (round + rounds as u32, away, home)),
    );
    all
}

// Knuth's method; fine for the small means used here.
fn poisson(rng: &mut impl Rng, mean: f64) -> u32 {
    let limit = (-mean).exp();
    let mut k = 0u32;
    let mut p = 1.0_f64;
    loop {
        p *= rng.gen_range(0.0..1.0);
        if p <= limit {
            return k;
        }
        k += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::double_round_robin;

    #[test]
    fn every_pair_meets_home_and_away_once() {
        for n in [2usize, 5, 20] {
            let fixtures = double_round_robin(n);
            assert_eq!(fixtures.len(), n * (n - 1));
            let pairs: HashSet<(usize, usize)> =
                fixtures.iter().map(|(_, h, a)| (*h, *a)).collect();
            assert_eq!(pairs.len(), n * (n - 1));
            assert!(fixtures.iter().all(|(round, h, a)| *round >= 1 && h != a));
        }
    }
}
