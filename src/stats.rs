use serde::Serialize;
use thiserror::Error;

use crate::league::{League, TeamAggregate};

/// A per-match average; `None` when the team has no fixtures of that kind.
pub type Ratio = Option<f64>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("{query}: league has no teams")]
    EmptyInput { query: &'static str },
}

/// Winner of an extremal query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamValue {
    pub team_id: u32,
    pub team_name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceProfile {
    pub team_id: u32,
    pub team_name: String,
    pub avg_goals_home: Ratio,
    pub avg_goals_away: Ratio,
    pub avg_goals_total: Ratio,
    pub avg_conceded_home: Ratio,
    pub avg_conceded_away: Ratio,
    pub avg_conceded_total: Ratio,
}

impl PerformanceProfile {
    /// The six ratios in report column order (AVG1..AVG6).
    pub fn ratios(&self) -> [Ratio; 6] {
        [
            self.avg_goals_home,
            self.avg_goals_away,
            self.avg_goals_total,
            self.avg_conceded_home,
            self.avg_conceded_away,
            self.avg_conceded_total,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsRow {
    pub team_id: u32,
    pub rank: u32,
    pub name: String,
    pub points: u32,
    pub matches: u32,
    pub won: u32,
    pub lost: u32,
    pub drawn: u32,
    pub goals_for: u64,
    pub goals_against: u64,
    pub goal_difference: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlights {
    pub most_goals: TeamValue,
    pub most_away_goals: TeamValue,
    pub most_home_goals: TeamValue,
    pub best_goal_difference: TeamValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueReport {
    pub highlights: Highlights,
    pub performance: Vec<PerformanceProfile>,
    pub standings: Vec<StandingsRow>,
}

pub const POINTS_PER_WIN: u32 = 3;
pub const POINTS_PER_DRAW: u32 = 1;

pub fn max_total_goals(league: &League) -> Result<TeamValue, StatsError> {
    max_by_metric(league, "max_total_goals", |t| t.goals_scored() as i64)
}

pub fn max_away_goals(league: &League) -> Result<TeamValue, StatsError> {
    max_by_metric(league, "max_away_goals", |t| t.away_goals_scored() as i64)
}

pub fn max_home_goals(league: &League) -> Result<TeamValue, StatsError> {
    max_by_metric(league, "max_home_goals", |t| t.home_goals_scored() as i64)
}

pub fn best_goal_difference(league: &League) -> Result<TeamValue, StatsError> {
    max_by_metric(league, "best_goal_difference", |t| t.goal_difference())
}

// Single pass; only a strictly greater value replaces the current leader, so
// ties stay with the team seen first.
fn max_by_metric(
    league: &League,
    query: &'static str,
    metric: impl Fn(&TeamAggregate<'_>) -> i64,
) -> Result<TeamValue, StatsError> {
    let mut best: Option<(TeamAggregate<'_>, i64)> = None;
    for team in league.aggregates() {
        let value = metric(&team);
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((team, value)),
        }
    }
    let (team, value) = best.ok_or(StatsError::EmptyInput { query })?;
    Ok(TeamValue {
        team_id: team.id(),
        team_name: team.name().to_string(),
        value,
    })
}

/// Six scoring/conceding averages per team, ordered by team name descending.
pub fn team_performance(league: &League) -> Vec<PerformanceProfile> {
    let mut rows: Vec<PerformanceProfile> = league
        .aggregates()
        .map(|t| {
            let home = t.home_match_count();
            let away = t.away_match_count();
            let total = t.match_count();
            PerformanceProfile {
                team_id: t.id(),
                team_name: t.name().to_string(),
                avg_goals_home: ratio(t.home_goals_scored(), home),
                avg_goals_away: ratio(t.away_goals_scored(), away),
                avg_goals_total: ratio(t.goals_scored(), total),
                avg_conceded_home: ratio(t.home_goals_conceded(), home),
                avg_conceded_away: ratio(t.away_goals_conceded(), away),
                avg_conceded_total: ratio(t.goals_conceded(), total),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.team_name.cmp(&a.team_name));
    rows
}

fn ratio(goals: u64, matches: usize) -> Ratio {
    if matches == 0 {
        None
    } else {
        Some(goals as f64 / matches as f64)
    }
}

/// League table ranked by points, then goal difference, then name.
pub fn standings(league: &League) -> Result<Vec<StandingsRow>, StatsError> {
    if league.is_empty() {
        return Err(StatsError::EmptyInput { query: "standings" });
    }

    let mut rows: Vec<StandingsRow> = league.aggregates().map(standings_row).collect();
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then_with(|| a.name.cmp(&b.name))
    });
    for (pos, row) in rows.iter_mut().enumerate() {
        row.rank = pos as u32 + 1;
    }
    Ok(rows)
}

fn standings_row(t: TeamAggregate<'_>) -> StandingsRow {
    let matches = t.match_count() as u32;
    let won = t.wins() as u32;
    let lost = t.losses() as u32;
    debug_assert!(won + lost <= matches);
    let drawn = matches - won - lost;
    let goals_for = t.goals_scored();
    let goals_against = t.goals_conceded();
    StandingsRow {
        team_id: t.id(),
        rank: 0,
        name: t.name().to_string(),
        points: POINTS_PER_WIN * won + POINTS_PER_DRAW * drawn,
        matches,
        won,
        lost,
        drawn,
        goals_for,
        goals_against,
        goal_difference: t.goal_difference(),
    }
}

/// Runs every query over the same league. The table, the performance list
/// and the extremal queries are independent and run on the rayon pool.
pub fn compute_report(league: &League) -> Result<LeagueReport, StatsError> {
    let ((table, performance), top) = rayon::join(
        || rayon::join(|| standings(league), || team_performance(league)),
        || highlights(league),
    );
    Ok(LeagueReport {
        highlights: top?,
        performance,
        standings: table?,
    })
}

pub fn highlights(league: &League) -> Result<Highlights, StatsError> {
    Ok(Highlights {
        most_goals: max_total_goals(league)?,
        most_away_goals: max_away_goals(league)?,
        most_home_goals: max_home_goals(league)?,
        best_goal_difference: best_goal_difference(league)?,
    })
}
