use std::collections::HashMap;

use thiserror::Error;

/// Position of a team inside [`League::teams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TeamIdx(pub usize);

/// Position of a fixture inside [`League::matches`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchIdx(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRecord {
    pub round: u32,
    pub home: TeamIdx,
    pub away: TeamIdx,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl MatchRecord {
    pub fn outcome(&self) -> Outcome {
        if self.home_goals > self.away_goals {
            Outcome::HomeWin
        } else if self.home_goals < self.away_goals {
            Outcome::AwayWin
        } else {
            Outcome::Draw
        }
    }
}

#[derive(Debug, Clone)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub home_matches: Vec<MatchIdx>,
    pub away_matches: Vec<MatchIdx>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeagueError {
    #[error("round {round}: {team} cannot play against itself")]
    SameTeam { round: u32, team: String },
    #[error("round must be positive (got {round}) for {home} vs {away}")]
    InvalidRound { round: u32, home: String, away: String },
    #[error("empty team name in round {round}")]
    EmptyTeamName { round: u32 },
    #[error("unknown team id {0}")]
    UnknownTeamId(u32),
    #[error("team id {id} is already taken by {existing}")]
    DuplicateTeamId { id: u32, existing: String },
    #[error("team name {0} is already registered")]
    DuplicateTeamName(String),
}

/// Flat arena of teams and fixtures. Teams refer to fixtures by index and
/// fixtures refer back to teams by index; neither owns the other.
#[derive(Debug, Clone, Default)]
pub struct League {
    teams: Vec<Team>,
    matches: Vec<MatchRecord>,
}

impl League {
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn team(&self, idx: TeamIdx) -> &Team {
        &self.teams[idx.0]
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn team_by_name(&self, name: &str) -> Option<TeamAggregate<'_>> {
        self.teams
            .iter()
            .find(|t| t.name == name)
            .map(|team| TeamAggregate {
                team,
                matches: &self.matches,
            })
    }

    /// Aggregated views in team order (registration order, i.e. id order
    /// after a reload from the store).
    pub fn aggregates(&self) -> impl ExactSizeIterator<Item = TeamAggregate<'_>> + '_ {
        self.teams.iter().map(|team| TeamAggregate {
            team,
            matches: &self.matches,
        })
    }
}

/// Read-only statistics view of one team over the league's match arena.
#[derive(Debug, Clone, Copy)]
pub struct TeamAggregate<'a> {
    team: &'a Team,
    matches: &'a [MatchRecord],
}

impl<'a> TeamAggregate<'a> {
    pub fn team(&self) -> &'a Team {
        self.team
    }

    pub fn id(&self) -> u32 {
        self.team.id
    }

    pub fn name(&self) -> &'a str {
        &self.team.name
    }

    pub fn home_fixtures(&self) -> impl Iterator<Item = &'a MatchRecord> + 'a {
        let matches = self.matches;
        self.team.home_matches.iter().map(move |idx| &matches[idx.0])
    }

    pub fn away_fixtures(&self) -> impl Iterator<Item = &'a MatchRecord> + 'a {
        let matches = self.matches;
        self.team.away_matches.iter().map(move |idx| &matches[idx.0])
    }

    // Per-match counts are u32; sums widen so a season of large scores
    // cannot overflow.
    pub fn home_goals_scored(&self) -> u64 {
        self.home_fixtures().map(|m| u64::from(m.home_goals)).sum()
    }

    pub fn home_goals_conceded(&self) -> u64 {
        self.home_fixtures().map(|m| u64::from(m.away_goals)).sum()
    }

    pub fn away_goals_scored(&self) -> u64 {
        self.away_fixtures().map(|m| u64::from(m.away_goals)).sum()
    }

    pub fn away_goals_conceded(&self) -> u64 {
        self.away_fixtures().map(|m| u64::from(m.home_goals)).sum()
    }

    pub fn goals_scored(&self) -> u64 {
        self.home_goals_scored() + self.away_goals_scored()
    }

    pub fn goals_conceded(&self) -> u64 {
        self.home_goals_conceded() + self.away_goals_conceded()
    }

    pub fn goal_difference(&self) -> i64 {
        self.goals_scored() as i64 - self.goals_conceded() as i64
    }

    pub fn home_match_count(&self) -> usize {
        self.team.home_matches.len()
    }

    pub fn away_match_count(&self) -> usize {
        self.team.away_matches.len()
    }

    pub fn match_count(&self) -> usize {
        self.home_match_count() + self.away_match_count()
    }

    pub fn wins(&self) -> usize {
        let home = self
            .home_fixtures()
            .filter(|m| m.outcome() == Outcome::HomeWin)
            .count();
        let away = self
            .away_fixtures()
            .filter(|m| m.outcome() == Outcome::AwayWin)
            .count();
        home + away
    }

    pub fn losses(&self) -> usize {
        let home = self
            .home_fixtures()
            .filter(|m| m.outcome() == Outcome::AwayWin)
            .count();
        let away = self
            .away_fixtures()
            .filter(|m| m.outcome() == Outcome::HomeWin)
            .count();
        home + away
    }
}

/// Incrementally links fixtures into teams, deduplicating teams by name.
#[derive(Debug, Default)]
pub struct LeagueBuilder {
    league: League,
    by_name: HashMap<String, TeamIdx>,
    by_id: HashMap<u32, TeamIdx>,
    max_id: u32,
}

impl LeagueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team_index(&self, name: &str) -> Option<TeamIdx> {
        self.by_name.get(name.trim()).copied()
    }

    /// Returns the existing team for `name`, or registers a new one with the
    /// next free id.
    pub fn register_team(&mut self, name: &str) -> TeamIdx {
        let name = name.trim();
        if let Some(idx) = self.by_name.get(name) {
            return *idx;
        }
        self.push_team(self.max_id + 1, name.to_string())
    }

    /// Registers a team with a known id (used when reloading from the store).
    pub fn insert_team(&mut self, id: u32, name: &str) -> Result<TeamIdx, LeagueError> {
        if let Some(existing) = self.by_id.get(&id) {
            return Err(LeagueError::DuplicateTeamId {
                id,
                existing: self.league.teams[existing.0].name.clone(),
            });
        }
        let name = name.trim();
        if self.by_name.contains_key(name) {
            return Err(LeagueError::DuplicateTeamName(name.to_string()));
        }
        Ok(self.push_team(id, name.to_string()))
    }

    fn push_team(&mut self, id: u32, name: String) -> TeamIdx {
        let idx = TeamIdx(self.league.teams.len());
        self.by_name.insert(name.clone(), idx);
        self.by_id.insert(id, idx);
        self.max_id = self.max_id.max(id);
        self.league.teams.push(Team {
            id,
            name,
            home_matches: Vec::new(),
            away_matches: Vec::new(),
        });
        idx
    }

    pub fn add_match(
        &mut self,
        round: u32,
        home: &str,
        away: &str,
        home_goals: u32,
        away_goals: u32,
    ) -> Result<MatchIdx, LeagueError> {
        let (home, away) = (home.trim(), away.trim());
        if home.is_empty() || away.is_empty() {
            return Err(LeagueError::EmptyTeamName { round });
        }
        if round == 0 {
            return Err(LeagueError::InvalidRound {
                round,
                home: home.to_string(),
                away: away.to_string(),
            });
        }
        if home == away {
            return Err(LeagueError::SameTeam {
                round,
                team: home.to_string(),
            });
        }
        let home = self.register_team(home);
        let away = self.register_team(away);
        Ok(self.link(round, home, away, home_goals, away_goals))
    }

    pub fn add_match_by_id(
        &mut self,
        round: u32,
        home_id: u32,
        away_id: u32,
        home_goals: u32,
        away_goals: u32,
    ) -> Result<MatchIdx, LeagueError> {
        let home = *self
            .by_id
            .get(&home_id)
            .ok_or(LeagueError::UnknownTeamId(home_id))?;
        let away = *self
            .by_id
            .get(&away_id)
            .ok_or(LeagueError::UnknownTeamId(away_id))?;
        if round == 0 {
            return Err(LeagueError::InvalidRound {
                round,
                home: self.league.teams[home.0].name.clone(),
                away: self.league.teams[away.0].name.clone(),
            });
        }
        if home == away {
            return Err(LeagueError::SameTeam {
                round,
                team: self.league.teams[home.0].name.clone(),
            });
        }
        Ok(self.link(round, home, away, home_goals, away_goals))
    }

    fn link(
        &mut self,
        round: u32,
        home: TeamIdx,
        away: TeamIdx,
        home_goals: u32,
        away_goals: u32,
    ) -> MatchIdx {
        let idx = MatchIdx(self.league.matches.len());
        self.league.matches.push(MatchRecord {
            round,
            home,
            away,
            home_goals,
            away_goals,
        });
        self.league.teams[home.0].home_matches.push(idx);
        self.league.teams[away.0].away_matches.push(idx);
        idx
    }

    pub fn finish(self) -> League {
        self.league
    }
}
