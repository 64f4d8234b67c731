use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::league::{League, LeagueBuilder};

const IDX_ROUND: usize = 0;
const IDX_HOME_TEAM: usize = 1;
const IDX_AWAY_TEAM: usize = 2;
const IDX_HOME_GOALS: usize = 3;
const IDX_AWAY_GOALS: usize = 4;
const COLUMN_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub has_headers: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            has_headers: false,
        }
    }
}

/// One result line of the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub line: u64,
    pub round: u32,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

pub fn read_match_rows(path: &Path, opts: &CsvOptions) -> Result<Vec<MatchRow>> {
    let file = File::open(path).with_context(|| format!("open csv {}", path.display()))?;
    parse_match_rows(file, opts).with_context(|| format!("parse csv {}", path.display()))
}

pub fn parse_match_rows<R: Read>(reader: R, opts: &CsvOptions) -> Result<Vec<MatchRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(opts.delimiter)
        .has_headers(opts.has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record.context("read csv record")?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        if record.len() != COLUMN_COUNT {
            return Err(anyhow!(
                "line {line}: expected {COLUMN_COUNT} columns, found {}",
                record.len()
            ));
        }
        out.push(MatchRow {
            line,
            round: parse_count(&record[IDX_ROUND], "round", line)?,
            home_team: record[IDX_HOME_TEAM].to_string(),
            away_team: record[IDX_AWAY_TEAM].to_string(),
            home_goals: parse_count(&record[IDX_HOME_GOALS], "home goals", line)?,
            away_goals: parse_count(&record[IDX_AWAY_GOALS], "away goals", line)?,
        });
    }
    Ok(out)
}

fn parse_count(raw: &str, field: &str, line: u64) -> Result<u32> {
    raw.parse::<u32>()
        .map_err(|_| anyhow!("line {line}: invalid {field} value '{raw}'"))
}

/// Links rows into a league arena; teams are registered on first sight,
/// home or away.
pub fn build_league(rows: &[MatchRow]) -> Result<League> {
    let mut builder = LeagueBuilder::new();
    for row in rows {
        builder
            .add_match(
                row.round,
                &row.home_team,
                &row.away_team,
                row.home_goals,
                row.away_goals,
            )
            .with_context(|| format!("line {}", row.line))?;
    }
    Ok(builder.finish())
}
