use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::league::{League, LeagueBuilder};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRecord {
    pub id: u32,
    pub name: String,
}

/// Where an import came from; recorded alongside each run.
#[derive(Debug, Clone, Default)]
pub struct ImportSource {
    pub path: Option<PathBuf>,
    pub sha256: Option<String>,
}

impl ImportSource {
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self {
            path: Some(path.to_path_buf()),
            sha256: Some(file_sha256(path)?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub run_id: i64,
    pub teams_inserted: usize,
    pub matches_inserted: usize,
}

#[derive(Debug, Clone)]
pub struct ImportRun {
    pub run_id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub source_path: Option<String>,
    pub source_sha256: Option<String>,
    pub teams_inserted: usize,
    pub matches_inserted: usize,
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS teams (
            team_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS matches (
            match_id INTEGER PRIMARY KEY AUTOINCREMENT,
            round INTEGER NOT NULL CHECK (round > 0),
            home_team_id INTEGER NOT NULL REFERENCES teams(team_id),
            away_team_id INTEGER NOT NULL REFERENCES teams(team_id),
            home_goals INTEGER NOT NULL CHECK (home_goals >= 0),
            away_goals INTEGER NOT NULL CHECK (away_goals >= 0),
            CHECK (home_team_id <> away_team_id)
        );
        CREATE INDEX IF NOT EXISTS idx_matches_home ON matches(home_team_id);
        CREATE INDEX IF NOT EXISTS idx_matches_away ON matches(away_team_id);

        CREATE TABLE IF NOT EXISTS import_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            source_path TEXT NULL,
            source_sha256 TEXT NULL,
            teams_inserted INTEGER NOT NULL,
            matches_inserted INTEGER NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Drops teams and matches and recreates the schema. Import history stays.
pub fn reset_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS matches;
        DROP TABLE IF EXISTS teams;
        "#,
    )
    .context("drop league tables")?;
    init_schema(conn)
}

/// Inserts the league into the current tables in one transaction.
pub fn save_league(
    conn: &mut Connection,
    league: &League,
    source: &ImportSource,
) -> Result<ImportSummary> {
    let tx = conn.transaction().context("begin import transaction")?;
    let summary = insert_league(&tx, league, source)?;
    tx.commit().context("commit import transaction")?;
    Ok(summary)
}

/// Reset plus save as one transaction; on any failure the previously stored
/// league is left as it was.
pub fn replace_league(
    conn: &mut Connection,
    league: &League,
    source: &ImportSource,
) -> Result<ImportSummary> {
    let tx = conn.transaction().context("begin import transaction")?;
    reset_db(&tx)?;
    let summary = insert_league(&tx, league, source)?;
    tx.commit().context("commit import transaction")?;
    Ok(summary)
}

fn insert_league(
    tx: &Transaction<'_>,
    league: &League,
    source: &ImportSource,
) -> Result<ImportSummary> {
    let started_at = Utc::now().to_rfc3339();
    tx.execute(
        "INSERT INTO import_runs(
             started_at, finished_at, source_path, source_sha256,
             teams_inserted, matches_inserted
         )
         VALUES (?1, NULL, ?2, ?3, 0, 0)",
        params![
            started_at,
            source.path.as_ref().map(|p| p.display().to_string()),
            source.sha256,
        ],
    )
    .context("insert import run")?;
    let run_id = tx.last_insert_rowid();

    {
        let mut insert_team = tx
            .prepare("INSERT INTO teams(team_id, name) VALUES (?1, ?2)")
            .context("prepare team insert")?;
        for team in league.teams() {
            insert_team
                .execute(params![team.id, team.name])
                .with_context(|| format!("insert team {}", team.name))?;
        }

        let mut insert_match = tx
            .prepare(
                "INSERT INTO matches(round, home_team_id, away_team_id, home_goals, away_goals)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .context("prepare match insert")?;
        for m in league.matches() {
            insert_match
                .execute(params![
                    m.round,
                    league.team(m.home).id,
                    league.team(m.away).id,
                    m.home_goals,
                    m.away_goals,
                ])
                .with_context(|| format!("insert match in round {}", m.round))?;
        }
    }

    let teams_inserted = league.teams().len();
    let matches_inserted = league.matches().len();
    tx.execute(
        "UPDATE import_runs
         SET finished_at = ?1, teams_inserted = ?2, matches_inserted = ?3
         WHERE run_id = ?4",
        params![
            Utc::now().to_rfc3339(),
            teams_inserted as i64,
            matches_inserted as i64,
            run_id
        ],
    )
    .context("update import run")?;

    Ok(ImportSummary {
        run_id,
        teams_inserted,
        matches_inserted,
    })
}

/// Reloads every team together with its home and away fixtures.
pub fn load_league(conn: &Connection) -> Result<League> {
    let mut builder = LeagueBuilder::new();

    let mut stmt = conn
        .prepare("SELECT team_id, name FROM teams ORDER BY team_id ASC")
        .context("prepare load teams query")?;
    let teams = stmt
        .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?)))
        .context("query load teams")?;
    for row in teams {
        let (id, name) = row.context("decode team row")?;
        builder
            .insert_team(id, &name)
            .with_context(|| format!("load team {name}"))?;
    }

    let mut stmt = conn
        .prepare(
            r#"
            SELECT round, home_team_id, away_team_id, home_goals, away_goals
            FROM matches
            ORDER BY match_id ASC
            "#,
        )
        .context("prepare load matches query")?;
    let matches = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, u32>(4)?,
            ))
        })
        .context("query load matches")?;
    for row in matches {
        let (round, home_id, away_id, home_goals, away_goals) =
            row.context("decode match row")?;
        builder
            .add_match_by_id(round, home_id, away_id, home_goals, away_goals)
            .context("link stored match")?;
    }

    Ok(builder.finish())
}

/// All teams, alphabetically.
pub fn load_teams(conn: &Connection) -> Result<Vec<TeamRecord>> {
    let mut stmt = conn
        .prepare("SELECT team_id, name FROM teams ORDER BY name ASC")
        .context("prepare teams query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(TeamRecord {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .context("query teams")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode team row")?);
    }
    Ok(out)
}

pub fn get_team(conn: &Connection, team_id: u32) -> Result<Option<TeamRecord>> {
    conn.query_row(
        "SELECT team_id, name FROM teams WHERE team_id = ?1",
        params![team_id],
        |row| {
            Ok(TeamRecord {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    )
    .optional()
    .context("query team by id")
}

pub fn last_import_run(conn: &Connection) -> Result<Option<ImportRun>> {
    conn.query_row(
        r#"
        SELECT run_id, started_at, finished_at, source_path, source_sha256,
               teams_inserted, matches_inserted
        FROM import_runs
        ORDER BY run_id DESC
        LIMIT 1
        "#,
        [],
        |row| {
            Ok(ImportRun {
                run_id: row.get(0)?,
                started_at: row.get(1)?,
                finished_at: row.get(2)?,
                source_path: row.get(3)?,
                source_sha256: row.get(4)?,
                teams_inserted: row.get::<_, i64>(5)? as usize,
                matches_inserted: row.get::<_, i64>(6)? as usize,
            })
        },
    )
    .optional()
    .context("query last import run")
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex_lower(&hasher.finalize()))
}

fn hex_lower(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
