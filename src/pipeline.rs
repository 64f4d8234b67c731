use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::csv_source;
use crate::stats::{self, LeagueReport};
use crate::store::{self, ImportSource, ImportSummary};

/// Reads the configured CSV and replaces the stored league with it.
pub fn import_csv(conn: &mut Connection, cfg: &AppConfig) -> Result<ImportSummary> {
    log::info!("Reading matches from {}", cfg.csv_path.display());
    let rows = csv_source::read_match_rows(&cfg.csv_path, &cfg.csv)?;
    if rows.is_empty() {
        log::warn!("No matches found in {}", cfg.csv_path.display());
    } else {
        log::debug!("Read {} matches", rows.len());
    }

    let league = csv_source::build_league(&rows)?;
    log::debug!("Found {} teams", league.teams().len());

    let source = ImportSource::from_file(&cfg.csv_path)?;
    log::info!("Replacing stored league");
    let summary = store::replace_league(conn, &league, &source).context("save league")?;
    log::info!(
        "Stored {} teams and {} matches (import run {})",
        summary.teams_inserted,
        summary.matches_inserted,
        summary.run_id
    );
    Ok(summary)
}

/// Reloads the stored league and computes every statistic over it.
pub fn analyze(conn: &Connection) -> Result<LeagueReport> {
    let league = store::load_league(conn).context("reload league")?;
    log::info!(
        "Loaded {} teams and {} matches for analysis",
        league.teams().len(),
        league.matches().len()
    );
    let report = stats::compute_report(&league)?;
    Ok(report)
}
