use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::report::{
    CAPTION_BEST_GOAL_DIFF, CAPTION_MOST_AWAY_GOALS, CAPTION_MOST_GOALS, CAPTION_MOST_HOME_GOALS,
    PERFORMANCE_HEADERS, STANDINGS_HEADERS,
};
use crate::stats::LeagueReport;

pub struct ExportReport {
    pub standings: usize,
    pub performance: usize,
    pub highlights: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

pub fn write_xlsx(path: &Path, report: &LeagueReport) -> Result<ExportReport> {
    let mut standings_rows = vec![header_row(&STANDINGS_HEADERS)];
    for r in &report.standings {
        standings_rows.push(vec![
            Cell::Number(f64::from(r.team_id)),
            Cell::Number(f64::from(r.rank)),
            Cell::Text(r.name.clone()),
            Cell::Number(f64::from(r.points)),
            Cell::Number(f64::from(r.matches)),
            Cell::Number(f64::from(r.won)),
            Cell::Number(f64::from(r.lost)),
            Cell::Number(f64::from(r.drawn)),
            Cell::Number(r.goals_for as f64),
            Cell::Number(r.goals_against as f64),
            Cell::Number(r.goal_difference as f64),
        ]);
    }

    let mut performance_rows = vec![header_row(&PERFORMANCE_HEADERS)];
    for p in &report.performance {
        let mut row = vec![Cell::Text(p.team_name.clone())];
        // missing ratios stay as empty cells
        row.extend(
            p.ratios()
                .into_iter()
                .map(|r| r.map(Cell::Number).unwrap_or(Cell::Blank)),
        );
        performance_rows.push(row);
    }

    let h = &report.highlights;
    let mut highlight_rows = vec![header_row(&["Query", "Team ID", "Team", "Value"])];
    for (caption, value) in [
        (CAPTION_MOST_GOALS, &h.most_goals),
        (CAPTION_MOST_AWAY_GOALS, &h.most_away_goals),
        (CAPTION_MOST_HOME_GOALS, &h.most_home_goals),
        (CAPTION_BEST_GOAL_DIFF, &h.best_goal_difference),
    ] {
        highlight_rows.push(vec![
            Cell::from(caption),
            Cell::Number(f64::from(value.team_id)),
            Cell::Text(value.team_name.clone()),
            Cell::Number(value.value as f64),
        ]);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Standings")?;
        write_rows(sheet, &standings_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Performance")?;
        write_rows(sheet, &performance_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Highlights")?;
        write_rows(sheet, &highlight_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        standings: standings_rows.len().saturating_sub(1),
        performance: performance_rows.len().saturating_sub(1),
        highlights: highlight_rows.len().saturating_sub(1),
    })
}

pub fn write_json(path: &Path, report: &LeagueReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(report).context("serialize league report")?;
    fs::write(&tmp, json).context("write league report")?;
    fs::rename(&tmp, path).context("swap league report")?;
    Ok(())
}

fn header_row(headers: &[&str]) -> Vec<Cell> {
    headers.iter().map(|h| Cell::from(*h)).collect()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match cell {
                Cell::Text(value) => worksheet.write_string(r, c, value),
                Cell::Number(value) => worksheet.write_number(r, c, *value),
                Cell::Blank => continue,
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
