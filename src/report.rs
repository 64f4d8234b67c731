use std::fmt::Write as _;

use crate::stats::{LeagueReport, PerformanceProfile, Ratio, StandingsRow, TeamValue};

pub const NO_DATA: &str = "n/a";

pub const PERFORMANCE_HEADERS: [&str; 7] =
    ["Name", "AVG1", "AVG2", "AVG3", "AVG4", "AVG5", "AVG6"];

pub const STANDINGS_HEADERS: [&str; 11] = [
    "ID",
    "RANK",
    "NAME",
    "POINTS",
    "MATCHES",
    "WON",
    "LOST",
    "DRAWN",
    "GOALS FOR",
    "GOALS AGAINST",
    "GOAL DIFF",
];

pub const CAPTION_MOST_GOALS: &str = "Team with the most goals";
pub const CAPTION_MOST_AWAY_GOALS: &str = "Team with the most away goals";
pub const CAPTION_MOST_HOME_GOALS: &str = "Team with the most home goals";
pub const CAPTION_BEST_GOAL_DIFF: &str = "Team with the best goal difference";

pub fn format_ratio(value: Ratio) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => NO_DATA.to_string(),
    }
}

pub fn render_highlight(caption: &str, result: &TeamValue) -> String {
    let mut out = String::new();
    if !caption.is_empty() {
        let rule = "=".repeat(caption.chars().count());
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{caption}");
        let _ = writeln!(out, "{rule}");
        out.push('\n');
    }
    let _ = writeln!(out, "{} : {}", result.team_name, result.value);
    out
}

pub fn performance_rows(rows: &[PerformanceProfile]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|p| {
            let mut cells = Vec::with_capacity(PERFORMANCE_HEADERS.len());
            cells.push(p.team_name.clone());
            cells.extend(p.ratios().into_iter().map(format_ratio));
            cells
        })
        .collect()
}

pub fn standings_rows(rows: &[StandingsRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.team_id.to_string(),
                r.rank.to_string(),
                r.name.clone(),
                r.points.to_string(),
                r.matches.to_string(),
                r.won.to_string(),
                r.lost.to_string(),
                r.drawn.to_string(),
                r.goals_for.to_string(),
                r.goals_against.to_string(),
                r.goal_difference.to_string(),
            ]
        })
        .collect()
}

pub fn render_performance_table(rows: &[PerformanceProfile]) -> String {
    render_markdown_table(&PERFORMANCE_HEADERS, &performance_rows(rows))
}

pub fn render_standings_table(rows: &[StandingsRow]) -> String {
    render_markdown_table(&STANDINGS_HEADERS, &standings_rows(rows))
}

/// Pipe table with padded columns; every row must have `headers.len()` cells.
pub fn render_markdown_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().copied(), &widths);
    let rule = widths.iter().map(|w| "-".repeat(*w + 2)).collect::<Vec<_>>();
    let _ = writeln!(out, "|{}|", rule.join("|"));
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        let _ = write!(out, " {cell}{} |", " ".repeat(pad));
    }
    out.push('\n');
}

pub fn render_report(report: &LeagueReport) -> String {
    let h = &report.highlights;
    let mut out = String::new();
    for (caption, value) in [
        (CAPTION_MOST_GOALS, &h.most_goals),
        (CAPTION_MOST_AWAY_GOALS, &h.most_away_goals),
        (CAPTION_MOST_HOME_GOALS, &h.most_home_goals),
        (CAPTION_BEST_GOAL_DIFF, &h.best_goal_difference),
    ] {
        out.push('\n');
        out.push_str(&render_highlight(caption, value));
    }
    out.push('\n');
    out.push_str(&render_performance_table(&report.performance));
    out.push_str("\n\n");
    out.push_str(&render_standings_table(&report.standings));
    out
}
