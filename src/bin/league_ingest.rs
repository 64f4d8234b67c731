use anyhow::Result;

use league_table::config::AppConfig;
use league_table::{logging, pipeline, store};

fn main() -> Result<()> {
    let cfg = AppConfig::load()?;
    logging::init();

    let mut conn = store::open_db(&cfg.db_path)?;
    let summary = pipeline::import_csv(&mut conn, &cfg)?;

    println!("League ingest complete");
    println!("DB: {}", cfg.db_path.display());
    println!("Source: {}", cfg.csv_path.display());
    println!("Teams: {}", summary.teams_inserted);
    println!("Matches: {}", summary.matches_inserted);

    let teams = store::load_teams(&conn)?;
    for team in teams.iter().take(40) {
        println!("  {:>3}  {}", team.id, team.name);
    }
    if teams.len() > 40 {
        println!("  ... {} more", teams.len() - 40);
    }

    Ok(())
}
