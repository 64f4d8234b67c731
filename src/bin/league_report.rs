use anyhow::{Context, Result, anyhow};

use league_table::config::AppConfig;
use league_table::{export, logging, pipeline, report, store};

// Reports on whatever the last import stored; never touches the CSV.
fn main() -> Result<()> {
    let cfg = AppConfig::load()?;
    logging::init();

    if !cfg.db_path.exists() {
        return Err(anyhow!(
            "no league database at {} (run league_ingest first)",
            cfg.db_path.display()
        ));
    }
    let conn = store::open_db(&cfg.db_path)?;

    match store::last_import_run(&conn)? {
        Some(run) => println!(
            "Import run {} at {} from {} ({} teams, {} matches)",
            run.run_id,
            run.finished_at.as_deref().unwrap_or(&run.started_at),
            run.source_path.as_deref().unwrap_or("n/a"),
            run.teams_inserted,
            run.matches_inserted
        ),
        None => log::warn!("No import runs recorded in {}", cfg.db_path.display()),
    }

    let report = pipeline::analyze(&conn)?;
    println!("{}", report::render_report(&report));

    if let Some(path) = cfg.xlsx_out.as_deref() {
        export::write_xlsx(path, &report)
            .with_context(|| format!("export xlsx {}", path.display()))?;
    }
    if let Some(path) = cfg.json_out.as_deref() {
        export::write_json(path, &report)
            .with_context(|| format!("export json {}", path.display()))?;
    }
    Ok(())
}
