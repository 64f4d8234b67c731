use anyhow::{Context, Result};

use league_table::config::AppConfig;
use league_table::{export, logging, pipeline, report, store};

const BANNER: &str = r#"
            _,...,_
          .'@/~~~\@'.
         //~~\___/~~\\        L E A G U E   T A B L E
        |@\__/@@@\__/@|
        |@/  \@@@/  \@|            (with statistics)
         \\__/~~~\__//
          '.@\___/@.'
            `"""""""`
"#;

fn main() -> Result<()> {
    let cfg = AppConfig::load()?;
    logging::init();

    print_header();

    let mut conn = store::open_db(&cfg.db_path)?;
    log::info!("Importing matches into {}", cfg.db_path.display());
    pipeline::import_csv(&mut conn, &cfg)?;

    let report = pipeline::analyze(&conn)?;
    println!("{}", report::render_report(&report));

    if let Some(path) = cfg.xlsx_out.as_deref() {
        let written = export::write_xlsx(path, &report)
            .with_context(|| format!("export xlsx {}", path.display()))?;
        log::info!(
            "Wrote {} standings rows and {} performance rows to {}",
            written.standings,
            written.performance,
            path.display()
        );
    }
    if let Some(path) = cfg.json_out.as_deref() {
        export::write_json(path, &report)
            .with_context(|| format!("export json {}", path.display()))?;
        log::info!("Wrote report json to {}", path.display());
    }

    Ok(())
}

fn print_header() {
    let rule = "-".repeat(60);
    println!("{rule}");
    println!("{BANNER}");
    println!("{rule}");
    println!();
}
