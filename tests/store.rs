use std::path::PathBuf;

use rusqlite::Connection;

use league_table::csv_source::{self, CsvOptions};
use league_table::league::{League, LeagueBuilder};
use league_table::stats;
use league_table::store::{self, ImportSource, TeamRecord};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_league() -> League {
    let rows = csv_source::read_match_rows(
        &fixture_path("premier_league.csv"),
        &CsvOptions::default(),
    )
    .expect("fixture parses");
    csv_source::build_league(&rows).expect("fixture links")
}

fn memory_db() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory sqlite");
    store::init_schema(&conn).expect("schema");
    conn
}

#[test]
fn round_trip_keeps_ids_and_statistics() {
    let league = fixture_league();
    let mut conn = memory_db();
    let summary = store::save_league(&mut conn, &league, &ImportSource::default()).unwrap();
    assert_eq!(summary.teams_inserted, 5);
    assert_eq!(summary.matches_inserted, 8);

    let reloaded = store::load_league(&conn).unwrap();
    let ids: Vec<(u32, &str)> = reloaded
        .teams()
        .iter()
        .map(|t| (t.id, t.name.as_str()))
        .collect();
    assert_eq!(ids[0], (1, "Arsenal"));
    assert_eq!(ids[4], (5, "Luton"));

    assert_eq!(
        stats::compute_report(&reloaded).unwrap(),
        stats::compute_report(&league).unwrap()
    );
}

#[test]
fn ids_survive_even_when_not_contiguous() {
    let mut b = LeagueBuilder::new();
    b.insert_team(12, "Sunderland").unwrap();
    b.insert_team(4, "Burnley").unwrap();
    b.add_match_by_id(1, 12, 4, 3, 0).unwrap();
    let league = b.finish();

    let mut conn = memory_db();
    store::save_league(&mut conn, &league, &ImportSource::default()).unwrap();
    let reloaded = store::load_league(&conn).unwrap();

    // teams come back in id order
    assert_eq!(reloaded.teams()[0].id, 4);
    assert_eq!(reloaded.teams()[1].id, 12);
    let table = stats::standings(&reloaded).unwrap();
    assert_eq!((table[0].team_id, table[0].name.as_str()), (12, "Sunderland"));
}

#[test]
fn team_lookups() {
    let mut conn = memory_db();
    store::save_league(&mut conn, &fixture_league(), &ImportSource::default()).unwrap();

    let names: Vec<String> = store::load_teams(&conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, ["Arsenal", "Chelsea", "Everton", "Liverpool", "Luton"]);

    assert_eq!(
        store::get_team(&conn, 3).unwrap(),
        Some(TeamRecord {
            id: 3,
            name: "Liverpool".to_string()
        })
    );
    assert_eq!(store::get_team(&conn, 42).unwrap(), None);
}

#[test]
fn import_runs_are_recorded_and_survive_reset() {
    let mut conn = memory_db();
    assert!(store::last_import_run(&conn).unwrap().is_none());

    let source = ImportSource {
        path: Some(PathBuf::from("PremierLeague.csv")),
        sha256: Some("abc123".to_string()),
    };
    let first = store::save_league(&mut conn, &fixture_league(), &source).unwrap();

    store::reset_db(&conn).unwrap();
    assert!(store::load_league(&conn).unwrap().is_empty());

    let second = store::save_league(&mut conn, &fixture_league(), &source).unwrap();
    assert!(second.run_id > first.run_id);

    let run = store::last_import_run(&conn).unwrap().expect("run recorded");
    assert_eq!(run.run_id, second.run_id);
    assert_eq!(run.teams_inserted, 5);
    assert_eq!(run.matches_inserted, 8);
    assert_eq!(run.source_path.as_deref(), Some("PremierLeague.csv"));
    assert_eq!(run.source_sha256.as_deref(), Some("abc123"));
    assert!(run.finished_at.is_some());
}

#[test]
fn saving_twice_without_reset_fails_and_rolls_back() {
    let mut conn = memory_db();
    let league = fixture_league();
    let first = store::save_league(&mut conn, &league, &ImportSource::default()).unwrap();
    assert!(store::save_league(&mut conn, &league, &ImportSource::default()).is_err());

    let run = store::last_import_run(&conn).unwrap().unwrap();
    assert_eq!(run.run_id, first.run_id);
    assert_eq!(store::load_league(&conn).unwrap().matches().len(), 8);
}

#[test]
fn file_database_and_source_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("league.sqlite");
    let mut conn = store::open_db(&db_path).unwrap();
    assert!(db_path.exists());

    let csv = fixture_path("premier_league.csv");
    let source = ImportSource::from_file(&csv).unwrap();
    let digest = source.sha256.clone().unwrap();
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(store::file_sha256(&csv).unwrap(), digest);

    store::save_league(&mut conn, &fixture_league(), &source).unwrap();
    drop(conn);

    let conn = store::open_db(&db_path).unwrap();
    assert_eq!(store::load_league(&conn).unwrap().teams().len(), 5);
}

#[test]
fn failed_replace_keeps_previous_league() {
    let mut conn = memory_db();
    store::save_league(&mut conn, &fixture_league(), &ImportSource::default()).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER block_imports BEFORE INSERT ON import_runs
         BEGIN SELECT RAISE(ABORT, 'imports blocked'); END;",
    )
    .unwrap();

    let mut b = LeagueBuilder::new();
    b.add_match(1, "Leeds", "Fulham", 1, 0).unwrap();
    assert!(store::replace_league(&mut conn, &b.finish(), &ImportSource::default()).is_err());

    let kept = store::load_league(&conn).unwrap();
    assert_eq!(kept.teams().len(), 5);
    assert_eq!(kept.matches().len(), 8);
}

#[test]
fn replace_swaps_the_stored_league() {
    let mut conn = memory_db();
    store::save_league(&mut conn, &fixture_league(), &ImportSource::default()).unwrap();

    let mut b = LeagueBuilder::new();
    b.add_match(1, "Leeds", "Fulham", 1, 0).unwrap();
    let summary =
        store::replace_league(&mut conn, &b.finish(), &ImportSource::default()).unwrap();
    assert_eq!((summary.teams_inserted, summary.matches_inserted), (2, 1));

    let names: Vec<String> = store::load_teams(&conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, ["Fulham", "Leeds"]);
}
