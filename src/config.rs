use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::csv_source::CsvOptions;

const APP_DIR: &str = "league_table";
const DB_FILE: &str = "league.sqlite";
const DEFAULT_CSV: &str = "PremierLeague.csv";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub csv: CsvOptions,
    pub xlsx_out: Option<PathBuf>,
    pub json_out: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `.env.local`/`.env`, then resolves from process args and env.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::resolve(&args, |key| std::env::var(key).ok())
    }

    /// Args win over env vars, env vars win over defaults.
    pub fn resolve(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env_nonempty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let csv_path = arg_value(args, "--csv")
            .or_else(|| env_nonempty("LEAGUE_CSV_PATH"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV));

        let db_path = arg_value(args, "--db")
            .or_else(|| env_nonempty("LEAGUE_DB_PATH"))
            .map(PathBuf::from)
            .or_else(|| default_db_path(&env))
            .unwrap_or_else(|| PathBuf::from(DB_FILE));

        let delimiter_raw =
            arg_value(args, "--delimiter").or_else(|| env_nonempty("LEAGUE_CSV_DELIMITER"));
        let delimiter = match delimiter_raw {
            Some(raw) => parse_delimiter(&raw)?,
            None => CsvOptions::default().delimiter,
        };
        let has_headers = has_flag(args, "--headers")
            || env_nonempty("LEAGUE_CSV_HAS_HEADERS").is_some_and(|v| parse_bool(&v));

        Ok(Self {
            csv_path,
            db_path,
            csv: CsvOptions {
                delimiter,
                has_headers,
            },
            xlsx_out: arg_value(args, "--xlsx")
                .or_else(|| env_nonempty("LEAGUE_XLSX_OUT"))
                .map(PathBuf::from),
            json_out: arg_value(args, "--json")
                .or_else(|| env_nonempty("LEAGUE_JSON_OUT"))
                .map(PathBuf::from),
        })
    }
}

fn default_db_path(env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    app_cache_dir(env).map(|dir| dir.join(DB_FILE))
}

fn app_cache_dir(env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(base) = env("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(APP_DIR));
        }
    }
    let home = env("HOME")?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(APP_DIR))
}

/// Accepts `--name value` and `--name=value`.
pub fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn parse_delimiter(raw: &str) -> Result<u8> {
    let value = match raw {
        "tab" | "\\t" => "\t",
        "semicolon" => ";",
        "comma" => ",",
        other => other,
    };
    match value.as_bytes() {
        [b] => Ok(*b),
        _ => Err(anyhow!("csv delimiter must be a single ascii character, got '{raw}'")),
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn arg_value_handles_both_forms() {
        let a = args(&["--db=/tmp/x.sqlite", "--csv", "games.csv", "--xlsx", "--headers"]);
        assert_eq!(arg_value(&a, "--db").as_deref(), Some("/tmp/x.sqlite"));
        assert_eq!(arg_value(&a, "--csv").as_deref(), Some("games.csv"));
        assert_eq!(arg_value(&a, "--xlsx"), None);
        assert!(has_flag(&a, "--headers"));
    }

    #[test]
    fn args_override_env_and_defaults_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LEAGUE_CSV_PATH", "env.csv"),
            ("LEAGUE_CSV_DELIMITER", "comma"),
            ("LEAGUE_CSV_HAS_HEADERS", "yes"),
            ("XDG_CACHE_HOME", "/cache"),
        ]);
        let lookup = |k: &str| env.get(k).map(|v| v.to_string());

        let cfg = AppConfig::resolve(&args(&["--csv", "cli.csv"]), lookup).unwrap();
        assert_eq!(cfg.csv_path, PathBuf::from("cli.csv"));
        assert_eq!(cfg.db_path, PathBuf::from("/cache/league_table/league.sqlite"));
        assert_eq!(cfg.csv.delimiter, b',');
        assert!(cfg.csv.has_headers);
        assert!(cfg.json_out.is_none());

        let cfg = AppConfig::resolve(&[], |_| None).unwrap();
        assert_eq!(cfg.csv_path, PathBuf::from(DEFAULT_CSV));
        assert_eq!(cfg.db_path, PathBuf::from(DB_FILE));
        assert_eq!(cfg.csv, CsvOptions::default());
    }

    #[test]
    fn delimiter_must_be_single_byte() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("|").unwrap(), b'|');
        assert!(parse_delimiter(";;").is_err());
    }
}
