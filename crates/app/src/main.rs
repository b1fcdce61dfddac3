use std::fmt;
use std::sync::Arc;

use services::{AppServices, Clock, SettingsService};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use tutor_core::model::{NarratorSettingsDraft, VoicePreference};

mod console;
mod repl;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidVoice { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidVoice { raw } => {
                write!(f, "invalid --voice value: {raw} (use female or male)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- tutor    [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- settings [--db <sqlite_url>] [options]");
    eprintln!();
    eprintln!("Settings options (none prints the current setup):");
    eprintln!("  --api-key <key> | --clear-api-key      premium narration credential");
    eprintln!("  --base-url <url> | --clear-base-url    alternate speech endpoint");
    eprintln!("  --voice <female|male>                  narration voice");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://tutor.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MATHTUTOR_DB_URL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Tutor,
    Settings,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "tutor" => Some(Self::Tutor),
            "settings" => Some(Self::Settings),
            _ => None,
        }
    }
}

fn default_db_url() -> String {
    std::env::var("MATHTUTOR_DB_URL")
        .ok()
        .map_or_else(|| "sqlite://tutor.sqlite3".into(), normalize_sqlite_url)
}

struct TutorArgs {
    db_url: String,
}

impl TutorArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = default_db_url();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url })
    }
}

struct SettingsArgs {
    db_url: String,
    api_key: Option<String>,
    clear_api_key: bool,
    base_url: Option<String>,
    clear_base_url: bool,
    voice: Option<VoicePreference>,
}

impl SettingsArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            db_url: default_db_url(),
            api_key: None,
            clear_api_key: false,
            base_url: None,
            clear_base_url: false,
            voice: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--api-key" => parsed.api_key = Some(require_value(args, "--api-key")?),
                "--clear-api-key" => parsed.clear_api_key = true,
                "--base-url" => parsed.base_url = Some(require_value(args, "--base-url")?),
                "--clear-base-url" => parsed.clear_base_url = true,
                "--voice" => {
                    let value = require_value(args, "--voice")?;
                    let voice = value
                        .parse::<VoicePreference>()
                        .map_err(|_| ArgsError::InvalidVoice { raw: value.clone() })?;
                    parsed.voice = Some(voice);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn changes_anything(&self) -> bool {
        self.api_key.is_some()
            || self.clear_api_key
            || self.base_url.is_some()
            || self.clear_base_url
            || self.voice.is_some()
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:")
    {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.contains("mode=memory") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    // Logs go to stderr; stdout is the child's transcript.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: the tutor loop when no subcommand is given.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Tutor,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Tutor,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    match cmd {
        Command::Tutor => {
            let parsed = TutorArgs::parse(&mut iter).map_err(|e| {
                eprintln!("{e}");
                print_usage();
                e
            })?;

            // Open + migrate SQLite at startup. Keep this in the binary glue so
            // core/services stay pure.
            prepare_sqlite_file(&parsed.db_url)?;
            tracing::info!(db = %parsed.db_url, "opening tutor database");

            let services = AppServices::new_sqlite(
                &parsed.db_url,
                Clock::default_clock(),
                console::console_ports(),
            )
            .await?;

            repl::run(&services).await?;
            Ok(())
        }
        Command::Settings => {
            let parsed = SettingsArgs::parse(&mut iter).map_err(|e| {
                eprintln!("{e}");
                print_usage();
                e
            })?;

            prepare_sqlite_file(&parsed.db_url)?;
            let storage = Storage::sqlite(&parsed.db_url).await?;
            let service = SettingsService::new(Arc::clone(&storage.settings));
            apply_settings(&service, parsed).await
        }
    }
}

/// Merges the given flags over the stored settings, then reports the result.
///
/// The credential itself never goes to the console; whether one is set is all
/// a parent needs to see.
async fn apply_settings(
    service: &SettingsService,
    args: SettingsArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let current = service.load().await?;

    let settings = if args.changes_anything() {
        let draft = NarratorSettingsDraft {
            api_key: if args.clear_api_key {
                None
            } else {
                args.api_key.or_else(|| current.api_key().map(str::to_string))
            },
            api_base_url: if args.clear_base_url {
                None
            } else {
                args.base_url
                    .or_else(|| current.api_base_url().map(str::to_string))
            },
            voice: args.voice.unwrap_or(current.voice()),
        };
        let saved = service.save(draft).await?;
        println!("Saved.");
        saved
    } else {
        current
    };

    println!(
        "narration: {}",
        if settings.premium_enabled() {
            "premium (credential set)"
        } else {
            "local voice"
        }
    );
    println!("voice:     {}", settings.voice().as_str());
    println!("base URL:  {}", settings.api_base_url().unwrap_or("(default)"));
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
