use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::model::Category;
use services::{Clock, DEFAULT_ADVANCE_DELAY, DEFAULT_POOL_SIZE, QuizLoopService, QuizSettings};
use storage::{DirectoryQuestionSource, HttpQuestionSource, Storage};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};
use url::Url;

const DEFAULT_QUESTIONS_DIR: &str = "data/questions";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBaseUrl { raw: String },
    InvalidCategory { raw: String },
    MissingCategories,
    InvalidDelay { raw: String },
    InvalidPoolSize { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBaseUrl { raw } => write!(f, "invalid --base-url value: {raw}"),
            ArgsError::InvalidCategory { raw } => write!(f, "invalid category name: {raw}"),
            ArgsError::MissingCategories => {
                write!(f, "--base-url requires --categories (comma-separated)")
            }
            ArgsError::InvalidDelay { raw } => write!(f, "invalid --delay-ms value: {raw}"),
            ArgsError::InvalidPoolSize { raw } => {
                write!(f, "invalid --pool-size value: {raw} (must be at least 1)")
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

struct DesktopApp {
    quiz_loop: Arc<QuizLoopService>,
}

impl UiApp for DesktopApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SourceArgs {
    Directory(PathBuf),
    Http {
        base_url: Url,
        categories: Vec<Category>,
    },
}

#[derive(Debug)]
struct Args {
    source: SourceArgs,
    settings: QuizSettings,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--questions <dir>] [--delay-ms <n>] [--pool-size <n>]");
    eprintln!("  cargo run -p app -- --base-url <url> --categories <a,b,c> [--delay-ms <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --questions {DEFAULT_QUESTIONS_DIR}");
    eprintln!("  --delay-ms {}", DEFAULT_ADVANCE_DELAY.as_millis());
    eprintln!("  --pool-size {DEFAULT_POOL_SIZE}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_QUESTIONS_DIR, QUIZ_BASE_URL, QUIZ_CATEGORIES,");
    eprintln!("  QUIZ_ADVANCE_DELAY_MS, QUIZ_POOL_SIZE, RUST_LOG");
}

impl Args {
    /// Flags win over environment variables.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut questions_dir = env("QUIZ_QUESTIONS_DIR");
        let mut base_url = env("QUIZ_BASE_URL");
        let mut categories = env("QUIZ_CATEGORIES");
        let mut delay = env("QUIZ_ADVANCE_DELAY_MS");
        let mut pool_size = env("QUIZ_POOL_SIZE");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => questions_dir = Some(require_value(args, "--questions")?),
                "--base-url" => base_url = Some(require_value(args, "--base-url")?),
                "--categories" => categories = Some(require_value(args, "--categories")?),
                "--delay-ms" => delay = Some(require_value(args, "--delay-ms")?),
                "--pool-size" => pool_size = Some(require_value(args, "--pool-size")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let source = match base_url {
            Some(raw) => {
                let base_url =
                    Url::parse(raw.trim()).map_err(|_| ArgsError::InvalidBaseUrl { raw })?;
                let categories = parse_categories(categories.as_deref().unwrap_or(""))?;
                if categories.is_empty() {
                    return Err(ArgsError::MissingCategories);
                }
                SourceArgs::Http {
                    base_url,
                    categories,
                }
            }
            None => SourceArgs::Directory(PathBuf::from(
                questions_dir.unwrap_or_else(|| DEFAULT_QUESTIONS_DIR.to_string()),
            )),
        };

        let advance_delay = match delay {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ArgsError::InvalidDelay { raw })?,
            None => DEFAULT_ADVANCE_DELAY,
        };
        let pool_size = match pool_size {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(ArgsError::InvalidPoolSize { raw }),
            },
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            source,
            settings: QuizSettings {
                pool_size,
                advance_delay,
            },
        })
    }
}

fn parse_categories(raw: &str) -> Result<Vec<Category>, ArgsError> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            Category::new(name).map_err(|_| ArgsError::InvalidCategory {
                raw: name.to_string(),
            })
        })
        .collect()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_storage(source: SourceArgs) -> Storage {
    match source {
        SourceArgs::Directory(root) => {
            info!(root = %root.display(), "reading questions from directory");
            Storage::from_source(DirectoryQuestionSource::new(root))
        }
        SourceArgs::Http {
            base_url,
            categories,
        } => {
            info!(%base_url, count = categories.len(), "reading questions over http");
            Storage::from_source(HttpQuestionSource::new(base_url, categories))
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    let storage = build_storage(parsed.source);
    let quiz_loop = QuizLoopService::new(Clock::system(), Arc::clone(&storage.questions))
        .with_settings(parsed.settings);

    // A broken source is not fatal: the home screen shows the error and offers a retry.
    match quiz_loop.categories().await {
        Ok(categories) => info!(count = categories.len(), "question categories available"),
        Err(err) => warn!(error = %err, "could not list question categories"),
    }

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        quiz_loop: Arc::new(quiz_loop),
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Film Guessing Game")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Args, ArgsError> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter, |key| env.get(key).cloned())
    }

    #[test]
    fn defaults_use_directory_source() {
        let args = parse(&[], &[]).unwrap();
        assert_eq!(
            args.source,
            SourceArgs::Directory(PathBuf::from(DEFAULT_QUESTIONS_DIR))
        );
        assert_eq!(args.settings, QuizSettings::default());
    }

    #[test]
    fn flags_override_environment() {
        let args = parse(
            &["--questions", "quotes", "--delay-ms", "250", "--pool-size", "5"],
            &[("QUIZ_QUESTIONS_DIR", "ignored"), ("QUIZ_POOL_SIZE", "20")],
        )
        .unwrap();
        assert_eq!(args.source, SourceArgs::Directory(PathBuf::from("quotes")));
        assert_eq!(args.settings.advance_delay, Duration::from_millis(250));
        assert_eq!(args.settings.pool_size, 5);
    }

    #[test]
    fn base_url_needs_categories() {
        let err = parse(&["--base-url", "https://example.com/Quotes/"], &[]).unwrap_err();
        assert!(matches!(err, ArgsError::MissingCategories));

        let args = parse(
            &["--base-url", "https://example.com/Quotes/"],
            &[("QUIZ_CATEGORIES", "sample, classics")],
        )
        .unwrap();
        let SourceArgs::Http { categories, .. } = args.source else {
            panic!("expected http source");
        };
        assert_eq!(categories.len(), 2);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            parse(&["--pool-size", "0"], &[]).unwrap_err(),
            ArgsError::InvalidPoolSize { .. }
        ));
        assert!(matches!(
            parse(&["--delay-ms", "soon"], &[]).unwrap_err(),
            ArgsError::InvalidDelay { .. }
        ));
        assert!(matches!(
            parse(&["--delay-ms"], &[]).unwrap_err(),
            ArgsError::MissingValue { flag: "--delay-ms" }
        ));
        assert!(matches!(
            parse(&["--frobnicate"], &[]).unwrap_err(),
            ArgsError::UnknownArg(_)
        ));
        assert!(matches!(
            parse(&["--base-url", "not a url", "--categories", "a"], &[]).unwrap_err(),
            ArgsError::InvalidBaseUrl { .. }
        ));
        assert!(matches!(
            parse(&["--base-url", "https://x.test/", "--categories", "ALL"], &[]).unwrap_err(),
            ArgsError::InvalidCategory { .. }
        ));
    }
}
