use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use launchpin_core::logging::{self, LoggingConfig};
use launchpin_core::{Config, EqualityPattern, LaunchResult, PatternConfig, Query};
use launchpin_store::{FieldComparison, FieldMatch, Record, TopMostData, TopMostStore};
use owo_colors::OwoColorize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// launchpin - inspect pinned launcher results
#[derive(Parser, Debug)]
#[command(name = "launchpin")]
#[command(about = "Inspect a persisted pin file and test results against it", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to launchpin.toml (defaults are used when omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every pinned query
    List {
        /// Persisted pin file (JSON)
        #[arg(short, long, value_name = "PATH")]
        records: PathBuf,
    },
    /// Check whether a result would be pinned
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
struct CheckArgs {
    /// Persisted pin file (JSON)
    #[arg(short, long, value_name = "PATH")]
    records: PathBuf,

    /// Raw query text, exactly as typed
    #[arg(short, long)]
    query: String,

    #[arg(short, long)]
    title: String,

    #[arg(short, long, default_value = "")]
    subtitle: String,

    /// Id of the plugin producing the result
    #[arg(long = "plugin")]
    plugin_id: String,

    /// Equality pattern for the title
    #[arg(long, value_name = "REGEX")]
    title_pattern: Option<String>,

    /// Equality pattern for the subtitle
    #[arg(long, value_name = "REGEX")]
    subtitle_pattern: Option<String>,
}

/// Outcome of `launchpin check`
#[derive(Debug)]
struct CheckReport {
    pinned: bool,
    /// Record pinned under the query and how each field compared, if one exists
    fields: Option<(Record, FieldMatch, FieldMatch)>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let mut log_config = LoggingConfig::from(config.logging.clone());
    if cli.verbose {
        log_config = log_config.with_level("launchpin_store=debug,launchpin_core=debug");
    }
    let _guard = logging::init_logging(Some(log_config)).context("Failed to initialize logging")?;

    match cli.command {
        Commands::List { records } => {
            let store = load_store(&records)?;
            cmd_list(&store, cli.verbose);
        }
        Commands::Check(args) => {
            let store = load_store(&args.records)?;
            let report = check(&store, &args, &config.patterns)?;
            print_report(&args, &report, cli.verbose);
        }
    }

    Ok(())
}

/// Load config from file, or defaults when no path was given
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path).with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Read the persisted pin file into a fresh store
fn load_store(path: &Path) -> Result<TopMostStore> {
    let file = File::open(path).with_context(|| format!("Failed to open pin file {}", path.display()))?;
    let data = TopMostData::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse pin file {}", path.display()))?;

    let store = TopMostStore::new();
    store.load_data(data);
    Ok(store)
}

fn compile(pattern: Option<&str>, limits: &PatternConfig) -> Result<Option<EqualityPattern>> {
    pattern
        .map(|source| EqualityPattern::with_limits(source, limits))
        .transpose()
        .context("Invalid equality pattern")
}

fn check(store: &TopMostStore, args: &CheckArgs, limits: &PatternConfig) -> Result<CheckReport> {
    let title_pattern = compile(args.title_pattern.as_deref(), limits)?;
    let subtitle_pattern = compile(args.subtitle_pattern.as_deref(), limits)?;

    let mut result = LaunchResult::new(args.title.as_str(), args.plugin_id.as_str())
        .with_subtitle(args.subtitle.as_str())
        .with_origin_query(Query::new(args.query.as_str()));
    result.title_equal_pattern = title_pattern;
    result.subtitle_equal_pattern = subtitle_pattern;

    let fields = store.get(&args.query).map(|record| {
        let title = FieldComparison::from_pattern(result.title_equal_pattern.as_ref())
            .evaluate(record.title(), &result.title);
        let subtitle = FieldComparison::from_pattern(result.subtitle_equal_pattern.as_ref())
            .evaluate(record.subtitle(), &result.subtitle);
        (record, title, subtitle)
    });

    Ok(CheckReport { pinned: store.is_top_most(&result), fields })
}

fn cmd_list(store: &TopMostStore, verbose: bool) {
    let mut records: Vec<_> = store.snapshot().into_iter().collect();
    records.sort_by(|a, b| a.0.cmp(&b.0));

    println!("{}", "Pinned results".green().bold().underline());
    if records.is_empty() {
        println!("  (none)");
        return;
    }

    for (query, record) in records {
        println!("  {} -> {} [{}]", format!("{query:?}").cyan(), record.title(), record.plugin_id().yellow());
        if verbose && !record.subtitle().is_empty() {
            println!("      {}", record.subtitle().dimmed());
        }
    }
}

fn describe(field: FieldMatch) -> &'static str {
    match field {
        FieldMatch::Exact(true) => "equal",
        FieldMatch::Exact(false) => "different",
        FieldMatch::Fallback(true) => "equal (pattern missed, exact fallback)",
        FieldMatch::Fallback(false) => "different (pattern missed, exact fallback)",
        FieldMatch::ShapeMismatch => "different (captured group shape differs)",
        FieldMatch::Captures(true) => "captured text equal",
        FieldMatch::Captures(false) => "captured text differs",
    }
}

fn print_report(args: &CheckArgs, report: &CheckReport, verbose: bool) {
    if report.pinned {
        println!("{} {:?} is pinned for query {:?}", "Pinned:".green().bold(), args.title, args.query);
    } else {
        println!("{} {:?} is not pinned for query {:?}", "Not pinned:".yellow().bold(), args.title, args.query);
    }

    if !verbose {
        return;
    }

    match &report.fields {
        Some((record, title, subtitle)) => {
            println!("{} {:?} [{}]", "Record:".blue().bold(), record.title(), record.plugin_id());
            println!("  title:    {}", describe(*title));
            println!("  subtitle: {}", describe(*subtitle));
            let same_plugin = record.plugin_id() == args.plugin_id;
            println!("  plugin:   {}", if same_plugin { "equal" } else { "different" });
        }
        None => println!("{} nothing pinned under this query", "Info:".blue().bold()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    const PINS: &str = r#"{
        "records": {
            "b": { "title": "Build #12", "subtitle": "main", "pluginId": "ci" }
        }
    }"#;

    fn write_pins(temp: &TempDir) -> PathBuf {
        let path = temp.path().join("pins.json");
        std::fs::write(&path, PINS).unwrap();
        path
    }

    fn check_args(records: PathBuf, title: &str) -> CheckArgs {
        CheckArgs {
            records,
            query: "b".to_string(),
            title: title.to_string(),
            subtitle: "main".to_string(),
            plugin_id: "ci".to_string(),
            title_pattern: None,
            subtitle_pattern: None,
        }
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_list_command() {
        let cli = Cli::try_parse_from(["launchpin", "list", "--records", "pins.json"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::List { records } if records == Path::new("pins.json")));
    }

    #[test]
    fn test_cli_check_command() {
        let cli = Cli::try_parse_from([
            "launchpin",
            "--verbose",
            "check",
            "--records",
            "pins.json",
            "--query",
            "b",
            "--title",
            "Build #12 (3 new)",
            "--plugin",
            "ci",
            "--title-pattern",
            r"^Build #(\d+)",
        ])
        .unwrap();

        assert!(cli.verbose);
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.query, "b");
            assert_eq!(args.subtitle, "");
            assert_eq!(args.plugin_id, "ci");
            assert_eq!(args.title_pattern.as_deref(), Some(r"^Build #(\d+)"));
            assert!(args.subtitle_pattern.is_none());
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("launchpin.toml");
        std::fs::write(&path, "[patterns]\ncase_insensitive = true\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert!(config.patterns.case_insensitive);
    }

    #[test]
    fn test_load_store_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_store(&temp.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to open pin file"));
    }

    #[test]
    fn test_load_store_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pins.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_store(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse pin file"));
    }

    #[test]
    fn test_check_exact_pin() {
        let temp = TempDir::new().unwrap();
        let store = load_store(&write_pins(&temp)).unwrap();

        let report = check(&store, &check_args(write_pins(&temp), "Build #12"), &PatternConfig::default()).unwrap();
        assert!(report.pinned);

        let (_, title, subtitle) = report.fields.unwrap();
        assert_eq!(title, FieldMatch::Exact(true));
        assert_eq!(subtitle, FieldMatch::Exact(true));
    }

    #[test]
    fn test_check_with_title_pattern() {
        let temp = TempDir::new().unwrap();
        let path = write_pins(&temp);
        let store = load_store(&path).unwrap();

        let mut args = check_args(path, "Build #12 (3 new)");
        assert!(!check(&store, &args, &PatternConfig::default()).unwrap().pinned);

        args.title_pattern = Some(r"^Build #(\d+)".to_string());
        let report = check(&store, &args, &PatternConfig::default()).unwrap();
        assert!(report.pinned);
        assert_eq!(report.fields.unwrap().1, FieldMatch::Captures(true));
    }

    #[test]
    fn test_check_unpinned_query() {
        let temp = TempDir::new().unwrap();
        let path = write_pins(&temp);
        let store = load_store(&path).unwrap();

        let mut args = check_args(path, "Build #12");
        args.query = "build".to_string();

        let report = check(&store, &args, &PatternConfig::default()).unwrap();
        assert!(!report.pinned);
        assert!(report.fields.is_none());
    }

    #[test]
    fn test_check_invalid_pattern() {
        let temp = TempDir::new().unwrap();
        let path = write_pins(&temp);
        let store = load_store(&path).unwrap();

        let mut args = check_args(path, "Build #12");
        args.title_pattern = Some("(".to_string());

        let err = check(&store, &args, &PatternConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid equality pattern"));
    }

    #[test]
    fn test_describe_fields() {
        assert_eq!(describe(FieldMatch::ShapeMismatch), "different (captured group shape differs)");
        assert_eq!(describe(FieldMatch::Captures(true)), "captured text equal");
    }
}
