use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use gitrisk_core::{GitRiskConfig, OutputFormat};
use gitrisk_history::report::{ReportOptions, RiskSummary};
use gitrisk_history::risk::MergeRiskResolver;
use gitrisk_history::source::GitRepository;
use gitrisk_history::tickets::TicketExtractor;

const CONFIG_FILE: &str = ".gitrisk.toml";

#[derive(Parser)]
#[command(
    name = "git-risk",
    version,
    about = "Find the tickets at regression risk after a merge",
    long_about = "Find the tickets at regression risk after a merge.\n\n\
                   Walks the history each parent of a merge commit brought in since their\n\
                   common ancestor and collects the ticket references found in those\n\
                   commit messages. Commits without a ticket are listed separately.\n\n\
                   Examples:\n  \
                     git-risk                          Check the merge at HEAD\n  \
                     git-risk 3f2a9c1                  Check a specific merge commit\n  \
                     git-risk -c risk.toml -q main     Use a config file, skip the note\n  \
                     git-risk -t samples.txt           Check the ticket spec against sample lines\n  \
                     git-risk init                     Create a default .gitrisk.toml",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Merge commit to check (default: HEAD)
    #[arg(default_value = "HEAD")]
    commit: String,

    /// Path to configuration file (default: .gitrisk.toml in the repository root)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Repository path (default: current directory)
    #[arg(long, short, default_value = ".")]
    repo: PathBuf,

    /// Do not list suspect commits that reference no ticket
    #[arg(long, short)]
    quiet: bool,

    /// Print the ticket found on each line of FILE instead of checking a merge
    #[arg(
        long,
        short,
        value_name = "FILE",
        long_help = "Print the ticket found on each line of FILE instead of checking a merge.\n\n\
                     Every non-blank line must match the configured ticket spec; the first\n\
                     line that does not is reported as an error."
    )]
    test: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        default_value = "text",
        long_help = "Output format for the report.\n\n\
                       Formats:\n  \
                         text      Human-readable summary (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create a default .gitrisk.toml configuration file
    #[command(long_about = "Create a default .gitrisk.toml configuration file.\n\n\
        Writes a template with an example ticket spec into the current directory.\n\
        Fails if .gitrisk.toml already exists.")]
    Init,
}

const DEFAULT_CONFIG: &str = r#"# git-risk configuration

[main]
# Regular expression matching a ticket identifier. It is applied to each
# line of a commit message separately, so anchor it with ^ to only accept
# tickets at the start of a line.
ticket-spec = "^[A-Z][A-Z0-9]*-[0-9]+"
"#;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

fn load_config(explicit: Option<&Path>, search_root: &Path) -> Result<GitRiskConfig> {
    if let Some(path) = explicit {
        return GitRiskConfig::from_file(path)
            .wrap_err(format!("loading configuration from {}", path.display()));
    }

    let default_path = search_root.join(CONFIG_FILE);
    if default_path.exists() {
        tracing::debug!(path = %default_path.display(), "using default configuration");
        return GitRiskConfig::from_file(&default_path)
            .wrap_err(format!("loading configuration from {}", default_path.display()));
    }

    miette::bail!(miette::miette!(
        help = "Pass --config <file>, or run 'git-risk init' to create {CONFIG_FILE}",
        "No configuration found in {}",
        search_root.display()
    ));
}

fn build_extractor(config: &GitRiskConfig) -> Result<TicketExtractor> {
    let spec = config.ticket_spec()?;
    tracing::debug!(spec, "compiling ticket spec");
    Ok(TicketExtractor::new(spec)?)
}

fn run_init() -> Result<()> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() {
        miette::bail!("{CONFIG_FILE} already exists");
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .into_diagnostic()
        .wrap_err(format!("writing {CONFIG_FILE}"))?;
    println!("Created {CONFIG_FILE}");
    Ok(())
}

fn run_pattern_test(cli: &Cli, file: &Path) -> Result<()> {
    // Same lookup as a merge check; `--repo` need not be a repository here.
    let search_root = GitRepository::discover(&cli.repo)
        .map(|repo| repo.root().to_path_buf())
        .unwrap_or_else(|_| cli.repo.clone());
    let config = load_config(cli.config.as_deref(), &search_root)?;
    let extractor = build_extractor(&config)?;
    let tickets = extractor
        .tickets_in_file(file)
        .wrap_err(format!("checking {}", file.display()))?;

    match cli.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&tickets).into_diagnostic()?
            );
        }
        OutputFormat::Markdown => {
            for ticket in &tickets {
                println!("- {ticket}");
            }
        }
        OutputFormat::Text => {
            for ticket in &tickets {
                println!("{ticket}");
            }
        }
    }
    Ok(())
}

fn run_check(cli: &Cli) -> Result<()> {
    let repo = match GitRepository::discover(&cli.repo) {
        Ok(repo) => repo,
        Err(_) => miette::bail!(miette::miette!(
            help = "Run git-risk from inside a git repository, or specify --repo",
            "Not a git repository: {}",
            cli.repo.display()
        )),
    };

    let config = load_config(cli.config.as_deref(), repo.root())?;
    let extractor = build_extractor(&config)?;

    tracing::info!(
        repo = %repo.root().display(),
        commit = %cli.commit,
        "checking merge"
    );
    let resolver = MergeRiskResolver::new(repo, extractor);
    let report = resolver
        .check_merge(&cli.commit)
        .wrap_err(format!("checking merge '{}'", cli.commit))?;

    let options = ReportOptions { quiet: cli.quiet };
    let summary = RiskSummary::new(&report, &options);
    match cli.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).into_diagnostic()?
            );
        }
        OutputFormat::Markdown => print!("{}", summary.to_markdown()),
        OutputFormat::Text => print!("{summary}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(Command::Init) = cli.command {
        return run_init();
    }

    match &cli.test {
        Some(file) => run_pattern_test(&cli, file),
        None => run_check(&cli),
    }
}
