use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use manifesto_agents::advisor::{load_decision_tree, Advisor, Priority};
use manifesto_agents::frontmatter::{self, read_front_matter};
use manifesto_agents::tui::App;
use manifesto_agents::{discover_manifestos, Config, GeminiClient, IndexBuilder};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(name = "manifesto")]
#[command(author, version, about = "Manifesto agent data builder and adoption advisor")]
struct Cli {
    /// Config file (default: nearest .manifesto/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild the agent data directory from manifesto front matter
    Build {
        /// Corpus root containing one directory per manifesto
        #[arg(long)]
        root: Option<PathBuf>,

        /// Output directory (wiped and recreated)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory with hand-maintained agent data files
        #[arg(long)]
        manual_dir: Option<PathBuf>,
    },

    /// List the manifestos the build would index
    List {
        /// Corpus root containing one directory per manifesto
        #[arg(long)]
        root: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recommend a manifesto from the decision tree
    Advise {
        /// Your team's top priority (prompted for when omitted)
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,

        /// Agent data directory (default: configured output directory)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Ask a generative model for advice in an interactive terminal UI
    Tui {
        /// Agent data directory (default: configured output directory)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    // Credentials may live in a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Log lines would corrupt the alternate screen
    if !matches!(cli.command, Command::Tui { .. }) {
        init_logging();
    }

    let config = match cli.config.as_deref() {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => fail(e),
        },
        None => Config::load(),
    };

    let result = match cli.command {
        Command::Build {
            root,
            output,
            manual_dir,
        } => {
            let mut config = with_root(config, root);
            if let Some(output) = output {
                config.paths.output_dir = absolute(output);
            }
            if let Some(manual_dir) = manual_dir {
                config.paths.manual_dir = absolute(manual_dir);
            }
            cmd_build(config)
        }
        Command::List { root, json } => cmd_list(&with_root(config, root), json),
        Command::Advise { priority, data_dir } => {
            let data_dir = data_dir.unwrap_or_else(|| config.output_dir());
            cmd_advise(&data_dir, priority)
        }
        Command::Tui { data_dir } => {
            let data_dir = data_dir.unwrap_or_else(|| config.output_dir());
            cmd_tui(&config, &data_dir)
        }
        Command::Completion { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "manifesto", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        fail(e);
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "manifesto_agents=info".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), e);
    std::process::exit(1);
}

fn with_root(config: Config, root: Option<PathBuf>) -> Config {
    match root {
        Some(root) => config.with_root(root),
        None => config,
    }
}

/// CLI paths are relative to the working directory, not the corpus root
fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

fn cmd_build(config: Config) -> CliResult {
    eprintln!(
        "{} {}",
        "Building agent data from".bold(),
        config.root().display()
    );

    let report = IndexBuilder::new(config).build()?;

    for (id, file) in &report.entries {
        println!("  {} {:<32} {}", "✓".green(), id, file.display());
    }
    for file in &report.skipped {
        println!(
            "  {} {:<32} {}",
            "⚠".yellow(),
            "(no id, skipped)".dimmed(),
            file.display()
        );
    }

    println!(
        "\n{} {} ({} manifestos)",
        "Generated".green(),
        report.index_path.display(),
        report.entries.len()
    );
    println!(
        "{} {} ({} measurement frameworks)",
        "Generated".green(),
        report.measurement_path.display(),
        report.measurement_count
    );
    for dest in &report.copied {
        println!("{} {}", "Copied".green(), dest.display());
    }
    for missing in &report.missing_manual {
        println!(
            "{} manual file not found: {}",
            "Warning:".yellow(),
            missing.display()
        );
    }
    println!("{}", "Build complete.".bold());
    Ok(())
}

fn cmd_list(config: &Config, json: bool) -> CliResult {
    let sources = discover_manifestos(config)?;
    let listed: Vec<(Option<String>, &Path)> = sources
        .iter()
        .map(|source| {
            let id = read_front_matter(&source.file).and_then(|fm| {
                fm.get("id").and_then(frontmatter::scalar_to_string)
            });
            (id, source.file.as_path())
        })
        .collect();

    if json {
        let items: Vec<serde_json::Value> = listed
            .iter()
            .map(|(id, file)| serde_json::json!({ "id": id, "file": file }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if listed.is_empty() {
        println!("No manifestos found under {}", config.root().display());
        return Ok(());
    }
    for (id, file) in &listed {
        match id {
            Some(id) => println!("{:<32} {}", id.cyan(), file.display()),
            None => println!("{:<32} {}", "(no id)".dimmed(), file.display()),
        }
    }
    Ok(())
}

fn cmd_advise(data_dir: &Path, priority: Option<Priority>) -> CliResult {
    let advisor = Advisor::new(load_decision_tree(data_dir)?);

    let recommendation = match priority {
        Some(priority) => advisor.recommend(priority.as_str())?,
        None => advisor.prompt(io::stdin().lock(), io::stdout())?,
    };
    print!("{}", recommendation.render());
    Ok(())
}

fn cmd_tui(config: &Config, data_dir: &Path) -> CliResult {
    // Loaded up front so a missing build fails before the screen switches
    let tree = load_decision_tree(data_dir)?;

    let client = GeminiClient::from_env(&config.advisor);
    let app = App::new(
        Arc::new(client),
        tree.len(),
        config.advisor.model.clone(),
        config.advisor.max_concern_chars,
    );
    manifesto_agents::tui::run(app)
}
