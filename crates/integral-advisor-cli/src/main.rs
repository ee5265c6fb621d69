use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use integral_advisor_core::config::Config;
use integral_advisor_core::{
    AdvisorError, Classification, Classifier, OutputFormat, Result, DEFAULT_INTEGRAL,
    SAMPLE_INTEGRALS,
};

mod args;
use args::{Cli, Commands, ConfigAction, Shell};

/// Presentation settings shared by the analyze handlers
struct View {
    format: OutputFormat,
    delay: Duration,
    verbose: bool,
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let base_dir = resolve_base_dir(cli.base_dir);

    let result = match cli.command {
        Some(Commands::Analyze {
            expression,
            json,
            no_delay,
        }) => handle_analyze(
            &base_dir,
            &expression,
            json,
            no_delay,
            cli.verbose,
            cli.quiet,
        ),
        Some(Commands::Examples { run }) => handle_examples(&base_dir, run),
        Some(Commands::Rules) => handle_rules(&base_dir, cli.verbose),
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "integral-advisor", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("INTEGRAL_ADVISOR_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".integral-advisor"))
        .unwrap_or_else(|| PathBuf::from(".integral-advisor"))
}

fn handle_analyze(
    base_dir: &Path,
    expression: &[String],
    json: bool,
    no_delay: bool,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let config = Config::load(base_dir)?;
    let classifier = config.classifier()?;
    tracing::debug!(
        base_dir = %base_dir.display(),
        rules = classifier.rules().count(),
        "classifier ready"
    );
    let view = View {
        format: if json {
            OutputFormat::Json
        } else {
            config.output.format
        },
        delay: if no_delay {
            Duration::ZERO
        } else {
            config.analysis.delay()
        },
        verbose,
        quiet,
    };

    if let Some(input) = initial_input(expression, io::stdin().is_terminal()) {
        analyze_one(&classifier, &input, &view)?;
    }
    if !expression.is_empty() {
        return Ok(());
    }

    // Each line replaces the previous result
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        analyze_one(&classifier, &line?, &view)?;
    }
    Ok(())
}

/// Expression to analyze before reading stdin, if any
///
/// Words on the command line win; an interactive session starts from
/// [`DEFAULT_INTEGRAL`], piped input starts from nothing.
fn initial_input(expression: &[String], interactive: bool) -> Option<String> {
    if !expression.is_empty() {
        Some(expression.join(" "))
    } else if interactive {
        Some(DEFAULT_INTEGRAL.to_string())
    } else {
        None
    }
}

fn analyze_one(classifier: &Classifier, input: &str, view: &View) -> Result<()> {
    if input.trim().is_empty() {
        if !view.quiet && view.format == OutputFormat::Text {
            println!("{}", "Nothing to analyze.".dimmed());
        } else if view.format == OutputFormat::Json {
            println!("null");
        }
        return Ok(());
    }

    if !view.delay.is_zero() {
        if !view.quiet && view.format == OutputFormat::Text {
            print!("{}", "Analyzing...".dimmed());
            io::stdout().flush()?;
        }
        thread::sleep(view.delay);
        if !view.quiet && view.format == OutputFormat::Text {
            // clear the progress line
            print!("\r{}\r", " ".repeat(12));
        }
    }

    let classification = classifier.classify_detailed(input);
    match view.format {
        OutputFormat::Json => {
            let json = if view.verbose {
                serde_json::to_string_pretty(&classification)?
            } else {
                serde_json::to_string_pretty(&classification.result)?
            };
            println!("{}", json);
        }
        OutputFormat::Text => print_classification(input, &classification, view),
    }
    Ok(())
}

fn print_classification(input: &str, classification: &Classification, view: &View) {
    let result = &classification.result;

    if view.quiet {
        println!("{}", result.method);
        return;
    }

    println!();
    println!("{} {}", "Integral:".bold(), input.trim());
    println!("{} {}", "Method:  ".green().bold(), result.method);
    println!("{} {}", "Type:    ".cyan(), result.category);
    println!();
    println!("  {}", result.explanation);
    println!();
    println!("{} {}", "Example: ".cyan(), result.example);

    if view.verbose {
        println!();
        println!("{} {}", "Matched: ".dimmed(), classification.source);
        println!("{} {}", "Input:   ".dimmed(), classification.normalized);
    }
    println!();
}

fn handle_examples(base_dir: &Path, run: bool) -> Result<()> {
    if !run {
        println!();
        for (i, sample) in SAMPLE_INTEGRALS.iter().enumerate() {
            println!("  {} {}", format!("{}.", i + 1).dimmed(), sample);
        }
        println!();
        println!("Try: integral-advisor analyze \"{}\"", SAMPLE_INTEGRALS[0]);
        return Ok(());
    }

    let classifier = Config::load(base_dir)?.classifier()?;
    let width = SAMPLE_INTEGRALS
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0);

    println!();
    for sample in SAMPLE_INTEGRALS {
        let result = classifier.classify(sample);
        let pad = width - sample.chars().count();
        println!(
            "  {}{}  {} {}",
            sample,
            " ".repeat(pad),
            "→".dimmed(),
            result.method.green()
        );
    }
    println!();
    Ok(())
}

fn handle_rules(base_dir: &Path, verbose: bool) -> Result<()> {
    let classifier = Config::load(base_dir)?.classifier()?;

    println!();
    for (i, rule) in classifier.rules().enumerate() {
        let origin = if rule.builtin {
            String::new()
        } else {
            format!(" {}", "[custom]".yellow())
        };
        println!(
            "  {} {}{}  {}",
            format!("{}.", i + 1).dimmed(),
            rule.name.cyan(),
            origin,
            rule.result.method
        );
        if verbose {
            for pattern in &rule.patterns {
                println!("       {}", pattern.dimmed());
            }
        }
    }
    println!();
    println!(
        "{}",
        "Fallbacks: composite function when parentheses are present, otherwise direct review."
            .dimmed()
    );
    println!();
    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(AdvisorError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            // reject rule changes the classifier cannot compile
            config.classifier()?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
