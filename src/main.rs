use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use bucketsweep::cli::args::{BackendArg, Cli, Commands, ConfigAction, OutputFormat};
use bucketsweep::cli::output;
use bucketsweep::common::config::{BackendKind, Config};
use bucketsweep::common::{format, logging};
use bucketsweep::hygiene::{self, PurgeReport};
use bucketsweep::storage::{self, ListOptions, StorageBackend};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config = Config::load()?;
    let _log_guard = logging::init(cli.verbose, config.log_to_file)?;

    if let Some(kind) = cli.backend {
        config.backend = match kind {
            BackendArg::Supabase => BackendKind::Supabase,
            BackendArg::Local => BackendKind::Local,
        };
    }
    if let Some(ref root) = cli.root {
        config.local_root = Some(root.clone());
    }
    let output_format = cli.output_format(&config);

    match cli.command {
        Commands::Ls {
            ref bucket,
            ref path,
            limit,
            offset,
            ref search,
            all,
        } => {
            let bucket = resolve_bucket(bucket, &config)?;
            let mut options = ListOptions::new();
            if let Some(n) = limit {
                options = options.limit(n);
            }
            if let Some(n) = offset {
                options = options.offset(n);
            }
            if let Some(term) = search {
                options = options.search(term.clone());
            }
            cmd_ls(&cli, &output_format, &config, &bucket, path, &options, all).await
        }

        Commands::Check { ref bucket, ref path } => {
            let bucket = resolve_bucket(bucket, &config)?;
            cmd_check(&cli, &output_format, &config, &bucket, path).await
        }

        Commands::Purge {
            ref bucket,
            ref path,
            dry_run,
            yes,
        } => {
            let bucket = resolve_bucket(bucket, &config)?;
            cmd_purge(&cli, &output_format, &config, &bucket, path, dry_run, yes).await
        }

        Commands::Config { ref action } => cmd_config(action, &config),

        Commands::Completions { ref shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                bucketsweep::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                bucketsweep::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                bucketsweep::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "bucketsweep", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn resolve_bucket(arg: &Option<String>, config: &Config) -> Result<String> {
    arg.clone()
        .or_else(|| config.default_bucket.clone())
        .context("No bucket given and no default_bucket configured")
}

fn open_backend(config: &Config) -> Result<Box<dyn StorageBackend>> {
    storage::from_config(config).context("Failed to set up storage backend")
}

/// Spinner shown while a storage call is outstanding
fn spinner(cli: &Cli, output_format: &OutputFormat, message: String) -> Option<ProgressBar> {
    if cli.quiet || !matches!(output_format, OutputFormat::Human) {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    Some(pb)
}

/// Prompt on stderr so stdout stays clean for JSON and quiet output
fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;
    eprint!("  {} {} [y/N] ", "❓", prompt);
    std::io::stderr().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

// ─── Ls ───────────────────────────────────────────────────────────────────────

async fn cmd_ls(
    cli: &Cli,
    output_format: &OutputFormat,
    config: &Config,
    bucket: &str,
    path: &str,
    options: &ListOptions,
    all: bool,
) -> Result<()> {
    let backend = open_backend(config)?;
    let location = format::format_location(bucket, path);
    let pb = spinner(cli, output_format, format!("Listing {}...", location));
    let start = Instant::now();

    let result = if all {
        backend
            .list(bucket, path, options)
            .await
            .map(Option::unwrap_or_default)
    } else {
        hygiene::list_files(backend.as_ref(), bucket, path, options).await
    };

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let files = result.with_context(|| format!("Failed to list {}", location))?;

    match output_format {
        OutputFormat::Human => {
            output::print_listing(&location, &files, all, start.elapsed().as_secs_f64())
        }
        OutputFormat::Json => output::print_listing_json(&files),
        OutputFormat::Quiet => output::print_listing_quiet(&files),
    }
    Ok(())
}

// ─── Check ────────────────────────────────────────────────────────────────────

async fn cmd_check(
    cli: &Cli,
    output_format: &OutputFormat,
    config: &Config,
    bucket: &str,
    path: &str,
) -> Result<()> {
    let backend = open_backend(config)?;
    let location = format::format_location(bucket, path);
    let pb = spinner(cli, output_format, format!("Checking {}...", location));

    let result = hygiene::plan_cleanup(backend.as_ref(), bucket, path).await;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let paths = result.with_context(|| format!("Failed to list {}", location))?;

    match output_format {
        OutputFormat::Human => output::print_plan(&location, &paths),
        OutputFormat::Json => output::print_plan_json(bucket, path, &paths),
        OutputFormat::Quiet => {
            for p in &paths {
                println!("{}", p);
            }
        }
    }
    Ok(())
}

// ─── Purge ────────────────────────────────────────────────────────────────────

async fn cmd_purge(
    cli: &Cli,
    output_format: &OutputFormat,
    config: &Config,
    bucket: &str,
    path: &str,
    dry_run: bool,
    yes: bool,
) -> Result<()> {
    let backend = open_backend(config)?;
    let location = format::format_location(bucket, path);
    let human = matches!(output_format, OutputFormat::Human);

    let mut planned = None;
    if dry_run || !yes {
        let paths = hygiene::plan_cleanup(backend.as_ref(), bucket, path)
            .await
            .with_context(|| format!("Failed to list {}", location))?;

        if dry_run {
            match output_format {
                OutputFormat::Human => {
                    output::print_plan(&location, &paths);
                    println!(
                        "  {} Dry run — would remove {}. Nothing deleted.",
                        "ℹ️",
                        format::format_count(paths.len())
                    );
                }
                OutputFormat::Json => output::print_plan_json(bucket, path, &paths),
                OutputFormat::Quiet => {
                    for p in &paths {
                        println!("{}", p);
                    }
                }
            }
            return Ok(());
        }

        if paths.is_empty() {
            match output_format {
                OutputFormat::Human => {
                    if !cli.quiet {
                        output::print_plan(&location, &paths);
                    }
                }
                OutputFormat::Json => output::print_purge_json(&PurgeReport::nothing_to_clean()),
                OutputFormat::Quiet => println!("0"),
            }
            return Ok(());
        }

        if human {
            output::print_plan(&location, &paths);
        } else {
            output::write_plan(&mut std::io::stderr(), &location, &paths)?;
        }
        if !confirm(&format!("Delete {} from {}?", format::format_count(paths.len()), location))? {
            if human {
                println!("  {} Cancelled", "✗".red());
            } else {
                eprintln!("  {} Cancelled", "✗".red());
            }
            return Ok(());
        }
        planned = Some(paths);
    }

    let pb = spinner(cli, output_format, format!("Cleaning {}...", location));
    let report = hygiene::cleanup_system_files(backend.as_ref(), bucket, path).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match output_format {
        OutputFormat::Human => output::print_purge_report(&location, &report),
        OutputFormat::Json => output::print_purge_json(&report),
        OutputFormat::Quiet => println!("{}", report.cleaned_count),
    }

    if let Some(planned) = planned {
        let unplanned = report.unplanned_paths(&planned);
        if !unplanned.is_empty() {
            tracing::warn!(
                bucket,
                path,
                count = unplanned.len(),
                "removed files that were not in the confirmed plan"
            );
            eprintln!(
                "  {} Also removed {} that appeared after confirmation:",
                "⚠".yellow(),
                format::format_count(unplanned.len())
            );
            for p in unplanned {
                eprintln!("    {} {}", "→".dimmed(), p);
            }
        }
    }

    if let Some(e) = report.error {
        return Err(anyhow::Error::new(e).context(format!("Cleanup of {} failed", location)));
    }
    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: &ConfigAction, current: &Config) -> Result<()> {
    match action {
        ConfigAction::Init => {
            Config::init_dirs()?;
            let path = Config::config_path();
            if path.exists() {
                println!("  {} Config already exists at {}", "✓".green(), path.display());
            } else {
                Config::default().save()?;
                println!("  {} bucketsweep initialized at {}", "✓".green(), Config::data_dir().display());
                println!("  Created: config.toml, logs/");
            }
            Ok(())
        }
        ConfigAction::Show => {
            println!("{}", toml::to_string_pretty(current)?);
            Ok(())
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            // Edit the file as stored, not the env/flag-adjusted view
            let mut config = Config::load_from(&Config::config_path())?;
            config.set(key, value)?;
            config.save()?;
            println!("  {} Set {} = {}", "✓".green(), key, value);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path().display());
            Ok(())
        }
    }
}
