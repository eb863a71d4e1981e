use std::io::{self, Write};

use colored::*;

use crate::common::format::{
    self, format_count, format_counted, format_record_size, format_timestamp,
};
use crate::hygiene::{self, PurgeReport};
use crate::storage::FileRecord;

/// Print a listing in human-readable format.
///
/// With `mark_system`, hidden-by-default entries are shown dimmed and tagged.
pub fn print_listing(location: &str, files: &[FileRecord], mark_system: bool, elapsed_secs: f64) {
    println!();
    println!("{}  {}", "🪣".to_string(), location.bold());
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {} in {}",
        format_count(files.len()),
        format::format_duration(elapsed_secs).cyan()
    );
    println!("{}", "─".repeat(60).dimmed());

    if files.is_empty() {
        println!("  {} Nothing here.", "✨".to_string());
        println!();
        return;
    }

    for file in files {
        let name = format::truncate(&file.name, 40);
        let hidden = mark_system && !hygiene::is_visible(file);
        let name = if file.is_folder() {
            format!("{}/", name).blue().bold()
        } else if hidden {
            name.dimmed()
        } else {
            name.normal()
        };

        print!(
            "  {:<42} {:>10}  {}",
            name,
            format_record_size(file.size()),
            format_timestamp(file.updated_at.as_ref()).dimmed()
        );
        if hidden {
            let tag = if file.is_system() { "system" } else { "empty" };
            print!("  {}", format!("[{}]", tag).yellow());
        }
        println!();
    }
    println!();
}

pub fn print_listing_json(files: &[FileRecord]) {
    match serde_json::to_string_pretty(files) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: {}", e),
    }
}

/// One name per line, folders with a trailing slash
pub fn print_listing_quiet(files: &[FileRecord]) {
    for file in files {
        if file.is_folder() {
            println!("{}/", file.name);
        } else {
            println!("{}", file.name);
        }
    }
}

/// Print the system files a cleanup would remove
pub fn print_plan(location: &str, paths: &[String]) {
    let _ = write_plan(&mut io::stdout(), location, paths);
}

/// Render the plan to any writer; the purge prompt sends it to stderr when
/// stdout is reserved for machine-readable output.
pub fn write_plan<W: Write>(out: &mut W, location: &str, paths: &[String]) -> io::Result<()> {
    writeln!(out)?;
    if paths.is_empty() {
        writeln!(out, "  {} No system files in {}", "✨", location.cyan())?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "  {} {} in {}",
        "●".yellow(),
        format_counted(paths.len(), "system file").yellow().bold(),
        location.cyan()
    )?;
    writeln!(out)?;
    for path in paths {
        writeln!(out, "    {} {}", "→".dimmed(), path)?;
    }
    writeln!(out)
}

pub fn print_plan_json(bucket: &str, path: &str, paths: &[String]) {
    let json = serde_json::json!({
        "bucket": bucket,
        "path": path,
        "systemFiles": paths,
    });
    match serde_json::to_string_pretty(&json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: {}", e),
    }
}

pub fn print_purge_report(location: &str, report: &PurgeReport) {
    println!();
    if !report.success {
        println!(
            "  {} Cleanup of {} failed: {}",
            "✗".red(),
            location.cyan(),
            report
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string())
                .red()
        );
        println!();
        return;
    }

    if report.cleaned_count == 0 {
        println!("  {} No system files in {}", "✨".to_string(), location.cyan());
    } else {
        println!(
            "  {} Removed {} from {}",
            "✓".green(),
            format_count(report.cleaned_count),
            location.cyan()
        );
        for path in &report.removed_paths {
            println!("    {} {}", "→".dimmed(), path.dimmed());
        }
    }
    println!();
}

pub fn print_purge_json(report: &PurgeReport) {
    match serde_json::to_string_pretty(report) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: {}", e),
    }
}
