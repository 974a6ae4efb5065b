use anyhow::{Context, Result};
use cli::Cli;
use config::Settings;
use indicatif::{ProgressBar, ProgressStyle};
use sinks::Render;
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;

mod cli;
mod config;
mod pagination;
mod sinks;
mod source;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else if cli.quiet {
        LevelFilter::ERROR
    } else {
        LevelFilter::WARN
    };

    // `log` records from our own call sites are bridged into this subscriber
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();
    init_logging(&cli);

    let narrate = |message: String| {
        if !cli.quiet {
            println!("{message}");
        }
    };

    let Settings {
        source_dir,
        docx,
        collect,
    } = Settings::from_cli(&cli)?;

    narrate(format!("Collecting source code from: {}", source_dir.display()));
    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress.set_message("Reading files...");

    let collection = source::collect(&source_dir, &collect, &progress)?;
    progress.finish_and_clear();

    narrate(format!(
        "Found {} source files",
        collection.sequence.files().len() + collection.skipped.len()
    ));
    if !collection.skipped.is_empty() {
        narrate(format!(
            "Skipped {} unreadable files:",
            collection.skipped.len()
        ));
        for skipped in collection.skipped.iter() {
            narrate(format!(
                "  {} ({})",
                skipped.relative.display(),
                skipped.reason
            ));
        }
    }

    let policy = pagination::REGISTRATION;
    let selection = policy.select(&collection.sequence);
    narrate(format!("Total lines collected: {}", collection.sequence.len()));
    narrate(format!("Total pages: {}", selection.total_pages()));

    let ranges = selection
        .kept_line_ranges()
        .iter()
        .map(|(first, last)| format!("{first}-{last}"))
        .collect::<Vec<String>>()
        .join(" and ");
    if selection.is_truncated() {
        narrate(format!(
            "Selected pages: {} (lines {ranges} of {})",
            selection.selected_pages(),
            selection.total_lines()
        ));
    } else {
        narrate(format!("Selected pages: {}", selection.selected_pages()));
    }

    narrate("Creating DOCX document...".to_string());
    narrate(format!("Saving document to: {}", docx.outfile.display()));
    let spinner = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    let stats = docx
        .render(&selection, &spinner)
        .with_context(|| "Failed to render DOCX")?;
    log::debug!(
        "Wrote {} paragraphs over {} pages",
        stats.paragraph_count,
        stats.page_count
    );
    narrate("Done!".to_string());

    Ok(())
}
