//! Command execution for learnctl.

use crate::cli::{Cli, Commands};
use crate::config::LearnConfig;
use crate::display::{
    render_audit, render_projects, render_report, render_section, render_skills, render_xp,
    Palette,
};
use crate::source::{gather, FileSource, RecordSource};
use anyhow::{Context, Result};
use learnboard_shared::report::{build_report_from_raw, Report, ReportOptions};
use tracing::debug;

/// Apply command-line overrides on top of the loaded config
pub fn effective_config(cli: &Cli, mut config: LearnConfig) -> LearnConfig {
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if cli.no_color {
        config.color = false;
    }
    config
}

/// Gather, normalize and aggregate one report
pub async fn load_report<S: RecordSource>(source: &S, options: &ReportOptions) -> Result<Report> {
    let raw = gather(source).await?;
    let report = build_report_from_raw(&raw, options).context("cannot build report")?;
    debug!(
        target: "learnctl",
        "report built: {} xp, {} skipped records",
        report.total_xp,
        report.diagnostics.skipped_records
    );
    Ok(report)
}

/// Run a parsed command and return what to print on stdout
pub async fn run(cli: &Cli, config: &LearnConfig) -> Result<String> {
    let render: fn(&Report, &Palette) -> String = match cli.command {
        Commands::Config => return config.to_toml(),
        Commands::Report { .. } => render_report,
        Commands::Xp => |r, p| render_section(r, p, render_xp),
        Commands::Projects => |r, p| render_section(r, p, render_projects),
        Commands::Skills => |r, p| render_section(r, p, render_skills),
        Commands::Audit => |r, p| render_section(r, p, render_audit),
    };

    let source = FileSource::new(&config.data_dir);
    let report = load_report(&source, &config.report_options()).await?;

    if cli.command == (Commands::Report { json: true }) {
        return serde_json::to_string_pretty(&report).context("cannot serialize report");
    }
    Ok(render(&report, &Palette::new(config.color)))
}
