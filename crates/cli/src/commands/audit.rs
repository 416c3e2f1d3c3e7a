//! The audit command: load facts, run the engine, render, map exit status.

use crate::facts::JsonFactSource;
use crate::verifier::HttpLinkVerifier;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tenken_policy::{
    AuditReport, Evidence, FactSource, PolicyEngine, SdkRange, Severity, ANDROID_MAX_SDK,
};

#[derive(Args)]
pub struct AuditArgs {
    /// Path to the manifest fact bundle (JSON) produced by the extractor
    pub path: PathBuf,

    /// Minimum API level supported by the application
    #[arg(long = "min-sdk-version", short = 'm',
          value_parser = clap::value_parser!(u32).range(1..=ANDROID_MAX_SDK as i64))]
    pub min_sdk_version: u32,

    /// Maximum API level supported by the application
    #[arg(long = "max-sdk-version", short = 'M',
          value_parser = clap::value_parser!(u32).range(1..=ANDROID_MAX_SDK as i64))]
    pub max_sdk_version: u32,

    /// Probe each app-link host for its Digital Asset Links file
    #[arg(long)]
    pub verify_links: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,

    /// 0 shows everything, 1 warnings and up, 2 criticals only
    #[arg(long, short = 'v', default_value_t = 0,
          value_parser = clap::value_parser!(u8).range(0..=2))]
    pub log_level: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

/// 2 when any critical finding is present, 1 for warnings, 0 otherwise.
pub fn exit_status(report: &AuditReport) -> i32 {
    match report.max_severity() {
        Some(Severity::Critical) => 2,
        Some(Severity::Warning) => 1,
        _ => 0,
    }
}

pub fn execute(args: AuditArgs) -> Result<i32> {
    let range = SdkRange::new(args.min_sdk_version, args.max_sdk_version)
        .context("invalid SDK range")?;

    let facts = JsonFactSource::new(args.path.clone())
        .load()
        .with_context(|| format!("cannot load facts from {}", args.path.display()))?;

    let mut engine = PolicyEngine::with_default_rules();
    if args.verify_links {
        engine = engine.with_verifier(Arc::new(HttpLinkVerifier::new()?));
    }

    let report = engine.run(&facts, range);

    match args.format {
        OutputFormat::Console => render_console(&report, &args),
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Markdown => println!("{}", report.to_markdown()),
    }

    Ok(exit_status(&report))
}

fn render_console(report: &AuditReport, args: &AuditArgs) {
    println!(
        "{}",
        format!("Analysis of {}", args.path.display())
            .magenta()
            .bold()
    );

    let threshold = match args.log_level {
        0 => Severity::Info,
        1 => Severity::Warning,
        _ => Severity::Critical,
    };

    let mut current_rule = "";
    for finding in report.findings() {
        if finding.severity < threshold {
            continue;
        }

        if finding.rule_id != current_rule {
            current_rule = &finding.rule_id;
            println!("\n{}", format!("[*] {current_rule}").blue());
        }

        let line = format!("{} {}", finding.severity.marker(), finding.message);
        match finding.severity {
            Severity::Critical => println!("{}", line.red()),
            Severity::Warning => println!("{}", line.yellow()),
            Severity::Info => println!("{line}"),
        }

        if let Some(ref evidence) = finding.evidence {
            if !evidence.is_empty() {
                print!("{}", render_table(evidence));
            }
        }
    }

    let count = report.count_by_severity();
    println!(
        "\n{} critical, {} warning, {} info",
        count.critical, count.warning, count.info
    );
}

/// Plain ASCII grid, one row per evidence entry. Absent cells render empty.
fn render_table(evidence: &Evidence) -> String {
    let mut widths: Vec<usize> = evidence.headers.iter().map(String::len).collect();
    for row in &evidence.rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.as_deref().map_or(0, str::len));
        }
    }

    let separator = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let format_row = |cells: Vec<&str>| {
        let mut line = String::from("|");
        for (idx, cell) in cells.iter().enumerate() {
            line.push_str(&format!(" {cell:<width$} |", width = widths[idx]));
        }
        line.push('\n');
        line
    };

    let mut table = String::new();
    table.push_str(&separator);
    table.push_str(&format_row(
        evidence.headers.iter().map(String::as_str).collect(),
    ));
    table.push_str(&separator);
    for row in &evidence.rows {
        table.push_str(&format_row(
            row.iter().map(|c| c.as_deref().unwrap_or("")).collect(),
        ));
    }
    table.push_str(&separator);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tenken_policy::Finding;

    fn report_with(findings: Vec<Finding>) -> AuditReport {
        AuditReport::new(findings, BTreeMap::new())
    }

    #[test]
    fn test_exit_status_mapping() {
        assert_eq!(exit_status(&report_with(vec![])), 0);
        assert_eq!(
            exit_status(&report_with(vec![Finding::info("a", "x")])),
            0
        );
        assert_eq!(
            exit_status(&report_with(vec![
                Finding::info("a", "x"),
                Finding::warning("b", "y"),
            ])),
            1
        );
        assert_eq!(
            exit_status(&report_with(vec![
                Finding::warning("b", "y"),
                Finding::critical("c", "z"),
            ])),
            2
        );
    }

    #[test]
    fn test_render_table_pads_columns() {
        let mut evidence = Evidence::new(&["Name", "Type"]);
        evidence.push_row(vec![Some("LongComponentName".into()), Some("service".into())]);
        evidence.push_row(vec![Some("B".into()), None]);
        let table = render_table(&evidence);
        assert!(table.contains("| LongComponentName | service |"));
        // every line in the grid has the same width
        let widths: std::collections::HashSet<usize> =
            table.lines().map(str::len).collect();
        assert_eq!(widths.len(), 1);
    }
}
