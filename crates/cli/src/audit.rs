//! `cohort-audit run` and `cohort-audit validate`.

use std::path::PathBuf;

use clap::Args;

use cohort_audit_config::{AuditConfig, SourceName};
use cohort_audit_recon::model::AuditResult;

use crate::exit_codes::EXIT_WRITE;
use crate::CliError;

#[derive(Args)]
pub struct RunArgs {
    /// Config file (default: ./cohort-audit.toml, then the user config dir)
    #[arg(long, short, env = "COHORT_AUDIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report path; overrides `output.report` from the config
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Also print the full result (summary and rows) as JSON to stdout
    #[arg(long)]
    pub json: bool,

    /// Write a header-only report when no cohort has unresolved students,
    /// instead of failing
    #[arg(long)]
    pub allow_empty: bool,
}

pub fn cmd_run(args: RunArgs, quiet: bool) -> Result<(), CliError> {
    let config = AuditConfig::load(args.config.as_deref()).map_err(CliError::config)?;

    // Resolve both up front so a missing secret fails before any connection.
    let warehouse = config.source(SourceName::Warehouse).map_err(CliError::config)?;
    let local = config.source(SourceName::Local).map_err(CliError::config)?;

    let input = cohort_audit_io::gather_from_config(&warehouse, &local, args.allow_empty)
        .map_err(CliError::source)?;

    let result = cohort_audit_recon::run(&input, &config.output.contact_domain)
        .map_err(CliError::recon)?;
    tracing::info!(
        discrepancies = result.summary.discrepancies,
        cohorts = result.summary.affected_cohorts,
        "reconciled"
    );

    let report_path = args.output.unwrap_or_else(|| config.output.report.clone());
    cohort_audit_io::write_report(&result.discrepancies, &report_path).map_err(CliError::report)?;

    if args.json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError {
                code: EXIT_WRITE,
                message: format!("JSON serialization error: {e}"),
                hint: None,
            })?;
        println!("{json_str}");
    }

    if !quiet {
        print_summary(&result);
        eprintln!("wrote {}", report_path.display());
    }

    Ok(())
}

fn print_summary(result: &AuditResult) {
    let s = &result.summary;
    eprintln!(
        "audit: {} anomalous cohorts, {} valid memberships, {} local assignments",
        s.anomalous_cohorts, s.valid_memberships, s.local_assignments,
    );
    eprintln!(
        "{} discrepancies in {} cohorts, {} mentors to contact",
        s.discrepancies,
        s.affected_cohorts,
        s.affected_mentors.len(),
    );
    for (code, tally) in &s.per_cohort {
        eprintln!("  {code:<12} {:>5}  {}", tally.discrepancies, tally.cohort_name);
    }
}

pub fn cmd_validate(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let config = AuditConfig::load(config_path.as_deref()).map_err(CliError::config)?;

    for name in [SourceName::Warehouse, SourceName::Local] {
        let source = config.source(name).map_err(CliError::config)?;
        println!(
            "{:<10} dsn={}  user={}  credentials={}  timeout={}s",
            name.as_str(),
            source.dsn,
            source.credentials.user,
            source.credential_source.as_str(),
            source.connect_timeout.as_secs(),
        );
    }
    println!("{:<10} {}", "report", config.output.report.display());
    println!("{:<10} {}", "domain", config.output.contact_domain);

    Ok(())
}
