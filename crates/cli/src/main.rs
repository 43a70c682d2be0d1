// cohort-audit: find local mentor assignments the warehouse cannot back up

mod audit;
mod credentials;
mod exit_codes;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cohort_audit_config::ConfigError;
use cohort_audit_io::{ReportError, SourceError};
use cohort_audit_recon::ReconError;

use exit_codes::*;

#[derive(Parser)]
#[command(name = "cohort-audit")]
#[command(about = "Reconcile cohort mentor assignments against the data warehouse")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Only log errors; suppress the run summary
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log queries and row counts
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the audit and write the discrepancy report
    #[command(after_help = "\
Examples:
  cohort-audit run
  cohort-audit run --config /etc/cohort-audit.toml --output errors.csv
  cohort-audit run --json > audit.json")]
    Run(audit::RunArgs),

    /// Check the config and credentials without touching either database
    #[command(after_help = "\
Examples:
  cohort-audit validate --config cohort-audit.toml")]
    Validate {
        /// Config file (default: ./cohort-audit.toml, then the user config dir)
        #[arg(long, short, env = "COHORT_AUDIT_CONFIG")]
        config: Option<std::path::PathBuf>,
    },

    /// Manage database credentials in the system keychain
    Credentials {
        #[command(subcommand)]
        command: credentials::CredentialsCommands,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  cohort-audit-recon ", env!("CARGO_PKG_VERSION"),
    )
}

/// Logs go to stderr so `--json` output on stdout stays clean.
/// `COHORT_AUDIT_LOG` overrides the flag-derived level.
fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("COHORT_AUDIT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => audit::cmd_run(args, cli.quiet),
        Commands::Validate { config } => audit::cmd_validate(config),
        Commands::Credentials { command } => credentials::cmd_credentials(command),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn config(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::NotFound(_) => {
                Some("pass --config or create cohort-audit.toml in the working directory".to_string())
            }
            ConfigError::MissingCredentials { source_name, user_var, password_var } => Some(format!(
                "set {user_var} and {password_var}, or run `cohort-audit credentials set {source_name} --user <USER>`"
            )),
            _ => None,
        };
        Self { code: config_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn source(err: SourceError) -> Self {
        let hint = match &err {
            SourceError::Connection { source_name, .. } => {
                Some(format!("check [{source_name}] dsn in the config file"))
            }
            SourceError::Query { source_name, .. } => {
                Some(format!("is the {source_name} database the expected schema?"))
            }
            SourceError::DataShape(_) => None,
        };
        Self { code: source_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn recon(err: ReconError) -> Self {
        match err {
            ReconError::DataShape(_) => Self { code: EXIT_DATA_SHAPE, message: err.to_string(), hint: None },
        }
    }

    pub fn report(err: ReportError) -> Self {
        Self {
            code: EXIT_WRITE,
            message: err.to_string(),
            hint: Some("use --output to write the report elsewhere".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn missing_credentials_hint_names_both_variables() {
        let err = CliError::config(ConfigError::MissingCredentials {
            source_name: "warehouse".into(),
            user_var: "COHORT_AUDIT_WAREHOUSE_USER".into(),
            password_var: "COHORT_AUDIT_WAREHOUSE_PASSWORD".into(),
        });
        assert_eq!(err.code, EXIT_CREDENTIALS);
        let hint = err.hint.unwrap();
        assert!(hint.contains("COHORT_AUDIT_WAREHOUSE_USER"));
        assert!(hint.contains("COHORT_AUDIT_WAREHOUSE_PASSWORD"));
        assert!(hint.contains("credentials set warehouse"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["cohort-audit", "run", "-v", "--allow-empty"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Run(ref args) if args.allow_empty));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["cohort-audit", "-q", "-v", "validate"]).is_err());
    }
}
