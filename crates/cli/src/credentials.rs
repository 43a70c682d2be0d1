//! `cohort-audit credentials` - keychain management for the two databases.

use std::io::BufRead;

use clap::{Subcommand, ValueEnum};

use cohort_audit_config::credentials::{delete_credentials, store_credentials};
use cohort_audit_config::{Credentials, SourceName};

use crate::CliError;

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Warehouse,
    Local,
}

impl From<SourceArg> for SourceName {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Warehouse => SourceName::Warehouse,
            SourceArg::Local => SourceName::Local,
        }
    }
}

#[derive(Subcommand)]
pub enum CredentialsCommands {
    /// Store a user and password; the password is read from stdin
    #[command(after_help = "\
Examples:
  printf '%s\\n' \"$PW\" | cohort-audit credentials set warehouse --user svc_audit")]
    Set {
        source: SourceArg,

        /// Database user
        #[arg(long, short)]
        user: String,
    },

    /// Remove stored credentials
    Delete { source: SourceArg },
}

pub fn cmd_credentials(cmd: CredentialsCommands) -> Result<(), CliError> {
    match cmd {
        CredentialsCommands::Set { source, user } => {
            let password = read_password(std::io::stdin().lock())?;
            let source = SourceName::from(source);
            store_credentials(source, &Credentials { user, password }).map_err(CliError::config)?;
            eprintln!("stored {source} credentials in the system keychain");
            Ok(())
        }
        CredentialsCommands::Delete { source } => {
            let source = SourceName::from(source);
            delete_credentials(source).map_err(CliError::config)?;
            eprintln!("deleted {source} credentials from the system keychain");
            Ok(())
        }
    }
}

/// First line of `input`, without its line ending.
fn read_password(mut input: impl BufRead) -> Result<String, CliError> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| CliError::usage(format!("cannot read password from stdin: {e}")))?;

    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(CliError::usage("no password on stdin")
            .with_hint("pipe the password in, e.g. printf '%s\\n' \"$PW\" | cohort-audit credentials set ..."));
    }
    Ok(password.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::EXIT_USAGE;

    #[test]
    fn password_line_ending_is_stripped() {
        assert_eq!(read_password("s3cret\n".as_bytes()).unwrap(), "s3cret");
        assert_eq!(read_password("s3cret\r\n".as_bytes()).unwrap(), "s3cret");
        assert_eq!(read_password("with space \nignored\n".as_bytes()).unwrap(), "with space ");
    }

    #[test]
    fn empty_stdin_is_usage_error() {
        let err = read_password("".as_bytes()).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
        assert!(err.hint.is_some());
    }
}
