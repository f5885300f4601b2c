use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "qsync",
    about = "Keep query-string parameters valid and defaulted",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load and validate a parameter set
    Check(CheckArgs),
    /// Mount the parameter set on a query string and show the correction
    Reconcile(ReconcileArgs),
    /// Mount, then write one parameter through its policy
    Set(SetArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// TOML file with `[[param]]` entries
    #[arg(short, long)]
    pub config: PathBuf,
}

#[derive(Args)]
pub struct ReconcileArgs {
    #[arg(short, long)]
    pub config: PathBuf,
    /// Query string to start from, with or without the leading `?`
    #[arg(short, long, default_value = "")]
    pub query: String,
}

#[derive(Args)]
pub struct SetArgs {
    #[arg(short, long)]
    pub config: PathBuf,
    #[arg(short, long, default_value = "")]
    pub query: String,
    pub key: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_check() {
        let cli = Cli::try_parse_from(["qsync", "check", "--config", "params.toml"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.verbose);
        if let Command::Check(args) = cli.command {
            assert_eq!(args.config, PathBuf::from("params.toml"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_reconcile_json() {
        let cli = Cli::try_parse_from(["qsync", "reconcile", "-c", "p.toml", "-q", "?page=2", "--format", "json", "-v"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        if let Command::Reconcile(args) = cli.command {
            assert_eq!(args.query, "?page=2");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_reconcile_defaults_to_empty_query() {
        let cli = Cli::try_parse_from(["qsync", "reconcile", "-c", "p.toml"]).unwrap();
        if let Command::Reconcile(args) = cli.command {
            assert_eq!(args.query, "");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_set() {
        let cli = Cli::try_parse_from(["qsync", "set", "-c", "p.toml", "-q", "page=1", "sort", "date"]).unwrap();
        if let Command::Set(args) = cli.command {
            assert_eq!(args.key, "sort");
            assert_eq!(args.value, "date");
            assert_eq!(args.query, "page=1");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn set_requires_key_and_value() {
        assert!(Cli::try_parse_from(["qsync", "set", "-c", "p.toml", "sort"]).is_err());
        assert!(Cli::try_parse_from(["qsync", "set", "-c", "p.toml"]).is_err());
    }

    #[test]
    fn config_is_required() {
        assert!(Cli::try_parse_from(["qsync", "check"]).is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["qsync", "check", "-c", "p.toml", "--format", "yaml"]).is_err());
    }
}
