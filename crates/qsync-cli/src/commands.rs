use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;

use qsync_engine::{BatchSync, MemoryNavigator, Navigator, PassOutcome, PassReport};
use qsync_policy::{ParamSetConfig, ValidatorSpec};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Check(args) => cmd_check(args, cli.format),
        Command::Reconcile(args) => cmd_reconcile(args, cli.format),
        Command::Set(args) => cmd_set(args, cli.format),
    }
}

/// What a `reconcile` or `set` run did to the starting query string.
#[derive(Debug, Serialize)]
struct RunReport {
    input: String,
    outcome: &'static str,
    /// Keys fixed by the mount pass; for `set` these precede the write.
    mount_corrections: Vec<CorrectionEntry>,
    commits: Vec<String>,
    query: String,
    values: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Serialize)]
struct CorrectionEntry {
    key: String,
    rule: &'static str,
}

fn load_config(path: &Path) -> anyhow::Result<ParamSetConfig> {
    ParamSetConfig::load(path).with_context(|| format!("failed to load {}", path.display()))
}

fn build_sync(config: &ParamSetConfig) -> anyhow::Result<BatchSync> {
    let params = config
        .build()?
        .into_iter()
        .map(|(key, options)| (key, Some(options)))
        .collect();
    Ok(BatchSync::from_params(params)?)
}

fn outcome_name(outcome: &PassOutcome) -> &'static str {
    match outcome {
        PassOutcome::Clean => "clean",
        PassOutcome::Suppressed => "suppressed",
        PassOutcome::Committed(_) => "committed",
    }
}

fn finish_report(
    input: &str,
    mount: &PassReport,
    outcome: &PassOutcome,
    sync: &BatchSync,
    nav: &MemoryNavigator,
) -> RunReport {
    RunReport {
        input: input.trim_start_matches('?').to_string(),
        outcome: outcome_name(outcome),
        mount_corrections: mount
            .corrections
            .iter()
            .map(|(key, rule)| CorrectionEntry {
                key: key.clone(),
                rule: rule.as_str(),
            })
            .collect(),
        commits: nav.commits().to_vec(),
        query: nav.query(),
        values: sync.values(nav),
    }
}

fn reconcile_query(config: &ParamSetConfig, query: &str) -> anyhow::Result<RunReport> {
    let mut sync = build_sync(config)?;
    let mut nav = MemoryNavigator::new(query);
    let mount = sync.observe(&mut nav)?;
    Ok(finish_report(query, &mount, &mount.outcome, &sync, &nav))
}

fn set_query(
    config: &ParamSetConfig,
    query: &str,
    key: &str,
    value: &str,
) -> anyhow::Result<RunReport> {
    let mut sync = build_sync(config)?;
    let mut nav = MemoryNavigator::new(query);
    let mount = sync.observe(&mut nav)?;
    let outcome = sync
        .set(key, value, &mut nav)
        .with_context(|| format!("failed to set {key}"))?;
    Ok(finish_report(query, &mount, &outcome, &sync, &nav))
}

fn describe_validator(spec: &ValidatorSpec) -> String {
    match spec {
        ValidatorSpec::OneOf {
            values,
            case_insensitive,
        } => {
            let suffix = if *case_insensitive { " (any case)" } else { "" };
            format!("one of [{}]{}", values.join(", "), suffix)
        }
        ValidatorSpec::IntRange { min, max, trim } => {
            let suffix = if *trim { " (trimmed)" } else { "" };
            format!("integer {min}..={max}{suffix}")
        }
    }
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    build_sync(&config)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!(
        "{} {} parameter(s) in {}",
        "✓".green().bold(),
        config.params.len(),
        args.config.display().to_string().bold()
    );
    for param in &config.params {
        let default = param.default.as_deref().unwrap_or("(none)");
        println!("  {}  default: {}", param.key.yellow(), default.cyan());
        if let Some(spec) = &param.validator {
            println!("    validator: {}", describe_validator(spec));
        }
        println!("    on invalid: {:?}", param.on_invalid);
    }
    Ok(())
}

fn cmd_reconcile(args: ReconcileArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let report = reconcile_query(&config, &args.query)?;
    print_report(&report, format)
}

fn cmd_set(args: SetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let report = set_query(&config, &args.query, &args.key, &args.value)?;
    print_report(&report, format)
}

fn print_report(report: &RunReport, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for entry in &report.mount_corrections {
        println!("  {} {} ({})", "corrected on mount:".yellow(), entry.key, entry.rule.dimmed());
    }
    match report.outcome {
        "committed" => println!("{} ?{}", "✓".green().bold(), report.query.bold()),
        "suppressed" => println!("{} Correction produced the same query; nothing committed.", "✓".green()),
        _ => println!("{} No correction needed.", "✓".green()),
    }
    for (key, value) in &report.values {
        match value {
            Some(value) => println!("  {} = {}", key.bold(), value),
            None => println!("  {} = {}", key.bold(), "(absent)".dimmed()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
[[param]]
key = "page"
default = "1"
validator = { kind = "int_range", min = 1, max = 50 }

[[param]]
key = "sort"
default = "name"
validator = { kind = "one_of", values = ["name", "date"], case_insensitive = true }

[[param]]
key = "q"
"#;

    fn listing() -> ParamSetConfig {
        ParamSetConfig::from_toml_str(LISTING).unwrap()
    }

    #[test]
    fn reconcile_reports_single_commit() {
        let report = reconcile_query(&listing(), "?sort=DATE&q=&utm=x").unwrap();
        assert_eq!(report.input, "sort=DATE&q=&utm=x");
        assert_eq!(report.outcome, "committed");
        assert_eq!(report.commits, vec!["sort=date&utm=x&page=1".to_string()]);
        assert_eq!(report.query, "sort=date&utm=x&page=1");
        assert_eq!(report.values["q"], None);
        let rules: Vec<_> = report.mount_corrections.iter().map(|c| (c.key.as_str(), c.rule)).collect();
        assert_eq!(
            rules,
            vec![
                ("page", "default_on_mount"),
                ("sort", "default_on_mount"),
                ("q", "empty_value"),
            ]
        );
    }

    #[test]
    fn reconcile_valid_query_is_clean() {
        let report = reconcile_query(&listing(), "page=1&sort=name").unwrap();
        assert_eq!(report.outcome, "clean");
        assert!(report.commits.is_empty());
    }

    #[test]
    fn set_runs_through_policy() {
        let report = set_query(&listing(), "page=1&sort=name", "page", "77").unwrap();
        assert_eq!(report.outcome, "suppressed");

        let report = set_query(&listing(), "page=3&sort=name", "page", "77").unwrap();
        assert_eq!(report.query, "page=1&sort=name");
    }

    #[test]
    fn set_report_separates_mount_corrections() {
        let report = set_query(&listing(), "page=1", "sort", "date").unwrap();
        let rules: Vec<_> = report.mount_corrections.iter().map(|c| (c.key.as_str(), c.rule)).collect();
        assert_eq!(rules, vec![("sort", "default_on_mount")]);
        assert_eq!(report.commits, vec!["page=1&sort=name".to_string(), "page=1&sort=date".to_string()]);
        assert_eq!(report.outcome, "committed");

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("corrections").is_none());
        assert_eq!(json["mount_corrections"][0]["key"], "sort");
    }

    #[test]
    fn set_unknown_key_fails() {
        assert!(set_query(&listing(), "", "limit", "5").is_err());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let config = ParamSetConfig::from_toml_str("[[param]]\nkey = \"a\"\n[[param]]\nkey = \"a\"\n").unwrap();
        assert!(build_sync(&config).is_err());
    }

    #[test]
    fn json_report_shape() {
        let report = reconcile_query(&listing(), "page=2").unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "committed");
        assert_eq!(json["values"]["sort"], "name");
        assert!(json["values"]["q"].is_null());
    }

    #[test]
    fn validator_descriptions() {
        let spec = ValidatorSpec::IntRange { min: 1, max: 9, trim: true };
        assert_eq!(describe_validator(&spec), "integer 1..=9 (trimmed)");
    }
}
