use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use guardrail_core::{load_ruleset, FactSet, Ruleset};
use guardrail_eval::{decide, evaluate, Outcome};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Guardrail policy engine toolchain.
#[derive(Parser)]
#[command(name = "guardrail", version, about = "Guardrail policy engine toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a ruleset bundle
    Validate {
        /// Path to the ruleset JSON bundle file
        ruleset: PathBuf,
    },

    /// Evaluate a ruleset against a facts document
    Eval {
        /// Path to the ruleset JSON bundle file
        ruleset: PathBuf,
        /// Path to the facts JSON file
        #[arg(long)]
        facts: PathBuf,
        /// Write the full audit record to this path
        #[arg(long)]
        audit: Option<PathBuf>,
    },

    /// Verify the integrity hash of an exported audit record
    Verify {
        /// Path to the audit record JSON file
        record: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { ruleset } => {
            cmd_validate(&ruleset, cli.output, cli.quiet);
        }
        Commands::Eval {
            ruleset,
            facts,
            audit,
        } => {
            cmd_eval(&ruleset, &facts, audit.as_deref(), cli.output, cli.quiet);
        }
        Commands::Verify { record } => {
            cmd_verify(&record, cli.output, cli.quiet);
        }
    }
}

// ──────────────────────────────────────────────
// Subcommands
// ──────────────────────────────────────────────

fn cmd_validate(ruleset_path: &Path, output: OutputFormat, quiet: bool) {
    let ruleset = load_ruleset_or_exit(ruleset_path, output, quiet);
    if !quiet {
        match output {
            OutputFormat::Text => {
                println!("valid ruleset: {} ({} rules)", ruleset.version(), ruleset.len());
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": true,
                    "version": ruleset.version(),
                    "rules": ruleset.len(),
                });
                println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
            }
        }
    }
}

fn cmd_eval(
    ruleset_path: &Path,
    facts_path: &Path,
    audit_path: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) {
    let ruleset = load_ruleset_or_exit(ruleset_path, output, quiet);

    let facts_doc = read_json_or_exit(facts_path, output, quiet);
    let facts = match FactSet::from_json(&facts_doc) {
        Ok(f) => f,
        Err(e) => {
            let msg = format!("error in facts file '{}': {}", facts_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let evaluation = match evaluate(&ruleset, &facts) {
        Ok(ev) => ev,
        Err(e) => {
            let msg = format!("evaluation error: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let decision = decide(&evaluation.trace);

    let audit_record = guardrail_audit::record(ruleset.version(), &facts, &evaluation.trace, &decision);

    if let Some(out) = audit_path {
        let pretty = serde_json::to_string_pretty(&audit_record.to_json())
            .unwrap_or_else(|e| format!("serialization error: {}", e));
        if let Err(e) = std::fs::write(out, pretty) {
            let msg = format!("error writing audit record '{}': {}", out.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }

    if !quiet {
        match output {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&decision.to_json())
                        .unwrap_or_else(|e| format!("serialization error: {}", e))
                );
            }
            OutputFormat::Text => {
                println!("Outcome: {}", decision.outcome.as_str());
                if let Some(ref reason) = decision.veto_reason {
                    println!("Veto reason: {}", reason);
                }
                if !decision.required_actions.is_empty() {
                    println!("Required actions:");
                    for tag in &decision.required_actions {
                        println!("  {}", tag);
                    }
                }
                if !decision.contributing_rule_ids.is_empty() {
                    println!(
                        "Contributing rules: {}",
                        decision.contributing_rule_ids.join(", ")
                    );
                }
                if let Some(out) = audit_path {
                    println!("Audit record written to {}", out.display());
                }
            }
        }
    }

    if decision.outcome == Outcome::Rejected {
        process::exit(1);
    }
}

fn cmd_verify(record_path: &Path, output: OutputFormat, quiet: bool) {
    let doc = read_json_or_exit(record_path, output, quiet);
    match guardrail_audit::verify_json(&doc) {
        Ok(true) => {
            if !quiet {
                match output {
                    OutputFormat::Text => println!("verified"),
                    OutputFormat::Json => println!("{{\"verified\": true}}"),
                }
            }
        }
        Ok(false) => {
            match output {
                OutputFormat::Text => {
                    if !quiet {
                        eprintln!("integrity hash mismatch: record has been altered");
                    }
                }
                OutputFormat::Json => {
                    eprintln!("{{\"verified\": false}}");
                }
            }
            process::exit(1);
        }
        Err(e) => {
            let msg = format!("error in record '{}': {}", record_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

// ──────────────────────────────────────────────
// Shared helpers
// ──────────────────────────────────────────────

fn read_json_or_exit(path: &Path, output: OutputFormat, quiet: bool) -> serde_json::Value {
    let src = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => {
            let msg = format!("error: file not found: {}", path.display());
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    match serde_json::from_str(&src) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error: invalid JSON in {}: {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn load_ruleset_or_exit(path: &Path, output: OutputFormat, quiet: bool) -> Ruleset {
    let doc = read_json_or_exit(path, output, quiet);
    match load_ruleset(&doc) {
        Ok(rs) => rs,
        Err(e) => {
            let msg = format!("invalid ruleset '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
