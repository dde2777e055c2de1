use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use wrapgen_core::services::analysis::{AnalysisReport, Analyzer};

use crate::commands::{describe_dispatch, describe_verdict};
use crate::{load_graph, resolve_config, FilterOverrides};

/// Run the full classification pass over a model file.
pub fn analyze_model(
    model_path: &Path,
    config_path: Option<&Path>,
    overrides: &FilterOverrides,
) -> Result<AnalysisReport> {
    let graph = load_graph(model_path)?;
    debug!(model = %model_path.display(), classes = graph.len(), "loaded metadata model");
    let config = resolve_config(config_path, overrides)?;
    let mut table = graph.function_table();
    let report = Analyzer::new(&graph, &config.filter).analyze(&mut table);
    Ok(report)
}

/// Print the per-function decisions for a model.
pub fn analyze_command(
    model_path: &Path,
    config_path: Option<&Path>,
    overrides: &FilterOverrides,
    json: bool,
    supported_only: bool,
) -> Result<()> {
    let mut report = analyze_model(model_path, config_path, overrides)?;
    if supported_only {
        report.decisions.retain(|d| d.is_supported());
    }

    if json {
        let serialized =
            serde_json::to_string_pretty(&report).context("Failed to serialize report to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!(
        "Functions ({}): {} supported, {} rejected",
        report.supported_count + report.rejected_count,
        report.supported_count,
        report.rejected_count
    );
    if report.decisions.is_empty() {
        println!("  (none)");
        return Ok(());
    }

    for decision in &report.decisions {
        match &decision.facts {
            Some(facts) => {
                let mut flags = Vec::new();
                if facts.derived_from_virtual {
                    flags.push("virtual");
                }
                if !facts.derived_from_impure {
                    flags.push("needs-default-impl");
                }
                if facts.generic_output {
                    flags.push("generic-output");
                }
                println!(
                    "  + {} params=[{}] receiver=[{}]{}",
                    decision.qualified_name,
                    describe_dispatch(&facts.parameter_dispatch),
                    describe_dispatch(&facts.receiver_dispatch),
                    if flags.is_empty() { String::new() } else { format!(" {}", flags.join(" ")) }
                );
            }
            None => {
                println!(
                    "  - {} ({})",
                    decision.qualified_name,
                    describe_verdict(&decision.verdict)
                );
            }
        }
    }

    Ok(())
}

/// Print the SHA-256 fingerprint of the analysis report.
pub fn fingerprint_command(
    model_path: &Path,
    config_path: Option<&Path>,
    overrides: &FilterOverrides,
) -> Result<()> {
    let report = analyze_model(model_path, config_path, overrides)?;
    let digest = report.fingerprint().context("Failed to fingerprint report")?;
    println!("{}", digest);
    Ok(())
}
