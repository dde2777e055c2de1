use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use wrapgen_core::filter::SupportFilter;
use wrapgen_core::graph::ClassMap;

use crate::{resolve_config, FilterOverrides};

#[derive(Debug, Serialize)]
pub struct RuleInfo {
    pub stage: String,
    pub version: Option<String>,
    pub reason: String,
    pub condition: serde_json::Value,
}

/// Active exclusion rules, in evaluation order, for the resolved config.
pub fn active_rules(
    config_path: Option<&Path>,
    overrides: &FilterOverrides,
) -> Result<Vec<RuleInfo>> {
    let config = resolve_config(config_path, overrides)?;
    // Listing rules needs no class information.
    let graph = ClassMap::default();
    let filter = SupportFilter::new(&graph, &config.filter);

    filter
        .rules()
        .map(|rule| {
            Ok(RuleInfo {
                stage: rule.stage.as_str().to_string(),
                version: rule.version.clone(),
                reason: rule.reason.clone(),
                condition: serde_json::to_value(&rule.when)
                    .context("Failed to serialize rule condition")?,
            })
        })
        .collect()
}

/// List the exclusion rules the filter would evaluate.
pub fn rules_command(
    config_path: Option<&Path>,
    overrides: &FilterOverrides,
    json: bool,
) -> Result<()> {
    let rules = active_rules(config_path, overrides)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    println!("Rules ({}):", rules.len());
    if rules.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for rule in rules {
        let version = rule.version.as_deref().map(|v| format!(" @{v}")).unwrap_or_default();
        println!("  - [{}{}] {} {}", rule.stage, version, rule.reason, rule.condition);
    }

    Ok(())
}
