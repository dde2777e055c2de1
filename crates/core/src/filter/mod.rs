//! Support filter: decides whether a wrapper may be generated for a function.
//!
//! Rules run stage by stage (version-pinned, structural, generic) and the
//! first match rejects. Minimal mode is applied last and narrows whatever
//! survives to a small fixed surface.

pub mod rules;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::ClassGraph;
use crate::model::{FunctionMeta, FunctionRecord, BLOCKED_TAG};

pub use rules::{
    builtin_rules, generic_name, needs_generic_output, Condition, ExclusionRule, RuleStage,
    PINNED_VERSION,
};

/// Lifecycle notification that minimal builds always keep.
pub const DEFAULT_ALWAYS_KEPT: &str = "QObject::destroyed";

fn default_target_version() -> String {
    PINNED_VERSION.to_string()
}

fn default_always_kept() -> Vec<String> {
    vec![DEFAULT_ALWAYS_KEPT.to_string()]
}

/// Build-wide settings consumed by the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Restrict output to the minimal binding surface.
    #[serde(default)]
    pub minimal: bool,
    /// Library version being bound; selects version-pinned rules.
    #[serde(default = "default_target_version")]
    pub target_version: String,
    /// Qualified names minimal mode keeps in addition to exports and destructors.
    #[serde(default = "default_always_kept")]
    pub always_kept: Vec<String>,
    /// Rules evaluated after the built-in ones of the same stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_rules: Vec<ExclusionRule>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            minimal: false,
            target_version: default_target_version(),
            always_kept: default_always_kept(),
            extra_rules: Vec::new(),
        }
    }
}

impl FilterConfig {
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.target_version = version.into();
        self
    }

    pub fn minimal(mut self, minimal: bool) -> Self {
        self.minimal = minimal;
        self
    }

    pub fn with_rule(mut self, rule: ExclusionRule) -> Self {
        self.extra_rules.push(rule);
        self
    }
}

/// Outcome of evaluating one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Supported,
    Excluded { stage: RuleStage, reason: String },
    /// Dropped because minimal mode is on and the function is not essential.
    NotInMinimalSet,
}

impl Verdict {
    pub fn is_supported(&self) -> bool {
        matches!(self, Verdict::Supported)
    }
}

/// Decides which functions the generator may wrap.
pub struct SupportFilter<'a> {
    graph: &'a dyn ClassGraph,
    config: FilterConfig,
    rules: Vec<ExclusionRule>,
}

impl<'a> SupportFilter<'a> {
    /// Build a filter over the built-in rule table plus `config.extra_rules`.
    pub fn new(graph: &'a dyn ClassGraph, config: &FilterConfig) -> Self {
        Self::with_rules(graph, config, builtin_rules())
    }

    /// Build a filter over an explicit base table instead of the built-in one.
    pub fn with_rules(
        graph: &'a dyn ClassGraph,
        config: &FilterConfig,
        base: Vec<ExclusionRule>,
    ) -> Self {
        let mut rules = base;
        rules.extend(config.extra_rules.iter().cloned());
        // Stable: declaration order is kept inside each stage.
        rules.sort_by_key(|r| r.stage);
        Self { graph, config: config.clone(), rules }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Active rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &ExclusionRule> + '_ {
        let version = self.config.target_version.as_str();
        self.rules.iter().filter(move |r| r.applies_to_version(version))
    }

    /// Side-effect free decision for `function`.
    pub fn evaluate(&self, function: &FunctionRecord) -> Verdict {
        if let Some(rule) = self.rules().find(|r| r.when.matches(function, self.graph)) {
            return Verdict::Excluded { stage: rule.stage, reason: rule.reason.clone() };
        }

        if self.config.minimal && !self.in_minimal_set(function) {
            return Verdict::NotInMinimalSet;
        }

        Verdict::Supported
    }

    /// Decide and, on rejection, stamp the access tag unless it already says
    /// "unsupported".
    pub fn is_supported(&self, function: &mut FunctionRecord) -> bool {
        self.apply(function).is_supported()
    }

    /// Like [`SupportFilter::is_supported`] but returns the full verdict.
    pub fn apply(&self, function: &mut FunctionRecord) -> Verdict {
        let verdict = self.evaluate(function);
        if !verdict.is_supported() {
            debug!(function = %function.qualified_name, ?verdict, "function rejected");
            if !function.is_marked_unsupported() {
                function.access = BLOCKED_TAG.to_string();
            }
        }
        verdict
    }

    fn in_minimal_set(&self, function: &FunctionRecord) -> bool {
        function.exported
            || function.meta == FunctionMeta::Destructor
            || self.config.always_kept.iter().any(|k| *k == function.qualified_name)
            || function.is_destructor_name()
    }
}
