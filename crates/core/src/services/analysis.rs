//! Batch classification pass producing one decision per function.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::dispatch::{Dispatch, PolymorphismResolver};
use crate::filter::{needs_generic_output, FilterConfig, SupportFilter, Verdict};
use crate::graph::ClassGraph;
use crate::model::FunctionRecord;
use crate::virtuals::VirtualResolver;

/// Facts the rendering layer needs for a supported function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionFacts {
    /// Dispatch over the declared parameters.
    pub parameter_dispatch: Dispatch,
    /// Dispatch over the implicit receiver.
    pub receiver_dispatch: Dispatch,
    pub derived_from_virtual: bool,
    pub derived_from_impure: bool,
    pub generic_output: bool,
}

/// Per-function outcome of an analysis pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecision {
    pub qualified_name: String,
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overload_index: Option<u32>,
    pub verdict: Verdict,
    /// Access tag after filtering (stamped on rejection).
    pub access: String,
    /// Present only for supported functions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<FunctionFacts>,
}

impl FunctionDecision {
    pub fn is_supported(&self) -> bool {
        self.verdict.is_supported()
    }
}

/// Result of analyzing a whole function table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub decisions: Vec<FunctionDecision>,
    pub supported_count: usize,
    pub rejected_count: usize,
}

impl AnalysisReport {
    /// First decision for the qualified name (overloads share a name).
    pub fn decision(&self, qualified_name: &str) -> Option<&FunctionDecision> {
        self.decisions.iter().find(|d| d.qualified_name == qualified_name)
    }

    pub fn supported(&self) -> impl Iterator<Item = &FunctionDecision> {
        self.decisions.iter().filter(|d| d.is_supported())
    }

    /// SHA-256 hex digest of the canonical JSON form of the report.
    ///
    /// Two passes over the same graph and function table yield the same digest.
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        let bytes = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&bytes);
        Ok(format!("{:x}", digest))
    }
}

/// Runs the filter and both resolvers over every function once.
pub struct Analyzer<'a> {
    filter: SupportFilter<'a>,
    dispatch: PolymorphismResolver<'a>,
    virtuals: VirtualResolver<'a>,
}

impl<'a> Analyzer<'a> {
    pub fn new(graph: &'a dyn ClassGraph, config: &FilterConfig) -> Self {
        Self::with_filter(graph, SupportFilter::new(graph, config))
    }

    /// Use a pre-built filter (e.g. one with a custom rule table).
    pub fn with_filter(graph: &'a dyn ClassGraph, filter: SupportFilter<'a>) -> Self {
        Self {
            filter,
            dispatch: PolymorphismResolver::new(graph),
            virtuals: VirtualResolver::new(graph),
        }
    }

    pub fn filter(&self) -> &SupportFilter<'a> {
        &self.filter
    }

    /// Filter one function and, if it survives, resolve its facts.
    pub fn decide(&self, function: &mut FunctionRecord) -> FunctionDecision {
        let verdict = self.filter.apply(function);
        let function = &*function;
        let facts = verdict.is_supported().then(|| FunctionFacts {
            parameter_dispatch: self.dispatch.possible_polymorphic(function, false),
            receiver_dispatch: self.dispatch.possible_polymorphic(function, true),
            derived_from_virtual: self.virtuals.is_derived_from_virtual(function),
            derived_from_impure: self.virtuals.is_derived_from_impure(function),
            generic_output: needs_generic_output(function),
        });

        FunctionDecision {
            qualified_name: function.qualified_name.clone(),
            class_name: function.class_name().to_string(),
            overload_index: function.overload_index,
            verdict,
            access: function.access.clone(),
            facts,
        }
    }

    /// Analyze a function table in order.
    ///
    /// Rejected functions have their access tag stamped in place, so a second
    /// pass should start from a fresh copy of the table.
    pub fn analyze(&self, functions: &mut [FunctionRecord]) -> AnalysisReport {
        let mut report = AnalysisReport::default();
        for function in functions.iter_mut() {
            let decision = self.decide(function);
            if decision.is_supported() {
                report.supported_count += 1;
            } else {
                report.rejected_count += 1;
            }
            report.decisions.push(decision);
        }

        info!(
            supported = report.supported_count,
            rejected = report.rejected_count,
            "classified functions"
        );
        report
    }
}
