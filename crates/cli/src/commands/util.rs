use anyhow::{anyhow, Result};
use wrapgen_core::dispatch::Dispatch;
use wrapgen_core::filter::Verdict;
use wrapgen_core::graph::ClassMap;
use wrapgen_core::model::FunctionRecord;

/// Find a function by qualified name, optionally narrowed to an overload.
pub fn find_function(
    graph: &ClassMap,
    qualified_name: &str,
    overload: Option<u32>,
) -> Result<FunctionRecord> {
    graph.find_function(qualified_name, overload).cloned().ok_or_else(|| match overload {
        Some(index) => anyhow!("Function not found: {} (overload {})", qualified_name, index),
        None => anyhow!("Function not found: {}", qualified_name),
    })
}

/// One-line rendering of a dispatch result, `-` when empty.
pub fn describe_dispatch(dispatch: &Dispatch) -> String {
    if dispatch.is_empty() {
        "-".to_string()
    } else {
        format!("{}: {}", dispatch.label, dispatch.candidates.join(", "))
    }
}

/// Short human-readable verdict.
pub fn describe_verdict(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Supported => "supported".to_string(),
        Verdict::Excluded { stage, reason } => format!("{}: {}", stage.as_str(), reason),
        Verdict::NotInMinimalSet => "not in minimal set".to_string(),
    }
}
