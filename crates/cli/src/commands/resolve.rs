use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use wrapgen_core::dispatch::{Dispatch, PolymorphismResolver};
use wrapgen_core::virtuals::VirtualResolver;

use crate::commands::{describe_dispatch, find_function};
use crate::load_graph;

#[derive(Debug, Serialize)]
pub struct DispatchInfo {
    pub function: String,
    pub receiver: bool,
    pub dispatch: Dispatch,
}

#[derive(Debug, Serialize)]
pub struct VirtualInfo {
    pub function: String,
    pub derived_from_virtual: bool,
    pub derived_from_impure: bool,
}

/// Resolve dispatch candidates for one function of a model.
pub fn dispatch_info(
    model_path: &Path,
    function: &str,
    overload: Option<u32>,
    receiver: bool,
) -> Result<DispatchInfo> {
    let graph = load_graph(model_path)?;
    let record = find_function(&graph, function, overload)?;
    let dispatch = PolymorphismResolver::new(&graph).possible_polymorphic(&record, receiver);
    Ok(DispatchInfo { function: record.qualified_name, receiver, dispatch })
}

pub fn dispatch_command(
    model_path: &Path,
    function: &str,
    overload: Option<u32>,
    receiver: bool,
    json: bool,
) -> Result<()> {
    let info = dispatch_info(model_path, function, overload, receiver)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let probe = if info.receiver { "receiver" } else { "parameters" };
    println!("{} ({}): {}", info.function, probe, describe_dispatch(&info.dispatch));
    Ok(())
}

/// Resolve override requirements for one function of a model.
pub fn virtual_info(
    model_path: &Path,
    function: &str,
    overload: Option<u32>,
) -> Result<VirtualInfo> {
    let graph = load_graph(model_path)?;
    let record = find_function(&graph, function, overload)?;
    let resolver = VirtualResolver::new(&graph);
    Ok(VirtualInfo {
        derived_from_virtual: resolver.is_derived_from_virtual(&record),
        derived_from_impure: resolver.is_derived_from_impure(&record),
        function: record.qualified_name,
    })
}

pub fn virtuals_command(
    model_path: &Path,
    function: &str,
    overload: Option<u32>,
    json: bool,
) -> Result<()> {
    let info = virtual_info(model_path, function, overload)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", info.function);
    println!("  derived from virtual: {}", info.derived_from_virtual);
    println!("  derived from impure:  {}", info.derived_from_impure);
    Ok(())
}
