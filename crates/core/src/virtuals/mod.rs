//! Override requirements inherited through the base-class chain.
//!
//! Bases are visited in [`ClassGraph::all_bases`] order: pre-order depth
//! first, following declared base order.

use crate::graph::ClassGraph;
use crate::model::{FunctionRecord, Virtuality};

pub struct VirtualResolver<'a> {
    graph: &'a dyn ClassGraph,
}

impl<'a> VirtualResolver<'a> {
    pub fn new(graph: &'a dyn ClassGraph) -> Self {
        Self { graph }
    }

    /// True if the function is virtual itself or any ancestor declares a
    /// virtual function of the same name. False when the owning class is
    /// unknown, whatever the function's own virtuality.
    pub fn is_derived_from_virtual(&self, function: &FunctionRecord) -> bool {
        if !self.graph.contains(function.class_name()) {
            return false;
        }
        if function.virtuality.is_virtual() {
            return true;
        }
        self.ancestor_declarations(function).iter().any(|v| v.is_virtual())
    }

    /// True if the function is not pure virtual. Otherwise the first
    /// same-named ancestor declaration decides: true when that declaration is
    /// not pure, false when it is or when no ancestor declares the name.
    pub fn is_derived_from_impure(&self, function: &FunctionRecord) -> bool {
        if !function.virtuality.is_pure() {
            return true;
        }
        self.ancestor_declarations(function).first().map(|v| !v.is_pure()).unwrap_or(false)
    }

    /// Virtuality of every same-named declaration across the ancestors, in
    /// base walk order. Empty when the owning class is unknown.
    fn ancestor_declarations(&self, function: &FunctionRecord) -> Vec<Virtuality> {
        let class = function.class_name();
        if !self.graph.contains(class) {
            return Vec::new();
        }

        self.graph
            .all_bases(class)
            .iter()
            .filter_map(|base| self.graph.class(base))
            .flat_map(|base| base.functions_named(&function.name).map(|f| f.virtuality))
            .collect()
    }
}
