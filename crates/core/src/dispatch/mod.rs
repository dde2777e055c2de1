//! Runtime type-dispatch candidates for polymorphic parameters and receivers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::ClassGraph;
use crate::model::{FunctionRecord, Parameter};

/// Ordered dispatch candidates and the argument label the type switch keys on.
///
/// A non-empty candidate list always ends with the probe's own declared class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    pub candidates: Vec<String>,
    pub label: String,
}

impl Dispatch {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The declared class tried last, if any candidates were found.
    pub fn fallback(&self) -> Option<&str> {
        self.candidates.last().map(String::as_str)
    }
}

pub struct PolymorphismResolver<'a> {
    graph: &'a dyn ClassGraph,
}

impl<'a> PolymorphismResolver<'a> {
    pub fn new(graph: &'a dyn ClassGraph) -> Self {
        Self { graph }
    }

    /// Find the first probe whose declared class has polymorphic subclasses in
    /// the function's module.
    ///
    /// Probes are the declared parameters in order, or only the implicit
    /// receiver when `use_receiver` is set. The first probe producing any
    /// subclass wins; later probes are not examined.
    pub fn possible_polymorphic(&self, function: &FunctionRecord, use_receiver: bool) -> Dispatch {
        let receiver;
        let probes: &[Parameter] = if use_receiver {
            receiver = [function.receiver_probe()];
            &receiver
        } else {
            &function.parameters
        };

        let Some(owner) = self.graph.class(function.class_name()) else {
            return Dispatch::default();
        };
        let module_classes = self.graph.classes_for_module(&owner.module);

        for probe in probes {
            let Some(declared) = self.graph.class(&probe.type_name()) else {
                continue;
            };

            let mut candidates: Vec<String> = module_classes
                .iter()
                .filter(|c| {
                    c.polymorphic
                        && c.name != declared.name
                        && self.graph.is_subclass_of(&c.name, &declared.name)
                })
                .map(|c| c.name.clone())
                .collect();
            if candidates.is_empty() {
                continue;
            }

            candidates.sort();
            candidates.push(declared.name.clone());
            let dispatch = Dispatch { candidates, label: probe.label() };
            debug!(
                function = %function.qualified_name,
                label = %dispatch.label,
                candidates = ?dispatch.candidates,
                "polymorphic dispatch"
            );
            return dispatch;
        }

        Dispatch::default()
    }
}
