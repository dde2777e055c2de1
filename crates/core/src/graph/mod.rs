//! Read-only view of the class hierarchy.
//!
//! The resolvers only talk to [`ClassGraph`]; [`ClassMap`] is the in-memory
//! implementation built from a [`MetadataModel`]. Every lookup is total: an
//! unknown class name simply yields "no information".

use std::collections::{HashMap, HashSet};

use tracing::{trace, warn};

use crate::model::{ClassRecord, FunctionRecord, MetadataModel};

/// Queries the resolvers need from the class hierarchy.
///
/// Only [`ClassGraph::class`] and [`ClassGraph::classes_for_module`] are
/// required; the traversals are derived from them.
pub trait ClassGraph {
    /// Look up a class by name.
    fn class(&self, name: &str) -> Option<&ClassRecord>;

    /// Classes of a module, ascending by name. Classes with equal names keep
    /// the order in which the graph holds them.
    fn classes_for_module(&self, module: &str) -> Vec<&ClassRecord>;

    fn contains(&self, name: &str) -> bool {
        self.class(name).is_some()
    }

    /// Direct bases in declaration order; empty for unknown classes.
    fn direct_bases(&self, name: &str) -> &[String] {
        self.class(name).map(|c| c.bases.as_slice()).unwrap_or(&[])
    }

    fn is_polymorphic(&self, name: &str) -> bool {
        self.class(name).map(|c| c.polymorphic).unwrap_or(false)
    }

    /// Every transitive base of `name`, each reported once.
    ///
    /// Order is a pre-order depth-first walk following declared base order,
    /// so the first direct base and its ancestry come before the second
    /// direct base. Base names that do not resolve are reported but not
    /// expanded. `name` itself is never part of the result.
    fn all_bases(&self, name: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(name);

        let mut worklist: Vec<&str> =
            self.direct_bases(name).iter().rev().map(String::as_str).collect();
        while let Some(current) = worklist.pop() {
            if !visited.insert(current) {
                continue;
            }
            out.push(current.to_string());
            worklist.extend(self.direct_bases(current).iter().rev().map(String::as_str));
        }

        trace!(class = name, bases = ?out, "collected transitive bases");
        out
    }

    /// Strict transitive subclass test: a class is not its own subclass.
    fn is_subclass_of(&self, name: &str, ancestor: &str) -> bool {
        self.all_bases(name).iter().any(|base| base == ancestor)
    }
}

/// In-memory class graph keyed by class name.
#[derive(Debug, Clone, Default)]
pub struct ClassMap {
    classes: Vec<ClassRecord>,
    index: HashMap<String, usize>,
}

impl ClassMap {
    /// Index the classes of a model. A repeated class name keeps its first
    /// declaration; later ones are dropped with a warning.
    pub fn new(model: MetadataModel) -> Self {
        Self::from_classes(model.classes)
    }

    pub fn from_classes(classes: impl IntoIterator<Item = ClassRecord>) -> Self {
        let mut map = Self::default();
        for class in classes {
            map.insert(class);
        }
        map
    }

    /// Add a class, returning `false` if the name was already taken.
    pub fn insert(&mut self, class: ClassRecord) -> bool {
        if self.index.contains_key(&class.name) {
            warn!(class = %class.name, "duplicate class declaration ignored");
            return false;
        }
        self.index.insert(class.name.clone(), self.classes.len());
        self.classes.push(class);
        true
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes in insertion order.
    pub fn classes(&self) -> &[ClassRecord] {
        &self.classes
    }

    /// Every declared function, in class order then declaration order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionRecord> {
        self.classes.iter().flat_map(|c| c.functions.iter())
    }

    /// Owned copy of the function table, ready for a filtering pass.
    pub fn function_table(&self) -> Vec<FunctionRecord> {
        self.functions().cloned().collect()
    }

    /// Find a declared function by qualified name, optionally narrowed to an
    /// overload index.
    pub fn find_function(
        &self,
        qualified_name: &str,
        overload: Option<u32>,
    ) -> Option<&FunctionRecord> {
        self.functions().find(|f| {
            f.qualified_name == qualified_name && (overload.is_none() || f.overload_index == overload)
        })
    }

    /// Distinct module names, sorted.
    pub fn modules(&self) -> Vec<String> {
        let mut modules: Vec<String> = self.classes.iter().map(|c| c.module.clone()).collect();
        modules.sort();
        modules.dedup();
        modules
    }
}

impl ClassGraph for ClassMap {
    fn class(&self, name: &str) -> Option<&ClassRecord> {
        self.index.get(name).map(|&i| &self.classes[i])
    }

    fn classes_for_module(&self, module: &str) -> Vec<&ClassRecord> {
        let mut classes: Vec<&ClassRecord> =
            self.classes.iter().filter(|c| c.module == module).collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        classes
    }
}

impl From<MetadataModel> for ClassMap {
    fn from(model: MetadataModel) -> Self {
        Self::new(model)
    }
}
