//! Metadata model for the class hierarchy under analysis.
//!
//! Records here are produced by an upstream parser of the C++ API description
//! and are treated as immutable by the resolvers, with one exception: the
//! support filter may stamp a function's `access` tag when it rejects it.

use serde::{Deserialize, Serialize};

/// Scope separator used in qualified names (`Owner::member`).
pub const SCOPE_SEPARATOR: &str = "::";

/// Substring that marks an access tag as "known unsupported".
pub const UNSUPPORTED_MARKER: &str = "unsupported";

/// Tag stamped onto functions rejected by the support filter.
pub const BLOCKED_TAG: &str = "unsupported_isBlockedFunction";

/// Prefix that identifies destructor names (`~QObject`).
pub const DESTRUCTOR_PREFIX: &str = "~";

/// Parameter name used for the synthetic receiver probe.
pub const RECEIVER_NAME: &str = "ptr";

/// Identifiers the emitted bindings cannot use as argument names.
const RESERVED_IDENTIFIERS: &[&str] = &[
    "type",
    "func",
    "range",
    "string",
    "len",
    "map",
    "interface",
    "select",
    "var",
    "default",
    "go",
    "error",
    "self",
    "fn",
    "match",
    "impl",
    "mod",
    "ref",
    "move",
    "loop",
    "where",
    "use",
    "struct",
    "enum",
    "trait",
    "in",
];

/// Qualifier keywords stripped from declared types before class lookup.
const TYPE_QUALIFIERS: &[&str] = &["const", "volatile", "struct", "class", "enum"];

/// Virtual-ness of a member function declaration.
///
/// Upstream encodes this as a free-form marker: `non` and `pure` are
/// distinguished, every other marker means "virtual", the empty one
/// included. A record without the field defaults to non-virtual.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Virtuality {
    #[default]
    NonVirtual,
    Virtual,
    PureVirtual,
}

impl Virtuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Virtuality::NonVirtual => "non",
            Virtuality::Virtual => "virtual",
            Virtuality::PureVirtual => "pure",
        }
    }

    pub fn is_virtual(&self) -> bool {
        !matches!(self, Virtuality::NonVirtual)
    }

    pub fn is_pure(&self) -> bool {
        matches!(self, Virtuality::PureVirtual)
    }
}

impl From<String> for Virtuality {
    fn from(value: String) -> Self {
        match value.as_str() {
            "non" => Virtuality::NonVirtual,
            "pure" => Virtuality::PureVirtual,
            _ => Virtuality::Virtual,
        }
    }
}

impl From<Virtuality> for String {
    fn from(value: Virtuality) -> Self {
        value.as_str().to_string()
    }
}

/// Structural role of a function within its class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionMeta {
    #[default]
    Plain,
    Constructor,
    CopyConstructor,
    MoveConstructor,
    Destructor,
    Signal,
    Slot,
}

/// A declared parameter: its name and the declared type text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    /// Bare type name of the declared type (see [`clean_value`]).
    pub fn type_name(&self) -> String {
        clean_value(&self.value)
    }

    /// Argument label used to key generated type switches (see [`clean_name`]).
    pub fn label(&self) -> String {
        clean_name(&self.name, &self.value)
    }
}

/// A member function as extracted from the API description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    /// `Owner::member` or `Outer::Owner::member`.
    #[serde(alias = "fullname")]
    pub qualified_name: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub virtuality: Virtuality,
    #[serde(default)]
    pub meta: FunctionMeta,
    /// Free-form access/status tag. May carry [`UNSUPPORTED_MARKER`].
    #[serde(default)]
    pub access: String,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_overload: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overload_index: Option<u32>,
    #[serde(default)]
    pub exported: bool,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl FunctionRecord {
    /// Create a plain, public, non-virtual function with no parameters.
    pub fn new(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        let name = qualified_name
            .rsplit(SCOPE_SEPARATOR)
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            name,
            qualified_name,
            output: String::new(),
            signature: String::new(),
            virtuality: Virtuality::NonVirtual,
            meta: FunctionMeta::Plain,
            access: "public".to_string(),
            is_static: false,
            is_overload: false,
            overload_index: None,
            exported: false,
            parameters: Vec::new(),
        }
    }

    pub fn with_virtuality(mut self, virtuality: Virtuality) -> Self {
        self.virtuality = virtuality;
        self
    }

    pub fn with_meta(mut self, meta: FunctionMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_access(mut self, access: impl Into<String>) -> Self {
        self.access = access.into();
        self
    }

    /// Mark the record as an overload with the given upstream overload number.
    pub fn with_overload(mut self, index: u32) -> Self {
        self.is_overload = true;
        self.overload_index = Some(index);
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(name, value));
        self
    }

    pub fn exported(mut self) -> Self {
        self.exported = true;
        self
    }

    /// Name of the owning class, derived from the qualified name.
    ///
    /// Three segments (`Outer::Owner::member`) yield the middle one; any other
    /// shape yields the first segment.
    pub fn class_name(&self) -> &str {
        let segments: Vec<&str> = self.qualified_name.split(SCOPE_SEPARATOR).collect();
        if segments.len() == 3 {
            segments[1]
        } else {
            segments[0]
        }
    }

    /// Whether the access tag already says "unsupported".
    pub fn is_marked_unsupported(&self) -> bool {
        self.access.contains(UNSUPPORTED_MARKER)
    }

    pub fn is_destructor_name(&self) -> bool {
        self.name.starts_with(DESTRUCTOR_PREFIX)
    }

    /// The synthetic parameter standing in for the implicit receiver.
    pub fn receiver_probe(&self) -> Parameter {
        Parameter::new(RECEIVER_NAME, self.class_name())
    }
}

/// A class as seen by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    #[serde(default)]
    pub module: String,
    /// Direct bases in declaration order.
    #[serde(default)]
    pub bases: Vec<String>,
    /// Eligible to stand in at runtime wherever one of its bases is declared.
    #[serde(default, alias = "is_polymorphic")]
    pub polymorphic: bool,
    #[serde(default)]
    pub functions: Vec<FunctionRecord>,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            bases: Vec::new(),
            polymorphic: false,
            functions: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    pub fn polymorphic(mut self) -> Self {
        self.polymorphic = true;
        self
    }

    pub fn with_function(mut self, function: FunctionRecord) -> Self {
        self.functions.push(function);
        self
    }

    /// Declared functions with the given simple name.
    pub fn functions_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a FunctionRecord> {
        self.functions.iter().filter(move |f| f.name == name)
    }
}

/// The whole metadata model as handed over by the upstream parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataModel {
    #[serde(default)]
    pub classes: Vec<ClassRecord>,
}

impl MetadataModel {
    pub fn new(classes: Vec<ClassRecord>) -> Self {
        Self { classes }
    }

    /// Every declared function, in class order then declaration order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionRecord> {
        self.classes.iter().flat_map(|c| c.functions.iter())
    }

    /// Owned copy of the function table, ready for a filtering pass.
    pub fn function_table(&self) -> Vec<FunctionRecord> {
        self.functions().cloned().collect()
    }
}

/// Strip qualifiers and pointer/reference decorations from a declared type.
///
/// `"const QObject *"` becomes `"QObject"`. Scope prefixes are kept.
pub fn clean_value(value: &str) -> String {
    let stripped: String = value.chars().filter(|c| *c != '*' && *c != '&').collect();
    stripped
        .split_whitespace()
        .filter(|token| !TYPE_QUALIFIERS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive the argument label for a parameter.
///
/// Unnamed parameters take the cleaned type name with a lowercased first
/// character; reserved identifiers get a `V` suffix.
pub fn clean_name(name: &str, value: &str) -> String {
    let base = if name.is_empty() {
        let type_name = clean_value(value).replace(SCOPE_SEPARATOR, "");
        let mut chars = type_name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => "v".to_string(),
        }
    } else {
        name.to_string()
    };

    if RESERVED_IDENTIFIERS.contains(&base.as_str()) {
        format!("{base}V")
    } else {
        base
    }
}
