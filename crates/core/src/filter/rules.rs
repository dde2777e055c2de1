//! Exclusion rules as data.
//!
//! A rule pairs a [`RuleStage`] with a [`Condition`] tree. The built-in table
//! below encodes the known generator limitations for the Qt API surface;
//! configuration files may append further rules in the same shape.

use serde::{Deserialize, Serialize};

use crate::graph::ClassGraph;
use crate::model::{FunctionMeta, FunctionRecord};

/// Upstream module whose classes are generated by the meta-object compiler.
pub const MOC_MODULE: &str = "moc";

/// Library release the pinned exclusions below apply to.
pub const PINNED_VERSION: &str = "5.8.0";

/// Evaluation stage of a rule. Stages run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStage {
    /// Exact identities rejected for one specific library version.
    VersionPinned,
    /// Limitations keyed on names, owning class, overloads and ancestry.
    Structural,
    /// Name-prefix families rejected regardless of owning class.
    Generic,
}

impl RuleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleStage::VersionPinned => "version_pinned",
            RuleStage::Structural => "structural",
            RuleStage::Generic => "generic",
        }
    }
}

/// Match criteria over a function record.
///
/// Serialized externally tagged, e.g. `{"qualified_name": "QFoo::bar"}` or
/// `{"all": [{"class_name": "QFoo"}, {"overload_index": 2}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    QualifiedName(String),
    ClassName(String),
    Name(String),
    /// Prefix of the name after stripping one leading `__`.
    NamePrefix(String),
    /// Substring of the name after stripping one leading `__`.
    NameContains(String),
    OverloadIndex(u32),
    IsOverload(bool),
    Meta(FunctionMeta),
    /// Module of the owning class. False when the class is unknown.
    ClassModule(String),
    /// Owning class is a strict transitive subclass of the given class.
    SubclassOf(String),
    AccessContains(String),
    Any(Vec<Condition>),
    All(Vec<Condition>),
}

impl Condition {
    pub fn matches(&self, function: &FunctionRecord, graph: &dyn ClassGraph) -> bool {
        match self {
            Condition::QualifiedName(name) => function.qualified_name == *name,
            Condition::ClassName(name) => function.class_name() == name,
            Condition::Name(name) => function.name == *name,
            Condition::NamePrefix(prefix) => generic_name(&function.name).starts_with(prefix.as_str()),
            Condition::NameContains(needle) => generic_name(&function.name).contains(needle.as_str()),
            Condition::OverloadIndex(index) => function.overload_index == Some(*index),
            Condition::IsOverload(flag) => function.is_overload == *flag,
            Condition::Meta(meta) => function.meta == *meta,
            Condition::ClassModule(module) => {
                graph.class(function.class_name()).map(|c| c.module == *module).unwrap_or(false)
            }
            Condition::SubclassOf(ancestor) => {
                let class = function.class_name();
                graph.contains(class) && graph.is_subclass_of(class, ancestor)
            }
            Condition::AccessContains(needle) => function.access.contains(needle.as_str()),
            Condition::Any(conditions) => conditions.iter().any(|c| c.matches(function, graph)),
            Condition::All(conditions) => conditions.iter().all(|c| c.matches(function, graph)),
        }
    }
}

/// One entry of the exclusion table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub stage: RuleStage,
    /// Short human-readable explanation, surfaced in reports.
    pub reason: String,
    /// Restrict the rule to one target library version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub when: Condition,
}

impl ExclusionRule {
    pub fn new(stage: RuleStage, reason: impl Into<String>, when: Condition) -> Self {
        Self { stage, reason: reason.into(), version: None, when }
    }

    pub fn pinned(version: impl Into<String>, reason: impl Into<String>, when: Condition) -> Self {
        Self {
            stage: RuleStage::VersionPinned,
            reason: reason.into(),
            version: Some(version.into()),
            when,
        }
    }

    /// Whether this rule is active for the given target version.
    pub fn applies_to_version(&self, target_version: &str) -> bool {
        self.version.as_deref().map(|v| v == target_version).unwrap_or(true)
    }
}

/// Name with one leading `__` marker removed.
pub fn generic_name(name: &str) -> &str {
    name.strip_prefix("__").unwrap_or(name)
}

fn qualified(name: &str) -> Condition {
    Condition::QualifiedName(name.to_string())
}

fn any_qualified(names: &[&str]) -> Condition {
    Condition::Any(names.iter().map(|n| qualified(n)).collect())
}

fn any_class(names: &[&str]) -> Condition {
    Condition::Any(names.iter().map(|n| Condition::ClassName(n.to_string())).collect())
}

fn any_name(names: &[&str]) -> Condition {
    Condition::Any(names.iter().map(|n| Condition::Name(n.to_string())).collect())
}

fn all(conditions: Vec<Condition>) -> Condition {
    Condition::All(conditions)
}

fn structural(reason: &str, when: Condition) -> ExclusionRule {
    ExclusionRule::new(RuleStage::Structural, reason, when)
}

/// Name prefixes identifying container-returning or otherwise unsupported
/// accessor families.
const GENERIC_PREFIXES: &[&str] = &[
    "registeredTimers",
    "countriesForLanguage",
    "writingSystem",
    "textList",
    "attributes",
    "additionalFormats",
    "rawHeaderPairs",
    "draw",
    "tabs",
    "QInputMethodEvent_attributes",
    "selections",
    "setSelections",
    "formats",
    "setAdditionalFormats",
    "setFormats",
    "setTabs",
    "extraSelections",
    "setExtraSelections",
    "setButtonLayout",
    "setWhiteList",
    "whiteList",
    "supportedViewfinderFrameRateRanges",
    "hits",
    "featureTypes",
    "supportedPaperSources",
    "setTextureData",
    "textureData",
    "QCustom3DVolume_textureData",
    "createTextureData",
    "fromVariantMap",
    "QScxmlDataModel",
];

const GENERIC_SUBSTRINGS: &[&str] = &["alternateSubjectNames"];

/// Functions returning nested containers the list helpers cannot express.
const NESTED_CONTAINER_OUTPUTS: &[&str] = &[
    "QNdefNfcSmartPosterRecord::titleRecords",
    "QHelpEngineCore::filterAttributeSets",
    "QHelpSearchEngine::query",
    "QHelpSearchQueryWidget::query",
    "QPluginLoader::staticPlugins",
    "QSslConfiguration::ellipticCurves",
    "QSslConfiguration::supportedEllipticCurves",
    "QTextFormat::lengthVectorProperty",
    "QTextTableFormat::columnWidthConstraints",
    "QHelpContentWidget::selectedIndexes",
    "QListView::indexesMoved",
    "QAudioInputSelectorControl::availableInputs",
    "QScxmlStateMachine::initialValuesChanged",
    "QAudioOutputSelectorControl::availableOutputs",
    "QQuickWebEngineProfile::downloadFinished",
    "QQuickWindow::closing",
    "QQuickWebEngineProfile::downloadRequested",
    "QWebEnginePage::fullScreenRequested",
];

/// The built-in exclusion table, in evaluation order within each stage.
pub fn builtin_rules() -> Vec<ExclusionRule> {
    let mut rules = vec![
        ExclusionRule::pinned(
            PINNED_VERSION,
            "unresolved QMetaObject overload",
            all(vec![qualified("QJSEngine::newQMetaObject"), Condition::OverloadIndex(2)]),
        ),
        ExclusionRule::pinned(
            PINNED_VERSION,
            "private table data accessor",
            any_qualified(&[
                "QScxmlTableData::instructions",
                "QScxmlTableData::dataNames",
                "QScxmlTableData::stateMachineTable",
            ]),
        ),
        ExclusionRule::pinned(
            PINNED_VERSION,
            "signal missing from shipped headers",
            qualified("QTextToSpeech::voiceChanged"),
        ),
        structural(
            "QAccessible::State is a 64-bit bitfield",
            all(vec![
                any_class(&[
                    "QAccessibleObject",
                    "QAccessibleInterface",
                    "QAccessibleWidget",
                    "QAccessibleStateChangeEvent",
                ]),
                Condition::Any(vec![
                    any_name(&["state", "changedStates", "m_changedStates", "setM_changedStates"]),
                    Condition::Meta(FunctionMeta::Constructor),
                ]),
            ]),
        ),
        structural(
            "Qt::Key argument narrows to int",
            all(vec![qualified("QPixmapCache::find"), Condition::OverloadIndex(4)]),
        ),
        structural(
            "key overload collides across platforms",
            all(vec![
                any_qualified(&["QPixmapCache::remove", "QPixmapCache::insert"]),
                Condition::OverloadIndex(2),
            ]),
        ),
        structural("key overload collides across platforms", qualified("QPixmapCache::replace")),
        structural(
            "QNdefRecord::TypeNameFormat narrows to uint",
            all(vec![qualified("QNdefFilter::appendRecord"), Condition::IsOverload(false)]),
        ),
        structural(
            "abstract constructor",
            all(vec![
                Condition::ClassName("QSimpleXmlNodeModel".to_string()),
                Condition::Meta(FunctionMeta::Constructor),
            ]),
        ),
        structural("unsupported list output", qualified("QSGMaterialShader::attributeNames")),
        structural(
            "needs templated output",
            all(vec![
                Condition::ClassName("QVariant".to_string()),
                any_name(&["value", "canConvert"]),
            ]),
        ),
        structural(
            "needs templated output",
            any_qualified(&[
                "QNdefRecord::isRecordType",
                "QScriptEngine::scriptValueFromQMetaObject",
                "QScriptEngine::fromScriptValue",
                "QJSEngine::fromScriptValue",
            ]),
        ),
        structural(
            "needs templated output",
            all(vec![
                Condition::ClassName("QMetaType".to_string()),
                any_name(&[
                    "hasRegisteredComparators",
                    "registerComparators",
                    "hasRegisteredConverterFunction",
                    "registerConverter",
                    "registerEqualsComparator",
                ]),
            ]),
        ),
        structural(
            "metaObject is generated by moc",
            all(vec![
                Condition::ClassModule(MOC_MODULE.to_string()),
                Condition::Name("metaObject".to_string()),
            ]),
        ),
        structural(
            "undefined symbol",
            all(vec![qualified("QSignalBlocker::QSignalBlocker"), Condition::OverloadIndex(3)]),
        ),
        structural(
            "collides with the always generated QObject::notify",
            all(vec![
                Condition::Any(vec![
                    Condition::ClassName("QCoreApplication".to_string()),
                    Condition::SubclassOf("QCoreApplication".to_string()),
                    any_class(&["QAudioInput", "QAudioOutput"]),
                ]),
                Condition::Name("notify".to_string()),
            ]),
        ),
        structural("double pointer argument", qualified("QGraphicsItem::isBlockedByModalPanel")),
        structural(
            "unsupported QPlatformSurface type",
            Condition::Name("surfaceHandle".to_string()),
        ),
        structural(
            "abstract virtual cannot be overridden",
            any_name(&[
                "QDesignerFormWindowInterface",
                "QDesignerFormWindowManagerInterface",
                "QDesignerWidgetBoxInterface",
            ]),
        ),
        structural("nested container output", any_qualified(NESTED_CONTAINER_OUTPUTS)),
        structural(
            "platform specific property",
            any_qualified(&[
                "QApplication::autoMaximizeThreshold",
                "QApplication::setAutoMaximizeThreshold",
            ]),
        ),
        structural(
            "already marked unsupported",
            Condition::AccessContains(crate::model::UNSUPPORTED_MARKER.to_string()),
        ),
    ];

    rules.extend(GENERIC_PREFIXES.iter().map(|prefix| {
        ExclusionRule::new(
            RuleStage::Generic,
            "unsupported accessor family",
            Condition::NamePrefix(prefix.to_string()),
        )
    }));
    rules.extend(GENERIC_SUBSTRINGS.iter().map(|needle| {
        ExclusionRule::new(
            RuleStage::Generic,
            "unsupported accessor family",
            Condition::NameContains(needle.to_string()),
        )
    }));

    rules
}

/// Functions whose output the rendering layer must emit generically.
///
/// Entries are `(class, name, overloads)`; an empty overload list matches
/// every overload.
const GENERIC_OUTPUTS: &[(&str, &str, &[u32])] = &[
    ("QAndroidJniObject", "callMethod", &[]),
    ("QAndroidJniObject", "callStaticMethod", &[]),
    ("QAndroidJniObject", "getField", &[]),
    ("QAndroidJniObject", "getStaticField", &[]),
    ("QAndroidJniObject", "getObjectField", &[]),
    ("QAndroidJniObject", "getStaticObjectField", &[]),
    ("QAndroidJniObject", "callObjectMethod", &[]),
    ("QAndroidJniObject", "callStaticObjectMethod", &[]),
    ("QAndroidJniObject", "setStaticField", &[2, 4]),
];

/// Whether the function's return value has to be rendered as a generic.
pub fn needs_generic_output(function: &FunctionRecord) -> bool {
    let class = function.class_name();
    GENERIC_OUTPUTS.iter().any(|(c, name, overloads)| {
        *c == class
            && function.name == *name
            && (overloads.is_empty()
                || function.overload_index.map(|i| overloads.contains(&i)).unwrap_or(false))
    })
}
