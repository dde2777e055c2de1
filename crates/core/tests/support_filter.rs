use wrapgen_core::filter::{
    needs_generic_output, Condition, ExclusionRule, FilterConfig, RuleStage, SupportFilter,
    Verdict, PINNED_VERSION,
};
use wrapgen_core::graph::ClassMap;
use wrapgen_core::model::{ClassRecord, FunctionMeta, FunctionRecord, BLOCKED_TAG};

fn qt_graph() -> ClassMap {
    ClassMap::from_classes(vec![
        ClassRecord::new("QObject", "QtCore"),
        ClassRecord::new("QCoreApplication", "QtCore").with_base("QObject"),
        ClassRecord::new("QGuiApplication", "QtGui").with_base("QCoreApplication"),
        ClassRecord::new("QApplication", "QtWidgets").with_base("QGuiApplication"),
        ClassRecord::new("QWidget", "QtWidgets").with_base("QObject"),
        ClassRecord::new("MyObject", "moc").with_base("QObject"),
    ])
}

fn excluded_stage(verdict: &Verdict) -> Option<RuleStage> {
    match verdict {
        Verdict::Excluded { stage, .. } => Some(*stage),
        _ => None,
    }
}

#[test]
fn plain_function_is_supported_and_untouched() {
    let graph = qt_graph();
    let filter = SupportFilter::new(&graph, &FilterConfig::default());
    let mut f = FunctionRecord::new("QWidget::show");

    assert!(filter.is_supported(&mut f));
    assert_eq!(f.access, "public");
}

#[test]
fn structural_rule_rejects_and_stamps_access() {
    let graph = qt_graph();
    let filter = SupportFilter::new(&graph, &FilterConfig::default());

    let mut find = FunctionRecord::new("QPixmapCache::find").with_overload(4);
    assert_eq!(excluded_stage(&filter.apply(&mut find)), Some(RuleStage::Structural));
    assert_eq!(find.access, BLOCKED_TAG);

    // Other overloads of the same function are fine.
    let mut other = FunctionRecord::new("QPixmapCache::find").with_overload(1);
    assert!(filter.is_supported(&mut other));
}

#[test]
fn upstream_unsupported_tag_is_preserved() {
    let graph = qt_graph();
    let filter = SupportFilter::new(&graph, &FilterConfig::default());
    let mut f = FunctionRecord::new("QWidget::backingStore")
        .with_access("unsupported_isBlockedFunction_cppType(QBackingStore)");

    assert!(!filter.is_supported(&mut f));
    assert_eq!(f.access, "unsupported_isBlockedFunction_cppType(QBackingStore)");
}

#[test]
fn version_pinned_rules_only_apply_to_their_version() {
    let graph = qt_graph();
    let pinned = SupportFilter::new(&graph, &FilterConfig::default().with_version(PINNED_VERSION));
    let newer = SupportFilter::new(&graph, &FilterConfig::default().with_version("5.9.0"));

    let mut a = FunctionRecord::new("QTextToSpeech::voiceChanged");
    assert_eq!(excluded_stage(&pinned.apply(&mut a)), Some(RuleStage::VersionPinned));
    assert_eq!(a.access, BLOCKED_TAG);

    let mut b = FunctionRecord::new("QTextToSpeech::voiceChanged");
    assert!(newer.is_supported(&mut b));

    let mut overload_one = FunctionRecord::new("QJSEngine::newQMetaObject").with_overload(1);
    let mut overload_two = FunctionRecord::new("QJSEngine::newQMetaObject").with_overload(2);
    assert!(pinned.is_supported(&mut overload_one));
    assert!(!pinned.is_supported(&mut overload_two));
}

#[test]
fn pinned_stamp_is_seen_by_the_structural_self_check() {
    let graph = qt_graph();
    let pinned = SupportFilter::new(&graph, &FilterConfig::default());
    let newer = SupportFilter::new(&graph, &FilterConfig::default().with_version("5.9.0"));

    let mut f = FunctionRecord::new("QScxmlTableData::instructions");
    assert!(!pinned.is_supported(&mut f));
    assert_eq!(f.access, BLOCKED_TAG);

    // With the pinned rule out of play the stamp alone keeps it rejected.
    assert_eq!(
        newer.evaluate(&f),
        Verdict::Excluded {
            stage: RuleStage::Structural,
            reason: "already marked unsupported".to_string()
        }
    );
}

#[test]
fn pinned_rules_win_over_structural_rules() {
    let graph = qt_graph();
    let extra = ExclusionRule::new(
        RuleStage::Structural,
        "custom structural",
        Condition::QualifiedName("QTextToSpeech::voiceChanged".to_string()),
    );
    let pinned = SupportFilter::new(&graph, &FilterConfig::default().with_rule(extra.clone()));
    let newer =
        SupportFilter::new(&graph, &FilterConfig::default().with_version("6.0.0").with_rule(extra));

    let f = FunctionRecord::new("QTextToSpeech::voiceChanged");
    assert_eq!(excluded_stage(&pinned.evaluate(&f)), Some(RuleStage::VersionPinned));
    assert_eq!(
        newer.evaluate(&f),
        Verdict::Excluded { stage: RuleStage::Structural, reason: "custom structural".to_string() }
    );
}

#[test]
fn repeated_evaluation_gives_the_same_answer() {
    let graph = qt_graph();
    let filter = SupportFilter::new(&graph, &FilterConfig::default());

    for name in ["QTextToSpeech::voiceChanged", "QPixmapCache::replace", "QWidget::show"] {
        let mut f = FunctionRecord::new(name);
        let first = filter.is_supported(&mut f);
        let second = filter.is_supported(&mut f);
        assert_eq!(first, second, "{name} changed its answer");
    }
}

#[test]
fn subclass_rule_follows_the_hierarchy() {
    let graph = qt_graph();
    let filter = SupportFilter::new(&graph, &FilterConfig::default());

    for name in [
        "QCoreApplication::notify",
        "QApplication::notify",
        "QAudioInput::notify",
        "QAudioOutput::notify",
    ] {
        let mut f = FunctionRecord::new(name);
        assert!(!filter.is_supported(&mut f), "{name} should be rejected");
    }

    let mut widget = FunctionRecord::new("QWidget::notify");
    assert!(filter.is_supported(&mut widget));

    // Unknown owning class: no ancestry information, no rejection.
    let mut unknown = FunctionRecord::new("QMystery::notify");
    assert!(filter.is_supported(&mut unknown));
}

#[test]
fn moc_module_rule_needs_a_known_class() {
    let graph = qt_graph();
    let filter = SupportFilter::new(&graph, &FilterConfig::default());

    let mut generated = FunctionRecord::new("MyObject::metaObject");
    let mut plain = FunctionRecord::new("QWidget::metaObject");
    let mut unknown = FunctionRecord::new("Ghost::metaObject");
    assert!(!filter.is_supported(&mut generated));
    assert!(filter.is_supported(&mut plain));
    assert!(filter.is_supported(&mut unknown));
}

#[test]
fn accessible_state_rule_combines_class_and_meta() {
    let graph = qt_graph();
    let filter = SupportFilter::new(&graph, &FilterConfig::default());

    let mut ctor = FunctionRecord::new("QAccessibleWidget::QAccessibleWidget")
        .with_meta(FunctionMeta::Constructor);
    let mut state = FunctionRecord::new("QAccessibleObject::state");
    let mut text = FunctionRecord::new("QAccessibleObject::text");
    assert!(!filter.is_supported(&mut ctor));
    assert!(!filter.is_supported(&mut state));
    assert!(filter.is_supported(&mut text));
}

#[test]
fn nested_owner_names_match_structural_rules() {
    let graph = qt_graph();
    let filter = SupportFilter::new(&graph, &FilterConfig::default());

    let mut f = FunctionRecord::new("QtCharts::QVariant::value");
    assert_eq!(f.class_name(), "QVariant");
    assert!(!filter.is_supported(&mut f));
}

#[test]
fn generic_prefixes_reject_after_stripping_marker() {
    let graph = qt_graph();
    let filter = SupportFilter::new(&graph, &FilterConfig::default());

    let mut drawn = FunctionRecord::new("QPainter::__drawText_atList");
    assert_eq!(excluded_stage(&filter.apply(&mut drawn)), Some(RuleStage::Generic));
    assert_eq!(drawn.access, BLOCKED_TAG);

    let mut names = FunctionRecord::new("QSslCertificate::subjectalternateSubjectNames");
    assert!(!filter.is_supported(&mut names));

    // Only one leading marker is stripped.
    let mut double = FunctionRecord::new("QPainter::____drawText");
    assert!(filter.is_supported(&mut double));
}

#[test]
fn minimal_mode_keeps_only_the_essential_surface() {
    let graph = qt_graph();
    let filter = SupportFilter::new(&graph, &FilterConfig::default().minimal(true));

    let mut show = FunctionRecord::new("QWidget::show");
    assert_eq!(filter.apply(&mut show), Verdict::NotInMinimalSet);
    assert_eq!(show.access, BLOCKED_TAG);

    let mut exported = FunctionRecord::new("QWidget::show").exported();
    let mut dtor_meta =
        FunctionRecord::new("QWidget::deleteLater").with_meta(FunctionMeta::Destructor);
    let mut dtor_name = FunctionRecord::new("QWidget::~QWidget");
    let mut destroyed = FunctionRecord::new("QObject::destroyed");
    assert!(filter.is_supported(&mut exported));
    assert!(filter.is_supported(&mut dtor_meta));
    assert!(filter.is_supported(&mut dtor_name));
    assert!(filter.is_supported(&mut destroyed));
}

#[test]
fn minimal_mode_does_not_override_exclusions() {
    let graph = qt_graph();
    let filter = SupportFilter::new(&graph, &FilterConfig::default().minimal(true));

    let mut f = FunctionRecord::new("QPixmapCache::replace").exported();
    assert_eq!(excluded_stage(&filter.apply(&mut f)), Some(RuleStage::Structural));
}

#[test]
fn minimal_mode_honours_configured_keep_list() {
    let graph = qt_graph();
    let mut config = FilterConfig::default().minimal(true);
    config.always_kept = vec!["QWidget::show".to_string()];
    let filter = SupportFilter::new(&graph, &config);

    let mut show = FunctionRecord::new("QWidget::show");
    let mut destroyed = FunctionRecord::new("QObject::destroyed");
    assert!(filter.is_supported(&mut show));
    assert!(!filter.is_supported(&mut destroyed));
}

#[test]
fn custom_rule_table_replaces_the_builtin_one() {
    let graph = qt_graph();
    let table = vec![ExclusionRule::new(
        RuleStage::Generic,
        "no grabbing",
        Condition::All(vec![
            Condition::SubclassOf("QObject".to_string()),
            Condition::NamePrefix("grab".to_string()),
        ]),
    )];
    let filter = SupportFilter::with_rules(&graph, &FilterConfig::default(), table);

    let mut grab = FunctionRecord::new("QWidget::grabGesture");
    let mut replace = FunctionRecord::new("QPixmapCache::replace");
    assert!(!filter.is_supported(&mut grab));
    assert!(filter.is_supported(&mut replace));
}

#[test]
fn rules_are_ordered_by_stage() {
    let graph = qt_graph();
    let config = FilterConfig::default().with_rule(ExclusionRule::new(
        RuleStage::VersionPinned,
        "late pinned",
        Condition::Name("never".to_string()),
    ));
    let filter = SupportFilter::new(&graph, &config);

    let stages: Vec<RuleStage> = filter.rules().map(|r| r.stage).collect();
    let mut sorted = stages.clone();
    sorted.sort();
    assert_eq!(stages, sorted);
    assert_eq!(stages.iter().filter(|s| **s == RuleStage::VersionPinned).count(), 4);

    let newer = SupportFilter::new(&graph, &config.clone().with_version("6.0.0"));
    // The unversioned custom pinned rule still applies.
    assert_eq!(newer.rules().filter(|r| r.stage == RuleStage::VersionPinned).count(), 1);
}

#[test]
fn generic_output_classifier() {
    assert!(needs_generic_output(&FunctionRecord::new("QAndroidJniObject::callMethod")));
    assert!(needs_generic_output(
        &FunctionRecord::new("QAndroidJniObject::setStaticField").with_overload(2)
    ));
    assert!(!needs_generic_output(
        &FunctionRecord::new("QAndroidJniObject::setStaticField").with_overload(1)
    ));
    assert!(!needs_generic_output(&FunctionRecord::new("QAndroidJniObject::setStaticField")));
    assert!(!needs_generic_output(&FunctionRecord::new("QObject::callMethod")));
}
