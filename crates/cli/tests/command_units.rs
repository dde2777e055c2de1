use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;
use wrapgen::commands::{
    active_rules, analyze_model, describe_dispatch, describe_verdict, dispatch_info, find_function,
    virtual_info,
};
use wrapgen::{load_graph, resolve_config, FilterOverrides};
use wrapgen_core::dispatch::Dispatch;
use wrapgen_core::filter::{RuleStage, Verdict};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join("widgets.json")
}

#[test]
fn analyze_model_reports_counts() {
    let report = analyze_model(&fixture(), None, &FilterOverrides::default()).expect("analyze");
    assert_eq!(report.decisions.len(), 10);
    assert_eq!(report.supported_count, 8);
    assert_eq!(report.rejected_count, 2);
}

#[test]
fn analyze_model_honours_minimal_override() {
    let overrides = FilterOverrides { minimal: true, target_version: None };
    let report = analyze_model(&fixture(), None, &overrides).expect("analyze");
    let kept: Vec<&str> = report.supported().map(|d| d.qualified_name.as_str()).collect();
    assert_eq!(kept, vec!["QObject::destroyed", "QObject::~QObject"]);
}

#[test]
fn resolve_config_applies_overrides_over_file() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("engine.json");
    fs::write(&path, r#"{ "minimal": false, "target_version": "5.9.0" }"#).expect("write");

    let config = resolve_config(Some(&path), &FilterOverrides::default()).expect("config");
    assert_eq!(config.filter.target_version, "5.9.0");
    assert!(!config.filter.minimal);

    let overrides = FilterOverrides { minimal: true, target_version: Some("6.1.0".into()) };
    let config = resolve_config(Some(&path), &overrides).expect("config");
    assert_eq!(config.filter.target_version, "6.1.0");
    assert!(config.filter.minimal);
}

#[test]
fn dispatch_info_resolves_parameters_and_receiver() {
    let info = dispatch_info(&fixture(), "QWidget::setParent", None, false).expect("dispatch");
    assert_eq!(info.dispatch.candidates, vec!["QLabel", "QPushButton", "QWidget"]);
    assert_eq!(info.dispatch.label, "parent");

    let info = dispatch_info(&fixture(), "QAbstractButton::paintEvent", None, true).expect("dispatch");
    assert_eq!(info.dispatch.candidates, vec!["QPushButton", "QAbstractButton"]);
    assert_eq!(info.dispatch.label, "ptr");
}

#[test]
fn virtual_info_reports_inherited_requirements() {
    let info = virtual_info(&fixture(), "QAbstractButton::paintEvent", None).expect("virtuals");
    assert!(info.derived_from_virtual);
    assert!(info.derived_from_impure);

    let info = virtual_info(&fixture(), "QWidget::setParent", None).expect("virtuals");
    assert!(!info.derived_from_virtual);
    assert!(info.derived_from_impure);
}

#[test]
fn find_function_respects_overload_and_reports_missing() {
    let graph = load_graph(&fixture()).expect("graph");
    let record = find_function(&graph, "QPixmapCache::find", Some(4)).expect("overload 4");
    assert_eq!(record.overload_index, Some(4));

    let err = find_function(&graph, "QPixmapCache::find", Some(9)).expect_err("no overload 9");
    assert!(err.to_string().contains("overload 9"));
    assert!(find_function(&graph, "QWidget::nope", None).is_err());
}

#[test]
fn active_rules_follow_target_version() {
    let pinned = active_rules(None, &FilterOverrides::default()).expect("rules");
    let newer = active_rules(
        None,
        &FilterOverrides { minimal: false, target_version: Some("6.0.0".into()) },
    )
    .expect("rules");

    assert_eq!(pinned.len(), newer.len() + 3);
    assert_eq!(pinned[0].stage, RuleStage::VersionPinned.as_str());
    assert!(newer.iter().all(|r| r.version.is_none()));
}

#[test]
fn describe_helpers_render_compactly() {
    assert_eq!(describe_dispatch(&Dispatch::default()), "-");
    let dispatch = Dispatch { candidates: vec!["QLabel".into(), "QWidget".into()], label: "w".into() };
    assert_eq!(describe_dispatch(&dispatch), "w: QLabel, QWidget");

    assert_eq!(describe_verdict(&Verdict::Supported), "supported");
    assert_eq!(
        describe_verdict(&Verdict::Excluded { stage: RuleStage::Generic, reason: "x".into() }),
        "generic: x"
    );
}
