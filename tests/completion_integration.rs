//! Integration tests for the completion service.
//!
//! The service runs against `testdata/workspace`, configured by the
//! workspace's own `amdsense.yaml`.

use std::path::PathBuf;

use amdsense::complete::{CompletionService, CompletionTarget};
use amdsense::config::Config;
use amdsense::context::Position;
use amdsense::syntax::parse;
use amdsense::Suggestion;

fn workspace_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/workspace")
}

fn service() -> CompletionService {
    let root = workspace_path();
    let (config, path) = Config::load(None, &root).expect("workspace config should load");
    assert_eq!(path, Some(root.join("amdsense.yaml")));

    let service = CompletionService::new(config, &root).expect("service should build");
    assert_eq!(service.refresh_files().expect("discovery should succeed"), 3);
    service
}

fn controller_source() -> String {
    std::fs::read_to_string(workspace_path().join("app/src/controller/Main.controller.js"))
        .expect("fixture should exist")
}

fn names(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.name.as_str()).collect()
}

#[test]
fn test_discovered_files() {
    let service = service();
    let index = service.files().snapshot();

    assert_eq!(index.helpers.len(), 1);
    assert!(index.helpers[0].ends_with("app/src/helpers/FormatHelper.js"));
    assert_eq!(index.stores.len(), 2);
}

#[test]
fn test_dependency_variable_completes_module_members() {
    let service = service();
    // `ObjectUtils.|isEmpty(viewContext)`
    let suggestions = service.complete(&controller_source(), Position::new(14, 20));

    assert_eq!(names(&suggestions), vec!["clone", "isEmpty", "merge"]);
    assert_eq!(suggestions[0].insert_text, "clone(${1:source}, ${2:deep})");
    assert_eq!(suggestions[0].documentation, "**clone** (_source_, _deep_)");
    assert!(suggestions.iter().all(|s| s.label.starts_with("★ ")));
}

#[test]
fn test_this_completes_own_members() {
    let service = service();
    // `this.|_reload(viewContext)`; `onInit` is a lifecycle hook and
    // `render` is ignored by the workspace config
    let suggestions = service.complete(&controller_source(), Position::new(17, 9));
    assert_eq!(names(&suggestions), vec!["_reload", "refresh"]);
}

#[test]
fn test_store_word_completes_accessors() {
    let service = service();
    // `selectionStore.|getSelectedCells(viewContext)`
    let suggestions = service.complete(&controller_source(), Position::new(22, 19));

    assert_eq!(
        names(&suggestions),
        vec![
            "getFocusedElement",
            "getSelectedCells",
            "registerFocusedElement",
            "registerSelectedCells",
            "setFocusedElement",
            "setSelectedCells",
        ]
    );
    assert_eq!(
        suggestions[3].insert_text,
        "registerSelectedCells(${1:viewContext}, ${2:handler}, ${3:receiver})"
    );
}

#[test]
fn test_helper_word_completes_helper_members() {
    let service = service();
    let suggestions = service.complete("registry.getFormatHelper().f", Position::new(0, 28));
    assert_eq!(names(&suggestions), vec!["create", "formatDate", "formatNumber"]);
}

#[test]
fn test_module_bound_helper_uses_resolver() {
    let service = service();
    let source = "sap.ui.define(['demo/app/helpers/FormatHelper'], function (FormatHelper) {\n  FormatHelper.format\n});";

    let tree = parse(source).unwrap();
    assert_eq!(
        service.target(&tree, "FormatHelper"),
        CompletionTarget::Module("demo/app/helpers/FormatHelper".to_string())
    );

    let suggestions = service.complete(source, Position::new(1, 21));
    assert_eq!(names(&suggestions), vec!["create", "formatDate", "formatNumber"]);
}

#[test]
fn test_dependency_variable_in_unclosed_module() {
    let service = service();
    let source = std::fs::read_to_string(workspace_path().join("app/src/broken/Partial.js"))
        .expect("fixture should exist");

    // `    ObjectUtils.|` inside a module whose declaration call is never closed
    let suggestions = service.complete(&source, Position::new(8, 16));
    assert_eq!(names(&suggestions), vec!["clone", "isEmpty", "merge"]);
}

#[test]
fn test_plain_store_word() {
    let service = service();
    let suggestions = service.complete("var s = reportStore.", Position::new(0, 20));
    assert_eq!(
        names(&suggestions),
        vec![
            "getActiveReport",
            "getZoom",
            "registerActiveReport",
            "registerZoom",
            "setActiveReport",
            "setZoom",
        ]
    );
}

#[test]
fn test_unresolvable_targets_yield_nothing() {
    let service = service();
    let source = controller_source();

    // `Nowhere` maps to a file that does not exist
    let tree = parse(&source).unwrap();
    assert_eq!(
        service.target(&tree, "Nowhere"),
        CompletionTarget::Module("demo/app/missing/Nowhere".to_string())
    );

    let unmapped = "sap.ui.define(['other/lib/Thing'], function (Thing) {\n  Thing.x\n});";
    assert!(service.complete(unmapped, Position::new(1, 9)).is_empty());
    assert!(service.complete("chartStore.", Position::new(0, 11)).is_empty());
    assert!(service.complete("value.", Position::new(0, 6)).is_empty());
}

#[test]
fn test_lookback_is_limited_to_one_line() {
    let service = service();
    let source = "ObjectUtils\n\n.";
    assert!(service.complete(source, Position::new(2, 1)).is_empty());
}
