// Integration tests for service selection
// Covers the activation scenarios and the precedence of tags, exclusions and selectors

use std::sync::Arc;

use proptest::prelude::*;
use warren_runtime::{MemoryProvider, Process, Runtime, ServiceDescriptor};

fn process(provider: MemoryProvider, args: &[&str]) -> Process {
    let runtime = Runtime::new(Arc::new(provider));
    Process::with_args(runtime, args.iter().map(|a| a.to_string()).collect())
        .expect("valid selection patterns")
}

#[test]
fn test_tag_scenario() {
    let process = process(MemoryProvider::new().with("tags", vec!["storage"]), &[]);
    assert!(process.is_required("data-a", &["storage"]));
    assert!(!process.is_required("data-b", &["cache"]));
}

#[test]
fn test_exclusion_scenario() {
    let process = process(MemoryProvider::new().with("exclude", vec!["^test-"]), &[]);
    assert!(!process.is_required("test-mock", &[]));
    assert!(process.is_required("data-a", &[]));
}

#[test]
fn test_selector_scenario() {
    let process = process(MemoryProvider::new(), &["^data-"]);
    assert!(process.is_required("data-a", &[]));
    assert!(!process.is_required("cache-a", &[]));
}

#[test]
fn test_blank_tag_entries_do_not_enable_allow_list() {
    let process = process(MemoryProvider::new().with("tags", vec!["", " "]), &[]);
    assert!(process.process_start_tags().is_empty());
    assert!(process.is_required("data-a", &[]));
    assert!(process.is_required("cache-a", &["cache"]));
}

#[test]
fn test_cli_exclusion_keeps_fork_service_from_launching() {
    let services = vec![
        ServiceDescriptor::new("test-mock", &[]).forked(),
        ServiceDescriptor::new("data-objects", &[]).forked(),
        ServiceDescriptor::new("data-index", &[]),
    ];
    let process = process(
        MemoryProvider::new().with("exclude", vec!["^test-"]),
        &["^data-index$"],
    );

    let plan = process.plan(&services);
    let local: Vec<&str> = plan.local.iter().map(|s| s.name.as_str()).collect();
    let forks: Vec<&str> = plan.forks.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(local, vec!["data-index"]);
    assert_eq!(forks, vec!["data-objects"]);
}

#[test]
fn test_process_start_tags_follow_configuration() {
    let process = process(
        MemoryProvider::new()
            .with("tags", "storage,cache")
            .with("exclude", vec!["^test-"]),
        &["^data-"],
    );
    let tags: Vec<String> = process
        .process_start_tags()
        .iter()
        .map(|t| t.to_string())
        .collect();
    assert_eq!(tags, vec!["t:storage", "t:cache", "s:^data-", "x:^test-"]);
}

#[test]
fn test_provider_replacement_applies_to_new_selection() {
    let runtime = Runtime::default();
    runtime.set_provider(Arc::new(MemoryProvider::new().with("exclude", vec!["^cache"])));
    let process = Process::new(runtime).unwrap();
    assert!(!process.is_required("cache-a", &[]));
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(-[a-z0-9]{1,4})?"
}

proptest! {
    #[test]
    fn prop_disjoint_tags_always_reject(
        name in name_strategy(),
        service_tags in prop::collection::vec("svc-[a-z]{1,5}", 0..4),
        selector in prop::option::of(name_strategy()),
    ) {
        let args: Vec<&str> = selector.iter().map(String::as_str).collect();
        let process = process(
            MemoryProvider::new().with("tags", vec!["cfg-only"]),
            &args,
        );
        let refs: Vec<&str> = service_tags.iter().map(String::as_str).collect();
        prop_assert!(!process.is_required(&name, &refs));
    }

    #[test]
    fn prop_excluded_names_never_run(name in name_strategy()) {
        let exclusion = format!("^{}$", regex::escape(&name));
        let process = process(
            MemoryProvider::new().with("exclude", vec![exclusion.as_str()]),
            &[name.as_str()],
        );
        prop_assert!(!process.is_required(&name, &[]));
    }

    #[test]
    fn prop_no_selectors_runs_everything_not_excluded(name in name_strategy()) {
        let process = process(MemoryProvider::new().with("exclude", vec!["^zzz-never$"]), &[]);
        prop_assert!(process.is_required(&name, &[]));
    }
}
