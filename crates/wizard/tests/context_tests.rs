mod common;

use std::sync::Arc;

use common::{names, TestStep};
use serde_json::json;
use wizard::{domain_for, InMemoryStorage, Process, ProcessContext, ProcessValidator, Step, Storage, WizardError,
             HISTORY_KEY};

fn process_with(alias: &str, steps: &[&str]) -> Arc<Process> {
  let mut process = Process::new();
  process.set_scenario_alias(alias);
  for name in steps {
    process.add_step(name, TestStep::new().boxed()).unwrap();
  }
  Arc::new(process)
}

fn context_at(process: &Arc<Process>, step: &str, storage: InMemoryStorage) -> ProcessContext {
  let mut ctx = ProcessContext::new(Box::new(storage));
  let current = process.step_by_name(step).unwrap().clone();
  ctx.initialize(process.clone(), current);
  ctx
}

#[test]
fn accessors_fail_before_initialize() {
  let mut ctx = ProcessContext::new(Box::new(InMemoryStorage::new()));
  assert!(!ctx.is_initialized());
  assert!(matches!(ctx.current_step(), Err(WizardError::ContextNotInitialized)));
  assert!(matches!(ctx.previous_step(), Err(WizardError::ContextNotInitialized)));
  assert!(matches!(ctx.is_valid(), Err(WizardError::ContextNotInitialized)));
  assert!(matches!(ctx.progress(), Err(WizardError::ContextNotInitialized)));
  assert!(matches!(ctx.step_history(), Err(WizardError::ContextNotInitialized)));
  assert!(matches!(ctx.rewind_history(), Err(WizardError::ContextNotInitialized)));
  assert!(matches!(ctx.close(), Err(WizardError::ContextNotInitialized)));

  // request and storage are usable without initialize
  ctx.set_request(json!({"q": 1}));
  assert_eq!(ctx.request(), Some(&json!({"q": 1})));
  assert!(ctx.storage().domain().is_none());
}

#[test]
fn initialize_binds_domain_and_neighbours() {
  let process = process_with("checkout", &["a", "b", "c"]);
  let ctx = context_at(&process, "b", InMemoryStorage::new());

  assert_eq!(ctx.storage().domain(), Some(domain_for("checkout").as_str()));
  assert_eq!(ctx.current_step().unwrap().name(), "b");
  assert_eq!(ctx.previous_step().unwrap().map(|s| s.name().to_string()), Some("a".to_string()));
  assert_eq!(ctx.next_step().unwrap().map(|s| s.name().to_string()), Some("c".to_string()));
  assert!(!ctx.is_first_step().unwrap());
  assert!(!ctx.is_last_step().unwrap());
}

#[test]
fn boundaries_have_no_neighbours() {
  let process = process_with("s", &["a", "b"]);
  let first = context_at(&process, "a", InMemoryStorage::new());
  assert!(first.is_first_step().unwrap());
  assert!(first.previous_step().unwrap().is_none());

  let last = context_at(&process, "b", InMemoryStorage::new());
  assert!(last.is_last_step().unwrap());
  assert!(last.next_step().unwrap().is_none());
}

#[test]
fn progress_truncates() {
  let two = process_with("s", &["a", "b"]);
  assert_eq!(context_at(&two, "a", InMemoryStorage::new()).progress().unwrap(), 50);
  assert_eq!(context_at(&two, "b", InMemoryStorage::new()).progress().unwrap(), 100);

  let three = process_with("s", &["a", "b", "c"]);
  assert_eq!(context_at(&three, "a", InMemoryStorage::new()).progress().unwrap(), 33);
  assert_eq!(context_at(&three, "b", InMemoryStorage::new()).progress().unwrap(), 66);
  assert_eq!(context_at(&three, "c", InMemoryStorage::new()).progress().unwrap(), 100);
}

#[test]
fn step_outside_process_has_zero_progress() {
  let process = process_with("s", &["a", "b"]);
  let mut ctx = ProcessContext::new(Box::new(InMemoryStorage::new()));
  ctx.initialize(process, Arc::new(TestStep::named("ghost")));
  assert_eq!(ctx.progress().unwrap(), 0);
}

#[test]
fn validity_follows_history() {
  let process = process_with("s", &["step1", "step2"]);
  let storage = InMemoryStorage::new();

  let mut ctx = context_at(&process, "step1", storage.clone());
  assert!(ctx.is_valid().unwrap());

  ctx.set_step_history(&names(&["step1"])).unwrap();
  let ctx2 = context_at(&process, "step2", storage.clone());
  assert!(!ctx2.is_valid().unwrap());

  ctx.set_step_history(&names(&["step1", "step2"])).unwrap();
  let ctx1 = context_at(&process, "step1", storage);
  assert!(ctx1.is_valid().unwrap());
}

#[test]
fn empty_process_is_trivially_valid() {
  let process = process_with("s", &[]);
  let storage = InMemoryStorage::new();
  let mut ctx = ProcessContext::new(Box::new(storage));
  ctx.initialize(process, Arc::new(TestStep::named("anything")));
  ctx.set_step_history(&names(&["other"])).unwrap();
  assert!(ctx.is_valid().unwrap());
}

#[test]
fn failing_validator_makes_context_invalid() {
  let mut process = Process::new();
  process.set_scenario_alias("s");
  process.add_step("a", TestStep::new().boxed()).unwrap();
  process.set_validator(ProcessValidator::new(|| false));
  let process = Arc::new(process);
  let ctx = context_at(&process, "a", InMemoryStorage::new());
  assert!(!ctx.is_valid().unwrap());
}

#[test]
fn rewind_truncates_after_current_step() {
  let process = process_with("s", &["step1", "step2"]);
  let mut ctx = context_at(&process, "step1", InMemoryStorage::new());
  ctx.set_step_history(&names(&["step1", "step2"])).unwrap();
  ctx.rewind_history().unwrap();
  assert_eq!(ctx.step_history().unwrap(), names(&["step1"]));
}

#[test]
fn rewind_without_current_step_is_an_integrity_error() {
  let process = process_with("s", &["step1", "step2"]);
  let mut ctx = context_at(&process, "step1", InMemoryStorage::new());
  ctx.set_step_history(&names(&["stepX", "stepY"])).unwrap();
  let err = ctx.rewind_history().unwrap_err();
  assert!(matches!(err, WizardError::HistoryIntegrity(ref s) if s == "step1"));
  assert_eq!(err.kind().status_code(), 404);
  // nothing is written when the rewind fails
  assert_eq!(ctx.step_history().unwrap(), names(&["stepX", "stepY"]));
}

#[test]
fn history_additions_are_unique() {
  let process = process_with("s", &["a", "b"]);
  let mut ctx = context_at(&process, "a", InMemoryStorage::new());
  ctx.add_step_to_history("a").unwrap();
  ctx.add_step_to_history("b").unwrap();
  ctx.add_step_to_history("a").unwrap();
  assert_eq!(ctx.step_history().unwrap(), names(&["a", "b"]));
  assert_eq!(ctx.storage().get(HISTORY_KEY).unwrap(), Some(json!(["a", "b"])));
}

#[test]
fn explicit_next_step_overrides_neighbour() {
  let process = process_with("s", &["a", "b", "c"]);
  let mut ctx = context_at(&process, "a", InMemoryStorage::new());
  ctx.set_next_step_by_name("c").unwrap();
  assert_eq!(ctx.next_step().unwrap().unwrap().name(), "c");
  assert!(matches!(ctx.set_next_step_by_name("nope"), Err(WizardError::StepNotFound(_))));
}

#[test]
fn close_clears_only_this_domain() {
  let checkout = process_with("checkout", &["a"]);
  let onboarding = process_with("onboarding", &["a"]);
  let storage = InMemoryStorage::new();

  let mut ctx = context_at(&checkout, "a", storage.clone());
  ctx.add_step_to_history("a").unwrap();
  let mut other = context_at(&onboarding, "a", storage.clone());
  other.add_step_to_history("a").unwrap();
  assert_eq!(storage.domain_count().unwrap(), 2);

  ctx.close().unwrap();
  assert!(ctx.step_history().unwrap().is_empty());
  assert_eq!(other.step_history().unwrap(), names(&["a"]));
}

#[test]
fn failed_rewind_after_close_leaves_no_domain() {
  let process = process_with("checkout", &["a", "b"]);
  let storage = InMemoryStorage::new();
  let mut ctx = context_at(&process, "b", storage.clone());
  ctx.add_step_to_history("a").unwrap();
  ctx.close().unwrap();
  assert_eq!(storage.domain_count().unwrap(), 0);

  assert!(matches!(ctx.rewind_history(), Err(WizardError::HistoryIntegrity(_))));
  assert_eq!(storage.domain_count().unwrap(), 0);
}
