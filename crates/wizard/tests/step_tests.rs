mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::{coordinator_with, names, ShopServices, TestStep};
use serde_json::{json, Value as JsonValue};
use wizard::{ActionResult, DelegateStep, InMemoryStorage, ProcessBuilder, ProcessContext, ProcessValidator, Response,
             Result, RouteParams, Services, Step, StepHandler, StepOutcome, WizardError};

#[test]
fn default_step_behaviour() {
  let step = TestStep::new();
  assert!(step.is_active());
  assert!(TestStep::inactive().name().is_empty());
  assert!(!TestStep::inactive().is_active());
}

#[test]
fn action_results() {
  assert_eq!(ActionResult::complete().next_step_name(), None);
  assert_eq!(ActionResult::continue_to("pago").next_step_name(), Some("pago"));
  assert_eq!(ActionResult::default(), ActionResult::complete());
}

#[test]
fn json_outcomes_are_mapped() {
  assert_eq!(StepOutcome::from(JsonValue::Null), StepOutcome::Action(ActionResult::complete()));
  assert_eq!(StepOutcome::from(json!({ "next_step": "b" })), StepOutcome::Action(ActionResult::continue_to("b")));
  assert_eq!(StepOutcome::from(json!({ "redirect": "/x" })), StepOutcome::Response(Response::redirect("/x")));
  assert_eq!(StepOutcome::from(json!({ "body": { "a": 1 } })),
             StepOutcome::Response(Response::ok(json!({ "a": 1 }))));
  assert_eq!(StepOutcome::from(json!({ "body": "no", "status": 409 })),
             StepOutcome::Response(Response::content(409, json!("no"))));
  assert!(matches!(StepOutcome::from(json!("texto")), StepOutcome::Unrecognized(_)));
  assert!(matches!(StepOutcome::from(json!([1, 2])), StepOutcome::Unrecognized(_)));
}

#[test]
fn response_helpers() {
  let redirect = Response::redirect("/a");
  assert!(redirect.is_redirect());
  assert_eq!(redirect.target_url(), Some("/a"));
  let content = Response::ok(json!({}));
  assert!(!content.is_redirect());
  assert_eq!(content.target_url(), None);
  assert_eq!(serde_json::to_value(&redirect).unwrap(), json!({ "type": "redirect", "target": "/a" }));
}

#[test]
fn validator_signals_with_its_message() {
  let validator = ProcessValidator::new(|| false);
  assert!(!validator.is_valid());
  assert_eq!(validator.message(), "Paso no válido");
  let err = validator.signal_invalid(&TestStep::named("pago")).unwrap_err();
  assert!(matches!(err, WizardError::ValidationFailed { ref step, .. } if step == "pago"));
  assert_eq!(err.kind().status_code(), 400);
}

#[test]
fn validator_reads_captured_state() {
  let open = Arc::new(AtomicBool::new(true));
  let flag = open.clone();
  let validator = ProcessValidator::new(move || flag.load(Ordering::SeqCst)).with_step_name("carrito");
  assert!(validator.is_valid());
  open.store(false, Ordering::SeqCst);
  assert!(!validator.is_valid());
  assert_eq!(validator.step_name(), Some("carrito"));
}

/// Handler that answers from a script keyed by step name.
struct ScriptHandler;

impl StepHandler for ScriptHandler {
  fn display(&self, step: &DelegateStep, _ctx: &mut ProcessContext) -> Result<Response> {
    let shop = step.services().and_then(|s| s.get::<ShopServices>()).map(|s| s.shop_name.clone());
    Ok(Response::ok(json!({ "step": step.name(), "shop": shop })))
  }

  fn forward(&self, step: &DelegateStep, ctx: &mut ProcessContext) -> Result<JsonValue> {
    Ok(match step.name() {
      "jump" => json!({ "next_step": "end" }),
      "bogus" => json!(7),
      _ => {
        assert!(ctx.is_initialized());
        JsonValue::Null
      }
    })
  }
}

fn delegate() -> Box<dyn Step> {
  Box::new(DelegateStep::new(Arc::new(ScriptHandler)))
}

#[test]
fn delegate_step_receives_services_and_maps_output() {
  let mut coordinator = coordinator_with(Box::new(InMemoryStorage::new()));
  coordinator.builder_mut().register_step("delegate", delegate).unwrap();
  coordinator.builder_mut().set_services(Services::new(ShopServices { shop_name: "Tienda".into() }));
  coordinator.register_scenario("flow",
                                |b: &mut ProcessBuilder| -> Result<()> {
                                  b.add("jump", "delegate")?.add("middle", "delegate")?.add("end", "delegate")?;
                                  Ok(())
                                })
             .unwrap();

  let shown = coordinator.display("flow", "jump", &RouteParams::new()).unwrap();
  assert_eq!(shown, Response::ok(json!({ "step": "jump", "shop": "Tienda" })));

  let next = coordinator.forward("flow", "jump").unwrap();
  assert_eq!(next, Response::redirect("/flow/end"));
  assert_eq!(coordinator.context().step_history().unwrap(), names(&["jump", "end"]));
}

#[test]
fn delegate_with_unmappable_output_is_a_defect() {
  let mut coordinator = coordinator_with(Box::new(InMemoryStorage::new()));
  coordinator.register_scenario("flow",
                                |b: &mut ProcessBuilder| -> Result<()> {
                                  b.add("bogus", delegate())?.add("other", delegate())?;
                                  Ok(())
                                })
             .unwrap();
  let err = coordinator.forward("flow", "bogus").unwrap_err();
  assert!(matches!(err, WizardError::UnexpectedAdvanceResult(ref d) if d.contains('7')));
}

#[test]
fn inactive_delegate_is_reported() {
  let step = DelegateStep::new(Arc::new(ScriptHandler)).inactive();
  assert!(!step.is_active());
  assert!(step.services().is_none());
}
