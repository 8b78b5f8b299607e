#![allow(dead_code)]
// Shared fixtures for the integration tests.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value as JsonValue};
use wizard::{ActionResult, Coordinator, InMemoryStorage, ProcessBuilder, ProcessContext, ProcessScenario, Response,
             Result, ServiceAware, Services, Step, StepOutcome, Storage, TemplateRouter, UpdateFn, WizardConfig};

/// What a `TestStep` answers on forward.
#[derive(Clone, Debug)]
pub enum Scripted {
  Complete,
  ContinueTo(String),
  Respond(Response),
  Unrecognized(JsonValue),
}

#[derive(Clone, Debug)]
pub struct TestStep {
  name: String,
  forward: Scripted,
  active: bool,
}

impl TestStep {
  pub fn new() -> Self {
    Self { name: String::new(), forward: Scripted::Complete, active: true }
  }

  pub fn named(name: &str) -> Self {
    Self { name: name.to_string(), forward: Scripted::Complete, active: true }
  }

  pub fn scripted(forward: Scripted) -> Self {
    Self { name: String::new(), forward, active: true }
  }

  pub fn inactive() -> Self {
    Self { name: String::new(), forward: Scripted::Complete, active: false }
  }

  pub fn boxed(self) -> Box<dyn Step> {
    Box::new(self)
  }
}

impl Step for TestStep {
  fn name(&self) -> &str {
    &self.name
  }

  fn set_name(&mut self, name: &str) {
    self.name = name.to_string();
  }

  fn display_action(&self, ctx: &mut ProcessContext) -> Result<Response> {
    Ok(Response::ok(json!({ "step": self.name, "progress": ctx.progress()? })))
  }

  fn forward_action(&self, _ctx: &mut ProcessContext) -> Result<StepOutcome> {
    Ok(match &self.forward {
      Scripted::Complete => StepOutcome::Action(ActionResult::complete()),
      Scripted::ContinueTo(name) => StepOutcome::Action(ActionResult::continue_to(name.clone())),
      Scripted::Respond(response) => StepOutcome::Response(response.clone()),
      Scripted::Unrecognized(value) => StepOutcome::Unrecognized(value.clone()),
    })
  }

  fn is_active(&self) -> bool {
    self.active
  }
}

/// Step that wants the shared services handle.
#[derive(Default)]
pub struct InjectableStep {
  name: String,
  pub services: Option<Services>,
}

impl Step for InjectableStep {
  fn name(&self) -> &str {
    &self.name
  }

  fn set_name(&mut self, name: &str) {
    self.name = name.to_string();
  }

  fn display_action(&self, _ctx: &mut ProcessContext) -> Result<Response> {
    let shop = self.services.as_ref().and_then(|s| s.get::<ShopServices>()).map(|s| s.shop_name.clone());
    Ok(Response::ok(json!({ "shop": shop })))
  }

  fn as_service_aware(&mut self) -> Option<&mut dyn ServiceAware> {
    Some(self)
  }
}

impl ServiceAware for InjectableStep {
  fn set_services(&mut self, services: Services) {
    self.services = Some(services);
  }
}

pub struct ShopServices {
  pub shop_name: String,
}

/// Storage that counts how many times the domain was cleared.
#[derive(Clone, Default)]
pub struct CountingStorage {
  inner: InMemoryStorage,
  pub clears: Arc<AtomicUsize>,
}

impl CountingStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn clear_count(&self) -> usize {
    self.clears.load(Ordering::SeqCst)
  }
}

impl Storage for CountingStorage {
  fn initialize(&mut self, domain: &str) {
    self.inner.initialize(domain)
  }

  fn domain(&self) -> Option<&str> {
    self.inner.domain()
  }

  fn get(&self, key: &str) -> Result<Option<JsonValue>> {
    self.inner.get(key)
  }

  fn has(&self, key: &str) -> Result<bool> {
    self.inner.has(key)
  }

  fn set(&mut self, key: &str, value: JsonValue) -> Result<()> {
    self.inner.set(key, value)
  }

  fn remove(&mut self, key: &str) -> Result<()> {
    self.inner.remove(key)
  }

  fn clear(&mut self) -> Result<()> {
    self.clears.fetch_add(1, Ordering::SeqCst);
    self.inner.clear()
  }

  fn update(&mut self, key: &str, f: &mut UpdateFn<'_>) -> Result<()> {
    self.inner.update(key, f)
  }
}

/// Linear scenario: steps in order, optional exit target.
pub struct LinearScenario {
  pub steps: Vec<(&'static str, Scripted)>,
  pub redirect: Option<&'static str>,
}

impl LinearScenario {
  pub fn of(names: &[&'static str]) -> Self {
    Self { steps: names.iter().map(|n| (*n, Scripted::Complete)).collect(), redirect: Some("/gracias") }
  }
}

impl ProcessScenario for LinearScenario {
  fn build(&self, builder: &mut ProcessBuilder) -> Result<()> {
    for (name, forward) in &self.steps {
      builder.add(name, TestStep::scripted(forward.clone()).boxed())?;
    }
    if let Some(redirect) = self.redirect {
      builder.set_redirect(redirect)?;
    }
    Ok(())
  }
}

pub fn coordinator_with(storage: Box<dyn Storage>) -> Coordinator {
  let config = WizardConfig::default();
  let router = Arc::new(TemplateRouter::with_defaults(&config));
  Coordinator::new(router, ProcessBuilder::new(), ProcessContext::new(storage), config)
}

pub fn names(steps: &[&str]) -> Vec<String> {
  steps.iter().map(|s| s.to_string()).collect()
}
