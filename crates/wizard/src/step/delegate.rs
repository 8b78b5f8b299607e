//! Paso que delega en un manejador externo.
//!
//! Útil cuando la lógica del paso vive en otra capa (por ejemplo un handler
//! HTTP) y sólo produce JSON. La salida de `forward` se traduce con
//! `StepOutcome::from(JsonValue)`; si no encaja en ninguna forma conocida el
//! coordinador la rechaza con `UnexpectedAdvanceResult`.
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::context::ProcessContext;
use crate::errors::Result;
use crate::response::Response;

use super::{ServiceAware, Services, Step, StepOutcome};

/// Manejador externo al que delega un `DelegateStep`.
pub trait StepHandler: Send + Sync {
    fn display(&self, step: &DelegateStep, ctx: &mut ProcessContext) -> Result<Response>;

    /// Devuelve JSON crudo; ver `StepOutcome::from(JsonValue)` para las formas
    /// aceptadas.
    fn forward(&self, step: &DelegateStep, ctx: &mut ProcessContext) -> Result<JsonValue>;
}

pub struct DelegateStep {
    name: String,
    handler: Arc<dyn StepHandler>,
    services: Option<Services>,
    active: bool,
}

impl DelegateStep {
    pub fn new(handler: Arc<dyn StepHandler>) -> Self {
        Self { name: String::new(),
               handler,
               services: None,
               active: true }
    }

    /// Marca el paso como inactivo (se sigue pudiendo registrar).
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Servicios inyectados por el builder, si los hay.
    pub fn services(&self) -> Option<&Services> {
        self.services.as_ref()
    }
}

impl Step for DelegateStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn display_action(&self, ctx: &mut ProcessContext) -> Result<Response> {
        self.handler.display(self, ctx)
    }

    fn forward_action(&self, ctx: &mut ProcessContext) -> Result<StepOutcome> {
        let raw = self.handler.forward(self, ctx)?;
        Ok(StepOutcome::from(raw))
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn as_service_aware(&mut self) -> Option<&mut dyn ServiceAware> {
        Some(self)
    }
}

impl ServiceAware for DelegateStep {
    fn set_services(&mut self, services: Services) {
        self.services = Some(services);
    }
}
