use crate::context::ProcessContext;
use crate::errors::Result;
use crate::response::Response;

use super::{ActionResult, ServiceAware, StepOutcome};

/// Trait que representa un paso del proceso.
///
/// El nombre se asigna al registrar el paso en un `Process` (o al añadirlo
/// desde el builder); después el paso vive detrás de un `Arc` y ya no cambia.
pub trait Step: Send + Sync {
    /// Nombre del paso dentro del proceso.
    fn name(&self) -> &str;

    /// Asigna el nombre. Lo llama el proceso al añadir el paso.
    fn set_name(&mut self, name: &str);

    /// Produce la respuesta a mostrar para este paso.
    fn display_action(&self, ctx: &mut ProcessContext) -> Result<Response>;

    /// Procesa la entrada del usuario. Por defecto completa el paso y deja que
    /// el coordinador siga el orden natural.
    fn forward_action(&self, _ctx: &mut ProcessContext) -> Result<StepOutcome> {
        Ok(StepOutcome::Action(ActionResult::complete()))
    }

    fn is_active(&self) -> bool {
        true
    }

    /// Capacidad opcional: pasos que necesitan servicios externos devuelven
    /// `Some(self)` para que el builder les inyecte `Services`.
    fn as_service_aware(&mut self) -> Option<&mut dyn ServiceAware> {
        None
    }
}

impl std::fmt::Debug for dyn Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name()).finish()
    }
}
