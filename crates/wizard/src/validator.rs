// Archivo: validator.rs
// Propósito: validador a nivel de proceso. Envuelve un predicado sin
// argumentos (una closure que captura el estado que necesite) y la operación
// que aborta cuando el predicado es falso.
use std::convert::Infallible;
use std::sync::Arc;

use crate::errors::{Result, WizardError};
use crate::step::Step;

const DEFAULT_MESSAGE: &str = "Paso no válido";

type Predicate = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Clone)]
pub struct ProcessValidator {
    predicate: Predicate,
    message: String,
    step_name: Option<String>,
}

impl ProcessValidator {
    pub fn new<F>(predicate: F) -> Self
        where F: Fn() -> bool + Send + Sync + 'static
    {
        Self { predicate: Arc::new(predicate),
               message: DEFAULT_MESSAGE.to_string(),
               step_name: None }
    }

    /// Mensaje que acompaña al error de validación.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Nombre de paso a reportar en lugar del paso actual.
    pub fn with_step_name(mut self, step_name: impl Into<String>) -> Self {
        self.step_name = Some(step_name.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn step_name(&self) -> Option<&str> {
        self.step_name.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        (self.predicate)()
    }

    /// Aborta siempre con `ValidationFailed`. Sólo debe llamarse una vez que
    /// `is_valid()` devolvió `false`; el tipo de retorno impide usarlo como
    /// consulta.
    pub fn signal_invalid(&self, step: &dyn Step) -> Result<Infallible> {
        let step = self.step_name.clone().unwrap_or_else(|| step.name().to_string());
        Err(WizardError::ValidationFailed { step,
                                            message: self.message.clone() })
    }
}

impl std::fmt::Debug for ProcessValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessValidator")
         .field("message", &self.message)
         .field("step_name", &self.step_name)
         .finish_non_exhaustive()
    }
}
