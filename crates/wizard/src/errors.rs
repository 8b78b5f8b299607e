// Archivo: errors.rs
// Propósito: definir los errores del motor de procesos y el alias Result<T>
// usado por las APIs del crate. Los mensajes están en español.
use thiserror::Error;

/// Errores del motor de procesos (wizard).
///
/// Ninguno se reintenta internamente: el motor los propaga de inmediato y la
/// capa de transporte decide cómo presentarlos (ver `ErrorKind::status_code`).
#[derive(Error, Debug)]
pub enum WizardError {
    /// El alias de escenario no fue registrado en el coordinador.
    #[error("Escenario de proceso con alias \"{0}\" no registrado")]
    ScenarioNotRegistered(String),
    /// Se intentó registrar dos veces el mismo alias de escenario.
    #[error("Escenario de proceso con alias \"{0}\" ya registrado")]
    ScenarioAlreadyRegistered(String),
    /// El paso pedido no existe en el proceso construido.
    #[error("Paso no encontrado: {0}")]
    StepNotFound(String),
    /// Se pidió el primer/último paso de un proceso vacío.
    #[error("El proceso no tiene pasos")]
    EmptyProcess,
    /// Ya existe un paso con ese nombre en el proceso.
    #[error("Ya existe un paso con nombre \"{0}\"")]
    DuplicateStep(String),
    /// Alias de plantilla de paso registrado dos veces en el builder.
    #[error("Paso con alias \"{0}\" ya registrado")]
    StepAliasAlreadyRegistered(String),
    /// Alias de plantilla de paso desconocido para el builder.
    #[error("Paso con alias \"{0}\" no registrado")]
    StepAliasNotRegistered(String),
    /// Operación del builder invocada antes de `build`.
    #[error("El builder no tiene proceso; llama a build antes de {0}")]
    BuilderNotInitialized(&'static str),
    /// Accesor del contexto invocado antes de `initialize`.
    #[error("El contexto del proceso no está inicializado")]
    ContextNotInitialized,
    /// El validador del proceso rechazó el estado presentado por el usuario.
    #[error("Validación fallida en el paso \"{step}\": {message}")]
    ValidationFailed { step: String, message: String },
    /// El historial persistido no contiene el paso actual.
    #[error("El paso \"{0}\" no figura en el historial del proceso")]
    HistoryIntegrity(String),
    /// Un paso devolvió algo que no es ActionResult ni respuesta.
    #[error("Resultado de avance inesperado, se esperaba ActionResult o Response: {0}")]
    UnexpectedAdvanceResult(String),
    /// El proceso terminó pero no tiene destino de salida configurado.
    #[error("El escenario \"{0}\" no define redirección de salida")]
    RedirectNotConfigured(String),
    /// Nombre de ruta desconocido para el resolvedor de rutas.
    #[error("Ruta no encontrada: {0}")]
    RouteNotFound(String),
    /// Error del backend de almacenamiento.
    #[error("Error de almacenamiento: {0}")]
    Storage(String),
    /// Error de serialización/deserialización JSON de valores persistidos.
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Discriminador estable del tipo de error, pensado para adaptadores de
/// transporte que necesitan traducir errores a respuestas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ScenarioNotRegistered,
    StepNotFound,
    BuilderInvalidState,
    DuplicateRegistration,
    InvalidArgument,
    ValidationFailed,
    HistoryIntegrityViolation,
    UnexpectedAdvanceResult,
    ContextNotInitialized,
    Storage,
}

impl ErrorKind {
    /// Código de estado HTTP equivalente sugerido.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::ScenarioNotRegistered | ErrorKind::ValidationFailed => 400,
            ErrorKind::StepNotFound | ErrorKind::HistoryIntegrityViolation => 404,
            _ => 500,
        }
    }
}

impl WizardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WizardError::ScenarioNotRegistered(_) => ErrorKind::ScenarioNotRegistered,
            WizardError::StepNotFound(_) | WizardError::EmptyProcess | WizardError::RouteNotFound(_) => {
                ErrorKind::StepNotFound
            }
            WizardError::BuilderNotInitialized(_) => ErrorKind::BuilderInvalidState,
            WizardError::ScenarioAlreadyRegistered(_)
            | WizardError::DuplicateStep(_)
            | WizardError::StepAliasAlreadyRegistered(_) => ErrorKind::DuplicateRegistration,
            WizardError::StepAliasNotRegistered(_) | WizardError::RedirectNotConfigured(_) => {
                ErrorKind::InvalidArgument
            }
            WizardError::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            WizardError::HistoryIntegrity(_) => ErrorKind::HistoryIntegrityViolation,
            WizardError::UnexpectedAdvanceResult(_) => ErrorKind::UnexpectedAdvanceResult,
            WizardError::ContextNotInitialized => ErrorKind::ContextNotInitialized,
            WizardError::Storage(_) | WizardError::Serialization(_) => ErrorKind::Storage,
        }
    }

    /// Indica si el error delata un defecto de programación (no del usuario).
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(),
                 ErrorKind::BuilderInvalidState
                 | ErrorKind::DuplicateRegistration
                 | ErrorKind::UnexpectedAdvanceResult
                 | ErrorKind::ContextNotInitialized)
    }
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, WizardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_not_registered_names_alias() {
        let err = WizardError::ScenarioNotRegistered("s".into());
        assert_eq!(err.to_string(), "Escenario de proceso con alias \"s\" no registrado");
        assert_eq!(err.kind().status_code(), 400);
        assert!(!err.is_fatal());
    }

    #[test]
    fn history_and_step_errors_are_not_found() {
        assert_eq!(WizardError::HistoryIntegrity("a".into()).kind().status_code(), 404);
        assert_eq!(WizardError::StepNotFound("a".into()).kind().status_code(), 404);
        assert_eq!(WizardError::EmptyProcess.kind(), ErrorKind::StepNotFound);
    }

    #[test]
    fn defects_are_fatal() {
        assert!(WizardError::UnexpectedAdvanceResult("x".into()).is_fatal());
        assert!(WizardError::ContextNotInitialized.is_fatal());
        assert!(WizardError::BuilderNotInitialized("add").is_fatal());
        assert!(WizardError::DuplicateStep("a".into()).is_fatal());
        assert!(!WizardError::ValidationFailed { step: "a".into(), message: "m".into() }.is_fatal());
    }
}
