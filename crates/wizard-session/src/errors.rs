// Archivo: errors.rs
// Propósito: errores del backend de sesión y su traducción a `WizardError`.
use thiserror::Error;
use uuid::Uuid;
use wizard::WizardError;

#[derive(Error, Debug)]
pub enum SessionError {
  /// Valor de configuración inválido (variables de entorno).
  #[error("Configuración de sesión inválida: {0}")]
  Config(String),
  /// Ruta de bolsa sin clave (`dominio/clave`).
  #[error("Ruta de sesión inválida: {0}")]
  InvalidPath(String),
  /// La sesión no existe o ya caducó.
  #[error("Sesión no encontrada: {0}")]
  SessionNotFound(Uuid),
}

impl From<SessionError> for WizardError {
  fn from(err: SessionError) -> Self {
    WizardError::Storage(err.to_string())
  }
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, SessionError>;
