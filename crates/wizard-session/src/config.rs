// Archivo: config.rs
// Propósito: configuración del registro de sesiones.
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SessionError};

pub const DEFAULT_IDLE_TTL_SECS: u64 = 1800;
const MAX_IDLE_TTL_SECS: u64 = (i64::MAX / 1000) as u64 / 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
  /// Segundos sin acceso tras los que una sesión se considera caducada.
  pub idle_ttl_secs: u64,
}

impl Default for SessionConfig {
  fn default() -> Self {
    Self { idle_ttl_secs: DEFAULT_IDLE_TTL_SECS }
  }
}

impl SessionConfig {
  /// Carga `.env` (si existe) y lee `WIZARD_SESSION_TTL_SECS`.
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();
    match std::env::var("WIZARD_SESSION_TTL_SECS") {
      Ok(raw) => Self::parse_ttl(&raw),
      Err(_) => Ok(Self::default()),
    }
  }

  /// Valida un TTL textual: entero positivo.
  pub fn parse_ttl(raw: &str) -> Result<Self> {
    let secs: u64 = raw.trim()
                       .parse()
                       .map_err(|_| SessionError::Config(format!("WIZARD_SESSION_TTL_SECS no es un entero: {raw:?}")))?;
    if secs == 0 {
      return Err(SessionError::Config("WIZARD_SESSION_TTL_SECS debe ser mayor que 0".into()));
    }
    Ok(Self { idle_ttl_secs: secs })
  }

  pub fn idle_ttl(&self) -> TimeDelta {
    // TimeDelta admite hasta i64::MAX milisegundos.
    let secs = self.idle_ttl_secs.min(MAX_IDLE_TTL_SECS) as i64;
    TimeDelta::seconds(secs)
  }
}
