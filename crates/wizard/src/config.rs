// Archivo: config.rs
// Propósito: configuración del coordinador (nombres de ruta por defecto).
use serde::{Deserialize, Serialize};

pub const DEFAULT_DISPLAY_ROUTE: &str = "wizard_display";
pub const DEFAULT_FORWARD_ROUTE: &str = "wizard_forward";

/// Rutas que usa el coordinador cuando el proceso no define las suyas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardConfig {
    pub display_route: String,
    pub forward_route: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self { display_route: DEFAULT_DISPLAY_ROUTE.to_string(),
               forward_route: DEFAULT_FORWARD_ROUTE.to_string() }
    }
}

impl WizardConfig {
    /// Carga `.env` (si existe) y lee `WIZARD_DISPLAY_ROUTE` /
    /// `WIZARD_FORWARD_ROUTE`. Variables ausentes o vacías usan el valor por
    /// defecto.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        Self { display_route: env_or("WIZARD_DISPLAY_ROUTE", defaults.display_route),
               forward_route: env_or("WIZARD_FORWARD_ROUTE", defaults.forward_route) }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty()).unwrap_or(default)
}
