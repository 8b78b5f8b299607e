//! Crate `wizard`: motor de procesos de varios pasos (asistentes)
//!
//! Lleva a un usuario por una secuencia ordenada de pasos con nombre
//! (checkout, onboarding, ...), persiste su avance entre peticiones, valida
//! que la posición que presenta es legítima y decide la navegación tras cada
//! paso.
//!
//! Piezas principales:
//! - `Step` / `ActionResult` / `StepOutcome`: contrato de un paso y lo que
//!   devuelve al avanzar.
//! - `Process`: pasos ordenados con nombre único más la política del
//!   escenario (rutas, destino de salida, validador).
//! - `ProcessContext`: cursor por petición; historial, validez y progreso.
//! - `ProcessBuilder` / `ProcessScenario`: construcción del proceso.
//! - `Coordinator`: `start`, `display` y `forward`.
//! - `Storage`: contrato de almacenamiento con dominio (`InMemoryStorage`
//!   para pruebas; ver el crate `wizard-session` para sesiones).
//!
//! Ejemplo rápido:
//! ```rust
//! use std::sync::Arc;
//! use wizard::{Coordinator, InMemoryStorage, ProcessBuilder, ProcessContext, RouteParams,
//!              TemplateRouter, WizardConfig};
//!
//! let config = WizardConfig::default();
//! let router = Arc::new(TemplateRouter::with_defaults(&config));
//! let context = ProcessContext::new(Box::new(InMemoryStorage::new()));
//! let mut coordinator = Coordinator::new(router, ProcessBuilder::new(), context, config);
//! assert!(coordinator.start("checkout", &RouteParams::new()).is_err());
//! ```
pub mod builder;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod errors;
pub mod process;
pub mod response;
pub mod routing;
pub mod scenario;
pub mod step;
pub mod storage;
pub mod stubs;
pub mod validator;

pub use builder::*;
pub use config::*;
pub use context::*;
pub use coordinator::*;
pub use errors::*;
pub use process::*;
pub use response::*;
pub use routing::*;
pub use scenario::*;
pub use step::*;
pub use storage::*;
pub use stubs::*;
pub use validator::*;
