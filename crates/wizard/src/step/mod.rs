//! Pasos del proceso.
//!
//! Un paso es una unidad de trabajo con nombre que expone dos operaciones:
//! mostrarse (`display_action`) y avanzar con la entrada del usuario
//! (`forward_action`). Este módulo define:
//! - `Step`: la interfaz que usan el builder y el coordinador.
//! - `ActionResult` y `StepOutcome`: resultado de avanzar un paso.
//! - `ServiceAware` / `Services`: capacidad opcional para recibir servicios
//!   externos inyectados por el builder.
//! - `DelegateStep`: paso que delega en un manejador externo.

mod action_result;
pub mod delegate;
mod services;
mod trait_step;

pub use action_result::{ActionResult, StepOutcome};
pub use delegate::{DelegateStep, StepHandler};
pub use services::{ServiceAware, Services};
pub use trait_step::Step;
