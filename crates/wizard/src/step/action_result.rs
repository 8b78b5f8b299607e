use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::response::Response;

/// Resultado de avanzar un paso.
///
/// `complete()` no pide ningún paso concreto: el coordinador sigue el orden
/// natural del proceso. `continue_to(name)` fuerza el siguiente paso.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    next_step: Option<String>,
}

impl ActionResult {
    pub fn complete() -> Self {
        Self { next_step: None }
    }

    pub fn continue_to(step_name: impl Into<String>) -> Self {
        Self { next_step: Some(step_name.into()) }
    }

    /// Nombre del paso pedido explícitamente, si lo hay.
    pub fn next_step_name(&self) -> Option<&str> {
        self.next_step.as_deref()
    }
}

/// Lo que devuelve `Step::forward_action`.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// El paso terminó; el coordinador decide la navegación.
    Action(ActionResult),
    /// El paso ya resolvió la respuesta (por ejemplo, re-mostrar con errores).
    Response(Response),
    /// Valor que el coordinador no sabe interpretar. Se rechaza como defecto.
    Unrecognized(JsonValue),
}

impl From<ActionResult> for StepOutcome {
    fn from(result: ActionResult) -> Self {
        StepOutcome::Action(result)
    }
}

impl From<Response> for StepOutcome {
    fn from(response: Response) -> Self {
        StepOutcome::Response(response)
    }
}

/// Traduce la salida JSON de un manejador externo:
/// - `null` -> `ActionResult::complete()`
/// - `{"next_step": "x"}` -> `ActionResult::continue_to("x")`
/// - `{"redirect": "/url"}` -> `Response::Redirect`
/// - `{"body": .., "status": n}` -> `Response::Content` (status por defecto 200)
/// - cualquier otra cosa -> `Unrecognized`
impl From<JsonValue> for StepOutcome {
    fn from(value: JsonValue) -> Self {
        if value.is_null() {
            return StepOutcome::Action(ActionResult::complete());
        }
        if let Some(next) = value.get("next_step").and_then(JsonValue::as_str) {
            return StepOutcome::Action(ActionResult::continue_to(next));
        }
        if let Some(target) = value.get("redirect").and_then(JsonValue::as_str) {
            return StepOutcome::Response(Response::redirect(target));
        }
        if let Some(body) = value.get("body") {
            let status = value.get("status")
                              .and_then(JsonValue::as_u64)
                              .and_then(|s| u16::try_from(s).ok())
                              .unwrap_or(200);
            return StepOutcome::Response(Response::content(status, body.clone()));
        }
        StepOutcome::Unrecognized(value)
    }
}
