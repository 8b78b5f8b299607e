// Archivo: response.rs
// Propósito: valor de respuesta/navegación que el motor devuelve a la capa
// de transporte. El motor no renderiza nada: `Content` lleva un cuerpo JSON
// opaco que el adaptador presenta como quiera.
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Response {
    /// Redirección a un destino navegable ya resuelto.
    Redirect { target: String },
    /// Contenido a mostrar (por ejemplo, el formulario de un paso).
    Content { status: u16, body: JsonValue },
}

impl Response {
    pub fn redirect(target: impl Into<String>) -> Self {
        Response::Redirect { target: target.into() }
    }

    pub fn content(status: u16, body: JsonValue) -> Self {
        Response::Content { status, body }
    }

    /// Atajo para contenido con estado 200.
    pub fn ok(body: JsonValue) -> Self {
        Response::content(200, body)
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Response::Redirect { .. })
    }

    /// Destino de la redirección, `None` si es contenido.
    pub fn target_url(&self) -> Option<&str> {
        match self {
            Response::Redirect { target } => Some(target),
            Response::Content { .. } => None,
        }
    }
}
