// Archivo: routing.rs
// Propósito: contrato de resolución de rutas (nombre lógico + parámetros ->
// destino navegable) y un router de plantillas sencillo para wiring y pruebas.
use indexmap::IndexMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::WizardConfig;
use crate::errors::{Result, WizardError};

/// Parámetros de ruta en orden de inserción.
pub type RouteParams = IndexMap<String, String>;

/// Colaborador externo que genera destinos a partir de nombres de ruta.
pub trait RouteResolver: Send + Sync {
    fn generate(&self, route: &str, params: &RouteParams) -> Result<String>;
}

/// Router basado en plantillas con marcadores `{param}`.
///
/// Los parámetros que no aparecen en la plantilla se añaden como query string.
/// Un nombre desconocido que ya es un destino (empieza por `/` o contiene
/// `://`) se devuelve tal cual, con los parámetros como query string. Los
/// valores se codifican con percent-encoding.
#[derive(Debug, Clone, Default)]
pub struct TemplateRouter {
    routes: IndexMap<String, String>,
}

impl TemplateRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router con las rutas de mostrar/avanzar por defecto registradas bajo
    /// los nombres de `config`.
    pub fn with_defaults(config: &WizardConfig) -> Self {
        Self::new().route(&config.display_route, "/{scenarioAlias}/{stepName}")
                   .route(&config.forward_route, "/{scenarioAlias}/{stepName}/forward")
    }

    pub fn route(mut self, name: &str, template: &str) -> Self {
        self.routes.insert(name.to_string(), template.to_string());
        self
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }
}

impl RouteResolver for TemplateRouter {
    fn generate(&self, route: &str, params: &RouteParams) -> Result<String> {
        let Some(template) = self.routes.get(route) else {
            if route.starts_with('/') || route.contains("://") {
                return Ok(with_query(route.to_string(), params.iter()));
            }
            return Err(WizardError::RouteNotFound(route.to_string()));
        };

        // Una sola pasada: un valor sustituido nunca se vuelve a interpretar.
        let mut target = String::with_capacity(template.len());
        let mut used = Vec::new();
        let mut rest = template.as_str();
        while let Some(open) = rest.find('{') {
            target.push_str(&rest[..open]);
            let Some(close) = rest[open..].find('}') else {
                rest = &rest[open..];
                break;
            };
            let name = &rest[open + 1..open + close];
            match params.get(name) {
                Some(value) => {
                    target.push_str(&encode(value));
                    used.push(name);
                }
                None => target.push_str(&rest[open..=open + close]),
            }
            rest = &rest[open + close + 1..];
        }
        target.push_str(rest);

        Ok(with_query(target, params.iter().filter(|(key, _)| !used.contains(&key.as_str()))))
    }
}

/// Caracteres no reservados de RFC 3986; todo lo demás se codifica.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

fn with_query<'a, I>(mut target: String, params: I) -> String
    where I: Iterator<Item = (&'a String, &'a String)>
{
    let query = params.map(|(key, value)| format!("{}={}", encode(key), encode(value)))
                      .collect::<Vec<_>>();
    if !query.is_empty() {
        target.push(if target.contains('?') { '&' } else { '?' });
        target.push_str(&query.join("&"));
    }
    target
}
