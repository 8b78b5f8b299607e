// Archivo: bag.rs
// Propósito: bolsa de sesión con los datos de todos los procesos de un
// usuario. Cada proceso ocupa un dominio; las rutas tienen la forma
// `dominio/clave` y la ruta `dominio` a secas designa el espacio completo.
//
// Los accesos concurrentes al mismo dominio se serializan con el bloqueo de
// entrada de `DashMap`, así `update` es una lectura-modificación-escritura
// atómica por dominio.
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::{Map, Value as JsonValue};

use crate::errors::{Result, SessionError};

/// Nombre con el que la bolsa se registra en la sesión.
pub const BAG_NAME: &str = "wizard.flow.bag";

#[derive(Debug)]
pub struct SessionFlowsBag {
  name: String,
  domains: DashMap<String, Map<String, JsonValue>>,
  /// Último acceso en milisegundos desde epoch.
  last_access: AtomicI64,
}

impl Default for SessionFlowsBag {
  fn default() -> Self {
    Self::new()
  }
}

impl SessionFlowsBag {
  pub fn new() -> Self {
    Self::named(BAG_NAME)
  }

  pub fn named(name: &str) -> Self {
    Self { name: name.to_string(),
           domains: DashMap::new(),
           last_access: AtomicI64::new(Utc::now().timestamp_millis()) }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Marca la bolsa como usada ahora.
  pub fn touch(&self) {
    self.touch_at(Utc::now());
  }

  pub fn touch_at(&self, at: DateTime<Utc>) {
    self.last_access.store(at.timestamp_millis(), Ordering::SeqCst);
  }

  pub fn last_access(&self) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(self.last_access.load(Ordering::SeqCst)).unwrap_or_default()
  }

  pub fn get(&self, path: &str) -> Option<JsonValue> {
    match split_path(path) {
      (domain, Some(key)) => self.domains.get(domain).and_then(|values| values.get(key).cloned()),
      (domain, None) => self.domains.get(domain).map(|values| JsonValue::Object(values.clone())),
    }
  }

  pub fn has(&self, path: &str) -> bool {
    match split_path(path) {
      (domain, Some(key)) => self.domains.get(domain).map(|values| values.contains_key(key)).unwrap_or(false),
      (domain, None) => self.domains.contains_key(domain),
    }
  }

  /// Escribe un valor. La ruta debe incluir clave.
  pub fn set(&self, path: &str, value: JsonValue) -> Result<()> {
    let (domain, key) = require_key(path)?;
    self.domains.entry(domain.to_string()).or_default().insert(key.to_string(), value);
    Ok(())
  }

  /// Borra una clave, o el dominio entero si la ruta no lleva clave.
  pub fn remove(&self, path: &str) -> Option<JsonValue> {
    match split_path(path) {
      (domain, Some(key)) => self.domains.get_mut(domain).and_then(|mut values| values.remove(key)),
      (domain, None) => self.domains.remove(domain).map(|(_, values)| JsonValue::Object(values)),
    }
  }

  /// Lectura-modificación-escritura atómica dentro del dominio de `path`.
  /// `f` recibe el valor actual y devuelve el nuevo (`None` = borrar). Si
  /// `f` falla no se escribe nada, ni siquiera el dominio vacío.
  pub fn update<F, E>(&self, path: &str, f: F) -> std::result::Result<(), E>
    where F: FnOnce(Option<JsonValue>) -> std::result::Result<Option<JsonValue>, E>,
          E: From<SessionError>
  {
    let (domain, key) = require_key(path)?;
    match self.domains.entry(domain.to_string()) {
      Entry::Occupied(mut entry) => match f(entry.get().get(key).cloned())? {
        Some(value) => {
          entry.get_mut().insert(key.to_string(), value);
        }
        None => {
          entry.get_mut().remove(key);
        }
      },
      // el bloqueo de la entrada vacante se mantiene mientras corre `f`
      Entry::Vacant(entry) => {
        if let Some(value) = f(None)? {
          entry.insert(Map::new()).insert(key.to_string(), value);
        }
      }
    }
    Ok(())
  }

  /// Dominios con datos.
  pub fn domains(&self) -> Vec<String> {
    self.domains.iter().map(|entry| entry.key().clone()).collect()
  }

  pub fn is_empty(&self) -> bool {
    self.domains.is_empty()
  }

  /// Vacía la bolsa completa (todos los procesos).
  pub fn clear(&self) {
    self.domains.clear();
  }
}

fn split_path(path: &str) -> (&str, Option<&str>) {
  match path.split_once('/') {
    Some((domain, key)) => (domain, Some(key)),
    None => (path, None),
  }
}

fn require_key(path: &str) -> Result<(&str, &str)> {
  match split_path(path) {
    (domain, Some(key)) if !domain.is_empty() && !key.is_empty() => Ok((domain, key)),
    _ => Err(SessionError::InvalidPath(path.to_string())),
  }
}
