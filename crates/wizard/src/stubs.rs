// Archivo: stubs.rs
// Propósito: implementaciones en memoria para pruebas y wiring rápido.
//
// `InMemoryStorage` no es durable. Los clones comparten los datos (cada clon
// es un handle con su propio dominio activo), así que sirve para simular
// varias peticiones sobre la misma sesión.
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value as JsonValue;

use crate::errors::{Result, WizardError};
use crate::storage::{Storage, UpdateFn};

type Domains = HashMap<String, HashMap<String, JsonValue>>;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    /// Datos por dominio.
    data: Arc<Mutex<Domains>>,
    domain: Option<String>,
}

impl InMemoryStorage {
    /// Crea un almacenamiento vacío sin dominio activo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Helper para mapear `Mutex::lock()` en un `Result` con
    /// `WizardError::Storage`.
    fn lock(&self) -> Result<MutexGuard<'_, Domains>> {
        self.data
            .lock()
            .map_err(|e| WizardError::Storage(format!("mutex poisoned: {:?}", e)))
    }

    fn active_domain(&self) -> Result<&str> {
        self.domain
            .as_deref()
            .ok_or_else(|| WizardError::Storage("dominio no inicializado".into()))
    }

    /// Número de dominios con datos (inspección en pruebas).
    pub fn domain_count(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }
}

impl Storage for InMemoryStorage {
    fn initialize(&mut self, domain: &str) {
        self.domain = Some(domain.to_string());
    }

    fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let domain = self.active_domain()?;
        let data = self.lock()?;
        Ok(data.get(domain).and_then(|values| values.get(key)).cloned())
    }

    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    fn set(&mut self, key: &str, value: JsonValue) -> Result<()> {
        let domain = self.active_domain()?.to_string();
        self.lock()?.entry(domain).or_default().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let domain = self.active_domain()?.to_string();
        if let Some(values) = self.lock()?.get_mut(&domain) {
            values.remove(key);
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let domain = self.active_domain()?.to_string();
        self.lock()?.remove(&domain);
        Ok(())
    }

    /// Atómica: se ejecuta con el mutex tomado. El dominio solo se crea
    /// cuando hay algo que escribir.
    fn update(&mut self, key: &str, f: &mut UpdateFn<'_>) -> Result<()> {
        let domain = self.active_domain()?.to_string();
        let mut data = self.lock()?;
        let current = data.get(&domain).and_then(|values| values.get(key)).cloned();
        match f(current)? {
            Some(value) => {
                data.entry(domain).or_default().insert(key.to_string(), value);
            }
            None => {
                if let Some(values) = data.get_mut(&domain) {
                    values.remove(key);
                }
            }
        }
        Ok(())
    }
}
