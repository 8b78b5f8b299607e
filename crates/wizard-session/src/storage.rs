// Archivo: storage.rs
// Propósito: implementación de `wizard::Storage` sobre una bolsa de sesión.
// La clave `k` del dominio `d` vive en la ruta `d/k`; `clear` borra `d`.
use std::sync::Arc;

use log::debug;
use serde_json::Value as JsonValue;
use wizard::{Result, Storage, UpdateFn, WizardError};

use crate::bag::SessionFlowsBag;

#[derive(Debug, Clone)]
pub struct SessionStorage {
  bag: Arc<SessionFlowsBag>,
  domain: Option<String>,
}

impl SessionStorage {
  pub fn new(bag: Arc<SessionFlowsBag>) -> Self {
    Self { bag, domain: None }
  }

  pub fn bag(&self) -> &Arc<SessionFlowsBag> {
    &self.bag
  }

  fn path(&self, key: &str) -> Result<String> {
    let domain = self.domain.as_deref().ok_or_else(|| WizardError::Storage("dominio no inicializado".into()))?;
    Ok(format!("{}/{}", domain, key))
  }

  fn active_domain(&self) -> Result<&str> {
    self.domain.as_deref().ok_or_else(|| WizardError::Storage("dominio no inicializado".into()))
  }
}

impl Storage for SessionStorage {
  fn initialize(&mut self, domain: &str) {
    debug!("bolsa {}: dominio activo {}", self.bag.name(), domain);
    self.domain = Some(domain.to_string());
  }

  fn domain(&self) -> Option<&str> {
    self.domain.as_deref()
  }

  fn get(&self, key: &str) -> Result<Option<JsonValue>> {
    let path = self.path(key)?;
    self.bag.touch();
    Ok(self.bag.get(&path))
  }

  fn has(&self, key: &str) -> Result<bool> {
    Ok(self.bag.has(&self.path(key)?))
  }

  fn set(&mut self, key: &str, value: JsonValue) -> Result<()> {
    let path = self.path(key)?;
    self.bag.touch();
    Ok(self.bag.set(&path, value)?)
  }

  fn remove(&mut self, key: &str) -> Result<()> {
    let path = self.path(key)?;
    self.bag.remove(&path);
    Ok(())
  }

  fn clear(&mut self) -> Result<()> {
    let domain = self.active_domain()?;
    self.bag.remove(domain);
    debug!("bolsa {}: dominio {} borrado", self.bag.name(), domain);
    Ok(())
  }

  fn update(&mut self, key: &str, f: &mut UpdateFn<'_>) -> Result<()> {
    let path = self.path(key)?;
    self.bag.touch();
    self.bag.update(&path, f)
  }
}
