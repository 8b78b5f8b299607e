// Archivo: registry.rs
// Propósito: registro de sesiones de usuario final. Cada sesión tiene su
// propia bolsa de procesos; las sesiones inactivas más allá del TTL se
// purgan bajo demanda.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::debug;
use uuid::Uuid;

use crate::bag::SessionFlowsBag;
use crate::config::SessionConfig;
use crate::errors::{Result, SessionError};
use crate::storage::SessionStorage;

#[derive(Debug, Default)]
pub struct SessionRegistry {
  sessions: DashMap<Uuid, Arc<SessionFlowsBag>>,
  config: SessionConfig,
}

impl SessionRegistry {
  pub fn new(config: SessionConfig) -> Self {
    Self { sessions: DashMap::new(), config }
  }

  pub fn config(&self) -> &SessionConfig {
    &self.config
  }

  /// Abre una sesión nueva y devuelve su id.
  pub fn open_session(&self) -> Uuid {
    let id = Uuid::new_v4();
    self.sessions.insert(id, Arc::new(SessionFlowsBag::new()));
    debug!("sesión abierta: {}", id);
    id
  }

  /// Almacenamiento para la sesión `id`. Cada llamada devuelve un handle
  /// nuevo sobre la misma bolsa.
  pub fn storage_for(&self, id: Uuid) -> Result<SessionStorage> {
    let bag = self.bag(id)?;
    bag.touch();
    Ok(SessionStorage::new(bag))
  }

  pub fn bag(&self, id: Uuid) -> Result<Arc<SessionFlowsBag>> {
    self.sessions.get(&id).map(|bag| bag.value().clone()).ok_or(SessionError::SessionNotFound(id))
  }

  /// Cierra la sesión. Devuelve si existía.
  pub fn end_session(&self, id: Uuid) -> bool {
    let removed = self.sessions.remove(&id).is_some();
    if removed {
      debug!("sesión cerrada: {}", id);
    }
    removed
  }

  pub fn len(&self) -> usize {
    self.sessions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sessions.is_empty()
  }

  /// Purga las sesiones sin acceso durante más del TTL configurado.
  pub fn purge_idle(&self) -> usize {
    self.purge_idle_at(Utc::now())
  }

  /// Como `purge_idle` pero con el instante actual explícito.
  pub fn purge_idle_at(&self, now: DateTime<Utc>) -> usize {
    let Some(cutoff) = now.checked_sub_signed(self.config.idle_ttl()) else {
      return 0;
    };
    let before = self.sessions.len();
    self.sessions.retain(|_, bag| bag.last_access() >= cutoff);
    let purged = before.saturating_sub(self.sessions.len());
    if purged > 0 {
      debug!("sesiones purgadas por inactividad: {}", purged);
    }
    purged
  }
}
