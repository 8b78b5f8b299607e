// Archivo: context.rs
// Propósito: cursor por petición sobre un `Process`. Enlaza proceso,
// almacenamiento y paso actual; calcula vecinos y progreso, mantiene el
// historial persistido y decide si la posición del usuario es legítima.
use std::sync::Arc;

use log::debug;
use serde_json::Value as JsonValue;

use crate::errors::{Result, WizardError};
use crate::process::Process;
use crate::step::Step;
use crate::storage::{domain_for, Storage};

/// Clave bajo la que se persiste el historial dentro del dominio.
pub const HISTORY_KEY: &str = "history";

/// Posición calculada en `initialize`.
#[derive(Debug)]
struct Cursor {
    process: Arc<Process>,
    current: Arc<dyn Step>,
    previous: Option<Arc<dyn Step>>,
    next: Option<Arc<dyn Step>>,
    progress: u8,
}

/// Contexto de ejecución de un proceso para una petición.
///
/// Todo salvo `set_storage`/`storage`/`set_request`/`request` falla con
/// `ContextNotInitialized` hasta que se llama a `initialize`.
pub struct ProcessContext {
    storage: Box<dyn Storage>,
    cursor: Option<Cursor>,
    request: Option<JsonValue>,
}

impl ProcessContext {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage,
               cursor: None,
               request: None }
    }

    /// Enlaza el contexto a `process` con `current_step` como paso actual.
    ///
    /// El dominio de almacenamiento se deriva del alias del escenario. Si el
    /// paso no forma parte del proceso no hay vecinos y el progreso es 0.
    pub fn initialize(&mut self, process: Arc<Process>, current_step: Arc<dyn Step>) {
        let domain = domain_for(process.scenario_alias());
        self.storage.initialize(&domain);

        let count = process.count_steps();
        let (previous, next, progress) = match process.index_of(current_step.name()) {
            Some(index) => {
                let previous = index.checked_sub(1)
                                    .and_then(|i| process.step_by_index(i).ok())
                                    .cloned();
                let next = process.step_by_index(index + 1).ok().cloned();
                (previous, next, ((index + 1) * 100 / count) as u8)
            }
            None => (None, None, 0),
        };

        debug!("contexto inicializado: escenario={} paso={} progreso={}%",
               process.scenario_alias(),
               current_step.name(),
               progress);

        self.cursor = Some(Cursor { process,
                                    current: current_step,
                                    previous,
                                    next,
                                    progress });
    }

    pub fn is_initialized(&self) -> bool {
        self.cursor.is_some()
    }

    fn cursor(&self) -> Result<&Cursor> {
        self.cursor.as_ref().ok_or(WizardError::ContextNotInitialized)
    }

    pub fn process(&self) -> Result<&Arc<Process>> {
        Ok(&self.cursor()?.process)
    }

    pub fn current_step(&self) -> Result<&Arc<dyn Step>> {
        Ok(&self.cursor()?.current)
    }

    pub fn previous_step(&self) -> Result<Option<&Arc<dyn Step>>> {
        Ok(self.cursor()?.previous.as_ref())
    }

    pub fn next_step(&self) -> Result<Option<&Arc<dyn Step>>> {
        Ok(self.cursor()?.next.as_ref())
    }

    pub fn is_first_step(&self) -> Result<bool> {
        Ok(self.cursor()?.previous.is_none())
    }

    pub fn is_last_step(&self) -> Result<bool> {
        Ok(self.cursor()?.next.is_none())
    }

    /// Porcentaje entero, truncado: `(índice + 1) * 100 / total`.
    pub fn progress(&self) -> Result<u8> {
        Ok(self.cursor()?.progress)
    }

    /// Comprueba si el usuario puede estar legítimamente en el paso actual.
    ///
    /// Falso si el validador del proceso lo rechaza. Un proceso sin pasos es
    /// siempre válido. En otro caso es válido si el historial está vacío o
    /// contiene el paso actual.
    pub fn is_valid(&self) -> Result<bool> {
        let cursor = self.cursor()?;
        if let Some(validator) = cursor.process.validator() {
            if !validator.is_valid() {
                return Ok(false);
            }
        }
        if cursor.process.count_steps() == 0 {
            return Ok(true);
        }
        let history = self.step_history()?;
        Ok(history.is_empty() || history.iter().any(|name| name == cursor.current.name()))
    }

    /// Historial persistido; vacío si nunca se registró.
    pub fn step_history(&self) -> Result<Vec<String>> {
        self.cursor()?;
        match self.storage.get(HISTORY_KEY)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn set_step_history(&mut self, history: &[String]) -> Result<()> {
        self.cursor()?;
        let value = serde_json::to_value(history)?;
        self.storage.set(HISTORY_KEY, value)
    }

    /// Añade `name` al final del historial si aún no figura en él.
    pub fn add_step_to_history(&mut self, name: &str) -> Result<()> {
        self.cursor()?;
        self.storage.update(HISTORY_KEY, &mut |current| {
                        let mut history = decode_history(current)?;
                        if !history.iter().any(|n| n == name) {
                            history.push(name.to_string());
                        }
                        Ok(Some(serde_json::to_value(history)?))
                    })?;
        debug!("historial: añadido {}", name);
        Ok(())
    }

    /// Descarta del historial todo lo posterior a la última aparición del
    /// paso actual. Falla con `HistoryIntegrity` si el paso no figura.
    pub fn rewind_history(&mut self) -> Result<()> {
        let current = self.cursor()?.current.name().to_string();
        self.storage.update(HISTORY_KEY, &mut |stored| {
                        let mut history = decode_history(stored)?;
                        let position = history.iter()
                                              .rposition(|n| *n == current)
                                              .ok_or_else(|| WizardError::HistoryIntegrity(current.clone()))?;
                        history.truncate(position + 1);
                        Ok(Some(serde_json::to_value(history)?))
                    })?;
        debug!("historial rebobinado hasta {}", current);
        Ok(())
    }

    /// Fuerza el siguiente paso por nombre (salto explícito).
    pub fn set_next_step_by_name(&mut self, name: &str) -> Result<()> {
        let step = self.cursor()?.process.step_by_name(name)?.clone();
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.next = Some(step);
        }
        Ok(())
    }

    /// Borra todo el estado persistido del dominio.
    pub fn close(&mut self) -> Result<()> {
        let alias = self.cursor()?.process.scenario_alias().to_string();
        self.storage.clear()?;
        debug!("proceso cerrado: escenario={}", alias);
        Ok(())
    }

    pub fn set_storage(&mut self, storage: Box<dyn Storage>) {
        self.storage = storage;
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn storage_mut(&mut self) -> &mut dyn Storage {
        self.storage.as_mut()
    }

    /// Petición entrante, opaca para el motor.
    pub fn set_request(&mut self, request: JsonValue) {
        self.request = Some(request);
    }

    pub fn request(&self) -> Option<&JsonValue> {
        self.request.as_ref()
    }
}

fn decode_history(value: Option<JsonValue>) -> Result<Vec<String>> {
    match value {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Vec::new()),
    }
}

impl std::fmt::Debug for ProcessContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessContext")
         .field("domain", &self.storage.domain())
         .field("cursor", &self.cursor)
         .field("request", &self.request)
         .finish()
    }
}
