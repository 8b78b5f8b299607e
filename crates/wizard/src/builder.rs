// Archivo: builder.rs
// Propósito: ensamblar un `Process` a partir de un escenario. Guarda las
// plantillas de pasos registradas por alias e inyecta servicios en los pasos
// que los piden.
use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::errors::{Result, WizardError};
use crate::process::Process;
use crate::routing::RouteParams;
use crate::scenario::ProcessScenario;
use crate::step::{Services, Step};
use crate::validator::ProcessValidator;

/// Plantilla de paso: se instancia un paso nuevo en cada `load_step`.
pub type StepFactory = Arc<dyn Fn() -> Box<dyn Step> + Send + Sync>;

/// Lo que acepta `ProcessBuilder::add`: una instancia o el alias de una
/// plantilla registrada.
pub enum StepSource {
    Instance(Box<dyn Step>),
    Alias(String),
}

impl StepSource {
    pub fn instance<S>(step: S) -> Self
        where S: Step + 'static
    {
        StepSource::Instance(Box::new(step))
    }
}

impl From<Box<dyn Step>> for StepSource {
    fn from(step: Box<dyn Step>) -> Self {
        StepSource::Instance(step)
    }
}

impl From<&str> for StepSource {
    fn from(alias: &str) -> Self {
        StepSource::Alias(alias.to_string())
    }
}

impl From<String> for StepSource {
    fn from(alias: String) -> Self {
        StepSource::Alias(alias)
    }
}

/// Constructor de procesos.
///
/// Las operaciones que modifican el proceso fallan con
/// `BuilderNotInitialized` hasta que se llama a `build`. Clonar el builder
/// comparte las plantillas y servicios, no el proceso en curso.
#[derive(Clone, Default)]
pub struct ProcessBuilder {
    process: Option<Process>,
    templates: IndexMap<String, StepFactory>,
    services: Option<Services>,
}

impl ProcessBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Servicios a inyectar en pasos `ServiceAware`.
    pub fn with_services(mut self, services: Services) -> Self {
        self.services = Some(services);
        self
    }

    pub fn set_services(&mut self, services: Services) {
        self.services = Some(services);
    }

    pub fn services(&self) -> Option<&Services> {
        self.services.as_ref()
    }

    /// Crea un proceso vacío, deja que el escenario lo pueble y devuelve una
    /// copia. El proceso construido queda accesible con `process()`.
    pub fn build(&mut self, scenario: &dyn ProcessScenario) -> Result<Process> {
        self.process = Some(Process::new());
        scenario.build(self)?;
        let process = self.process_mut("build")?.clone();
        debug!("proceso construido con {} pasos", process.count_steps());
        Ok(process)
    }

    /// Último proceso construido (o en construcción).
    pub fn process(&self) -> Option<&Process> {
        self.process.as_ref()
    }

    fn process_mut(&mut self, op: &'static str) -> Result<&mut Process> {
        self.process.as_mut().ok_or(WizardError::BuilderNotInitialized(op))
    }

    /// Registra una plantilla de paso bajo `alias`.
    pub fn register_step<F>(&mut self, alias: &str, factory: F) -> Result<&mut Self>
        where F: Fn() -> Box<dyn Step> + Send + Sync + 'static
    {
        if self.templates.contains_key(alias) {
            return Err(WizardError::StepAliasAlreadyRegistered(alias.to_string()));
        }
        self.templates.insert(alias.to_string(), Arc::new(factory));
        Ok(self)
    }

    pub fn has_template(&self, alias: &str) -> bool {
        self.templates.contains_key(alias)
    }

    /// Instancia la plantilla registrada bajo `alias`.
    pub fn load_step(&self, alias: &str) -> Result<Box<dyn Step>> {
        self.templates
            .get(alias)
            .map(|factory| factory())
            .ok_or_else(|| WizardError::StepAliasNotRegistered(alias.to_string()))
    }

    /// Añade un paso al proceso con el nombre `name`.
    ///
    /// `source` puede ser una instancia o un alias registrado. Si hay
    /// servicios configurados y el paso los acepta, se le inyectan antes de
    /// añadirlo.
    pub fn add(&mut self, name: &str, source: impl Into<StepSource>) -> Result<&mut Self> {
        self.process_mut("add")?;
        let mut step = match source.into() {
            StepSource::Instance(step) => step,
            StepSource::Alias(alias) => self.load_step(&alias)?,
        };
        step.set_name(name);
        if let Some(services) = &self.services {
            if let Some(aware) = step.as_service_aware() {
                aware.set_services(services.clone());
            }
        }
        self.process_mut("add")?.add_step(name, step)?;
        Ok(self)
    }

    pub fn remove(&mut self, name: &str) -> Result<&mut Self> {
        self.process_mut("remove")?.remove_step(name)?;
        Ok(self)
    }

    pub fn has(&self, name: &str) -> Result<bool> {
        self.process
            .as_ref()
            .map(|process| process.has_step(name))
            .ok_or(WizardError::BuilderNotInitialized("has"))
    }

    pub fn set_display_route(&mut self, route: &str) -> Result<&mut Self> {
        self.process_mut("set_display_route")?.set_display_route(route);
        Ok(self)
    }

    pub fn set_forward_route(&mut self, route: &str) -> Result<&mut Self> {
        self.process_mut("set_forward_route")?.set_forward_route(route);
        Ok(self)
    }

    pub fn set_redirect(&mut self, redirect: &str) -> Result<&mut Self> {
        self.process_mut("set_redirect")?.set_redirect(redirect);
        Ok(self)
    }

    pub fn set_redirect_params(&mut self, params: RouteParams) -> Result<&mut Self> {
        self.process_mut("set_redirect_params")?.set_redirect_params(params);
        Ok(self)
    }

    /// Valida el proceso con un predicado y el mensaje por defecto.
    pub fn validate<F>(&mut self, predicate: F) -> Result<&mut Self>
        where F: Fn() -> bool + Send + Sync + 'static
    {
        self.validate_with(ProcessValidator::new(predicate))
    }

    pub fn validate_with(&mut self, validator: ProcessValidator) -> Result<&mut Self> {
        self.process_mut("validate")?.set_validator(validator);
        Ok(self)
    }
}

impl std::fmt::Debug for ProcessBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessBuilder")
         .field("process", &self.process)
         .field("templates", &self.templates.keys().collect::<Vec<_>>())
         .field("services", &self.services)
         .finish()
    }
}
