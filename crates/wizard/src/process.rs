// Archivo: process.rs
// Propósito: el proceso construido para un escenario. Conjunto ordenado de
// pasos con nombre único más la política del escenario (rutas, destino de
// salida y validador). Se construye en cada invocación y no se persiste: en
// el almacenamiento sólo se guarda la posición del usuario.
use std::sync::Arc;

use indexmap::IndexMap;

use crate::errors::{Result, WizardError};
use crate::routing::RouteParams;
use crate::step::Step;
use crate::validator::ProcessValidator;

#[derive(Clone, Debug, Default)]
pub struct Process {
    scenario_alias: String,
    /// Orden de inserción = orden de recorrido.
    steps: IndexMap<String, Arc<dyn Step>>,
    display_route: Option<String>,
    forward_route: Option<String>,
    redirect: Option<String>,
    redirect_params: RouteParams,
    validator: Option<ProcessValidator>,
}

impl Process {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scenario_alias(&self) -> &str {
        &self.scenario_alias
    }

    pub fn set_scenario_alias(&mut self, alias: impl Into<String>) {
        self.scenario_alias = alias.into();
    }

    pub fn steps(&self) -> &IndexMap<String, Arc<dyn Step>> {
        &self.steps
    }

    /// Reemplaza todos los pasos respetando el orden de iteración. Claves
    /// repetidas colapsan: gana el último valor y se conserva la primera
    /// posición.
    pub fn set_steps<I>(&mut self, steps: I)
        where I: IntoIterator<Item = (String, Box<dyn Step>)>
    {
        let mut staged: IndexMap<String, Box<dyn Step>> = IndexMap::new();
        for (name, step) in steps {
            staged.insert(name, step);
        }
        self.steps = staged.into_iter()
                           .map(|(name, mut step)| {
                               step.set_name(&name);
                               (name, Arc::from(step))
                           })
                           .collect();
    }

    /// Pasos en orden de recorrido.
    pub fn ordered_steps(&self) -> Vec<Arc<dyn Step>> {
        self.steps.values().cloned().collect()
    }

    /// Añade un paso al final. Falla si el nombre ya existe.
    pub fn add_step(&mut self, name: &str, mut step: Box<dyn Step>) -> Result<()> {
        if self.steps.contains_key(name) {
            return Err(WizardError::DuplicateStep(name.to_string()));
        }
        step.set_name(name);
        self.steps.insert(name.to_string(), Arc::from(step));
        Ok(())
    }

    pub fn remove_step(&mut self, name: &str) -> Result<()> {
        self.steps
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| WizardError::StepNotFound(name.to_string()))
    }

    pub fn has_step(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.steps.get_index_of(name)
    }

    pub fn step_by_name(&self, name: &str) -> Result<&Arc<dyn Step>> {
        self.steps
            .get(name)
            .ok_or_else(|| WizardError::StepNotFound(name.to_string()))
    }

    pub fn step_by_index(&self, index: usize) -> Result<&Arc<dyn Step>> {
        self.steps
            .get_index(index)
            .map(|(_, step)| step)
            .ok_or_else(|| WizardError::StepNotFound(format!("índice {}", index)))
    }

    pub fn first_step(&self) -> Result<&Arc<dyn Step>> {
        self.steps.first().map(|(_, step)| step).ok_or(WizardError::EmptyProcess)
    }

    pub fn last_step(&self) -> Result<&Arc<dyn Step>> {
        self.steps.last().map(|(_, step)| step).ok_or(WizardError::EmptyProcess)
    }

    pub fn count_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn display_route(&self) -> Option<&str> {
        self.display_route.as_deref()
    }

    pub fn set_display_route(&mut self, route: impl Into<String>) {
        self.display_route = Some(route.into());
    }

    pub fn forward_route(&self) -> Option<&str> {
        self.forward_route.as_deref()
    }

    pub fn set_forward_route(&mut self, route: impl Into<String>) {
        self.forward_route = Some(route.into());
    }

    /// Destino de salida al completar el último paso.
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn set_redirect(&mut self, redirect: impl Into<String>) {
        self.redirect = Some(redirect.into());
    }

    pub fn redirect_params(&self) -> &RouteParams {
        &self.redirect_params
    }

    pub fn set_redirect_params(&mut self, params: RouteParams) {
        self.redirect_params = params;
    }

    pub fn validator(&self) -> Option<&ProcessValidator> {
        self.validator.as_ref()
    }

    pub fn set_validator(&mut self, validator: ProcessValidator) {
        self.validator = Some(validator);
    }
}
