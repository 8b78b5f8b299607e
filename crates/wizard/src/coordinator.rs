// Archivo: coordinator.rs
// Propósito: orquestador de alto nivel. Expone `start`, `display` y
// `forward`; en cada llamada construye el proceso del escenario, enlaza el
// contexto al paso pedido, valida la posición y decide la navegación.
//
// Cada llamada es independiente: lo único que sobrevive entre peticiones es
// lo que el contexto guarda en el almacenamiento (el historial).
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::builder::ProcessBuilder;
use crate::config::WizardConfig;
use crate::context::ProcessContext;
use crate::errors::{Result, WizardError};
use crate::process::Process;
use crate::response::Response;
use crate::routing::{RouteParams, RouteResolver};
use crate::scenario::ProcessScenario;
use crate::step::{ActionResult, Step, StepOutcome};

pub const SCENARIO_ALIAS_PARAM: &str = "scenarioAlias";
pub const STEP_NAME_PARAM: &str = "stepName";

pub struct Coordinator {
    router: Arc<dyn RouteResolver>,
    /// Builder base: cada llamada trabaja sobre un clon, así las plantillas
    /// registradas por el escenario no se acumulan entre peticiones.
    builder: ProcessBuilder,
    context: ProcessContext,
    scenarios: IndexMap<String, Arc<dyn ProcessScenario>>,
    config: WizardConfig,
}

impl Coordinator {
    pub fn new(router: Arc<dyn RouteResolver>,
               builder: ProcessBuilder,
               context: ProcessContext,
               config: WizardConfig)
               -> Self {
        Self { router,
               builder,
               context,
               scenarios: IndexMap::new(),
               config }
    }

    /// Registra un escenario. Falla si el alias ya existe.
    pub fn register_scenario<S>(&mut self, alias: &str, scenario: S) -> Result<()>
        where S: ProcessScenario + 'static
    {
        if self.scenarios.contains_key(alias) {
            return Err(WizardError::ScenarioAlreadyRegistered(alias.to_string()));
        }
        self.scenarios.insert(alias.to_string(), Arc::new(scenario));
        debug!("escenario registrado: {}", alias);
        Ok(())
    }

    pub fn has_scenario(&self, alias: &str) -> bool {
        self.scenarios.contains_key(alias)
    }

    /// Inicia el proceso: registra el primer paso en el historial y redirige
    /// a su ruta de mostrar con `params`.
    ///
    /// Si el escenario ya tenía una instancia en curso se cierra antes, así
    /// cada inicio parte de un historial limpio.
    pub fn start(&mut self, alias: &str, params: &RouteParams) -> Result<Response> {
        let process = self.build_process(alias)?;
        let step = process.first_step()?.clone();
        self.context.initialize(process.clone(), step.clone());

        if let Some(validator) = process.validator() {
            if !validator.is_valid() {
                warn!("inicio rechazado por el validador: escenario={}", alias);
                match validator.signal_invalid(step.as_ref())? {}
            }
        }

        let target = self.step_target(&process, step.as_ref(), params)?;
        if !self.context.step_history()?.is_empty() {
            debug!("reinicio: se descarta la instancia anterior de {}", alias);
            self.context.close()?;
        }
        self.context.add_step_to_history(step.name())?;
        debug!("proceso iniciado: escenario={} paso={}", alias, step.name());
        Ok(Response::redirect(target))
    }

    /// Muestra el paso `step_name` tras validar la posición del usuario.
    ///
    /// Un paso inactivo no se muestra: se da por completado y se navega como
    /// en `forward`, conservando `params`.
    pub fn display(&mut self, alias: &str, step_name: &str, params: &RouteParams) -> Result<Response> {
        let (process, step) = self.bind(alias, step_name)?;
        self.ensure_valid(step.as_ref())?;
        self.sync_history(step.as_ref())?;
        if !step.is_active() {
            debug!("paso inactivo omitido: escenario={} paso={}", alias, step.name());
            return self.complete_step(&process, step.as_ref(), &ActionResult::complete(), params);
        }
        debug!("mostrar: escenario={} paso={}", alias, step.name());
        step.display_action(&mut self.context)
    }

    /// Avanza el paso `step_name` y decide la navegación.
    pub fn forward(&mut self, alias: &str, step_name: &str) -> Result<Response> {
        let (process, step) = self.bind(alias, step_name)?;
        self.ensure_valid(step.as_ref())?;
        self.sync_history(step.as_ref())?;

        match step.forward_action(&mut self.context)? {
            StepOutcome::Response(response) => {
                debug!("avance resuelto por el paso: escenario={} paso={}", alias, step.name());
                Ok(response)
            }
            StepOutcome::Action(result) => {
                self.complete_step(&process, step.as_ref(), &result, &RouteParams::new())
            }
            StepOutcome::Unrecognized(value) => {
                warn!("resultado de avance inesperado en {}: {}", step.name(), value);
                Err(WizardError::UnexpectedAdvanceResult(format!("paso \"{}\" devolvió {}", step.name(), value)))
            }
        }
    }

    /// Destino de la ruta de avance para `step_name` (lo que un formulario
    /// usaría como acción).
    pub fn forward_target(&self, alias: &str, step_name: &str) -> Result<String> {
        let process = self.build_process(alias)?;
        let step = process.step_by_name(step_name)?;
        let route = process.forward_route().unwrap_or(&self.config.forward_route);
        self.router.generate(route, &step_params(&process, step.as_ref(), &RouteParams::new()))
    }

    pub fn context(&self) -> &ProcessContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ProcessContext {
        &mut self.context
    }

    /// Builder base, para registrar plantillas compartidas por todos los
    /// escenarios.
    pub fn builder_mut(&mut self) -> &mut ProcessBuilder {
        &mut self.builder
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    fn build_process(&self, alias: &str) -> Result<Arc<Process>> {
        let scenario = self.scenarios
                           .get(alias)
                           .cloned()
                           .ok_or_else(|| WizardError::ScenarioNotRegistered(alias.to_string()))?;
        let mut builder = self.builder.clone();
        let mut process = builder.build(scenario.as_ref())?;
        process.set_scenario_alias(alias);
        Ok(Arc::new(process))
    }

    fn bind(&mut self, alias: &str, step_name: &str) -> Result<(Arc<Process>, Arc<dyn Step>)> {
        let process = self.build_process(alias)?;
        let step = process.step_by_name(step_name)?.clone();
        self.context.initialize(process.clone(), step.clone());
        Ok((process, step))
    }

    /// El validador del proceso tiene prioridad; si no hay validador que
    /// rechace, una posición inválida es un historial que no contiene el
    /// paso.
    fn ensure_valid(&self, step: &dyn Step) -> Result<()> {
        if self.context.is_valid()? {
            return Ok(());
        }
        let process = self.context.process()?;
        if let Some(validator) = process.validator() {
            if !validator.is_valid() {
                warn!("validación fallida: escenario={} paso={}", process.scenario_alias(), step.name());
                match validator.signal_invalid(step)? {}
            }
        }
        warn!("paso fuera del historial: escenario={} paso={}", process.scenario_alias(), step.name());
        Err(WizardError::HistoryIntegrity(step.name().to_string()))
    }

    /// Primera visita: se registra el paso. Si no, se descarta el historial
    /// posterior al paso actual (el usuario volvió atrás).
    fn sync_history(&mut self, step: &dyn Step) -> Result<()> {
        if self.context.step_history()?.is_empty() {
            self.context.add_step_to_history(step.name())
        } else {
            self.context.rewind_history()
        }
    }

    fn complete_step(&mut self,
                     process: &Process,
                     step: &dyn Step,
                     result: &ActionResult,
                     params: &RouteParams)
                     -> Result<Response> {
        if self.context.is_last_step()? {
            let redirect = process.redirect()
                                  .ok_or_else(|| WizardError::RedirectNotConfigured(process.scenario_alias().to_string()))?;
            let target = self.router.generate(redirect, process.redirect_params())?;
            self.context.close()?;
            debug!("proceso completado: escenario={} destino={}", process.scenario_alias(), target);
            return Ok(Response::redirect(target));
        }

        if let Some(name) = result.next_step_name() {
            self.context.set_next_step_by_name(name)?;
        }
        let next = self.context
                       .next_step()?
                       .cloned()
                       .ok_or_else(|| WizardError::StepNotFound(format!("siguiente de {}", step.name())))?;
        let target = self.step_target(process, next.as_ref(), params)?;
        self.context.add_step_to_history(next.name())?;
        debug!("paso completado: escenario={} {} -> {}", process.scenario_alias(), step.name(), next.name());
        Ok(Response::redirect(target))
    }

    /// Destino de la ruta de mostrar de `step`. Se resuelve antes de tocar el
    /// almacenamiento: si el router falla, el historial queda intacto.
    fn step_target(&self, process: &Process, step: &dyn Step, params: &RouteParams) -> Result<String> {
        let route = process.display_route().unwrap_or(&self.config.display_route);
        self.router.generate(route, &step_params(process, step, params))
    }
}

/// `scenarioAlias` y `stepName` siempre presentes; los parámetros del
/// llamante se añaden detrás sin poder sobreescribirlos.
fn step_params(process: &Process, step: &dyn Step, extra: &RouteParams) -> RouteParams {
    let mut params = RouteParams::new();
    params.insert(SCENARIO_ALIAS_PARAM.to_string(), process.scenario_alias().to_string());
    params.insert(STEP_NAME_PARAM.to_string(), step.name().to_string());
    for (key, value) in extra {
        params.entry(key.clone()).or_insert_with(|| value.clone());
    }
    params
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
         .field("scenarios", &self.scenarios.keys().collect::<Vec<_>>())
         .field("config", &self.config)
         .field("context", &self.context)
         .finish_non_exhaustive()
    }
}
