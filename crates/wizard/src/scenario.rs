// Archivo: scenario.rs
// Propósito: contrato de configuración de escenarios. Un escenario puebla el
// proceso a través del builder en cada invocación.
use crate::builder::ProcessBuilder;
use crate::errors::Result;

pub trait ProcessScenario: Send + Sync {
    fn build(&self, builder: &mut ProcessBuilder) -> Result<()>;
}

/// Cualquier closure con la misma forma sirve como escenario.
impl<F> ProcessScenario for F where F: Fn(&mut ProcessBuilder) -> Result<()> + Send + Sync
{
    fn build(&self, builder: &mut ProcessBuilder) -> Result<()> {
        self(builder)
    }
}
