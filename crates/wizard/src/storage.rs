// Archivo: storage.rs
// Propósito: definir el contrato de almacenamiento clave/valor con dominio
// (`Storage`) que usan el contexto y el coordinador. Describe lo que deben
// implementar los backends (sesión, memoria, etc.). Las claves quedan
// implícitamente dentro del dominio activo.
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};

use crate::errors::Result;

/// Deriva el dominio de almacenamiento de un alias de escenario. Función pura
/// y estable entre ejecuciones (hex de SHA-256).
pub fn domain_for(scenario_alias: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(scenario_alias.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Función de lectura-modificación-escritura usada por `Storage::update`.
/// Recibe el valor actual (si existe) y devuelve el nuevo (`None` = borrar).
pub type UpdateFn<'a> = dyn FnMut(Option<JsonValue>) -> Result<Option<JsonValue>> + 'a;

/// Contrato mínimo del almacenamiento con dominio.
///
/// Todas las operaciones de datos actúan sobre el dominio fijado con
/// `initialize`; antes de eso deben fallar con `WizardError::Storage`.
/// `clear` elimina el espacio de nombres completo del dominio.
pub trait Storage: Send {
    /// Fija el dominio activo.
    fn initialize(&mut self, domain: &str);

    /// Dominio activo, si ya se inicializó.
    fn domain(&self) -> Option<&str>;

    fn get(&self, key: &str) -> Result<Option<JsonValue>>;

    fn has(&self, key: &str) -> Result<bool>;

    fn set(&mut self, key: &str, value: JsonValue) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;

    /// Borra todo el dominio activo.
    fn clear(&mut self) -> Result<()>;

    /// Lectura con valor por defecto.
    fn get_or(&self, key: &str, default: JsonValue) -> Result<JsonValue> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Lectura-modificación-escritura. La implementación por defecto no es
    /// atómica; los backends compartidos entre peticiones deben
    /// sobreescribirla. Si `f` falla no se escribe nada.
    fn update(&mut self, key: &str, f: &mut UpdateFn<'_>) -> Result<()> {
        let current = self.get(key)?;
        match f(current)? {
            Some(value) => self.set(key, value),
            None => self.remove(key),
        }
    }
}
