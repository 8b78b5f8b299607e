use std::any::Any;
use std::sync::Arc;

/// Servicios compartidos que el builder inyecta en pasos `ServiceAware`.
///
/// Envuelve un valor de la aplicación (típicamente una struct con clientes y
/// repositorios). El paso lo recupera con su tipo concreto mediante `get`;
/// no es un localizador genérico de servicios.
#[derive(Clone)]
pub struct Services {
    inner: Arc<dyn Any + Send + Sync>,
}

impl Services {
    pub fn new<T: Any + Send + Sync>(services: T) -> Self {
        Self { inner: Arc::new(services) }
    }

    /// Acceso tipado. `None` si el tipo no coincide con el registrado.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Indica si dos handles apuntan al mismo valor.
    pub fn same_as(&self, other: &Services) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Services { .. }")
    }
}

/// Capacidad de un paso para recibir servicios externos.
pub trait ServiceAware {
    fn set_services(&mut self, services: Services);
}
