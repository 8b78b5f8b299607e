//! Crate `wizard-session`: almacenamiento de procesos en sesión
//!
//! Implementa el contrato `wizard::Storage` sobre una bolsa de sesión por
//! usuario (`SessionFlowsBag`), con un registro de sesiones
//! (`SessionRegistry`) que las crea, las entrega y purga las inactivas.
//!
//! ```rust
//! use wizard::Storage;
//! use wizard_session::{SessionConfig, SessionRegistry};
//!
//! let registry = SessionRegistry::new(SessionConfig::default());
//! let id = registry.open_session();
//! let mut storage = registry.storage_for(id).unwrap();
//! storage.initialize("checkout");
//! storage.set("history", serde_json::json!(["a"])).unwrap();
//! assert!(storage.has("history").unwrap());
//! ```
pub mod bag;
pub mod config;
pub mod errors;
pub mod registry;
pub mod storage;

pub use bag::*;
pub use config::*;
pub use errors::*;
pub use registry::*;
pub use storage::*;
