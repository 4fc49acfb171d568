// Adapters layer: concrete implementations for external systems.
// Registrant sources feed the extract step, export renders the load step's files.

pub mod export;
pub mod registrants;

pub use registrants::RegistrantSource;
