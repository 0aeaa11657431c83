//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y firma de peticiones.

pub mod errors;
pub mod signature;
pub mod validation;
