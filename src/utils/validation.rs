//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validar los datos de entrada
//! de los DTOs (criterios de búsqueda, expediciones) antes de llegar a la API.

use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar longitud máxima de un string
pub fn validate_max_length(value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        let mut error = ValidationError::new("max_length");
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + serde::Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de email (básico)
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if !value.contains('@') || !value.contains('.') {
        let mut error = ValidationError::new("email");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 10 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar una latitud en grados
pub fn validate_latitude(value: f64) -> Result<(), ValidationError> {
    validate_range(value, -90.0, 90.0).map_err(|_| {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &value);
        error
    })
}

/// Validar una longitud (coordenada) en grados
pub fn validate_longitude(value: f64) -> Result<(), ValidationError> {
    validate_range(value, -180.0, 180.0).map_err(|_| {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &value);
        error
    })
}
