//! Criterios de búsqueda de puntos relais
//!
//! Value object inmutable con los parámetros de una búsqueda de puntos
//! relais. La construcción valida en caliente; las derivaciones `with_*`
//! devuelven instancias nuevas sin mutar la original.

use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::utils::errors::MondialRelayError;
use crate::utils::validation;

/// Radio de búsqueda por defecto en kilómetros
pub const DEFAULT_RADIUS_KM: u32 = 20;
/// Número de resultados por defecto
pub const DEFAULT_LIMIT: u32 = 20;
/// Número máximo de resultados admitido por la API
pub const MAX_LIMIT: u32 = 50;

/// Criterios de búsqueda de puntos relais
///
/// Se necesita al menos un ancla de búsqueda: código postal (con ciudad
/// opcional) o coordenadas GPS. Cuando hay ambos, las coordenadas tienen
/// prioridad al construir la petición.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayPointSearchCriteria {
    postal_code: Option<String>,
    city: Option<String>,
    country_code: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius: u32,
    limit: u32,
    delivery_mode: Option<String>,
    weight: Option<u32>,
}

impl RelayPointSearchCriteria {
    /// Crear criterios a partir de un código postal
    pub fn from_postal_code(
        postal_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Result<Self, MondialRelayError> {
        let criteria = Self {
            postal_code: Some(postal_code.into()),
            city: None,
            country_code: country_code.into(),
            latitude: None,
            longitude: None,
            radius: DEFAULT_RADIUS_KM,
            limit: DEFAULT_LIMIT,
            delivery_mode: None,
            weight: None,
        };
        criteria.validate()?;
        Ok(criteria)
    }

    /// Crear criterios a partir de coordenadas GPS
    pub fn from_coordinates(
        latitude: f64,
        longitude: f64,
        country_code: impl Into<String>,
    ) -> Result<Self, MondialRelayError> {
        let criteria = Self {
            postal_code: None,
            city: None,
            country_code: country_code.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            radius: DEFAULT_RADIUS_KM,
            limit: DEFAULT_LIMIT,
            delivery_mode: None,
            weight: None,
        };
        criteria.validate()?;
        Ok(criteria)
    }

    /// Derivar criterios con una ciudad (afina las búsquedas por código postal)
    pub fn with_city(mut self, city: impl Into<String>) -> Result<Self, MondialRelayError> {
        self.city = Some(city.into());
        self.validate()?;
        Ok(self)
    }

    /// Derivar criterios con otro radio de búsqueda en km
    pub fn with_radius(mut self, radius: u32) -> Result<Self, MondialRelayError> {
        self.radius = radius;
        self.validate()?;
        Ok(self)
    }

    /// Derivar criterios con otro límite de resultados (recortado al máximo de la API)
    pub fn with_limit(mut self, limit: u32) -> Result<Self, MondialRelayError> {
        self.limit = limit.min(MAX_LIMIT);
        self.validate()?;
        Ok(self)
    }

    /// Derivar criterios con un modo de entrega (p. ej. "24R", "DRI")
    pub fn with_delivery_mode(
        mut self,
        delivery_mode: Option<String>,
    ) -> Result<Self, MondialRelayError> {
        self.delivery_mode = delivery_mode;
        self.validate()?;
        Ok(self)
    }

    /// Derivar criterios con un peso de paquete en gramos
    pub fn with_weight(mut self, weight: Option<u32>) -> Result<Self, MondialRelayError> {
        self.weight = weight;
        self.validate()?;
        Ok(self)
    }

    /// Hay coordenadas GPS en los criterios
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Hay código postal en los criterios
    pub fn has_postal_code(&self) -> bool {
        self.postal_code.as_deref().is_some_and(|cp| !cp.is_empty())
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn delivery_mode(&self) -> Option<&str> {
        self.delivery_mode.as_deref()
    }

    pub fn weight(&self) -> Option<u32> {
        self.weight
    }

    fn validate(&self) -> Result<(), MondialRelayError> {
        let mut errors = ValidationErrors::new();

        if !self.has_coordinates() && !self.has_postal_code() {
            let mut error = ValidationError::new("search_anchor_required");
            error.message =
                Some("Either postal code or GPS coordinates must be provided for relay point search.".into());
            errors.add("postal_code", error);
        }

        if let Some(latitude) = self.latitude {
            if let Err(error) = validation::validate_latitude(latitude) {
                errors.add("latitude", error);
            }
        }

        if let Some(longitude) = self.longitude {
            if let Err(error) = validation::validate_longitude(longitude) {
                errors.add("longitude", error);
            }
        }

        if let Err(error) = validation::validate_range(self.radius, 1, 100) {
            errors.add("radius", error);
        }

        if let Err(error) = validation::validate_range(self.limit, 1, MAX_LIMIT) {
            errors.add("limit", error);
        }

        if let Some(weight) = self.weight {
            if weight == 0 {
                errors.add("weight", ValidationError::new("positive_weight"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(MondialRelayError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_search_anchor() {
        // Sin código postal ni coordenadas la construcción falla
        let result = RelayPointSearchCriteria::from_postal_code("", "FR");
        assert!(matches!(result, Err(MondialRelayError::Validation(_))));
    }

    #[test]
    fn test_from_postal_code_defaults() {
        let criteria = RelayPointSearchCriteria::from_postal_code("75001", "FR").unwrap();
        assert!(criteria.has_postal_code());
        assert!(!criteria.has_coordinates());
        assert_eq!(criteria.radius(), DEFAULT_RADIUS_KM);
        assert_eq!(criteria.limit(), DEFAULT_LIMIT);
        assert_eq!(criteria.country_code(), "FR");
    }

    #[test]
    fn test_from_coordinates() {
        let criteria = RelayPointSearchCriteria::from_coordinates(48.8566, 2.3522, "FR").unwrap();
        assert!(criteria.has_coordinates());
        assert_eq!(criteria.latitude(), Some(48.8566));
        assert_eq!(criteria.longitude(), Some(2.3522));
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(RelayPointSearchCriteria::from_coordinates(90.1, 0.0, "FR").is_err());
        assert!(RelayPointSearchCriteria::from_coordinates(-90.1, 0.0, "FR").is_err());
        assert!(RelayPointSearchCriteria::from_coordinates(0.0, 180.1, "FR").is_err());
        assert!(RelayPointSearchCriteria::from_coordinates(0.0, -180.1, "FR").is_err());
        // Los límites exactos son válidos
        assert!(RelayPointSearchCriteria::from_coordinates(90.0, 180.0, "FR").is_ok());
        assert!(RelayPointSearchCriteria::from_coordinates(-90.0, -180.0, "FR").is_ok());
    }

    #[test]
    fn test_radius_bounds() {
        let criteria = RelayPointSearchCriteria::from_postal_code("75001", "FR").unwrap();
        assert!(criteria.clone().with_radius(0).is_err());
        assert!(criteria.clone().with_radius(101).is_err());
        assert!(criteria.clone().with_radius(1).is_ok());
        assert!(criteria.with_radius(100).is_ok());
    }

    #[test]
    fn test_limit_is_clamped_to_max() {
        let criteria = RelayPointSearchCriteria::from_postal_code("75001", "FR")
            .unwrap()
            .with_limit(120)
            .unwrap();
        assert_eq!(criteria.limit(), MAX_LIMIT);
    }

    #[test]
    fn test_limit_zero_fails() {
        let criteria = RelayPointSearchCriteria::from_postal_code("75001", "FR").unwrap();
        assert!(criteria.with_limit(0).is_err());
    }

    #[test]
    fn test_weight_must_be_positive() {
        let criteria = RelayPointSearchCriteria::from_postal_code("75001", "FR").unwrap();
        assert!(criteria.clone().with_weight(Some(0)).is_err());
        assert!(criteria.clone().with_weight(Some(1500)).is_ok());
        assert!(criteria.with_weight(None).is_ok());
    }

    #[test]
    fn test_derivations_do_not_mutate_original() {
        let original = RelayPointSearchCriteria::from_postal_code("75001", "FR").unwrap();
        let derived = original.clone().with_radius(50).unwrap();
        assert_eq!(original.radius(), DEFAULT_RADIUS_KM);
        assert_eq!(derived.radius(), 50);
        assert_eq!(derived.postal_code(), Some("75001"));
    }

    #[test]
    fn test_with_delivery_mode() {
        let criteria = RelayPointSearchCriteria::from_postal_code("75001", "FR")
            .unwrap()
            .with_delivery_mode(Some("24R".to_string()))
            .unwrap();
        assert_eq!(criteria.delivery_mode(), Some("24R"));
    }
}
