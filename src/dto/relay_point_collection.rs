//! Colección de puntos relais
//!
//! Secuencia ordenada de puntos relais más el total comunicado por el
//! servidor (`total_count` puede superar la longitud local: sirve de
//! contexto de paginación y los filtros locales no lo alteran).

use serde::Deserialize;
use serde_json::Value;

use super::relay_point_dto::{ApiRelayPoint, RelayPoint};
use crate::utils::errors::MondialRelayError;

/// Colección de puntos relais devuelta por una búsqueda
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelayPointCollection {
    relay_points: Vec<RelayPoint>,
    /// Total de resultados en el servidor (contexto de paginación)
    pub total_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSearchResponse {
    #[serde(default)]
    relay_points: Vec<ApiRelayPoint>,
    #[serde(default)]
    total_count: Option<usize>,
}

impl RelayPointCollection {
    pub fn new(relay_points: Vec<RelayPoint>, total_count: usize) -> Self {
        Self {
            relay_points,
            total_count,
        }
    }

    /// Colección vacía
    pub fn empty() -> Self {
        Self::default()
    }

    /// Construir una colección desde la respuesta JSON de la búsqueda REST
    pub fn from_api_response(data: Value) -> Result<Self, MondialRelayError> {
        let api: ApiSearchResponse = serde_json::from_value(data).map_err(|e| {
            MondialRelayError::api_with_message(99, format!("Réponse API invalide: {}", e))
                .caused_by(e)
        })?;

        let relay_points: Vec<RelayPoint> = api.relay_points.into_iter().map(Into::into).collect();
        let total_count = api.total_count.unwrap_or(relay_points.len());

        Ok(Self {
            relay_points,
            total_count,
        })
    }

    pub fn len(&self) -> usize {
        self.relay_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relay_points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RelayPoint> {
        self.relay_points.iter()
    }

    /// Todos los puntos como slice
    pub fn all(&self) -> &[RelayPoint] {
        &self.relay_points
    }

    /// Primer punto de la colección
    pub fn first(&self) -> Option<&RelayPoint> {
        self.relay_points.first()
    }

    /// Punto por índice
    pub fn get(&self, index: usize) -> Option<&RelayPoint> {
        self.relay_points.get(index)
    }

    /// Buscar un punto por su identificador Mondial Relay
    pub fn find_by_id(&self, relay_point_id: &str) -> Option<&RelayPoint> {
        self.relay_points
            .iter()
            .find(|rp| rp.relay_point_id == relay_point_id)
    }

    /// Filtrar con un predicado, conservando el total del servidor
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&RelayPoint) -> bool,
    {
        Self {
            relay_points: self
                .relay_points
                .iter()
                .filter(|rp| predicate(rp))
                .cloned()
                .collect(),
            total_count: self.total_count,
        }
    }

    /// Filtrar por servicio disponible
    pub fn filter_by_service(&self, service: &str) -> Self {
        self.filter(|rp| rp.has_service(service))
    }

    /// Filtrar por distancia máxima en metros (excluye puntos sin distancia)
    pub fn filter_by_max_distance(&self, max_distance_meters: u32) -> Self {
        self.filter(|rp| {
            rp.distance_meters
                .is_some_and(|d| d <= max_distance_meters)
        })
    }

    /// Filtrar los puntos activos
    pub fn filter_active(&self) -> Self {
        self.filter(|rp| rp.is_active)
    }

    /// Mapear los puntos a otro tipo
    pub fn map<T, F>(&self, f: F) -> Vec<T>
    where
        F: Fn(&RelayPoint) -> T,
    {
        self.relay_points.iter().map(f).collect()
    }

    /// Representación JSON de toda la colección
    pub fn to_api_payload(&self) -> Value {
        Value::Array(self.map(|rp| rp.to_api_payload()))
    }
}

impl IntoIterator for RelayPointCollection {
    type Item = RelayPoint;
    type IntoIter = std::vec::IntoIter<RelayPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.relay_points.into_iter()
    }
}

impl<'a> IntoIterator for &'a RelayPointCollection {
    type Item = &'a RelayPoint;
    type IntoIter = std::slice::Iter<'a, RelayPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.relay_points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point(id: &str, distance: Option<u32>, active: bool, services: &[&str]) -> RelayPoint {
        RelayPoint {
            relay_point_id: id.to_string(),
            name: format!("POINT {}", id),
            street: "1 Rue Test".to_string(),
            postal_code: "75001".to_string(),
            city: "Paris".to_string(),
            country_code: "FR".to_string(),
            latitude: 48.85,
            longitude: 2.35,
            distance_meters: distance,
            opening_hours: Default::default(),
            services: services.iter().map(|s| s.to_string()).collect(),
            photo_url: None,
            informations: None,
            is_active: active,
            exceptional_closures: vec![],
        }
    }

    fn sample_collection() -> RelayPointCollection {
        RelayPointCollection::new(
            vec![
                point("A", Some(100), true, &["parking"]),
                point("B", Some(800), true, &[]),
                point("C", None, false, &["parking"]),
            ],
            25,
        )
    }

    #[test]
    fn test_basic_accessors() {
        let collection = sample_collection();
        assert_eq!(collection.len(), 3);
        assert!(!collection.is_empty());
        assert_eq!(collection.first().unwrap().relay_point_id, "A");
        assert_eq!(collection.get(1).unwrap().relay_point_id, "B");
        assert!(collection.get(9).is_none());
        assert_eq!(collection.find_by_id("C").unwrap().relay_point_id, "C");
        assert!(collection.find_by_id("Z").is_none());
    }

    #[test]
    fn test_empty_collection() {
        let collection = RelayPointCollection::empty();
        assert!(collection.is_empty());
        assert_eq!(collection.total_count, 0);
        assert!(collection.first().is_none());
    }

    #[test]
    fn test_filter_by_max_distance_preserves_total_count() {
        let collection = sample_collection();
        let filtered = collection.filter_by_max_distance(500);
        // Solo entra el punto con distancia conocida <= 500; los puntos sin
        // distancia quedan excluidos y el total del servidor no cambia
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().relay_point_id, "A");
        assert_eq!(filtered.total_count, 25);
    }

    #[test]
    fn test_filter_active() {
        let filtered = sample_collection().filter_active();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.find_by_id("C").is_none());
        assert_eq!(filtered.total_count, 25);
    }

    #[test]
    fn test_filter_by_service() {
        let filtered = sample_collection().filter_by_service("parking");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.total_count, 25);
    }

    #[test]
    fn test_from_api_response() {
        let data = json!({
            "relayPoints": [
                {
                    "id": "111",
                    "name": "POINT A",
                    "address": {"street": "Rue A", "postalCode": "75001", "city": "Paris", "countryCode": "FR"},
                    "coordinates": {"latitude": 48.85, "longitude": 2.35},
                    "distance": 120
                }
            ],
            "totalCount": 40
        });
        let collection = RelayPointCollection::from_api_response(data).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.total_count, 40);
    }

    #[test]
    fn test_from_api_response_defaults_total_to_len() {
        let data = json!({
            "relayPoints": [
                {
                    "id": "111",
                    "name": "POINT A",
                    "address": {"street": "Rue A", "postalCode": "75001", "city": "Paris", "countryCode": "FR"},
                    "coordinates": {"latitude": 48.85, "longitude": 2.35}
                }
            ]
        });
        let collection = RelayPointCollection::from_api_response(data).unwrap();
        assert_eq!(collection.total_count, 1);
    }

    #[test]
    fn test_iteration() {
        let collection = sample_collection();
        let ids: Vec<&str> = collection.iter().map(|rp| rp.relay_point_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }
}
