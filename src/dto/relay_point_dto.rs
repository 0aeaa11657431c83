//! DTO de punto relais
//!
//! Representación normalizada de un punto relais Mondial Relay,
//! independiente del protocolo (SOAP o REST) que la produjo.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::utils::errors::MondialRelayError;

/// Franja horaria de apertura (horas "HH:MM")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub open: String,
    pub close: String,
}

/// Cierre excepcional comunicado por la API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionalClosure {
    pub date: String,
    pub reason: String,
}

/// Horarios de apertura por día (claves en inglés en minúsculas)
pub type OpeningHours = BTreeMap<String, Vec<TimeSlot>>;

/// Punto relais Mondial Relay
#[derive(Debug, Clone, PartialEq)]
pub struct RelayPoint {
    /// Identificador único Mondial Relay
    pub relay_point_id: String,
    /// Nombre del punto (p. ej. "TABAC LE CENTRAL")
    pub name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    /// Código de país ISO 3166-1 alpha-2
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Distancia al origen de la búsqueda en metros
    pub distance_meters: Option<u32>,
    pub opening_hours: OpeningHours,
    /// Servicios disponibles (p. ej. "parking", "wheelchair_accessible")
    pub services: Vec<String>,
    pub photo_url: Option<String>,
    pub informations: Option<String>,
    pub is_active: bool,
    pub exceptional_closures: Vec<ExceptionalClosure>,
}

/// Forma de un punto relais en la API REST v2
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiRelayPoint {
    id: Value,
    name: String,
    address: ApiAddress,
    coordinates: ApiCoordinates,
    #[serde(default)]
    distance: Option<u32>,
    #[serde(default)]
    opening_hours: OpeningHours,
    #[serde(default)]
    services: Vec<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    informations: Option<String>,
    #[serde(default = "default_is_active")]
    is_active: bool,
    #[serde(default)]
    exceptional_closures: Vec<ExceptionalClosure>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAddress {
    street: String,
    postal_code: String,
    city: String,
    country_code: String,
}

#[derive(Debug, Deserialize)]
struct ApiCoordinates {
    latitude: f64,
    longitude: f64,
}

fn default_is_active() -> bool {
    true
}

impl From<ApiRelayPoint> for RelayPoint {
    fn from(api: ApiRelayPoint) -> Self {
        // El id puede llegar como string o como número según el endpoint
        let relay_point_id = match api.id {
            Value::String(s) => s,
            other => other.to_string(),
        };

        Self {
            relay_point_id,
            name: api.name,
            street: api.address.street,
            postal_code: api.address.postal_code,
            city: api.address.city,
            country_code: api.address.country_code,
            latitude: api.coordinates.latitude,
            longitude: api.coordinates.longitude,
            distance_meters: api.distance,
            opening_hours: api.opening_hours,
            services: api.services,
            photo_url: api.photo_url,
            informations: api.informations,
            is_active: api.is_active,
            exceptional_closures: api.exceptional_closures,
        }
    }
}

impl RelayPoint {
    /// Construir un punto relais desde un payload JSON de la API REST
    pub fn from_api_response(data: Value) -> Result<Self, MondialRelayError> {
        let api: ApiRelayPoint = serde_json::from_value(data).map_err(|e| {
            MondialRelayError::api_with_message(99, format!("Réponse API invalide: {}", e))
                .caused_by(e)
        })?;
        Ok(api.into())
    }

    /// Dirección completa en una sola línea
    pub fn full_address(&self) -> String {
        format!(
            "{}, {} {}, {}",
            self.street, self.postal_code, self.city, self.country_code
        )
    }

    /// Distancia en kilómetros redondeada a 2 decimales
    pub fn distance_km(&self) -> Option<f64> {
        self.distance_meters
            .map(|meters| (meters as f64 / 1000.0 * 100.0).round() / 100.0)
    }

    /// URL de Google Maps para el punto
    pub fn google_maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            self.latitude, self.longitude
        )
    }

    /// El punto ofrece un servicio concreto
    pub fn has_service(&self, service: &str) -> bool {
        self.services.iter().any(|s| s == service)
    }

    /// Franjas de apertura de un día ("monday", "tuesday", ...)
    pub fn opening_hours_for_day(&self, day: &str) -> &[TimeSlot] {
        self.opening_hours.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// El punto abre ese día
    pub fn is_open_on_day(&self, day: &str) -> bool {
        !self.opening_hours_for_day(day).is_empty()
    }

    /// Representación JSON del punto (formato de salida hacia los consumidores)
    pub fn to_api_payload(&self) -> Value {
        json!({
            "relayPointId": self.relay_point_id,
            "name": self.name,
            "address": {
                "street": self.street,
                "postalCode": self.postal_code,
                "city": self.city,
                "countryCode": self.country_code,
            },
            "coordinates": {
                "latitude": self.latitude,
                "longitude": self.longitude,
            },
            "distanceMeters": self.distance_meters,
            "distanceKm": self.distance_km(),
            "openingHours": self.opening_hours,
            "services": self.services,
            "photoUrl": self.photo_url,
            "informations": self.informations,
            "isActive": self.is_active,
            "exceptionalClosures": self.exceptional_closures,
            "googleMapsUrl": self.google_maps_url(),
        })
    }
}
