//! Clientes Mondial Relay
//!
//! Dos protocolos: la API REST v2 (expediciones, etiquetas, búsqueda) y
//! el Web Service SOAP legado (solo búsqueda de puntos relais). Ambos
//! implementan los mismos traits para poder intercambiarlos.

pub mod rest_client;
pub mod soap_client;

use async_trait::async_trait;

use crate::dto::{
    LabelResponse, RelayPoint, RelayPointCollection, RelayPointSearchCriteria, ShipmentRequest,
    ShipmentResponse,
};
use crate::utils::errors::MondialRelayError;

pub use rest_client::MondialRelayRestClient;
pub use soap_client::MondialRelaySoapClient;

/// Búsqueda de puntos relais, implementada por ambos protocolos
#[async_trait]
pub trait RelayPointSearch: Send + Sync {
    /// Buscar puntos relais según los criterios dados
    async fn find_relay_points(
        &self,
        criteria: &RelayPointSearchCriteria,
    ) -> Result<RelayPointCollection, MondialRelayError>;

    /// Recuperar un punto relais por identificador
    ///
    /// Devuelve `Ok(None)` si el punto no existe.
    async fn get_relay_point(
        &self,
        relay_point_id: &str,
        country_code: &str,
    ) -> Result<Option<RelayPoint>, MondialRelayError>;
}

/// Operaciones de expedición, solo disponibles en la API REST
#[async_trait]
pub trait ShipmentApi: Send + Sync {
    /// Crear una expedición hacia un punto relais
    async fn create_shipment(
        &self,
        request: &ShipmentRequest,
    ) -> Result<ShipmentResponse, MondialRelayError>;

    /// Descargar la etiqueta de una expedición existente
    async fn get_label(
        &self,
        expedition_number: &str,
    ) -> Result<LabelResponse, MondialRelayError>;
}
