//! Cliente Rust para las APIs de transporte de Mondial Relay
//!
//! Cubre los dos protocolos del transportista: la API REST v2 (búsqueda
//! de puntos relais, creación de expediciones, descarga de etiquetas)
//! y el Web Service SOAP legado (solo búsqueda). Los dos clientes
//! implementan los mismos traits y devuelven los mismos DTOs
//! normalizados, de modo que el integrador puede cambiar de protocolo
//! sin tocar su código.
//!
//! ```no_run
//! use mondial_relay_api::{
//!     MondialRelayConfig, MondialRelayRestClient, RelayPointSearch,
//!     RelayPointSearchCriteria,
//! };
//!
//! # async fn demo() -> Result<(), mondial_relay_api::MondialRelayError> {
//! let config = MondialRelayConfig::new("api-key", "api-secret", "BDTEST13", "PrivateK");
//! let client = MondialRelayRestClient::new(config)?;
//!
//! let criteria = RelayPointSearchCriteria::from_postal_code("75011", "FR")?;
//! let relay_points = client.find_relay_points(&criteria).await?;
//! for point in &relay_points {
//!     println!("{} - {}", point.relay_point_id, point.full_address());
//! }
//! # Ok(())
//! # }
//! ```

pub mod clients;
pub mod config;
pub mod dto;
pub mod utils;

pub use clients::{
    MondialRelayRestClient, MondialRelaySoapClient, RelayPointSearch, ShipmentApi,
};
pub use config::MondialRelayConfig;
pub use dto::{
    LabelResponse, Recipient, RelayPoint, RelayPointCollection, RelayPointSearchCriteria,
    ShipmentRequest, ShipmentResponse, TimeSlot,
};
pub use utils::errors::MondialRelayError;
