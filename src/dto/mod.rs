//! DTOs del cliente Mondial Relay
//!
//! Criterios de búsqueda, puntos relais normalizados, expediciones y
//! etiquetas. Los structs "Api*" internos modelan el formato de cable
//! de la API, los tipos públicos exponen el modelo de dominio.

pub mod label_dto;
pub mod relay_point_collection;
pub mod relay_point_dto;
pub mod search_criteria;
pub mod shipment_dto;

pub use label_dto::LabelResponse;
pub use relay_point_collection::RelayPointCollection;
pub use relay_point_dto::{ExceptionalClosure, OpeningHours, RelayPoint, TimeSlot};
pub use search_criteria::{RelayPointSearchCriteria, DEFAULT_LIMIT, DEFAULT_RADIUS_KM, MAX_LIMIT};
pub use shipment_dto::{Recipient, ShipmentRequest, ShipmentResponse};
