//! DTOs de expedición
//!
//! Request de creación de expedición (validado en caliente) y response
//! con número de expedición, URLs de seguimiento/etiqueta y QR opcional.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

use crate::utils::errors::MondialRelayError;
use crate::utils::validation;

/// Peso máximo admitido en gramos (30 kg)
pub const MAX_WEIGHT_GRAMS: u32 = 30000;
/// Dimensión máxima admitida en cm
pub const MAX_DIMENSION_CM: u32 = 150;
/// Longitud máxima de la referencia de pedido
pub const MAX_ORDER_REFERENCE_LEN: usize = 35;

/// Destinatario de la expedición
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub email: String,
    /// Teléfono en formato internacional
    pub phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub postal_code: String,
    pub city: String,
}

/// Request de creación de expedición
///
/// Se valida al construir: una instancia existente siempre representa
/// una petición aceptable para la API.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRequest {
    pub order_reference: String,
    /// Punto relais de destino
    pub relay_point_id: String,
    pub country_code: String,
    pub recipient: Recipient,
    /// Peso del paquete en gramos
    pub weight_grams: u32,
    /// Modo de entrega (p. ej. "24R", "DRI", "LD1")
    pub delivery_mode: String,
    pub length_cm: Option<u32>,
    pub width_cm: Option<u32>,
    pub height_cm: Option<u32>,
    /// Valor declarado en céntimos (seguro)
    pub declared_value: Option<u32>,
    pub instructions: Option<String>,
    /// Expedición en modo recogida (vendedor → punto relais)
    pub collection_mode: bool,
    /// Datos libres del integrador, se reenvían tal cual
    pub custom_data: HashMap<String, Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiShipmentRequest<'a> {
    order_reference: &'a str,
    relay_point: ApiShipmentRelayPoint<'a>,
    recipient: ApiShipmentRecipient<'a>,
    package: ApiShipmentPackage,
    delivery_mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    declared_value: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
    collection_mode: bool,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    custom_data: &'a HashMap<String, Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiShipmentRelayPoint<'a> {
    id: &'a str,
    country_code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiShipmentRecipient<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    address: ApiShipmentAddress<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiShipmentAddress<'a> {
    line1: &'a str,
    line2: Option<&'a str>,
    postal_code: &'a str,
    city: &'a str,
    country_code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiShipmentPackage {
    weight: u32,
    length: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

impl ShipmentRequest {
    /// Crear un request de expedición con el modo de entrega por defecto "24R"
    pub fn new(
        order_reference: impl Into<String>,
        relay_point_id: impl Into<String>,
        country_code: impl Into<String>,
        recipient: Recipient,
        weight_grams: u32,
    ) -> Result<Self, MondialRelayError> {
        let request = Self {
            order_reference: order_reference.into(),
            relay_point_id: relay_point_id.into(),
            country_code: country_code.into(),
            recipient,
            weight_grams,
            delivery_mode: "24R".to_string(),
            length_cm: None,
            width_cm: None,
            height_cm: None,
            declared_value: None,
            instructions: None,
            collection_mode: false,
            custom_data: HashMap::new(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Derivar con otro modo de entrega
    pub fn with_delivery_mode(mut self, delivery_mode: impl Into<String>) -> Self {
        self.delivery_mode = delivery_mode.into();
        self
    }

    /// Derivar con dimensiones del paquete en cm (se revalida)
    pub fn with_dimensions(
        mut self,
        length_cm: u32,
        width_cm: u32,
        height_cm: u32,
    ) -> Result<Self, MondialRelayError> {
        self.length_cm = Some(length_cm);
        self.width_cm = Some(width_cm);
        self.height_cm = Some(height_cm);
        self.validate()?;
        Ok(self)
    }

    /// Derivar con valor declarado en céntimos
    pub fn with_declared_value(mut self, declared_value: u32) -> Self {
        self.declared_value = Some(declared_value);
        self
    }

    /// Derivar con instrucciones de entrega
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Derivar en modo recogida
    pub fn with_collection_mode(mut self, collection_mode: bool) -> Self {
        self.collection_mode = collection_mode;
        self
    }

    /// Derivar con datos libres del integrador
    pub fn with_custom_data(mut self, custom_data: HashMap<String, Value>) -> Self {
        self.custom_data = custom_data;
        self
    }

    fn validate(&self) -> Result<(), MondialRelayError> {
        let mut errors = ValidationErrors::new();

        if self.weight_grams == 0 || self.weight_grams > MAX_WEIGHT_GRAMS {
            let mut error = ValidationError::new("weight");
            error.add_param("max".into(), &MAX_WEIGHT_GRAMS);
            error.add_param("actual".into(), &self.weight_grams);
            errors.add("weight_grams", error);
        }

        for (field, value) in [
            ("length_cm", self.length_cm),
            ("width_cm", self.width_cm),
            ("height_cm", self.height_cm),
        ] {
            if let Some(dimension) = value {
                if dimension == 0 || dimension > MAX_DIMENSION_CM {
                    let mut error = ValidationError::new("dimension");
                    error.add_param("max".into(), &MAX_DIMENSION_CM);
                    error.add_param("actual".into(), &dimension);
                    errors.add(field, error);
                }
            }
        }

        if let Err(error) = validation::validate_email(&self.recipient.email) {
            errors.add("recipient_email", error);
        }

        if let Err(error) = validation::validate_phone(&self.recipient.phone) {
            errors.add("recipient_phone", error);
        }

        if let Err(error) =
            validation::validate_max_length(&self.order_reference, MAX_ORDER_REFERENCE_LEN)
        {
            errors.add("order_reference", error);
        }

        if let Err(error) = validation::validate_not_empty(&self.order_reference) {
            errors.add("order_reference", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(MondialRelayError::Validation(errors))
        }
    }

    /// Cuerpo JSON de la petición de creación de expedición
    pub fn to_api_payload(&self) -> Value {
        let api = ApiShipmentRequest {
            order_reference: &self.order_reference,
            relay_point: ApiShipmentRelayPoint {
                id: &self.relay_point_id,
                country_code: &self.country_code,
            },
            recipient: ApiShipmentRecipient {
                name: &self.recipient.name,
                email: &self.recipient.email,
                phone: &self.recipient.phone,
                address: ApiShipmentAddress {
                    line1: &self.recipient.address_line1,
                    line2: self.recipient.address_line2.as_deref(),
                    postal_code: &self.recipient.postal_code,
                    city: &self.recipient.city,
                    country_code: &self.country_code,
                },
            },
            package: ApiShipmentPackage {
                weight: self.weight_grams,
                length: self.length_cm,
                width: self.width_cm,
                height: self.height_cm,
            },
            delivery_mode: &self.delivery_mode,
            declared_value: self.declared_value,
            instructions: self.instructions.as_deref(),
            collection_mode: self.collection_mode,
            custom_data: &self.custom_data,
        };

        // La estructura serializable no puede fallar al convertirse a JSON
        serde_json::to_value(api).expect("shipment request serialization is infallible")
    }
}

/// Response de creación de expedición
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentResponse {
    /// Número de expedición Mondial Relay
    pub expedition_number: String,
    /// URL pública de seguimiento
    pub tracking_url: String,
    /// URL de descarga de la etiqueta PDF
    pub label_url: String,
    /// Payload QR para depósito sin etiqueta
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Metadatos opacos devueltos por la API
    pub metadata: HashMap<String, Value>,
}

impl ShipmentResponse {
    /// Construir la response desde el JSON de la API
    pub fn from_api_response(data: Value) -> Result<Self, MondialRelayError> {
        let invalid = |field: &str| {
            MondialRelayError::api_with_message(
                99,
                format!("Réponse API invalide: champ '{}' manquant", field),
            )
        };

        let expedition_number = data
            .get("expeditionNumber")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("expeditionNumber"))?
            .to_string();
        let tracking_url = data
            .get("trackingUrl")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("trackingUrl"))?
            .to_string();
        let label_url = data
            .get("labelUrl")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("labelUrl"))?
            .to_string();

        let qr_code = data
            .get("qrCode")
            .and_then(Value::as_str)
            .map(str::to_string);

        let created_at = data
            .get("createdAt")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        let metadata = data
            .get("metadata")
            .and_then(Value::as_object)
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        Ok(Self {
            expedition_number,
            tracking_url,
            label_url,
            qr_code,
            created_at,
            metadata,
        })
    }

    /// Hay payload QR disponible
    pub fn has_qr_code(&self) -> bool {
        self.qr_code.as_deref().is_some_and(|qr| !qr.is_empty())
    }

    /// Versión corta del número de expedición para mostrar
    pub fn short_expedition_number(&self, length: usize) -> String {
        if self.expedition_number.len() <= length {
            return self.expedition_number.clone();
        }
        format!("{}...", &self.expedition_number[..length])
    }
}
