//! Cliente HTTP para la API REST v2 de Mondial Relay
//!
//! Cada petición se firma con HMAC-SHA256 sobre método + endpoint +
//! timestamp + cuerpo. Los errores de transporte se reintentan con
//! backoff exponencial; los errores de negocio de la API nunca se
//! reintentan.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Method, Response, StatusCode};
use serde_json::{json, Value};
use validator::ValidationErrors;

use crate::config::MondialRelayConfig;
use crate::dto::{
    LabelResponse, RelayPoint, RelayPointCollection, RelayPointSearchCriteria, ShipmentRequest,
    ShipmentResponse,
};
use crate::utils::errors::MondialRelayError;
use crate::utils::signature::rest_signature;
use crate::utils::validation;

use super::{RelayPointSearch, ShipmentApi};

/// Número máximo de intentos ante errores de transporte
const MAX_RETRY_ATTEMPTS: u32 = 3;
/// Delay base entre reintentos (se duplica en cada intento)
const RETRY_DELAY_MS: u64 = 1000;

lazy_static! {
    /// Formato de etiqueta en el header Content-Disposition
    static ref LABEL_FORMAT_REGEX: Regex =
        Regex::new(r"(?i)format[=_]([A-Za-z0-9x]+)").unwrap();
}

/// Cliente de la API REST v2
pub struct MondialRelayRestClient {
    config: MondialRelayConfig,
    client: reqwest::Client,
}

impl MondialRelayRestClient {
    /// Crear el cliente validando las credenciales
    pub fn new(config: MondialRelayConfig) -> Result<Self, MondialRelayError> {
        let mut errors = ValidationErrors::new();
        if let Err(error) = validation::validate_not_empty(&config.api_key) {
            errors.add("api_key", error);
        }
        if let Err(error) = validation::validate_not_empty(&config.api_secret) {
            errors.add("api_secret", error);
        }
        if !errors.is_empty() {
            return Err(MondialRelayError::Validation(errors));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                MondialRelayError::api_with_message(
                    99,
                    "Impossible d'initialiser le client HTTP".to_string(),
                )
                .caused_by(e)
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &MondialRelayConfig {
        &self.config
    }

    /// Ejecutar una petición firmada con reintentos ante fallos de transporte
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Response, MondialRelayError> {
        let max_attempts = if self.config.enable_retry {
            MAX_RETRY_ATTEMPTS
        } else {
            1
        };
        let url = format!("{}{}", self.config.rest_base_url, endpoint);
        let mut last_error: Option<reqwest::Error> = None;

        for attempt in 1..=max_attempts {
            // La firma incluye el timestamp, se regenera en cada intento
            let timestamp = chrono::Utc::now().timestamp().to_string();
            let signature = rest_signature(
                &self.config.api_secret,
                method.as_str(),
                endpoint,
                body,
                &timestamp,
            );

            let mut builder = self
                .client
                .request(method.clone(), &url)
                .header("Authorization", format!("Bearer {}", self.config.api_key))
                .header("X-MR-Signature", signature)
                .header("X-MR-Timestamp", timestamp)
                .header("Content-Type", "application/json")
                .header("Accept", "application/json")
                .header("User-Agent", "mondial_relay_api/1.0");
            if let Some(body) = body {
                builder = builder.json(body);
            }

            match builder.send().await {
                Ok(response) => return self.check_api_errors(response).await,
                Err(e) => {
                    log::warn!(
                        "⚠️ Error de transporte en {} {} (intento {}/{}): {}",
                        method,
                        endpoint,
                        attempt,
                        max_attempts,
                        e
                    );
                    last_error = Some(e);
                    if attempt < max_attempts {
                        let delay = RETRY_DELAY_MS * 2u64.pow(attempt - 1);
                        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                    }
                }
            }
        }

        log::error!(
            "❌ Reintentos agotados para {} {} tras {} intentos",
            method,
            endpoint,
            max_attempts
        );
        let mut error = MondialRelayError::api_with_message(
            3,
            "Service temporairement indisponible après plusieurs tentatives.".to_string(),
        )
        .with_context("attempts", json!(max_attempts))
        .with_context("method", json!(method.as_str()))
        .with_context("endpoint", json!(endpoint));
        if let Some(cause) = last_error {
            error = error.caused_by(cause);
        }
        Err(error)
    }

    /// Traducir respuestas de error HTTP a errores tipados
    async fn check_api_errors(&self, response: Response) -> Result<Response, MondialRelayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            log::error!("❌ Autenticación rechazada por la API ({})", status.as_u16());
            return Err(MondialRelayError::authentication()
                .with_context("statusCode", json!(status.as_u16())));
        }

        // La API devuelve errorCode/errorMessage en el cuerpo cuando puede
        let body: Option<Value> = response.json().await.ok();
        if let Some(body) = &body {
            if let (Some(code), Some(message)) = (
                body.get("errorCode").and_then(Value::as_i64),
                body.get("errorMessage").and_then(Value::as_str),
            ) {
                return Err(MondialRelayError::api_with_message(
                    code as i32,
                    message.to_string(),
                )
                .with_context("httpStatus", json!(status.as_u16()))
                .with_context("body", body.clone()));
            }
        }

        let code = match status.as_u16() {
            400 => 2,
            404 => 80,
            429 => 3,
            _ => 3,
        };
        Err(MondialRelayError::api(code).with_context("httpStatus", json!(status.as_u16())))
    }
}

#[async_trait]
impl RelayPointSearch for MondialRelayRestClient {
    async fn find_relay_points(
        &self,
        criteria: &RelayPointSearchCriteria,
    ) -> Result<RelayPointCollection, MondialRelayError> {
        log::info!(
            "🔍 Buscando puntos relais (país: {}, radio: {} km, límite: {})",
            criteria.country_code(),
            criteria.radius(),
            criteria.limit()
        );

        let mut body = json!({
            "countryCode": criteria.country_code(),
            "radius": criteria.radius(),
            "limit": criteria.limit(),
        });
        // Las coordenadas tienen prioridad sobre el código postal
        if let (Some(lat), Some(lon)) = (criteria.latitude(), criteria.longitude()) {
            body["latitude"] = json!(lat);
            body["longitude"] = json!(lon);
        } else if let Some(postal_code) = criteria.postal_code() {
            body["postalCode"] = json!(postal_code);
            // La ciudad solo acompaña al código postal, nunca a coordenadas
            if let Some(city) = criteria.city() {
                body["city"] = json!(city);
            }
        }
        if let Some(delivery_mode) = criteria.delivery_mode() {
            body["deliveryMode"] = json!(delivery_mode);
        }
        if let Some(weight) = criteria.weight() {
            body["weight"] = json!(weight);
        }

        let response = self
            .request(Method::POST, "/relay-points/search", Some(&body))
            .await?;

        let data: Value = response.json().await.map_err(|e| {
            MondialRelayError::api_with_message(
                3,
                "Échec de la recherche des points relais.".to_string(),
            )
            .with_context("criteria", body.clone())
            .caused_by(e)
        })?;

        let collection = RelayPointCollection::from_api_response(data)?;
        log::info!("✅ {} puntos relais encontrados", collection.len());
        Ok(collection)
    }

    async fn get_relay_point(
        &self,
        relay_point_id: &str,
        country_code: &str,
    ) -> Result<Option<RelayPoint>, MondialRelayError> {
        log::info!("🔍 Recuperando punto relais {} ({})", relay_point_id, country_code);
        let endpoint = format!("/relay-points/{}/{}", country_code, relay_point_id);

        let response = match self.request(Method::GET, &endpoint, None).await {
            Ok(response) => response,
            // Un punto inexistente no es un error para el integrador
            Err(e) if e.http_status() == Some(404) => {
                log::info!("ℹ️ Punto relais {} no encontrado", relay_point_id);
                return Ok(None);
            }
            Err(e) if e.is_authentication_error() => return Err(e),
            Err(e) => {
                let http_status = e.http_status();
                let mut error = MondialRelayError::api_with_message(
                    80,
                    "Échec de la récupération du point relais.".to_string(),
                )
                .with_context("relayPointId", json!(relay_point_id))
                .with_context("countryCode", json!(country_code))
                .caused_by(e);
                if let Some(status) = http_status {
                    error = error.with_context("httpStatus", json!(status));
                }
                return Err(error);
            }
        };

        let data: Value = response.json().await.map_err(|e| {
            MondialRelayError::api_with_message(
                80,
                "Échec de la récupération du point relais.".to_string(),
            )
            .with_context("relayPointId", json!(relay_point_id))
            .with_context("countryCode", json!(country_code))
            .caused_by(e)
        })?;

        Ok(Some(RelayPoint::from_api_response(data)?))
    }
}

#[async_trait]
impl ShipmentApi for MondialRelayRestClient {
    async fn create_shipment(
        &self,
        request: &ShipmentRequest,
    ) -> Result<ShipmentResponse, MondialRelayError> {
        log::info!(
            "📦 Creando expedición {} hacia el punto {}",
            request.order_reference,
            request.relay_point_id
        );
        let body = request.to_api_payload();

        let response = self
            .request(Method::POST, "/shipments", Some(&body))
            .await?;

        let data: Value = response.json().await.map_err(|e| {
            MondialRelayError::api_with_message(
                3,
                "Échec de la création de l'expédition.".to_string(),
            )
            .with_context("orderReference", json!(request.order_reference))
            .caused_by(e)
        })?;

        let shipment = ShipmentResponse::from_api_response(data)?;
        log::info!("✅ Expedición creada: {}", shipment.expedition_number);
        Ok(shipment)
    }

    async fn get_label(
        &self,
        expedition_number: &str,
    ) -> Result<LabelResponse, MondialRelayError> {
        log::info!("🏷️ Descargando etiqueta de la expedición {}", expedition_number);
        let endpoint = format!("/shipments/{}/label", expedition_number);

        let response = self.request(Method::GET, &endpoint, None).await?;

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .unwrap_or_else(|| "application/pdf".to_string());

        let format = response
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| LABEL_FORMAT_REGEX.captures(v))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_uppercase())
            .unwrap_or_else(|| "A4".to_string());

        let content = response.bytes().await.map_err(|e| {
            MondialRelayError::api_with_message(
                3,
                "Échec de la récupération de l'étiquette.".to_string(),
            )
            .with_context("expeditionNumber", json!(expedition_number))
            .caused_by(e)
        })?;

        let label = LabelResponse::new(content.to_vec(), content_type, expedition_number, format);
        log::info!(
            "✅ Etiqueta descargada ({}, {})",
            label.format,
            label.human_readable_size()
        );
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MondialRelayConfig;

    fn sample_config() -> MondialRelayConfig {
        MondialRelayConfig::new("key", "secret", "BDTEST13", "PrivateK")
    }

    #[test]
    fn test_new_requires_credentials() {
        let config = MondialRelayConfig::new("", "secret", "BDTEST13", "PrivateK");
        let result = MondialRelayRestClient::new(config);
        assert!(matches!(result, Err(MondialRelayError::Validation(_))));

        let config = MondialRelayConfig::new("key", "", "BDTEST13", "PrivateK");
        assert!(MondialRelayRestClient::new(config).is_err());

        assert!(MondialRelayRestClient::new(sample_config()).is_ok());
    }

    #[test]
    fn test_label_format_regex() {
        let captures = LABEL_FORMAT_REGEX
            .captures("attachment; filename=label_31234567_format=10x15.pdf")
            .unwrap();
        assert_eq!(captures.get(1).unwrap().as_str().to_uppercase(), "10X15");

        let captures = LABEL_FORMAT_REGEX
            .captures("attachment; filename=label.pdf; format=A4")
            .unwrap();
        assert_eq!(captures.get(1).unwrap().as_str(), "A4");

        assert!(LABEL_FORMAT_REGEX.captures("attachment; filename=label.pdf").is_none());
    }
}
