//! Cliente para el Web Service SOAP legado de Mondial Relay
//!
//! Solo cubre la búsqueda de puntos relais (WSI4_PointRelais_Recherche).
//! Las peticiones se firman con el hash MD5 de los parámetros en orden
//! fijo concatenados con la clave privada. La respuesta XML se parsea
//! con expresiones regulares, suficiente para la estructura plana que
//! devuelve el servicio.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;
use validator::ValidationErrors;

use crate::config::MondialRelayConfig;
use crate::dto::{RelayPoint, RelayPointCollection, RelayPointSearchCriteria, TimeSlot};
use crate::utils::errors::{soap_status_message, MondialRelayError};
use crate::utils::signature::security_hash;
use crate::utils::validation;

use super::RelayPointSearch;

const SOAP_NAMESPACE: &str = "http://www.mondialrelay.fr/webservice/";
const SEARCH_ACTION: &str = "WSI4_PointRelais_Recherche";
const DETAIL_ACTION: &str = "WSI2_DetailPointRelais";

/// Estado "punto relais inexistente" del Web Service
const SOAP_STATUS_NOT_FOUND: i32 = 24;

lazy_static! {
    static ref RELAY_BLOCK_REGEX: Regex =
        Regex::new(r"(?s)<PointRelais_Details>(.*?)</PointRelais_Details>").unwrap();
    static ref STRING_TOKEN_REGEX: Regex = Regex::new(r"<string>([^<]*)</string>").unwrap();
}

/// Cliente del Web Service SOAP
pub struct MondialRelaySoapClient {
    config: MondialRelayConfig,
    client: reqwest::Client,
}

impl MondialRelaySoapClient {
    /// Crear el cliente validando las credenciales SOAP
    pub fn new(config: MondialRelayConfig) -> Result<Self, MondialRelayError> {
        let mut errors = ValidationErrors::new();
        if let Err(error) = validation::validate_not_empty(&config.enseigne) {
            errors.add("enseigne", error);
        }
        if let Err(error) = validation::validate_not_empty(&config.private_key) {
            errors.add("private_key", error);
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

    /// Parámetros de búsqueda en el orden fijo que espera el hash Security
    fn build_search_params(&self, criteria: &RelayPointSearchCriteria) -> Vec<(String, String)> {
        let format_coord = |value: Option<f64>| {
            value.map(|v| format!("{:.6}", v)).unwrap_or_default()
        };

        let mut params: Vec<(String, String)> = vec![
            ("Enseigne".into(), self.config.enseigne.clone()),
            ("Pays".into(), criteria.country_code().to_string()),
            ("NumPointRelais".into(), String::new()),
            ("Ville".into(), criteria.city().unwrap_or_default().to_string()),
            ("CP".into(), criteria.postal_code().unwrap_or_default().to_string()),
            ("Latitude".into(), format_coord(criteria.latitude())),
            ("Longitude".into(), format_coord(criteria.longitude())),
            ("Taille".into(), String::new()),
            (
                "Poids".into(),
                criteria.weight().map(|w| w.to_string()).unwrap_or_default(),
            ),
            (
                "Action".into(),
                criteria.delivery_mode().unwrap_or_default().to_string(),
            ),
            ("DelaiEnvoi".into(), "0".into()),
            // El servicio espera el radio en metros
            ("RayonRecherche".into(), (criteria.radius() * 1000).to_string()),
            ("TypeActivite".into(), String::new()),
            ("NACE".into(), String::new()),
            ("NombreResultats".into(), criteria.limit().to_string()),
        ];

        let values: Vec<&str> = params.iter().map(|(_, v)| v.as_str()).collect();
        let security = security_hash(&values, &self.config.private_key);
        params.push(("Security".into(), security));
        params
    }

    /// Parámetros de consulta de un punto concreto, mismo orden de hash
    fn build_detail_params(&self, relay_point_id: &str, country_code: &str) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("Enseigne".into(), self.config.enseigne.clone()),
            ("Pays".into(), country_code.to_string()),
            ("NumPointRelais".into(), relay_point_id.to_string()),
        ];
        let values: Vec<&str> = params.iter().map(|(_, v)| v.as_str()).collect();
        let security = security_hash(&values, &self.config.private_key);
        params.push(("Security".into(), security));
        params
    }

    /// Ejecutar una llamada SOAP y devolver el XML de la respuesta
    async fn call(
        &self,
        action: &str,
        params: &[(String, String)],
    ) -> Result<String, MondialRelayError> {
        let envelope = build_envelope(action, params);
        log::debug!("📡 Llamada SOAP {} ({} parámetros)", action, params.len());

        let soap_error = |cause: String| {
            MondialRelayError::api_with_message(
                3,
                format!("Erreur de communication SOAP: {}", cause),
            )
            .with_context("action", json!(action))
        };

        let response = self
            .client
            .post(&self.config.soap_endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", format!("{}{}", SOAP_NAMESPACE, action))
            .body(envelope)
            .send()
            .await
            .map_err(|e| soap_error(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| soap_error(e.to_string()))?;

        if !status.is_success() {
            return Err(soap_error(format!("HTTP {}", status.as_u16()))
                .with_context("httpStatus", json!(status.as_u16())));
        }

        Ok(body)
    }

    /// STAT de la respuesta, o error 99 si la respuesta no tiene la forma esperada
    fn extract_status(xml: &str) -> Result<i32, MondialRelayError> {
        extract_tag(xml, "STAT")
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .ok_or_else(|| {
                MondialRelayError::api_with_message(99, "Réponse SOAP vide".to_string())
            })
    }
}

#[async_trait]
impl RelayPointSearch for MondialRelaySoapClient {
    async fn find_relay_points(
        &self,
        criteria: &RelayPointSearchCriteria,
    ) -> Result<RelayPointCollection, MondialRelayError> {
        log::info!(
            "🔍 Buscando puntos relais vía SOAP (país: {}, radio: {} km)",
            criteria.country_code(),
            criteria.radius()
        );

        let params = self.build_search_params(criteria);
        let xml = self.call(SEARCH_ACTION, &params).await?;

        let status = Self::extract_status(&xml)?;
        if status != 0 {
            log::warn!("⚠️ El Web Service devolvió STAT {}", status);
            return Err(MondialRelayError::api_with_message(
                status,
                soap_status_message(status),
            )
            .with_context("action", json!(SEARCH_ACTION)));
        }

        let relay_points: Vec<RelayPoint> = RELAY_BLOCK_REGEX
            .captures_iter(&xml)
            .filter_map(|c| c.get(1))
            .filter_map(|block| parse_relay_point(block.as_str()))
            .collect();

        log::info!("✅ {} puntos relais encontrados vía SOAP", relay_points.len());
        let total_count = relay_points.len();
        Ok(RelayPointCollection::new(relay_points, total_count))
    }

    async fn get_relay_point(
        &self,
        relay_point_id: &str,
        country_code: &str,
    ) -> Result<Option<RelayPoint>, MondialRelayError> {
        log::info!(
            "🔍 Recuperando punto relais {} ({}) vía SOAP",
            relay_point_id,
            country_code
        );

        let params = self.build_detail_params(relay_point_id, country_code);
        // Solo los fallos de transporte/parseo degradan a "no encontrado";
        // un STAT de error del servicio se propaga
        let xml = match self.call(DETAIL_ACTION, &params).await {
            Ok(xml) => xml,
            Err(e) => {
                log::warn!(
                    "⚠️ Consulta SOAP del punto {} fallida, se devuelve None: {}",
                    relay_point_id,
                    e
                );
                return Ok(None);
            }
        };

        let status = match Self::extract_status(&xml) {
            Ok(status) => status,
            Err(e) => {
                log::warn!("⚠️ Respuesta SOAP sin STAT para el punto {}: {}", relay_point_id, e);
                return Ok(None);
            }
        };

        if status == SOAP_STATUS_NOT_FOUND {
            log::info!("ℹ️ Punto relais {} no encontrado", relay_point_id);
            return Ok(None);
        }
        if status != 0 {
            log::warn!("⚠️ El Web Service devolvió STAT {} para el punto {}", status, relay_point_id);
            return Err(MondialRelayError::api_with_message(
                status,
                soap_status_message(status),
            )
            .with_context("action", json!(DETAIL_ACTION))
            .with_context("relayPointId", json!(relay_point_id)));
        }

        Ok(RELAY_BLOCK_REGEX
            .captures(&xml)
            .and_then(|c| c.get(1))
            .and_then(|block| parse_relay_point(block.as_str())))
    }
}

/// Envelope SOAP 1.1 con los parámetros como elementos hijos
fn build_envelope(action: &str, params: &[(String, String)]) -> String {
    let mut fields = String::new();
    for (name, value) in params {
        fields.push_str(&format!(
            "      <{name}>{value}</{name}>\n",
            name = name,
            value = xml_escape(value)
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <{action} xmlns="{namespace}">
{fields}    </{action}>
  </soap:Body>
</soap:Envelope>"#,
        action = action,
        namespace = SOAP_NAMESPACE,
        fields = fields
    )
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Contenido del primer elemento `<tag>...</tag>`
fn extract_tag<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(&xml[start..end])
}

/// Convertir un bloque `PointRelais_Details` en un punto relais
///
/// Los bloques sin identificador o sin coordenadas parseables se descartan.
fn parse_relay_point(block: &str) -> Option<RelayPoint> {
    let field = |tag: &str| extract_tag(block, tag).map(str::trim).unwrap_or_default();

    let relay_point_id = field("Num").to_string();
    if relay_point_id.is_empty() {
        return None;
    }

    // El servicio usa la coma como separador decimal
    let parse_coord = |raw: &str| raw.replace(',', ".").parse::<f64>().ok();
    let latitude = parse_coord(field("Latitude"))?;
    let longitude = parse_coord(field("Longitude"))?;

    let distance_meters = field("Distance").parse::<u32>().ok();

    let day_fields = [
        ("monday", "Horaires_Lundi"),
        ("tuesday", "Horaires_Mardi"),
        ("wednesday", "Horaires_Mercredi"),
        ("thursday", "Horaires_Jeudi"),
        ("friday", "Horaires_Vendredi"),
        ("saturday", "Horaires_Samedi"),
        ("sunday", "Horaires_Dimanche"),
    ];
    let mut opening_hours = crate::dto::OpeningHours::new();
    for (day, tag) in day_fields {
        if let Some(raw) = extract_tag(block, tag) {
            let tokens: Vec<String> = STRING_TOKEN_REGEX
                .captures_iter(raw)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .collect();
            let slots = parse_hours_slots(&tokens.join(" "));
            if !slots.is_empty() {
                opening_hours.insert(day.to_string(), slots);
            }
        }
    }

    let photo_url = {
        let raw = field("URL_Photo");
        (!raw.is_empty()).then(|| raw.to_string())
    };
    let informations = {
        let raw = field("Information");
        (!raw.is_empty()).then(|| raw.to_string())
    };

    Some(RelayPoint {
        relay_point_id,
        name: field("LgAdr1").to_string(),
        street: field("LgAdr3").to_string(),
        postal_code: field("CP").to_string(),
        city: field("Ville").to_string(),
        country_code: field("Pays").to_string(),
        latitude,
        longitude,
        distance_meters,
        opening_hours,
        services: Vec::new(),
        photo_url,
        informations,
        is_active: true,
        exceptional_closures: Vec::new(),
    })
}

/// Decodificar los horarios de un día
///
/// El servicio devuelve cuatro tokens "HHMM": apertura y cierre de la
/// mañana, apertura y cierre de la tarde. "0000" marca una franja
/// cerrada.
fn parse_hours_slots(raw: &str) -> Vec<TimeSlot> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() < 4 {
        return Vec::new();
    }

    let mut slots = Vec::new();
    for pair in [(tokens[0], tokens[1]), (tokens[2], tokens[3])] {
        if pair.0 != "0000" && pair.1 != "0000" {
            if let (Some(open), Some(close)) = (format_hhmm(pair.0), format_hhmm(pair.1)) {
                slots.push(TimeSlot { open, close });
            }
        }
    }
    slots
}

/// "0830" -> "08:30"
fn format_hhmm(token: &str) -> Option<String> {
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}:{}", &token[..2], &token[2..]))
}
