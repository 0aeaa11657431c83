//! DTO de etiqueta de expedición
//!
//! Contenido binario de la etiqueta más metadatos (formato, tamaño,
//! expiración) y utilidades de presentación/persistencia.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};

use crate::utils::errors::MondialRelayError;

/// Etiqueta de expedición descargada
#[derive(Debug, Clone, PartialEq)]
pub struct LabelResponse {
    /// Contenido binario (normalmente PDF)
    pub content: Vec<u8>,
    pub content_type: String,
    pub expedition_number: String,
    /// Formato de impresión ("A4", "A5", "10X15")
    pub format: String,
    pub size_bytes: usize,
    pub expires_at: Option<DateTime<Utc>>,
}

impl LabelResponse {
    pub fn new(
        content: Vec<u8>,
        content_type: impl Into<String>,
        expedition_number: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        let size_bytes = content.len();
        Self {
            content,
            content_type: content_type.into(),
            expedition_number: expedition_number.into(),
            format: format.into(),
            size_bytes,
            expires_at: None,
        }
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// El contenido es un PDF
    pub fn is_pdf(&self) -> bool {
        self.content_type.eq_ignore_ascii_case("application/pdf")
    }

    /// Contenido codificado en base64
    pub fn base64_content(&self) -> String {
        BASE64.encode(&self.content)
    }

    /// Data URI para incrustar la etiqueta en HTML
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.base64_content())
    }

    /// Tamaño legible ("12.50 KB", "1.20 MB")
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes as f64;
        if bytes < 1024.0 {
            format!("{} B", self.size_bytes)
        } else if bytes < 1024.0 * 1024.0 {
            format!("{:.2} KB", bytes / 1024.0)
        } else {
            format!("{:.2} MB", bytes / (1024.0 * 1024.0))
        }
    }

    /// La URL de descarga ya no es válida
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires| expires < Utc::now())
    }

    /// Nombre de fichero sugerido para guardar la etiqueta
    pub fn suggested_filename(&self, prefix: &str) -> String {
        let extension = if self.is_pdf() { "pdf" } else { "bin" };
        format!(
            "{}_{}_{}.{}",
            prefix,
            self.expedition_number,
            self.format.to_lowercase(),
            extension
        )
    }

    /// Guardar el contenido en disco
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), MondialRelayError> {
        std::fs::write(path.as_ref(), &self.content).map_err(|e| {
            MondialRelayError::api_with_message(
                99,
                format!("Impossible d'écrire l'étiquette sur le disque: {}", e),
            )
            .caused_by(e)
        })
    }
}
