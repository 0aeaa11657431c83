//! Configuración del cliente
//!
//! Este módulo contiene la configuración compartida por los dos clientes
//! (REST v2 y SOAP v1). Las credenciales las inyecta el llamante; aquí no
//! se leen variables de entorno.

/// URL base de la API REST v2 en producción.
///
/// Nota: la API REST v2 usa la misma URL para producción y sandbox; el modo
/// sandbox lo determinan las credenciales usadas (p. ej. TTMRSDBX).
pub const API_BASE_URL_PRODUCTION: &str = "https://api.mondialrelay.com/v2";
/// URL base de la API REST v2 en sandbox (misma URL, ver nota arriba)
pub const API_BASE_URL_SANDBOX: &str = "https://api.mondialrelay.com/v2";
/// Endpoint del servicio web SOAP v1
pub const SOAP_ENDPOINT: &str = "https://api.mondialrelay.com/Web_Services.asmx";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuración del cliente Mondial Relay
///
/// Inmutable tras la construcción: los clientes pueden compartirse entre
/// tareas concurrentes sin sincronización adicional.
#[derive(Debug, Clone)]
pub struct MondialRelayConfig {
    /// API key de la API REST v2 (token bearer)
    pub api_key: String,
    /// Secreto de la API REST v2 para la firma HMAC
    pub api_secret: String,
    /// Código de enseigne de la API SOAP v1
    pub enseigne: String,
    /// Clave privada de la API SOAP v1 para el hash de seguridad
    pub private_key: String,
    /// Modo sandbox (las credenciales determinan el entorno en la API v2)
    pub sandbox: bool,
    /// Timeout por petición en segundos
    pub timeout_secs: u64,
    /// Reintentos automáticos ante fallos de transporte
    pub enable_retry: bool,
    /// URL base de la API REST (derivada del modo sandbox si no se fija)
    pub rest_base_url: String,
    /// Endpoint del servicio SOAP
    pub soap_endpoint: String,
}

impl MondialRelayConfig {
    /// Crear una configuración con los valores por defecto
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        enseigne: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            enseigne: enseigne.into(),
            private_key: private_key.into(),
            sandbox: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            enable_retry: true,
            rest_base_url: API_BASE_URL_PRODUCTION.to_string(),
            soap_endpoint: SOAP_ENDPOINT.to_string(),
        }
    }

    /// Activar el modo sandbox
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self.rest_base_url = if sandbox {
            API_BASE_URL_SANDBOX.to_string()
        } else {
            API_BASE_URL_PRODUCTION.to_string()
        };
        self
    }

    /// Fijar el timeout por petición
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Activar o desactivar los reintentos automáticos
    pub fn with_retry(mut self, enable: bool) -> Self {
        self.enable_retry = enable;
        self
    }

    /// Fijar una URL base REST distinta (tests, despliegues con hosts propios)
    pub fn with_rest_base_url(mut self, url: impl Into<String>) -> Self {
        self.rest_base_url = url.into();
        self
    }

    /// Fijar un endpoint SOAP distinto (tests)
    pub fn with_soap_endpoint(mut self, url: impl Into<String>) -> Self {
        self.soap_endpoint = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MondialRelayConfig::new("key", "secret", "ENSEIGNE", "private");
        assert_eq!(config.rest_base_url, API_BASE_URL_PRODUCTION);
        assert_eq!(config.soap_endpoint, SOAP_ENDPOINT);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.enable_retry);
        assert!(!config.sandbox);
    }

    #[test]
    fn test_sandbox_uses_same_base_url() {
        // La API v2 no distingue hosts: el entorno lo marcan las credenciales
        let config = MondialRelayConfig::new("k", "s", "E", "p").with_sandbox(true);
        assert!(config.sandbox);
        assert_eq!(config.rest_base_url, API_BASE_URL_SANDBOX);
        assert_eq!(API_BASE_URL_SANDBOX, API_BASE_URL_PRODUCTION);
    }

    #[test]
    fn test_builder_overrides() {
        let config = MondialRelayConfig::new("k", "s", "E", "p")
            .with_timeout(5)
            .with_retry(false)
            .with_rest_base_url("http://localhost:8080/v2")
            .with_soap_endpoint("http://localhost:8080/soap");
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.enable_retry);
        assert_eq!(config.rest_base_url, "http://localhost:8080/v2");
        assert_eq!(config.soap_endpoint, "http://localhost:8080/soap");
    }
}
