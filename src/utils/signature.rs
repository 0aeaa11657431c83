//! Firma de peticiones
//!
//! Este módulo calcula las dos firmas que usan las APIs de Mondial Relay:
//! - API REST v2: HMAC-SHA256 sobre `método + endpoint + timestamp + body`
//! - API SOAP v1: MD5 en mayúsculas de los valores concatenados + clave privada

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Calcular la firma HMAC-SHA256 de una petición REST.
///
/// El payload firmado es `method + endpoint + timestamp + body_json`,
/// con body vacío para peticiones sin cuerpo. Devuelve hex en minúsculas.
pub fn rest_signature(
    secret: &str,
    method: &str,
    endpoint: &str,
    body: Option<&serde_json::Value>,
    timestamp: &str,
) -> String {
    let body_string = body.map(|b| b.to_string()).unwrap_or_default();
    let payload = format!("{}{}{}{}", method, endpoint, timestamp, body_string);

    // HMAC acepta claves de cualquier longitud
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(payload.as_bytes());

    mac.finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Calcular el hash de seguridad de la API SOAP.
///
/// MD5 de la concatenación de todos los valores de los parámetros (en el
/// orden fijo de campos, sin el campo Security) más la clave privada,
/// en hexadecimal mayúsculas.
pub fn security_hash(values: &[&str], private_key: &str) -> String {
    let mut concatenated = values.concat();
    concatenated.push_str(private_key);

    format!("{:x}", md5::compute(concatenated.as_bytes())).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_security_hash_known_value() {
        // md5("abc") = 900150983cd24fb0d6963f7d28e17f72
        assert_eq!(
            security_hash(&["a", "b"], "c"),
            "900150983CD24FB0D6963F7D28E17F72"
        );
    }

    #[test]
    fn test_security_hash_is_deterministic() {
        let values = ["TESTENSEIGNE", "FR", "", "Paris", "75001"];
        let first = security_hash(&values, "PrivateKey");
        let second = security_hash(&values, "PrivateKey");
        assert_eq!(first, second);
    }

    #[test]
    fn test_security_hash_changes_with_any_value() {
        let base = security_hash(&["TESTENSEIGNE", "FR", "75001"], "PrivateKey");
        assert_ne!(base, security_hash(&["TESTENSEIGNE", "FR", "75002"], "PrivateKey"));
        assert_ne!(base, security_hash(&["TESTENSEIGNE", "BE", "75001"], "PrivateKey"));
        assert_ne!(base, security_hash(&["TESTENSEIGNE", "FR", "75001"], "OtherKey"));
    }

    #[test]
    fn test_security_hash_is_uppercase_hex() {
        let hash = security_hash(&["FR"], "key");
        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_rest_signature_is_deterministic() {
        let body = json!({"countryCode": "FR", "radius": 20});
        let first = rest_signature("secret", "POST", "/relay-points/search", Some(&body), "1700000000");
        let second = rest_signature("secret", "POST", "/relay-points/search", Some(&body), "1700000000");
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_rest_signature_depends_on_each_component() {
        let base = rest_signature("secret", "GET", "/shipments/123/label", None, "1700000000");
        assert_ne!(base, rest_signature("secret", "POST", "/shipments/123/label", None, "1700000000"));
        assert_ne!(base, rest_signature("secret", "GET", "/shipments/456/label", None, "1700000000"));
        assert_ne!(base, rest_signature("secret", "GET", "/shipments/123/label", None, "1700000001"));
        assert_ne!(base, rest_signature("other", "GET", "/shipments/123/label", None, "1700000000"));
    }

    #[test]
    fn test_rest_signature_empty_body_equals_no_body() {
        let without = rest_signature("secret", "GET", "/x", None, "1");
        let with_null = rest_signature("secret", "GET", "/x", Some(&json!({"a": 1})), "1");
        assert_ne!(without, with_null);
    }
}
