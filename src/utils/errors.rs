//! Sistema de manejo de errores
//!
//! Este módulo define el tipo de error del cliente Mondial Relay,
//! las tablas de códigos de error de la API y los predicados de
//! clasificación (temporal / configuración / validación).

use lazy_static::lazy_static;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrors;

/// Código de error usado para fallos de autenticación (credenciales inválidas)
pub const AUTHENTICATION_ERROR_CODE: i32 = 1;

lazy_static! {
    /// Mensajes de error de la API REST v2 (código → mensaje en francés)
    static ref API_ERROR_MESSAGES: HashMap<i32, &'static str> = {
        let mut m = HashMap::new();
        m.insert(0, "Mode sandbox actif - Aucune erreur");
        m.insert(1, "Identifiants API invalides. Veuillez vérifier votre configuration.");
        m.insert(2, "Code postal non desservi par Mondial Relay.");
        m.insert(3, "Service Mondial Relay temporairement indisponible. Veuillez réessayer ultérieurement.");
        m.insert(9, "Le poids du colis dépasse les limites autorisées (max 30kg).");
        m.insert(20, "Point relais temporairement inactif.");
        m.insert(80, "Point relais introuvable. Veuillez vérifier l'identifiant.");
        m.insert(81, "Point relais actuellement saturé. Veuillez sélectionner un autre point.");
        m
    };

    /// Códigos de estado de la API SOAP v1 (STAT → mensaje en francés)
    static ref SOAP_STATUS_MESSAGES: HashMap<i32, &'static str> = {
        let mut m = HashMap::new();
        m.insert(0, "Opération effectuée avec succès");
        m.insert(1, "Enseigne invalide");
        m.insert(2, "Numéro d'enseigne vide ou inexistant");
        m.insert(3, "Compte enseigne non actif");
        m.insert(5, "Numéro de Compte enseigne non autorisé");
        m.insert(7, "Numéro de client invalide (non spécifié)");
        m.insert(8, "Erreur SQL");
        m.insert(9, "Enseigne non autorisée");
        m.insert(10, "Expédition non autorisée");
        m.insert(11, "Numéro de compte enseigne invalide");
        m.insert(12, "Pays de livraison non autorisé");
        m.insert(20, "Poids du colis invalide");
        m.insert(21, "Taille du colis invalide");
        m.insert(22, "Taille + Poids du colis invalide");
        m.insert(24, "Numéro de Point Relais invalide");
        m.insert(25, "Numéro de Point Relais non renseigné");
        m.insert(26, "Point Relais indisponible");
        m.insert(27, "Pays Point Relais invalide");
        m.insert(28, "Poids ou Taille du colis invalide pour ce Point Relais");
        m.insert(29, "Point Relais non autorisé");
        m.insert(30, "Expédition non créée");
        m.insert(31, "Colis inexistant");
        m.insert(32, "Colis déjà existant");
        m.insert(33, "Expédition trop ancienne");
        m.insert(34, "Code de suivi invalide");
        m.insert(35, "Plus de 200 colis dans la recherche");
        m.insert(36, "Dates de recherche invalides");
        m.insert(37, "Plage de dates trop grande");
        m.insert(38, "Texte trop long");
        m.insert(39, "Texte de notification trop long");
        m.insert(40, "Adresse invalide");
        m.insert(44, "Nombre de jours avant livraison invalide");
        m.insert(45, "Nombre de jours avant disponibilité invalide");
        m.insert(46, "Instruction de livraison invalide");
        m.insert(47, "Enseigne de retour non autorisée");
        m.insert(48, "Mode de collecte invalide");
        m.insert(49, "Mode de livraison invalide");
        m.insert(60, "Code Pays invalide");
        m.insert(61, "Ville invalide");
        m.insert(62, "Code Postal invalide");
        m.insert(63, "Adresse invalide");
        m.insert(64, "Adresse1 invalide");
        m.insert(65, "Adresse2 invalide");
        m.insert(66, "Nom invalide");
        m.insert(67, "Prénom invalide");
        m.insert(68, "Adresse non trouvée par Street Matching");
        m.insert(69, "Rayon de recherche trop élevé");
        m.insert(70, "Données manquantes pour la recherche");
        m.insert(71, "Coordonnées GPS invalides");
        m.insert(74, "Langue invalide");
        m.insert(78, "Mode de collecte invalide pour les retours");
        m.insert(79, "Assurance non autorisée");
        m.insert(80, "Code tracing invalide");
        m.insert(81, "Code postal invalide");
        m.insert(82, "Ville invalide");
        m.insert(83, "Pays invalide");
        m.insert(84, "Numéro de téléphone invalide");
        m.insert(85, "Adresse e-mail invalide");
        m.insert(86, "Code postal invalide pour le pays");
        m.insert(87, "Format de téléphone invalide");
        m.insert(88, "Numéro de mobile invalide");
        m.insert(89, "Format de mobile invalide");
        m.insert(90, "Pas de Point Relais dans la zone");
        m.insert(94, "Le Pays du destinataire n'est pas autorisé par l'enseigne");
        m.insert(95, "Numéro de compte incorrect");
        m.insert(96, "Paramètre Action invalide");
        m.insert(97, "Clé de sécurité invalide");
        m.insert(98, "Erreur de service");
        m.insert(99, "Erreur générique");
        m
    };
}

/// Mensaje traducido para un código de error de la API REST
pub fn api_error_message(code: i32) -> String {
    API_ERROR_MESSAGES
        .get(&code)
        .map(|m| (*m).to_string())
        .unwrap_or_else(|| format!("Erreur API Mondial Relay inconnue (code {})", code))
}

/// Mensaje traducido para un código de estado de la API SOAP
pub fn soap_status_message(code: i32) -> String {
    SOAP_STATUS_MESSAGES
        .get(&code)
        .map(|m| (*m).to_string())
        .unwrap_or_else(|| format!("Erreur inconnue (code {})", code))
}

/// Contexto libre adjunto a los errores para diagnóstico
pub type ErrorContext = HashMap<String, Value>;

/// Errores del cliente Mondial Relay
#[derive(Error, Debug)]
pub enum MondialRelayError {
    /// Error devuelto por la API (código Mondial Relay + mensaje traducido)
    #[error("[MR Error {code}] {message}")]
    Api {
        code: i32,
        message: String,
        context: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Fallo de autenticación (HTTP 401/403, firma o credenciales inválidas)
    #[error("[MR Error 1] {message}")]
    Authentication { message: String, context: ErrorContext },

    /// Datos de entrada inválidos detectados antes de llamar a la API
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),
}

impl MondialRelayError {
    /// Crear un error de API con el mensaje por defecto de la tabla REST
    pub fn api(code: i32) -> Self {
        MondialRelayError::Api {
            code,
            message: api_error_message(code),
            context: ErrorContext::new(),
            source: None,
        }
    }

    /// Crear un error de API con un mensaje personalizado
    pub fn api_with_message(code: i32, message: impl Into<String>) -> Self {
        MondialRelayError::Api {
            code,
            message: message.into(),
            context: ErrorContext::new(),
            source: None,
        }
    }

    /// Crear un error de autenticación (siempre código 1)
    pub fn authentication() -> Self {
        MondialRelayError::Authentication {
            message: "Échec de l'authentification API Mondial Relay. Veuillez vérifier vos identifiants."
                .to_string(),
            context: ErrorContext::new(),
        }
    }

    /// Adjuntar contexto de diagnóstico al error
    pub fn with_context(mut self, key: &str, value: Value) -> Self {
        match &mut self {
            MondialRelayError::Api { context, .. }
            | MondialRelayError::Authentication { context, .. } => {
                context.insert(key.to_string(), value);
            }
            MondialRelayError::Validation(_) => {}
        }
        self
    }

    /// Adjuntar la causa subyacente (error de transporte, parseo, etc.)
    pub fn caused_by(mut self, cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        if let MondialRelayError::Api { source, .. } = &mut self {
            *source = Some(cause.into());
        }
        self
    }

    /// Código de error Mondial Relay asociado
    pub fn code(&self) -> Option<i32> {
        match self {
            MondialRelayError::Api { code, .. } => Some(*code),
            MondialRelayError::Authentication { .. } => Some(AUTHENTICATION_ERROR_CODE),
            MondialRelayError::Validation(_) => None,
        }
    }

    /// Contexto de diagnóstico del error
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            MondialRelayError::Api { context, .. }
            | MondialRelayError::Authentication { context, .. } => Some(context),
            MondialRelayError::Validation(_) => None,
        }
    }

    /// Status HTTP registrado en el contexto, si lo hay
    pub fn http_status(&self) -> Option<u16> {
        self.context()
            .and_then(|c| c.get("httpStatus"))
            .and_then(|v| v.as_u64())
            .map(|v| v as u16)
    }

    /// El error es temporal y la operación se puede reintentar más tarde
    pub fn is_temporary(&self) -> bool {
        matches!(self.code(), Some(3) | Some(81))
    }

    /// El error se debe a una configuración incorrecta (credenciales)
    pub fn is_configuration_error(&self) -> bool {
        matches!(self.code(), Some(AUTHENTICATION_ERROR_CODE))
    }

    /// El error se debe a datos inválidos (código postal, peso, punto relais)
    pub fn is_validation_error(&self) -> bool {
        matches!(self, MondialRelayError::Validation(_))
            || matches!(self.code(), Some(2) | Some(9) | Some(20) | Some(80))
    }

    /// El error es un fallo de autenticación
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, MondialRelayError::Authentication { .. })
    }
}

/// Construir un error de validación con un solo campo
pub fn validation_error(field: &'static str, error: validator::ValidationError) -> MondialRelayError {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    MondialRelayError::Validation(errors)
}
