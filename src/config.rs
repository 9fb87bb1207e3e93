use std::env;

use crate::error::{Error, Result};

const DEFAULT_MODEL: &str = "gpt-5.2";
const DEFAULT_LANGUAGES: &str = "en,es";
const DEFAULT_DATABASE_URL: &str = "sqlite://blogify.db?mode=rwc";

/// Cookie keys shorter than this cannot seed the session signing key.
const MIN_SESSION_SECRET_LEN: usize = 64;

/// Settings for the text-generation provider.
#[derive(Clone)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub model: String,
}

/// Settings for the transcript provider.
#[derive(Clone)]
pub struct TranscriptConfig {
    /// Caption languages in preference order.
    pub languages: Vec<String>,
}

#[derive(Clone)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub transcript: TranscriptConfig,
    pub database_url: String,
    pub session_secret: Option<String>,
}

impl AppConfig {
    /// Reads the environment once at startup. Components receive their
    /// slice of this config through their constructors; nothing consults
    /// the environment after this point.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| Error::validation("OPENAI_API_KEY environment variable is not set"))?;

        let model = env::var("BLOGIFY_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let languages = env::var("TRANSCRIPT_LANGUAGES")
            .unwrap_or_else(|_| DEFAULT_LANGUAGES.to_string())
            .split(',')
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty())
            .collect();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) if secret.len() >= MIN_SESSION_SECRET_LEN => Some(secret),
            Ok(_) => {
                return Err(Error::validation(format!(
                    "SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes"
                )));
            }
            Err(_) => None,
        };

        Ok(Self {
            generator: GeneratorConfig { api_key, model },
            transcript: TranscriptConfig { languages },
            database_url,
            session_secret,
        })
    }
}
