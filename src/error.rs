use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use derive_more::{Display, Error, From};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Missing or empty client input.
    #[display("{message}")]
    Validation {
        #[error(not(source))]
        message: String,
    },

    #[display("blog not found")]
    NotFound,

    #[display("permission denied")]
    PermissionDenied,

    #[display("method not allowed")]
    MethodNotAllowed,

    /// A transcript or generation provider failed after dispatch.
    #[display("{message}")]
    Upstream {
        #[error(not(source))]
        message: String,
    },

    #[display("database error: {source}")]
    #[from]
    Database { source: sea_orm::DbErr },

    #[display("credential error: {source}")]
    #[from]
    Credential { source: bcrypt::BcryptError },

    #[display("template error: {source}")]
    #[from]
    Template { source: tera::Error },

    #[display("content generation failed: {source}")]
    #[from]
    Generation {
        source: async_openai::error::OpenAIError,
    },

    #[display("session error: {source}")]
    #[from]
    Session {
        source: actix_session::SessionInsertError,
    },

    #[display("io error: {source}")]
    #[from]
    Io { source: std::io::Error },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Error::Upstream {
            message: message.into(),
        }
    }
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
