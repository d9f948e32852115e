use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("login POST returned HTTP {status}: {body}")]
    Authentication { status: u16, body: String },

    #[error("catalog GET returned HTTP {status}: {body}")]
    Fetch { status: u16, body: String },

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("malformed field {field}: {message}")]
    Schema { field: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV decoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {message}")]
    Database { message: String },
}

pub type Result<T> = std::result::Result<T, ScraperError>;
