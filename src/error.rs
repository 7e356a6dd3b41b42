use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum ArcheryError {
    #[error("no global window available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("canvas 2d context unavailable")]
    NoCanvasContext,
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid game config: {0}")]
    InvalidConfig(String),
    #[cfg(feature = "serde_json")]
    #[error("could not parse game config")]
    Json(#[from] serde_json::Error),
}

impl From<JsValue> for ArcheryError {
    fn from(value: JsValue) -> Self {
        ArcheryError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<ArcheryError> for JsValue {
    fn from(err: ArcheryError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ArcheryError>;
