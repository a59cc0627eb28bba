pub type CardwrightResult<T> = Result<T, CardwrightError>;

#[derive(thiserror::Error, Debug)]
pub enum CardwrightError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("asset not found: {0}")]
    Asset(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardwrightError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
