use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("language \"{language}\" is not configured in the locale map")]
    UnknownLanguage { language: String },
}
