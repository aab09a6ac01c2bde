pub mod error;
pub mod fields;
pub mod text;

mod classify;
mod detail;
mod extractor;
mod list;
mod status;

pub use error::ExtractError;
pub use extractor::Extractor;
pub use status::DEFAULT_HYPHEN_EXCEPTIONS;

pub(crate) use extractor::ParseContext;
