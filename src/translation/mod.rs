pub mod language;
mod pipeline;
mod registry;
mod request;

pub use language::{
    AUTO, FALLBACK_LANGUAGE, Language, language_name, normalize_code, static_catalog, validate,
    validate_source, validate_target,
};
pub use pipeline::Pipeline;
pub use registry::{CATALOG_TTL_HOURS, LanguageRegistry};
pub use request::{TranslationRequest, TranslationResult, now_timestamp};
