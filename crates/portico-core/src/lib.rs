//! Core project archive, credential store, and provider pass-through for
//! Portico.

mod archive;
mod error;
mod instructions;
mod keys;
mod providers;

pub use archive::{DEFAULT_RECENT_LIMIT, ProjectArchive, split_versioned};
pub use error::PorticoError;
pub use instructions::print_instructions;
pub use keys::{DEFAULT_PROVIDERS, ProviderKeyStore};
pub use providers::{
    DEFAULT_GOOGLE_MODEL, DEFAULT_OPENAI_MODEL, GenerateError, GenerateParams, ProviderClient,
};

/// Result type for Portico operations.
pub type Result<T> = std::result::Result<T, PorticoError>;
