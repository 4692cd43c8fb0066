//! Loading, validation and IRI resolution for JSON-LD vocabulary documents.
//!
//! A vocabulary document carries a flat `@context` of prefixes and a `@graph`
//! of class and property definitions:
//!
//! ```rust
//! let vocab = affinidi_ld_vocab::load_document(affinidi_ld_vocab::bundled::swao()).unwrap();
//! assert_eq!(
//!     vocab.superclass_chain("swao:NestedPIDSelector").unwrap(),
//!     vec!["http://www.w3.org/ns/oa#Selector".to_string()]
//! );
//! ```

pub mod bundled;
pub mod config;
pub mod context;
pub mod error;
pub mod ns;
pub mod registry;
pub mod term;
pub mod vocabulary;

pub use config::{LoaderConfig, LoaderConfigBuilder};
pub use context::{IriKind, PrefixTable, ResolvedIri};
pub use error::{Result, VocabError};
pub use registry::VocabularyRegistry;
pub use term::{TermKind, VocabularyTerm};
pub use vocabulary::Vocabulary;

/// Load a parsed JSON-LD vocabulary document with the default configuration.
pub fn load_document(document: &serde_json::Value) -> Result<Vocabulary> {
    Vocabulary::load(document)
}

/// Parse JSON text and load it as a vocabulary document.
pub fn load_str(json: &str) -> Result<Vocabulary> {
    load_str_with_config(json, &LoaderConfig::default())
}

/// Parse JSON text and load it as a vocabulary document using `config`.
///
/// Invalid JSON is reported as [VocabError::Json].
pub fn load_str_with_config(json: &str, config: &LoaderConfig) -> Result<Vocabulary> {
    let document: serde_json::Value = serde_json::from_str(json)?;
    Vocabulary::load_with_config(&document, config)
}
