//! Loader configuration.
//!
//! Call the [LoaderConfigBuilder] to create a new configuration.
//!
//! Example: defaults
//! ```rust
//! use affinidi_ld_vocab::config::LoaderConfigBuilder;
//! let config = LoaderConfigBuilder::default().build();
//! ```
//!
//! Example: accepting SKOS concepts as classes with a smaller graph limit
//! ```rust
//! use affinidi_ld_vocab::config::LoaderConfigBuilder;
//! use affinidi_ld_vocab::TermKind;
//! let config = LoaderConfigBuilder::default()
//!     .with_term_kind("http://www.w3.org/2004/02/skos/core#Concept", TermKind::Class)
//!     .with_max_terms(500)
//!     .build();
//! ```

use std::collections::HashMap;

use crate::ns::{owl, rdf, rdfs};
use crate::term::TermKind;

/// Configuration applied while loading a vocabulary document.
///
/// Use the [LoaderConfigBuilder] to create a new configuration.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    pub(crate) term_kinds: HashMap<String, TermKind>,
    pub(crate) max_terms: usize,
    pub(crate) max_chain_depth: Option<usize>,
    pub(crate) allow_vocab: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfigBuilder::default().build()
    }
}

impl LoaderConfig {
    /// Term kind for a resolved `type` IRI, if the IRI is allow-listed.
    pub fn term_kind(&self, type_iri: &str) -> Option<TermKind> {
        self.term_kinds.get(type_iri).copied()
    }

    pub fn max_terms(&self) -> usize {
        self.max_terms
    }

    /// Optional cap on subClassOf chain length. `None` means unlimited.
    pub fn max_chain_depth(&self) -> Option<usize> {
        self.max_chain_depth
    }

    pub fn allow_vocab(&self) -> bool {
        self.allow_vocab
    }
}

/// Builder for [LoaderConfig].
///
/// - term_kinds: allow-listed `type` IRIs (default: rdfs:Class, owl:Class, rdf:Property and the OWL property types).
/// - max_terms: maximum number of `@graph` entries (default: 10_000).
/// - max_chain_depth: maximum subClassOf chain length (default: unlimited).
/// - allow_vocab: honour `@vocab` in the context (default: true).
pub struct LoaderConfigBuilder {
    term_kinds: HashMap<String, TermKind>,
    max_terms: usize,
    max_chain_depth: Option<usize>,
    allow_vocab: bool,
}

impl Default for LoaderConfigBuilder {
    fn default() -> Self {
        let term_kinds = [
            (rdfs::CLASS, TermKind::Class),
            (owl::CLASS, TermKind::Class),
            (rdf::PROPERTY, TermKind::Property),
            (owl::OBJECT_PROPERTY, TermKind::Property),
            (owl::DATATYPE_PROPERTY, TermKind::Property),
            (owl::ANNOTATION_PROPERTY, TermKind::Property),
        ]
        .into_iter()
        .map(|(iri, kind)| (iri.to_string(), kind))
        .collect();

        Self {
            term_kinds,
            max_terms: 10_000,
            max_chain_depth: None,
            allow_vocab: true,
        }
    }
}

impl LoaderConfigBuilder {
    /// Allow an additional `type` IRI and map it to a term kind.
    pub fn with_term_kind(mut self, type_iri: &str, kind: TermKind) -> Self {
        self.term_kinds.insert(type_iri.to_string(), kind);
        self
    }

    /// Set the maximum number of `@graph` entries.
    /// Default: 10_000
    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }

    /// Reject terms whose subClassOf chain is longer than `max_chain_depth`.
    /// Cycles are still reported as cycles.
    /// Default: unlimited
    pub fn with_max_chain_depth(mut self, max_chain_depth: usize) -> Self {
        self.max_chain_depth = Some(max_chain_depth);
        self
    }

    /// Enable or disable `@vocab` expansion of bare terms.
    /// Default: true
    pub fn with_vocab(mut self, allow_vocab: bool) -> Self {
        self.allow_vocab = allow_vocab;
        self
    }

    /// Build the [LoaderConfig].
    pub fn build(self) -> LoaderConfig {
        LoaderConfig {
            term_kinds: self.term_kinds,
            max_terms: self.max_terms,
            max_chain_depth: self.max_chain_depth,
            allow_vocab: self.allow_vocab,
        }
    }
}
