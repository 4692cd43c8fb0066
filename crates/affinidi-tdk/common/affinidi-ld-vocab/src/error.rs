/// Errors that can occur while loading or querying a vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum VocabError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Malformed @context: {0}")]
    MalformedContext(String),

    #[error("Invalid IRI for prefix '{prefix}': {value} ({reason})")]
    InvalidIri {
        prefix: String,
        value: String,
        reason: String,
    },

    #[error("Unknown prefix '{prefix}' in '{token}'{}", entry_suffix(.id))]
    UnknownPrefix {
        prefix: String,
        token: String,
        /// Id of the `@graph` entry the token came from, when known.
        id: Option<String>,
    },

    #[error("Malformed @graph entry at index {index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    #[error("Missing field '{field}' in entry {}", display_id(.id))]
    MissingField { id: Option<String>, field: String },

    #[error("Invalid field '{field}' in entry '{id}': {reason}")]
    InvalidField {
        id: String,
        field: String,
        reason: String,
    },

    #[error("Unsupported term type for '{id}': {type_iri}")]
    UnsupportedTermType { id: String, type_iri: String },

    #[error("Duplicate term id {iri} (declared by '{first}' and '{second}')")]
    DuplicateTermId {
        iri: String,
        first: String,
        second: String,
    },

    #[error("Cyclic subClassOf hierarchy at {iri}: {}", join_chain(.chain))]
    CyclicHierarchy { iri: String, chain: Vec<String> },

    #[error("Document declares {count} terms, limit is {limit}")]
    TooManyTerms { count: usize, limit: usize },

    #[error("subClassOf chain of '{id}' exceeds depth limit {limit}")]
    HierarchyTooDeep { id: String, limit: usize },

    #[error("Unknown term: {0}")]
    UnknownTerm(String),

    #[error("Unknown vocabulary: {0}")]
    UnknownVocabulary(String),

    #[error("Vocabulary already registered: {0}")]
    DuplicateVocabulary(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for vocabulary operations.
pub type Result<T> = std::result::Result<T, VocabError>;

fn display_id(id: &Option<String>) -> &str {
    id.as_deref().unwrap_or("<no id>")
}

fn entry_suffix(id: &Option<String>) -> String {
    id.as_ref()
        .map(|id| format!(" (entry {id})"))
        .unwrap_or_default()
}

fn join_chain(chain: &[String]) -> String {
    chain.join(" -> ")
}

impl VocabError {
    pub fn document(msg: impl std::fmt::Display) -> Self {
        Self::MalformedDocument(msg.to_string())
    }

    pub fn context(msg: impl std::fmt::Display) -> Self {
        Self::MalformedContext(msg.to_string())
    }

    pub(crate) fn missing(id: Option<&str>, field: &str) -> Self {
        Self::MissingField {
            id: id.map(str::to_string),
            field: field.to_string(),
        }
    }

    /// Attach the id of the `@graph` entry being validated.
    pub(crate) fn in_entry(self, entry_id: &str) -> Self {
        match self {
            Self::UnknownPrefix {
                prefix,
                token,
                id: None,
            } => Self::UnknownPrefix {
                prefix,
                token,
                id: Some(entry_id.to_string()),
            },
            other => other,
        }
    }

    pub(crate) fn invalid_field(id: &str, field: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidField {
            id: id.to_string(),
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
