use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::LoaderConfig;
use crate::error::{Result, VocabError};

/// Schemes that form absolute IRIs without a `//` authority part.
const OPAQUE_SCHEMES: &[&str] = &[
    "urn", "did", "tag", "mailto", "data", "tel", "cid", "mid", "blob",
];

/// How a [ResolvedIri] was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IriKind {
    /// The token already was an absolute IRI.
    Absolute,
    /// A `prefix:suffix` token expanded through the prefix table.
    Expanded,
    /// A bare term expanded through `@vocab`.
    Vocab,
}

/// An absolute IRI together with the way it was resolved.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedIri {
    pub iri: String,
    pub kind: IriKind,
}

impl ResolvedIri {
    pub fn new(iri: impl Into<String>, kind: IriKind) -> Self {
        Self {
            iri: iri.into(),
            kind,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.iri
    }
}

impl fmt::Display for ResolvedIri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iri)
    }
}

impl PartialEq<str> for ResolvedIri {
    fn eq(&self, other: &str) -> bool {
        self.iri == other
    }
}

impl PartialEq<&str> for ResolvedIri {
    fn eq(&self, other: &&str) -> bool {
        self.iri == *other
    }
}

/// Prefix → base IRI mapping built from a `@context` object.
///
/// Immutable once loaded. Duplicate prefixes cannot survive JSON parsing:
/// the last occurrence in the source text wins.
#[derive(Clone, Debug, Default)]
pub struct PrefixTable {
    prefixes: HashMap<String, String>,
    vocab: Option<String>,
}

impl PrefixTable {
    /// Load a `@context` value using the default [LoaderConfig].
    pub fn load(raw: &Value) -> Result<Self> {
        Self::load_with_config(raw, &LoaderConfig::default())
    }

    /// Load a `@context` value. Only a flat object of prefix → IRI strings is accepted.
    pub fn load_with_config(raw: &Value, config: &LoaderConfig) -> Result<Self> {
        let obj = raw.as_object().ok_or_else(|| {
            VocabError::context(format!("@context must be an object, got {}", json_kind(raw)))
        })?;

        let mut table = PrefixTable::default();

        for (key, value) in obj {
            if key.starts_with('@') {
                if key == "@vocab" && config.allow_vocab() {
                    let iri = value.as_str().ok_or_else(|| {
                        VocabError::context(format!("@vocab must be a string, got {value}"))
                    })?;
                    validate_base_iri(key, iri)?;
                    table.vocab = Some(iri.to_string());
                } else {
                    tracing::debug!(keyword = %key, "skipping @context keyword");
                }
                continue;
            }

            let iri = value.as_str().ok_or_else(|| {
                VocabError::context(format!(
                    "prefix '{key}' must map to a string, got {}",
                    json_kind(value)
                ))
            })?;
            validate_base_iri(key, iri)?;
            table.prefixes.insert(key.clone(), iri.to_string());
        }

        Ok(table)
    }

    /// Resolve a prefixed name, bare term or absolute IRI to an absolute IRI.
    ///
    /// `"swao:"` resolves to exactly the `swao` base IRI.
    pub fn resolve(&self, token: &str) -> Result<ResolvedIri> {
        if token.contains("://") {
            return Ok(ResolvedIri::new(token, IriKind::Absolute));
        }

        if let Some((prefix, suffix)) = token.split_once(':') {
            if let Some(base) = self.prefixes.get(prefix) {
                return Ok(ResolvedIri::new(format!("{base}{suffix}"), IriKind::Expanded));
            }
            if OPAQUE_SCHEMES.contains(&prefix) {
                return Ok(ResolvedIri::new(token, IriKind::Absolute));
            }
            return Err(VocabError::UnknownPrefix {
                prefix: prefix.to_string(),
                token: token.to_string(),
                id: None,
            });
        }

        match self.vocab {
            Some(ref vocab) if !token.is_empty() => {
                Ok(ResolvedIri::new(format!("{vocab}{token}"), IriKind::Vocab))
            }
            _ => Err(VocabError::UnknownPrefix {
                prefix: String::new(),
                token: token.to_string(),
                id: None,
            }),
        }
    }

    /// Base IRI for a prefix.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.prefixes.contains_key(prefix)
    }

    /// The `@vocab` IRI, when the context declared one.
    pub fn vocab(&self) -> Option<&str> {
        self.vocab.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Check that a context value is an absolute IRI with scheme and authority.
fn validate_base_iri(prefix: &str, value: &str) -> Result<()> {
    let invalid = |reason: String| VocabError::InvalidIri {
        prefix: prefix.to_string(),
        value: value.to_string(),
        reason,
    };

    if let Some(c) = value.chars().find(|c| {
        c.is_whitespace() || matches!(c, '{' | '}' | '<' | '>' | '"' | '\\' | '^' | '`' | '|')
    }) {
        return Err(invalid(format!("illegal character {c:?}")));
    }

    let parsed = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !parsed.has_host() || parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing authority".to_string()));
    }

    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn swao_table() -> PrefixTable {
        PrefixTable::load(&json!({
            "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
            "oa": "http://www.w3.org/ns/oa#",
            "swao": "http://annotation.clariah.nl/ns/swao#"
        }))
        .unwrap()
    }

    #[test]
    fn expand_prefixed_name() {
        let table = swao_table();
        let resolved = table.resolve("swao:NestedPIDSelector").unwrap();
        assert_eq!(
            resolved.iri,
            "http://annotation.clariah.nl/ns/swao#NestedPIDSelector"
        );
        assert_eq!(resolved.kind, IriKind::Expanded);
    }

    #[test]
    fn bare_prefix_is_namespace() {
        let table = swao_table();
        let resolved = table.resolve("swao:").unwrap();
        assert_eq!(resolved.iri, "http://annotation.clariah.nl/ns/swao#");
        assert_eq!(resolved.kind, IriKind::Expanded);
    }

    #[test]
    fn absolute_iri_unchanged() {
        let table = swao_table();
        let resolved = table.resolve("http://www.w3.org/ns/oa#Selector").unwrap();
        assert_eq!(resolved.iri, "http://www.w3.org/ns/oa#Selector");
        assert_eq!(resolved.kind, IriKind::Absolute);

        let urn = table.resolve("urn:uuid:1234").unwrap();
        assert_eq!(urn.kind, IriKind::Absolute);
    }

    #[test]
    fn resolve_is_deterministic() {
        let table = swao_table();
        for token in ["swao:NestedPIDSelector", "oa:Selector", "rdfs:", "https://x.org/a"] {
            let first = table.resolve(token).unwrap();
            let second = table.resolve(token).unwrap();
            assert_eq!(first, second);
            // Re-resolving the output is a no-op.
            assert_eq!(table.resolve(&first.iri).unwrap().iri, first.iri);
        }
    }

    #[test]
    fn unknown_prefix() {
        let table = swao_table();
        match table.resolve("dc:title") {
            Err(VocabError::UnknownPrefix { prefix, token, id }) => {
                assert!(id.is_none());
                assert_eq!(prefix, "dc");
                assert_eq!(token, "dc:title");
            }
            other => panic!("expected UnknownPrefix, got {other:?}"),
        }
        assert!(matches!(
            table.resolve("Selector"),
            Err(VocabError::UnknownPrefix { prefix, .. }) if prefix.is_empty()
        ));
    }

    #[test]
    fn vocab_expands_bare_terms() {
        let table = PrefixTable::load(&json!({
            "@vocab": "http://www.w3.org/ns/oa#",
            "@version": 1.1
        }))
        .unwrap();
        let resolved = table.resolve("Selector").unwrap();
        assert_eq!(resolved.iri, "http://www.w3.org/ns/oa#Selector");
        assert_eq!(resolved.kind, IriKind::Vocab);
    }

    #[test]
    fn vocab_ignored_when_disabled() {
        let config = crate::config::LoaderConfigBuilder::default()
            .with_vocab(false)
            .build();
        let table =
            PrefixTable::load_with_config(&json!({"@vocab": "http://www.w3.org/ns/oa#"}), &config)
                .unwrap();
        assert!(table.vocab().is_none());
        assert!(table.resolve("Selector").is_err());
    }

    #[test]
    fn non_string_value_is_malformed() {
        let err = PrefixTable::load(&json!({"oa": {"@id": "http://www.w3.org/ns/oa#"}}))
            .unwrap_err();
        assert!(matches!(err, VocabError::MalformedContext(_)));

        let err = PrefixTable::load(&json!(["http://www.w3.org/ns/anno.jsonld"])).unwrap_err();
        assert!(matches!(err, VocabError::MalformedContext(_)));
    }

    #[test]
    fn invalid_iris_rejected() {
        for value in [
            "not an iri",
            "swao-namespace",
            "urn:example:ns",
            "http://example.org/{placeholder}#",
        ] {
            let err = PrefixTable::load(&json!({ "ex": value })).unwrap_err();
            match err {
                VocabError::InvalidIri { prefix, value: v, .. } => {
                    assert_eq!(prefix, "ex");
                    assert_eq!(v, value);
                }
                other => panic!("expected InvalidIri for {value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn last_duplicate_wins() {
        let raw: Value = serde_json::from_str(
            r#"{"ex": "http://one.example.org/", "ex": "http://two.example.org/"}"#,
        )
        .unwrap();
        let table = PrefixTable::load(&raw).unwrap();
        assert_eq!(table.get("ex"), Some("http://two.example.org/"));
        assert_eq!(table.len(), 1);
    }
}
