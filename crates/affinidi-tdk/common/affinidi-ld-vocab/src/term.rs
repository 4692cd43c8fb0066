use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::LoaderConfig;
use crate::context::{PrefixTable, ResolvedIri};
use crate::error::{Result, VocabError};
use crate::ns::{rdf, rdfs};

/// The kind of vocabulary term, derived from its allow-listed `type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TermKind {
    Class,
    Property,
}

/// A validated `@graph` entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyTerm {
    /// The id as written in the document, e.g. `swao:NestedPIDSelector`.
    pub local_id: String,
    pub resolved_iri: ResolvedIri,
    pub label: String,
    pub comment: Option<String>,
    pub kind: TermKind,
    /// Resolved `type` IRIs other than the one that determined `kind`.
    pub additional_types: Vec<String>,
    pub sub_class_of: Option<ResolvedIri>,
    pub defined_by: Option<ResolvedIri>,
    /// Fields not recognised by the validator, kept verbatim.
    pub extensions: Map<String, Value>,
}

// Recognised fields and their accepted spellings, in order of precedence;
// the first is canonical.
const ID: &[&str] = &["id", "@id"];
const TYPE: &[&str] = &["type", "@type", "rdf:type", rdf::TYPE];
const LABEL: &[&str] = &["label", "rdfs:label", rdfs::LABEL];
const COMMENT: &[&str] = &["comment", "rdfs:comment", rdfs::COMMENT];
const SUB_CLASS_OF: &[&str] = &["subClassOf", "rdfs:subClassOf", rdfs::SUB_CLASS_OF];
const DEFINED_BY: &[&str] = &[
    "definedBy",
    "isDefinedBy",
    "rdfs:isDefinedBy",
    rdfs::IS_DEFINED_BY,
];

const RECOGNISED: &[&[&str]] = &[ID, TYPE, LABEL, COMMENT, SUB_CLASS_OF, DEFINED_BY];

impl VocabularyTerm {
    /// Validate one `@graph` entry against the vocabulary-term shape.
    ///
    /// `index` is the entry's position in `@graph`, used for error reporting
    /// when the entry has no usable id.
    pub fn from_entry(
        index: usize,
        entry: &Value,
        table: &PrefixTable,
        config: &LoaderConfig,
    ) -> Result<Self> {
        let obj = entry.as_object().ok_or_else(|| VocabError::MalformedEntry {
            index,
            reason: format!("expected an object, got {entry}"),
        })?;

        let local_id = match field(obj, ID) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => {
                return Err(VocabError::MalformedEntry {
                    index,
                    reason: format!("'id' must be a string, got {other}"),
                });
            }
            None => return Err(VocabError::missing(None, ID[0])),
        };
        let id = local_id.as_str();

        let type_value = field(obj, TYPE).ok_or_else(|| VocabError::missing(Some(id), TYPE[0]))?;
        let label = string_field(obj, LABEL, id)?
            .ok_or_else(|| VocabError::missing(Some(id), LABEL[0]))?;
        let comment = string_field(obj, COMMENT, id)?;

        let resolve = |token: &str| table.resolve(token).map_err(|e| e.in_entry(id));
        let resolved_iri = resolve(id)?;

        let type_tokens = match type_value {
            Value::String(t) => vec![t.as_str()],
            Value::Array(arr) if !arr.is_empty() => arr
                .iter()
                .map(|v| {
                    v.as_str()
                        .ok_or_else(|| VocabError::invalid_field(id, TYPE[0], "expected strings"))
                })
                .collect::<Result<Vec<_>>>()?,
            _ => {
                return Err(VocabError::invalid_field(
                    id,
                    TYPE[0],
                    "expected a string or a non-empty array of strings",
                ));
            }
        };

        let mut kind = None;
        let mut additional_types = Vec::new();
        for token in &type_tokens {
            let type_iri = resolve(token)?;
            match (kind, config.term_kind(&type_iri.iri)) {
                (None, Some(k)) => kind = Some(k),
                _ => additional_types.push(type_iri.iri),
            }
        }
        let kind = kind.ok_or_else(|| VocabError::UnsupportedTermType {
            id: local_id.clone(),
            type_iri: additional_types.join(", "),
        })?;

        let sub_class_of = string_field(obj, SUB_CLASS_OF, id)?
            .map(|t| resolve(&t))
            .transpose()?;
        let defined_by = string_field(obj, DEFINED_BY, id)?
            .map(|t| resolve(&t))
            .transpose()?;

        // Only the winning spelling of each recognised field is consumed;
        // everything else, including shadowed alternative spellings, is kept.
        let consumed: Vec<&str> = RECOGNISED
            .iter()
            .filter_map(|names| used_key(obj, names))
            .collect();
        let extensions = obj
            .iter()
            .filter(|(k, _)| !consumed.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(VocabularyTerm {
            local_id,
            resolved_iri,
            label,
            comment,
            kind,
            additional_types,
            sub_class_of,
            defined_by,
            extensions,
        })
    }

    pub fn iri(&self) -> &str {
        &self.resolved_iri.iri
    }

    /// The part of the local id after the prefix, e.g. `NestedPIDSelector`.
    pub fn local_name(&self) -> &str {
        self.local_id
            .split_once(':')
            .map(|(_, name)| name)
            .unwrap_or(&self.local_id)
    }

    pub fn is_class(&self) -> bool {
        self.kind == TermKind::Class
    }
}

fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    used_key(obj, names).and_then(|name| obj.get(name))
}

/// The spelling of a field that the entry actually uses.
fn used_key<'a>(obj: &Map<String, Value>, names: &[&'a str]) -> Option<&'a str> {
    names.iter().copied().find(|name| obj.contains_key(*name))
}

fn string_field(obj: &Map<String, Value>, names: &[&str], id: &str) -> Result<Option<String>> {
    match field(obj, names) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(VocabError::invalid_field(
            id,
            names[0],
            format!("expected a string, got {other}"),
        )),
    }
}
