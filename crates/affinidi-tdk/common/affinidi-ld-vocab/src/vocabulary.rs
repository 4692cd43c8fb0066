use std::collections::{HashMap, HashSet, VecDeque};

use serde_json::Value;

use crate::config::LoaderConfig;
use crate::context::{PrefixTable, ResolvedIri};
use crate::error::{Result, VocabError};
use crate::term::VocabularyTerm;

/// An immutable, validated vocabulary document.
///
/// Terms are stored in document order and indexed by local id and by resolved
/// IRI. `subClassOf` edges are kept as IRIs; a target that is not defined in
/// this document is an opaque external class.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    prefixes: PrefixTable,
    terms: Vec<VocabularyTerm>,
    by_iri: HashMap<String, usize>,
    by_local_id: HashMap<String, usize>,
    /// parent IRI -> indexes of terms declaring it as their direct superclass
    subclasses: HashMap<String, Vec<usize>>,
    max_chain_depth: Option<usize>,
}

impl Vocabulary {
    /// Load a JSON-LD vocabulary document using the default [LoaderConfig].
    pub fn load(document: &Value) -> Result<Self> {
        Self::load_with_config(document, &LoaderConfig::default())
    }

    /// Load a JSON-LD vocabulary document.
    ///
    /// Only `@context` and `@graph` are read; other top-level keys are ignored.
    /// The first error aborts the load.
    pub fn load_with_config(document: &Value, config: &LoaderConfig) -> Result<Self> {
        let obj = document
            .as_object()
            .ok_or_else(|| VocabError::document("document is not a JSON object"))?;

        let context = obj
            .get("@context")
            .ok_or_else(|| VocabError::document("missing @context"))?;
        let graph = obj
            .get("@graph")
            .ok_or_else(|| VocabError::document("missing @graph"))?
            .as_array()
            .ok_or_else(|| VocabError::document("@graph is not an array"))?;

        if graph.len() > config.max_terms() {
            return Err(VocabError::TooManyTerms {
                count: graph.len(),
                limit: config.max_terms(),
            });
        }

        let prefixes = PrefixTable::load_with_config(context, config)?;

        let terms = graph
            .iter()
            .enumerate()
            .map(|(index, entry)| VocabularyTerm::from_entry(index, entry, &prefixes, config))
            .collect::<Result<Vec<_>>>()?;

        let vocabulary = Self::build(prefixes, terms, config)?;
        tracing::debug!(
            terms = vocabulary.len(),
            prefixes = vocabulary.prefixes.len(),
            "vocabulary loaded"
        );
        Ok(vocabulary)
    }

    /// Index validated terms.
    ///
    /// Fails on duplicate resolved IRIs and on any `subClassOf` cycle.
    pub fn build(
        prefixes: PrefixTable,
        terms: Vec<VocabularyTerm>,
        config: &LoaderConfig,
    ) -> Result<Self> {
        if terms.len() > config.max_terms() {
            return Err(VocabError::TooManyTerms {
                count: terms.len(),
                limit: config.max_terms(),
            });
        }

        let mut by_iri: HashMap<String, usize> = HashMap::with_capacity(terms.len());
        let mut by_local_id: HashMap<String, usize> = HashMap::with_capacity(terms.len());
        let mut subclasses: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, term) in terms.iter().enumerate() {
            if let Some(&first) = by_iri.get(term.iri()) {
                return Err(VocabError::DuplicateTermId {
                    iri: term.iri().to_string(),
                    first: terms[first].local_id.clone(),
                    second: term.local_id.clone(),
                });
            }
            by_iri.insert(term.iri().to_string(), idx);
            by_local_id.insert(term.local_id.clone(), idx);

            if let Some(ref parent) = term.sub_class_of {
                subclasses.entry(parent.iri.clone()).or_default().push(idx);
            }
        }

        let vocabulary = Self {
            prefixes,
            terms,
            by_iri,
            by_local_id,
            subclasses,
            max_chain_depth: config.max_chain_depth(),
        };

        for idx in 0..vocabulary.terms.len() {
            vocabulary.chain_from(idx)?;
        }

        Ok(vocabulary)
    }

    /// Look up a term by the id it was declared with. Also accepts any
    /// prefixed name that resolves to a defined term.
    pub fn get_by_local_id(&self, id: &str) -> Option<&VocabularyTerm> {
        self.position(id).map(|idx| &self.terms[idx])
    }

    /// Look up a term by its resolved IRI.
    pub fn get_by_iri(&self, iri: &str) -> Option<&VocabularyTerm> {
        self.by_iri.get(iri).map(|&idx| &self.terms[idx])
    }

    /// Look up a term by local id, prefixed name, absolute IRI or bare local
    /// name (`NestedPIDSelector`). A bare name only matches when exactly one
    /// term carries it.
    pub fn find_term(&self, token: &str) -> Option<&VocabularyTerm> {
        if let Some(idx) = self.position(token) {
            return Some(&self.terms[idx]);
        }
        if token.contains(':') {
            return None;
        }
        let mut matches = self.terms.iter().filter(|t| t.local_name() == token);
        match (matches.next(), matches.next()) {
            (Some(term), None) => Some(term),
            _ => None,
        }
    }

    /// Superclass IRIs of a term, nearest first, excluding the term itself.
    ///
    /// Stops at the first class that is not defined in this document.
    pub fn superclass_chain(&self, id: &str) -> Result<Vec<String>> {
        let idx = self
            .position(id)
            .ok_or_else(|| VocabError::UnknownTerm(id.to_string()))?;
        self.chain_from(idx)
    }

    /// Resolved IRI of a class defined in this vocabulary.
    pub fn resolve_selector_type(&self, local_id_or_iri: &str) -> Option<ResolvedIri> {
        self.find_term(local_id_or_iri)
            .filter(|term| term.is_class())
            .map(|term| term.resolved_iri.clone())
    }

    /// True when `ancestor` is `candidate` itself or appears in its superclass chain.
    pub fn is_subclass_of(&self, candidate: &str, ancestor: &str) -> bool {
        let Some(ancestor_iri) = self.resolve_token(ancestor) else {
            return false;
        };

        match self.find_term(candidate) {
            Some(term) => {
                term.iri() == ancestor_iri
                    || self
                        .superclass_chain(&term.local_id)
                        .is_ok_and(|chain| chain.contains(&ancestor_iri))
            }
            None => self
                .resolve_token(candidate)
                .is_some_and(|iri| iri == ancestor_iri),
        }
    }

    /// Terms that directly declare `parent` as their superclass.
    pub fn direct_subclasses(&self, parent: &str) -> Vec<&VocabularyTerm> {
        let Some(parent_iri) = self.resolve_token(parent) else {
            return Vec::new();
        };
        self.subclasses
            .get(&parent_iri)
            .map(|children| children.iter().map(|&idx| &self.terms[idx]).collect())
            .unwrap_or_default()
    }

    /// All terms below `parent`, breadth first, not including `parent` itself.
    pub fn subclasses_of(&self, parent: &str) -> Vec<&VocabularyTerm> {
        let Some(parent_iri) = self.resolve_token(parent) else {
            return Vec::new();
        };

        let mut seen: HashSet<usize> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([parent_iri.as_str()]);
        let mut result = Vec::new();

        while let Some(iri) = queue.pop_front() {
            for &idx in self.subclasses.get(iri).into_iter().flatten() {
                if seen.insert(idx) {
                    let term = &self.terms[idx];
                    result.push(term);
                    queue.push_back(term.iri());
                }
            }
        }
        result
    }

    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    /// Terms in document order.
    pub fn terms(&self) -> &[VocabularyTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Absolute IRI for a token: a defined term's IRI, or prefix resolution.
    pub(crate) fn resolve_token(&self, token: &str) -> Option<String> {
        if let Some(term) = self.find_term(token) {
            return Some(term.iri().to_string());
        }
        self.prefixes.resolve(token).ok().map(|r| r.iri)
    }

    fn position(&self, token: &str) -> Option<usize> {
        if let Some(&idx) = self.by_local_id.get(token) {
            return Some(idx);
        }
        if let Some(&idx) = self.by_iri.get(token) {
            return Some(idx);
        }
        let resolved = self.prefixes.resolve(token).ok()?;
        self.by_iri.get(&resolved.iri).copied()
    }

    fn chain_from(&self, start: usize) -> Result<Vec<String>> {
        let start_term = &self.terms[start];
        let mut visited: HashSet<&str> = HashSet::from([start_term.iri()]);
        let mut chain: Vec<String> = Vec::new();
        let mut current = start_term;

        while let Some(ref parent) = current.sub_class_of {
            if !visited.insert(parent.iri.as_str()) {
                let mut trail = Vec::with_capacity(chain.len() + 2);
                trail.push(start_term.iri().to_string());
                trail.extend(chain);
                trail.push(parent.iri.clone());
                return Err(VocabError::CyclicHierarchy {
                    iri: parent.iri.clone(),
                    chain: trail,
                });
            }
            chain.push(parent.iri.clone());

            match self.by_iri.get(&parent.iri) {
                Some(&idx) => current = &self.terms[idx],
                None => break,
            }
        }

        // The visited set bounds the walk, so the depth cap only ever applies
        // to acyclic chains.
        if let Some(limit) = self.max_chain_depth
            && chain.len() > limit
        {
            return Err(VocabError::HierarchyTooDeep {
                id: start_term.local_id.clone(),
                limit,
            });
        }

        Ok(chain)
    }
}
