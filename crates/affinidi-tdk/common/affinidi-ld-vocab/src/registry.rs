//! A registry of loaded vocabularies.
//!
//! The registry is an ordinary value: create it at startup, pass it (or an
//! `Arc` of it) to whatever needs lookups, and drop it or call
//! [VocabularyRegistry::clear] on shutdown. Lookups that span vocabularies
//! consult them in registration order.
//!
//! ```rust
//! use affinidi_ld_vocab::registry::VocabularyRegistry;
//! let registry = VocabularyRegistry::with_bundled().unwrap();
//! assert!(registry.is_subclass_of("NestedPIDSelector", "http://www.w3.org/ns/oa#Selector"));
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::bundled;
use crate::config::LoaderConfig;
use crate::context::ResolvedIri;
use crate::error::{Result, VocabError};
use crate::term::VocabularyTerm;
use crate::vocabulary::Vocabulary;

#[derive(Debug, Default)]
pub struct VocabularyRegistry {
    vocabularies: Vec<(String, Arc<Vocabulary>)>,
    config: LoaderConfig,
}

impl VocabularyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose [VocabularyRegistry::load] uses the given configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self {
            vocabularies: Vec::new(),
            config,
        }
    }

    /// Registry pre-populated with the vocabularies bundled in this crate.
    pub fn with_bundled() -> Result<Self> {
        let mut registry = Self::new();
        for (name, document) in bundled::bundled_vocabularies() {
            registry.load(name, document)?;
        }
        Ok(registry)
    }

    /// Add a vocabulary under a new name.
    pub fn register(&mut self, name: &str, vocabulary: Vocabulary) -> Result<Arc<Vocabulary>> {
        if self.position(name).is_some() {
            return Err(VocabError::DuplicateVocabulary(name.to_string()));
        }
        let vocabulary = Arc::new(vocabulary);
        self.vocabularies
            .push((name.to_string(), Arc::clone(&vocabulary)));
        tracing::debug!(name, terms = vocabulary.len(), "vocabulary registered");
        Ok(vocabulary)
    }

    /// Add or swap a vocabulary, returning the one it replaced.
    pub fn replace(&mut self, name: &str, vocabulary: Vocabulary) -> Option<Arc<Vocabulary>> {
        let vocabulary = Arc::new(vocabulary);
        match self.position(name) {
            Some(pos) => {
                tracing::warn!(name, "replacing registered vocabulary");
                Some(std::mem::replace(&mut self.vocabularies[pos].1, vocabulary))
            }
            None => {
                self.vocabularies.push((name.to_string(), vocabulary));
                None
            }
        }
    }

    /// Load a document and register it. Nothing is registered if loading fails.
    pub fn load(&mut self, name: &str, document: &Value) -> Result<Arc<Vocabulary>> {
        if self.position(name).is_some() {
            return Err(VocabError::DuplicateVocabulary(name.to_string()));
        }
        let vocabulary = Vocabulary::load_with_config(document, &self.config)?;
        self.register(name, vocabulary)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Vocabulary>> {
        self.position(name)
            .map(|pos| Arc::clone(&self.vocabularies[pos].1))
    }

    pub fn unregister(&mut self, name: &str) -> Result<Arc<Vocabulary>> {
        let pos = self
            .position(name)
            .ok_or_else(|| VocabError::UnknownVocabulary(name.to_string()))?;
        let (_, vocabulary) = self.vocabularies.remove(pos);
        tracing::debug!(name, "vocabulary unregistered");
        Ok(vocabulary)
    }

    /// Drop every registered vocabulary.
    pub fn clear(&mut self) {
        self.vocabularies.clear();
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vocabularies.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.vocabularies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabularies.is_empty()
    }

    /// First registered term matching `token`, with the name of its vocabulary.
    pub fn find_term(&self, token: &str) -> Option<(&str, &VocabularyTerm)> {
        self.vocabularies.iter().find_map(|(name, vocab)| {
            vocab.find_term(token).map(|term| (name.as_str(), term))
        })
    }

    pub fn resolve_selector_type(&self, token: &str) -> Option<ResolvedIri> {
        self.vocabularies
            .iter()
            .find_map(|(_, vocab)| vocab.resolve_selector_type(token))
    }

    /// Superclass chain that continues into other registered vocabularies
    /// whenever it reaches a class one of them defines.
    pub fn superclass_chain(&self, token: &str) -> Result<Vec<String>> {
        let (_, term) = self
            .find_term(token)
            .ok_or_else(|| VocabError::UnknownTerm(token.to_string()))?;

        let mut visited: HashSet<String> = HashSet::from([term.iri().to_string()]);
        let mut chain: Vec<String> = Vec::new();
        let mut segment = self.chain_segment(term.iri())?;

        loop {
            for iri in segment {
                if !visited.insert(iri.clone()) {
                    let mut trail = vec![term.iri().to_string()];
                    trail.extend(chain);
                    trail.push(iri.clone());
                    tracing::warn!(iri = %iri, "cross-vocabulary subClassOf cycle");
                    return Err(VocabError::CyclicHierarchy { iri, chain: trail });
                }
                chain.push(iri);
            }

            // The last IRI is external to the vocabulary that produced it;
            // another vocabulary may define it.
            let Some(last) = chain.last() else {
                break;
            };
            if self.defining_vocabulary(last).is_none() {
                break;
            }
            segment = self.chain_segment(last)?;
            if segment.is_empty() {
                break;
            }
        }

        if let Some(limit) = self.config.max_chain_depth()
            && chain.len() > limit
        {
            return Err(VocabError::HierarchyTooDeep {
                id: term.local_id.clone(),
                limit,
            });
        }

        Ok(chain)
    }

    /// True when `ancestor` is `candidate` itself or appears in its
    /// cross-vocabulary superclass chain.
    pub fn is_subclass_of(&self, candidate: &str, ancestor: &str) -> bool {
        let Some(ancestor_iri) = self.resolve_token(ancestor) else {
            return false;
        };

        match self.find_term(candidate) {
            Some((_, term)) => {
                if term.iri() == ancestor_iri {
                    return true;
                }
                match self.superclass_chain(candidate) {
                    Ok(chain) => chain.contains(&ancestor_iri),
                    Err(e) => {
                        tracing::warn!(candidate, error = %e, "superclass walk failed");
                        false
                    }
                }
            }
            None => self
                .resolve_token(candidate)
                .is_some_and(|iri| iri == ancestor_iri),
        }
    }

    fn resolve_token(&self, token: &str) -> Option<String> {
        if token.contains("://") {
            return Some(token.to_string());
        }
        self.vocabularies
            .iter()
            .find_map(|(_, vocab)| vocab.resolve_token(token))
    }

    fn defining_vocabulary(&self, iri: &str) -> Option<&Vocabulary> {
        self.vocabularies
            .iter()
            .map(|(_, vocab)| vocab.as_ref())
            .find(|vocab| vocab.get_by_iri(iri).is_some())
    }

    /// Chain of `iri` within the vocabulary that defines it.
    fn chain_segment(&self, iri: &str) -> Result<Vec<String>> {
        match self.defining_vocabulary(iri) {
            Some(vocab) => vocab.superclass_chain(iri),
            None => Ok(Vec::new()),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.vocabularies.iter().position(|(n, _)| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ns;
    use serde_json::json;

    /// A vocabulary that refines `oa:Selector` so the SWAO chain can continue into it.
    fn oa_document() -> Value {
        json!({
            "@context": {
                "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
                "oa": "http://www.w3.org/ns/oa#",
                "ex": "http://example.org/ns#"
            },
            "@graph": [
                {"id": "oa:Selector", "type": "rdfs:Class", "label": "Selector", "subClassOf": "ex:Part"},
                {"id": "ex:Part", "type": "rdfs:Class", "label": "Part", "subClassOf": "ex:Resource"}
            ]
        })
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = VocabularyRegistry::with_bundled().unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["swao"]);
        assert!(registry.get("swao").is_some());
        assert!(registry.get("oa").is_none());
        assert_eq!(
            registry.resolve_selector_type("NestedPIDSelector").unwrap().iri,
            ns::swao::NESTED_PID_SELECTOR
        );

        let err = registry.load("swao", bundled::swao()).unwrap_err();
        assert!(matches!(err, VocabError::DuplicateVocabulary(_)));
    }

    #[test]
    fn failed_load_registers_nothing() {
        let mut registry = VocabularyRegistry::new();
        let err = registry
            .load("bad", &json!({"@context": {"ex": "nope"}, "@graph": []}))
            .unwrap_err();
        assert!(matches!(err, VocabError::InvalidIri { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn chain_crosses_vocabularies() {
        let mut registry = VocabularyRegistry::with_bundled().unwrap();
        assert_eq!(
            registry.superclass_chain("swao:NestedPIDSelector").unwrap(),
            vec![ns::oa::SELECTOR.to_string()]
        );

        registry.load("oa", &oa_document()).unwrap();
        assert_eq!(
            registry.superclass_chain("swao:NestedPIDSelector").unwrap(),
            vec![
                ns::oa::SELECTOR.to_string(),
                "http://example.org/ns#Part".to_string(),
                "http://example.org/ns#Resource".to_string(),
            ]
        );
        assert!(registry.is_subclass_of("swao:NestedPIDSelector", "http://example.org/ns#Resource"));
        assert!(!registry.is_subclass_of("oa:Selector", ns::swao::NESTED_PID_SELECTOR));
    }

    #[test]
    fn cross_vocabulary_cycle() {
        let mut registry = VocabularyRegistry::new();
        registry
            .load(
                "a",
                &json!({
                    "@context": {"rdfs": "http://www.w3.org/2000/01/rdf-schema#", "b": "http://b.example.org/#", "a": "http://a.example.org/#"},
                    "@graph": [{"id": "a:X", "type": "rdfs:Class", "label": "X", "subClassOf": "b:Y"}]
                }),
            )
            .unwrap();
        registry
            .load(
                "b",
                &json!({
                    "@context": {"rdfs": "http://www.w3.org/2000/01/rdf-schema#", "b": "http://b.example.org/#", "a": "http://a.example.org/#"},
                    "@graph": [{"id": "b:Y", "type": "rdfs:Class", "label": "Y", "subClassOf": "a:X"}]
                }),
            )
            .unwrap();

        assert!(matches!(
            registry.superclass_chain("a:X"),
            Err(VocabError::CyclicHierarchy { .. })
        ));
        assert!(!registry.is_subclass_of("a:X", "http://c.example.org/#Z"));
    }

    #[test]
    fn depth_limit_after_cycle_check() {
        let config = crate::config::LoaderConfigBuilder::default()
            .with_max_chain_depth(1)
            .build();
        let mut registry = VocabularyRegistry::with_config(config);
        let context = json!({"rdfs": "http://www.w3.org/2000/01/rdf-schema#", "b": "http://b.example.org/#", "a": "http://a.example.org/#"});
        registry
            .load(
                "a",
                &json!({"@context": context, "@graph": [{"id": "a:X", "type": "rdfs:Class", "label": "X", "subClassOf": "b:Y"}]}),
            )
            .unwrap();
        registry
            .load(
                "b",
                &json!({"@context": context, "@graph": [{"id": "b:Y", "type": "rdfs:Class", "label": "Y", "subClassOf": "a:X"}]}),
            )
            .unwrap();
        assert!(matches!(
            registry.superclass_chain("a:X"),
            Err(VocabError::CyclicHierarchy { .. })
        ));

        registry.clear();
        registry
            .register("swao", Vocabulary::load(bundled::swao()).unwrap())
            .unwrap();
        registry
            .register("oa", Vocabulary::load(&oa_document()).unwrap())
            .unwrap();
        assert!(matches!(
            registry.superclass_chain("swao:NestedPIDSelector"),
            Err(VocabError::HierarchyTooDeep { ref id, limit: 1 }) if id == "swao:NestedPIDSelector"
        ));
    }

    #[test]
    fn replace_and_teardown() {
        let mut registry = VocabularyRegistry::with_bundled().unwrap();
        let replacement = Vocabulary::load(&oa_document()).unwrap();
        let old = registry.replace("swao", replacement).unwrap();
        assert_eq!(old.len(), 1);
        assert_eq!(registry.get("swao").unwrap().len(), 2);

        registry.unregister("swao").unwrap();
        assert!(matches!(
            registry.unregister("swao"),
            Err(VocabError::UnknownVocabulary(_))
        ));

        registry.replace("oa", Vocabulary::load(&oa_document()).unwrap());
        registry.clear();
        assert_eq!(registry.len(), 0);
        // Handed-out vocabularies outlive the registry entry.
        assert_eq!(old.len(), 1);
    }
}
