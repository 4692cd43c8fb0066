use std::sync::LazyLock;

use serde_json::Value;

use crate::ns;

static SWAO: LazyLock<Value> = LazyLock::new(|| {
    serde_json::from_str(include_str!("vocabularies/swao.jsonld"))
        .expect("bundled swao.jsonld is valid JSON")
});

/// The SWAO annotation-ontology vocabulary document.
pub fn swao() -> &'static Value {
    &SWAO
}

/// Look up a bundled vocabulary document by its namespace IRI.
pub fn get_bundled_vocabulary(namespace: &str) -> Option<&'static Value> {
    match namespace {
        ns::swao::NS | "http://annotation.clariah.nl/ns/swao" => Some(&SWAO),
        _ => None,
    }
}

/// Every bundled vocabulary with the name it is registered under.
pub fn bundled_vocabularies() -> impl Iterator<Item = (&'static str, &'static Value)> {
    [("swao", swao())].into_iter()
}
