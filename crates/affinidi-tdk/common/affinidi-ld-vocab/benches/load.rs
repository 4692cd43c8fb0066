use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};

use affinidi_ld_vocab::{PrefixTable, Vocabulary, bundled};

/// A linear hierarchy of `depth` classes rooted at `oa:Selector`.
fn deep_hierarchy(depth: usize) -> Value {
    let graph: Vec<Value> = (0..depth)
        .map(|i| {
            let parent = if i == 0 {
                "oa:Selector".to_string()
            } else {
                format!("ex:C{}", i - 1)
            };
            json!({
                "id": format!("ex:C{i}"),
                "type": "rdfs:Class",
                "label": format!("Class {i}"),
                "subClassOf": parent
            })
        })
        .collect();

    json!({
        "@context": {
            "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
            "oa": "http://www.w3.org/ns/oa#",
            "ex": "http://example.org/ns#"
        },
        "@graph": graph
    })
}

fn bench_load_swao(c: &mut Criterion) {
    let doc = bundled::swao();
    c.bench_function("load_swao", |b| b.iter(|| Vocabulary::load(doc).unwrap()));
}

fn bench_load_deep_hierarchy(c: &mut Criterion) {
    let doc = deep_hierarchy(50);
    c.bench_function("load_deep_hierarchy_50", |b| {
        b.iter(|| Vocabulary::load(&doc).unwrap())
    });
}

fn bench_resolve(c: &mut Criterion) {
    let table = PrefixTable::load(&bundled::swao()["@context"]).unwrap();
    c.bench_function("resolve_prefixed_name", |b| {
        b.iter(|| table.resolve("swao:NestedPIDSelector").unwrap())
    });
}

fn bench_is_subclass_of(c: &mut Criterion) {
    let vocab = Vocabulary::load(&deep_hierarchy(50)).unwrap();
    c.bench_function("is_subclass_of_depth_50", |b| {
        b.iter(|| vocab.is_subclass_of("ex:C49", "oa:Selector"))
    });
}

criterion_group!(
    benches,
    bench_load_swao,
    bench_load_deep_hierarchy,
    bench_resolve,
    bench_is_subclass_of
);
criterion_main!(benches);
