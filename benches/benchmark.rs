use criterion::{criterion_group, criterion_main, Criterion};
use hcl_composer::{serialize, BlockDescriptor, BlockKind, BlockRegistry, FieldValue, Map, SourceId};

fn fields() -> Map<String, FieldValue> {
    let mut fields = Map::new();
    fields.insert("name".to_string(), FieldValue::from("new-node"));
    fields.insert(
        "image_id".to_string(),
        FieldValue::from("data.nebius_compute_image.ubuntu-2204.id"),
    );
    fields.insert(
        "resources".to_string(),
        FieldValue::record([
            ("cores", FieldValue::from(2)),
            ("memory", FieldValue::from(4)),
            (
                "disk",
                FieldValue::record([("size", FieldValue::from(20)), ("type", "network-ssd".into())]),
            ),
        ]),
    );
    fields.insert(
        "labels".to_string(),
        FieldValue::mapping([
            ("env", FieldValue::from("prod")),
            ("owner", FieldValue::mapping([("team", "ops")])),
        ]),
    );
    fields.insert(
        "zones".to_string(),
        FieldValue::from(vec!["ru-central1-a", "ru-central1-b", "ru-central1-c"]),
    );
    fields
}

fn benchmark_serialize(c: &mut Criterion) {
    let descriptor = BlockDescriptor::new(BlockKind::Resource)
        .with_type("nebius_compute_instance")
        .with_name("vm1");
    let fields = fields();

    c.bench_function("serialize", |b| b.iter(|| serialize(&descriptor, &fields)));

    c.bench_function("register_and_flush", |b| {
        let body = serialize(&descriptor, &fields).unwrap();

        b.iter(|| {
            let mut registry = BlockRegistry::new();

            for _ in 0..100 {
                registry.register_text(SourceId::new(), body.clone());
            }

            let mut out = Vec::new();
            registry.write_to(&mut out).unwrap();
            out
        })
    });
}

criterion_group!(benches, benchmark_serialize);
criterion_main!(benches);
