use criterion::{black_box, criterion_group, criterion_main, Criterion};
use iam_policy_scribe_core::{
    match_resource_type, query_operation_names, synthesize_policy, AccessLevel, OperationFilters,
    PolicySpecification, SpecificationEntry, Store,
};

fn bench_load(c: &mut Criterion) {
    c.bench_function("load_bundled_catalog", |b| {
        b.iter(|| Store::bundled().unwrap());
    });
}

fn bench_queries(c: &mut Criterion) {
    let store = Store::bundled().unwrap();
    let filters = OperationFilters::new()
        .with_access_level(AccessLevel::PermissionsManagement)
        .with_resource_type("bucket");

    c.bench_function("query_bucket_permissions_management", |b| {
        b.iter(|| query_operation_names(black_box(&store), "s3", &filters).unwrap());
    });

    c.bench_function("query_all_by_name_glob", |b| {
        let filters = OperationFilters::new().with_name("List*");
        b.iter(|| query_operation_names(black_box(&store), "all", &filters).unwrap());
    });

    c.bench_function("match_object_identifier", |b| {
        b.iter(|| {
            match_resource_type(black_box(&store), "s3", black_box("arn:aws:s3:::my-bucket/cat.jpg"))
                .unwrap()
        });
    });

    c.bench_function("match_unresolvable_identifier", |b| {
        b.iter(|| {
            match_resource_type(
                black_box(&store),
                "s3",
                black_box("arn:aws:s3:::my-bucket/photos/2024/cat.jpg"),
            )
            .unwrap()
        });
    });
}

fn bench_synthesis(c: &mut Criterion) {
    let store = Store::bundled().unwrap();
    let specification = PolicySpecification::new(vec![
        SpecificationEntry::scoped("arn:aws:s3:::my-bucket", ["Read", "Write", "Permissions management"]),
        SpecificationEntry::scoped(
            "arn:aws:ec2:us-east-1:123456789012:instance/i-0abcdef",
            ["Write", "Tagging"],
        ),
        SpecificationEntry::wildcard("sns", ["List"]),
    ]);

    c.bench_function("synthesize_mixed_specification", |b| {
        b.iter(|| synthesize_policy(black_box(&store), black_box(&specification)).unwrap());
    });
}

criterion_group!(benches, bench_load, bench_queries, bench_synthesis);
criterion_main!(benches);
