use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::{from_fn, FeatureAggregator, FeatureMap, GroupSet, ImageFilter, LabelMask};
use ndarray::{ArrayD, IxDyn};

fn synthetic_features(prefixes: &[String], count: usize) -> FeatureMap {
    let mut features = FeatureMap::new();
    for prefix in prefixes {
        for i in 0..count {
            features.insert(format!("{}_glcm_Feature{}", prefix, i), i as f64 * 0.5);
        }
    }
    features
}

fn bench_aggregate(c: &mut Criterion) {
    // 32^3 volume with 16 labels laid out in slabs
    let side = 32;
    let labels: Vec<i64> = (0..side * side * side)
        .map(|i| ((i / (side * side)) % 17) as i64)
        .collect();
    let mask = LabelMask::new(ArrayD::from_shape_vec(IxDyn(&[side, side, side]), labels).unwrap());

    let mut prefixes = vec!["original".to_string(), "log-sigma-1-0-mm-3D".to_string()];
    prefixes.extend(
        ["HHH", "HHL", "HLH", "HLL", "LHH", "LHL", "LLH", "LLL"]
            .iter()
            .map(|code| format!("wavelet-{}", code)),
    );
    let features = synthetic_features(&prefixes, 90);

    let aggregator = FeatureAggregator::new(GroupSet::from_filters(&ImageFilter::ALL));
    c.bench_function("aggregate_16_labels_all_groups", |b| {
        b.iter(|| {
            let mut extractor = from_fn(|_: &(), _: &ArrayD<u8>| Ok(features.clone()));
            black_box(aggregator.aggregate(&(), &mask, &mut extractor).unwrap())
        })
    });
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
