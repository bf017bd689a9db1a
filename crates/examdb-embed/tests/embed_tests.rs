use examdb_embed::{Embedder, FakeEmbedder};

#[test]
fn fake_embedder_is_deterministic() {
    let embedder = FakeEmbedder::new(64);
    let texts = vec!["operator definitions exam".to_string()];
    let a = embedder.embed_batch(&texts).expect("embed");
    let b = embedder.embed_batch(&texts).expect("embed");
    assert_eq!(a, b);
}

#[test]
fn fake_embedder_output_is_unit_normalized() {
    let embedder = FakeEmbedder::new(64);
    let out = embedder
        .embed_batch(&["task structure requirements".to_string()])
        .expect("embed");
    let norm: f32 = out[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4, "norm was {norm}");
}

#[test]
fn similar_texts_score_higher_than_unrelated() {
    let embedder = FakeEmbedder::new(256);
    let out = embedder
        .embed_batch(&[
            "operator definitions command words".to_string(),
            "operator definitions for tasks".to_string(),
            "statistical evaluation of topic choices".to_string(),
        ])
        .expect("embed");
    let cos = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
    assert!(
        cos(&out[0], &out[1]) > cos(&out[0], &out[2]),
        "shared tokens should dominate the cosine score"
    );
}

#[test]
fn dim_matches_requested() {
    let embedder = FakeEmbedder::new(32);
    assert_eq!(embedder.dim(), 32);
    let out = embedder.embed_batch(&["text".to_string()]).expect("embed");
    assert_eq!(out[0].len(), 32);
}
