mod common;

use common::{message, MockEmbedding, MockHistory};
use doppel_core::{Message, Sender};
use embedding::EmbeddingClient;
use retrieval::RetrievalOrchestrator;
use std::sync::{Arc, Mutex};
use vector_index::VectorIndex;

fn alternating(count: usize, step_minutes: i64) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let sender = if i % 2 == 0 { Sender::Them } else { Sender::Me };
            message(
                &format!("m{}", i),
                "ana",
                sender,
                &format!("conteúdo {}", i),
                i as i64 * step_minutes,
            )
        })
        .collect()
}

fn orchestrator(
    messages: Vec<Message>,
    embedding: Option<MockEmbedding>,
    index: Arc<VectorIndex>,
) -> RetrievalOrchestrator {
    let embedding = embedding.map(|e| Arc::new(e) as Arc<dyn EmbeddingClient>);
    RetrievalOrchestrator::new(Arc::new(MockHistory::new(messages)), embedding, index)
}

#[tokio::test]
async fn test_build_indexes_threads_and_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let index = Arc::new(VectorIndex::load(dir.path()));
    let orchestrator = orchestrator(
        alternating(8, 1),
        Some(MockEmbedding::new(vec![1.0, 0.0])),
        index.clone(),
    );

    let report = orchestrator.generate_embeddings("ana", None).await.unwrap();

    assert_eq!(report.threads_indexed, 1);
    assert_eq!(report.pairs_indexed, 4);
    assert_eq!(report.batches_failed, 0);
    assert_eq!(index.count_for("ana").await, (4, 1));
}

#[tokio::test]
async fn test_build_without_backend_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let index = Arc::new(VectorIndex::load(dir.path()));
    let orchestrator = orchestrator(alternating(8, 1), None, index.clone());

    let report = orchestrator.generate_embeddings("ana", None).await.unwrap();

    assert_eq!(report.threads_indexed, 0);
    assert_eq!(report.pairs_indexed, 0);
    assert_eq!(index.count_for("ana").await, (0, 0));
}

#[tokio::test]
async fn test_failed_batch_is_skipped_and_counted() {
    let dir = tempfile::tempdir().unwrap();
    let index = Arc::new(VectorIndex::load(dir.path()));
    // 40 minute spacing: no thread survives, 25 pairs -> 2 pair batches.
    let mock = MockEmbedding::new(vec![1.0, 0.0]).failing_on_batch(0);
    let orchestrator = orchestrator(alternating(50, 40), Some(mock), index.clone());

    let report = orchestrator.generate_embeddings("ana", None).await.unwrap();

    assert_eq!(report.threads_indexed, 0);
    assert_eq!(report.pairs_indexed, 5);
    assert_eq!(report.batches_failed, 1);
    assert_eq!(index.count_for("ana").await, (5, 0));
}

#[tokio::test]
async fn test_progress_callback_sees_both_phases() {
    let dir = tempfile::tempdir().unwrap();
    let index = Arc::new(VectorIndex::load(dir.path()));
    let orchestrator = orchestrator(
        alternating(8, 1),
        Some(MockEmbedding::new(vec![1.0, 0.0])),
        index,
    );

    let seen: Arc<Mutex<Vec<(String, usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let progress: retrieval::ProgressFn = Box::new(move |phase, done, total| {
        sink.lock().unwrap().push((phase.to_string(), done, total));
    });

    orchestrator
        .generate_embeddings("ana", Some(progress))
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![("threads".to_string(), 1, 1), ("pairs".to_string(), 1, 1)]
    );
}

#[tokio::test]
async fn test_concurrent_build_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let index = Arc::new(VectorIndex::load(dir.path()));
    let mock =
        MockEmbedding::new(vec![1.0, 0.0]).with_latency(std::time::Duration::from_millis(50));
    let orchestrator = orchestrator(alternating(8, 1), Some(mock), index);

    let (first, second) = tokio::join!(
        orchestrator.generate_embeddings("ana", None),
        orchestrator.generate_embeddings("ana", None),
    );

    assert!(first.is_some());
    assert!(second.is_none());
}

#[tokio::test]
async fn test_index_is_persisted_once_built() {
    let dir = tempfile::tempdir().unwrap();
    let index = Arc::new(VectorIndex::load(dir.path()));
    let orchestrator = orchestrator(
        alternating(8, 1),
        Some(MockEmbedding::new(vec![1.0, 0.0])),
        index,
    );
    orchestrator.generate_embeddings("ana", None).await.unwrap();

    let reloaded = VectorIndex::load(dir.path());

    assert_eq!(reloaded.count_for("ana").await, (4, 1));
}

#[tokio::test]
async fn test_find_similar_context() {
    let dir = tempfile::tempdir().unwrap();
    let index = Arc::new(VectorIndex::load(dir.path()));
    let mock = MockEmbedding::new(vec![0.0, 1.0])
        .with_vector("vai almoçar amanhã?", vec![1.0, 0.0])
        .with_vector("almoço?", vec![1.0, 0.0]);
    let messages = vec![
        message("m0", "ana", Sender::Them, "vai almoçar amanhã?", 0),
        message("m1", "ana", Sender::Me, "vou sim, bora", 1),
    ];
    let orchestrator = orchestrator(messages, Some(mock), index);
    orchestrator.generate_embeddings("ana", None).await.unwrap();

    let results = orchestrator.find_similar_context("almoço?", "ana", 3).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, "vai almoçar amanhã?");
    assert_eq!(results[0].1, "vou sim, bora");
    assert!(results[0].2 > 0.99);
}

#[tokio::test]
async fn test_find_similar_threads() {
    let dir = tempfile::tempdir().unwrap();
    let index = Arc::new(VectorIndex::load(dir.path()));
    let transcript = "oi\ntudo bem?\ntudo sim\nque bom";
    let mock = MockEmbedding::new(vec![0.0, 1.0])
        .with_vector(transcript, vec![1.0, 0.0])
        .with_vector("oi, como vai?", vec![1.0, 0.0]);
    let messages = vec![
        message("m0", "ana", Sender::Them, "oi", 0),
        message("m1", "ana", Sender::Them, "tudo bem?", 1),
        message("m2", "ana", Sender::Me, "tudo sim", 2),
        message("m3", "ana", Sender::Them, "que bom", 3),
    ];
    let orchestrator = orchestrator(messages, Some(mock), index);
    orchestrator.generate_embeddings("ana", None).await.unwrap();

    let threads = orchestrator
        .find_similar_threads("oi, como vai?", "ana", 3)
        .await;

    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].turns.len(), 4);
    assert!(threads[0].similarity > 0.99);
    assert!(threads[0].turns[2].is_me);
}

#[tokio::test]
async fn test_query_without_backend_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let index = Arc::new(VectorIndex::load(dir.path()));
    let orchestrator = orchestrator(Vec::new(), None, index);

    assert!(orchestrator.find_similar_context("oi", "ana", 3).await.is_empty());
    assert!(orchestrator.find_similar_threads("oi", "ana", 3).await.is_empty());
}

#[tokio::test]
async fn test_query_embed_failure_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let index = Arc::new(VectorIndex::load(dir.path()));
    let mock = MockEmbedding::new(vec![1.0, 0.0]).failing_single();
    let orchestrator = orchestrator(Vec::new(), Some(mock), index);

    assert!(orchestrator.find_similar_context("oi", "ana", 3).await.is_empty());
}
