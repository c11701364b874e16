use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    Document, DomainError, SearchResult,
};

/// In-memory vector store for tests and local development. Ranks by cosine
/// similarity against embeddings produced by the injected embedding service.
pub struct InMemoryStore {
    embedding: Arc<dyn EmbeddingService>,
    entries: RwLock<Vec<Entry>>,
}

struct Entry {
    id: String,
    document: Document,
    vector: Vec<f32>,
}

impl InMemoryStore {
    pub fn new(embedding: Arc<dyn EmbeddingService>) -> Self {
        Self {
            embedding,
            entries: RwLock::new(Vec::new()),
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn similarity_search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let query_vector = self.embedding.embed(query).await?;

        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut scored: Vec<SearchResult> = entries
            .iter()
            .map(|entry| SearchResult {
                document: entry.document.clone(),
                score: cosine_similarity(&query_vector, &entry.vector),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        Ok(scored)
    }

    async fn add_documents(
        &self,
        documents: &[Document],
        ids: &[String],
    ) -> Result<(), DomainError> {
        if documents.len() != ids.len() {
            return Err(DomainError::validation(
                "document and id counts must match",
            ));
        }

        let mut embedded = Vec::with_capacity(documents.len());
        for (document, id) in documents.iter().zip(ids) {
            let vector = self.embedding.embed(&document.content).await?;
            embedded.push(Entry {
                id: id.clone(),
                document: document.clone(),
                vector,
            });
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        entries.retain(|entry| !ids.contains(&entry.id));
        entries.extend(embedded);
        Ok(())
    }

    async fn delete_documents(&self, ids: &[String]) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        entries.retain(|entry| !ids.contains(&entry.id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FixedEmbedding {
        vectors: HashMap<String, Vec<f32>>,
    }

    impl FixedEmbedding {
        fn new(pairs: &[(&str, &[f32])]) -> Arc<Self> {
            Arc::new(Self {
                vectors: pairs
                    .iter()
                    .map(|(text, vector)| (text.to_string(), vector.to_vec()))
                    .collect(),
            })
        }
    }

    #[async_trait]
    impl EmbeddingService for FixedEmbedding {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
            self.vectors
                .get(text)
                .cloned()
                .ok_or_else(|| DomainError::upstream(format!("no vector for {text}")))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let embedding = FixedEmbedding::new(&[
            ("gaming monitor", &[1.0, 0.0]),
            ("budget tv", &[0.0, 1.0]),
            ("monitors for gaming", &[0.9, 0.1]),
        ]);
        let store = InMemoryStore::new(embedding);

        store
            .add_documents(
                &[Document::new("gaming monitor"), Document::new("budget tv")],
                &["a".into(), "b".into()],
            )
            .await
            .unwrap();

        let results = store
            .similarity_search("monitors for gaming", 2)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.content, "gaming monitor");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_top_k_truncates() {
        let embedding = FixedEmbedding::new(&[
            ("one", &[1.0, 0.0]),
            ("two", &[0.5, 0.5]),
            ("query", &[1.0, 0.0]),
        ]);
        let store = InMemoryStore::new(embedding);

        store
            .add_documents(
                &[Document::new("one"), Document::new("two")],
                &["1".into(), "2".into()],
            )
            .await
            .unwrap();

        let results = store.similarity_search("query", 1).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_add_overwrites_same_id_and_delete_removes() {
        let embedding = FixedEmbedding::new(&[
            ("old", &[1.0, 0.0]),
            ("new", &[0.0, 1.0]),
            ("query", &[0.0, 1.0]),
        ]);
        let store = InMemoryStore::new(embedding);

        store
            .add_documents(&[Document::new("old")], &["doc".into()])
            .await
            .unwrap();
        store
            .add_documents(&[Document::new("new")], &["doc".into()])
            .await
            .unwrap();

        let results = store.similarity_search("query", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.content, "new");

        store.delete_documents(&["doc".into()]).await.unwrap();
        assert!(store.similarity_search("query", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mismatched_ids_rejected() {
        let embedding = FixedEmbedding::new(&[]);
        let store = InMemoryStore::new(embedding);

        let result = store
            .add_documents(&[Document::new("text")], &[])
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
