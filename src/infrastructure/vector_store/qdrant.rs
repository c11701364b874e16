use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, DeletePointsBuilder, Distance, PointId, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use std::sync::Arc;

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    Document, DomainError, SearchResult,
};

/// Qdrant-backed vector store. Queries and documents arrive as plain text;
/// the embedding function is applied internally.
///
/// Point payload contract: `content` holds the document text, `metadata`
/// holds a JSON-serialized metadata object. Points without string content
/// are skipped in search results.
pub struct QdrantStore {
    client: Qdrant,
    collection: String,
    embedding: Arc<dyn EmbeddingService>,
}

impl QdrantStore {
    pub async fn new(
        url: &str,
        collection: &str,
        embedding: Arc<dyn EmbeddingService>,
    ) -> Result<Self, DomainError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| DomainError::upstream(e.to_string()))?;

        let store = Self {
            client,
            collection: collection.to_string(),
            embedding,
        };

        store.ensure_collection().await?;

        Ok(store)
    }

    async fn ensure_collection(&self) -> Result<(), DomainError> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| DomainError::upstream(e.to_string()))?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(
                            self.embedding.dimension() as u64,
                            Distance::Cosine,
                        ),
                    ),
                )
                .await
                .map_err(|e| DomainError::upstream(e.to_string()))?;
        }

        Ok(())
    }

    fn payload_for(document: &Document) -> Result<Payload, DomainError> {
        let metadata = serde_json::to_string(&document.metadata)
            .map_err(|e| DomainError::internal(e.to_string()))?;

        serde_json::json!({
            "content": document.content,
            "metadata": metadata,
        })
        .try_into()
        .map_err(|_| DomainError::internal("Failed to create payload"))
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn similarity_search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let vector = self.embedding.embed(query).await?;

        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| DomainError::upstream(e.to_string()))?;

        let documents = results
            .result
            .into_iter()
            .filter_map(|point| {
                let content = point.payload.get("content")?.as_str()?.to_string();
                let metadata = point
                    .payload
                    .get("metadata")
                    .and_then(|v| v.as_str())
                    .and_then(|raw| serde_json::from_str(raw).ok())
                    .unwrap_or_else(|| serde_json::json!({}));

                Some(SearchResult {
                    document: Document {
                        content,
                        metadata,
                    },
                    score: point.score,
                })
            })
            .collect();

        Ok(documents)
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
        if documents.is_empty() {
            return Ok(());
        }

        let mut points = Vec::with_capacity(documents.len());
        for (document, id) in documents.iter().zip(ids) {
            let vector = self.embedding.embed(&document.content).await?;
            points.push(PointStruct::new(
                id.clone(),
                vector,
                Self::payload_for(document)?,
            ));
        }

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
            .await
            .map_err(|e| DomainError::upstream(e.to_string()))?;

        Ok(())
    }

    async fn delete_documents(&self, ids: &[String]) -> Result<(), DomainError> {
        if ids.is_empty() {
            return Ok(());
        }

        let point_ids: Vec<PointId> = ids.iter().map(|id| PointId::from(id.clone())).collect();

        self.client
            .delete_points(DeletePointsBuilder::new(&self.collection).points(point_ids))
            .await
            .map_err(|e| DomainError::upstream(e.to_string()))?;

        Ok(())
    }
}
