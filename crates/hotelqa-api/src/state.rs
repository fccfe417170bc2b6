//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST
//! API. The embedding model and the knowledge base are loaded on first use,
//! so commands that only touch analytics never pay for them.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OnceCell, RwLock};

use hotelqa_core::analytics::AnalyticsService;
use hotelqa_core::answer::{Answer, AnswerComposer};
use hotelqa_core::embedding::BoxEmbedder;
use hotelqa_core::index::IndexBuilder;
use hotelqa_core::retrieval::{Corpus, KnowledgeBase, Retrieval, Retriever};
use hotelqa_infra::config::load_global_config;
use hotelqa_infra::dataset::load_corpus;
use hotelqa_infra::embedder::FastEmbedder;
use hotelqa_infra::filesystem::{index_dir, model_cache_dir, resolve_data_dir, resolve_in};
use hotelqa_infra::index_store::IndexStore;
use hotelqa_infra::llm::{create_provider, resolve_api_key};
use hotelqa_infra::sqlite::analytics::SqliteAnalyticsRepository;
use hotelqa_infra::sqlite::pool::{DatabasePool, database_url};
use hotelqa_types::config::GlobalConfig;
use hotelqa_types::error::{BuildError, DatasetError, IndexError, RepositoryError, RetrievalError};

/// Analytics service pinned to the SQLite repository.
pub type ConcreteAnalyticsService = AnalyticsService<SqliteAnalyticsRepository>;

/// Failures while loading or rebuilding the knowledge base.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("no index found in {0}; run `hotelqa build-index` first")]
    IndexMissing(String),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("failed to load embedding model: {0}")]
    Embedder(#[from] RepositoryError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("background task failed: {0}")]
    Task(String),
}

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
    pub analytics_service: Arc<ConcreteAnalyticsService>,
    pub composer: Arc<AnswerComposer>,
    pub index_store: IndexStore,
    embedder: Arc<OnceCell<Arc<BoxEmbedder>>>,
    knowledge: Arc<RwLock<Option<Arc<KnowledgeBase>>>>,
    rebuild_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        Self::init_in(resolve_data_dir()).await
    }

    /// Initialize the application state rooted at `data_dir`.
    pub async fn init_in(data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let analytics_service =
            AnalyticsService::new(SqliteAnalyticsRepository::new(db_pool.clone()));

        // A missing key is only fatal once generation is attempted.
        let api_key = resolve_api_key(&config.llm).unwrap_or_default();
        let provider = create_provider(&config.llm, api_key);
        let composer = AnswerComposer::new(Arc::new(provider), config.llm.model.clone())
            .with_max_tokens(config.llm.max_tokens)
            .with_timeout(Duration::from_secs(config.llm.timeout_secs));

        Ok(Self {
            index_store: IndexStore::new(index_dir(&data_dir)),
            config: Arc::new(config),
            data_dir,
            db_pool,
            analytics_service: Arc::new(analytics_service),
            composer: Arc::new(composer),
            embedder: Arc::new(OnceCell::new()),
            knowledge: Arc::new(RwLock::new(None)),
            rebuild_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Absolute path of the configured dataset.
    pub fn dataset_path(&self) -> PathBuf {
        resolve_in(&self.data_dir, &self.config.dataset_path)
    }

    /// The shared embedder, loading the model on first call.
    pub async fn embedder(&self) -> Result<Arc<BoxEmbedder>, KnowledgeError> {
        let cache_dir = model_cache_dir(&self.data_dir);
        let embedder = self
            .embedder
            .get_or_try_init(|| async move {
                let embedder = tokio::task::spawn_blocking(move || FastEmbedder::new(&cache_dir))
                    .await
                    .map_err(|e| KnowledgeError::Task(e.to_string()))??;
                Ok::<_, KnowledgeError>(Arc::new(BoxEmbedder::new(embedder)))
            })
            .await?;
        Ok(Arc::clone(embedder))
    }

    /// Record count of the loaded knowledge base, if one is loaded.
    pub async fn knowledge_loaded(&self) -> Option<usize> {
        self.knowledge.read().await.as_ref().map(|kb| kb.len())
    }

    /// The current knowledge base, loading the persisted index on first call.
    pub async fn knowledge(&self) -> Result<Arc<KnowledgeBase>, KnowledgeError> {
        if let Some(kb) = self.knowledge.read().await.as_ref() {
            return Ok(Arc::clone(kb));
        }

        let mut slot = self.knowledge.write().await;
        // Another task may have loaded it while we waited for the write lock.
        if let Some(kb) = slot.as_ref() {
            return Ok(Arc::clone(kb));
        }

        let kb = Arc::new(self.load_knowledge().await?);
        *slot = Some(Arc::clone(&kb));
        Ok(kb)
    }

    async fn load_knowledge(&self) -> Result<KnowledgeBase, KnowledgeError> {
        let store = self.index_store.clone();
        if !store.exists() {
            return Err(KnowledgeError::IndexMissing(store.dir().display().to_string()));
        }
        let dataset = self.dataset_path();

        let kb = tokio::task::spawn_blocking(move || -> Result<KnowledgeBase, KnowledgeError> {
            let corpus = load_corpus(&dataset)?;
            let index = match store.load_index() {
                Ok(index) => index,
                Err(e) => {
                    tracing::warn!(error = %e, "index file unreadable, rebuilding from embeddings");
                    store.rebuild_from_embeddings()?
                }
            };
            Ok(KnowledgeBase::new(corpus, index)?)
        })
        .await
        .map_err(|e| KnowledgeError::Task(e.to_string()))??;

        tracing::info!(records = kb.len(), "knowledge base loaded");
        Ok(kb)
    }

    /// Re-embed the dataset, persist the new index, and swap it in.
    ///
    /// Readers holding the previous knowledge base keep using it until they
    /// finish. Concurrent rebuilds are serialized.
    pub async fn rebuild_index<F>(&self, on_progress: F) -> Result<Arc<KnowledgeBase>, KnowledgeError>
    where
        F: FnMut(usize) + Send,
    {
        let corpus = self.load_dataset().await?;
        self.rebuild_index_from(corpus, on_progress).await
    }

    /// Like [`AppState::rebuild_index`], for an already loaded corpus.
    pub async fn rebuild_index_from<F>(
        &self,
        corpus: Corpus,
        on_progress: F,
    ) -> Result<Arc<KnowledgeBase>, KnowledgeError>
    where
        F: FnMut(usize) + Send,
    {
        let _guard = self.rebuild_lock.lock().await;

        let embedder = self.embedder().await?;

        let builder = IndexBuilder::new(self.config.retrieval.embed_batch_size);
        let built = builder.build(&*embedder, &corpus, on_progress).await?;

        let store = self.index_store.clone();
        let built = tokio::task::spawn_blocking(move || store.save(&built).map(|()| built))
            .await
            .map_err(|e| KnowledgeError::Task(e.to_string()))??;

        let kb = Arc::new(KnowledgeBase::new(corpus, built.index)?);
        *self.knowledge.write().await = Some(Arc::clone(&kb));
        tracing::info!(records = kb.len(), "knowledge base swapped in");
        Ok(kb)
    }

    /// Load the configured dataset off the async runtime.
    pub async fn load_dataset(&self) -> Result<Corpus, KnowledgeError> {
        let dataset = self.dataset_path();
        tokio::task::spawn_blocking(move || load_corpus(&dataset))
            .await
            .map_err(|e| KnowledgeError::Task(e.to_string()))?
            .map_err(KnowledgeError::from)
    }

    /// Retrieve up to `top_k` records for `query`.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Retrieval, KnowledgeError> {
        let knowledge = self.knowledge().await?;
        let retriever = Retriever::new(self.embedder().await?, knowledge);
        Ok(retriever.retrieve(query, top_k).await?)
    }

    /// Retrieve context for `question` and compose an answer from it.
    #[tracing::instrument(skip(self))]
    pub async fn ask(&self, question: &str, top_k: usize) -> Result<(Answer, Retrieval), KnowledgeError> {
        let retrieval = self.retrieve(question, top_k).await?;
        let answer = self.composer.compose(question, &retrieval).await;
        tracing::info!(kind = ?answer.kind, retrieved = retrieval.len(), "question answered");
        Ok((answer, retrieval))
    }
}
