use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

use crate::{config::Config, memory::MemoryStore};

pub type Document = Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("document encoding: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("document in `{0}` is not a JSON object")]
    NotAnObject(String),

    #[error("conflicting insert into `{0}` left no document behind")]
    LostInsert(String),
}

/// Conditions a document has to satisfy. All conditions are ANDed.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub id: Option<String>,
    pub eq: Document,
    pub contains: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Exact match on a top-level field.
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.eq.insert(field.to_owned(), value.into());
        self
    }

    /// Case-insensitive substring match on a top-level string field.
    pub fn contains(mut self, field: &str, needle: impl Into<String>) -> Self {
        self.contains.push((field.to_owned(), needle.into()));
        self
    }

    /// Matches any document of the same (user, course) pair.
    pub fn pair(user_id: &str, course_id: &str) -> Self {
        Self::new().eq("user_id", user_id).eq("course_id", course_id)
    }

    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(id) = &self.id {
            if doc.get("_id").and_then(Value::as_str) != Some(id.as_str()) {
                return false;
            }
        }
        if !self.eq.iter().all(|(k, v)| doc.get(k) == Some(v)) {
            return false;
        }
        self.contains.iter().all(|(k, needle)| {
            doc.get(k)
                .and_then(Value::as_str)
                .map(|s| s.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false)
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub limit: Option<usize>,
    pub sort_by: Option<String>,
}

impl FindOptions {
    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            sort_by: None,
        }
    }

    pub fn sorted_by(mut self, field: &str) -> Self {
        self.sort_by = Some(field.to_owned());
        self
    }
}

/// Field changes applied by [`Store::update_one`].
#[derive(Debug, Clone, Default)]
pub struct Update {
    /// Overwritten on every update.
    pub set: Document,
    /// Appends a value to an array field unless it is already present.
    pub add_to_set: Option<(String, Value)>,
}

impl Update {
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set.insert(field.to_owned(), value.into());
        self
    }

    pub fn add_to_set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.add_to_set = Some((field.to_owned(), value.into()));
        self
    }

    /// The document an upsert creates when nothing matches `filter`.
    pub fn seed_document(&self, filter: &Filter) -> Document {
        let mut doc = filter.eq.clone();
        doc.extend(self.set.clone());
        if let Some((field, value)) = &self.add_to_set {
            doc.insert(field.clone(), Value::Array(vec![value.clone()]));
        }
        doc
    }
}

/// Thin accessor over a document database of named collections.
///
/// `insert_if_absent` and `update_one` with `upsert` are atomic per key, so
/// callers never need a find-then-insert sequence.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<String>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// Applies `update` to the first document matching `filter`, inserting
    /// one when `upsert` is set and nothing matches. Returns the document
    /// as written.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> StoreResult<Option<Document>>;

    /// Returns the document matching `key`, or inserts `doc` and returns it.
    /// The flag is true when `doc` was inserted.
    async fn insert_if_absent(
        &self,
        collection: &str,
        key: &Filter,
        doc: Document,
    ) -> StoreResult<(Document, bool)>;

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    async fn collections(&self) -> StoreResult<Vec<String>>;

    async fn close(&self);
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn to_document<T: Serialize>(collection: &str, value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(mut doc) => {
            doc.remove("_id");
            Ok(doc)
        }
        _ => Err(StoreError::NotAnObject(collection.to_owned())),
    }
}

pub fn from_document<T: DeserializeOwned>(doc: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Looks a document up by id, first verbatim and then by the canonical
/// hyphenated lowercase UUID form of `raw`.
pub async fn find_by_id(
    store: &dyn Store,
    collection: &str,
    raw: &str,
) -> StoreResult<Option<Document>> {
    if let Some(doc) = store.find_one(collection, &Filter::by_id(raw)).await? {
        return Ok(Some(doc));
    }
    match Uuid::parse_str(raw.trim()) {
        Ok(uuid) if uuid.to_string() != raw => {
            store.find_one(collection, &Filter::by_id(uuid.to_string())).await
        }
        _ => Ok(None),
    }
}

/// Builds the store selected by `DATABASE_URL`. `None` means the service
/// runs without a database.
pub async fn connect(config: &Config) -> Option<Arc<dyn Store>> {
    let url = match config.database_url.as_deref() {
        Some(url) => url,
        None => {
            tracing::warn!("DATABASE_URL not set, running without a database");
            return None;
        }
    };
    if url.starts_with("memory://") {
        tracing::info!("using in-memory document store");
        return Some(Arc::new(MemoryStore::new()));
    }
    match PgStore::connect(url, config.max_connections).await {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            tracing::error!(error = %e, "database connection failed, running without a database");
            None
        }
    }
}

pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("connected to postgres document store");
        Ok(Self { pool })
    }
}

type Row = (String, Value);

fn row_to_document(collection: &str, (id, body): Row) -> StoreResult<Document> {
    match body {
        Value::Object(mut doc) => {
            doc.insert("_id".into(), Value::String(id));
            Ok(doc)
        }
        _ => Err(StoreError::NotAnObject(collection.to_owned())),
    }
}

fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, collection: &str, filter: &Filter) {
    qb.push(" WHERE collection = ").push_bind(collection.to_owned());
    if let Some(id) = &filter.id {
        qb.push(" AND id = ").push_bind(id.clone());
    }
    if !filter.eq.is_empty() {
        qb.push(" AND body @> ").push_bind(Value::Object(filter.eq.clone()));
    }
    for (field, needle) in &filter.contains {
        qb.push(" AND body ->> ")
            .push_bind(field.clone())
            .push(" ILIKE ")
            .push_bind(format!("%{}%", escape_like(needle)));
    }
}

fn select_query<'a>(
    collection: &str,
    filter: &Filter,
    options: &FindOptions,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("SELECT id, body FROM documents");
    push_filter(&mut qb, collection, filter);
    match &options.sort_by {
        Some(field) => {
            qb.push(" ORDER BY body -> ").push_bind(field.clone()).push(", created_at");
        }
        None => {
            qb.push(" ORDER BY created_at");
        }
    }
    if let Some(limit) = options.limit {
        qb.push(" LIMIT ").push_bind(limit as i64);
    }
    qb
}

fn update_query<'a>(
    collection: &str,
    filter: &Filter,
    update: &Update,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE documents SET body = ");
    match &update.add_to_set {
        Some((field, value)) => {
            qb.push("jsonb_set(body || ")
                .push_bind(Value::Object(update.set.clone()))
                .push(", ARRAY[")
                .push_bind(field.clone())
                .push("]::text[], (SELECT COALESCE(jsonb_agg(DISTINCT e.value), '[]'::jsonb)")
                .push(" FROM jsonb_array_elements(COALESCE(body -> ")
                .push_bind(field.clone())
                .push(", '[]'::jsonb) || jsonb_build_array(")
                .push_bind(value.clone())
                .push("::jsonb)) AS e(value)))");
        }
        None => {
            qb.push("body || ").push_bind(Value::Object(update.set.clone()));
        }
    }
    qb.push(" WHERE id = (SELECT id FROM documents");
    push_filter(&mut qb, collection, filter);
    qb.push(" ORDER BY created_at LIMIT 1 FOR UPDATE) RETURNING id, body");
    qb
}

impl PgStore {
    async fn insert_on_conflict_nothing(
        &self,
        collection: &str,
        doc: Document,
    ) -> StoreResult<Option<Document>> {
        let row: Option<Row> = sqlx::query_as(
            "INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING RETURNING id, body",
        )
        .bind(new_id())
        .bind(collection)
        .bind(Value::Object(doc))
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_document(collection, r)).transpose()
    }

    async fn update_existing(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<Option<Document>> {
        let row: Option<Row> = update_query(collection, filter, update)
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_document(collection, r)).transpose()
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<String> {
        let id = new_id();
        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(&id)
            .bind(collection)
            .bind(Value::Object(doc))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let row: Option<Row> = select_query(collection, filter, &FindOptions::limit(1))
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_document(collection, r)).transpose()
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let rows: Vec<Row> = select_query(collection, filter, &options)
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|r| row_to_document(collection, r))
            .collect()
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> StoreResult<Option<Document>> {
        if let Some(doc) = self.update_existing(collection, filter, update).await? {
            return Ok(Some(doc));
        }
        if !upsert {
            return Ok(None);
        }
        if let Some(doc) = self
            .insert_on_conflict_nothing(collection, update.seed_document(filter))
            .await?
        {
            return Ok(Some(doc));
        }
        // lost the race against a concurrent upsert of the same key
        self.update_existing(collection, filter, update).await
    }

    async fn insert_if_absent(
        &self,
        collection: &str,
        key: &Filter,
        doc: Document,
    ) -> StoreResult<(Document, bool)> {
        if let Some(existing) = self.find_one(collection, key).await? {
            return Ok((existing, false));
        }
        if let Some(inserted) = self.insert_on_conflict_nothing(collection, doc).await? {
            return Ok((inserted, true));
        }
        self.find_one(collection, key)
            .await?
            .map(|existing| (existing, false))
            .ok_or_else(|| StoreError::LostInsert(collection.to_owned()))
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM documents");
        push_filter(&mut qb, collection, filter);
        let n: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(n.max(0) as u64)
    }

    async fn collections(&self) -> StoreResult<Vec<String>> {
        Ok(
            sqlx::query_scalar("SELECT DISTINCT collection FROM documents ORDER BY collection")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
