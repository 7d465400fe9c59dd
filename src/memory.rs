use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::db::{new_id, Document, Filter, FindOptions, Store, StoreResult, Update};

/// Document store kept in process memory. Every operation takes the lock
/// once, so conditional writes cannot interleave.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<BTreeMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn with_id(mut doc: Document) -> (String, Document) {
    let id = new_id();
    doc.insert("_id".into(), Value::String(id.clone()));
    (id, doc)
}

fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn apply(doc: &mut Document, update: &Update) {
    doc.extend(update.set.clone());
    if let Some((field, value)) = &update.add_to_set {
        let entry = doc
            .entry(field.clone())
            .or_insert_with(|| Value::Array(Vec::new()));
        match entry {
            Value::Array(items) => {
                if !items.contains(value) {
                    items.push(value.clone());
                }
            }
            other => *other = Value::Array(vec![value.clone()]),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<String> {
        let (id, doc) = with_id(doc);
        self.collections
            .write()
            .await
            .entry(collection.to_owned())
            .or_default()
            .push(doc);
        Ok(id)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let guard = self.collections.read().await;
        let mut found: Vec<Document> = guard
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default();
        if let Some(field) = &options.sort_by {
            found.sort_by(|a, b| compare_field(a.get(field), b.get(field)));
        }
        if let Some(limit) = options.limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> StoreResult<Option<Document>> {
        let mut guard = self.collections.write().await;
        let docs = guard.entry(collection.to_owned()).or_default();
        if let Some(doc) = docs.iter_mut().find(|d| filter.matches(d)) {
            apply(doc, update);
            return Ok(Some(doc.clone()));
        }
        if !upsert {
            return Ok(None);
        }
        let (_, doc) = with_id(update.seed_document(filter));
        docs.push(doc.clone());
        Ok(Some(doc))
    }

    async fn insert_if_absent(
        &self,
        collection: &str,
        key: &Filter,
        doc: Document,
    ) -> StoreResult<(Document, bool)> {
        let mut guard = self.collections.write().await;
        let docs = guard.entry(collection.to_owned()).or_default();
        if let Some(existing) = docs.iter().find(|d| key.matches(d)) {
            return Ok((existing.clone(), false));
        }
        let (_, doc) = with_id(doc);
        docs.push(doc.clone());
        Ok((doc, true))
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count() as u64)
            .unwrap_or(0))
    }

    async fn collections(&self) -> StoreResult<Vec<String>> {
        let guard = self.collections.read().await;
        Ok(guard
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn close(&self) {}
}
