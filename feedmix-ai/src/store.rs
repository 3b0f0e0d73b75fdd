//! In-memory item store
//!
//! Authoritative state for every ingested item. Items keep insertion order
//! and are never removed. Every mutation replaces a single item under the
//! write lock, so readers never observe a half-applied update.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use feedmix_common::{Error, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::{ContentItem, ItemId, PersonalizedResult};

/// List selection used by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewFilter {
    #[default]
    All,
    Saved,
}

impl ViewFilter {
    pub fn matches(&self, item: &ContentItem) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Saved => item.is_saved,
        }
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    items: Vec<ContentItem>,
    index: HashMap<ItemId, usize>,
}

impl StoreInner {
    fn insert_all(&mut self, items: Vec<ContentItem>) -> Result<usize> {
        let mut incoming = HashSet::new();
        for item in &items {
            if self.index.contains_key(&item.id) || !incoming.insert(item.id.clone()) {
                return Err(Error::Duplicate(format!("Item id already exists: {}", item.id)));
            }
        }

        let count = items.len();
        for item in items {
            self.index.insert(item.id.clone(), self.items.len());
            self.items.push(item);
        }
        Ok(count)
    }

    fn item_mut(&mut self, id: &ItemId) -> Result<&mut ContentItem> {
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("Item not found: {}", id)))?;
        Ok(&mut self.items[pos])
    }
}

/// Shared handle to the item collection; clones see the same items
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert items in order
    ///
    /// All-or-nothing: if any id is already present (or repeated within
    /// `items`), nothing is inserted and `Error::Duplicate` is returned.
    pub async fn insert_all(&self, items: Vec<ContentItem>) -> Result<usize> {
        self.inner.write().await.insert_all(items)
    }

    /// Insert items only while the store is still empty
    ///
    /// The emptiness check and the insert happen under one write lock.
    /// Returns `Ok(None)` without inserting when items are already present.
    pub async fn insert_all_if_empty(&self, items: Vec<ContentItem>) -> Result<Option<usize>> {
        let mut inner = self.inner.write().await;
        if !inner.items.is_empty() {
            return Ok(None);
        }
        inner.insert_all(items).map(Some)
    }

    pub async fn get(&self, id: &ItemId) -> Result<ContentItem> {
        let inner = self.inner.read().await;
        inner
            .index
            .get(id)
            .map(|&pos| inner.items[pos].clone())
            .ok_or_else(|| Error::NotFound(format!("Item not found: {}", id)))
    }

    /// Replace the item's user context (no validation of the text)
    pub async fn set_context(&self, id: &ItemId, text: impl Into<String>) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.item_mut(id)?.user_context = text.into();
        Ok(())
    }

    pub async fn set_saved(&self, id: &ItemId, value: bool) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.item_mut(id)?.is_saved = value;
        Ok(())
    }

    /// Flip the save flag, returning the new value
    pub async fn toggle_saved(&self, id: &ItemId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let item = inner.item_mut(id)?;
        item.is_saved = !item.is_saved;
        Ok(item.is_saved)
    }

    /// Replace any previous result wholesale
    pub async fn set_personalized_result(
        &self,
        id: &ItemId,
        result: PersonalizedResult,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.item_mut(id)?.personalized_result = Some(result);
        Ok(())
    }

    /// Items matching `predicate`, in insertion order
    pub async fn filter<F>(&self, predicate: F) -> Vec<ContentItem>
    where
        F: Fn(&ContentItem) -> bool,
    {
        let inner = self.inner.read().await;
        inner.items.iter().filter(|&item| predicate(item)).cloned().collect()
    }

    pub async fn view(&self, view: ViewFilter) -> Vec<ContentItem> {
        self.filter(|item| view.matches(item)).await
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Platform;

    fn item(id: &str, saved: bool) -> ContentItem {
        ContentItem::new(id, format!("Title {}", id), "Summary", Platform::News, "https://img")
            .with_saved(saved)
    }

    fn ids(items: &[ContentItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    async fn seeded() -> ItemStore {
        let store = ItemStore::new();
        store
            .insert_all(vec![item("A", false), item("B", true), item("C", true)])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_filter_saved_and_all_preserve_order() {
        let store = seeded().await;

        let saved = store.view(ViewFilter::Saved).await;
        assert_eq!(ids(&saved), vec!["B", "C"]);

        let all = store.view(ViewFilter::All).await;
        assert_eq!(ids(&all), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_filter_with_custom_predicate() {
        let store = seeded().await;
        let not_saved = store.filter(|i| !i.is_saved).await;
        assert_eq!(ids(&not_saved), vec!["A"]);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = seeded().await;
        let missing = ItemId::new("Z");

        assert!(matches!(store.get(&missing).await, Err(Error::NotFound(_))));
        assert!(matches!(store.set_context(&missing, "x").await, Err(Error::NotFound(_))));
        assert!(matches!(store.set_saved(&missing, true).await, Err(Error::NotFound(_))));
        assert!(matches!(store.toggle_saved(&missing).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_ids_rejected_atomically() {
        let store = seeded().await;

        let err = store.insert_all(vec![item("D", false), item("A", false)]).await;
        assert!(matches!(err, Err(Error::Duplicate(_))));
        assert_eq!(store.len().await, 3, "no partial insert");

        let err = store.insert_all(vec![item("E", false), item("E", false)]).await;
        assert!(matches!(err, Err(Error::Duplicate(_))));
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_insert_if_empty_only_once() {
        let store = ItemStore::new();

        let first = store.insert_all_if_empty(vec![item("A", false)]).await.unwrap();
        assert_eq!(first, Some(1));

        let second = store
            .insert_all_if_empty(vec![item("A", false), item("B", false)])
            .await
            .unwrap();
        assert_eq!(second, None);
        assert_eq!(ids(&store.view(ViewFilter::All).await), vec!["A"]);
    }

    #[tokio::test]
    async fn test_context_and_save_updates() {
        let store = seeded().await;
        let a = ItemId::new("A");

        store.set_context(&a, "make it funny").await.unwrap();
        assert_eq!(store.get(&a).await.unwrap().user_context, "make it funny");

        assert!(store.toggle_saved(&a).await.unwrap());
        assert!(!store.toggle_saved(&a).await.unwrap());

        store.set_saved(&a, true).await.unwrap();
        assert_eq!(ids(&store.view(ViewFilter::Saved).await), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_personalized_result_is_replaced() {
        let store = seeded().await;
        let b = ItemId::new("B");

        store
            .set_personalized_result(
                &b,
                PersonalizedResult {
                    text: "first".into(),
                    image_reference: "data:image/png;base64,AAAA".into(),
                },
            )
            .await
            .unwrap();
        let second = PersonalizedResult {
            text: "second".into(),
            image_reference: "https://img".into(),
        };
        store.set_personalized_result(&b, second.clone()).await.unwrap();

        assert_eq!(store.get(&b).await.unwrap().personalized_result, Some(second));
    }
}
