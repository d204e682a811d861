//! In-memory store used by the router tests.
//!
//! Same contract as the Postgres backend, including newest-first listing.
//! Ties on `created_at` (easy to hit with an in-process clock) fall back to
//! insertion order, latest first, so list output is deterministic.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use hootline_core::{Hoot, HootDraft, User};

use super::{HootStore, HootWithAuthor, OwnedWrite, StoreError, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    seq: u64,
    users: HashMap<Uuid, User>,
    hoots: HashMap<Uuid, (u64, Hoot)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HootStore for MemoryStore {
    async fn create(&self, author_id: Uuid, draft: HootDraft) -> Result<Hoot, StoreError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let hoot = Hoot {
            id: Uuid::new_v4(),
            author_id,
            title: draft.title,
            text: draft.text,
            category: draft.category,
            created_at: now,
            updated_at: now,
        };
        inner.seq += 1;
        let seq = inner.seq;
        inner.hoots.insert(hoot.id, (seq, hoot.clone()));
        Ok(hoot)
    }

    async fn list(&self) -> Result<Vec<HootWithAuthor>, StoreError> {
        let inner = self.inner.read().await;
        let mut entries: Vec<(u64, HootWithAuthor)> = Vec::with_capacity(inner.hoots.len());
        for (seq, hoot) in inner.hoots.values() {
            // authors always exist: hoots are only created under a live principal
            let author = match inner.users.get(&hoot.author_id) {
                Some(user) => user.clone(),
                None => continue,
            };
            entries.push((
                *seq,
                HootWithAuthor {
                    hoot: hoot.clone(),
                    author,
                },
            ));
        }
        entries.sort_by(|(seq_a, a), (seq_b, b)| {
            b.hoot
                .created_at
                .cmp(&a.hoot.created_at)
                .then(seq_b.cmp(seq_a))
        });
        Ok(entries.into_iter().map(|(_, entry)| entry).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<HootWithAuthor>, StoreError> {
        let inner = self.inner.read().await;
        let found = inner.hoots.get(&id).and_then(|(_, hoot)| {
            inner.users.get(&hoot.author_id).map(|author| HootWithAuthor {
                hoot: hoot.clone(),
                author: author.clone(),
            })
        });
        Ok(found)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        draft: HootDraft,
    ) -> Result<OwnedWrite, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.hoots.get_mut(&id) {
            None => Ok(OwnedWrite::Missing),
            Some((_, hoot)) if hoot.author_id != author_id => Ok(OwnedWrite::NotOwner),
            Some((_, hoot)) => {
                hoot.title = draft.title;
                hoot.text = draft.text;
                hoot.category = draft.category;
                hoot.updated_at = Utc::now();
                Ok(OwnedWrite::Applied(hoot.clone()))
            }
        }
    }

    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<OwnedWrite, StoreError> {
        let mut inner = self.inner.write().await;
        // take the row out, put it back if the caller turns out not to own
        // it; the write lock makes the whole dance invisible to readers
        match inner.hoots.remove(&id) {
            None => Ok(OwnedWrite::Missing),
            Some((seq, hoot)) if hoot.author_id != author_id => {
                inner.hoots.insert(id, (seq, hoot));
                Ok(OwnedWrite::NotOwner)
            }
            Some((_, hoot)) => Ok(OwnedWrite::Applied(hoot)),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn insert(&self, username: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_user(username: &str) -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = store.insert(username).await.unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (store, user) = store_with_user("owl").await;
        let first = store
            .create(user.id, HootDraft::new(Some("first".into()), None, None))
            .await
            .unwrap();
        let second = store
            .create(user.id, HootDraft::new(Some("second".into()), None, None))
            .await
            .unwrap();
        let third = store
            .create(user.id, HootDraft::new(Some("third".into()), None, None))
            .await
            .unwrap();

        let listed = store.list().await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|entry| entry.hoot.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
        assert!(listed.iter().all(|entry| entry.author.id == user.id));
    }

    #[tokio::test]
    async fn update_by_non_owner_changes_nothing() {
        let (store, owner) = store_with_user("owner").await;
        let intruder = store.insert("intruder").await.unwrap();
        let hoot = store
            .create(owner.id, HootDraft::new(Some("mine".into()), None, None))
            .await
            .unwrap();

        let outcome = store
            .update_owned(
                hoot.id,
                intruder.id,
                HootDraft::new(Some("stolen".into()), None, None),
            )
            .await
            .unwrap();
        assert_eq!(outcome, OwnedWrite::NotOwner);

        let unchanged = store.find(hoot.id).await.unwrap().unwrap();
        assert_eq!(unchanged.hoot.title.as_deref(), Some("mine"));
    }

    #[tokio::test]
    async fn update_replaces_whole_document() {
        let (store, user) = store_with_user("owl").await;
        let hoot = store
            .create(
                user.id,
                HootDraft::new(Some("t".into()), Some("x".into()), Some("c".into())),
            )
            .await
            .unwrap();

        let outcome = store
            .update_owned(hoot.id, user.id, HootDraft::new(Some("t2".into()), None, None))
            .await
            .unwrap();

        match outcome {
            OwnedWrite::Applied(updated) => {
                assert_eq!(updated.title.as_deref(), Some("t2"));
                assert_eq!(updated.text, None);
                assert_eq!(updated.category, None);
                assert_eq!(updated.id, hoot.id);
                assert_eq!(updated.created_at, hoot.created_at);
                assert!(updated.updated_at >= hoot.updated_at);
            }
            other => panic!("expected Applied, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_missing_and_not_owner() {
        let (store, owner) = store_with_user("owner").await;
        let intruder = store.insert("intruder").await.unwrap();
        let hoot = store
            .create(owner.id, HootDraft::default())
            .await
            .unwrap();

        assert_eq!(
            store.delete_owned(Uuid::new_v4(), owner.id).await.unwrap(),
            OwnedWrite::Missing
        );
        assert_eq!(
            store.delete_owned(hoot.id, intruder.id).await.unwrap(),
            OwnedWrite::NotOwner
        );

        // still there, then gone once the owner asks
        assert!(store.find(hoot.id).await.unwrap().is_some());
        match store.delete_owned(hoot.id, owner.id).await.unwrap() {
            OwnedWrite::Applied(removed) => assert_eq!(removed.id, hoot.id),
            other => panic!("expected Applied, got {other:?}"),
        }
        assert!(store.find(hoot.id).await.unwrap().is_none());
    }
}
