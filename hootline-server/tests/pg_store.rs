//! Postgres store tests. These need a live database:
//!
//!   DATABASE_URL=postgres://postgres@localhost/hootline_test \
//!       cargo test -p hootline-server --test pg_store -- --ignored

use uuid::Uuid;

use hootline_core::config::DatabaseConfig;
use hootline_core::HootDraft;
use hootline_server::db::{self, migrations, HootStore, OwnedWrite, PgStore, UserStore};

async fn test_store() -> PgStore {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost/hootline_test".to_string());
    let config = DatabaseConfig {
        url,
        max_connections: 2,
    };
    let pool = db::create_pool(&config).await.expect("database reachable");
    migrations::run(&pool).await.expect("migrations apply");
    PgStore::new(pool)
}

/// Usernames are unique in the schema; suffix them so reruns don't collide.
fn unique(name: &str) -> String {
    format!("{name}-{}", Uuid::new_v4())
}

#[tokio::test]
#[ignore = "requires database"]
async fn crud_roundtrip() {
    let store = test_store().await;
    let user = store.insert(&unique("roundtrip")).await.unwrap();

    let created = store
        .create(
            user.id,
            HootDraft::new(Some("title".into()), Some("text".into()), None),
        )
        .await
        .unwrap();
    assert_eq!(created.author_id, user.id);
    assert_eq!(created.title.as_deref(), Some("title"));

    let fetched = store.find(created.id).await.unwrap().expect("row exists");
    assert_eq!(fetched.hoot, created);
    assert_eq!(fetched.author.id, user.id);
    assert_eq!(fetched.author.username, user.username);

    let outcome = store
        .update_owned(
            created.id,
            user.id,
            HootDraft::new(Some("new title".into()), None, Some("cat".into())),
        )
        .await
        .unwrap();
    match outcome {
        OwnedWrite::Applied(updated) => {
            assert_eq!(updated.id, created.id);
            assert_eq!(updated.author_id, user.id);
            assert_eq!(updated.title.as_deref(), Some("new title"));
            // full-document semantics: the omitted field went null
            assert_eq!(updated.text, None);
            assert_eq!(updated.category.as_deref(), Some("cat"));
            assert_eq!(updated.created_at, created.created_at);
            assert!(updated.updated_at >= created.updated_at);
        }
        other => panic!("expected Applied, got {other:?}"),
    }

    match store.delete_owned(created.id, user.id).await.unwrap() {
        OwnedWrite::Applied(removed) => assert_eq!(removed.id, created.id),
        other => panic!("expected Applied, got {other:?}"),
    }
    assert!(store.find(created.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn ownership_guard_holds() {
    let store = test_store().await;
    let owner = store.insert(&unique("owner")).await.unwrap();
    let intruder = store.insert(&unique("intruder")).await.unwrap();

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

    let unchanged = store.find(hoot.id).await.unwrap().expect("row exists");
    assert_eq!(unchanged.hoot.title.as_deref(), Some("mine"));

    assert_eq!(
        store.delete_owned(hoot.id, intruder.id).await.unwrap(),
        OwnedWrite::NotOwner
    );
    assert_eq!(
        store.delete_owned(Uuid::new_v4(), owner.id).await.unwrap(),
        OwnedWrite::Missing
    );

    // cleanup so reruns start clean
    assert!(matches!(
        store.delete_owned(hoot.id, owner.id).await.unwrap(),
        OwnedWrite::Applied(_)
    ));
}

#[tokio::test]
#[ignore = "requires database"]
async fn list_is_newest_first() {
    let store = test_store().await;
    let user = store.insert(&unique("lister")).await.unwrap();

    let older = store
        .create(user.id, HootDraft::new(Some("older".into()), None, None))
        .await
        .unwrap();
    let newer = store
        .create(user.id, HootDraft::new(Some("newer".into()), None, None))
        .await
        .unwrap();

    let listed = store.list().await.unwrap();
    let position = |id: Uuid| listed.iter().position(|entry| entry.hoot.id == id);

    // the shared table may hold other rows; only relative order matters
    let newer_pos = position(newer.id).expect("newer row listed");
    let older_pos = position(older.id).expect("older row listed");
    assert!(newer_pos < older_pos);

    store.delete_owned(older.id, user.id).await.unwrap();
    store.delete_owned(newer.id, user.id).await.unwrap();
}
