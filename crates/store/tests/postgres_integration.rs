//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::{
    City, DateRange, Page, Product, ProductType, Pvz, PvzId, Reception, ReceptionStatus, Role,
    User, UserId,
};
use sqlx::PgPool;
use store::store::constraints;
use store::{PostgresStore, ProductStore, PvzStore, ReceptionStore, StoreError, UserStore};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!("../../../migrations/001_create_tables.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE products, receptions, pvz, users")
        .execute(&pool)
        .await
        .unwrap();

    PostgresStore::new(pool)
}

async fn seed_pvz(store: &PostgresStore, id: &str) -> Pvz {
    let pvz = Pvz::new(id, Utc::now(), City::Kazan);
    store.create_pvz(&pvz).await.unwrap();
    pvz
}

#[tokio::test]
async fn create_and_fetch_pvz() {
    let store = get_test_store().await;
    let pvz = seed_pvz(&store, "p1").await;

    let found = store.get_pvz(&pvz.id).await.unwrap().unwrap();
    assert_eq!(found, pvz);
    assert_eq!(found.city, City::Kazan);

    assert!(store.get_pvz(&PvzId::new("missing")).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_pvz_maps_to_conflict() {
    let store = get_test_store().await;
    let pvz = seed_pvz(&store, "p1").await;

    let err = store.create_pvz(&pvz).await.unwrap_err();
    assert!(err.is_conflict_on(constraints::PVZ_PRIMARY_KEY));
}

#[tokio::test]
async fn pvz_pages_follow_id_order() {
    let store = get_test_store().await;
    for id in ["p3", "p1", "p5", "p2", "p4"] {
        seed_pvz(&store, id).await;
    }

    let page = store.list_pvz_page(Page::new(2, 2).unwrap()).await.unwrap();
    let ids: Vec<_> = page.iter().map(|p| p.id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["p3", "p4"]);

    assert_eq!(store.list_all_pvz().await.unwrap().len(), 5);
}

#[tokio::test]
async fn partial_unique_index_blocks_second_open_reception() {
    let store = get_test_store().await;
    let pvz = seed_pvz(&store, "p1").await;

    let first = Reception::open(pvz.id.clone());
    store.create_reception(&first).await.unwrap();

    let err = store
        .create_reception(&Reception::open(pvz.id.clone()))
        .await
        .unwrap_err();
    assert!(err.is_conflict_on(constraints::ONE_OPEN_RECEPTION));

    // Closing frees the slot
    store
        .update_reception_status(&first.id, ReceptionStatus::Closed)
        .await
        .unwrap();
    store
        .create_reception(&Reception::open(pvz.id.clone()))
        .await
        .unwrap();
}

#[tokio::test]
async fn last_reception_is_latest_by_opening_time() {
    let store = get_test_store().await;
    let pvz = seed_pvz(&store, "p1").await;

    let mut older = Reception::open(pvz.id.clone());
    older.opened_at = Utc::now() - Duration::hours(1);
    older.status = ReceptionStatus::Closed;
    store.create_reception(&older).await.unwrap();

    let newer = Reception::open(pvz.id.clone());
    store.create_reception(&newer).await.unwrap();

    let last = store.last_reception_for_pvz(&pvz.id).await.unwrap().unwrap();
    assert_eq!(last, newer);
    assert_eq!(last.status, ReceptionStatus::InProgress);

    assert!(
        store
            .last_reception_for_pvz(&PvzId::new("nowhere"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn receptions_filtered_by_date_range() {
    let store = get_test_store().await;
    let pvz = seed_pvz(&store, "p1").await;
    let now = Utc::now();

    let mut old = Reception::open(pvz.id.clone());
    old.opened_at = now - Duration::days(10);
    old.status = ReceptionStatus::Closed;
    store.create_reception(&old).await.unwrap();

    let current = Reception::open(pvz.id.clone());
    store.create_reception(&current).await.unwrap();

    let ids = vec![pvz.id.clone()];
    let all = store
        .receptions_for_pvzs(&ids, DateRange::unbounded())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let recent = store
        .receptions_for_pvzs(&ids, DateRange::new(Some(now - Duration::days(1)), None))
        .await
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, current.id);

    let none = store.receptions_for_pvzs(&[], DateRange::unbounded()).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn products_last_delete_and_bulk_fetch() {
    let store = get_test_store().await;
    let pvz = seed_pvz(&store, "p1").await;
    let reception = Reception::open(pvz.id.clone());
    store.create_reception(&reception).await.unwrap();

    let first = Product::new(ProductType::Electronics, reception.id.clone());
    let second = Product::new(ProductType::Shoes, reception.id.clone());
    store.create_product(&first).await.unwrap();
    store.create_product(&second).await.unwrap();

    let last = store
        .last_product_for_reception(&reception.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(last, second);
    assert_eq!(last.product_type, ProductType::Shoes);

    store.delete_product(&second.id).await.unwrap();

    let remaining = store
        .products_for_receptions(&[reception.id.clone()])
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, first.id);
}

#[tokio::test]
async fn users_unique_by_email() {
    let store = get_test_store().await;
    let user = User {
        id: UserId::generate(),
        email: "worker@pvz.ru".to_string(),
        password_hash: "$argon2id$stub".to_string(),
        role: Role::Employee,
    };
    store.create_user(&user).await.unwrap();

    let found = store
        .find_user_by_email("worker@pvz.ru")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, user);

    let duplicate = User {
        id: UserId::generate(),
        ..user.clone()
    };
    let err = store.create_user(&duplicate).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));
    assert!(err.is_conflict_on(constraints::USER_EMAIL));

    assert!(store.find_user_by_email("nobody@pvz.ru").await.unwrap().is_none());
}
