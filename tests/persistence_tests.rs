//! End-to-end persistence checks against throwaway SQLite files: the
//! resolver contract, idempotent schema creation, email uniqueness,
//! owned/unowned plan retrieval and session commit/rollback semantics.

use intellectmoney::auth::repo::User;
use intellectmoney::config::resolve_database_url;
use intellectmoney::db::Db;
use intellectmoney::plans::repo::{self as plans, NewFinancialPlan};

/// Fresh file-backed database per test; `mode=rwc` creates it on connect.
fn temp_db_url(name: &str) -> String {
    let path = std::env::temp_dir().join(format!(
        "intellectmoney-test-{}-{}.db",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    format!("sqlite://{}", path.display())
}

async fn fresh_db(name: &str) -> Db {
    let db = Db::connect(&temp_db_url(name)).await.expect("connect");
    db.create_all().await.expect("create_all");
    db
}

async fn insert_user(db: &Db, fullname: &str, email: &str) -> anyhow::Result<User> {
    let mut session = db.session().await?;
    let user = User::create(&mut session, fullname, email, "argon2-opaque-hash").await?;
    session.commit().await?;
    Ok(user)
}

#[test]
fn resolver_matches_documented_examples() {
    assert_eq!(
        resolve_database_url(Some("postgres://u:p@host/db".into())),
        "postgresql://u:p@host/db"
    );
    assert_eq!(
        resolve_database_url(Some("sqlite:///./x.db".into())),
        "sqlite:///./x.db"
    );
    assert_eq!(resolve_database_url(None), "sqlite:///./intellectmoney.db");
}

#[tokio::test]
async fn create_all_twice_keeps_existing_data() {
    let db = fresh_db("idempotent").await;

    let user = insert_user(&db, "Ada Lovelace", "ada@example.com")
        .await
        .expect("insert user");

    // Second pass must neither fail nor touch the existing row
    db.create_all().await.expect("create_all again");

    let found = User::find_by_email(db.pool(), "ada@example.com")
        .await
        .expect("lookup")
        .expect("user still present");
    assert_eq!(found.id, user.id);
    assert_eq!(found.fullname, "Ada Lovelace");
}

#[tokio::test]
async fn duplicate_email_is_rejected_by_storage() {
    let db = fresh_db("unique-email").await;

    insert_user(&db, "First User", "taken@example.com")
        .await
        .expect("first insert");

    let err = insert_user(&db, "Second User", "taken@example.com")
        .await
        .expect_err("unique index must reject the second insert");
    assert!(err.to_string().to_lowercase().contains("unique"));

    // The original row is untouched
    let found = User::find_by_email(db.pool(), "taken@example.com")
        .await
        .expect("lookup")
        .expect("first user survives");
    assert_eq!(found.fullname, "First User");
}

#[tokio::test]
async fn owned_plan_is_listed_for_its_owner() {
    let db = fresh_db("owned-plans").await;
    let owner = insert_user(&db, "Plan Owner", "owner@example.com")
        .await
        .expect("insert owner");
    let other = insert_user(&db, "Someone Else", "other@example.com")
        .await
        .expect("insert other");

    let mut session = db.session().await.expect("session");
    let stored = plans::insert(
        &mut session,
        NewFinancialPlan {
            income: 5000.0,
            expenses: 3200.0,
            savings: 10000.0,
            risk_tolerance: "moderate",
            ai_summary: Some("Spend less, save more."),
            recommendations_json: Some(r#"[{"action":"rebalance"}]"#),
            portfolio_json: Some(r#"{"stocks":0.6,"bonds":0.4}"#),
            owner_id: Some(owner.id),
        },
    )
    .await
    .expect("insert plan");
    session.commit().await.expect("commit");

    let listed = plans::list_by_owner(db.pool(), owner.id, 20, 0)
        .await
        .expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, stored.id);
    assert_eq!(listed[0].owner_id, Some(owner.id));
    assert_eq!(listed[0].risk_tolerance, "moderate");
    assert_eq!(listed[0].income, 5000.0);

    // Not visible in anyone else's collection
    let empty = plans::list_by_owner(db.pool(), other.id, 20, 0)
        .await
        .expect("list other");
    assert!(empty.is_empty());
}

#[tokio::test]
async fn unowned_plan_is_retrievable_directly() {
    let db = fresh_db("unowned-plans").await;
    let user = insert_user(&db, "Registered User", "registered@example.com")
        .await
        .expect("insert user");

    let mut session = db.session().await.expect("session");
    let stored = plans::insert(
        &mut session,
        NewFinancialPlan {
            income: 100.0,
            expenses: 90.0,
            savings: 0.0,
            risk_tolerance: "aggressive",
            ai_summary: None,
            recommendations_json: None,
            portfolio_json: None,
            owner_id: None,
        },
    )
    .await
    .expect("insert unowned plan");
    session.commit().await.expect("commit");

    let found = plans::find_by_id(db.pool(), stored.id)
        .await
        .expect("find")
        .expect("plan exists");
    assert_eq!(found.owner_id, None);
    assert_eq!(found.ai_summary, None);

    // Never surfaces in an owner listing
    let listed = plans::list_by_owner(db.pool(), user.id, 20, 0)
        .await
        .expect("list");
    assert!(listed.is_empty());
}

#[tokio::test]
async fn dropped_session_rolls_back() {
    let db = fresh_db("rollback").await;

    {
        let mut session = db.session().await.expect("session");
        User::create(&mut session, "Ghost", "ghost@example.com", "hash")
            .await
            .expect("insert inside session");
        // no commit; dropping the session must roll back
    }

    let found = User::find_by_email(db.pool(), "ghost@example.com")
        .await
        .expect("lookup");
    assert!(found.is_none());

    // The committed path is visible
    insert_user(&db, "Persisted", "persisted@example.com")
        .await
        .expect("insert with commit");
    assert!(User::find_by_email(db.pool(), "persisted@example.com")
        .await
        .expect("lookup")
        .is_some());
}

#[tokio::test]
async fn plan_timestamps_round_trip_as_utc() {
    let db = fresh_db("timestamps").await;

    let before = time::OffsetDateTime::now_utc();
    let mut session = db.session().await.expect("session");
    let stored = plans::insert(
        &mut session,
        NewFinancialPlan {
            income: 1.0,
            expenses: 1.0,
            savings: 1.0,
            risk_tolerance: "low",
            ai_summary: None,
            recommendations_json: None,
            portfolio_json: None,
            owner_id: None,
        },
    )
    .await
    .expect("insert");
    session.commit().await.expect("commit");
    let after = time::OffsetDateTime::now_utc();

    let found = plans::find_by_id(db.pool(), stored.id)
        .await
        .expect("find")
        .expect("plan exists");
    assert!(found.created_at >= before - time::Duration::seconds(1));
    assert!(found.created_at <= after + time::Duration::seconds(1));
}
