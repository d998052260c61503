use database::user::{email, id, name};
use database::{DbError, InMemoryClient, Lifecycle, UserStore};

async fn connected() -> InMemoryClient {
    let client = InMemoryClient::new();
    client.connect().await.unwrap();
    client
}

#[tokio::test]
async fn create_then_find_by_email_returns_the_same_user() {
    let client = connected().await;

    let created = client
        .user()
        .create_one(email::set("john.doe@example.com"), vec![name::set("John Doe")])
        .exec()
        .await
        .unwrap();

    let found = client
        .user()
        .find_one(vec![email::equals("john.doe@example.com")])
        .exec()
        .await
        .unwrap();

    assert_eq!(found, created);
    assert_eq!(found.email, "john.doe@example.com");
    assert_eq!(found.name(), Some("John Doe"));
}

#[tokio::test]
async fn omitted_id_is_generated() {
    let client = connected().await;

    let first = client.user().create_one(email::set("a@example.com"), vec![]).exec().await.unwrap();
    let second = client.user().create_one(email::set("b@example.com"), vec![]).exec().await.unwrap();

    assert!(uuid_like(&first.id));
    assert_ne!(first.id, second.id);
    assert_eq!(first.name(), None);
}

#[tokio::test]
async fn explicit_id_is_kept() {
    let client = connected().await;

    let created = client
        .user()
        .create_one(email::set("a@example.com"), vec![id::set("123")])
        .exec()
        .await
        .unwrap();

    assert_eq!(created.id, "123");
    let found = client.user().find_one(vec![id::equals("123")]).exec().await.unwrap();
    assert_eq!(found.email, "a@example.com");
}

#[tokio::test]
async fn later_directives_override_earlier_ones() {
    let client = connected().await;

    let created = client
        .user()
        .create_one(
            email::set("a@example.com"),
            vec![name::set("First"), name::set_null()],
        )
        .exec()
        .await
        .unwrap();

    assert_eq!(created.name(), None);
}

#[tokio::test]
async fn duplicate_email_is_a_unique_violation() {
    let client = connected().await;

    client.user().create_one(email::set("a@example.com"), vec![]).exec().await.unwrap();
    let second = client.user().create_one(email::set("a@example.com"), vec![]).exec().await;

    assert!(matches!(second, Err(DbError::UniqueViolation(_))));
    assert_eq!(client.users().await.len(), 1);
}

#[tokio::test]
async fn find_one_without_match_is_not_found() {
    let client = connected().await;

    let result = client.user().find_one(vec![email::equals("nobody@example.com")]).exec().await;

    assert!(matches!(result, Err(DbError::NotFound)));
}

#[tokio::test]
async fn find_one_with_two_matches_is_ambiguous() {
    let client = connected().await;
    client.user().create_one(email::set("a@example.com"), vec![]).exec().await.unwrap();
    client.user().create_one(email::set("b@example.com"), vec![]).exec().await.unwrap();

    let result = client.user().find_one(vec![name::equals(None)]).exec().await;

    assert!(matches!(result, Err(DbError::AmbiguousMatch)));
}

#[tokio::test]
async fn find_first_treats_absence_as_a_value() {
    let client = connected().await;

    let missing = client.user().find_first(vec![email::equals("x@example.com")]).exec().await.unwrap();
    assert!(missing.is_none());

    client.user().create_one(email::set("x@example.com"), vec![]).exec().await.unwrap();
    let present = client.user().find_first(vec![email::equals("x@example.com")]).exec().await.unwrap();
    assert_eq!(present.map(|u| u.email), Some("x@example.com".to_string()));
}

#[tokio::test]
async fn predicates_are_combined_with_and() {
    let client = connected().await;
    client
        .user()
        .create_one(email::set("a@example.com"), vec![name::set("Ann")])
        .exec()
        .await
        .unwrap();

    let mismatch = client
        .user()
        .find_first(vec![email::equals("a@example.com"), name::equals(Some("Bob".to_string()))])
        .exec()
        .await
        .unwrap();

    assert!(mismatch.is_none());
}

#[tokio::test]
async fn queries_require_a_connection() {
    let client = InMemoryClient::new();

    let result = client.user().create_one(email::set("a@example.com"), vec![]).exec().await;

    assert!(matches!(result, Err(DbError::NotConnected)));
}

#[tokio::test]
async fn lifecycle_rejects_double_connect_and_stray_disconnect() {
    let client = InMemoryClient::new();

    assert!(matches!(client.disconnect().await, Err(DbError::NotConnected)));
    client.connect().await.unwrap();
    assert!(matches!(client.connect().await, Err(DbError::AlreadyConnected)));
    assert!(client.is_connected().await);
    client.disconnect().await.unwrap();
    assert!(!client.is_connected().await);
}

fn uuid_like(value: &str) -> bool {
    value.len() == 36 && value.chars().filter(|c| *c == '-').count() == 4
}
