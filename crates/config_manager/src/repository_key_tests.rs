//! Tests for RepositoryKey

use super::*;

#[test]
fn test_valid_keys() {
    let key = RepositoryKey::new("PROJ", "my_repo.v2").unwrap();
    assert_eq!(key.project(), "PROJ");
    assert_eq!(key.slug(), "my_repo.v2");
    assert_eq!(key.to_string(), "PROJ/my_repo.v2");

    assert!(RepositoryKey::new("~user", "repo").is_err());
    assert!(RepositoryKey::new("a", "b").is_ok());
}

#[test]
fn test_empty_components_rejected() {
    let err = RepositoryKey::new("", "repo").unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::InvalidRepository { ref field, .. } if field == "project"
    ));

    let err = RepositoryKey::new("PROJ", "").unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::InvalidRepository { ref field, .. } if field == "slug"
    ));
}

#[test]
fn test_path_like_components_rejected() {
    assert!(RepositoryKey::new("PROJ", "../etc").is_err());
    assert!(RepositoryKey::new("PROJ", "a/b").is_err());
    assert!(RepositoryKey::new(".hidden", "repo").is_err());
    assert!(RepositoryKey::new("PROJ", "-flag").is_err());
}

#[test]
fn test_length_limit() {
    let long = "a".repeat(129);
    assert!(RepositoryKey::new("PROJ", long).is_err());
    assert!(RepositoryKey::new("PROJ", "a".repeat(128)).is_ok());
}

#[test]
fn test_keys_order_by_project_then_slug() {
    let a = RepositoryKey::new("A", "z").unwrap();
    let b = RepositoryKey::new("B", "a").unwrap();
    assert!(a < b);
}
