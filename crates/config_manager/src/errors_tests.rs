use super::*;

#[test]
fn test_invalid_pattern_error_names_field() {
    let error = ConfigurationError::InvalidPattern {
        field: SettingField::CommitMessageRegex,
        pattern: "(invalid".to_string(),
        reason: "unclosed group".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "Invalid regular expression in commitMessageRegex: '(invalid' - unclosed group"
    );
    assert_eq!(error.field(), Some(SettingField::CommitMessageRegex));
}

#[test]
fn test_store_unavailable_error_has_no_field() {
    let error = ConfigurationError::StoreUnavailable {
        reason: "disk on fire".to_string(),
    };

    assert_eq!(error.to_string(), "Settings store unavailable: disk on fire");
    assert_eq!(error.field(), None);
}

#[test]
fn test_validation_failed_error_counts_errors() {
    let error = ConfigurationError::ValidationFailed {
        error_count: 2,
        errors: vec![
            ValidationError::new(SettingField::ExcludeByRegex, "bad"),
            ValidationError::new(SettingField::ExcludeBranchRegex, "bad"),
        ],
    };

    assert_eq!(
        error.to_string(),
        "Settings validation failed with 2 error(s)"
    );
}
