//! Violation message text.
//!
//! Each rule has a built-in phrase. A custom message configured for the rule
//! replaces the phrase; location prefixes are added later by the report.

use config_manager::ErrorMessages;

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;

pub const NO_ISSUE_DEFAULT: &str = "No JIRA Issue found in commit message.";

fn custom(text: &Option<String>) -> Option<String> {
    text.as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
}

pub fn committer_name(messages: &ErrorMessages, expected: &str, actual: &str) -> String {
    custom(&messages.committer_name).unwrap_or_else(|| {
        format!(
            "expected committer name '{}' but found '{}'",
            expected, actual
        )
    })
}

pub fn committer_email(messages: &ErrorMessages, expected: &str, actual: &str) -> String {
    custom(&messages.committer_email).unwrap_or_else(|| {
        format!(
            "expected committer email '{}' but found '{}'",
            expected, actual
        )
    })
}

pub fn committer_email_regex(messages: &ErrorMessages, regex: &str, email: &str) -> String {
    custom(&messages.committer_email_regex).unwrap_or_else(|| {
        format!(
            "committer email regex '{}' does not match user email '{}'",
            regex, email
        )
    })
}

pub fn commit_regex(messages: &ErrorMessages, regex: &str) -> String {
    custom(&messages.commit_regex)
        .unwrap_or_else(|| format!("commit message doesn't match regex: {}", regex))
}

/// Issue exists but is outside the JQL filter.
pub fn issue_jql(messages: &ErrorMessages, key: &str, jql: &str) -> String {
    let text = custom(&messages.issue_jql)
        .unwrap_or_else(|| format!("JIRA Issue does not match JQL Query: {}", jql));
    format!("{}: {}", key, text)
}

/// Issue key does not exist in the tracker.
pub fn issue_missing(messages: &ErrorMessages, key: &str) -> String {
    let text = custom(&messages.issue_jql).unwrap_or_else(|| "JIRA Issue does not exist".to_string());
    format!("{}: {}", key, text)
}

pub fn no_issue(messages: &ErrorMessages) -> String {
    custom(&messages.no_jira_issue).unwrap_or_else(|| NO_ISSUE_DEFAULT.to_string())
}

pub fn branch_name(messages: &ErrorMessages, name: &str, regex: &str) -> String {
    custom(&messages.branch_name).unwrap_or_else(|| {
        format!(
            "Invalid branch name. '{}' does not match regex '{}'",
            name, regex
        )
    })
}
