use super::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use test_utils::GitFixture;

const MAIN: &str = "refs/heads/main";
const TICKET_REGEX: &str = "^[A-Z]+-[0-9]+ .*";

/// A `PROJ/service` repository with `main` at one commit and a
/// configuration directory next to it.
struct Setup {
    fixture: GitFixture,
    config: TempDir,
    main: String,
}

impl Setup {
    fn new(global_toml: &str) -> Self {
        let fixture = GitFixture::new("PROJ", "service").expect("Failed to create fixture");
        let main = fixture
            .commit(Some(MAIN), &[], "PROJ-1 initial", "Jane Doe", "jane@example.com")
            .unwrap();
        let config = TempDir::new().expect("Failed to create config dir");
        fs::write(config.path().join("global.toml"), global_toml).unwrap();
        Self {
            fixture,
            config,
            main,
        }
    }

    fn write(&self, relative: &str, content: &str) {
        let path = self.config.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// A commit on top of `main` that no ref points at yet.
    fn pushed_commit(&self, message: &str, name: &str, email: &str) -> String {
        self.fixture
            .commit(None, &[&self.main], message, name, email)
            .unwrap()
    }

    fn args(&self) -> PreReceiveArgs {
        PreReceiveArgs {
            repo: Some(self.fixture.path().to_path_buf()),
            user: Some("jdoe".to_string()),
            config_dir: Some(self.config.path().to_path_buf()),
        }
    }

    async fn run(&self, input: &str) -> (Decision, String) {
        let mut output = Vec::new();
        let decision = execute(&self.args(), input.as_bytes(), &mut output)
            .await
            .expect("pre-receive should reach a decision");
        (decision, String::from_utf8(output).unwrap())
    }
}

fn config_toml(commit_regex: &str) -> String {
    format!("commitMessageRegex = '{}'\n", commit_regex)
}

#[tokio::test]
async fn test_rejects_commit_with_bad_message() {
    let setup = Setup::new(&config_toml(TICKET_REGEX));
    let new = setup.pushed_commit("fix things", "Jane Doe", "jane@example.com");

    let (decision, output) = setup
        .run(&format!("{} {} {}\n", setup.main, new, MAIN))
        .await;

    assert_eq!(decision, Decision::Reject);
    assert_eq!(
        output,
        format!(
            "refs/heads/main: {}: commit message doesn't match regex: {}\n",
            &new[..11],
            TICKET_REGEX
        )
    );
}

#[tokio::test]
async fn test_allows_valid_commit_silently() {
    let setup = Setup::new(&config_toml(TICKET_REGEX));
    let new = setup.pushed_commit("PROJ-2 add feature", "Jane Doe", "jane@example.com");

    let (decision, output) = setup
        .run(&format!("{} {} {}\n", setup.main, new, MAIN))
        .await;

    assert_eq!(decision, Decision::Allow);
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_anchored_regex_accepts_git_message_newline() {
    let setup = Setup::new(&config_toml("^[A-Z]+-[0-9]+: .+$"));
    let new = setup.pushed_commit("ABC-1: fix\n", "Jane Doe", "jane@example.com");

    let (decision, output) = setup
        .run(&format!("{} {} {}\n", setup.main, new, MAIN))
        .await;

    assert_eq!(decision, Decision::Allow, "unexpected output: {}", output);
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_existing_commits_are_not_revalidated() {
    let setup = Setup::new(&config_toml(TICKET_REGEX));
    setup
        .fixture
        .set_ref("refs/heads/legacy", &setup.main)
        .unwrap();
    let legacy_bad = setup
        .fixture
        .commit(
            Some("refs/heads/legacy"),
            &[&setup.main],
            "old unticketed work",
            "Jane Doe",
            "jane@example.com",
        )
        .unwrap();
    let merge = setup
        .fixture
        .commit(
            None,
            &[&setup.main, &legacy_bad],
            "PROJ-3 merge legacy",
            "Jane Doe",
            "jane@example.com",
        )
        .unwrap();

    let (decision, output) = setup
        .run(&format!("{} {} {}\n", setup.main, merge, MAIN))
        .await;

    assert_eq!(decision, Decision::Allow, "unexpected output: {}", output);
}

#[tokio::test]
async fn test_committer_must_match_pusher() {
    let setup = Setup::new("requireMatchingAuthorName = true\nerrorMessageHeader = 'Push rejected'\n");
    setup.write(
        "users.toml",
        "[users.jdoe]\nname = \"Jane Doe\"\nemail = \"jane@example.com\"\n",
    );
    let new = setup.pushed_commit("PROJ-2 change", "Someone Else", "else@example.com");

    let (decision, output) = setup
        .run(&format!("{} {} {}\n", setup.main, new, MAIN))
        .await;

    assert_eq!(decision, Decision::Reject);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "Push rejected");
    assert_eq!(
        lines[1],
        format!(
            "refs/heads/main: {}: expected committer name 'Jane Doe' but found 'Someone Else'",
            &new[..11]
        )
    );
}

#[tokio::test]
async fn test_unknown_pusher_fails_closed() {
    let setup = Setup::new("requireMatchingAuthorEmail = true\n");
    let new = setup.pushed_commit("PROJ-2 change", "Jane Doe", "jane@example.com");

    let (decision, output) = setup
        .run(&format!("{} {} {}\n", setup.main, new, MAIN))
        .await;

    assert_eq!(decision, Decision::Reject);
    assert!(output.contains("Unable to verify committer identity"));
}

#[tokio::test]
async fn test_repository_settings_override_global() {
    let setup = Setup::new(&config_toml(TICKET_REGEX));
    setup.write(
        "repositories/PROJ/service.toml",
        "enabled = true\ncommitMessageRegex = '^wip'\n",
    );
    let new = setup.pushed_commit("wip: experiments", "Jane Doe", "jane@example.com");

    let (decision, _) = setup
        .run(&format!("{} {} {}\n", setup.main, new, MAIN))
        .await;

    assert_eq!(decision, Decision::Allow);
}

#[tokio::test]
async fn test_new_branch_name_is_checked() {
    let setup = Setup::new("branchNameRegex = '^(feature|bugfix)/'\n");
    let zero = "0".repeat(40);

    let (decision, output) = setup
        .run(&format!("{} {} refs/heads/wip\n", zero, setup.main))
        .await;

    assert_eq!(decision, Decision::Reject);
    assert_eq!(
        output,
        "refs/heads/wip: Invalid branch name. 'wip' does not match regex '^(feature|bugfix)/'\n"
    );
}

#[tokio::test]
async fn test_jql_filter_fails_closed_without_tracker() {
    let setup = Setup::new("issueJqlFilter = 'project = PROJ'\n");
    let new = setup.pushed_commit("PROJ-2 change", "Jane Doe", "jane@example.com");

    let (decision, output) = setup
        .run(&format!("{} {} {}\n", setup.main, new, MAIN))
        .await;

    assert_eq!(decision, Decision::Reject);
    assert!(output.contains("Unable to verify JIRA issues"));
}

#[tokio::test]
async fn test_deleting_a_branch_is_allowed() {
    let setup = Setup::new(&config_toml(TICKET_REGEX));
    let zero = "0".repeat(40);

    let (decision, output) = setup
        .run(&format!("{} {} refs/heads/old\n", setup.main, zero))
        .await;

    assert_eq!(decision, Decision::Allow);
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_empty_input_allows_without_opening_repository() {
    let args = PreReceiveArgs {
        repo: Some(Path::new("/nonexistent/PROJ/service.git").to_path_buf()),
        user: Some("jdoe".to_string()),
        config_dir: None,
    };
    let mut output = Vec::new();

    let decision = execute(&args, "\n".as_bytes(), &mut output).await.unwrap();

    assert_eq!(decision, Decision::Allow);
}

#[tokio::test]
async fn test_malformed_input_is_error() {
    let setup = Setup::new("");
    let mut output = Vec::new();

    let result = execute(&setup.args(), "garbage\n".as_bytes(), &mut output).await;

    assert!(matches!(result, Err(Error::InvalidHookInput { .. })));
}

#[tokio::test]
async fn test_missing_repository_is_git_error() {
    let config = TempDir::new().unwrap();
    let args = PreReceiveArgs {
        repo: Some(config.path().join("PROJ").join("missing")),
        user: Some("jdoe".to_string()),
        config_dir: Some(config.path().to_path_buf()),
    };
    let line = format!("{} {} {}\n", "1".repeat(40), "2".repeat(40), MAIN);
    let mut output = Vec::new();

    let result = execute(&args, line.as_bytes(), &mut output).await;

    assert!(matches!(result, Err(Error::Git(_))));
}
