use crate::error::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Why a run did or did not proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Deploy,
    /// The pushed ref does not name the deploy branch.
    Skip { pushed: String },
}

/// Decide whether a pushed ref should trigger a deploy of `branch`.
///
/// A skipped run is not an error: CI pipelines invoke dockhand on every push
/// and rely on this guard instead of duplicating the branch filter.
pub fn decide(pushed_ref: Option<&str>, branch: &str) -> Result<Decision> {
    validate_ref_name("branch", branch)?;

    let Some(pushed) = pushed_ref else {
        return Ok(Decision::Deploy);
    };

    validate_ref_name("ref", pushed)?;

    match branch_name(pushed) {
        Some(name) if name == branch => Ok(Decision::Deploy),
        _ => Ok(Decision::Skip {
            pushed: pushed.to_string(),
        }),
    }
}

/// Extract the branch name from a pushed ref.
///
/// `refs/heads/<name>` yields `<name>`; other fully-qualified refs (tags,
/// pull refs) never name a branch; a bare name passes through as-is.
pub fn branch_name(pushed_ref: &str) -> Option<&str> {
    if let Some(name) = pushed_ref.strip_prefix("refs/heads/") {
        return Some(name);
    }

    if pushed_ref.starts_with("refs/") {
        return None;
    }

    Some(pushed_ref)
}

fn ref_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Conservative subset of git check-ref-format: no whitespace, no
        // shell metacharacters, no leading dash or slash.
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._/\-]*$").unwrap()
    })
}

/// Reject ref/branch names that git itself would refuse or that would need
/// quoting games to survive a remote shell.
pub fn validate_ref_name(field: &str, name: &str) -> Result<()> {
    let ok = ref_name_pattern().is_match(name)
        && !name.contains("..")
        && !name.ends_with('/')
        && !name.ends_with(".lock");

    if ok {
        return Ok(());
    }

    Err(Error::validation_invalid_argument(
        field,
        format!("'{}' is not a valid git ref name", name),
        None,
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_name_from_heads_ref() {
        assert_eq!(branch_name("refs/heads/main"), Some("main"));
        assert_eq!(
            branch_name("refs/heads/release/2024"),
            Some("release/2024")
        );
    }

    #[test]
    fn tags_never_name_a_branch() {
        assert_eq!(branch_name("refs/tags/v1.2.3"), None);
        assert_eq!(branch_name("refs/pull/42/merge"), None);
    }

    #[test]
    fn bare_name_passes_through() {
        assert_eq!(branch_name("main"), Some("main"));
    }

    #[test]
    fn decide_deploys_on_match() {
        assert_eq!(
            decide(Some("refs/heads/main"), "main").unwrap(),
            Decision::Deploy
        );
        assert_eq!(decide(Some("main"), "main").unwrap(), Decision::Deploy);
    }

    #[test]
    fn decide_skips_on_mismatch() {
        let decision = decide(Some("refs/heads/feature/x"), "main").unwrap();
        assert_eq!(
            decision,
            Decision::Skip {
                pushed: "refs/heads/feature/x".to_string()
            }
        );
    }

    #[test]
    fn decide_skips_tag_push_to_deploy_branch_name() {
        let decision = decide(Some("refs/tags/main"), "main").unwrap();
        assert!(matches!(decision, Decision::Skip { .. }));
    }

    #[test]
    fn decide_without_ref_always_deploys() {
        assert_eq!(decide(None, "main").unwrap(), Decision::Deploy);
    }

    #[test]
    fn invalid_ref_names_rejected() {
        assert!(validate_ref_name("branch", "main").is_ok());
        assert!(validate_ref_name("branch", "release/2024").is_ok());
        assert!(validate_ref_name("branch", "a..b").is_err());
        assert!(validate_ref_name("branch", "-flag").is_err());
        assert!(validate_ref_name("branch", "has space").is_err());
        assert!(validate_ref_name("branch", "main.lock").is_err());
        assert!(validate_ref_name("branch", "trailing/").is_err());
        assert!(validate_ref_name("branch", "$(whoami)").is_err());
    }
}
