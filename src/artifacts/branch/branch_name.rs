use crate::artifacts::branch::{DEFAULT_BRANCH, INVALID_BRANCH_NAME_REGEX};
use crate::errors::TwigError;
use anyhow::Context;

/// Validated branch name
///
/// Hierarchical names such as `origin/master` are allowed; each segment
/// becomes a directory under `refs/heads`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            return Err(TwigError::InvalidBranchName(name).into());
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            Err(TwigError::InvalidBranchName(name).into())
        } else {
            Ok(Self(name))
        }
    }

    pub fn default_branch() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }

    /// Local branch a fetch from `remote` writes `branch` into
    pub fn tracking(remote: &str, branch: &BranchName) -> anyhow::Result<Self> {
        Self::try_parse(format!("{}/{}", remote, branch))
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;
    use rstest::rstest;

    proptest! {
        #[test]
        fn accepts_plain_names(branch_name in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn accepts_hierarchical_names(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            assert!(BranchName::try_parse(format!("{}/{}", prefix, suffix)).is_ok());
        }

        #[test]
        fn rejects_names_ending_with_lock(prefix in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(format!("{}.lock", prefix)).is_err());
        }

        #[test]
        fn rejects_consecutive_dots(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            assert!(BranchName::try_parse(format!("{}..{}", prefix, suffix)).is_err());
        }
    }

    #[rstest]
    #[case("")]
    #[case(".hidden")]
    #[case("/leading")]
    #[case("trailing/")]
    #[case("with space")]
    #[case("star*")]
    #[case("at@{brace")]
    fn invalid_names_have_a_kind(#[case] name: &str) {
        let error = BranchName::try_parse(name.to_string()).unwrap_err();

        assert_eq!(
            error.downcast_ref::<TwigError>(),
            Some(&TwigError::InvalidBranchName(name.to_string()))
        );
    }

    #[test]
    fn tracking_branches_nest_under_the_remote() {
        let branch = BranchName::try_parse("master".to_string()).unwrap();

        assert_eq!(
            BranchName::tracking("origin", &branch).unwrap().as_ref(),
            "origin/master"
        );
    }
}
