//! Rails version parsing and the preflight requirement.
//!
//! The requirement is the pessimistic constraint `~> 6.1.0`: anything in the
//! 6.1.x series satisfies it, 6.2 and 7.0 do not. Rails prints versions with
//! up to four segments (`6.1.4.1`); semver wants exactly three, so parsing
//! keeps the first three numeric segments and drops the rest.

use semver::{Version, VersionReq};

use crate::domain::DomainError;

/// Minimum framework requirement, checked once at preflight.
pub const RAILS_REQUIREMENT: &str = "~6.1.0";

/// The parsed form of [`RAILS_REQUIREMENT`].
pub fn rails_requirement() -> Result<VersionReq, DomainError> {
    VersionReq::parse(RAILS_REQUIREMENT).map_err(|_| DomainError::InvalidRequirement {
        requirement: RAILS_REQUIREMENT.to_string(),
    })
}

/// Parse the output of `rails --version` (e.g. `Rails 6.1.4.1`) into a
/// three-segment [`Version`].
pub fn parse_rails_version(output: &str) -> Result<Version, DomainError> {
    let unparseable = || DomainError::UnparseableVersion {
        output: output.trim().to_string(),
    };

    // The version is the first whitespace-separated token that starts with
    // a digit; `rails --version` prefixes it with the word "Rails".
    let token = output
        .split_whitespace()
        .find(|t| t.starts_with(|c: char| c.is_ascii_digit()))
        .ok_or_else(unparseable)?;

    let mut segments = token.split('.').map(|s| s.parse::<u64>());
    let major = segments.next().and_then(Result::ok).ok_or_else(unparseable)?;
    let minor = segments.next().and_then(Result::ok).unwrap_or(0);
    let patch = segments.next().and_then(Result::ok).unwrap_or(0);

    Ok(Version::new(major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_output() {
        assert_eq!(parse_rails_version("Rails 6.1.4").unwrap(), Version::new(6, 1, 4));
    }

    #[test]
    fn drops_fourth_segment() {
        assert_eq!(parse_rails_version("Rails 6.1.4.1\n").unwrap(), Version::new(6, 1, 4));
    }

    #[test]
    fn bare_version_without_prefix() {
        assert_eq!(parse_rails_version("7.0.0").unwrap(), Version::new(7, 0, 0));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(matches!(
            parse_rails_version("command not found"),
            Err(DomainError::UnparseableVersion { .. })
        ));
    }

    #[test]
    fn requirement_accepts_patch_releases() {
        let req = rails_requirement().unwrap();
        assert!(req.matches(&Version::new(6, 1, 0)));
        assert!(req.matches(&Version::new(6, 1, 7)));
    }

    #[test]
    fn requirement_rejects_other_series() {
        let req = rails_requirement().unwrap();
        assert!(!req.matches(&Version::new(6, 0, 3)));
        assert!(!req.matches(&Version::new(6, 2, 0)));
        assert!(!req.matches(&Version::new(7, 0, 0)));
    }
}
