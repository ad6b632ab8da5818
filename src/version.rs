//! Build and version metadata.

use serde::Serialize;

/// Crate version, also sent in the version response header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN: &str = "unknown";

/// Version metadata shared by `--version`, `GET /version` and the version header.
///
/// Git and build fields are read from `APISERVER_GIT_TAG`, `APISERVER_GIT_COMMIT`,
/// `APISERVER_GIT_TREE_STATE` and `APISERVER_BUILD_DATE` at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_tag: &'static str,
    pub git_commit: &'static str,
    pub git_tree_state: &'static str,
    pub build_date: &'static str,
    pub compiler: &'static str,
    pub platform: String,
}

impl VersionInfo {
    pub fn get() -> Self {
        Self {
            version: VERSION,
            git_tag: option_env!("APISERVER_GIT_TAG").unwrap_or(UNKNOWN),
            git_commit: option_env!("APISERVER_GIT_COMMIT").unwrap_or(UNKNOWN),
            git_tree_state: option_env!("APISERVER_GIT_TREE_STATE").unwrap_or(UNKNOWN),
            build_date: option_env!("APISERVER_BUILD_DATE").unwrap_or(UNKNOWN),
            compiler: "rustc",
            platform: format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.version, self.platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_package() {
        let info = VersionInfo::get();

        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.platform.contains('/'));
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(VersionInfo::get()).unwrap();

        assert!(value.get("gitCommit").is_some());
        assert!(value.get("buildDate").is_some());
    }
}
