use std::fmt;

use serde::Serialize;

/// Build metadata of a binary, captured at compile time.
///
/// Populate it with [`build_info!`](crate::build_info) from a crate whose
/// build script exports `REPO_VERSION`, `BUILD_PROFILE`, `BUILD_FEATURES`,
/// `BUILD_TIMESTAMP` and `RUST_VERSION`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_profile: &'static str,
    pub build_features: &'static str,
    pub build_timestamp: &'static str,
    pub rust_version: &'static str,
    pub target: Option<&'static str>,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version:   {}", self.version)?;
        writeln!(f, "profile:   {}", self.build_profile)?;
        writeln!(f, "features:  {}", self.build_features)?;
        writeln!(f, "built at:  {}", self.build_timestamp)?;
        write!(f, "rustc:     {}", self.rust_version)?;
        if let Some(target) = self.target {
            write!(f, "\ntarget:    {}", target)?;
        }
        Ok(())
    }
}

/// Expand to the [`BuildInfo`] of the calling crate
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::version::BuildInfo {
            version: env!("REPO_VERSION"),
            build_profile: env!("BUILD_PROFILE"),
            build_features: env!("BUILD_FEATURES"),
            build_timestamp: env!("BUILD_TIMESTAMP"),
            rust_version: env!("RUST_VERSION"),
            target: option_env!("BUILD_TARGET"),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_fields() {
        let info = BuildInfo {
            version: "v0.1.0-3-gabc1234",
            build_profile: "debug",
            build_features: "none",
            build_timestamp: "2024-01-01T00:00:00+00:00",
            rust_version: "rustc 1.80.0",
            target: None,
        };
        let rendered = info.to_string();
        assert!(rendered.starts_with("version:   v0.1.0-3-gabc1234"));
        assert!(rendered.ends_with("rustc:     rustc 1.80.0"));
    }
}
