//! `[build]` section configuration.
//!
//! Contains source, output and theme paths plus the default highlight style.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in strata.toml - compilation inputs and outputs.
///
/// # Example
/// ```toml
/// [build]
/// source = "content"            # Markdown tree
/// output = "public"             # Target for `gen` and `bind`
/// theme = "theme"               # Liquid templates
/// style = "base16-ocean.dark"   # Code highlighting style
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Markdown source directory.
    #[serde(default = "defaults::build::source")]
    #[educe(Default = defaults::build::source())]
    pub source: PathBuf,

    /// Output directory for generated files.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Theme directory holding `index.html`, `_default.html` and custom templates.
    #[serde(default = "defaults::build::theme")]
    #[educe(Default = defaults::build::theme())]
    pub theme: PathBuf,

    /// Highlighting style used when a page does not name its own.
    #[serde(default = "defaults::build::style")]
    #[educe(Default = defaults::build::style())]
    pub style: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_build_config() {
        let config = r#"
            [build]
            source = "docs"
            output = "dist"
            theme = "themes/plain"
            style = "InspiredGitHub"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.source, PathBuf::from("docs"));
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.build.theme, PathBuf::from("themes/plain"));
        assert_eq!(config.build.style, "InspiredGitHub");
    }

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.source, PathBuf::from("content"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.theme, PathBuf::from("theme"));
        assert_eq!(config.build.style, "base16-ocean.dark");
        assert!(config.build.root.is_none());
    }

    #[test]
    fn test_build_unknown_field_rejection() {
        let config = r#"
            [build]
            minify = true
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
