//! Controller configuration and the presentation class contract derived from it.

use serde::{Deserialize, Serialize};

use crate::{EnterOptions, FullScreenError, Mode};

/// Class namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "vxp";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Full-screen controller configuration.
pub struct FullScreenConfig {
    /// Prefix for presentation classes and the z-index variable.
    pub namespace: String,
    /// Mode used when a caller does not pick one.
    pub default_mode: Mode,
    /// Overlay z-index used when a caller does not pick one.
    pub default_z_index: Option<i32>,
}

impl Default for FullScreenConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            default_mode: Mode::Window,
            default_z_index: None,
        }
    }
}

impl FullScreenConfig {
    /// Parses and validates a JSON configuration document. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FullScreenError::InvalidConfig`] for malformed JSON or a bad namespace.
    pub fn from_json(raw: &str) -> Result<Self, FullScreenError> {
        let config: Self = serde_json::from_str(raw).map_err(|err| FullScreenError::InvalidConfig {
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the namespace is a usable CSS identifier prefix.
    ///
    /// # Errors
    ///
    /// Returns [`FullScreenError::InvalidConfig`] describing the first violation.
    pub fn validate(&self) -> Result<(), FullScreenError> {
        let namespace = self.namespace.as_str();
        if namespace.is_empty() {
            return Err(FullScreenError::InvalidConfig {
                reason: "namespace must not be empty".to_string(),
            });
        }
        if namespace.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(FullScreenError::InvalidConfig {
                reason: format!("namespace `{namespace}` must not start with a digit"),
            });
        }
        if let Some(bad) = namespace
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(FullScreenError::InvalidConfig {
                reason: format!("namespace `{namespace}` contains `{bad}`"),
            });
        }
        Ok(())
    }

    /// Options used by argument-less `enter`/`toggle` calls.
    pub fn default_options(&self) -> EnterOptions {
        EnterOptions {
            mode: self.default_mode,
            z_index: self.default_z_index,
        }
    }

    /// Presentation classes for this namespace.
    pub fn classes(&self) -> PresentationClasses {
        PresentationClasses::for_namespace(&self.namespace)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Class names and the z-index variable written on the presented element.
pub struct PresentationClasses {
    /// Always present on the component root.
    pub base: String,
    /// Marks the root as a carrier of the component's CSS variables.
    pub vars: String,
    /// Present while entered in either mode.
    pub full: String,
    /// Present while entered in window mode.
    pub window: String,
    /// Present while entered in browser mode.
    pub browser: String,
    /// CSS custom property carrying the overlay z-index.
    pub z_index_var: String,
}

impl PresentationClasses {
    /// Derives the class contract for `namespace`.
    pub fn for_namespace(namespace: &str) -> Self {
        let base = format!("{namespace}-full-screen");
        Self {
            vars: format!("{base}-vars"),
            full: format!("{base}--full"),
            window: format!("{base}--{}", Mode::Window.token()),
            browser: format!("{base}--{}", Mode::Browser.token()),
            z_index_var: format!("--{base}-z-index"),
            base,
        }
    }

    /// Mode-qualifying class.
    pub fn mode_class(&self, mode: Mode) -> &str {
        match mode {
            Mode::Window => &self.window,
            Mode::Browser => &self.browser,
        }
    }

    /// Static class attribute for the component root.
    pub fn root_class(&self) -> String {
        format!("{} {}", self.base, self.vars)
    }
}

impl Default for PresentationClasses {
    fn default() -> Self {
        Self::for_namespace(DEFAULT_NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_namespace_produces_vxp_contract() {
        let classes = PresentationClasses::default();
        assert_eq!(classes.root_class(), "vxp-full-screen vxp-full-screen-vars");
        assert_eq!(classes.full, "vxp-full-screen--full");
        assert_eq!(classes.mode_class(Mode::Window), "vxp-full-screen--window");
        assert_eq!(classes.mode_class(Mode::Browser), "vxp-full-screen--browser");
        assert_eq!(classes.z_index_var, "--vxp-full-screen-z-index");
    }

    #[test]
    fn config_from_json_fills_defaults() {
        let config = FullScreenConfig::from_json(r#"{"namespace":"ui"}"#).expect("config");
        assert_eq!(
            config,
            FullScreenConfig {
                namespace: "ui".to_string(),
                ..FullScreenConfig::default()
            }
        );
        assert_eq!(config.classes().full, "ui-full-screen--full");

        let config =
            FullScreenConfig::from_json(r#"{"default_mode":"browser","default_z_index":3}"#)
                .expect("config");
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.default_options().mode, Mode::Browser);
        assert_eq!(config.default_options().z_index, Some(3));
    }

    #[test]
    fn config_rejects_unusable_namespaces() {
        for raw in [
            r#"{"namespace":""}"#,
            r#"{"namespace":"9ui"}"#,
            r#"{"namespace":"ui ns"}"#,
            r#"{"namespace":42}"#,
        ] {
            assert!(
                matches!(
                    FullScreenConfig::from_json(raw),
                    Err(FullScreenError::InvalidConfig { .. })
                ),
                "{raw} should be rejected"
            );
        }
    }
}
