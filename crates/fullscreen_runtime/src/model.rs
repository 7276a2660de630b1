//! Session model: modes, states, and the options accepted by `enter`/`toggle`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::FullScreenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Full-screen mechanism.
pub enum Mode {
    /// Native platform full-screen.
    Browser,
    /// Simulated full-window overlay.
    #[default]
    Window,
}

impl Mode {
    /// Returns the stable string token used by class suffixes and parsing.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Window => "window",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Mode {
    type Err = FullScreenError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "browser" => Ok(Self::Browser),
            "window" => Ok(Self::Window),
            other => Err(FullScreenError::InvalidOptions {
                reason: format!("unknown full-screen mode `{other}`"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Entered/exited status of a [`Session`].
pub enum SessionState {
    /// No full-screen presentation is active.
    #[default]
    Exited,
    /// A full-screen presentation is active.
    Entered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
/// Live full-screen session record.
///
/// Fields are private so a session can only change through [`crate::commit_session`], which keeps
/// `mode` present exactly when entered and `z_index` present only in window mode.
pub struct Session {
    state: SessionState,
    mode: Option<Mode>,
    z_index: Option<i32>,
}

impl Session {
    pub(crate) const fn exited() -> Self {
        Self {
            state: SessionState::Exited,
            mode: None,
            z_index: None,
        }
    }

    pub(crate) const fn entered(mode: Mode, z_index: Option<i32>) -> Self {
        Self {
            state: SessionState::Entered,
            mode: Some(mode),
            z_index: match mode {
                Mode::Window => z_index,
                Mode::Browser => None,
            },
        }
    }

    /// Current state.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Active mode, `None` while exited.
    pub const fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Overlay z-index override, only ever set in window mode.
    pub const fn z_index(&self) -> Option<i32> {
        self.z_index
    }

    /// Returns whether a presentation is active.
    pub const fn is_entered(&self) -> bool {
        matches!(self.state, SessionState::Entered)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
/// Options for `enter` and `toggle`.
pub struct EnterOptions {
    /// Requested mode.
    pub mode: Mode,
    /// Overlay z-index; ignored in browser mode.
    pub z_index: Option<i32>,
}

impl EnterOptions {
    /// Window-mode options without a z-index.
    pub const fn window() -> Self {
        Self {
            mode: Mode::Window,
            z_index: None,
        }
    }

    /// Browser-mode options.
    pub const fn browser() -> Self {
        Self {
            mode: Mode::Browser,
            z_index: None,
        }
    }

    /// Returns a copy carrying `z_index`.
    pub const fn with_z_index(self, z_index: i32) -> Self {
        Self {
            z_index: Some(z_index),
            ..self
        }
    }

    /// Normalizes options at the call boundary: browser mode drops any z-index.
    pub const fn normalized(self) -> Self {
        match self.mode {
            Mode::Browser => Self::browser(),
            Mode::Window => self,
        }
    }
}

impl From<Mode> for EnterOptions {
    fn from(mode: Mode) -> Self {
        Self {
            mode,
            z_index: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Controller operation kinds, reported by concurrent-request failures.
pub enum OperationKind {
    /// `enter`.
    Enter,
    /// `exit`.
    Exit,
    /// `toggle`.
    Toggle,
    /// `teardown`.
    Teardown,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enter => "enter",
            Self::Exit => "exit",
            Self::Toggle => "toggle",
            Self::Teardown => "teardown",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_tokens_parse_and_reject_unknown_values() {
        assert_eq!("browser".parse::<Mode>().expect("browser"), Mode::Browser);
        assert_eq!(" window ".parse::<Mode>().expect("window"), Mode::Window);
        assert!(matches!(
            "kiosk".parse::<Mode>(),
            Err(FullScreenError::InvalidOptions { .. })
        ));
        assert_eq!(Mode::default(), Mode::Window);
    }

    #[test]
    fn entered_browser_session_never_keeps_z_index() {
        let session = Session::entered(Mode::Browser, Some(9));
        assert_eq!(session.mode(), Some(Mode::Browser));
        assert_eq!(session.z_index(), None);
        assert!(session.is_entered());
        assert_eq!(Session::default(), Session::exited());
    }

    #[test]
    fn options_normalization_only_touches_browser_mode() {
        let browser = EnterOptions::browser().with_z_index(4).normalized();
        assert_eq!(browser, EnterOptions::browser());

        let window = EnterOptions::window().with_z_index(-1).normalized();
        assert_eq!(window.z_index, Some(-1));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: EnterOptions = serde_json::from_str("{}").expect("empty options");
        assert_eq!(options, EnterOptions::window());

        let options: EnterOptions =
            serde_json::from_str(r#"{"mode":"browser"}"#).expect("browser options");
        assert_eq!(options.mode, Mode::Browser);
    }
}
