//! Transition planning and session commits.
//!
//! Planning is pure: it turns a request and the current [`Session`] into the ordered side-effect
//! steps the adapters must perform. Committing is the only way a session changes, and is shared
//! by caller-initiated transitions and out-of-band platform resynchronization.

use crate::model::{EnterOptions, Mode, OperationKind, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Caller request accepted by [`plan_transition`].
pub enum SessionRequest {
    /// Enter (or switch to) the requested mode.
    Enter(EnterOptions),
    /// Leave the active mode.
    Exit,
    /// Enter when exited. When entered, exit unless `explicit` names a different mode, which
    /// switches to it.
    Toggle {
        /// Options used when entering or switching.
        options: EnterOptions,
        /// Whether the caller named `options.mode` rather than relying on defaults.
        explicit: bool,
    },
}

impl SessionRequest {
    /// Operation kind used for serialization diagnostics.
    pub const fn kind(self) -> OperationKind {
        match self {
            Self::Enter(_) => OperationKind::Enter,
            Self::Exit => OperationKind::Exit,
            Self::Toggle { .. } => OperationKind::Toggle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One adapter side effect.
pub enum TransitionStep {
    /// Remove the presentation of the given mode.
    Leave(Mode),
    /// Apply the presentation of the given mode.
    Join {
        /// Mode to present.
        mode: Mode,
        /// Overlay z-index (window mode only).
        z_index: Option<i32>,
    },
    /// Rewrite the overlay z-index of an active window session.
    ReapplyZIndex(Option<i32>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Session mutation accepted by [`commit_session`].
pub enum SessionCommit {
    /// The platform confirmed entry.
    Entered {
        /// Presented mode.
        mode: Mode,
        /// Overlay z-index, dropped for browser mode.
        z_index: Option<i32>,
    },
    /// Presentation removed, by request or out-of-band.
    Exited,
}

/// Plans the adapter steps for `request` given the current `session`.
///
/// An empty plan means the request is already satisfied.
pub fn plan_transition(session: &Session, request: SessionRequest) -> Vec<TransitionStep> {
    match (session.mode(), request) {
        (None, SessionRequest::Exit) => Vec::new(),
        (Some(current), SessionRequest::Exit) => vec![TransitionStep::Leave(current)],
        (None, SessionRequest::Enter(options) | SessionRequest::Toggle { options, .. }) => {
            vec![join(options)]
        }
        (Some(current), SessionRequest::Enter(options)) if current == options.mode => {
            match current {
                Mode::Window => vec![TransitionStep::ReapplyZIndex(options.z_index)],
                Mode::Browser => Vec::new(),
            }
        }
        (Some(current), SessionRequest::Toggle { options, explicit })
            if !explicit || current == options.mode =>
        {
            vec![TransitionStep::Leave(current)]
        }
        (
            Some(current),
            SessionRequest::Enter(options) | SessionRequest::Toggle { options, .. },
        ) => vec![TransitionStep::Leave(current), join(options)],
    }
}

fn join(options: EnterOptions) -> TransitionStep {
    TransitionStep::Join {
        mode: options.mode,
        z_index: match options.mode {
            Mode::Window => options.z_index,
            Mode::Browser => None,
        },
    }
}

/// Applies `commit` to `session`, returning whether the session changed.
pub fn commit_session(session: &mut Session, commit: SessionCommit) -> bool {
    let next = match commit {
        SessionCommit::Entered { mode, z_index } => Session::entered(mode, z_index),
        SessionCommit::Exited => Session::exited(),
    };
    let changed = *session != next;
    *session = next;
    changed
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::SessionState;

    fn entered(mode: Mode, z_index: Option<i32>) -> Session {
        let mut session = Session::default();
        commit_session(&mut session, SessionCommit::Entered { mode, z_index });
        session
    }

    #[test]
    fn exit_from_exited_is_empty_plan() {
        let plan = plan_transition(&Session::default(), SessionRequest::Exit);
        assert_eq!(plan, Vec::new());
    }

    #[test]
    fn enter_from_exited_joins_requested_mode() {
        let plan = plan_transition(
            &Session::default(),
            SessionRequest::Enter(EnterOptions::window().with_z_index(1)),
        );
        assert_eq!(
            plan,
            vec![TransitionStep::Join {
                mode: Mode::Window,
                z_index: Some(1)
            }]
        );
    }

    #[test]
    fn entering_same_window_mode_only_reapplies_z_index() {
        let session = entered(Mode::Window, Some(1));
        let plan = plan_transition(
            &session,
            SessionRequest::Enter(EnterOptions::window().with_z_index(7)),
        );
        assert_eq!(plan, vec![TransitionStep::ReapplyZIndex(Some(7))]);

        let plan = plan_transition(
            &entered(Mode::Browser, None),
            SessionRequest::Enter(EnterOptions::browser()),
        );
        assert_eq!(plan, Vec::new());
    }

    #[test]
    fn entering_other_mode_leaves_then_joins() {
        let plan = plan_transition(
            &entered(Mode::Window, Some(2)),
            SessionRequest::Enter(EnterOptions::browser().with_z_index(5)),
        );
        assert_eq!(
            plan,
            vec![
                TransitionStep::Leave(Mode::Window),
                TransitionStep::Join {
                    mode: Mode::Browser,
                    z_index: None
                }
            ]
        );
    }

    fn toggle(options: EnterOptions, explicit: bool) -> SessionRequest {
        SessionRequest::Toggle { options, explicit }
    }

    #[test]
    fn toggle_exits_same_mode_and_switches_other_mode() {
        let session = entered(Mode::Window, None);
        assert_eq!(
            plan_transition(&session, toggle(EnterOptions::window(), true)),
            vec![TransitionStep::Leave(Mode::Window)]
        );
        assert_eq!(
            plan_transition(&session, toggle(EnterOptions::browser(), true)),
            vec![
                TransitionStep::Leave(Mode::Window),
                TransitionStep::Join {
                    mode: Mode::Browser,
                    z_index: None
                }
            ]
        );
        assert_eq!(
            plan_transition(&Session::default(), toggle(EnterOptions::window(), false)),
            vec![TransitionStep::Join {
                mode: Mode::Window,
                z_index: None
            }]
        );
    }

    #[test]
    fn toggle_without_explicit_mode_always_exits() {
        let session = entered(Mode::Browser, None);
        assert_eq!(
            plan_transition(&session, toggle(EnterOptions::window(), false)),
            vec![TransitionStep::Leave(Mode::Browser)]
        );
    }

    #[test]
    fn commit_keeps_invariants_and_reports_changes() {
        let mut session = Session::default();
        assert!(commit_session(
            &mut session,
            SessionCommit::Entered {
                mode: Mode::Browser,
                z_index: Some(3)
            }
        ));
        assert_eq!(session.state(), SessionState::Entered);
        assert_eq!(session.z_index(), None);

        assert!(!commit_session(
            &mut session,
            SessionCommit::Entered {
                mode: Mode::Browser,
                z_index: None
            }
        ));

        assert!(commit_session(&mut session, SessionCommit::Exited));
        assert_eq!(session.mode(), None);
        assert!(!commit_session(&mut session, SessionCommit::Exited));
    }
}
