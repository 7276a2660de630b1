//! Full-screen session state machine, platform adapters, and the async controller.
//!
//! The controller coordinates two presentation mechanisms: the native platform full-screen API
//! ([`Mode::Browser`]) and a class-driven full-window overlay ([`Mode::Window`]). Transition
//! decisions live in [`reducer`] as pure functions; [`controller::FullScreenController`] executes
//! them against a [`fullscreen_host::FullscreenHost`] and keeps the session consistent when the
//! platform leaves full-screen out-of-band.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod adapter;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod reducer;

pub use config::{FullScreenConfig, PresentationClasses, DEFAULT_NAMESPACE};
pub use controller::{FullScreenController, ObserverId, SessionObserver};
pub use error::FullScreenError;
pub use model::{EnterOptions, Mode, OperationKind, Session, SessionState};
pub use reducer::{commit_session, plan_transition, SessionCommit, SessionRequest, TransitionStep};
