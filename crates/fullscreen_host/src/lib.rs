//! Typed host contracts for full-screen presentation shared by the runtime and browser adapters.
//!
//! This crate is the API-first boundary for the platform side of the full-screen controller. It
//! exposes the [`FullscreenHost`] trait (native full-screen requests, change/error notifications,
//! and the class/style mutations used by the overlay presentation), the host error taxonomy, and
//! an in-memory host used by tests and non-browser targets. The concrete browser adapter lives in
//! `fullscreen_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod host;
pub mod memory;

pub use error::FullscreenHostError;
pub use host::{
    FullscreenFuture, FullscreenHost, FullscreenListener, FullscreenSignal, ListenerId,
    FULLSCREEN_CHANGE_EVENT, FULLSCREEN_ERROR_EVENT,
};
pub use memory::{
    MemoryElement, MemoryFullscreenHost, MemoryHostCall, MemoryRequestPolicy,
};
