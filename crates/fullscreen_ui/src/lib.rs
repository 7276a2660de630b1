//! Leptos bindings for the full-screen session controller.
//!
//! [`FullScreen`] mounts a [`fullscreen_runtime::FullScreenController`] on its own root `<div>`,
//! mirrors the committed session into a reactive signal, and hands out a [`FullScreenHandle`]
//! through `on_ready`, a slot callback, and the [`use_full_screen`] context hook. Transition logic
//! lives entirely in the runtime crate.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod component;
mod handle;

pub use component::FullScreen;
pub use handle::{use_full_screen, FullScreenHandle, FullScreenSlot};
