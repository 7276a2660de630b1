//! Browser (`wasm32`) implementation of the [`fullscreen_host::FullscreenHost`] contract.
//!
//! [`WebFullscreenHost`] drives `Element.requestFullscreen`, `Document.exitFullscreen`, and the
//! document `fullscreenchange`/`fullscreenerror` events, and writes overlay classes and CSS custom
//! properties through the element's class list and inline style. Non-wasm builds compile to an
//! inert host that reports native full-screen as unsupported.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod host;

pub use host::WebFullscreenHost;
