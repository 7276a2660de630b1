//! Full-screen host service contract.

use std::{future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::FullscreenHostError;

/// Object-safe boxed future used by [`FullscreenHost`] async methods.
pub type FullscreenFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// DOM event name fired when the document full-screen element changes.
pub const FULLSCREEN_CHANGE_EVENT: &str = "fullscreenchange";
/// DOM event name fired when a full-screen transition fails.
pub const FULLSCREEN_ERROR_EVENT: &str = "fullscreenerror";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Handle returned by [`FullscreenHost::subscribe`], consumed by [`FullscreenHost::unsubscribe`].
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Out-of-band notification delivered by the platform.
pub enum FullscreenSignal {
    /// Full-screen status changed for any reason, including user-initiated exit.
    Changed,
    /// A requested transition failed after being accepted.
    Error,
}

/// Listener invoked synchronously for every [`FullscreenSignal`].
pub type FullscreenListener = Rc<dyn Fn(FullscreenSignal)>;

/// Host service for native full-screen transitions and overlay presentation.
///
/// The native half mirrors the platform API (request/exit/query plus change and error
/// notifications). The presentation half covers the class list and CSS custom property
/// mutations the overlay mode needs, so the runtime never touches platform element types
/// directly.
pub trait FullscreenHost {
    /// Platform element handle. Equality must mean "same element".
    type Element: Clone + PartialEq + 'static;

    /// Returns whether native full-screen is available on this host.
    fn is_supported(&self) -> bool;

    /// Asks the platform to make `target` full-screen.
    fn request_fullscreen<'a>(
        &'a self,
        target: &'a Self::Element,
    ) -> FullscreenFuture<'a, Result<(), FullscreenHostError>>;

    /// Asks the platform to leave full-screen.
    fn exit_fullscreen<'a>(&'a self) -> FullscreenFuture<'a, Result<(), FullscreenHostError>>;

    /// Returns the element currently holding native full-screen, if any.
    fn fullscreen_element(&self) -> Option<Self::Element>;

    /// Registers a listener for change and error notifications.
    fn subscribe(&self, listener: FullscreenListener) -> ListenerId;

    /// Removes a listener registered by [`Self::subscribe`].
    fn unsubscribe(&self, id: ListenerId);

    /// Adds a presentation class to `element`.
    fn add_class(&self, element: &Self::Element, class: &str);

    /// Removes a presentation class from `element`.
    fn remove_class(&self, element: &Self::Element, class: &str);

    /// Sets an inline style property (including CSS custom properties) on `element`.
    fn set_style_property(&self, element: &Self::Element, name: &str, value: &str);

    /// Removes an inline style property from `element`.
    fn remove_style_property(&self, element: &Self::Element, name: &str);
}
