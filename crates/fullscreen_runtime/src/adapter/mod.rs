//! Platform adapters executing transition steps against a [`FullscreenHost`].
//!
//! `browser` drives the native mechanism and its notification subscription; `window` applies the
//! overlay presentation. Both write the same `--full` marker class so styling can ignore the mode.

use fullscreen_host::FullscreenHost;

use crate::{Mode, PresentationClasses};

pub(crate) mod browser;
pub(crate) mod window;

/// Marks `target` as presented in `mode`.
pub(crate) fn mark_entered<H: FullscreenHost>(
    host: &H,
    target: &H::Element,
    classes: &PresentationClasses,
    mode: Mode,
) {
    host.add_class(target, &classes.full);
    host.add_class(target, classes.mode_class(mode));
}

/// Removes the presentation markers of `mode` from `target`.
pub(crate) fn unmark_entered<H: FullscreenHost>(
    host: &H,
    target: &H::Element,
    classes: &PresentationClasses,
    mode: Mode,
) {
    host.remove_class(target, classes.mode_class(mode));
    host.remove_class(target, &classes.full);
}
