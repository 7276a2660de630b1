//! Overlay (window-mode) presentation. Synchronous and infallible once a target exists.

use fullscreen_host::FullscreenHost;

use super::{mark_entered, unmark_entered};
use crate::{Mode, PresentationClasses};

pub(crate) fn enter<H: FullscreenHost>(
    host: &H,
    target: &H::Element,
    classes: &PresentationClasses,
    z_index: Option<i32>,
) {
    mark_entered(host, target, classes, Mode::Window);
    apply_z_index(host, target, classes, z_index);
}

pub(crate) fn exit<H: FullscreenHost>(
    host: &H,
    target: &H::Element,
    classes: &PresentationClasses,
) {
    host.remove_style_property(target, &classes.z_index_var);
    unmark_entered(host, target, classes, Mode::Window);
}

/// Writes or clears the z-index variable in place.
pub(crate) fn apply_z_index<H: FullscreenHost>(
    host: &H,
    target: &H::Element,
    classes: &PresentationClasses,
    z_index: Option<i32>,
) {
    match z_index {
        Some(z_index) => {
            host.set_style_property(target, &classes.z_index_var, &z_index.to_string());
        }
        None => host.remove_style_property(target, &classes.z_index_var),
    }
}

#[cfg(test)]
mod tests {
    use fullscreen_host::{MemoryElement, MemoryFullscreenHost};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn overlay_round_trip_restores_root_classes() {
        let host = MemoryFullscreenHost::default();
        let classes = PresentationClasses::default();
        let root =
            MemoryElement::with_classes("root", [classes.base.as_str(), classes.vars.as_str()]);

        enter(&host, &root, &classes, Some(1));
        assert!(root.has_class(&classes.full));
        assert!(root.has_class(&classes.window));
        assert_eq!(root.style_property(&classes.z_index_var).as_deref(), Some("1"));

        apply_z_index(&host, &root, &classes, None);
        assert!(!root.has_inline_style());

        exit(&host, &root, &classes);
        assert_eq!(
            root.classes(),
            vec!["vxp-full-screen".to_string(), "vxp-full-screen-vars".to_string()]
        );
    }
}
