use std::rc::Rc;

use fullscreen_host::FullscreenHost;
use fullscreen_host_web::WebFullscreenHost;
use fullscreen_runtime::{EnterOptions, FullScreenController, Mode, ObserverId, Session};
use leptos::{
    create_rw_signal, logging, spawn_local, use_context, Callback, RwSignal, Signal, SignalGet,
    SignalGetUntracked, SignalSet,
};

/// Reactive handle over a mounted [`FullScreenController`].
///
/// Imperative methods spawn the controller operation and log failures; callers that need the
/// result await the controller directly via [`FullScreenHandle::controller`].
pub struct FullScreenHandle<H: FullscreenHost + 'static = WebFullscreenHost> {
    controller: FullScreenController<H>,
    session: RwSignal<Session>,
    observer: ObserverId,
}

impl<H: FullscreenHost + 'static> Clone for FullScreenHandle<H> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            session: self.session,
            observer: self.observer,
        }
    }
}

impl<H: FullscreenHost + 'static> FullScreenHandle<H> {
    /// Binds `controller` to a session signal kept in sync by a controller observer.
    pub fn bind(controller: FullScreenController<H>) -> Self {
        let session = create_rw_signal(controller.session());
        let observer = controller.subscribe(Rc::new(move |next: &Session| session.set(*next)));
        Self {
            controller,
            session,
            observer,
        }
    }

    /// Underlying controller.
    pub fn controller(&self) -> &FullScreenController<H> {
        &self.controller
    }

    /// Reactive session snapshot.
    pub fn session(&self) -> Signal<Session> {
        self.session.into()
    }

    /// Reactive `Entered` flag.
    pub fn is_entered(&self) -> bool {
        self.session.get().is_entered()
    }

    /// Reactive active mode.
    pub fn mode(&self) -> Option<Mode> {
        self.session.get().mode()
    }

    /// Spawns [`FullScreenController::enter`].
    pub fn enter(&self, options: EnterOptions) {
        let controller = self.controller.clone();
        spawn_local(async move {
            if let Err(err) = controller.enter(options).await {
                logging::warn!("full-screen enter failed: {err}");
            }
        });
    }

    /// Spawns [`FullScreenController::exit`].
    pub fn exit(&self) {
        let controller = self.controller.clone();
        spawn_local(async move {
            if let Err(err) = controller.exit().await {
                logging::warn!("full-screen exit failed: {err}");
            }
        });
    }

    /// Spawns [`FullScreenController::toggle`]; `None` always exits an entered session.
    pub fn toggle(&self, options: Option<EnterOptions>) {
        let controller = self.controller.clone();
        spawn_local(async move {
            if let Err(err) = controller.toggle(options).await {
                logging::warn!("full-screen toggle failed: {err}");
            }
        });
    }

    /// Callback payload for inline slot markup.
    pub fn slot(&self) -> FullScreenSlot {
        let enter = self.clone();
        let toggle = self.clone();
        let exit = self.clone();
        FullScreenSlot {
            session: self.session(),
            default_options: self.controller.default_options(),
            enter: Callback::new(move |options| enter.enter(options)),
            exit: Callback::new(move |()| exit.exit()),
            toggle: Callback::new(move |options| toggle.toggle(options)),
        }
    }

    /// Stops mirroring the session and spawns controller teardown.
    pub(crate) fn dispose(&self) {
        self.detach();
        let controller = self.controller.clone();
        spawn_local(async move {
            if let Err(err) = controller.teardown().await {
                logging::warn!("full-screen teardown failed: {err}");
            }
        });
    }

    fn detach(&self) {
        self.controller.unsubscribe(self.observer);
        let last = self.controller.session();
        if self.session.get_untracked() != last {
            self.session.set(last);
        }
    }
}

#[derive(Clone, Copy)]
/// Slot payload forwarding the imperative handles to inline markup.
pub struct FullScreenSlot {
    /// Reactive session snapshot.
    pub session: Signal<Session>,
    /// Options used by the configured defaults.
    pub default_options: EnterOptions,
    /// Enters (or switches to) the given options.
    pub enter: Callback<EnterOptions>,
    /// Leaves full-screen.
    pub exit: Callback<()>,
    /// Toggles; `None` enters the configured defaults or exits.
    pub toggle: Callback<Option<EnterOptions>>,
}

/// Returns the [`FullScreenHandle`] provided by the nearest [`crate::FullScreen`].
///
/// # Panics
///
/// Panics if called outside a [`crate::FullScreen`] subtree.
pub fn use_full_screen() -> FullScreenHandle {
    use_context::<FullScreenHandle>().expect("FullScreenHandle not provided")
}

#[cfg(test)]
mod tests {
    use fullscreen_host::{MemoryElement, MemoryFullscreenHost};
    use fullscreen_runtime::FullScreenConfig;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    fn handle() -> (MemoryElement, FullScreenHandle<MemoryFullscreenHost>) {
        let root = MemoryElement::with_classes("root", ["vxp-full-screen", "vxp-full-screen-vars"]);
        let controller = FullScreenController::with_root(
            MemoryFullscreenHost::default(),
            root.clone(),
            FullScreenConfig::default(),
        );
        (root, FullScreenHandle::bind(controller))
    }

    #[test]
    fn session_signal_follows_committed_transitions() {
        let _ = leptos::create_runtime();
        let (root, handle) = handle();
        assert_eq!(handle.session().get_untracked(), Session::default());

        block_on(handle.controller().enter(EnterOptions::window().with_z_index(4)))
            .expect("enter window");
        let session = handle.session().get_untracked();
        assert_eq!(session.mode(), Some(Mode::Window));
        assert_eq!(session.z_index(), Some(4));
        assert!(root.has_class("vxp-full-screen--full"));

        block_on(handle.controller().exit()).expect("exit");
        assert!(!handle.session().get_untracked().is_entered());
    }

    #[test]
    fn slot_forwards_configured_defaults_and_session() {
        let _ = leptos::create_runtime();
        let (_root, handle) = handle();
        let slot = handle.slot();

        assert_eq!(slot.default_options, EnterOptions::window());
        block_on(handle.controller().enter(EnterOptions::browser())).expect("enter browser");
        assert_eq!(slot.session.get_untracked().mode(), Some(Mode::Browser));
    }

    #[test]
    fn detached_handle_stops_following_the_controller() {
        let _ = leptos::create_runtime();
        let (root, handle) = handle();
        block_on(handle.controller().enter(EnterOptions::window())).expect("enter window");

        handle.detach();
        block_on(handle.controller().teardown()).expect("teardown");

        assert!(handle.controller().is_disposed());
        assert_eq!(root.classes(), vec!["vxp-full-screen", "vxp-full-screen-vars"]);
        assert_eq!(handle.session().get_untracked().mode(), Some(Mode::Window));
    }
}
