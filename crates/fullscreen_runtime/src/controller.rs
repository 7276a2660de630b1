//! Async full-screen controller.
//!
//! [`FullScreenController`] serializes `enter`/`exit`/`toggle` behind one in-flight gate, asks
//! [`crate::plan_transition`] for the adapter steps, runs them, and commits the resulting
//! [`Session`] through [`crate::commit_session`]. Observers see one notification per externally
//! visible transition, so a mode switch is reported once.
//!
//! While a browser-mode session is active the controller listens to the host's change and error
//! notifications. A change that leaves the target without native full-screen (Escape key, the
//! browser revoking it) is committed as an exit without any caller involvement.

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use fullscreen_host::{
    FullscreenFuture, FullscreenHost, FullscreenHostError, FullscreenListener, FullscreenSignal,
    FULLSCREEN_ERROR_EVENT,
};
use futures::channel::oneshot;
use leptos::logging;

use crate::{
    adapter::{self, browser::NativeSubscription, window},
    commit_session, plan_transition, EnterOptions, FullScreenConfig, FullScreenError, Mode,
    OperationKind, PresentationClasses, Session, SessionCommit, SessionRequest, TransitionStep,
};

/// Callback receiving the committed session after each visible change.
pub type SessionObserver = Rc<dyn Fn(&Session)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Handle returned by [`FullScreenController::subscribe`].
pub struct ObserverId(u64);

struct ControllerInner<H: FullscreenHost> {
    host: H,
    config: FullScreenConfig,
    classes: PresentationClasses,
    root: RefCell<Option<H::Element>>,
    target: RefCell<Option<H::Element>>,
    session: Cell<Session>,
    in_flight: Cell<Option<OperationKind>>,
    subscription: RefCell<NativeSubscription>,
    native_error: RefCell<Option<oneshot::Sender<FullscreenHostError>>>,
    observers: RefCell<Vec<(ObserverId, SessionObserver)>>,
    next_observer_id: Cell<u64>,
    disposed: Cell<bool>,
    teardown_deferred: Cell<bool>,
}

impl<H: FullscreenHost> Drop for ControllerInner<H> {
    fn drop(&mut self) {
        if self.session.get().mode() == Some(Mode::Browser) {
            logging::warn!(
                "full-screen controller dropped during a native session without teardown"
            );
        }
        self.subscription.get_mut().release(&self.host);
    }
}

/// Releases the in-flight slot when an operation settles or its future is dropped.
struct OperationGate<'a> {
    in_flight: &'a Cell<Option<OperationKind>>,
}

impl Drop for OperationGate<'_> {
    fn drop(&mut self) {
        self.in_flight.set(None);
    }
}

/// Undoes a join that did not complete, whether it failed or its future was dropped mid-request.
struct JoinGuard<'a, H: FullscreenHost + 'static> {
    controller: &'a FullScreenController<H>,
    target: &'a H::Element,
    left: Option<Mode>,
    previous: Session,
    armed: bool,
}

impl<H: FullscreenHost + 'static> Drop for JoinGuard<'_, H> {
    fn drop(&mut self) {
        if self.armed {
            self.controller.inner.native_error.replace(None);
            self.controller.release_subscription();
            self.controller.recover_from_failed_join(self.left, &self.previous, self.target);
        }
    }
}

/// Full-screen session controller bound to one root element.
///
/// Cloning is cheap and shares the same session. Call [`Self::teardown`] before the last clone
/// is dropped: dropping releases the native notification subscription but cannot await the
/// native exit, so a browser-mode session would be left on screen without a listener.
pub struct FullScreenController<H: FullscreenHost> {
    inner: Rc<ControllerInner<H>>,
}

impl<H: FullscreenHost> Clone for FullScreenController<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: FullscreenHost> std::fmt::Debug for FullScreenController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FullScreenController")
            .field("session", &self.inner.session.get())
            .field("in_flight", &self.inner.in_flight.get())
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}

impl<H: FullscreenHost + 'static> FullScreenController<H> {
    /// Creates a controller with no root element attached yet.
    pub fn new(host: H, config: FullScreenConfig) -> Self {
        let classes = config.classes();
        Self {
            inner: Rc::new(ControllerInner {
                host,
                config,
                classes,
                root: RefCell::new(None),
                target: RefCell::new(None),
                session: Cell::new(Session::default()),
                in_flight: Cell::new(None),
                subscription: RefCell::new(NativeSubscription::default()),
                native_error: RefCell::new(None),
                observers: RefCell::new(Vec::new()),
                next_observer_id: Cell::new(0),
                disposed: Cell::new(false),
                teardown_deferred: Cell::new(false),
            }),
        }
    }

    /// Creates a controller presenting `root`.
    pub fn with_root(host: H, root: H::Element, config: FullScreenConfig) -> Self {
        let controller = Self::new(host, config);
        controller.inner.root.replace(Some(root));
        controller
    }

    /// Current session snapshot.
    pub fn session(&self) -> Session {
        self.inner.session.get()
    }

    /// Returns whether a presentation is active.
    pub fn is_entered(&self) -> bool {
        self.session().is_entered()
    }

    /// Active mode, `None` while exited.
    pub fn mode(&self) -> Option<Mode> {
        self.session().mode()
    }

    /// Active overlay z-index.
    pub fn z_index(&self) -> Option<i32> {
        self.session().z_index()
    }

    /// Returns whether a transition is in flight.
    pub fn is_pending(&self) -> bool {
        self.inner.in_flight.get().is_some()
    }

    /// Returns whether [`Self::teardown`] has been requested.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Configuration the controller was built with.
    pub fn config(&self) -> &FullScreenConfig {
        &self.inner.config
    }

    /// Presentation class contract in use.
    pub fn classes(&self) -> &PresentationClasses {
        &self.inner.classes
    }

    /// Options used by argument-less `enter`/`toggle` calls.
    pub fn default_options(&self) -> EnterOptions {
        self.inner.config.default_options()
    }

    /// Host the controller drives.
    pub fn host(&self) -> &H {
        &self.inner.host
    }

    /// Element that will be (or is) presented.
    pub fn target(&self) -> Option<H::Element> {
        self.inner
            .target
            .borrow()
            .clone()
            .or_else(|| self.inner.root.borrow().clone())
    }

    /// Attaches the controller's own root element.
    ///
    /// # Errors
    ///
    /// Returns [`FullScreenError::TargetLocked`] while a session is active or pending.
    pub fn attach(&self, root: H::Element) -> Result<(), FullScreenError> {
        self.ensure_target_unlocked()?;
        self.inner.root.replace(Some(root));
        Ok(())
    }

    /// Presents `target` instead of the root, or restores the root with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`FullScreenError::TargetLocked`] while a session is active or pending.
    pub fn set_target(&self, target: Option<H::Element>) -> Result<(), FullScreenError> {
        self.ensure_target_unlocked()?;
        self.inner.target.replace(target);
        Ok(())
    }

    /// Registers an observer for committed session changes.
    pub fn subscribe(&self, observer: SessionObserver) -> ObserverId {
        let id = ObserverId(self.inner.next_observer_id.get() + 1);
        self.inner.next_observer_id.set(id.0);
        self.inner.observers.borrow_mut().push((id, observer));
        id
    }

    /// Removes an observer. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: ObserverId) {
        self.inner
            .observers
            .borrow_mut()
            .retain(|(existing, _)| *existing != id);
    }

    /// Enters full-screen, or switches mode when already entered in another mode.
    ///
    /// Entering the active window mode again only rewrites the z-index.
    ///
    /// # Errors
    ///
    /// Fails on a concurrent request, a missing target, a torn-down controller, or a native
    /// rejection. The session is unchanged on failure.
    pub async fn enter(&self, options: EnterOptions) -> Result<(), FullScreenError> {
        self.run(SessionRequest::Enter(options.normalized())).await
    }

    /// Leaves full-screen. Succeeds immediately when already exited.
    ///
    /// # Errors
    ///
    /// Fails on a concurrent request, a torn-down controller, or a native rejection.
    pub async fn exit(&self) -> Result<(), FullScreenError> {
        self.run(SessionRequest::Exit).await
    }

    /// Enters when exited, otherwise exits.
    ///
    /// `None` enters with [`Self::default_options`] and always exits an entered session. Explicit
    /// options naming a mode other than the active one switch to that mode instead of exiting.
    ///
    /// # Errors
    ///
    /// Same as [`Self::enter`] and [`Self::exit`].
    pub async fn toggle(&self, options: Option<EnterOptions>) -> Result<(), FullScreenError> {
        let explicit = options.is_some();
        let options = options.unwrap_or_else(|| self.default_options()).normalized();
        self.run(SessionRequest::Toggle { options, explicit }).await
    }

    /// Removes any active presentation and disposes the controller.
    ///
    /// A native session is asked to exit before its notification subscription is released. When
    /// a transition is in flight, teardown runs as soon as it settles; if that transition's future
    /// is dropped instead, calling teardown again finishes the job. Later requests fail with
    /// [`FullScreenError::Disposed`]. Teardown of an exited controller without a subscription is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns the native exit failure, after the subscription has been released anyway.
    pub async fn teardown(&self) -> Result<(), FullScreenError> {
        self.inner.disposed.set(true);
        if self.is_pending() {
            self.inner.teardown_deferred.set(true);
            return Ok(());
        }
        self.inner.teardown_deferred.set(false);
        if !self.is_entered() && !self.inner.subscription.borrow().is_active() {
            return Ok(());
        }
        self.teardown_now().await
    }

    fn ensure_target_unlocked(&self) -> Result<(), FullScreenError> {
        if self.is_entered() || self.is_pending() {
            return Err(FullScreenError::TargetLocked);
        }
        Ok(())
    }

    fn acquire(&self, kind: OperationKind) -> Result<OperationGate<'_>, FullScreenError> {
        if let Some(in_flight) = self.inner.in_flight.get() {
            return Err(FullScreenError::ConcurrentRequest { in_flight });
        }
        self.inner.in_flight.set(Some(kind));
        Ok(OperationGate {
            in_flight: &self.inner.in_flight,
        })
    }

    async fn run(&self, request: SessionRequest) -> Result<(), FullScreenError> {
        if self.is_disposed() {
            return Err(FullScreenError::Disposed);
        }
        let gate = self.acquire(request.kind())?;
        let before = self.session();
        let result = self.execute(request).await;
        drop(gate);
        self.reconcile_native();
        self.publish_if_changed(before);

        if self.inner.teardown_deferred.take() {
            if let Err(err) = self.teardown_now().await {
                logging::warn!("deferred full-screen teardown failed: {err}");
            }
        }
        result
    }

    async fn execute(&self, request: SessionRequest) -> Result<(), FullScreenError> {
        let session = self.session();
        let plan = plan_transition(&session, request);
        if plan.is_empty() {
            return Ok(());
        }
        let target = self.target().ok_or(FullScreenError::MissingTarget)?;

        let mut left: Option<Mode> = None;
        for step in &plan {
            match *step {
                TransitionStep::ReapplyZIndex(z_index) => {
                    window::apply_z_index(&self.inner.host, &target, &self.inner.classes, z_index);
                    self.commit(SessionCommit::Entered {
                        mode: Mode::Window,
                        z_index,
                    });
                }
                TransitionStep::Leave(mode) => {
                    self.leave(mode, &target).await?;
                    left = Some(mode);
                }
                TransitionStep::Join { mode, z_index } => {
                    let mut guard = JoinGuard {
                        controller: self,
                        target: &target,
                        left,
                        previous: session,
                        armed: true,
                    };
                    self.join(mode, z_index, &target).await?;
                    guard.armed = false;
                }
            }
        }

        if matches!(plan.last(), Some(TransitionStep::Leave(_))) {
            self.commit(SessionCommit::Exited);
        }
        Ok(())
    }

    /// Restores the previous presentation after a join failed or was cancelled.
    fn recover_from_failed_join(
        &self,
        left: Option<Mode>,
        previous: &Session,
        target: &H::Element,
    ) {
        match left {
            Some(Mode::Window) => {
                window::enter(
                    &self.inner.host,
                    target,
                    &self.inner.classes,
                    previous.z_index(),
                );
            }
            // Native full-screen cannot be re-requested without a fresh user gesture.
            Some(Mode::Browser) => {
                self.commit(SessionCommit::Exited);
            }
            None => {}
        }
    }

    async fn join(
        &self,
        mode: Mode,
        z_index: Option<i32>,
        target: &H::Element,
    ) -> Result<(), FullScreenError> {
        match mode {
            Mode::Window => {
                window::enter(&self.inner.host, target, &self.inner.classes, z_index);
            }
            Mode::Browser => {
                if !self.inner.host.is_supported() {
                    return Err(FullscreenHostError::Unsupported.into());
                }
                self.install_subscription();
                let request = self.inner.host.request_fullscreen(target);
                if let Err(err) = self.settle_native(request).await {
                    self.release_subscription();
                    return Err(err.into());
                }
                adapter::mark_entered(&self.inner.host, target, &self.inner.classes, mode);
            }
        }
        self.commit(SessionCommit::Entered { mode, z_index });
        Ok(())
    }

    async fn leave(&self, mode: Mode, target: &H::Element) -> Result<(), FullScreenError> {
        match mode {
            Mode::Window => window::exit(&self.inner.host, target, &self.inner.classes),
            Mode::Browser => {
                let request = self.inner.host.exit_fullscreen();
                self.settle_native(request).await?;
                adapter::unmark_entered(&self.inner.host, target, &self.inner.classes, mode);
                self.release_subscription();
            }
        }
        Ok(())
    }

    async fn settle_native(
        &self,
        request: FullscreenFuture<'_, Result<(), FullscreenHostError>>,
    ) -> Result<(), FullscreenHostError> {
        let (sender, receiver) = oneshot::channel();
        self.inner.native_error.replace(Some(sender));
        let result = adapter::browser::settle(request, receiver).await;
        self.inner.native_error.replace(None);
        result
    }

    async fn teardown_now(&self) -> Result<(), FullScreenError> {
        let gate = self.acquire(OperationKind::Teardown)?;
        let before = self.session();
        let result = match (before.mode(), self.target()) {
            (Some(mode), Some(target)) => match self.leave(mode, &target).await {
                Ok(()) => {
                    self.commit(SessionCommit::Exited);
                    Ok(())
                }
                Err(err) => Err(err),
            },
            (Some(_), None) => Err(FullScreenError::MissingTarget),
            (None, _) => Ok(()),
        };
        self.release_subscription();
        drop(gate);
        self.reconcile_native();
        self.publish_if_changed(before);
        result
    }

    fn install_subscription(&self) {
        let weak: Weak<ControllerInner<H>> = Rc::downgrade(&self.inner);
        let listener: FullscreenListener = Rc::new(move |signal| {
            if let Some(inner) = weak.upgrade() {
                FullScreenController { inner }.on_native_signal(signal);
            }
        });
        self.inner
            .subscription
            .borrow_mut()
            .install(&self.inner.host, listener);
    }

    fn release_subscription(&self) {
        self.inner
            .subscription
            .borrow_mut()
            .release(&self.inner.host);
    }

    fn on_native_signal(&self, signal: FullscreenSignal) {
        match signal {
            FullscreenSignal::Changed => self.resync_after_change(),
            FullscreenSignal::Error => {
                let pending = self.inner.native_error.borrow_mut().take();
                match pending {
                    Some(sender) => {
                        let _ = sender.send(FullscreenHostError::failed(FULLSCREEN_ERROR_EVENT));
                    }
                    None => logging::warn!(
                        "ignoring full-screen error notification with no pending request"
                    ),
                }
            }
        }
    }

    /// Commits an exit when the platform left full-screen behind the controller's back.
    ///
    /// In-flight transitions settle the session themselves, so changes they cause are ignored.
    fn resync_after_change(&self) {
        if self.is_pending() {
            return;
        }
        let before = self.session();
        self.reconcile_native();
        self.publish_if_changed(before);
    }

    /// Commits an exit without publishing when a browser-mode session no longer owns the
    /// platform's full-screen element. Runs after every settled operation, since changes that
    /// arrived while it was in flight were ignored.
    fn reconcile_native(&self) {
        if self.mode() != Some(Mode::Browser) {
            return;
        }
        let target = self.target();
        if target.is_some() && self.inner.host.fullscreen_element() == target {
            return;
        }

        logging::log!("native full-screen left out-of-band; resynchronizing session");
        if let Some(target) = target.as_ref() {
            adapter::unmark_entered(&self.inner.host, target, &self.inner.classes, Mode::Browser);
        }
        self.release_subscription();
        self.commit(SessionCommit::Exited);
    }

    fn commit(&self, commit: SessionCommit) -> bool {
        let mut session = self.inner.session.get();
        let changed = commit_session(&mut session, commit);
        self.inner.session.set(session);
        changed
    }

    fn publish_if_changed(&self, before: Session) {
        let now = self.session();
        if now == before {
            return;
        }
        let observers: Vec<SessionObserver> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer(&now);
        }
    }
}

#[cfg(test)]
mod tests {
    use fullscreen_host::{MemoryElement, MemoryFullscreenHost};
    use futures::executor::block_on;

    use super::*;

    fn controller() -> (FullScreenController<MemoryFullscreenHost>, MemoryElement) {
        let root = MemoryElement::new("root");
        let controller = FullScreenController::with_root(
            MemoryFullscreenHost::default(),
            root.clone(),
            FullScreenConfig::default(),
        );
        (controller, root)
    }

    #[test]
    fn observer_ids_are_unique_and_removable() {
        let (controller, _) = controller();
        let first = controller.subscribe(Rc::new(|_| {}));
        let second = controller.subscribe(Rc::new(|_| {}));
        assert_ne!(first, second);

        controller.unsubscribe(first);
        controller.unsubscribe(first);
        assert_eq!(controller.inner.observers.borrow().len(), 1);
    }

    #[test]
    fn detached_controller_fails_fast_without_side_effects() {
        let host = MemoryFullscreenHost::default();
        let controller = FullScreenController::new(host.clone(), FullScreenConfig::default());

        let err = block_on(controller.enter(EnterOptions::browser())).expect_err("no target");
        assert_eq!(err, FullScreenError::MissingTarget);
        assert!(host.calls().is_empty());
        assert!(!controller.is_pending());

        block_on(controller.exit()).expect("exit while exited is a no-op");
    }

    #[test]
    fn target_is_locked_while_entered() {
        let (controller, root) = controller();
        let other = MemoryElement::new("other");

        block_on(controller.enter(EnterOptions::window())).expect("enter");
        assert_eq!(
            controller.set_target(Some(other.clone())),
            Err(FullScreenError::TargetLocked)
        );
        assert_eq!(controller.attach(other.clone()), Err(FullScreenError::TargetLocked));
        block_on(controller.exit()).expect("exit");

        controller.set_target(Some(other.clone())).expect("retarget");
        assert_eq!(controller.target(), Some(other));
        controller.set_target(None).expect("restore root");
        assert_eq!(controller.target(), Some(root));
    }

    #[test]
    fn dropping_controller_releases_native_subscription() {
        let host = MemoryFullscreenHost::default();
        {
            let controller = FullScreenController::with_root(
                host.clone(),
                MemoryElement::new("root"),
                FullScreenConfig::default(),
            );
            block_on(controller.enter(EnterOptions::browser())).expect("enter");
            assert_eq!(host.listener_count(), 1);
        }
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.stray_unsubscribes(), 0);
    }
}
