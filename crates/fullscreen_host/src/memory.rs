//! In-memory full-screen host for tests and non-browser targets.
//!
//! [`MemoryFullscreenHost`] behaves like a single document: one process-wide full-screen slot,
//! synchronous change/error notifications, and a request policy that can accept, reject, or hold
//! a request open until [`MemoryFullscreenHost::settle_pending`] is called.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};

use futures::channel::oneshot;

use crate::{
    FullscreenFuture, FullscreenHost, FullscreenHostError, FullscreenListener, FullscreenSignal,
    ListenerId,
};

#[derive(Debug, Default)]
struct MemoryElementInner {
    name: String,
    classes: RefCell<BTreeSet<String>>,
    style: RefCell<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default)]
/// Element handle with a class list and inline style map. Equality is identity.
pub struct MemoryElement {
    inner: Rc<MemoryElementInner>,
}

impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl MemoryElement {
    /// Creates a detached element with a diagnostic name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(MemoryElementInner {
                name: name.into(),
                ..MemoryElementInner::default()
            }),
        }
    }

    /// Creates an element that already carries `classes`.
    pub fn with_classes<'a>(
        name: impl Into<String>,
        classes: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let element = Self::new(name);
        element
            .inner
            .classes
            .borrow_mut()
            .extend(classes.into_iter().map(str::to_string));
        element
    }

    /// Diagnostic name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns whether `class` is present.
    pub fn has_class(&self, class: &str) -> bool {
        self.inner.classes.borrow().contains(class)
    }

    /// Returns the class list in sorted order.
    pub fn classes(&self) -> Vec<String> {
        self.inner.classes.borrow().iter().cloned().collect()
    }

    /// Reads an inline style property.
    pub fn style_property(&self, name: &str) -> Option<String> {
        self.inner.style.borrow().get(name).cloned()
    }

    /// Returns whether the inline style map is empty.
    pub fn has_inline_style(&self) -> bool {
        !self.inner.style.borrow().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// How [`MemoryFullscreenHost`] answers native requests.
pub enum MemoryRequestPolicy {
    /// Apply the transition immediately and emit [`FullscreenSignal::Changed`].
    #[default]
    Accept,
    /// Refuse the request with the given error and emit [`FullscreenSignal::Error`].
    Reject(FullscreenHostError),
    /// Hold the request open until [`MemoryFullscreenHost::settle_pending`].
    Defer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Recorded host interaction, in call order.
pub enum MemoryHostCall {
    /// `request_fullscreen` for the named element.
    RequestFullscreen(String),
    /// `exit_fullscreen`.
    ExitFullscreen,
    /// `subscribe` returning the id.
    Subscribe(ListenerId),
    /// `unsubscribe` for the id.
    Unsubscribe(ListenerId),
}

#[derive(Debug)]
enum PendingKind {
    Enter(MemoryElement),
    Exit,
}

struct PendingRequest {
    kind: PendingKind,
    sender: oneshot::Sender<Result<(), FullscreenHostError>>,
}

enum RequestStart {
    Settled(Result<(), FullscreenHostError>, Option<FullscreenSignal>),
    Deferred(oneshot::Receiver<Result<(), FullscreenHostError>>),
}

#[derive(Default)]
struct MemoryHostState {
    unsupported: bool,
    policy: MemoryRequestPolicy,
    fullscreen_element: Option<MemoryElement>,
    listeners: Vec<(ListenerId, FullscreenListener)>,
    next_listener_id: u64,
    stray_unsubscribes: usize,
    pending: Option<PendingRequest>,
    calls: Vec<MemoryHostCall>,
}

#[derive(Clone, Default)]
/// Single-document full-screen host kept entirely in memory.
pub struct MemoryFullscreenHost {
    inner: Rc<RefCell<MemoryHostState>>,
}

impl std::fmt::Debug for MemoryFullscreenHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("MemoryFullscreenHost")
            .field("unsupported", &state.unsupported)
            .field("policy", &state.policy)
            .field("fullscreen_element", &state.fullscreen_element)
            .field("listeners", &state.listeners.len())
            .field("pending", &state.pending.is_some())
            .finish()
    }
}

impl MemoryFullscreenHost {
    /// Marks native full-screen as unavailable (or available again).
    pub fn set_supported(&self, supported: bool) {
        self.inner.borrow_mut().unsupported = !supported;
    }

    /// Replaces the request policy used by subsequent requests.
    pub fn set_policy(&self, policy: MemoryRequestPolicy) {
        self.inner.borrow_mut().policy = policy;
    }

    /// Gives the full-screen slot to `element` without a request, as another component would.
    pub fn occupy(&self, element: &MemoryElement) {
        self.inner.borrow_mut().fullscreen_element = Some(element.clone());
        self.emit(FullscreenSignal::Changed);
    }

    /// Simulates the user leaving full-screen (Escape key, browser chrome).
    pub fn simulate_user_exit(&self) {
        self.inner.borrow_mut().fullscreen_element = None;
        self.emit(FullscreenSignal::Changed);
    }

    /// Emits a stray error notification.
    pub fn emit_error(&self) {
        self.emit(FullscreenSignal::Error);
    }

    /// Returns whether a deferred request is waiting for [`Self::settle_pending`].
    pub fn has_pending_request(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// Completes the deferred request.
    ///
    /// Success applies the transition and emits [`FullscreenSignal::Changed`]; failure emits
    /// [`FullscreenSignal::Error`]. Returns `false` when nothing was pending.
    pub fn settle_pending(&self, result: Result<(), FullscreenHostError>) -> bool {
        let Some(pending) = self.inner.borrow_mut().pending.take() else {
            return false;
        };
        let signal = if result.is_ok() {
            self.apply(&pending.kind);
            FullscreenSignal::Changed
        } else {
            FullscreenSignal::Error
        };
        self.emit(signal);
        let _ = pending.sender.send(result);
        true
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of `unsubscribe` calls for ids that were not registered.
    pub fn stray_unsubscribes(&self) -> usize {
        self.inner.borrow().stray_unsubscribes
    }

    /// Recorded native calls and subscription changes, in order.
    pub fn calls(&self) -> Vec<MemoryHostCall> {
        self.inner.borrow().calls.clone()
    }

    fn emit(&self, signal: FullscreenSignal) {
        // Listeners re-enter the host, so the borrow must end before dispatch.
        let listeners: Vec<FullscreenListener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(signal);
        }
    }

    fn apply(&self, kind: &PendingKind) {
        let mut state = self.inner.borrow_mut();
        state.fullscreen_element = match kind {
            PendingKind::Enter(element) => Some(element.clone()),
            PendingKind::Exit => None,
        };
    }

    fn start(&self, kind: PendingKind) -> RequestStart {
        let mut state = self.inner.borrow_mut();
        state.calls.push(match &kind {
            PendingKind::Enter(element) => MemoryHostCall::RequestFullscreen(element.name().into()),
            PendingKind::Exit => MemoryHostCall::ExitFullscreen,
        });
        if state.unsupported {
            return RequestStart::Settled(Err(FullscreenHostError::Unsupported), None);
        }
        match &kind {
            PendingKind::Enter(element) => {
                if state
                    .fullscreen_element
                    .as_ref()
                    .is_some_and(|active| active != element)
                {
                    return RequestStart::Settled(
                        Err(FullscreenHostError::AlreadyActive),
                        Some(FullscreenSignal::Error),
                    );
                }
            }
            PendingKind::Exit => {
                if state.fullscreen_element.is_none() {
                    return RequestStart::Settled(Ok(()), None);
                }
            }
        }
        match state.policy.clone() {
            MemoryRequestPolicy::Accept => {
                drop(state);
                self.apply(&kind);
                RequestStart::Settled(Ok(()), Some(FullscreenSignal::Changed))
            }
            MemoryRequestPolicy::Reject(err) => {
                RequestStart::Settled(Err(err), Some(FullscreenSignal::Error))
            }
            MemoryRequestPolicy::Defer => {
                let (sender, receiver) = oneshot::channel();
                state.pending = Some(PendingRequest { kind, sender });
                RequestStart::Deferred(receiver)
            }
        }
    }

    async fn run(&self, kind: PendingKind) -> Result<(), FullscreenHostError> {
        match self.start(kind) {
            RequestStart::Settled(result, signal) => {
                if let Some(signal) = signal {
                    self.emit(signal);
                }
                result
            }
            RequestStart::Deferred(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(FullscreenHostError::failed("request abandoned"))),
        }
    }
}

impl FullscreenHost for MemoryFullscreenHost {
    type Element = MemoryElement;

    fn is_supported(&self) -> bool {
        !self.inner.borrow().unsupported
    }

    fn request_fullscreen<'a>(
        &'a self,
        target: &'a MemoryElement,
    ) -> FullscreenFuture<'a, Result<(), FullscreenHostError>> {
        Box::pin(self.run(PendingKind::Enter(target.clone())))
    }

    fn exit_fullscreen<'a>(&'a self) -> FullscreenFuture<'a, Result<(), FullscreenHostError>> {
        Box::pin(self.run(PendingKind::Exit))
    }

    fn fullscreen_element(&self) -> Option<MemoryElement> {
        self.inner.borrow().fullscreen_element.clone()
    }

    fn subscribe(&self, listener: FullscreenListener) -> ListenerId {
        let mut state = self.inner.borrow_mut();
        state.next_listener_id += 1;
        let id = ListenerId(state.next_listener_id);
        state.listeners.push((id, listener));
        state.calls.push(MemoryHostCall::Subscribe(id));
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        let mut state = self.inner.borrow_mut();
        state.calls.push(MemoryHostCall::Unsubscribe(id));
        let before = state.listeners.len();
        state.listeners.retain(|(existing, _)| *existing != id);
        if state.listeners.len() == before {
            state.stray_unsubscribes += 1;
        }
    }

    fn add_class(&self, element: &MemoryElement, class: &str) {
        element.inner.classes.borrow_mut().insert(class.to_string());
    }

    fn remove_class(&self, element: &MemoryElement, class: &str) {
        element.inner.classes.borrow_mut().remove(class);
    }

    fn set_style_property(&self, element: &MemoryElement, name: &str, value: &str) {
        element
            .inner
            .style
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn remove_style_property(&self, element: &MemoryElement, name: &str) {
        element.inner.style.borrow_mut().remove(name);
    }
}
