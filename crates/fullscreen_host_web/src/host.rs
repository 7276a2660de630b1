//! Fullscreen API adapter over `web-sys`.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use fullscreen_host::{
    FullscreenFuture, FullscreenHost, FullscreenHostError, FullscreenListener, ListenerId,
};

#[cfg(target_arch = "wasm32")]
use fullscreen_host::{FullscreenSignal, FULLSCREEN_CHANGE_EVENT, FULLSCREEN_ERROR_EVENT};
#[cfg(target_arch = "wasm32")]
use futures::channel::oneshot;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

#[cfg(target_arch = "wasm32")]
type EventClosure = Closure<dyn FnMut(web_sys::Event)>;

/// Document listeners installed for one [`FullscreenHost::subscribe`] call.
struct Registration {
    #[cfg(target_arch = "wasm32")]
    on_change: EventClosure,
    #[cfg(target_arch = "wasm32")]
    on_error: EventClosure,
    #[cfg(not(target_arch = "wasm32"))]
    _listener: FullscreenListener,
}

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    entries: HashMap<ListenerId, Registration>,
}

#[derive(Clone, Default)]
/// Browser full-screen host bound to the global `document`.
pub struct WebFullscreenHost {
    registry: Rc<RefCell<ListenerRegistry>>,
}

impl std::fmt::Debug for WebFullscreenHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebFullscreenHost")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl WebFullscreenHost {
    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

#[cfg(target_arch = "wasm32")]
fn document() -> Result<web_sys::Document, FullscreenHostError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or(FullscreenHostError::Unsupported)
}

#[cfg(target_arch = "wasm32")]
fn describe_js_error(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}

/// One-shot watch on the next `fullscreenchange`/`fullscreenerror` event.
///
/// Listeners are removed when the watch is dropped, including on early returns.
#[cfg(target_arch = "wasm32")]
struct TransitionWatch {
    document: web_sys::Document,
    receiver: oneshot::Receiver<Result<(), FullscreenHostError>>,
    on_change: EventClosure,
    on_error: EventClosure,
}

#[cfg(target_arch = "wasm32")]
impl TransitionWatch {
    fn install(document: &web_sys::Document) -> Result<Self, FullscreenHostError> {
        let (tx, receiver) = oneshot::channel();
        let sender = Rc::new(RefCell::new(Some(tx)));

        let change_sender = sender.clone();
        let on_change = EventClosure::wrap(Box::new(move |_| {
            if let Some(tx) = change_sender.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        }));
        let error_sender = sender;
        let on_error = EventClosure::wrap(Box::new(move |_| {
            if let Some(tx) = error_sender.borrow_mut().take() {
                let _ = tx.send(Err(FullscreenHostError::failed(FULLSCREEN_ERROR_EVENT)));
            }
        }));

        let watch = Self {
            document: document.clone(),
            receiver,
            on_change,
            on_error,
        };
        watch
            .document
            .add_event_listener_with_callback(
                FULLSCREEN_CHANGE_EVENT,
                watch.on_change.as_ref().unchecked_ref(),
            )
            .map_err(|err| FullscreenHostError::failed(describe_js_error(&err)))?;
        watch
            .document
            .add_event_listener_with_callback(
                FULLSCREEN_ERROR_EVENT,
                watch.on_error.as_ref().unchecked_ref(),
            )
            .map_err(|err| FullscreenHostError::failed(describe_js_error(&err)))?;
        Ok(watch)
    }

    async fn wait(mut self) -> Result<(), FullscreenHostError> {
        (&mut self.receiver)
            .await
            .unwrap_or_else(|_| Err(FullscreenHostError::failed("transition watch dropped")))
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for TransitionWatch {
    fn drop(&mut self) {
        let _ = self.document.remove_event_listener_with_callback(
            FULLSCREEN_CHANGE_EVENT,
            self.on_change.as_ref().unchecked_ref(),
        );
        let _ = self.document.remove_event_listener_with_callback(
            FULLSCREEN_ERROR_EVENT,
            self.on_error.as_ref().unchecked_ref(),
        );
    }
}

impl FullscreenHost for WebFullscreenHost {
    type Element = web_sys::Element;

    fn is_supported(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            document().is_ok_and(|document| document.fullscreen_enabled())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn request_fullscreen<'a>(
        &'a self,
        target: &'a web_sys::Element,
    ) -> FullscreenFuture<'a, Result<(), FullscreenHostError>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                let document = document()?;
                if !document.fullscreen_enabled() {
                    return Err(FullscreenHostError::Unsupported);
                }
                if let Some(active) = document.fullscreen_element() {
                    return if &active == target {
                        Ok(())
                    } else {
                        Err(FullscreenHostError::AlreadyActive)
                    };
                }
                let watch = TransitionWatch::install(&document)?;
                target
                    .request_fullscreen()
                    .map_err(|err| FullscreenHostError::denied(describe_js_error(&err)))?;
                watch.wait().await
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = target;
                Err(FullscreenHostError::Unsupported)
            }
        })
    }

    fn exit_fullscreen<'a>(&'a self) -> FullscreenFuture<'a, Result<(), FullscreenHostError>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                let document = document()?;
                if document.fullscreen_element().is_none() {
                    return Ok(());
                }
                let watch = TransitionWatch::install(&document)?;
                document.exit_fullscreen();
                watch.wait().await
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                Ok(())
            }
        })
    }

    fn fullscreen_element(&self) -> Option<web_sys::Element> {
        #[cfg(target_arch = "wasm32")]
        {
            document().ok()?.fullscreen_element()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            None
        }
    }

    fn subscribe(&self, listener: FullscreenListener) -> ListenerId {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = ListenerId(registry.next_id);

        #[cfg(target_arch = "wasm32")]
        let registration = {
            let change_listener = listener.clone();
            let on_change = EventClosure::wrap(Box::new(move |_| {
                change_listener(FullscreenSignal::Changed);
            }));
            let on_error = EventClosure::wrap(Box::new(move |_| {
                listener(FullscreenSignal::Error);
            }));
            if let Ok(document) = document() {
                let _ = document.add_event_listener_with_callback(
                    FULLSCREEN_CHANGE_EVENT,
                    on_change.as_ref().unchecked_ref(),
                );
                let _ = document.add_event_listener_with_callback(
                    FULLSCREEN_ERROR_EVENT,
                    on_error.as_ref().unchecked_ref(),
                );
            }
            Registration {
                on_change,
                on_error,
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        let registration = Registration {
            _listener: listener,
        };

        registry.entries.insert(id, registration);
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        let Some(registration) = self.registry.borrow_mut().entries.remove(&id) else {
            return;
        };

        #[cfg(target_arch = "wasm32")]
        if let Ok(document) = document() {
            let _ = document.remove_event_listener_with_callback(
                FULLSCREEN_CHANGE_EVENT,
                registration.on_change.as_ref().unchecked_ref(),
            );
            let _ = document.remove_event_listener_with_callback(
                FULLSCREEN_ERROR_EVENT,
                registration.on_error.as_ref().unchecked_ref(),
            );
        }

        drop(registration);
    }

    fn add_class(&self, element: &web_sys::Element, class: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            let _ = element.class_list().add_1(class);
        }

        #[cfg(not(target_arch = "wasm32"))]
        let _ = (element, class);
    }

    fn remove_class(&self, element: &web_sys::Element, class: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            let _ = element.class_list().remove_1(class);
        }

        #[cfg(not(target_arch = "wasm32"))]
        let _ = (element, class);
    }

    fn set_style_property(&self, element: &web_sys::Element, name: &str, value: &str) {
        #[cfg(target_arch = "wasm32")]
        if let Some(element) = element.dyn_ref::<web_sys::HtmlElement>() {
            let _ = element.style().set_property(name, value);
        }

        #[cfg(not(target_arch = "wasm32"))]
        let _ = (element, name, value);
    }

    fn remove_style_property(&self, element: &web_sys::Element, name: &str) {
        #[cfg(target_arch = "wasm32")]
        if let Some(element) = element.dyn_ref::<web_sys::HtmlElement>() {
            let _ = element.style().remove_property(name);
        }

        #[cfg(not(target_arch = "wasm32"))]
        let _ = (element, name);
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn native_builds_report_unsupported() {
        let host = WebFullscreenHost::default();

        assert!(!host.is_supported());
        assert_eq!(host.fullscreen_element(), None);
        block_on(host.exit_fullscreen()).expect("exit is a no-op");
    }

    #[test]
    fn subscriptions_are_tracked_until_released() {
        let host = WebFullscreenHost::default();

        let first = host.subscribe(Rc::new(|_| {}));
        let second = host.subscribe(Rc::new(|_| {}));
        assert_ne!(first, second);
        assert_eq!(host.listener_count(), 2);

        host.unsubscribe(first);
        host.unsubscribe(first);
        assert_eq!(host.listener_count(), 1);
    }
}
