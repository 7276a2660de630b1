use fullscreen_host_web::WebFullscreenHost;
use fullscreen_runtime::{FullScreenConfig, FullScreenController, Mode, Session};
use leptos::*;

use crate::{FullScreenHandle, FullScreenSlot};

#[component]
/// Container whose root element is presented by a full-screen controller.
///
/// The root always carries the namespaced base and variables classes; the controller adds and
/// removes the session classes on the same element. Descendants reach the handle through
/// [`crate::use_full_screen`].
pub fn FullScreen(
    #[prop(optional)] config: Option<FullScreenConfig>,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional)] on_ready: Option<Callback<FullScreenHandle>>,
    #[prop(optional)] slot: Option<Callback<FullScreenSlot, View>>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    let config = resolve_config(config);
    let root_class = merge_layout_class(config.classes().root_class(), layout_class);
    let handle = FullScreenHandle::bind(FullScreenController::new(
        WebFullscreenHost::default(),
        config,
    ));
    provide_context(handle.clone());

    let root_ref = create_node_ref::<html::Div>();
    root_ref.on_load({
        let handle = handle.clone();
        move |root| {
            let root: &web_sys::HtmlDivElement = &root;
            match handle.controller().attach(web_sys::Element::from(root.clone())) {
                Ok(()) => {
                    if let Some(on_ready) = on_ready {
                        on_ready.call(handle.clone());
                    }
                }
                Err(err) => logging::warn!("full-screen root attach failed: {err}"),
            }
        }
    });

    on_cleanup({
        let handle = handle.clone();
        move || handle.dispose()
    });

    let session = handle.session();
    let slot_view = slot.map(|slot| slot.call(handle.slot()));

    view! {
        <div
            node_ref=root_ref
            class=root_class
            id=id
            data-ui-primitive="true"
            data-ui-kind="full-screen"
            data-ui-state=move || state_token(session.get())
            data-ui-mode=move || mode_token(session.get())
        >
            {slot_view}
            {children.map(|children| children())}
        </div>
    }
}

fn resolve_config(config: Option<FullScreenConfig>) -> FullScreenConfig {
    let config = config.unwrap_or_default();
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            logging::warn!("invalid full-screen config, using defaults: {err}");
            FullScreenConfig::default()
        }
    }
}

fn merge_layout_class(base: String, layout_class: Option<&'static str>) -> String {
    match layout_class {
        Some(layout_class) if !layout_class.is_empty() => format!("{base} {layout_class}"),
        _ => base,
    }
}

fn state_token(session: Session) -> &'static str {
    if session.is_entered() {
        "entered"
    } else {
        "exited"
    }
}

fn mode_token(session: Session) -> Option<&'static str> {
    session.mode().map(Mode::token)
}

#[cfg(test)]
mod tests {
    use fullscreen_runtime::DEFAULT_NAMESPACE;

    use super::*;

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let config = FullScreenConfig {
            namespace: "9bad".to_string(),
            ..FullScreenConfig::default()
        };

        assert_eq!(resolve_config(Some(config)).namespace, DEFAULT_NAMESPACE);
        assert_eq!(resolve_config(None), FullScreenConfig::default());
    }

    #[test]
    fn root_class_keeps_contract_classes_first() {
        let classes = FullScreenConfig::default().classes();

        assert_eq!(
            merge_layout_class(classes.root_class(), Some("app-stage")),
            "vxp-full-screen vxp-full-screen-vars app-stage"
        );
        assert_eq!(
            merge_layout_class(classes.root_class(), Some("")),
            "vxp-full-screen vxp-full-screen-vars"
        );
    }

    #[test]
    fn state_tokens_reflect_session() {
        assert_eq!(state_token(Session::default()), "exited");
        assert_eq!(mode_token(Session::default()), None);
    }
}
