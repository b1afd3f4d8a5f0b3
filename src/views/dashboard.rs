use crate::api::HttpDashboard;
use crate::controller::{PageController, PageView, Region};
use crate::render::{self, PickerOptions};
use dioxus::events::Key;
use dioxus::prelude::*;
use std::sync::Arc;

type DashController = PageController<HttpDashboard, SignalPageView>;

/// Signal-backed implementation of the controller's view port.
///
/// Sync signals let the controller's spawned tasks write from any thread;
/// the component below renders whatever they hold.
struct SignalPageView {
    connection: SyncSignal<String>,
    available: SyncSignal<String>,
    active: SyncSignal<String>,
    response: SyncSignal<String>,
    main_override: SyncSignal<Option<String>>,
    picker: SyncSignal<PickerOptions>,
    prompt_enabled: SyncSignal<bool>,
    submit_visible: SyncSignal<bool>,
    response_visible: SyncSignal<bool>,
}

impl PageView for SignalPageView {
    fn has_region(&self, _region: Region) -> bool {
        // This view wires up every region.
        true
    }

    fn set_fragment(&self, region: Region, fragment: String) -> bool {
        match region {
            Region::Main => {
                let mut main_override = self.main_override;
                main_override.set(Some(fragment));
            }
            Region::Connection => {
                let mut connection = self.connection;
                connection.set(fragment);
            }
            Region::AvailableModels => {
                let mut available = self.available;
                available.set(fragment);
            }
            Region::ActiveModels => {
                let mut active = self.active;
                active.set(fragment);
            }
            Region::Response => {
                let mut response = self.response;
                response.set(fragment);
            }
        }
        true
    }

    fn set_picker(&self, options: PickerOptions) -> bool {
        let mut picker = self.picker;
        picker.set(options);
        true
    }

    fn set_prompt_enabled(&self, enabled: bool) {
        let mut prompt_enabled = self.prompt_enabled;
        prompt_enabled.set(enabled);
    }

    fn set_submit_visible(&self, visible: bool) {
        let mut submit_visible = self.submit_visible;
        submit_visible.set(visible);
    }

    fn set_response_visible(&self, visible: bool) {
        let mut response_visible = self.response_visible;
        response_visible.set(visible);
    }
}

#[component]
pub fn DashboardView() -> Element {
    let connection = use_signal_sync(String::new);
    let available = use_signal_sync(String::new);
    let active = use_signal_sync(String::new);
    let response = use_signal_sync(String::new);
    let main_override = use_signal_sync(|| Option::<String>::None);
    let picker = use_signal_sync(PickerOptions::placeholder);
    let prompt_enabled = use_signal_sync(|| true);
    let submit_visible = use_signal_sync(|| true);
    let response_visible = use_signal_sync(|| false);

    let mut prompt_text = use_signal(String::new);
    let mut selected_model = use_signal(String::new);

    let controller: Arc<DashController> = use_hook(|| {
        let view = Arc::new(SignalPageView {
            connection,
            available,
            active,
            response,
            main_override,
            picker,
            prompt_enabled,
            submit_visible,
            response_visible,
        });
        Arc::new(PageController::new(
            Arc::new(HttpDashboard::from_env()),
            view,
        ))
    });

    let init_controller = controller.clone();
    use_future(move || {
        let controller = init_controller.clone();
        async move {
            controller.initialize(false).await;
        }
    });

    // Keep the selection on a real option whenever the picker is rebuilt.
    use_effect(move || {
        let options = picker();
        let current = selected_model.peek().to_string();
        let still_valid = options
            .options
            .iter()
            .any(|entry| !entry.disabled && entry.value == current);
        if !still_valid {
            let first = options
                .options
                .iter()
                .find(|entry| !entry.disabled)
                .map(|entry| entry.value.clone())
                .unwrap_or_default();
            selected_model.set(first);
        }
    });

    let click_controller = controller.clone();
    let key_controller = controller.clone();

    rsx! {
        div { id: "main", class: "main-container",
            if let Some(error_page) = main_override() {
                div { class: "page-error", dangerous_inner_html: "{error_page}" }
            } else {
                div { class: "panel-grid",
                    div { id: "connection-info", class: "panel", dangerous_inner_html: "{connection()}" }
                    div { id: "available-models", class: "panel", dangerous_inner_html: "{available()}" }
                    div { id: "active-models", class: "panel", dangerous_inner_html: "{active()}" }
                }

                div { class: "composer",
                    select {
                        id: "model-picker",
                        class: "model-picker",
                        disabled: !prompt_enabled(),
                        onchange: move |ev| selected_model.set(ev.value()),
                        for entry in picker().options.into_iter() {
                            option {
                                value: "{entry.value}",
                                disabled: entry.disabled,
                                selected: entry.value == selected_model(),
                                "{entry.label}"
                            }
                        }
                    }
                    textarea {
                        id: "prompt",
                        rows: "2",
                        placeholder: "What can I help you with?",
                        value: "{prompt_text}",
                        oninput: move |ev| prompt_text.set(ev.value()),
                        onkeydown: move |ev| {
                            if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                ev.prevent_default();
                                dispatch_prompt(key_controller.clone(), prompt_text, selected_model);
                            }
                        },
                        disabled: !prompt_enabled(),
                        autofocus: true,
                    }
                    if submit_visible() {
                        button {
                            id: "prompt-btn",
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: !prompt_enabled() || prompt_text().trim().is_empty(),
                            onclick: move |_| {
                                dispatch_prompt(click_controller.clone(), prompt_text, selected_model);
                            },
                            "Send"
                        }
                    }
                }

                if response_visible() {
                    div { class: "response-region",
                        div { id: "response-container", dangerous_inner_html: "{response()}" }
                        ResponseActions { response }
                    }
                }
            }
        }
    }
}

fn dispatch_prompt(
    controller: Arc<DashController>,
    prompt_text: Signal<String>,
    selected_model: Signal<String>,
) {
    let prompt = prompt_text().trim().to_string();
    if prompt.is_empty() {
        return;
    }
    let model = selected_model();
    spawn(async move {
        controller.submit_prompt(&prompt, &model).await;
    });
}

#[component]
fn ResponseActions(response: SyncSignal<String>) -> Element {
    let on_copy = move |_| {
        let raw = render::fragment_text(response.peek().as_str());
        spawn(async move {
            #[cfg(any(feature = "desktop", feature = "mobile"))]
            {
                if let Ok(mut clipboard) = arboard::Clipboard::new() {
                    let _ = clipboard.set_text(raw);
                }
            }
            #[cfg(not(any(feature = "desktop", feature = "mobile")))]
            let _ = raw;
        });
    };

    rsx! {
        div { class: "actions",
            button { class: "action-btn", title: "Copy response", onclick: on_copy, "Copy" }
        }
    }
}
