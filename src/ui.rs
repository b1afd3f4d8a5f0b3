use crate::prefs;
use crate::theme::{ThemeMode, load_theme, persist_theme, theme_definition};
use crate::views::DashboardView;
use dioxus::prelude::*;

const KESTREL_CSS: Asset = asset!("/assets/kestrel.css");

#[component]
pub fn App() -> Element {
    // Restore the persisted preference once, before the first paint.
    let theme = use_signal(|| load_theme(prefs::default_store()));

    rsx! {
        ThemeStyles { theme }
        AppHeader { theme }
        DashboardView {}
    }
}

#[component]
fn ThemeStyles(theme: Signal<ThemeMode>) -> Element {
    let definition = theme_definition(theme());
    rsx! {
        document::Link { rel: "stylesheet", href: KESTREL_CSS }
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn AppHeader(theme: Signal<ThemeMode>) -> Element {
    rsx! {
        div { class: "header no-divider",
            div { class: "header-content",
                h1 { class: "header-wordmark", "Kestrel" }
                ThemeToggle { theme }
            }
        }
    }
}

/// Flips the visual mode, updates the control to show the new state, and
/// persists the choice.
#[component]
fn ThemeToggle(theme: Signal<ThemeMode>) -> Element {
    let mut theme = theme;
    let icon = theme_definition(theme()).toggle_icon;
    rsx! {
        button {
            class: "btn btn-ghost theme-toggle",
            r#type: "button",
            title: "Toggle theme",
            onclick: move |_| {
                let next = theme().toggled();
                theme.set(next);
                persist_theme(prefs::default_store(), next);
            },
            "{icon}"
        }
    }
}
