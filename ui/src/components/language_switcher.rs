use crate::i18n::hooks::{use_i18n, use_translation};
use crate::i18n::keys;
use crate::t;
use dioxus::prelude::*;

/// Language `<select>` for the app header.
///
/// Selecting a language starts `change_language` in the background; the
/// shared language signal (and with it every `use_translation` view) only
/// updates once the new language's critical namespaces are loaded.
#[component]
pub fn LanguageSwitcher() -> Element {
    let ctx = use_i18n();
    let tr = use_translation(keys::common::NAMESPACE);
    let langs = use_signal(|| ctx.available_languages());
    let current = ctx.language;

    #[cfg(debug_assertions)]
    tracing::trace!(language = %current(), "LanguageSwitcher render");

    if langs().len() < 2 {
        return rsx! {};
    }

    let on_change = {
        let ctx = ctx.clone();
        move |evt: dioxus::events::FormEvent| {
            ctx.change_language(&evt.value());
        }
    };

    rsx! {
        div { class: "navbar__locale",
            label {
                class: "visually-hidden",
                r#for: "locale-select",
                {t!(tr, keys::common::NAV_LANGUAGE)}
            }
            select {
                id: "locale-select",
                value: "{current()}",
                oninput: on_change,
                { langs().iter().map(|code| {
                    let c = code.clone();
                    rsx!{
                        option { key: "{c}", value: "{c}", selected: c == current(), "{c}" }
                    }
                })}
            }
        }
    }
}
