//! Dioxus glue for the translation resource manager.
//!
//! The root component calls [`use_i18n_provider`] once. Views then ask for
//! a namespace with [`use_translation`]; the hook loads it (active plus
//! fallback language) and re-renders the view when the load settles or the
//! language changes.

use dioxus::prelude::*;

use super::config::I18nConfig;
use super::scheduler::NamespacePlan;
use super::{I18n, Translator};

/// Shared through context: the manager plus a reactive copy of the active
/// language code that components subscribe to.
#[derive(Clone)]
pub struct I18nContext {
    pub i18n: I18n,
    pub language: Signal<String>,
}

impl I18nContext {
    /// Start a language switch in the background. The signal only flips
    /// once the critical namespaces of the new language are in the cache.
    pub fn change_language(&self, code: &str) {
        let i18n = self.i18n.clone();
        let mut language = self.language;
        let switch = i18n.change_language(code);
        spawn(async move {
            switch.await;
            language.set(i18n.language());
        });
    }

    pub fn available_languages(&self) -> Vec<String> {
        self.i18n.available_languages()
    }
}

/// Create the manager with the HTTP transport and provide it to the tree.
pub fn use_i18n_provider(config: impl FnOnce() -> I18nConfig) -> I18nContext {
    let i18n = use_hook(|| {
        let i18n = I18n::with_http(config());
        i18n.detect_language();
        i18n
    });
    let language = use_signal(|| i18n.language());
    use_context_provider(|| I18nContext { i18n, language })
}

pub fn use_i18n() -> I18nContext {
    use_context::<I18nContext>()
}

/// Translator for `namespace`, loading it on first use.
pub fn use_translation(namespace: &str) -> Translator {
    let ctx = use_i18n();
    let namespace = namespace.to_string();

    let loaded = use_resource({
        let ctx = ctx.clone();
        let namespace = namespace.clone();
        move || {
            let language = ctx.language.read().clone();
            ctx.i18n.load_namespace_for(&language, &namespace)
        }
    });
    // Subscribe so the view re-renders with the loaded strings.
    let _ = loaded.read();

    ctx.i18n.translator(&namespace)
}

/// Schedule the namespaces `route` needs. Re-runs when the route or the
/// language changes. Yields the plan once the critical tier is loaded.
pub fn use_route_preload(route: &str) -> Option<NamespacePlan> {
    let ctx = use_i18n();
    let route = route.to_string();

    let plan = use_resource(use_reactive((&route,), move |(route,)| {
        let scheduler = ctx.i18n.scheduler();
        let _language = ctx.language.read().clone();
        async move { scheduler.prepare_route(&route).await }
    }));

    let current = plan.read().as_ref().cloned();
    current
}
