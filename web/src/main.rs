use dioxus::prelude::*;

use ui::components::LanguageSwitcher;
use ui::i18n::hooks::{use_i18n, use_i18n_provider, use_route_preload, use_translation};
use ui::i18n::{keys, I18nConfig};
use ui::t;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebShell)]
    #[route("/")]
    Dashboard {},
    #[route("/login")]
    Login {},
    #[route("/clients")]
    Clients {},
    #[route("/items")]
    Items {},
    #[route("/documents")]
    Documents {},
    #[route("/settings")]
    Settings {},
}

fn main() {
    dioxus::logger::init(dioxus::logger::tracing::Level::INFO).expect("failed to init logger");
    tracing::info!("starting Fatturino web");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let ctx = use_i18n_provider(I18nConfig::bundled);
    let language = ctx.language;

    rsx! {
        // Hidden marker keeps an explicit reactive dependency on the language signal
        div { style: "display:none", "lang={language()}" }
        Router::<Route> {}
    }
}

/// Header, navigation and route-driven namespace preloading around the
/// routed view.
#[component]
fn WebShell() -> Element {
    let route = use_route::<Route>();
    let _plan = use_route_preload(&route.to_string());
    let tr = use_translation(keys::common::NAMESPACE);

    rsx! {
        header { id: "navbar", class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-mark", {t!(tr, keys::common::APP_NAME)} }
                    span { class: "navbar__brand-subtitle", {t!(tr, keys::common::APP_TAGLINE)} }
                }
                nav { class: "navbar__links",
                    Link { class: "navbar__link", to: Route::Dashboard {}, {t!(tr, keys::common::NAV_DASHBOARD)} }
                    Link { class: "navbar__link", to: Route::Clients {}, {t!(tr, keys::common::NAV_CLIENTS)} }
                    Link { class: "navbar__link", to: Route::Items {}, {t!(tr, keys::common::NAV_ITEMS)} }
                    Link { class: "navbar__link", to: Route::Documents {}, {t!(tr, keys::common::NAV_DOCUMENTS)} }
                    Link { class: "navbar__link", to: Route::Settings {}, {t!(tr, keys::common::NAV_SETTINGS)} }
                }
                LanguageSwitcher {}
            }
        }
        main { Outlet::<Route> {} }
    }
}

#[component]
fn Dashboard() -> Element {
    let tr = use_translation(keys::dashboard::NAMESPACE);
    rsx! {
        h1 { {t!(tr, keys::dashboard::TITLE)} }
        p { {t!(tr, keys::dashboard::STATS_OVERDUE, count = 0)} }
        section {
            h2 { {t!(tr, keys::dashboard::RECENT_TITLE)} }
            p { {t!(tr, keys::dashboard::RECENT_EMPTY)} }
        }
    }
}

#[component]
fn Login() -> Element {
    let tr = use_translation(keys::auth::NAMESPACE);
    rsx! {
        h1 { {t!(tr, keys::auth::LOGIN_TITLE)} }
        form {
            label { {t!(tr, keys::auth::LOGIN_EMAIL)} input { r#type: "email" } }
            label { {t!(tr, keys::auth::LOGIN_PASSWORD)} input { r#type: "password" } }
            button { r#type: "submit", {t!(tr, keys::auth::LOGIN_SUBMIT)} }
        }
    }
}

#[component]
fn Clients() -> Element {
    let tr = use_translation(keys::clients::NAMESPACE);
    rsx! {
        h1 { {t!(tr, keys::clients::TITLE)} }
        p { {t!(tr, keys::clients::COUNT, count = 0)} }
    }
}

#[component]
fn Items() -> Element {
    let tr = use_translation(keys::items::NAMESPACE);
    rsx! {
        h1 { {t!(tr, keys::items::TITLE)} }
        p { {t!(tr, keys::items::COUNT, count = 0)} }
    }
}

#[component]
fn Documents() -> Element {
    let tr = use_translation(keys::documents::NAMESPACE);
    rsx! {
        h1 { {t!(tr, keys::documents::TITLE)} }
        p { {t!(tr, keys::documents::COUNT, count = 0)} }
        ul {
            li { {t!(tr, keys::documents::TYPES_INVOICE)} }
            li { {t!(tr, keys::documents::TYPES_QUOTE)} }
            li { {t!(tr, keys::documents::TYPES_CREDIT_NOTE)} }
        }
    }
}

#[component]
fn Settings() -> Element {
    let tr = use_translation(keys::settings::NAMESPACE);
    let ctx = use_i18n();
    let stats = ctx.i18n.stats();
    let hit_rate = format!("{:.2}", stats.hit_rate);

    rsx! {
        h1 { {t!(tr, keys::settings::TITLE)} }
        section {
            h2 { {t!(tr, keys::settings::LANGUAGE_TITLE)} }
            p { {t!(tr, keys::settings::LANGUAGE_DESCRIPTION)} }
            LanguageSwitcher {}
        }
        details {
            summary { "i18n" }
            dl {
                dt { "cache" } dd { "{stats.cache_size}/{stats.cache_capacity}" }
                dt { "hit rate" } dd { "{hit_rate}" }
                dt { "requests" } dd { "{stats.network_requests}" }
                dt { "deduplicated" } dd { "{stats.deduplicated}" }
                dt { "failures" } dd { "{stats.failures}" }
            }
        }
    }
}
