//! Namespace priority tiers and route-driven preloading.
//!
//! - `critical` namespaces are awaited before any localized render.
//! - `high` namespaces start right after, in the background.
//! - `medium`/`low` namespaces load on demand after a short stagger so
//!   they do not compete with the first paint.

use std::collections::BTreeMap;
use std::fmt;

use futures::future::join_all;

use super::config::{I18nConfig, NamespaceConfig};
use super::I18n;
use crate::core::{platform, timing};

/// Namespace loaded when a route has no entry in the table.
pub const DEFAULT_NAMESPACE: &str = "common";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(label)
    }
}

/// Static namespace -> tier classification.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceTiers {
    tiers: BTreeMap<String, Priority>,
    critical: Vec<String>,
}

impl NamespaceTiers {
    pub fn from_config(config: &NamespaceConfig) -> Self {
        let mut tiers = BTreeMap::new();
        // Lower tiers first so a namespace listed twice keeps its highest tier.
        for (names, priority) in [
            (&config.low, Priority::Low),
            (&config.medium, Priority::Medium),
            (&config.high, Priority::High),
            (&config.critical, Priority::Critical),
        ] {
            for name in names {
                tiers.insert(name.clone(), priority);
            }
        }
        Self {
            tiers,
            critical: dedup(config.critical.iter().cloned()),
        }
    }

    /// Unknown namespaces are `Low`.
    pub fn priority(&self, namespace: &str) -> Priority {
        self.tiers.get(namespace).copied().unwrap_or(Priority::Low)
    }

    pub fn critical(&self) -> &[String] {
        &self.critical
    }
}

/// Route path -> namespaces the view needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, Vec<String>>,
}

impl RouteTable {
    pub fn new(routes: BTreeMap<String, Vec<String>>) -> Self {
        let routes = routes
            .into_iter()
            .map(|(path, namespaces)| (normalize_route(&path), namespaces))
            .collect();
        Self { routes }
    }

    /// Exact match first, then the longest matching segment prefix
    /// (`/documents/42` uses `/documents`). Unmatched routes get `common`.
    pub fn namespaces_for(&self, route: &str) -> Vec<String> {
        let path = normalize_route(route);
        if let Some(namespaces) = self.routes.get(&path) {
            return namespaces.clone();
        }

        let mut prefix = path.as_str();
        while let Some(cut) = prefix.rfind('/') {
            prefix = &prefix[..cut];
            if prefix.is_empty() {
                // "/" is a catch-all only on an exact match.
                break;
            }
            if let Some(namespaces) = self.routes.get(prefix) {
                return namespaces.clone();
            }
        }

        vec![DEFAULT_NAMESPACE.to_string()]
    }
}

/// Strip query/fragment and trailing slashes; always starts with `/`.
fn normalize_route(route: &str) -> String {
    let path = route.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn dedup(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Namespaces for one route, partitioned by tier in load order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamespacePlan {
    pub critical: Vec<String>,
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

impl NamespacePlan {
    /// Every namespace in tier order.
    pub fn ordered(&self) -> Vec<(Priority, String)> {
        let tiers = [
            (Priority::Critical, &self.critical),
            (Priority::High, &self.high),
            (Priority::Medium, &self.medium),
            (Priority::Low, &self.low),
        ];
        tiers
            .into_iter()
            .flat_map(|(priority, names)| names.iter().map(move |n| (priority, n.clone())))
            .collect()
    }

    pub fn deferred(&self) -> Vec<String> {
        self.medium.iter().chain(self.low.iter()).cloned().collect()
    }
}

/// Builds plans from the configured tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Planner {
    tiers: NamespaceTiers,
    routes: RouteTable,
}

impl Planner {
    pub fn from_config(config: &I18nConfig) -> Self {
        Self {
            tiers: NamespaceTiers::from_config(&config.namespaces),
            routes: RouteTable::new(config.routes.clone()),
        }
    }

    pub fn tiers(&self) -> &NamespaceTiers {
        &self.tiers
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The globally critical namespaces always lead the critical tier.
    pub fn plan_for_route(&self, route: &str) -> NamespacePlan {
        let mut plan = NamespacePlan {
            critical: self.tiers.critical().to_vec(),
            ..NamespacePlan::default()
        };
        for namespace in self.routes.namespaces_for(route) {
            let already = plan.ordered().iter().any(|(_, n)| *n == namespace);
            if already {
                continue;
            }
            match self.tiers.priority(&namespace) {
                Priority::Critical => plan.critical.push(namespace),
                Priority::High => plan.high.push(namespace),
                Priority::Medium => plan.medium.push(namespace),
                Priority::Low => plan.low.push(namespace),
            }
        }
        plan
    }
}

/// Drives loads for an [`I18n`] instance according to the plan.
#[derive(Clone)]
pub struct Scheduler {
    i18n: I18n,
}

impl Scheduler {
    pub fn new(i18n: I18n) -> Self {
        Self { i18n }
    }

    pub fn plan_for_route(&self, route: &str) -> NamespacePlan {
        self.i18n.planner().plan_for_route(route)
    }

    /// Await every critical namespace in `language` and the fallback
    /// language.
    pub async fn load_critical(&self, language: &str) {
        let critical = self.i18n.planner().tiers().critical().to_vec();
        self.load_all(language, &critical).await;
    }

    /// Await the route's critical tier, then start the rest in the
    /// background. Returns the plan that was scheduled.
    pub async fn prepare_route(&self, route: &str) -> NamespacePlan {
        let plan = self.plan_for_route(route);
        let language = self.i18n.language();
        self.load_all(&language, &plan.critical).await;

        if !plan.high.is_empty() {
            let this = self.clone();
            let high = plan.high.clone();
            let language = language.clone();
            platform::spawn_future(async move {
                this.load_in_background(&language, &high).await;
            });
        }

        let deferred = plan.deferred();
        if !deferred.is_empty() {
            let this = self.clone();
            let language = language.clone();
            platform::spawn_future(async move {
                timing::sleep_ms(this.i18n.config().preload.on_demand_delay_ms).await;
                this.load_in_background(&language, &deferred).await;
            });
        }

        tracing::debug!(route, ?plan, "scheduled namespace preloads");
        plan
    }

    /// Load one namespace for a view about to render, after the stagger.
    pub async fn load_on_demand(&self, namespace: &str) {
        timing::sleep_ms(self.i18n.config().preload.on_demand_delay_ms).await;
        self.i18n.load_namespace(namespace).await;
    }

    async fn load_all(&self, language: &str, namespaces: &[String]) {
        let fallback = self.i18n.fallback_language();
        let mut loads = Vec::with_capacity(namespaces.len() * 2);
        for namespace in namespaces {
            loads.push(self.i18n.load(language, namespace));
            if fallback != language {
                loads.push(self.i18n.load(&fallback, namespace));
            }
        }
        join_all(loads).await;
    }

    /// Load `namespaces` in `language` and the fallback language. Returns
    /// the (tier, language, namespace) loads that came back empty.
    async fn load_in_background(&self, language: &str, namespaces: &[String]) -> Vec<(Priority, String, String)> {
        let fallback = self.i18n.fallback_language();
        let tiers = self.i18n.planner().tiers();
        let mut loads = Vec::with_capacity(namespaces.len() * 2);
        for namespace in namespaces {
            let tier = tiers.priority(namespace);
            let mut languages = vec![language.to_string()];
            if fallback != language {
                languages.push(fallback.clone());
            }
            for lang in languages {
                let load = self.i18n.load(&lang, namespace);
                let namespace = namespace.clone();
                loads.push(async move { (tier, lang, namespace, load.await) });
            }
        }

        let mut empty = Vec::new();
        for (tier, language, namespace, dictionary) in join_all(loads).await {
            if dictionary.is_empty() {
                tracing::warn!(%tier, language = %language, namespace = %namespace, "background preload produced no translations");
                empty.push((tier, language, namespace));
            }
        }
        empty
    }
}
