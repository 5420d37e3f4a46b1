//! IoC container module
//!
//! Owns the bootstrap pipeline: scan the component catalog, instantiate
//! marked components, wire dependency slots, map routes. Runs exactly
//! once, single-threaded, before any request is served; everything it
//! builds is immutable afterward.

pub mod catalog;
pub mod handler;
pub(crate) mod instantiate;
pub mod registry;
mod wire;

use serde::Serialize;
use std::sync::Arc;

use crate::config::ContainerConfig;
use crate::error::BootstrapError;
use crate::logger;
use crate::routing::{self, RouteTable};

pub use catalog::{dependency, Catalog, ComponentDef, Role};
pub use handler::{Arg, Exchange, HandlerSpec, ParamSpec, ValueKind};
pub use registry::{BeanRef, BeanRegistry, Injected};

/// One instantiated, registered component
pub struct ManagedBean {
    /// Resolved bean name, unique across the registry.
    pub name: String,
    pub def: Arc<ComponentDef>,
    pub bean: BeanRef,
}

impl std::fmt::Debug for ManagedBean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedBean")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A component skipped during instantiation, with the reason
#[derive(Debug, Serialize)]
pub struct SkippedComponent {
    pub qualified_name: String,
    pub reason: String,
}

/// A dependency slot left empty under lenient wiring
#[derive(Debug, Serialize)]
pub struct UnresolvedSlot {
    pub bean: String,
    pub slot: String,
    pub target: String,
    pub reason: String,
}

/// A route mapping displaced by the first-registered-wins policy
#[derive(Debug, Serialize)]
pub struct RouteCollision {
    pub url: String,
    pub winner: String,
    pub loser: String,
}

/// Aggregated outcome of one bootstrap run
#[derive(Debug, Default, Serialize)]
pub struct BootstrapReport {
    pub scanned: Vec<String>,
    pub instantiated: Vec<String>,
    pub skipped: Vec<SkippedComponent>,
    pub unresolved: Vec<UnresolvedSlot>,
    pub collisions: Vec<RouteCollision>,
    pub routes: Vec<String>,
}

impl BootstrapReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// The bootstrapped container: bean registry, route table, and report
pub struct Container {
    pub registry: BeanRegistry,
    pub routes: RouteTable,
    pub report: BootstrapReport,
}

impl Container {
    /// Run the full bootstrap pipeline against a component catalog.
    pub fn bootstrap(catalog: &Catalog, settings: &ContainerConfig) -> Result<Self, BootstrapError> {
        let scanned = catalog.scan(&settings.scan_package)?;
        logger::log_scan_result(&settings.scan_package, scanned.len());

        let mut report = BootstrapReport {
            scanned: scanned.clone(),
            ..BootstrapReport::default()
        };

        let mut registry = BeanRegistry::new();
        let managed = instantiate::run(catalog, &scanned, &mut registry, &mut report);

        wire::run(&managed, &registry, settings.strict_wiring, &mut report)?;

        let routes = routing::map_routes(&managed, &mut report);

        Ok(Self {
            registry,
            routes,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Clock;
    struct Panel {
        clock: Injected<Clock>,
    }

    fn demo_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.register(ComponentDef::service("app.panel.Clock").provide(|| Ok(Clock)));
        catalog.register(
            ComponentDef::controller("app.panel.Panel", "/panel")
                .provide(|| {
                    Ok(Panel {
                        clock: Injected::empty(),
                    })
                })
                .depend(dependency("clock", |p: &Panel| &p.clock))
                .handle(HandlerSpec::new(
                    "/show",
                    "show",
                    vec![ParamSpec::response()],
                    |_panel: &Panel, exchange| {
                        exchange.response.write("tick");
                        Ok(())
                    },
                )),
        );
        catalog
    }

    fn settings(strict: bool) -> ContainerConfig {
        ContainerConfig {
            scan_package: "app.panel".to_string(),
            context_path: String::new(),
            strict_wiring: strict,
        }
    }

    #[test]
    fn test_bootstrap_builds_registry_and_routes() {
        let container = Container::bootstrap(&demo_catalog(), &settings(true)).unwrap();
        assert_eq!(container.registry.len(), 2);
        assert!(container.routes.lookup("/panel/show").is_some());
        assert_eq!(container.report.instantiated.len(), 2);
        assert_eq!(container.report.routes.len(), 1);
    }

    #[test]
    fn test_every_route_references_a_registered_bean() {
        let container = Container::bootstrap(&demo_catalog(), &settings(true)).unwrap();
        for url in container.routes.urls() {
            let entry = container.routes.lookup(url).unwrap();
            let registered = container.registry.names().into_iter().any(|name| {
                container
                    .registry
                    .get(name)
                    .is_some_and(|bean| Arc::ptr_eq(bean, &entry.bean))
            });
            assert!(registered, "route {url} references an unregistered bean");
        }
    }

    #[test]
    fn test_bootstrap_fails_on_unknown_scan_root() {
        let mut cfg = settings(false);
        cfg.scan_package = "app.missing".to_string();
        assert!(matches!(
            Container::bootstrap(&demo_catalog(), &cfg),
            Err(BootstrapError::ScanRootNotFound(_))
        ));
    }

    #[test]
    fn test_report_serializes() {
        let container = Container::bootstrap(&demo_catalog(), &settings(false)).unwrap();
        let json = container.report.to_json();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["scanned"].is_array());
        assert!(parsed["routes"].is_array());
    }
}
