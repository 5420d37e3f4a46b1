//! Route mapping module
//!
//! Builds the route table from the managed controller beans: the
//! class-level prefix joined with each handler's suffix, normalized, and
//! inserted first-registered-wins. Catalog order is deterministic, so
//! the collision outcome is too.

use std::sync::Arc;

use super::path::join_route;
use super::table::{RouteEntry, RouteTable};
use crate::container::{BootstrapReport, ManagedBean, Role, RouteCollision};
use crate::logger;

pub fn map_routes(managed: &[ManagedBean], report: &mut BootstrapReport) -> RouteTable {
    let mut table = RouteTable::new();

    for mb in managed {
        let Some(Role::Controller { route: prefix, .. }) = mb.def.role() else {
            continue;
        };

        for spec in mb.def.handlers() {
            let url = join_route(prefix, spec.route());
            let entry = RouteEntry {
                controller: mb.def.qualified_name(),
                handler: Arc::clone(spec),
                bean: Arc::clone(&mb.bean),
            };
            let label = entry.label();

            if let Some(rejected) = table.insert(url.clone(), entry) {
                let winner = table
                    .lookup(&url)
                    .map(RouteEntry::label)
                    .unwrap_or_default();
                logger::log_route_collision(&url, &winner, &rejected.label());
                report.collisions.push(RouteCollision {
                    url,
                    winner,
                    loser: rejected.label(),
                });
            } else {
                logger::log_route_mapped(&url, &label);
                report.routes.push(format!("{url} -> {label}"));
            }
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Catalog, ComponentDef, HandlerSpec, ParamSpec};
    use crate::container::registry::BeanRegistry;
    use crate::error::HandlerError;

    struct Pages;

    fn write_handler(
        route: &'static str,
        name: &'static str,
        body: &'static str,
    ) -> Arc<HandlerSpec> {
        HandlerSpec::new(
            route,
            name,
            vec![ParamSpec::response()],
            move |_: &Pages, exchange| {
                exchange.response.write(body);
                Ok::<(), HandlerError>(())
            },
        )
    }

    fn managed_from(catalog: &Catalog) -> (Vec<ManagedBean>, BootstrapReport) {
        let scanned = catalog.scan("app").unwrap();
        let mut registry = BeanRegistry::new();
        let mut report = BootstrapReport::default();
        let managed =
            crate::container::instantiate::run(catalog, &scanned, &mut registry, &mut report);
        (managed, report)
    }

    #[test]
    fn test_prefix_and_suffix_joined_normalized() {
        let mut catalog = Catalog::new();
        catalog.register(
            ComponentDef::controller("app.Pages", "/pages/")
                .provide(|| Ok(Pages))
                .handle(write_handler("//home", "home", "home")),
        );

        let (managed, mut report) = managed_from(&catalog);
        let table = map_routes(&managed, &mut report);
        assert!(table.lookup("/pages/home").is_some());
        assert_eq!(report.routes, vec!["/pages/home -> app.Pages#home"]);
    }

    #[test]
    fn test_services_contribute_no_routes() {
        let mut catalog = Catalog::new();
        catalog.register(ComponentDef::service("app.Pages").provide(|| Ok(Pages)));

        let (managed, mut report) = managed_from(&catalog);
        let table = map_routes(&managed, &mut report);
        assert!(table.is_empty());
    }

    #[test]
    fn test_collision_first_registered_wins_both_orders() {
        for flipped in [false, true] {
            let mut catalog = Catalog::new();
            let first = write_handler("/same", "first", "first");
            let second = write_handler("/same", "second", "second");
            let (a, b) = if flipped {
                (second, first)
            } else {
                (first, second)
            };
            catalog.register(
                ComponentDef::controller("app.Pages", "/p")
                    .provide(|| Ok(Pages))
                    .handle(a)
                    .handle(b),
            );

            let (managed, mut report) = managed_from(&catalog);
            let table = map_routes(&managed, &mut report);
            let winner = table.lookup("/p/same").unwrap().handler.name();
            assert_eq!(winner, if flipped { "second" } else { "first" });
            assert_eq!(report.collisions.len(), 1);
            assert_eq!(
                report.collisions[0].loser,
                format!("app.Pages#{}", if flipped { "first" } else { "second" })
            );
        }
    }

    #[test]
    fn test_mapping_is_deterministic_across_runs() {
        let build = || {
            let mut catalog = Catalog::new();
            catalog.register(
                ComponentDef::controller("app.Pages", "/p")
                    .provide(|| Ok(Pages))
                    .handle(write_handler("/a", "a", "a"))
                    .handle(write_handler("/same", "first", "1"))
                    .handle(write_handler("/same", "second", "2")),
            );
            let (managed, mut report) = managed_from(&catalog);
            let table = map_routes(&managed, &mut report);
            (
                table.urls().join(","),
                table.lookup("/p/same").unwrap().handler.name(),
            )
        };
        assert_eq!(build(), build());
    }
}
