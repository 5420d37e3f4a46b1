//! Instantiation pass module
//!
//! Walks the scanned name list and constructs one instance for every
//! definition carrying a role marker. A factory failure skips that
//! component and bootstrap continues; a bean-name collision overwrites
//! the earlier entry.

use super::catalog::Catalog;
use super::registry::BeanRegistry;
use super::{BootstrapReport, ManagedBean, SkippedComponent};
use crate::logger;
use std::sync::Arc;

pub(crate) fn run(
    catalog: &Catalog,
    scanned: &[String],
    registry: &mut BeanRegistry,
    report: &mut BootstrapReport,
) -> Vec<ManagedBean> {
    let mut managed: Vec<ManagedBean> = Vec::new();

    for qualified_name in scanned {
        let Some(def) = catalog.find(qualified_name) else {
            logger::log_component_skipped(qualified_name, "definition not found");
            report.skipped.push(SkippedComponent {
                qualified_name: qualified_name.clone(),
                reason: "definition not found".to_string(),
            });
            continue;
        };

        // Units without a role marker are not managed.
        let Some(bean_name) = def.bean_name() else {
            continue;
        };

        match def.construct() {
            Ok(bean) => {
                let overwrote = registry.insert(bean_name.clone(), Arc::clone(&bean));
                if overwrote {
                    logger::log_bean_overwritten(&bean_name, qualified_name);
                    managed.retain(|mb| mb.name != bean_name);
                }
                logger::log_bean_registered(&bean_name, qualified_name);
                report.instantiated.push(bean_name.clone());
                managed.push(ManagedBean {
                    name: bean_name,
                    def: Arc::clone(def),
                    bean,
                });
            }
            Err(err) => {
                logger::log_component_skipped(qualified_name, &err.to_string());
                report.skipped.push(SkippedComponent {
                    qualified_name: qualified_name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    managed
}
