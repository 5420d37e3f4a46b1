//! Wiring pass module
//!
//! Fills every managed bean's declared dependency slots from the registry.
//! All instances exist before this pass starts, so wiring order across
//! beans does not matter. Lenient mode leaves unresolved slots empty;
//! strict mode aborts bootstrap.

use super::catalog::AssignError;
use super::registry::BeanRegistry;
use super::{BootstrapReport, ManagedBean, UnresolvedSlot};
use crate::error::BootstrapError;
use crate::logger;

pub(super) fn run(
    managed: &[ManagedBean],
    registry: &BeanRegistry,
    strict: bool,
    report: &mut BootstrapReport,
) -> Result<(), BootstrapError> {
    if registry.is_empty() {
        return Err(BootstrapError::NoManagedBeans);
    }

    for mb in managed {
        for spec in mb.def.dependencies() {
            let target = spec.target_name();
            match registry.get(&target) {
                Some(target_bean) => match spec.assign(&mb.bean, target_bean) {
                    Ok(()) => {}
                    Err(AssignError::OwnerType | AssignError::TargetType) => {
                        if strict {
                            return Err(BootstrapError::DependencyTypeMismatch {
                                bean: mb.name.clone(),
                                slot: spec.slot().to_string(),
                                target,
                            });
                        }
                        logger::log_dependency_unresolved(&mb.name, spec.slot(), &target);
                        report.unresolved.push(UnresolvedSlot {
                            bean: mb.name.clone(),
                            slot: spec.slot().to_string(),
                            target,
                            reason: "type mismatch".to_string(),
                        });
                    }
                },
                None => {
                    if strict {
                        return Err(BootstrapError::UnresolvedDependency {
                            bean: mb.name.clone(),
                            slot: spec.slot().to_string(),
                            target,
                        });
                    }
                    logger::log_dependency_unresolved(&mb.name, spec.slot(), &target);
                    report.unresolved.push(UnresolvedSlot {
                        bean: mb.name.clone(),
                        slot: spec.slot().to_string(),
                        target,
                        reason: "no bean under this name".to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}
