//! Component catalog module
//!
//! The registration-time analog of a classpath: every component declares a
//! `ComponentDef` (qualified dotted name, role marker, factory, dependency
//! slots, handler specs) and the scanner filters the catalog by a root
//! package prefix. Registration order is discovery order, so scanning is
//! deterministic.

use std::sync::Arc;

use super::handler::HandlerSpec;
use super::registry::{BeanRef, Injected};
use crate::error::{BootstrapError, ConstructError};

/// Role marker attached to a component definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Request-handling component; `route` is the class-level URL prefix.
    Controller {
        name: &'static str,
        route: &'static str,
    },
    /// Plain managed component.
    Service { name: &'static str },
}

impl Role {
    const fn explicit_name(self) -> &'static str {
        match self {
            Self::Controller { name, .. } | Self::Service { name } => name,
        }
    }
}

type Factory = Box<dyn Fn() -> Result<BeanRef, ConstructError> + Send + Sync>;

/// Assignment failure surfaced by a dependency spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignError {
    /// The owning bean was not of the type the spec was declared for.
    OwnerType,
    /// The target bean exists but cannot fill the slot.
    TargetType,
}

type AssignFn = Box<dyn Fn(&BeanRef, &BeanRef) -> Result<(), AssignError> + Send + Sync>;

/// One declared dependency slot on a component
pub struct DependencySpec {
    slot: &'static str,
    qualifier: Option<&'static str>,
    type_name: &'static str,
    assign: AssignFn,
}

impl DependencySpec {
    /// Explicit target bean name, like a qualifier marker argument.
    #[must_use]
    pub fn qualified(mut self, name: &'static str) -> Self {
        self.qualifier = Some(name);
        self
    }

    pub fn slot(&self) -> &'static str {
        self.slot
    }

    /// Resolve the target bean name: explicit qualifier if non-empty,
    /// else the dependency type's simple name with a lowered first char.
    pub fn target_name(&self) -> String {
        match self.qualifier.filter(|q| !q.is_empty()) {
            Some(q) => q.to_string(),
            None => lower_first(self.type_name),
        }
    }

    pub fn assign(&self, owner: &BeanRef, target: &BeanRef) -> Result<(), AssignError> {
        (self.assign)(owner, target)
    }
}

/// Declare a dependency slot: `accessor` projects the owner onto its
/// `Injected<T>` field, and the generated assignment closure downcasts
/// both sides at wiring time.
pub fn dependency<C, T>(slot: &'static str, accessor: fn(&C) -> &Injected<T>) -> DependencySpec
where
    C: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    DependencySpec {
        slot,
        qualifier: None,
        type_name: simple_type_name::<T>(),
        assign: Box::new(move |owner, target| {
            let owner = owner.downcast_ref::<C>().ok_or(AssignError::OwnerType)?;
            let target = Arc::clone(target)
                .downcast::<T>()
                .map_err(|_| AssignError::TargetType)?;
            accessor(owner).fill(target);
            Ok(())
        }),
    }
}

/// One registered component unit
pub struct ComponentDef {
    qualified_name: &'static str,
    role: Option<Role>,
    factory: Option<Factory>,
    dependencies: Vec<DependencySpec>,
    handlers: Vec<Arc<HandlerSpec>>,
}

impl ComponentDef {
    fn new(qualified_name: &'static str, role: Option<Role>) -> Self {
        Self {
            qualified_name,
            role,
            factory: None,
            dependencies: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// A controller component with a class-level route prefix.
    pub fn controller(qualified_name: &'static str, route: &'static str) -> Self {
        Self::new(qualified_name, Some(Role::Controller { name: "", route }))
    }

    /// A service component.
    pub fn service(qualified_name: &'static str) -> Self {
        Self::new(qualified_name, Some(Role::Service { name: "" }))
    }

    /// A unit with no role marker; scanned but never instantiated.
    pub fn plain(qualified_name: &'static str) -> Self {
        Self::new(qualified_name, None)
    }

    /// Explicit bean name, like a marker's name argument.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.role = self.role.map(|role| match role {
            Role::Controller { route, .. } => Role::Controller { name, route },
            Role::Service { .. } => Role::Service { name },
        });
        self
    }

    /// Register the factory invoked once during instantiation.
    #[must_use]
    pub fn provide<C: Send + Sync + 'static>(
        mut self,
        factory: impl Fn() -> Result<C, ConstructError> + Send + Sync + 'static,
    ) -> Self {
        self.factory = Some(Box::new(move || {
            factory().map(|bean| Arc::new(bean) as BeanRef)
        }));
        self
    }

    #[must_use]
    pub fn depend(mut self, spec: DependencySpec) -> Self {
        self.dependencies.push(spec);
        self
    }

    #[must_use]
    pub fn handle(mut self, spec: Arc<HandlerSpec>) -> Self {
        self.handlers.push(spec);
        self
    }

    pub fn qualified_name(&self) -> &'static str {
        self.qualified_name
    }

    pub fn simple_name(&self) -> &'static str {
        simple_name(self.qualified_name)
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn dependencies(&self) -> &[DependencySpec] {
        &self.dependencies
    }

    pub fn handlers(&self) -> &[Arc<HandlerSpec>] {
        &self.handlers
    }

    /// Bean name this component registers under, `None` for unmarked units.
    pub fn bean_name(&self) -> Option<String> {
        self.role.map(|role| {
            let explicit = role.explicit_name();
            if explicit.is_empty() {
                lower_first(self.simple_name())
            } else {
                explicit.to_string()
            }
        })
    }

    /// Invoke the factory.
    pub fn construct(&self) -> Result<BeanRef, ConstructError> {
        match &self.factory {
            Some(factory) => factory(),
            None => Err(ConstructError::new("no factory registered")),
        }
    }
}

/// All registered component definitions, in registration order
#[derive(Default)]
pub struct Catalog {
    defs: Vec<Arc<ComponentDef>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: ComponentDef) {
        self.defs.push(Arc::new(def));
    }

    /// Produce the complete ordered list of qualified names registered
    /// under `root_package` (dotted-path prefix on a package boundary).
    pub fn scan(&self, root_package: &str) -> Result<Vec<String>, BootstrapError> {
        let prefix = format!("{root_package}.");
        let names: Vec<String> = self
            .defs
            .iter()
            .map(|def| def.qualified_name())
            .filter(|name| *name == root_package || name.starts_with(&prefix))
            .map(ToString::to_string)
            .collect();

        if names.is_empty() {
            return Err(BootstrapError::ScanRootNotFound(root_package.to_string()));
        }
        Ok(names)
    }

    pub fn find(&self, qualified_name: &str) -> Option<&Arc<ComponentDef>> {
        self.defs
            .iter()
            .find(|def| def.qualified_name() == qualified_name)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Last dotted segment of a qualified name
pub(crate) fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Lowercase the first character of a name
pub(crate) fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Simple name of a Rust type, without its module path
pub(crate) fn simple_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Phone;
    struct AddressBook {
        phone: Injected<Phone>,
    }

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.register(
            ComponentDef::controller("app.book.AddressBook", "/book").provide(|| {
                Ok(AddressBook {
                    phone: Injected::empty(),
                })
            }),
        );
        catalog.register(ComponentDef::service("app.book.Phone").provide(|| Ok(Phone)));
        catalog.register(ComponentDef::plain("app.book.Notes"));
        catalog.register(ComponentDef::service("other.Phone").provide(|| Ok(Phone)));
        catalog
    }

    #[test]
    fn test_scan_filters_by_package_boundary() {
        let catalog = sample_catalog();
        let names = catalog.scan("app.book").unwrap();
        assert_eq!(
            names,
            vec!["app.book.AddressBook", "app.book.Phone", "app.book.Notes"]
        );
        // "app" is a package prefix of everything under app.*
        assert_eq!(catalog.scan("app").unwrap().len(), 3);
        // but "app.boo" is not a package boundary
        assert!(matches!(
            catalog.scan("app.boo"),
            Err(BootstrapError::ScanRootNotFound(_))
        ));
    }

    #[test]
    fn test_scan_is_deterministic() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.scan("app.book").unwrap(),
            catalog.scan("app.book").unwrap()
        );
    }

    #[test]
    fn test_scan_unknown_root_fails() {
        let catalog = sample_catalog();
        assert!(matches!(
            catalog.scan("com.missing"),
            Err(BootstrapError::ScanRootNotFound(_))
        ));
    }

    #[test]
    fn test_bean_name_derived_from_simple_name() {
        let def = ComponentDef::service("app.book.Phone");
        assert_eq!(def.bean_name().as_deref(), Some("phone"));
    }

    #[test]
    fn test_bean_name_explicit_wins() {
        let def = ComponentDef::service("app.book.Phone").named("mainPhone");
        assert_eq!(def.bean_name().as_deref(), Some("mainPhone"));
    }

    #[test]
    fn test_plain_def_has_no_bean_name() {
        assert_eq!(ComponentDef::plain("app.book.Notes").bean_name(), None);
    }

    #[test]
    fn test_dependency_target_name() {
        let spec = dependency("phone", |book: &AddressBook| &book.phone);
        assert_eq!(spec.target_name(), "phone");
        let spec = dependency("phone", |book: &AddressBook| &book.phone).qualified("mainPhone");
        assert_eq!(spec.target_name(), "mainPhone");
    }

    #[test]
    fn test_dependency_assign_downcasts() {
        let spec = dependency("phone", |book: &AddressBook| &book.phone);
        let owner: BeanRef = Arc::new(AddressBook {
            phone: Injected::empty(),
        });
        let target: BeanRef = Arc::new(Phone);
        spec.assign(&owner, &target).unwrap();

        let owner = Arc::clone(&owner).downcast::<AddressBook>().unwrap();
        assert!(owner.phone.is_filled());
    }

    #[test]
    fn test_dependency_assign_rejects_wrong_target_type() {
        let spec = dependency("phone", |book: &AddressBook| &book.phone);
        let owner: BeanRef = Arc::new(AddressBook {
            phone: Injected::empty(),
        });
        let target: BeanRef = Arc::new("not a phone".to_string());
        assert_eq!(spec.assign(&owner, &target), Err(AssignError::TargetType));
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("UserService"), "userService");
        assert_eq!(lower_first("X"), "x");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn test_construct_without_factory_fails() {
        let def = ComponentDef::service("app.book.Phone");
        assert!(def.construct().is_err());
    }
}
