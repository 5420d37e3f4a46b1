//! Demo application modules
//!
//! The components picked up when `container.scan_package` is `modules`.

mod user;

pub use user::{UserController, UserInfo, UserService};

use crate::container::Catalog;

/// Assemble the application's component catalog.
pub fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    user::register(&mut catalog);
    catalog
}
