//! Hierarchy navigation: listings, breadcrumbs, descendant closures.

pub mod navigator;
pub mod path;

pub use navigator::HierarchyNavigator;
pub use path::FolderPath;
