//! File and folder node entities.

pub mod breadcrumb;
pub mod model;
pub mod view;

pub use breadcrumb::Crumb;
pub use model::{FOLDER_MIME_TYPE, FileNode, MAX_NAME_LEN, NewFileNode, NodePatch};
pub use view::{ViewCounts, ViewFilter};
