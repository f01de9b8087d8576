//! Menu tree and cursor model
//!
//! The tree is one static table built at compile time. `MenuModel` owns
//! the cursor and the screen being shown, and turns decoded input into
//! screen changes and action dispatch.

pub mod model;
pub mod results;
pub mod tree;

pub use model::{ClickOutcome, MenuModel, Notice, Screen, MAX_VIEW_ITEMS};
pub use results::{ScanResult, ScanResults};
pub use tree::{ActionId, ItemKind, MenuItem, MenuNode, MenuTree, NodeId, STANDARD_MENU};
