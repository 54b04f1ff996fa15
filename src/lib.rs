#[cfg(feature = "cli")]
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod headings;
pub mod ids;
pub mod ir;
pub mod layout;
pub mod mutate;
pub mod navigate;
pub mod render;
pub mod theme;
pub mod tree_dump;

#[cfg(feature = "cli")]
pub use cli::run;
pub use commands::Edit;
pub use config::Settings;
pub use error::{MindmapError, Result};
pub use ir::{Graph, LayoutDirection, Node, NodeKind, Rect, Selection, Side};
