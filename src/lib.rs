//! Map Rust structs to relational tables.
//!
//! Declare entities with `#[derive(Entity)]`, collect them in a [`Catalog`],
//! then open a [`Session`] over a driver connection: the schema is synchronized
//! with the selected [`Strategy`] and the session serves `persist`, `find`,
//! `find_first` and `delete`.
pub use rowmap_core::*;
pub use rowmap_macros::Entity;
