//! Traits for resource access
//!
//! [`Record`] is the compile-time table metadata a row type carries (usually
//! derived), [`Resource`] adds everything a generic store needs to expose the
//! record over List/Get/Create/Update/Delete, and [`StoreObject`] is the
//! operation set itself.

pub mod record;
pub mod resource;
pub mod store_object;

pub use record::Record;
pub use resource::Resource;
pub use store_object::StoreObject;
