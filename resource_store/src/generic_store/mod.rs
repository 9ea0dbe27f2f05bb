pub mod core;
pub mod schema;
pub mod store_object;

pub use core::GenericStore;
pub use schema::ResourceSchema;
