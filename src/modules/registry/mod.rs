pub mod metadata_registry;

pub use metadata_registry::MetadataRegistry;
