//! Object storage for pipeline artifacts.
//!
//! [`ObjectStore`] abstracts the provider; [`s3::S3ObjectStore`] is the
//! production implementation and [`memory::MemoryObjectStore`] backs tests.
//! [`backoff`] guards listing against a flapping provider and
//! [`documents`] reads and writes the small JSON documents stored next to
//! the artifacts.

pub mod backoff;
pub mod documents;
pub mod guard;
pub mod memory;
pub mod s3;
pub mod store;

pub use backoff::{BackoffConfig, ListingBackoff};
pub use guard::BackoffLister;
pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;
pub use store::{ObjectStore, StorageError};
