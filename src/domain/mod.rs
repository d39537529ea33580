//! Domain types and models

mod object;

pub use object::{Collection, ObjectDescriptor, StoredObject, UploadRequest};
