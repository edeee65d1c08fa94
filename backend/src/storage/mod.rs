pub mod filename;
pub mod upload_store;

pub use filename::{base_name, secure_filename};
pub use upload_store::{StorageError, StoredUpload, UploadStore};
