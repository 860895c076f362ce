pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::KVError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KVStore;
