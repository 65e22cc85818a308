pub mod pending;
pub mod storage;
pub mod store;

pub use pending::{PendingCalculation, PendingCalculationStore};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::SessionStore;
