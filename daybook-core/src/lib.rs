//! daybook-core: per-day task lists with local persistence

pub mod date_key;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;

pub use date_key::{DateKey, ParseDateKeyError};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{STORAGE_KEY, StoreError, TaskMap, TaskStore};
pub use task::{ParsePriorityError, Priority, Task, normalize_title};
pub use view::{Filter, ParseFilterError, Stats, compute_stats, filter_tasks};
