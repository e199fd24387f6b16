pub mod memo;

pub use memo::{open_store, LruStore, MemoKey, MemoStore, PersistentStore};
