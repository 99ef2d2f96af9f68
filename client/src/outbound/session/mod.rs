//! Filesystem session store adapter.

mod atomic_io;
mod file_session_store;

pub use file_session_store::FileSessionStore;
