pub mod array;
pub mod cli;
pub mod error;
pub mod script;
pub mod session;

pub use array::StringArray;
pub use error::{ArrayError, ArrayResult, ScriptError};
pub use session::{Session, DEMO_SCRIPT};
// Re-export the storage layer for callers that want the raw buffer.
pub use slot_buffer;
