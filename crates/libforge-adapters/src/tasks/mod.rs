//! Task runners.

mod process;

pub use process::ProcessTaskRunner;
