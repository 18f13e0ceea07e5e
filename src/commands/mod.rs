pub mod config;
pub mod diff;
pub mod refs;
pub mod tree;
pub mod watch;

pub use config::*;
pub use diff::*;
pub use refs::*;
pub use tree::*;
pub use watch::*;
