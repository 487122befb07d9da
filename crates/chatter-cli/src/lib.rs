//! Building blocks of the `chatter` binary: configuration loading and the
//! train / predict / stream commands.
pub mod predict;
pub mod stream;
pub mod train;
pub mod util;
