//! Library side of the `spool` command line.

pub mod logging;
pub mod pipeline;
