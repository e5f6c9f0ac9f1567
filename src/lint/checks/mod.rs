//! Individual lint passes

pub mod flow;
pub mod quality;
pub mod references;
