pub mod error;
pub mod net;
pub mod session;
pub mod spec;
pub mod topo;

pub use error::{Error, Result};

#[cfg(test)]
mod test;
