//! 错误类型

use crate::net::{AddrError, BackendError};
use crate::spec::ParseError;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("router ip {ip:?} is not a valid CIDR address")]
    InvalidRouterIp {
        ip: String,
        #[source]
        source: AddrError,
    },
    #[error("router ip {ip:?} is declared twice (routers {first} and {second})")]
    DuplicateRouterIp {
        ip: String,
        first: usize,
        second: usize,
    },
    #[error("node name {name:?} is used more than once")]
    DuplicateNodeName { name: String },
    #[error("link references undeclared router {ip:?}")]
    UnknownRouter { ip: String },
    #[error("{count} routers exceed the derivable MAC range (at most {max})")]
    TooManyRouters { count: usize, max: u64 },
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("interrupted")]
    Interrupted,
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
