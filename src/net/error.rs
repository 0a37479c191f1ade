//! 仿真后端错误

use super::addr::AddrError;
use super::id::{ControllerId, NodeId};
use thiserror::Error;

/// 仿真后端（清单或 Linux 系统）报告的错误
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("node name {0:?} is already in use")]
    DuplicateNode(String),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("unknown controller {0}")]
    UnknownController(ControllerId),
    #[error("node {0:?} is not a switch")]
    NotASwitch(String),
    #[error("node {0:?} is not a host")]
    NotAHost(String),
    #[error(transparent)]
    InvalidAddress(#[from] AddrError),
    #[error("`{program} {}` exited with {status}: {stderr}", .args.join(" "))]
    Command {
        program: String,
        args: Vec<String>,
        status: String,
        stderr: String,
    },
    #[error("failed to execute {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Unsupported(&'static str),
}
