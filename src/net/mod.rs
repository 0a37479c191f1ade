//! 网络仿真模块
//!
//! 此模块包含仿真后端的接口与实现，以及节点、链路、地址等基础类型。

// 子模块声明
mod addr;
mod command;
mod emulator;
mod error;
mod id;
mod link;
mod linux;
mod network;
mod node;

// 重新导出公共接口
pub use addr::{AddrError, Cidr, MacAddr};
pub use command::{CmdOutput, CommandRunner, SystemRunner};
pub use emulator::Emulator;
pub use error::BackendError;
pub use id::{ControllerId, LinkId, NodeId};
pub use link::{Endpoint, Link};
pub use linux::LinuxEmulator;
pub use network::Network;
pub use node::{Controller, Host, Node, NodeKind, Switch};
