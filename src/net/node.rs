//! 节点类型
//!
//! 定义网络节点，包括主机、交换机以及外部远程控制器。

use super::addr::{Cidr, MacAddr};
use super::id::{ControllerId, NodeId};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};

/// 节点种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Host,
    Switch,
}

/// 网络节点
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Host(Host),
    Switch(Switch),
}

impl Node {
    /// 获取节点标识符
    pub fn id(&self) -> NodeId {
        match self {
            Node::Host(h) => h.id,
            Node::Switch(s) => s.id,
        }
    }

    /// 获取节点名称
    pub fn name(&self) -> &str {
        match self {
            Node::Host(h) => &h.name,
            Node::Switch(s) => &s.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Host(_) => NodeKind::Host,
            Node::Switch(_) => NodeKind::Switch,
        }
    }

    /// 节点上已分配的接口名（按端口顺序）
    pub fn intfs(&self) -> &[String] {
        match self {
            Node::Host(h) => &h.intfs,
            Node::Switch(s) => &s.intfs,
        }
    }

    pub(crate) fn intfs_mut(&mut self) -> &mut Vec<String> {
        match self {
            Node::Host(h) => &mut h.intfs,
            Node::Switch(s) => &mut s.intfs,
        }
    }

    /// 下一个接口名：主机端口从 0 开始，交换机端口从 1 开始。
    pub(crate) fn next_intf_name(&self) -> String {
        let base = match self.kind() {
            NodeKind::Host => 0,
            NodeKind::Switch => 1,
        };
        format!("{}-eth{}", self.name(), base + self.intfs().len())
    }

    pub fn as_host(&self) -> Option<&Host> {
        match self {
            Node::Host(h) => Some(h),
            Node::Switch(_) => None,
        }
    }

    pub fn as_switch(&self) -> Option<&Switch> {
        match self {
            Node::Switch(s) => Some(s),
            Node::Host(_) => None,
        }
    }
}

/// 主机节点
#[derive(Debug, Clone, Serialize)]
pub struct Host {
    pub id: NodeId,
    pub name: String,
    pub ip: Cidr,
    pub mac: MacAddr,
    pub intfs: Vec<String>,
    /// 默认网关；尚未配置路由时为 None
    pub default_gateway: Option<IpAddr>,
}

impl Host {
    /// 创建新主机
    pub fn new(id: NodeId, name: impl Into<String>, ip: Cidr, mac: MacAddr) -> Self {
        Self {
            id,
            name: name.into(),
            ip,
            mac,
            intfs: Vec::new(),
            default_gateway: None,
        }
    }

    /// 默认接口（第一个端口）
    pub fn default_intf(&self) -> Option<&str> {
        self.intfs.first().map(String::as_str)
    }
}

/// 交换机节点
#[derive(Debug, Clone, Serialize)]
pub struct Switch {
    pub id: NodeId,
    pub name: String,
    pub mac: MacAddr,
    pub intfs: Vec<String>,
    /// 启动时绑定的控制器
    pub controllers: Vec<ControllerId>,
    pub started: bool,
}

impl Switch {
    /// 创建新交换机
    pub fn new(id: NodeId, name: impl Into<String>, mac: MacAddr) -> Self {
        Self {
            id,
            name: name.into(),
            mac,
            intfs: Vec::new(),
            controllers: Vec::new(),
            started: false,
        }
    }
}

/// 外部远程控制器（只记录地址，进程本身不由本 crate 管理）
#[derive(Debug, Clone, Serialize)]
pub struct Controller {
    pub id: ControllerId,
    pub name: String,
    pub addr: SocketAddr,
}
