//! 链路类型
//!
//! 定义两个节点之间的双向链路（veth 对）及其端点。

use super::id::{LinkId, NodeId};
use serde::Serialize;

/// 链路端点：节点与其一侧的接口名
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub node: NodeId,
    pub intf: String,
}

/// 网络链路
#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub id: LinkId,
    pub a: Endpoint,
    pub b: Endpoint,
}

impl Link {
    /// 创建新链路
    pub fn new(id: LinkId, a: Endpoint, b: Endpoint) -> Self {
        Self { id, a, b }
    }

    /// 链路是否连接这两个节点（不区分方向）
    pub fn connects(&self, x: NodeId, y: NodeId) -> bool {
        (self.a.node == x && self.b.node == y) || (self.a.node == y && self.b.node == x)
    }

    /// 给定一端节点，返回对端端点
    pub fn peer_of(&self, node: NodeId) -> Option<&Endpoint> {
        if self.a.node == node {
            Some(&self.b)
        } else if self.b.node == node {
            Some(&self.a)
        } else {
            None
        }
    }
}
