//! 网络描述数据结构
//!
//! 路由器、主机与路由器间链路的 JSON 形式，以及地址相关的辅助方法。

use crate::net::{AddrError, Cidr};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// 路由器之间的一条链路，两端用路由器的 `ip` 字段引用
pub type LinkSpec = (String, String);

/// 顶层网络描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub routers: Vec<RouterSpec>,
    pub links: Vec<LinkSpec>,
}

/// 一个路由器（交换机）及其下挂的主机
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterSpec {
    /// CIDR 形式，例如 `10.0.0.1/24`
    pub ip: String,
    pub hosts: Vec<HostSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSpec {
    pub name: String,
    /// 不带前缀长度的地址，前缀取自所属路由器
    pub ip: String,
    pub mac: String,
}

impl NetworkSpec {
    /// 主机总数
    pub fn host_count(&self) -> usize {
        self.routers.iter().map(|r| r.hosts.len()).sum()
    }
}

impl RouterSpec {
    pub fn cidr(&self) -> Result<Cidr, AddrError> {
        self.ip.parse()
    }

    /// 主机默认路由使用的网关：去掉前缀后的路由器地址
    pub fn gateway(&self) -> Result<IpAddr, AddrError> {
        Ok(self.cidr()?.addr)
    }

    /// 主机的完整地址：`<host.ip>/<路由器前缀长度>`
    pub fn host_address(&self, host: &HostSpec) -> Result<String, AddrError> {
        let prefix = self.cidr()?.prefix;
        Ok(format!("{}/{}", host.ip, prefix))
    }
}
