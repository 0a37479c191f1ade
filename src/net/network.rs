//! 网络拓扑清单
//!
//! 记录节点、链路、控制器及其绑定关系。`Network` 本身也实现了 `Emulator`，
//! 作为不产生任何系统副作用的 dry-run 后端使用。

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use super::addr::{Cidr, MacAddr};
use super::command::CmdOutput;
use super::emulator::Emulator;
use super::error::BackendError;
use super::id::{ControllerId, LinkId, NodeId};
use super::link::{Endpoint, Link};
use super::node::{Controller, Host, Node, Switch};
use serde::Serialize;
use tracing::{debug, info};

/// 网络拓扑
#[derive(Debug, Default, Serialize)]
pub struct Network {
    nodes: Vec<Node>,
    links: Vec<Link>,
    controllers: Vec<Controller>,
    #[serde(skip)]
    names: HashMap<String, NodeId>,
    built: bool,
    stopped: bool,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_name(&mut self, name: &str) -> Result<NodeId, BackendError> {
        if self.names.contains_key(name) || self.controllers.iter().any(|c| c.name == name) {
            return Err(BackendError::DuplicateNode(name.to_string()));
        }
        let id = NodeId(self.nodes.len());
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// 添加交换机节点
    pub fn add_switch(&mut self, name: &str, mac: MacAddr) -> Result<NodeId, BackendError> {
        let id = self.claim_name(name)?;
        self.nodes.push(Node::Switch(Switch::new(id, name, mac)));
        debug!(name, %mac, ?id, "添加交换机");
        Ok(id)
    }

    /// 添加主机节点，地址和 MAC 在此解析
    pub fn add_host(&mut self, name: &str, ip: &str, mac: &str) -> Result<NodeId, BackendError> {
        let ip: Cidr = ip.parse()?;
        let mac: MacAddr = mac.parse()?;
        let id = self.claim_name(name)?;
        self.nodes.push(Node::Host(Host::new(id, name, ip, mac)));
        debug!(name, %ip, %mac, ?id, "添加主机");
        Ok(id)
    }

    /// 注册远程控制器
    pub fn add_controller(
        &mut self,
        name: &str,
        addr: SocketAddr,
    ) -> Result<ControllerId, BackendError> {
        if self.names.contains_key(name) || self.controllers.iter().any(|c| c.name == name) {
            return Err(BackendError::DuplicateNode(name.to_string()));
        }
        let id = ControllerId(self.controllers.len());
        self.controllers.push(Controller {
            id,
            name: name.to_string(),
            addr,
        });
        debug!(name, %addr, ?id, "添加控制器");
        Ok(id)
    }

    /// 连接两个节点，两端各分配一个新接口
    pub fn add_link(&mut self, a: NodeId, b: NodeId) -> Result<LinkId, BackendError> {
        // 先确认对端存在，失败时不留下半条链路
        self.node(b)?;
        let intf_a = self.node(a)?.next_intf_name();
        self.node_mut(a)?.intfs_mut().push(intf_a.clone());
        let intf_b = self.node(b)?.next_intf_name();
        self.node_mut(b)?.intfs_mut().push(intf_b.clone());

        let id = LinkId(self.links.len());
        debug!(?id, a = %intf_a, b = %intf_b, "添加链路");
        self.links.push(Link::new(
            id,
            Endpoint {
                node: a,
                intf: intf_a,
            },
            Endpoint {
                node: b,
                intf: intf_b,
            },
        ));
        Ok(id)
    }

    /// 撤销最近添加的节点（后端创建失败时使用）
    pub(crate) fn forget_last_node(&mut self, id: NodeId) {
        if id.0 + 1 != self.nodes.len() {
            return;
        }
        if let Some(node) = self.nodes.pop() {
            self.names.remove(node.name());
        }
    }

    /// 撤销最近添加的链路及其两端接口
    pub(crate) fn forget_last_link(&mut self, id: LinkId) {
        if id.0 + 1 != self.links.len() {
            return;
        }
        if let Some(link) = self.links.pop() {
            for end in [&link.b, &link.a] {
                if let Some(node) = self.nodes.get_mut(end.node.0) {
                    let intfs = node.intfs_mut();
                    if intfs.last() == Some(&end.intf) {
                        intfs.pop();
                    }
                }
            }
        }
    }

    pub(crate) fn mark_built(&mut self) {
        self.built = true;
    }

    pub(crate) fn mark_stopped(&mut self) -> bool {
        std::mem::replace(&mut self.stopped, true)
    }

    /// 记录交换机已启动并绑定控制器
    pub fn bind_controllers(
        &mut self,
        switch: NodeId,
        controllers: &[ControllerId],
    ) -> Result<(), BackendError> {
        for c in controllers {
            self.controller(*c)?;
        }
        match self.node_mut(switch)? {
            Node::Switch(s) => {
                s.controllers = controllers.to_vec();
                s.started = true;
                Ok(())
            }
            Node::Host(h) => Err(BackendError::NotASwitch(h.name.clone())),
        }
    }

    /// 记录主机默认网关
    pub fn set_default_gateway(
        &mut self,
        host: NodeId,
        gateway: IpAddr,
    ) -> Result<(), BackendError> {
        match self.node_mut(host)? {
            Node::Host(h) => {
                h.default_gateway = Some(gateway);
                Ok(())
            }
            Node::Switch(s) => Err(BackendError::NotAHost(s.name.clone())),
        }
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, BackendError> {
        self.nodes.get(id.0).ok_or(BackendError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, BackendError> {
        self.nodes.get_mut(id.0).ok_or(BackendError::UnknownNode(id))
    }

    pub fn host(&self, id: NodeId) -> Result<&Host, BackendError> {
        let node = self.node(id)?;
        node.as_host()
            .ok_or_else(|| BackendError::NotAHost(node.name().to_string()))
    }

    pub fn switch(&self, id: NodeId) -> Result<&Switch, BackendError> {
        let node = self.node(id)?;
        node.as_switch()
            .ok_or_else(|| BackendError::NotASwitch(node.name().to_string()))
    }

    pub fn controller(&self, id: ControllerId) -> Result<&Controller, BackendError> {
        self.controllers
            .get(id.0)
            .ok_or(BackendError::UnknownController(id))
    }

    /// 按名称查找节点
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.names.get(name).and_then(|id| self.nodes.get(id.0))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.nodes.iter().filter_map(Node::as_host)
    }

    pub fn switches(&self) -> impl Iterator<Item = &Switch> {
        self.nodes.iter().filter_map(Node::as_switch)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    /// 两节点之间的链路数
    pub fn links_between(&self, a: NodeId, b: NodeId) -> usize {
        self.links.iter().filter(|l| l.connects(a, b)).count()
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Emulator for Network {
    fn network(&self) -> &Network {
        self
    }

    fn add_controller(
        &mut self,
        name: &str,
        addr: SocketAddr,
    ) -> Result<ControllerId, BackendError> {
        Network::add_controller(self, name, addr)
    }

    fn add_switch(&mut self, name: &str, mac: MacAddr) -> Result<NodeId, BackendError> {
        Network::add_switch(self, name, mac)
    }

    fn add_host(&mut self, name: &str, ip: &str, mac: &str) -> Result<NodeId, BackendError> {
        Network::add_host(self, name, ip, mac)
    }

    fn add_link(&mut self, a: NodeId, b: NodeId) -> Result<LinkId, BackendError> {
        Network::add_link(self, a, b)
    }

    fn build(&mut self) -> Result<(), BackendError> {
        self.mark_built();
        info!(
            nodes = self.nodes.len(),
            links = self.links.len(),
            "dry-run 网络构建完成"
        );
        Ok(())
    }

    fn start_switch(
        &mut self,
        switch: NodeId,
        controllers: &[ControllerId],
    ) -> Result<(), BackendError> {
        self.bind_controllers(switch, controllers)
    }

    fn set_default_route(&mut self, host: NodeId, gateway: IpAddr) -> Result<(), BackendError> {
        self.set_default_gateway(host, gateway)
    }

    fn run_cmd(&mut self, _node: NodeId, _argv: &[String]) -> Result<CmdOutput, BackendError> {
        Err(BackendError::Unsupported(
            "command execution is not available in dry-run mode",
        ))
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        if !self.mark_stopped() {
            info!("dry-run 网络已停止");
        }
        Ok(())
    }
}
