//! 仿真后端接口
//!
//! 拓扑构建、控制器绑定和路由配置只通过此 trait 与底层交互。

use super::addr::MacAddr;
use super::command::CmdOutput;
use super::error::BackendError;
use super::id::{ControllerId, LinkId, NodeId};
use super::network::Network;
use std::net::{IpAddr, SocketAddr};

/// 网络仿真后端
pub trait Emulator {
    /// 当前的节点/链路清单
    fn network(&self) -> &Network;

    /// 注册外部远程控制器
    fn add_controller(&mut self, name: &str, addr: SocketAddr)
    -> Result<ControllerId, BackendError>;

    /// 添加交换机节点
    fn add_switch(&mut self, name: &str, mac: MacAddr) -> Result<NodeId, BackendError>;

    /// 添加主机节点；`ip` 为 CIDR 形式，`mac` 为冒号分隔的十六进制
    fn add_host(&mut self, name: &str, ip: &str, mac: &str) -> Result<NodeId, BackendError>;

    /// 连接两个节点（双向链路）
    fn add_link(&mut self, a: NodeId, b: NodeId) -> Result<LinkId, BackendError>;

    /// 所有节点和链路添加完成后调用，为主机配置地址
    fn build(&mut self) -> Result<(), BackendError>;

    /// 启动交换机并绑定到给定控制器
    fn start_switch(
        &mut self,
        switch: NodeId,
        controllers: &[ControllerId],
    ) -> Result<(), BackendError>;

    /// 设置主机默认路由
    fn set_default_route(&mut self, host: NodeId, gateway: IpAddr) -> Result<(), BackendError>;

    /// 在节点上执行命令
    fn run_cmd(&mut self, node: NodeId, argv: &[String]) -> Result<CmdOutput, BackendError>;

    /// 拆除整个网络；重复调用无副作用
    fn stop(&mut self) -> Result<(), BackendError>;
}
