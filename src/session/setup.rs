//! 控制器绑定与默认路由

use std::net::SocketAddr;

use super::CONTROLLER_NAME;
use crate::error::Result;
use crate::net::{ControllerId, Emulator};
use crate::topo::Topology;
use tracing::{debug, info};

/// 注册唯一的远程控制器，并让每台交换机绑定到它启动。
///
/// 交换机之间的启动顺序没有意义。
#[tracing::instrument(skip(emu, topo))]
pub fn attach_controller<E: Emulator + ?Sized>(
    emu: &mut E,
    topo: &Topology,
    addr: SocketAddr,
) -> Result<ControllerId> {
    let controller = emu.add_controller(CONTROLLER_NAME, addr)?;
    for switch in topo.switches() {
        emu.start_switch(switch, &[controller])?;
    }
    info!(switches = topo.routers.len(), "交换机已连接控制器");
    Ok(controller)
}

/// 为每台主机设置默认路由，网关为所属路由器地址（不含前缀）。
#[tracing::instrument(skip_all)]
pub fn configure_default_routes<E: Emulator + ?Sized>(emu: &mut E, topo: &Topology) -> Result<()> {
    let mut count = 0usize;
    for (host, gateway) in topo.host_gateways() {
        emu.set_default_route(host, gateway)?;
        debug!(?host, %gateway, "默认路由已设置");
        count += 1;
    }
    info!(hosts = count, "默认路由配置完成");
    Ok(())
}
