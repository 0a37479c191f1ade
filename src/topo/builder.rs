//! 由网络描述构建拓扑

use std::collections::HashMap;
use std::net::IpAddr;

use crate::error::{Error, Result};
use crate::net::{Cidr, Emulator, LinkId, MacAddr, NodeId};
use crate::spec::{NetworkSpec, switch_name};
use tracing::{debug, info};

/// 已创建的路由器（交换机）
#[derive(Debug, Clone)]
pub struct RouterNode {
    /// 从 1 开始的序号，决定交换机名和 MAC
    pub num: u64,
    /// 描述中的原始 `ip` 字段，即查找表的键
    pub ip: String,
    pub cidr: Cidr,
    pub mac: MacAddr,
    pub switch: NodeId,
}

impl RouterNode {
    /// 主机默认路由指向的网关
    pub fn gateway(&self) -> IpAddr {
        self.cidr.addr
    }
}

/// 构建结果：路由器及两张查找表，在各阶段之间显式传递
#[derive(Debug, Clone, Default)]
pub struct Topology {
    /// 按声明顺序排列
    pub routers: Vec<RouterNode>,
    ip2router: HashMap<String, NodeId>,
    ip2hosts: HashMap<String, Vec<NodeId>>,
    /// 路由器之间的链路，按声明顺序
    pub router_links: Vec<LinkId>,
}

impl Topology {
    /// 路由器 IP 对应的交换机
    pub fn router(&self, ip: &str) -> Option<NodeId> {
        self.ip2router.get(ip).copied()
    }

    /// 路由器 IP 下挂的主机，按声明顺序
    pub fn hosts_of(&self, ip: &str) -> &[NodeId] {
        self.ip2hosts.get(ip).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn switches(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.routers.iter().map(|r| r.switch)
    }

    /// (主机, 网关) 对，按路由器再按主机的声明顺序
    pub fn host_gateways(&self) -> impl Iterator<Item = (NodeId, IpAddr)> + '_ {
        self.routers.iter().flat_map(move |r| {
            self.hosts_of(&r.ip)
                .iter()
                .map(move |h| (*h, r.gateway()))
        })
    }

    pub fn host_count(&self) -> usize {
        self.ip2hosts.values().map(Vec::len).sum()
    }

    fn lookup(&self, ip: &str) -> Result<NodeId> {
        self.router(ip).ok_or_else(|| Error::UnknownRouter { ip: ip.to_string() })
    }
}

/// 校验描述后依次创建交换机、主机、主机链路和路由器间链路，最后调用 `build()`。
#[tracing::instrument(skip_all, fields(routers = spec.routers.len(), links = spec.links.len()))]
pub fn build_topology<E: Emulator + ?Sized>(spec: &NetworkSpec, emu: &mut E) -> Result<Topology> {
    spec.validate()?;

    let mut topo = Topology::default();

    for (i, r) in spec.routers.iter().enumerate() {
        let num = i as u64 + 1;
        let cidr = r.cidr().map_err(|source| Error::InvalidRouterIp {
            ip: r.ip.clone(),
            source,
        })?;
        let mac = MacAddr::from_index(num).ok_or(Error::TooManyRouters {
            count: spec.routers.len(),
            max: MacAddr::MAX_INDEX,
        })?;

        let switch = emu.add_switch(&switch_name(num), mac)?;
        debug!(num, ip = %r.ip, %mac, "路由器已创建");
        topo.ip2router.insert(r.ip.clone(), switch);
        topo.ip2hosts.insert(r.ip.clone(), Vec::new());

        for h in &r.hosts {
            let ip = format!("{}/{}", h.ip, cidr.prefix);
            let host = emu.add_host(&h.name, &ip, &h.mac)?;
            emu.add_link(switch, host)?;
            topo.ip2hosts.entry(r.ip.clone()).or_default().push(host);
        }

        topo.routers.push(RouterNode {
            num,
            ip: r.ip.clone(),
            cidr,
            mac,
            switch,
        });
    }

    for (r1, r2) in &spec.links {
        info!("linking {r1}, {r2}");
        let a = topo.lookup(r1)?;
        let b = topo.lookup(r2)?;
        topo.router_links.push(emu.add_link(a, b)?);
    }

    emu.build()?;
    info!(
        switches = topo.routers.len(),
        hosts = topo.host_count(),
        router_links = topo.router_links.len(),
        "拓扑构建完成"
    );
    Ok(topo)
}
