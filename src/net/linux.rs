//! Linux 仿真后端
//!
//! 主机用网络命名空间（`ip netns`）表示，交换机用 Open vSwitch 网桥表示，
//! 链路是一对 veth 接口。所有操作同时记录到内部的 `Network` 清单中。

use std::net::{IpAddr, SocketAddr};

use super::addr::MacAddr;
use super::command::{CmdOutput, CommandRunner, SystemRunner};
use super::emulator::Emulator;
use super::error::BackendError;
use super::id::{ControllerId, LinkId, NodeId};
use super::link::Endpoint;
use super::network::Network;
use super::node::Node;
use tracing::{debug, info, warn};

const IP: &str = "ip";
const OVS_VSCTL: &str = "ovs-vsctl";

fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}

/// 基于 iproute2 和 Open vSwitch 的后端
pub struct LinuxEmulator<R: CommandRunner = SystemRunner> {
    net: Network,
    runner: R,
}

impl LinuxEmulator<SystemRunner> {
    pub fn new() -> Self {
        Self::with_runner(SystemRunner)
    }
}

impl Default for LinuxEmulator<SystemRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> LinuxEmulator<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            net: Network::new(),
            runner,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// 执行命令，非零退出视为错误
    fn exec(&mut self, program: &str, args: Vec<String>) -> Result<CmdOutput, BackendError> {
        debug!(program, args = %args.join(" "), "执行");
        self.runner.run(program, &args)?.check(program, &args)
    }

    fn ip(&mut self, args: Vec<String>) -> Result<CmdOutput, BackendError> {
        self.exec(IP, args)
    }

    fn ovs(&mut self, args: Vec<String>) -> Result<CmdOutput, BackendError> {
        self.exec(OVS_VSCTL, args)
    }

    /// 把 veth 的一端放到所属节点上并拉起
    fn attach_endpoint(&mut self, end: &Endpoint) -> Result<(), BackendError> {
        let node = self.net.node(end.node)?;
        let name = node.name().to_string();
        let on_host = node.as_host().is_some();
        if on_host {
            self.ip(argv(["link", "set", end.intf.as_str(), "netns", name.as_str()]))?;
            self.ip(argv([
                "-n",
                name.as_str(),
                "link",
                "set",
                end.intf.as_str(),
                "up",
            ]))?;
        } else {
            self.ovs(argv(["add-port", name.as_str(), end.intf.as_str()]))?;
            self.ip(argv(["link", "set", end.intf.as_str(), "up"]))?;
        }
        Ok(())
    }

    /// 删除仍留在根命名空间中的 veth 对；删除任一端即删除整对
    fn discard_veth(&mut self, a: &Endpoint, b: &Endpoint) {
        for end in [a, b] {
            let args = argv(["link", "delete", end.intf.as_str()]);
            match self.exec(IP, args) {
                Ok(_) => return,
                Err(e) => debug!(intf = %end.intf, error = %e, "接口不在根命名空间"),
            }
        }
        warn!(a = %a.intf, b = %b.intf, "无法删除 veth 对");
    }
}

impl<R: CommandRunner> Emulator for LinuxEmulator<R> {
    fn network(&self) -> &Network {
        &self.net
    }

    fn add_controller(
        &mut self,
        name: &str,
        addr: SocketAddr,
    ) -> Result<ControllerId, BackendError> {
        self.net.add_controller(name, addr)
    }

    fn add_switch(&mut self, name: &str, mac: MacAddr) -> Result<NodeId, BackendError> {
        let id = self.net.add_switch(name, mac)?;
        let created = self.ovs(argv([
            "--may-exist".to_string(),
            "add-br".to_string(),
            name.to_string(),
            "--".to_string(),
            "set".to_string(),
            "bridge".to_string(),
            name.to_string(),
            format!("other-config:hwaddr=\"{mac}\""),
        ]));
        if let Err(e) = created {
            self.net.forget_last_node(id);
            return Err(e);
        }
        Ok(id)
    }

    fn add_host(&mut self, name: &str, ip: &str, mac: &str) -> Result<NodeId, BackendError> {
        let id = self.net.add_host(name, ip, mac)?;
        // 命名空间未创建成功（例如已被其他实例占用）时不能记录，否则拆除时会误删
        if let Err(e) = self.ip(argv(["netns", "add", name])) {
            self.net.forget_last_node(id);
            return Err(e);
        }
        self.ip(argv(["-n", name, "link", "set", "lo", "up"]))?;
        Ok(id)
    }

    fn add_link(&mut self, a: NodeId, b: NodeId) -> Result<LinkId, BackendError> {
        let id = self.net.add_link(a, b)?;
        let link = self.net.links()[id.0].clone();
        let created = self.ip(argv([
            "link",
            "add",
            link.a.intf.as_str(),
            "type",
            "veth",
            "peer",
            "name",
            link.b.intf.as_str(),
        ]));
        if let Err(e) = created {
            self.net.forget_last_link(id);
            return Err(e);
        }
        let attached = match self.attach_endpoint(&link.a) {
            Ok(()) => self.attach_endpoint(&link.b),
            Err(e) => Err(e),
        };
        if let Err(e) = attached {
            self.discard_veth(&link.a, &link.b);
            self.net.forget_last_link(id);
            return Err(e);
        }
        Ok(id)
    }

    fn build(&mut self) -> Result<(), BackendError> {
        let hosts: Vec<_> = self
            .net
            .hosts()
            .map(|h| {
                (
                    h.name.clone(),
                    h.default_intf().map(str::to_string),
                    h.ip,
                    h.mac,
                )
            })
            .collect();
        for (name, intf, ip, mac) in hosts {
            let Some(intf) = intf else {
                warn!(host = %name, "主机没有链路，跳过地址配置");
                continue;
            };
            self.ip(argv([
                "-n".to_string(),
                name.clone(),
                "link".to_string(),
                "set".to_string(),
                "dev".to_string(),
                intf.clone(),
                "address".to_string(),
                mac.to_string(),
            ]))?;
            self.ip(argv([
                "-n".to_string(),
                name.clone(),
                "addr".to_string(),
                "add".to_string(),
                ip.to_string(),
                "dev".to_string(),
                intf,
            ]))?;
        }
        self.net.mark_built();
        info!(
            hosts = self.net.hosts().count(),
            switches = self.net.switches().count(),
            links = self.net.links().len(),
            "网络构建完成"
        );
        Ok(())
    }

    fn start_switch(
        &mut self,
        switch: NodeId,
        controllers: &[ControllerId],
    ) -> Result<(), BackendError> {
        let name = self.net.switch(switch)?.name.clone();
        let mut targets = Vec::with_capacity(controllers.len());
        for c in controllers {
            targets.push(format!("tcp:{}", self.net.controller(*c)?.addr));
        }
        self.ovs(argv(["set-fail-mode", name.as_str(), "secure"]))?;
        let mut args = argv(["set-controller", name.as_str()]);
        args.extend(targets);
        self.ovs(args)?;
        self.ip(argv(["link", "set", name.as_str(), "up"]))?;
        self.net.bind_controllers(switch, controllers)
    }

    fn set_default_route(&mut self, host: NodeId, gateway: IpAddr) -> Result<(), BackendError> {
        let name = self.net.host(host)?.name.clone();
        self.ip(argv([
            "-n".to_string(),
            name,
            "route".to_string(),
            "add".to_string(),
            "default".to_string(),
            "via".to_string(),
            gateway.to_string(),
        ]))?;
        self.net.set_default_gateway(host, gateway)
    }

    fn run_cmd(&mut self, node: NodeId, cmd: &[String]) -> Result<CmdOutput, BackendError> {
        let Some((program, rest)) = cmd.split_first() else {
            return Ok(CmdOutput {
                status: Some(0),
                ..CmdOutput::default()
            });
        };
        match self.net.node(node)? {
            Node::Host(h) => {
                let mut args = argv(["netns", "exec", h.name.as_str()]);
                args.extend(cmd.iter().cloned());
                self.runner.run(IP, &args)
            }
            // 交换机位于根命名空间
            Node::Switch(_) => self.runner.run(program, rest),
        }
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        if self.net.mark_stopped() {
            return Ok(());
        }
        info!("拆除网络");

        let mut steps: Vec<(&'static str, Vec<String>)> = Vec::new();
        // 交换机之间的 veth 不会随命名空间一起删除
        for link in self.net.links() {
            let a = self.net.node(link.a.node)?;
            let b = self.net.node(link.b.node)?;
            if a.as_switch().is_some() && b.as_switch().is_some() {
                steps.push((IP, argv(["link", "delete", link.a.intf.as_str()])));
            }
        }
        for s in self.net.switches() {
            steps.push((OVS_VSCTL, argv(["--if-exists", "del-br", s.name.as_str()])));
        }
        for h in self.net.hosts() {
            steps.push((IP, argv(["netns", "delete", h.name.as_str()])));
        }

        let mut first_err = None;
        for (program, args) in steps {
            if let Err(e) = self.exec(program, args) {
                warn!(error = %e, "拆除步骤失败");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
