//! 交互控制台
//!
//! 类似 Mininet CLI 的命令行：查看节点/链路，或在某个节点上执行命令。
//! 输入在单独的线程上读取，主循环轮询中断标志。

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::net::{Emulator, Network, Node, NodeId};
use tracing::debug;

const PROMPT: &str = "sdnet> ";
const POLL_INTERVAL: Duration = Duration::from_millis(100);

const HELP: &str = "\
Documented commands:
  help | ?            show this message
  nodes               list all nodes
  net                 list nodes with their links
  links               list all links
  dump                show node details
  pingall             ping between every pair of hosts
  <node> <cmd> ...    run a command on a node (host names are replaced by their IP)
  exit | quit         leave the console and tear the network down
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Console<'a, E: Emulator + ?Sized> {
    emu: &'a mut E,
    interrupted: &'a AtomicBool,
}

impl<'a, E: Emulator + ?Sized> Console<'a, E> {
    pub fn new(emu: &'a mut E, interrupted: &'a AtomicBool) -> Self {
        Self { emu, interrupted }
    }

    /// 运行到 `exit`/`quit`、输入结束或中断标志被置位
    pub fn run<R, W>(&mut self, input: R, out: &mut W) -> io::Result<()>
    where
        R: BufRead + Send + 'static,
        W: Write,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in input.lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let line = loop {
                if self.interrupted.load(Ordering::SeqCst) {
                    writeln!(out, "\nInterrupt")?;
                    return Ok(());
                }
                match rx.recv_timeout(POLL_INTERVAL) {
                    Ok(line) => break Some(line?),
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break None,
                }
            };
            let Some(line) = line else {
                writeln!(out)?;
                return Ok(());
            };

            if self.execute(line.trim(), out)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&first, rest)) = words.split_first() else {
            return Ok(Flow::Continue);
        };
        debug!(command = line, "控制台命令");

        match first {
            "exit" | "quit" => return Ok(Flow::Exit),
            "help" | "?" => write!(out, "{HELP}")?,
            "nodes" => self.nodes(out)?,
            "net" => self.net(out)?,
            "links" => self.links(out)?,
            "dump" => self.dump(out)?,
            "pingall" => self.pingall(out)?,
            name => match self.emu.network().node_by_name(name).map(Node::id) {
                Some(_) if rest.is_empty() => {
                    writeln!(out, "*** Enter a command for node: {name} <cmd>")?
                }
                Some(node) => self.node_cmd(node, rest, out)?,
                None => writeln!(out, "*** Unknown command: {line}")?,
            },
        }
        Ok(Flow::Continue)
    }

    fn nodes<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let net = self.emu.network();
        let mut names: Vec<&str> = net
            .controllers()
            .iter()
            .map(|c| c.name.as_str())
            .chain(net.nodes().iter().map(Node::name))
            .collect();
        names.sort_unstable();
        writeln!(out, "available nodes are: \n{}", names.join(" "))
    }

    fn net<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let net = self.emu.network();
        let hosts = net.nodes().iter().filter(|n| n.as_host().is_some());
        let switches = net.nodes().iter().filter(|n| n.as_switch().is_some());
        for node in hosts.chain(switches) {
            let mut line = node.name().to_string();
            if node.as_switch().is_some() {
                line.push_str(" lo: ");
            }
            for intf in node.intfs() {
                line.push(' ');
                line.push_str(intf);
                line.push(':');
                if let Some(peer) = peer_intf(net, node.id(), intf) {
                    line.push_str(peer);
                }
            }
            writeln!(out, "{line}")?;
        }
        for c in net.controllers() {
            writeln!(out, "{}", c.name)?;
        }
        Ok(())
    }

    fn links<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for link in self.emu.network().links() {
            writeln!(out, "{}<->{}", link.a.intf, link.b.intf)?;
        }
        Ok(())
    }

    fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let net = self.emu.network();
        for h in net.hosts() {
            let intf = h.default_intf().unwrap_or("-");
            let gw = h
                .default_gateway
                .map(|g| g.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                out,
                "<Host {}: {}:{} mac={} gw={}>",
                h.name, intf, h.ip, h.mac, gw
            )?;
        }
        for s in net.switches() {
            let controllers: Vec<&str> = s
                .controllers
                .iter()
                .filter_map(|c| net.controller(*c).ok())
                .map(|c| c.name.as_str())
                .collect();
            writeln!(
                out,
                "<Switch {}: lo {} mac={} controllers={}>",
                s.name,
                s.intfs.join(" "),
                s.mac,
                controllers.join(",")
            )?;
        }
        for c in net.controllers() {
            writeln!(out, "<RemoteController {}: {}>", c.name, c.addr)?;
        }
        Ok(())
    }

    fn pingall<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let hosts: Vec<(NodeId, String, String)> = self
            .emu
            .network()
            .hosts()
            .map(|h| (h.id, h.name.clone(), h.ip.addr.to_string()))
            .collect();

        writeln!(out, "*** Ping: testing ping reachability")?;
        let (mut sent, mut received) = (0usize, 0usize);
        for (src, src_name, _) in &hosts {
            let mut line = format!("{src_name} ->");
            for (dst, dst_name, dst_ip) in &hosts {
                if dst == src {
                    continue;
                }
                let cmd = ["ping", "-c1", "-W1", dst_ip.as_str()].map(String::from);
                let reached = match self.emu.run_cmd(*src, &cmd) {
                    Ok(output) => output.success(),
                    Err(e) => {
                        writeln!(out, "*** Error: {e}")?;
                        return Ok(());
                    }
                };
                sent += 1;
                if reached {
                    received += 1;
                    line.push(' ');
                    line.push_str(dst_name);
                } else {
                    line.push_str(" X");
                }
            }
            writeln!(out, "{line}")?;
        }
        let dropped = if sent == 0 {
            0
        } else {
            100 * (sent - received) / sent
        };
        writeln!(
            out,
            "*** Results: {dropped}% dropped ({received}/{sent} received)"
        )
    }

    fn node_cmd<W: Write>(&mut self, node: NodeId, args: &[&str], out: &mut W) -> io::Result<()> {
        let net = self.emu.network();
        // 参数中的主机名替换为其 IP
        let argv: Vec<String> = args
            .iter()
            .map(|arg| match net.node_by_name(arg).and_then(Node::as_host) {
                Some(h) => h.ip.addr.to_string(),
                None => arg.to_string(),
            })
            .collect();

        match self.emu.run_cmd(node, &argv) {
            Ok(output) => {
                write!(out, "{}", output.stdout)?;
                write!(out, "{}", output.stderr)?;
            }
            Err(e) => writeln!(out, "*** Error: {e}")?,
        }
        Ok(())
    }
}

/// 某节点接口对端的接口名
fn peer_intf<'n>(net: &'n Network, node: NodeId, intf: &str) -> Option<&'n str> {
    net.links().iter().find_map(|l| {
        if l.a.node == node && l.a.intf == intf {
            Some(l.b.intf.as_str())
        } else if l.b.node == node && l.b.intf == intf {
            Some(l.a.intf.as_str())
        } else {
            None
        }
    })
}
