//! 运行会话
//!
//! 按顺序完成 构建 → 绑定控制器 → 配置路由 → 交互控制台，
//! 并保证在任何退出路径上拆除网络。

mod console;
mod setup;

pub use console::Console;
pub use setup::{attach_controller, configure_default_routes};

use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};
use crate::net::Emulator;
use crate::spec::NetworkSpec;
use crate::topo::{Topology, build_topology};
use tracing::{info, warn};

/// 远程控制器在网络中的名称
pub const CONTROLLER_NAME: &str = "c0";

/// 持有仿真后端的会话；drop 时若尚未停止则自动拆除网络。
pub struct Session<E: Emulator> {
    emu: E,
    interrupted: Arc<AtomicBool>,
    stopped: bool,
}

impl<E: Emulator> Session<E> {
    pub fn new(emu: E) -> Self {
        Self::with_interrupt(emu, Arc::new(AtomicBool::new(false)))
    }

    /// `interrupted` 通常由 SIGINT 处理函数置位
    pub fn with_interrupt(emu: E, interrupted: Arc<AtomicBool>) -> Self {
        Self {
            emu,
            interrupted,
            stopped: false,
        }
    }

    pub fn emulator(&self) -> &E {
        &self.emu
    }

    pub fn emulator_mut(&mut self) -> &mut E {
        &mut self.emu
    }

    fn check_interrupt(&self) -> Result<()> {
        if self.interrupted.load(Ordering::SeqCst) {
            return Err(Error::Interrupted);
        }
        Ok(())
    }

    pub fn build(&mut self, spec: &NetworkSpec) -> Result<Topology> {
        self.check_interrupt()?;
        build_topology(spec, &mut self.emu)
    }

    pub fn attach_controller(&mut self, topo: &Topology, addr: SocketAddr) -> Result<()> {
        self.check_interrupt()?;
        attach_controller(&mut self.emu, topo, addr)?;
        Ok(())
    }

    pub fn configure_routes(&mut self, topo: &Topology) -> Result<()> {
        self.check_interrupt()?;
        configure_default_routes(&mut self.emu, topo)
    }

    /// 构建拓扑、绑定控制器并配置默认路由
    pub fn setup(&mut self, spec: &NetworkSpec, controller: SocketAddr) -> Result<Topology> {
        let topo = self.build(spec)?;
        self.attach_controller(&topo, controller)?;
        self.configure_routes(&topo)?;
        Ok(topo)
    }

    /// 阻塞运行交互控制台，直到操作者退出、输入结束或收到中断
    pub fn interact<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: BufRead + Send + 'static,
        W: Write,
    {
        self.check_interrupt()?;
        Console::new(&mut self.emu, &self.interrupted).run(input, out)?;
        Ok(())
    }

    /// 拆除网络；可重复调用
    pub fn stop(&mut self) -> Result<()> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;
        self.emu.stop()?;
        info!("网络已拆除");
        Ok(())
    }
}

impl<E: Emulator> Drop for Session<E> {
    fn drop(&mut self) {
        if !self.stopped {
            if let Err(e) = self.stop() {
                warn!(error = %e, "拆除网络失败");
            }
        }
    }
}
