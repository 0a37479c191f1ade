//! 外部命令执行
//!
//! Linux 后端通过 `CommandRunner` 调用 `ip` / `ovs-vsctl`，测试里可替换为记录器。

use super::error::BackendError;
use std::process::Command;
use tracing::trace;

/// 命令执行结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdOutput {
    /// 退出码；被信号终止时为 None
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// 把非零退出转换为 `BackendError::Command`
    pub fn check(self, program: &str, args: &[String]) -> Result<CmdOutput, BackendError> {
        if self.success() {
            return Ok(self);
        }
        Err(BackendError::Command {
            program: program.to_string(),
            args: args.to_vec(),
            status: self
                .status
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string()),
            stderr: self.stderr.trim().to_string(),
        })
    }
}

/// 执行外部程序的接口
pub trait CommandRunner {
    /// 运行程序并返回其输出；只有无法启动时才返回错误，非零退出由调用方判断。
    fn run(&mut self, program: &str, args: &[String]) -> Result<CmdOutput, BackendError>;
}

/// 直接在当前系统上执行命令
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[String]) -> Result<CmdOutput, BackendError> {
        trace!(program, args = ?args, "执行命令");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| BackendError::Spawn {
                program: program.to_string(),
                source,
            })?;
        Ok(CmdOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
