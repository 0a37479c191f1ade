use crate::net::{BackendError, CmdOutput, CommandRunner};
use crate::spec::NetworkSpec;
use std::cell::RefCell;
use std::rc::Rc;

mod addr;
mod console;
mod session;

/// 一个路由器、一台主机、没有链路
pub(crate) const SINGLE_ROUTER: &str = r#"
{
    "routers": [
        {
            "ip": "10.0.0.1/24",
            "hosts": [ { "name": "h1", "ip": "10.0.0.2", "mac": "00:00:00:00:00:01" } ]
        }
    ],
    "links": []
}
"#;

/// 两个路由器各带主机，之间一条链路
pub(crate) const TWO_ROUTERS: &str = r#"
{
    "routers": [
        {
            "ip": "10.0.1.1/24",
            "hosts": [
                { "name": "h1", "ip": "10.0.1.2", "mac": "00:00:00:00:01:02" },
                { "name": "h2", "ip": "10.0.1.3", "mac": "00:00:00:00:01:03" }
            ]
        },
        {
            "ip": "10.0.2.1/16",
            "hosts": [ { "name": "h3", "ip": "10.0.2.2", "mac": "00:00:00:00:02:02" } ]
        }
    ],
    "links": [ ["10.0.1.1/24", "10.0.2.1/16"] ]
}
"#;

pub(crate) fn parse(raw: &str) -> NetworkSpec {
    raw.parse().expect("parse network spec")
}

/// 记录所有命令行的 runner；命令行包含 `fail_on` 中任一子串时返回非零退出
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingRunner {
    pub log: Rc<RefCell<Vec<String>>>,
    pub fail_on: Vec<String>,
}

impl RecordingRunner {
    pub fn failing_on(pattern: &str) -> Self {
        Self {
            fail_on: vec![pattern.to_string()],
            ..Self::default()
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, program: &str, args: &[String]) -> Result<CmdOutput, BackendError> {
        let line = format!("{program} {}", args.join(" "));
        self.log.borrow_mut().push(line.clone());
        if self.fail_on.iter().any(|p| line.contains(p.as_str())) {
            return Ok(CmdOutput {
                status: Some(1),
                stdout: String::new(),
                stderr: "simulated failure\n".to_string(),
            });
        }
        Ok(CmdOutput {
            status: Some(0),
            stdout: format!("ran: {line}\n"),
            stderr: String::new(),
        })
    }
}
