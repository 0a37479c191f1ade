//! 由 JSON 描述构建 SDN 拓扑
//!
//! 创建交换机/主机/链路，连接远程控制器，配置默认路由，然后进入交互控制台。

use clap::Parser;
use sdnet_rs::net::{Emulator, LinuxEmulator, Network};
use sdnet_rs::session::Session;
use sdnet_rs::spec::load_spec;
use std::error::Error as _;
use std::fs;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "make-network",
    about = "Build a switch/host topology from a JSON file and attach it to a remote SDN controller"
)]
struct Args {
    /// Path to JSON file containing network information
    #[arg(long)]
    filename: PathBuf,

    /// IP address where the controller is running
    #[arg(
        long = "controller_ip",
        alias = "controller-ip",
        default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST)
    )]
    controller_ip: IpAddr,

    /// Port that the controller is listening on
    #[arg(long = "controller_port", alias = "controller-port", default_value_t = 6633)]
    controller_port: u16,

    /// Record the topology in memory only, without touching the system
    #[arg(long)]
    dry_run: bool,

    /// Tear the network down right after setup instead of opening the console
    #[arg(long)]
    no_console: bool,

    /// Write the resulting nodes/links/controllers as JSON
    #[arg(long)]
    dump_json: Option<PathBuf>,
}

fn run<E: Emulator>(args: &Args, emu: E, interrupted: Arc<AtomicBool>) -> sdnet_rs::Result<()> {
    let spec = load_spec(&args.filename)?;
    let controller = SocketAddr::new(args.controller_ip, args.controller_port);

    let mut session = Session::with_interrupt(emu, interrupted);
    session.setup(&spec, controller)?;

    if let Some(path) = &args.dump_json {
        let json = serde_json::to_string_pretty(session.emulator().network())
            .map_err(io::Error::other)?;
        fs::write(path, json)?;
        eprintln!("wrote topology to {}", path.display());
    }

    if !args.no_console {
        session.interact(io::BufReader::new(io::stdin()), &mut io::stdout())?;
    }
    session.stop()
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "无法安装 SIGINT 处理函数");
    }

    let result = if args.dry_run {
        info!("dry-run：只记录拓扑，不执行系统命令");
        run(&args, Network::new(), interrupted)
    } else {
        run(&args, LinuxEmulator::new(), interrupted)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let mut msg = format!("error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                msg.push_str(&format!(": {cause}"));
                source = cause.source();
            }
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}
