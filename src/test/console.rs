use super::{RecordingRunner, SINGLE_ROUTER, TWO_ROUTERS, parse};
use crate::net::{Emulator, LinuxEmulator, Network};
use crate::session::{Console, attach_controller, configure_default_routes};
use crate::topo::build_topology;
use std::io::Cursor;
use std::sync::atomic::AtomicBool;

fn ready<E: Emulator>(raw: &str, mut emu: E) -> E {
    let topo = build_topology(&parse(raw), &mut emu).unwrap();
    attach_controller(&mut emu, &topo, "127.0.0.1:6633".parse().unwrap()).unwrap();
    configure_default_routes(&mut emu, &topo).unwrap();
    emu
}

fn run_console<E: Emulator>(emu: &mut E, input: &str) -> String {
    let flag = AtomicBool::new(false);
    let mut out = Vec::new();
    Console::new(emu, &flag)
        .run(Cursor::new(input.as_bytes().to_vec()), &mut out)
        .expect("console run");
    String::from_utf8(out).expect("utf8 output")
}

#[test]
fn nodes_net_and_links_describe_topology() {
    let mut net = ready(SINGLE_ROUTER, Network::new());
    let out = run_console(&mut net, "nodes\nnet\nlinks\nexit\n");

    assert!(out.contains("available nodes are: \nc0 h1 s1\n"), "output: {out}");
    assert!(out.contains("h1 h1-eth0:s1-eth1\n"), "output: {out}");
    assert!(out.contains("s1 lo:  s1-eth1:h1-eth0\n"), "output: {out}");
    assert!(out.contains("\nc0\n"), "output: {out}");
    assert!(out.contains("s1-eth1<->h1-eth0\n"), "output: {out}");
}

#[test]
fn dump_shows_addresses_gateways_and_controller() {
    let mut net = ready(SINGLE_ROUTER, Network::new());
    let out = run_console(&mut net, "dump\n");

    assert!(
        out.contains("<Host h1: h1-eth0:10.0.0.2/24 mac=00:00:00:00:00:01 gw=10.0.0.1>"),
        "output: {out}"
    );
    assert!(
        out.contains("<Switch s1: lo s1-eth1 mac=00:00:00:00:00:01 controllers=c0>"),
        "output: {out}"
    );
    assert!(out.contains("<RemoteController c0: 127.0.0.1:6633>"), "output: {out}");
}

#[test]
fn node_command_substitutes_host_names() {
    let runner = RecordingRunner::default();
    let mut emu = ready(TWO_ROUTERS, LinuxEmulator::with_runner(runner.clone()));
    let out = run_console(&mut emu, "h1 ping -c1 h3\nquit\n");

    assert_eq!(
        runner.lines().last().map(String::as_str),
        Some("ip netns exec h1 ping -c1 10.0.2.2")
    );
    assert!(out.contains("ran: ip netns exec h1 ping -c1 10.0.2.2"), "output: {out}");
}

#[test]
fn pingall_reports_matrix_and_loss() {
    let runner = RecordingRunner::failing_on("ping -c1 -W1 10.0.2.2");
    let mut emu = ready(TWO_ROUTERS, LinuxEmulator::with_runner(runner));
    let out = run_console(&mut emu, "pingall\n");

    assert!(out.contains("h1 -> h2 X\n"), "output: {out}");
    assert!(out.contains("h2 -> h1 X\n"), "output: {out}");
    assert!(out.contains("h3 -> h1 h2\n"), "output: {out}");
    assert!(out.contains("*** Results: 33% dropped (4/6 received)"), "output: {out}");
}

#[test]
fn dry_run_commands_report_error_and_keep_console_alive() {
    let mut net = ready(SINGLE_ROUTER, Network::new());
    let out = run_console(&mut net, "h1 ip addr\npingall\nnodes\n");

    assert!(out.contains("*** Error: command execution is not available"), "output: {out}");
    assert!(out.contains("available nodes are:"), "output: {out}");
}

#[test]
fn unknown_and_incomplete_commands_are_reported() {
    let mut net = ready(SINGLE_ROUTER, Network::new());
    let out = run_console(&mut net, "\nfrobnicate now\nh1\nhelp\n");

    assert!(out.contains("*** Unknown command: frobnicate now"), "output: {out}");
    assert!(out.contains("*** Enter a command for node: h1 <cmd>"), "output: {out}");
    assert!(out.contains("Documented commands:"), "output: {out}");
}

#[test]
fn interrupt_flag_leaves_console() {
    let mut net = ready(SINGLE_ROUTER, Network::new());
    let flag = AtomicBool::new(true);
    let mut out = Vec::new();
    Console::new(&mut net, &flag)
        .run(Cursor::new(b"nodes\n".to_vec()), &mut out)
        .expect("console run");
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Interrupt"), "output: {out}");
    assert!(!out.contains("available nodes"), "output: {out}");
}
