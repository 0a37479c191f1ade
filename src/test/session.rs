use super::{RecordingRunner, SINGLE_ROUTER, TWO_ROUTERS, parse};
use crate::Error;
use crate::net::{Emulator, LinuxEmulator, Network};
use crate::session::{CONTROLLER_NAME, Session, attach_controller, configure_default_routes};
use crate::topo::build_topology;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

fn controller() -> SocketAddr {
    "127.0.0.1:6633".parse().unwrap()
}

#[test]
fn every_switch_gets_exactly_the_configured_controller() {
    let spec = parse(TWO_ROUTERS);
    let mut net = Network::new();
    let topo = build_topology(&spec, &mut net).unwrap();
    let c0 = attach_controller(&mut net, &topo, controller()).expect("attach controller");

    assert_eq!(net.controllers().len(), 1);
    let ctrl = net.controller(c0).unwrap();
    assert_eq!(ctrl.name, CONTROLLER_NAME);
    assert_eq!(ctrl.addr, controller());
    for sw in net.switches() {
        assert!(sw.started, "{} not started", sw.name);
        assert_eq!(sw.controllers, vec![c0]);
    }
}

#[test]
fn default_routes_point_at_owning_router() {
    let spec = parse(TWO_ROUTERS);
    let mut net = Network::new();
    let topo = build_topology(&spec, &mut net).unwrap();
    configure_default_routes(&mut net, &topo).expect("configure routes");

    for router in &spec.routers {
        let gateway = router.ip.split('/').next().unwrap();
        for id in topo.hosts_of(&router.ip) {
            let host = net.host(*id).unwrap();
            assert_eq!(
                host.default_gateway.map(|g| g.to_string()).as_deref(),
                Some(gateway),
                "host {}",
                host.name
            );
        }
    }
}

#[test]
fn setup_runs_all_phases_and_stop_is_idempotent() {
    let spec = parse(SINGLE_ROUTER);
    let mut session = Session::new(Network::new());
    let topo = session.setup(&spec, controller()).expect("setup");
    assert_eq!(topo.routers.len(), 1);

    let net = session.emulator().network();
    assert!(net.is_built());
    assert!(net.switches().all(|s| s.started));
    assert!(net.hosts().all(|h| h.default_gateway.is_some()));

    session.stop().expect("stop");
    session.stop().expect("second stop is a no-op");
    assert!(session.emulator().network().is_stopped());
}

#[test]
fn interrupt_aborts_before_next_phase() {
    let spec = parse(SINGLE_ROUTER);
    let flag = Arc::new(AtomicBool::new(true));
    let mut session = Session::with_interrupt(Network::new(), flag);
    let err = session.setup(&spec, controller()).expect_err("interrupted");
    assert!(matches!(err, Error::Interrupted), "got {err:?}");
    assert!(session.emulator().network().nodes().is_empty());
}

#[test]
fn dropping_session_after_failure_tears_down() {
    let runner = RecordingRunner::failing_on("route add default");
    let log = runner.log.clone();
    {
        let spec = parse(SINGLE_ROUTER);
        let mut session = Session::new(LinuxEmulator::with_runner(runner));
        let err = session.setup(&spec, controller()).expect_err("route failure");
        assert!(matches!(err, Error::Backend(_)), "got {err:?}");
    }
    let lines = log.borrow();
    assert!(lines.iter().any(|l| l == "ovs-vsctl --if-exists del-br s1"));
    assert!(lines.iter().any(|l| l == "ip netns delete h1"));
}

#[test]
fn interact_returns_on_exit_command() {
    let spec = parse(SINGLE_ROUTER);
    let mut session = Session::new(Network::new());
    session.setup(&spec, controller()).unwrap();

    let mut out = Vec::new();
    session
        .interact(Cursor::new(b"nodes\nexit\n".to_vec()), &mut out)
        .expect("console");
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("c0 h1 s1"), "output: {out}");
}
