use crate::net::{AddrError, Cidr, MacAddr};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};

#[test]
fn mac_from_index_packs_big_endian_low_six_bytes() {
    assert_eq!(MacAddr::from_index(1).unwrap().to_string(), "00:00:00:00:00:01");
    assert_eq!(MacAddr::from_index(255).unwrap().to_string(), "00:00:00:00:00:ff");
    assert_eq!(MacAddr::from_index(256).unwrap().to_string(), "00:00:00:00:01:00");
    assert_eq!(
        MacAddr::from_index(0x0102_0304_0506).unwrap().octets(),
        [1, 2, 3, 4, 5, 6]
    );
}

#[test]
fn mac_from_index_is_unique_and_deterministic() {
    let mut seen = HashSet::new();
    for num in 1..=5_000u64 {
        let mac = MacAddr::from_index(num).unwrap();
        assert_eq!(Some(mac), MacAddr::from_index(num));
        assert!(seen.insert(mac), "duplicate mac for {num}");
    }
}

#[test]
fn mac_from_index_rejects_values_beyond_48_bits() {
    assert!(MacAddr::from_index(MacAddr::MAX_INDEX).is_some());
    assert_eq!(
        MacAddr::from_index(MacAddr::MAX_INDEX).unwrap().to_string(),
        "ff:ff:ff:ff:ff:ff"
    );
    assert!(MacAddr::from_index(MacAddr::MAX_INDEX + 1).is_none());
}

#[test]
fn mac_parse_accepts_mixed_case_and_rejects_garbage() {
    let mac: MacAddr = "AA:bb:0C:d:00:01".parse().expect("parse mac");
    assert_eq!(mac.octets(), [0xaa, 0xbb, 0x0c, 0x0d, 0x00, 0x01]);
    assert_eq!(mac.to_string(), "aa:bb:0c:0d:00:01");

    for bad in ["", "00:00:00:00:00", "00:00:00:00:00:00:00", "00:00:00:00:00:zz", "000:00:00:00:00:01"] {
        assert_eq!(
            bad.parse::<MacAddr>(),
            Err(AddrError::InvalidMac(bad.to_string())),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn cidr_parse_and_display() {
    let cidr: Cidr = "10.0.0.1/24".parse().expect("parse cidr");
    assert_eq!(cidr.addr, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
    assert_eq!(cidr.prefix, 24);
    assert_eq!(cidr.to_string(), "10.0.0.1/24");

    let v6: Cidr = "fd00::1/64".parse().expect("parse v6 cidr");
    assert_eq!(v6.prefix, 64);
}

#[test]
fn cidr_parse_errors_are_classified() {
    assert!(matches!("10.0.0.1".parse::<Cidr>(), Err(AddrError::MissingPrefix(_))));
    assert!(matches!("10.0.0/24".parse::<Cidr>(), Err(AddrError::InvalidAddress(_))));
    assert!(matches!("10.0.0.1/abc".parse::<Cidr>(), Err(AddrError::InvalidPrefix(_))));
    assert!(matches!("10.0.0.1/33".parse::<Cidr>(), Err(AddrError::InvalidPrefix(_))));
    assert!("fd00::1/128".parse::<Cidr>().is_ok());
    assert!(matches!("fd00::1/129".parse::<Cidr>(), Err(AddrError::InvalidPrefix(_))));
}
