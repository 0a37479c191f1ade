//! 地址类型
//!
//! MAC 地址与 CIDR 地址的解析和格式化。

use serde::{Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

/// 地址解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddrError {
    #[error("address {0:?} has no /prefix suffix")]
    MissingPrefix(String),
    #[error("invalid IP address {0:?}")]
    InvalidAddress(String),
    #[error("invalid prefix length {0:?}")]
    InvalidPrefix(String),
    #[error("invalid MAC address {0:?}")]
    InvalidMac(String),
}

/// 48 位 MAC 地址
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// 可由 [`MacAddr::from_index`] 编码的最大序号（2^48 - 1）。
    pub const MAX_INDEX: u64 = (1 << 48) - 1;

    /// 由序号确定性地派生 MAC：按大端打包成 8 字节，取低 6 字节。
    ///
    /// 序号超出 48 位时返回 `None`（高位会被截断，导致重复）。
    pub fn from_index(num: u64) -> Option<MacAddr> {
        if num > Self::MAX_INDEX {
            return None;
        }
        let packed = num.to_be_bytes();
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&packed[2..]);
        Some(MacAddr(octets))
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddr {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AddrError::InvalidMac(s.to_string());
        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(err)?;
            if part.is_empty() || part.len() > 2 {
                return Err(err());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| err())?;
        }
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(MacAddr(octets))
    }
}

impl Serialize for MacAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 带前缀长度的 IP 地址，例如 `10.0.0.1/24`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cidr {
    pub addr: IpAddr,
    pub prefix: u8,
}

impl Cidr {
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, AddrError> {
        let max = if addr.is_ipv4() { 32 } else { 128 };
        if prefix > max {
            return Err(AddrError::InvalidPrefix(prefix.to_string()));
        }
        Ok(Self { addr, prefix })
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

impl FromStr for Cidr {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| AddrError::MissingPrefix(s.to_string()))?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| AddrError::InvalidAddress(addr.to_string()))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| AddrError::InvalidPrefix(prefix.to_string()))?;
        Cidr::new(addr, prefix)
    }
}

impl Serialize for Cidr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
