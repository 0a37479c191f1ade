//! 网络描述校验
//!
//! 在创建任何节点之前拒绝会导致错误拓扑的描述。

use super::network_spec::NetworkSpec;
use crate::error::{Error, Result};
use crate::net::MacAddr;
use crate::session::CONTROLLER_NAME;
use std::collections::{HashMap, HashSet};

/// 第 `num` 个路由器（从 1 开始）对应的交换机名
pub fn switch_name(num: u64) -> String {
    format!("s{num}")
}

impl NetworkSpec {
    /// 校验路由器地址格式、路由器地址唯一、节点名唯一、链路端点均已声明。
    ///
    /// 路由器个数上限为 2^48 - 1：超出后派生的 MAC 地址会重复。
    pub fn validate(&self) -> Result<()> {
        if self.routers.len() as u64 > MacAddr::MAX_INDEX {
            return Err(Error::TooManyRouters {
                count: self.routers.len(),
                max: MacAddr::MAX_INDEX,
            });
        }

        let mut router_index: HashMap<&str, usize> = HashMap::new();
        let mut names: HashSet<String> = HashSet::from([CONTROLLER_NAME.to_string()]);

        for (i, router) in self.routers.iter().enumerate() {
            let num = i + 1;
            router.cidr().map_err(|source| Error::InvalidRouterIp {
                ip: router.ip.clone(),
                source,
            })?;
            if let Some(first) = router_index.insert(router.ip.as_str(), num) {
                return Err(Error::DuplicateRouterIp {
                    ip: router.ip.clone(),
                    first,
                    second: num,
                });
            }

            let switch = switch_name(num as u64);
            if !names.insert(switch.clone()) {
                return Err(Error::DuplicateNodeName { name: switch });
            }
            for host in &router.hosts {
                if !names.insert(host.name.clone()) {
                    return Err(Error::DuplicateNodeName {
                        name: host.name.clone(),
                    });
                }
            }
        }

        for (a, b) in &self.links {
            for ip in [a, b] {
                if !router_index.contains_key(ip.as_str()) {
                    return Err(Error::UnknownRouter { ip: ip.clone() });
                }
            }
        }
        Ok(())
    }
}
