//! 网络描述加载

use super::network_spec::NetworkSpec;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// 网络描述解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 从文件读取并解析网络描述，除读文件外没有副作用
pub fn load_spec(path: impl AsRef<Path>) -> Result<NetworkSpec, ParseError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let spec: NetworkSpec = serde_json::from_str(&raw).map_err(|source| ParseError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        routers = spec.routers.len(),
        hosts = spec.host_count(),
        links = spec.links.len(),
        "网络描述已加载"
    );
    Ok(spec)
}

impl FromStr for NetworkSpec {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}
