//! 网络描述模块
//!
//! 此模块包含 JSON 网络描述的数据结构、加载和校验。

// 子模块声明
mod loader;
mod network_spec;
mod validate;

// 重新导出公共接口
pub use loader::{ParseError, load_spec};
pub use network_spec::{HostSpec, LinkSpec, NetworkSpec, RouterSpec};
pub use validate::switch_name;
