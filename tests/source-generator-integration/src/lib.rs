//! 源码生成器端到端测试工程
//!
//! 构建脚本扫描本 crate 的源码，生成的标记定义挂载在 crate 根，
//! 注册代码挂载在触发方法所在的 [`startup`] 模块。

include!(concat!(env!("OUT_DIR"), "/di_markers.g.rs"));

pub mod contracts;
pub mod services;
pub mod startup;
