//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义生成代码所调用的服务注册接口。
//!
//! ## 核心接口
//!
//! - [`ServiceRegistry`] - 服务注册接口（单例 / 作用域 / 瞬时）
//! - [`ServiceDescriptor`] - 单条注册记录

pub mod registry;

pub use infrastructure_common::Lifetime;
pub use registry::*;
