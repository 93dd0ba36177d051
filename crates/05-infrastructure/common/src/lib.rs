//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 服务发现代码生成所共享的类型和工具。
//!
//! ## 核心内容
//!
//! - [`Lifetime`] - 服务生命周期
//! - [`QualifiedName`] - 类型全限定名
//! - [`ModuleId`] / [`Accessibility`] - 契约可见性判断依据
//! - [`GeneratorOptions`] - 生成器配置
//! - [`GeneratorError`] - 生成错误
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 约定优于配置
//! - 生成结果确定、可复现

pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
