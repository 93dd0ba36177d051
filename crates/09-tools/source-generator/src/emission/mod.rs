//! 代码生成
//!
//! - [`records`] - 分类结果到注册记录序列
//! - [`naming`] - 由编译单元标识派生的名称
//! - [`render`] - 全局 / 命名空间两种模板
//! - [`markers`] - 标记定义文件

pub mod markers;
pub mod naming;
pub mod records;
pub mod render;

pub use markers::marker_definitions;
pub use naming::{normalize_identifier, wrapper_module_name, GeneratedNames};
pub use records::{RegistrationPlan, RegistrationRecord};
pub use render::{render, CodeWriter, Placement, RegistrationSource};
