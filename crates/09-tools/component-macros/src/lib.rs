//! # Component Macros
//!
//! 这个 crate 提供服务发现使用的四个标记属性宏。
//!
//! 标记宏本身不生成任何代码，原样返回被标记的类型；
//! 构建脚本中的 `di-source-generator` 按名称识别这些标记并生成注册代码。
//!
//! ## 标记
//!
//! - [`singleton`] - 单例生命周期
//! - [`scoped`] - 作用域生命周期
//! - [`transient`] - 瞬时生命周期
//! - [`inject`] - 通用标记，可选参数 `ServiceLifetime::*`，缺省为单例
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::{inject, scoped};
//!
//! #[scoped]
//! pub struct RequestContext;
//!
//! #[inject(ServiceLifetime::Transient)]
//! pub struct ReportBuilder;
//! ```

use proc_macro::TokenStream;

mod marker;

/// 单例生命周期标记
///
/// 不接受参数，只能标记结构体或枚举。
#[proc_macro_attribute]
pub fn singleton(args: TokenStream, input: TokenStream) -> TokenStream {
    marker::lifetime_marker_impl("singleton", args.into(), input.into()).into()
}

/// 作用域生命周期标记
///
/// 不接受参数，只能标记结构体或枚举。
#[proc_macro_attribute]
pub fn scoped(args: TokenStream, input: TokenStream) -> TokenStream {
    marker::lifetime_marker_impl("scoped", args.into(), input.into()).into()
}

/// 瞬时生命周期标记
///
/// 不接受参数，只能标记结构体或枚举。
#[proc_macro_attribute]
pub fn transient(args: TokenStream, input: TokenStream) -> TokenStream {
    marker::lifetime_marker_impl("transient", args.into(), input.into()).into()
}

/// 通用注入标记
///
/// # 参数
///
/// - 无参数 - 单例
/// - `ServiceLifetime::Singleton` / `ServiceLifetime::Scoped` / `ServiceLifetime::Transient`
/// - `lifetime = ServiceLifetime::Scoped` - 命名形式
///
/// 参数不合法时生成器按单例处理，这里不做校验。
///
/// # 示例
///
/// ```rust,ignore
/// #[inject(ServiceLifetime::Scoped)]
/// pub struct UnitOfWork;
/// ```
#[proc_macro_attribute]
pub fn inject(args: TokenStream, input: TokenStream) -> TokenStream {
    marker::inject_marker_impl(args.into(), input.into()).into()
}
