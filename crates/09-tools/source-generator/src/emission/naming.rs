//! 生成代码的命名

use crate::semantic::Namespace;
use infrastructure_common::{GeneratorError, GeneratorResult};

/// 标识规范化
///
/// 非 ASCII 字母数字的字符一律替换为 `_`，数字开头时补一个 `_` 前缀。
pub fn normalize_identifier(raw: &str) -> String {
    let mut normalized: String = raw
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();

    if normalized.starts_with(|ch: char| ch.is_ascii_digit()) {
        normalized.insert(0, '_');
    }
    normalized
}

/// 由编译单元标识派生的全部生成名称
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedNames {
    /// 规范化后的标识
    pub identity: String,
    /// 扩展 trait 名，`DiscoverIn_<标识>`
    pub extension_trait: String,
    /// 扩展方法名，`discover_in_<标识>`
    pub extension_method: String,
    /// 内部注册函数名，`__discover_all_<标识>`
    pub internal_routine: String,
    /// 发现器类型名，`<标识>_Discoverer`
    pub discoverer: String,
}

impl GeneratedNames {
    /// 由编译单元标识派生名称
    ///
    /// 标识为空时没有安全的默认名称，返回 [`GeneratorError::MissingCompilationIdentity`]。
    pub fn from_identity(raw: &str) -> GeneratorResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(GeneratorError::MissingCompilationIdentity);
        }

        let identity = normalize_identifier(raw);
        Ok(Self {
            extension_trait: format!("DiscoverIn_{identity}"),
            extension_method: format!("discover_in_{identity}"),
            internal_routine: format!("__discover_all_{identity}"),
            discoverer: format!("{identity}_Discoverer"),
            identity,
        })
    }
}

/// 命名空间包装模块名
///
/// 各段以 `_` 连接后规范化，如 `app::startup` 为 `app_startup`，
/// 原始标识 `r#type` 为 `r_type`。
pub fn wrapper_module_name(namespace: &Namespace) -> String {
    normalize_identifier(&namespace.segments().join("_"))
}
