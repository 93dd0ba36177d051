//! 服务生命周期定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 服务生命周期类型
///
/// 判定值按 `ServiceLifetime` 枚举的声明顺序排列：
/// 零值为单例，其后依次为作用域、瞬时。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 单例模式 - 整个容器生命周期内只创建一个实例
    Singleton,
    /// 作用域模式 - 在同一作用域内共享实例
    Scoped,
    /// 瞬时模式 - 每次请求都创建新实例
    Transient,
}

impl Lifetime {
    /// 全部生命周期，按判定值排列
    pub const ALL: [Self; 3] = [Self::Singleton, Self::Scoped, Self::Transient];

    /// `ServiceLifetime` 枚举中对应的判定值
    pub const fn discriminant(self) -> u8 {
        match self {
            Self::Singleton => 0,
            Self::Scoped => 1,
            Self::Transient => 2,
        }
    }

    /// 由 `ServiceLifetime` 枚举成员名称获取生命周期
    pub fn from_variant_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lifetime| lifetime.variant_name() == name)
    }

    /// `ServiceLifetime` 枚举成员名称
    pub const fn variant_name(self) -> &'static str {
        match self {
            Self::Singleton => "Singleton",
            Self::Scoped => "Scoped",
            Self::Transient => "Transient",
        }
    }

    /// 小写名称，同时也是注册方法名的后缀
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
