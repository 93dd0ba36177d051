//! 元数据定义
//!
//! 提供类型全限定名、模块标识和可访问性等元数据信息

use std::fmt;

/// 路径根
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathRoot {
    /// 当前正在生成代码的 crate（渲染为 `crate::`）
    Crate,
    /// 外部依赖 crate（渲染为 `::name::`）
    Extern(String),
}

/// 类型全限定名
///
/// 由路径根、模块路径、类型名和泛型参数个数组成，
/// 渲染结果不含任何 `use` 别名。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    root: PathRoot,
    module_path: Vec<String>,
    name: String,
    generic_arity: usize,
}

impl QualifiedName {
    /// 创建当前 crate 中的类型名
    pub fn local<I, S>(module_path: I, name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(PathRoot::Crate, module_path, name)
    }

    /// 创建外部 crate 中的类型名
    pub fn external<I, S>(crate_name: impl Into<String>, module_path: I, name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(PathRoot::Extern(crate_name.into()), module_path, name)
    }

    /// 创建类型名
    pub fn new<I, S>(root: PathRoot, module_path: I, name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root,
            module_path: module_path.into_iter().map(Into::into).collect(),
            name: name.into(),
            generic_arity: 0,
        }
    }

    /// 设置泛型参数个数
    pub fn with_generic_arity(mut self, generic_arity: usize) -> Self {
        self.generic_arity = generic_arity;
        self
    }

    /// 路径根
    pub fn root(&self) -> &PathRoot {
        &self.root
    }

    /// 模块路径（不含类型名）
    pub fn module_path(&self) -> &[String] {
        &self.module_path
    }

    /// 类型名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 泛型参数个数（生命周期参数也计入）
    pub fn generic_arity(&self) -> usize {
        self.generic_arity
    }

    /// 是否为泛型类型
    pub fn is_generic(&self) -> bool {
        self.generic_arity > 0
    }

    /// 渲染为可在任意位置使用的绝对路径
    pub fn to_path(&self) -> String {
        let mut path = match &self.root {
            PathRoot::Crate => String::from("crate"),
            PathRoot::Extern(crate_name) => format!("::{crate_name}"),
        };
        for segment in &self.module_path {
            path.push_str("::");
            path.push_str(segment);
        }
        path.push_str("::");
        path.push_str(&self.name);
        path
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())?;
        if self.generic_arity > 0 {
            write!(f, "`{}", self.generic_arity)?;
        }
        Ok(())
    }
}

/// 模块标识
///
/// 一个模块对应一个 crate，可见性规则按模块标识比较。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(String);

impl ModuleId {
    /// 创建模块标识
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// 模块名称
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 声明的可访问性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessibility {
    /// `pub`
    Public,
    /// `pub(crate)`、`pub(super)`、`pub(in ..)`
    Restricted,
    /// 未声明可见性
    Private,
}

impl Accessibility {
    /// 是否为公开
    pub fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_rendering() {
        let name = QualifiedName::local(["services", "clock"], "SystemClock");
        assert_eq!(name.to_path(), "crate::services::clock::SystemClock");
        assert_eq!(name.to_string(), "crate::services::clock::SystemClock");
    }

    #[test]
    fn test_root_level_and_external_paths() {
        assert_eq!(
            QualifiedName::local(Vec::<String>::new(), "Root").to_path(),
            "crate::Root"
        );
        assert_eq!(
            QualifiedName::external("shared_contracts", ["time"], "Clock").to_path(),
            "::shared_contracts::time::Clock"
        );
    }

    #[test]
    fn test_generic_arity_in_display_only() {
        let name = QualifiedName::local(["repo"], "Repository").with_generic_arity(2);
        assert!(name.is_generic());
        assert_eq!(name.to_path(), "crate::repo::Repository");
        assert_eq!(name.to_string(), "crate::repo::Repository`2");
    }

    #[test]
    fn test_accessibility() {
        assert!(Accessibility::Public.is_public());
        assert!(!Accessibility::Restricted.is_public());
        assert!(!Accessibility::Private.is_public());
    }
}
