//! 语义模型抽象
//!
//! 生成器只通过 [`SemanticModel`] 读取编译单元：候选类型声明、类型解析、
//! 触发调用点及其所在命名空间、编译单元标识。模型在一轮生成期间只读。

use infrastructure_common::{Accessibility, ModuleId, QualifiedName};
use std::fmt;
use std::path::PathBuf;

/// 源码位置
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    /// 文件路径
    pub file: PathBuf,
    /// 行号（从 1 开始）
    pub line: usize,
    /// 列号（从 1 开始），同一行上的多个声明靠它区分
    pub column: usize,
}

impl SourceLocation {
    /// 创建源码位置
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// 标识符在文件中的起始位置
    pub fn of_ident(file: impl Into<PathBuf>, ident: &proc_macro2::Ident) -> Self {
        let start = ident.span().start();
        Self::new(file, start.line, start.column + 1)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// 属性参数值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    /// 路径形式的值，如 `ServiceLifetime::Scoped`
    Path {
        /// 倒数第二段（枚举名），单段路径时为空
        enum_name: Option<String>,
        /// 最后一段（成员名）
        member: String,
    },
    /// 其他表达式，保留原始文本
    Other(String),
}

/// 属性参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeArgument {
    /// 命名参数的名称（`name = value`），位置参数为空
    pub name: Option<String>,
    /// 参数值
    pub value: ArgumentValue,
}

/// 属性数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeData {
    /// 属性名（属性路径的最后一段）
    pub name: String,
    /// 参数列表，无参数或参数无法解析时为空
    pub arguments: Vec<AttributeArgument>,
    /// 参数列表存在但无法按逗号分隔的表达式解析
    pub malformed: bool,
}

impl AttributeData {
    /// 创建无参数的属性
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            malformed: false,
        }
    }

    /// 添加参数
    pub fn with_argument(mut self, argument: AttributeArgument) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// 候选类型的语法声明
///
/// 由 [`SemanticModel::candidate_declarations`] 给出，只保证至少带有一个属性。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    /// 类型名
    pub name: String,
    /// 声明位置
    pub location: SourceLocation,
    /// 语法层面可见的属性
    pub attributes: Vec<AttributeData>,
}

/// 契约（候选类型实现的 trait）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contract {
    /// 全限定名
    pub name: QualifiedName,
    /// 声明所在模块
    pub module: ModuleId,
    /// 声明的可访问性
    pub accessibility: Accessibility,
    /// 能否作为 `dyn` 类型使用
    pub dyn_compatible: bool,
}

/// 已解析的候选类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateType {
    /// 全限定名（含泛型参数个数）
    pub name: QualifiedName,
    /// 声明所在模块
    pub module: ModuleId,
    /// 声明的属性
    pub attributes: Vec<AttributeData>,
    /// 实现的全部契约（含父 trait），按发现顺序
    pub contracts: Vec<Contract>,
}

/// 触发方法调用点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSite {
    /// 被调用的方法名
    pub callee: String,
    /// 调用位置
    pub location: SourceLocation,
    /// 调用所在的函数，不在函数体内时为空
    pub enclosing_function: Option<String>,
    /// 调用所在的模块路径
    pub module_path: Vec<String>,
}

/// 命名空间（模块路径），空路径即 crate 根
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Namespace {
    path: Vec<String>,
}

impl Namespace {
    /// 创建命名空间
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// crate 根
    pub fn global() -> Self {
        Self::default()
    }

    /// 是否为 crate 根
    pub fn is_global(&self) -> bool {
        self.path.is_empty()
    }

    /// 模块路径段
    pub fn segments(&self) -> &[String] {
        &self.path
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str("crate")
        } else {
            write!(f, "crate::{}", self.path.join("::"))
        }
    }
}

/// 语义模型
///
/// 宿主编译器在生成器中的只读视图。
pub trait SemanticModel {
    /// 编译单元标识（crate 名）
    fn assembly_name(&self) -> Option<&str>;

    /// 当前编译单元所在模块
    fn source_module(&self) -> &ModuleId;

    /// 带有至少一个属性的类结构声明，按语法顺序
    fn candidate_declarations(&self) -> Vec<&TypeDeclaration>;

    /// 解析候选声明，无法解析时返回 `None`
    fn resolve_type(&self, declaration: &TypeDeclaration) -> Option<CandidateType>;

    /// 调用指定方法的全部调用点，按语法顺序
    fn invocations(&self, method_name: &str) -> Vec<InvocationSite>;

    /// 调用点所在函数的命名空间，调用不在函数体内时返回 `None`
    fn enclosing_namespace(&self, site: &InvocationSite) -> Option<Namespace>;
}
