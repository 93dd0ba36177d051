//! 错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}, 原因: {source}")]
    FileReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("配置解析失败: {path}, 原因: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

impl ConfigError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// 生成结果输出错误类型
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("生成文件写入失败: {path}, 原因: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("过期生成文件删除失败: {path}, 原因: {source}")]
    RemoveFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("生成文件名无效: {name}")]
    InvalidSourceName { name: String },
}

/// 代码生成错误类型
///
/// 所有错误都只影响当前这一轮生成，不会重试。
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("带有注入标记的类型无法解析: {type_name} ({location})")]
    UnresolvableMarkerTarget { type_name: String, location: String },

    #[error("缺少编译单元标识，无法命名生成的扩展类型")]
    MissingCompilationIdentity,

    #[error("源码目录读取失败: {path}, 原因: {message}")]
    SourceRead { path: PathBuf, message: String },

    #[error("源码解析失败: {path}, 原因: {message}")]
    SourceParse { path: PathBuf, message: String },

    #[error("构建脚本环境变量缺失: {name}")]
    MissingEnvironment { name: String },

    #[error("配置错误: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("输出错误: {source}")]
    Sink {
        #[from]
        source: SinkError,
    },
}

impl GeneratorError {
    /// 创建源码解析错误
    pub fn source_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::SourceParse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type SinkResult<T> = Result<T, SinkError>;
pub type GeneratorResult<T> = Result<T, GeneratorError>;
