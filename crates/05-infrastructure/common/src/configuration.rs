//! 生成器配置
//!
//! 配置从 crate 清单目录下可选的 `di-generator.toml` 读取，
//! 所有字段都有默认值。

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 配置文件名
pub const OPTIONS_FILE_NAME: &str = "di-generator.toml";

/// 默认的注册接口路径
pub const DEFAULT_REGISTRY_TRAIT: &str = "::di_abstractions::ServiceRegistry";

/// 默认的标记宏 crate
pub const DEFAULT_MACROS_CRATE: &str = "component_macros";

/// 代码生成器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOptions {
    /// 待扫描的源码目录，相对于清单目录
    pub source_dir: PathBuf,
    /// 触发方法名，未设置时使用 `discover_in_<标识>`
    pub trigger_method: Option<String>,
    /// 生成代码调用的注册接口路径
    pub registry_trait: String,
    /// 提供标记属性宏的 crate
    pub macros_crate: String,
    /// 额外索引的依赖 crate 源码，仅用于解析契约 trait
    pub contract_sources: Vec<ContractSource>,
}

/// 契约源码
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractSource {
    /// 依赖 crate 名称（代码中使用的名称）
    pub crate_name: String,
    /// 依赖 crate 的源码目录
    pub path: PathBuf,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src"),
            trigger_method: None,
            registry_trait: DEFAULT_REGISTRY_TRAIT.to_string(),
            macros_crate: DEFAULT_MACROS_CRATE.to_string(),
            contract_sources: Vec::new(),
        }
    }
}

impl GeneratorOptions {
    /// 从 TOML 文本解析配置
    pub fn from_toml_str(text: &str, origin: impl AsRef<Path>) -> ConfigResult<Self> {
        let options: Self = toml::from_str(text).map_err(|e| ConfigError::ParseError {
            path: origin.as_ref().to_path_buf(),
            source: e,
        })?;
        options.validate()?;
        Ok(options)
    }

    /// 读取配置文件
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("加载生成器配置文件: {}", path.display());

        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// 从清单目录读取配置，配置文件不存在时使用默认配置
    pub fn load_from_dir(manifest_dir: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = manifest_dir.as_ref().join(OPTIONS_FILE_NAME);
        if path.is_file() {
            Self::load(path)
        } else {
            debug!("未找到 {}，使用默认生成器配置", OPTIONS_FILE_NAME);
            Ok(Self::default())
        }
    }

    /// 设置触发方法名
    pub fn with_trigger_method(mut self, trigger_method: impl Into<String>) -> Self {
        self.trigger_method = Some(trigger_method.into());
        self
    }

    /// 添加契约源码
    pub fn with_contract_source(
        mut self,
        crate_name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        self.contract_sources.push(ContractSource {
            crate_name: crate_name.into(),
            path: path.into(),
        });
        self
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(trigger) = &self.trigger_method {
            if !is_identifier(trigger) {
                return Err(ConfigError::validation(format!(
                    "trigger_method 必须是合法标识符: {trigger}"
                )));
            }
        }

        if !is_identifier(&self.macros_crate) {
            return Err(ConfigError::validation(format!(
                "macros_crate 必须是合法标识符: {}",
                self.macros_crate
            )));
        }

        let registry_path = self.registry_trait.trim_start_matches("::");
        if registry_path.is_empty() || !registry_path.split("::").all(is_identifier) {
            return Err(ConfigError::validation(format!(
                "registry_trait 必须是 trait 路径: {}",
                self.registry_trait
            )));
        }

        for source in &self.contract_sources {
            if !is_identifier(&source.crate_name) {
                return Err(ConfigError::validation(format!(
                    "contract_sources.crate_name 必须是合法标识符: {}",
                    source.crate_name
                )));
            }
        }

        Ok(())
    }
}

/// 检查字符串是否为合法的 Rust 标识符
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    s != "_" && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
