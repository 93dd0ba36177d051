//! 生成结果输出
//!
//! 生成器只通过 [`GenerationSink`] 发布文件：按固定文件名添加或删除一份源码文本。

use infrastructure_common::{SinkError, SinkResult};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 生成文件的接收方
pub trait GenerationSink {
    /// 添加或替换生成文件
    fn add_source(&mut self, name: &str, text: &str) -> SinkResult<()>;

    /// 删除生成文件，文件不存在时不是错误
    fn remove_source(&mut self, name: &str) -> SinkResult<()>;
}

/// 内存中的生成结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemorySink {
    sources: BTreeMap<String, String>,
}

impl InMemorySink {
    /// 创建空的输出
    pub fn new() -> Self {
        Self::default()
    }

    /// 按文件名获取文本
    pub fn get(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    /// 全部文件名，按名称排序
    pub fn names(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    /// 文件数
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl GenerationSink for InMemorySink {
    fn add_source(&mut self, name: &str, text: &str) -> SinkResult<()> {
        validate_source_name(name)?;
        self.sources.insert(name.to_string(), text.to_string());
        Ok(())
    }

    fn remove_source(&mut self, name: &str) -> SinkResult<()> {
        validate_source_name(name)?;
        self.sources.remove(name);
        Ok(())
    }
}

/// 写入目录的生成结果（构建脚本的 `OUT_DIR`）
///
/// 内容未变化的文件不重写，避免触发不必要的重新编译。
/// 写入先落到临时文件再重命名，读取方不会看到半份文件。
#[derive(Debug, Clone)]
pub struct OutDirSink {
    dir: PathBuf,
}

impl OutDirSink {
    /// 创建输出
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 输出目录
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 生成文件的完整路径
    pub fn path_of(&self, name: &str) -> SinkResult<PathBuf> {
        validate_source_name(name)?;
        Ok(self.dir.join(name))
    }
}

impl GenerationSink for OutDirSink {
    fn add_source(&mut self, name: &str, text: &str) -> SinkResult<()> {
        let path = self.path_of(name)?;

        if fs::read_to_string(&path).is_ok_and(|existing| existing == text) {
            debug!("生成文件未变化，跳过写入: {}", path.display());
            return Ok(());
        }

        let write_failed = |source| SinkError::WriteFailed {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(write_failed)?;

        let staging = self.dir.join(format!(".{name}.tmp"));
        fs::write(&staging, text).map_err(write_failed)?;
        fs::rename(&staging, &path).map_err(write_failed)?;

        debug!("已写入生成文件: {}", path.display());
        Ok(())
    }

    fn remove_source(&mut self, name: &str) -> SinkResult<()> {
        let path = self.path_of(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("已删除过期生成文件: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SinkError::RemoveFailed { path, source: e }),
        }
    }
}

/// 生成文件名只能是单个普通文件名
fn validate_source_name(name: &str) -> SinkResult<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(SinkError::InvalidSourceName {
            name: name.to_string(),
        })
    }
}
