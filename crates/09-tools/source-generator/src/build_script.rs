//! 构建脚本入口
//!
//! 在 crate 的 `build.rs` 中调用：
//!
//! ```rust,ignore
//! fn main() -> anyhow::Result<()> {
//!     di_source_generator::build_script::run()?;
//!     Ok(())
//! }
//! ```
//!
//! 生成的文件写入 `OUT_DIR`，由 crate 源码通过 `include!` 引入：
//!
//! ```rust,ignore
//! include!(concat!(env!("OUT_DIR"), "/di_markers.g.rs"));
//! include!(concat!(env!("OUT_DIR"), "/discovered_services.g.rs"));
//! ```

use crate::frontend::SourceCompilation;
use crate::generator::{GenerationOutput, SourceGenerator};
use crate::sink::OutDirSink;
use infrastructure_common::{GeneratorError, GeneratorOptions, GeneratorResult, OPTIONS_FILE_NAME};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 构建脚本环境
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// crate 清单目录
    pub manifest_dir: PathBuf,
    /// 生成文件输出目录
    pub out_dir: PathBuf,
    /// 编译单元标识
    pub crate_name: Option<String>,
}

impl BuildContext {
    /// 从 Cargo 设置的环境变量读取
    pub fn from_env() -> GeneratorResult<Self> {
        Ok(Self {
            manifest_dir: required_env("CARGO_MANIFEST_DIR")?.into(),
            out_dir: required_env("OUT_DIR")?.into(),
            // 构建脚本运行时 CARGO_CRATE_NAME 指向构建脚本自身
            crate_name: std::env::var("CARGO_PKG_NAME").ok(),
        })
    }
}

fn required_env(name: &str) -> GeneratorResult<String> {
    std::env::var(name).map_err(|_| GeneratorError::MissingEnvironment {
        name: name.to_string(),
    })
}

/// 初始化日志，默认只输出警告
///
/// 已有全局订阅者时保持不变。
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 构建脚本入口
///
/// 读取环境和配置，输出 `cargo:rerun-if-changed`，执行一轮生成。
/// 失败时同时输出 `cargo:warning`。
pub fn run() -> GeneratorResult<GenerationOutput> {
    init_logging();

    let context = BuildContext::from_env()?;
    let options = GeneratorOptions::load_from_dir(&context.manifest_dir)?;
    for path in rerun_paths(&context, &options) {
        println!("cargo:rerun-if-changed={}", path.display());
    }

    run_with(&context, &options).map_err(|e| {
        println!("cargo:warning=服务注册代码生成失败: {e}");
        e
    })
}

/// 以给定环境和配置执行一轮生成
pub fn run_with(context: &BuildContext, options: &GeneratorOptions) -> GeneratorResult<GenerationOutput> {
    let generator = SourceGenerator::new(options.clone());
    let mut sink = OutDirSink::new(&context.out_dir);

    generator.install_static_definitions(&mut sink)?;

    let result = build_compilation(context, options).and_then(|compilation| generator.generate(&compilation));
    let output = generator.complete_pass(result, &mut sink)?;

    info!("生成结果已写入 {}", context.out_dir.display());
    Ok(output)
}

/// 扫描源码目录和契约源码目录
pub fn build_compilation(context: &BuildContext, options: &GeneratorOptions) -> GeneratorResult<SourceCompilation> {
    let mut builder = SourceCompilation::builder();
    match &context.crate_name {
        Some(name) => builder = builder.assembly_name(name.clone()),
        None => warn!("未设置 CARGO_PKG_NAME"),
    }

    builder = builder.add_source_dir(context.manifest_dir.join(&options.source_dir))?;
    for source in &options.contract_sources {
        builder = builder.add_contract_source_dir(
            source.crate_name.clone(),
            context.manifest_dir.join(&source.path),
        )?;
    }

    builder.build()
}

/// 需要监视变化的路径
///
/// 配置文件只在存在时监视；Cargo 会把不存在的路径视为每次都已变化。
pub fn rerun_paths(context: &BuildContext, options: &GeneratorOptions) -> Vec<PathBuf> {
    let mut paths = vec![context.manifest_dir.join(&options.source_dir)];
    paths.extend(
        options
            .contract_sources
            .iter()
            .map(|source| context.manifest_dir.join(&source.path)),
    );

    let options_file = context.manifest_dir.join(OPTIONS_FILE_NAME);
    if options_file.is_file() {
        paths.push(options_file);
    }
    paths
}
