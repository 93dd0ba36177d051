//! Rust 源码前端
//!
//! 用 `syn` 解析 crate 源码，在其上实现 [`SemanticModel`]。
//!
//! - 文件路径映射为模块路径：`lib.rs` / `main.rs` 为 crate 根，`a.rs` 与 `a/mod.rs` 为 `a`，
//!   `a/b.rs` 为 `a::b`
//! - `bin/` 下的文件属于其他编译目标，跳过；存在 `lib.rs` 时 `main.rs` 同样跳过
//! - 依赖 crate 的契约源码只索引 trait，用于解析契约

mod calls;
mod index;
mod resolve;

use crate::semantic::{CandidateType, Contract, InvocationSite, Namespace, SemanticModel, TypeDeclaration};
use index::CrateIndex;
use infrastructure_common::{GeneratorError, GeneratorResult, ModuleId};
use resolve::{CrateKey, ItemRef, Resolver};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// 未设置编译单元标识时使用的模块标识
const ANONYMOUS_MODULE: &str = "crate";

/// 源文件
#[derive(Debug, Clone)]
struct SourceFile {
    /// 相对于源码目录的路径，决定模块路径
    relative: PathBuf,
    /// 诊断信息中显示的路径
    display: PathBuf,
    text: String,
}

/// 编译单元构建器
#[derive(Debug, Default)]
pub struct SourceCompilationBuilder {
    assembly_name: Option<String>,
    sources: Vec<SourceFile>,
    contract_sources: BTreeMap<String, Vec<SourceFile>>,
}

impl SourceCompilationBuilder {
    /// 设置编译单元标识（crate 名）
    pub fn assembly_name(mut self, name: impl Into<String>) -> Self {
        self.assembly_name = Some(name.into());
        self
    }

    /// 添加源文件，路径相对于源码目录
    pub fn add_source(mut self, relative: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let relative = relative.into();
        self.sources.push(SourceFile {
            display: relative.clone(),
            relative,
            text: text.into(),
        });
        self
    }

    /// 添加源码目录下的全部 `.rs` 文件
    pub fn add_source_dir(mut self, dir: impl AsRef<Path>) -> GeneratorResult<Self> {
        self.sources.extend(read_source_dir(dir.as_ref())?);
        Ok(self)
    }

    /// 添加依赖 crate 的契约源文件
    pub fn add_contract_source(
        mut self,
        crate_name: impl Into<String>,
        relative: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Self {
        let relative = relative.into();
        self.contract_sources
            .entry(crate_name.into())
            .or_default()
            .push(SourceFile {
                display: relative.clone(),
                relative,
                text: text.into(),
            });
        self
    }

    /// 添加依赖 crate 的契约源码目录
    pub fn add_contract_source_dir(
        mut self,
        crate_name: impl Into<String>,
        dir: impl AsRef<Path>,
    ) -> GeneratorResult<Self> {
        let files = read_source_dir(dir.as_ref())?;
        self.contract_sources
            .entry(crate_name.into())
            .or_default()
            .extend(files);
        Ok(self)
    }

    /// 解析全部源文件并建立索引
    pub fn build(self) -> GeneratorResult<SourceCompilation> {
        let assembly_name = self.assembly_name.filter(|name| !name.trim().is_empty());
        let source_module =
            ModuleId::new(assembly_name.as_deref().unwrap_or(ANONYMOUS_MODULE));

        let mut local = CrateIndex::new();
        let mut sites = Vec::new();
        for (source, module_path) in crate_target_files(self.sources) {
            let file = parse_source(&source)?;
            local.index_file(&file, &module_path, &source.display);
            sites.extend(calls::collect_calls(&file, &module_path, &source.display));
        }

        let mut dependencies = BTreeMap::new();
        for (crate_name, sources) in self.contract_sources {
            let mut index = CrateIndex::new();
            for (source, module_path) in crate_target_files(sources) {
                let file = parse_source(&source)?;
                index.index_file(&file, &module_path, &source.display);
            }
            debug!("已索引契约源码: {}", crate_name);
            dependencies.insert(crate_name, index);
        }

        info!(
            "源码索引完成: {} 个类型声明, {} 个调用点, {} 个依赖 crate",
            local.types().len(),
            sites.len(),
            dependencies.len()
        );

        Ok(SourceCompilation {
            assembly_name,
            source_module,
            local,
            dependencies,
            calls: sites,
        })
    }
}

/// 基于 `syn` 的编译单元
#[derive(Debug)]
pub struct SourceCompilation {
    assembly_name: Option<String>,
    source_module: ModuleId,
    local: CrateIndex,
    dependencies: BTreeMap<String, CrateIndex>,
    calls: Vec<InvocationSite>,
}

impl SourceCompilation {
    /// 创建构建器
    pub fn builder() -> SourceCompilationBuilder {
        SourceCompilationBuilder::default()
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.local, &self.dependencies)
    }

    fn contract(&self, resolver: &Resolver<'_>, item: &ItemRef) -> Option<Contract> {
        let entry = resolver.trait_entry(item)?;
        let module = match &item.krate {
            CrateKey::Local => self.source_module.clone(),
            CrateKey::Dependency(crate_name) => ModuleId::new(crate_name.clone()),
        };
        Some(Contract {
            name: item.qualified_name(),
            module,
            accessibility: entry.accessibility,
            dyn_compatible: resolver.is_dyn_compatible(item),
        })
    }
}

impl SemanticModel for SourceCompilation {
    fn assembly_name(&self) -> Option<&str> {
        self.assembly_name.as_deref()
    }

    fn source_module(&self) -> &ModuleId {
        &self.source_module
    }

    fn candidate_declarations(&self) -> Vec<&TypeDeclaration> {
        self.local
            .types()
            .iter()
            .map(|entry| &entry.declaration)
            .filter(|declaration| !declaration.attributes.is_empty())
            .collect()
    }

    fn resolve_type(&self, declaration: &TypeDeclaration) -> Option<CandidateType> {
        let entry = self
            .local
            .types()
            .iter()
            .find(|entry| entry.declaration == *declaration)?;

        if entry.local_scope {
            debug!("局部作用域中的类型无法从外部命名: {}", declaration.name);
            return None;
        }

        let item = ItemRef {
            krate: CrateKey::Local,
            module_path: entry.module_path.clone(),
            name: declaration.name.clone(),
        };
        let resolver = self.resolver();
        let contracts = resolver
            .contracts_of(&item)
            .iter()
            .filter_map(|contract| self.contract(&resolver, contract))
            .collect();

        Some(CandidateType {
            name: item.qualified_name().with_generic_arity(entry.generic_arity),
            module: self.source_module.clone(),
            attributes: declaration.attributes.clone(),
            contracts,
        })
    }

    fn invocations(&self, method_name: &str) -> Vec<InvocationSite> {
        self.calls
            .iter()
            .filter(|site| site.callee == method_name)
            .cloned()
            .collect()
    }

    fn enclosing_namespace(&self, site: &InvocationSite) -> Option<Namespace> {
        site.enclosing_function
            .as_ref()
            .map(|_| Namespace::new(site.module_path.clone()))
    }
}

/// 读取目录下的全部 `.rs` 文件，按路径排序
fn read_source_dir(dir: &Path) -> GeneratorResult<Vec<SourceFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| GeneratorError::SourceRead {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "rs") {
            continue;
        }

        let text = std::fs::read_to_string(path).map_err(|e| GeneratorError::SourceRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let relative = path.strip_prefix(dir).unwrap_or(path).to_path_buf();
        files.push(SourceFile {
            relative,
            display: path.to_path_buf(),
            text,
        });
    }

    debug!("读取源码目录 {}: {} 个文件", dir.display(), files.len());
    Ok(files)
}

/// 筛选属于 crate 库目标（或唯一的二进制目标）的文件，并按路径排序
fn crate_target_files(mut sources: Vec<SourceFile>) -> Vec<(SourceFile, Vec<String>)> {
    sources.sort_by(|a, b| a.relative.cmp(&b.relative));
    let has_lib = sources
        .iter()
        .any(|source| source.relative == Path::new("lib.rs"));

    sources
        .into_iter()
        .filter(|source| {
            let skipped = source.relative.starts_with("bin")
                || (has_lib && source.relative == Path::new("main.rs"));
            if skipped {
                debug!("跳过其他编译目标的文件: {}", source.relative.display());
            }
            !skipped
        })
        .filter_map(|source| {
            let module_path = module_path_for(&source.relative)?;
            Some((source, module_path))
        })
        .collect()
}

fn parse_source(source: &SourceFile) -> GeneratorResult<syn::File> {
    syn::parse_file(&source.text).map_err(|e| {
        let line = e.span().start().line;
        GeneratorError::source_parse(&source.display, format!("第 {line} 行: {e}"))
    })
}

/// 文件路径对应的模块路径，非 `.rs` 文件返回 `None`
pub fn module_path_for(relative: &Path) -> Option<Vec<String>> {
    if relative.extension()? != "rs" {
        return None;
    }

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_str()?.to_string()),
            Component::CurDir => {}
            _ => return None,
        }
    }

    let file_name = segments.pop()?;
    let stem = file_name.strip_suffix(".rs")?;
    let is_crate_root = segments.is_empty() && (stem == "lib" || stem == "main");
    if !is_crate_root && stem != "mod" {
        segments.push(stem.to_string());
    }
    Some(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_path_for() {
        let cases = [
            ("lib.rs", Some(vec![])),
            ("main.rs", Some(vec![])),
            ("services.rs", Some(vec!["services"])),
            ("services/mod.rs", Some(vec!["services"])),
            ("services/clock.rs", Some(vec!["services", "clock"])),
            ("services/lib.rs", Some(vec!["services", "lib"])),
            ("notes.txt", None),
        ];

        for (path, expected) in cases {
            let expected = expected.map(|segments: Vec<&str>| {
                segments.into_iter().map(String::from).collect::<Vec<_>>()
            });
            assert_eq!(module_path_for(Path::new(path)), expected, "路径: {path}");
        }
    }

    #[test]
    fn test_other_targets_are_skipped() {
        let compilation = SourceCompilation::builder()
            .assembly_name("app")
            .add_source("main.rs", "#[singleton] struct FromMain;")
            .add_source("lib.rs", "#[singleton] pub struct FromLib;")
            .add_source("bin/tool.rs", "#[singleton] struct FromBin;")
            .build()
            .unwrap();

        let names: Vec<&str> = compilation
            .candidate_declarations()
            .iter()
            .map(|declaration| declaration.name.as_str())
            .collect();
        assert_eq!(names, vec!["FromLib"]);
    }

    #[test]
    fn test_resolve_candidate_with_contracts() {
        let compilation = SourceCompilation::builder()
            .assembly_name("app")
            .add_source("lib.rs", "pub mod clock;\npub trait Clock {}\ntrait Hidden {}")
            .add_source(
                "clock.rs",
                "use crate::{Clock, Hidden};\n#[scoped]\npub struct SystemClock;\nimpl Clock for SystemClock {}\nimpl Hidden for SystemClock {}\n",
            )
            .add_contract_source("shared", "lib.rs", "pub trait Api {}")
            .build()
            .unwrap();

        let declarations = compilation.candidate_declarations();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].location.to_string(), "clock.rs:3");

        let candidate = compilation.resolve_type(declarations[0]).unwrap();
        assert_eq!(candidate.name.to_path(), "crate::clock::SystemClock");
        assert_eq!(candidate.module, ModuleId::new("app"));
        assert_eq!(candidate.contracts.len(), 2);
        assert!(candidate.contracts[0].accessibility.is_public());
        assert!(!candidate.contracts[1].accessibility.is_public());
        assert_eq!(candidate.contracts[1].module, ModuleId::new("app"));
    }

    #[test]
    fn test_local_scope_types_do_not_resolve() {
        let compilation = SourceCompilation::builder()
            .assembly_name("app")
            .add_source("lib.rs", "fn setup() { #[singleton] struct Local; }")
            .build()
            .unwrap();

        let declarations = compilation.candidate_declarations();
        assert_eq!(declarations.len(), 1);
        assert!(compilation.resolve_type(declarations[0]).is_none());
    }

    #[test]
    fn test_invocations_and_namespaces() {
        let compilation = SourceCompilation::builder()
            .assembly_name("app")
            .add_source(
                "lib.rs",
                "const READY: () = init();\nmod boot { fn start(r: &mut R) { r.discover_in_app(); } }",
            )
            .build()
            .unwrap();

        assert!(compilation.invocations("discover_in_other").is_empty());
        let sites = compilation.invocations("discover_in_app");
        assert_eq!(sites.len(), 1);
        assert_eq!(
            compilation.enclosing_namespace(&sites[0]),
            Some(Namespace::new(["boot"]))
        );

        let top_level = &compilation.invocations("init")[0];
        assert_eq!(compilation.enclosing_namespace(top_level), None);
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let result = SourceCompilation::builder()
            .add_source("lib.rs", "pub struct Broken {")
            .build();
        assert!(matches!(result, Err(GeneratorError::SourceParse { .. })));
    }

    #[test]
    fn test_source_dir_scan() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("services")).unwrap();
        std::fs::write(dir.path().join("lib.rs"), "pub mod services;").unwrap();
        std::fs::write(
            dir.path().join("services/mod.rs"),
            "#[transient]\npub struct Worker;",
        )
        .unwrap();
        std::fs::write(dir.path().join("README.md"), "# 说明").unwrap();

        let compilation = SourceCompilation::builder()
            .assembly_name("app")
            .add_source_dir(dir.path())
            .unwrap()
            .build()
            .unwrap();

        let declarations = compilation.candidate_declarations();
        assert_eq!(declarations.len(), 1);
        let candidate = compilation.resolve_type(declarations[0]).unwrap();
        assert_eq!(candidate.name.to_path(), "crate::services::Worker");
    }
}
