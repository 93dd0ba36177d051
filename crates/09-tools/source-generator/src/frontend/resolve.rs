//! 路径解析
//!
//! 在已索引的 crate 之间解析路径：`crate::`、`self::`、`super::`、`::dep::`、
//! `use` 别名与通配导入、依赖 crate 名以及相对于当前模块的路径。
//! 无法解析的路径（如标准库）返回 `None`。

use super::index::{CrateIndex, RawPath, TraitEntry, UseEntry};
use infrastructure_common::QualifiedName;
use std::collections::{BTreeMap, HashSet};

/// 解析的最大递归深度
const MAX_RESOLVE_DEPTH: usize = 32;

/// 未索引但可以出现在 `dyn` 类型父 trait 中的标准库 trait
///
/// 其他无法解析的父 trait（`Clone`、`Default`、`PartialEq` 等）一律视为不可用。
const DYN_SAFE_EXTERNAL_TRAITS: [&str; 9] = [
    "Send",
    "Sync",
    "Unpin",
    "UnwindSafe",
    "RefUnwindSafe",
    "Debug",
    "Display",
    "Any",
    "Error",
];

/// 已索引的 crate
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrateKey {
    /// 当前正在生成代码的 crate
    Local,
    /// 作为契约来源索引的依赖 crate
    Dependency(String),
}

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Binding {
    Module { krate: CrateKey, path: Vec<String> },
    Item(ItemRef),
}

/// 条目（类型或 trait）引用
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemRef {
    /// 所属 crate
    pub krate: CrateKey,
    /// 声明所在模块路径
    pub module_path: Vec<String>,
    /// 名称
    pub name: String,
}

impl ItemRef {
    /// 全限定名
    pub fn qualified_name(&self) -> QualifiedName {
        match &self.krate {
            CrateKey::Local => QualifiedName::local(self.module_path.clone(), self.name.clone()),
            CrateKey::Dependency(crate_name) => QualifiedName::external(
                crate_name.clone(),
                self.module_path.clone(),
                self.name.clone(),
            ),
        }
    }
}

/// 路径解析器
pub struct Resolver<'a> {
    local: &'a CrateIndex,
    dependencies: &'a BTreeMap<String, CrateIndex>,
}

/// 正在解析的 `(crate, 模块, 名称)`，用于截断循环导入
type Visiting = HashSet<(CrateKey, Vec<String>, String)>;

impl<'a> Resolver<'a> {
    /// 创建解析器
    pub fn new(local: &'a CrateIndex, dependencies: &'a BTreeMap<String, CrateIndex>) -> Self {
        Self {
            local,
            dependencies,
        }
    }

    fn index(&self, krate: &CrateKey) -> Option<&'a CrateIndex> {
        match krate {
            CrateKey::Local => Some(self.local),
            CrateKey::Dependency(name) => self.dependencies.get(name),
        }
    }

    /// 在模块中解析指向 trait 的路径
    pub fn resolve_trait(&self, krate: &CrateKey, module: &[String], path: &RawPath) -> Option<ItemRef> {
        let item = self.resolve_item(krate, module, path)?;
        self.trait_entry(&item).map(|_| item)
    }

    /// 在模块中解析指向类型的路径
    pub fn resolve_type(&self, krate: &CrateKey, module: &[String], path: &RawPath) -> Option<ItemRef> {
        let item = self.resolve_item(krate, module, path)?;
        self.index(&item.krate)?
            .type_at(&item.module_path, &item.name)
            .map(|_| item)
    }

    /// trait 声明
    pub fn trait_entry(&self, item: &ItemRef) -> Option<&'a TraitEntry> {
        self.index(&item.krate)?.trait_at(&item.module_path, &item.name)
    }

    fn resolve_item(&self, krate: &CrateKey, module: &[String], path: &RawPath) -> Option<ItemRef> {
        let mut visiting = Visiting::new();
        match self.resolve(krate, module, path, 0, &mut visiting)? {
            Binding::Item(item) => Some(item),
            Binding::Module { .. } => None,
        }
    }

    fn resolve(
        &self,
        krate: &CrateKey,
        module: &[String],
        path: &RawPath,
        depth: usize,
        visiting: &mut Visiting,
    ) -> Option<Binding> {
        if depth > MAX_RESOLVE_DEPTH {
            return None;
        }

        let (first, rest) = path.segments.split_first()?;
        let mut binding = if path.leading_colon {
            self.crate_root(first)?
        } else {
            match first.as_str() {
                "crate" => Binding::Module {
                    krate: krate.clone(),
                    path: Vec::new(),
                },
                "self" => Binding::Module {
                    krate: krate.clone(),
                    path: module.to_vec(),
                },
                "super" => Binding::Module {
                    krate: krate.clone(),
                    path: parent(module)?,
                },
                "Self" => return None,
                name => self
                    .member(krate, module, name, depth + 1, visiting)
                    .or_else(|| self.crate_root(name))?,
            }
        };

        for segment in rest {
            let Binding::Module { krate, path } = &binding else {
                return None;
            };
            binding = if segment == "super" {
                Binding::Module {
                    krate: krate.clone(),
                    path: parent(path)?,
                }
            } else {
                self.member(krate, path, segment, depth + 1, visiting)?
            };
        }

        Some(binding)
    }

    /// 模块作用域中的名称：子模块、声明的条目、`use` 别名、通配导入
    fn member(
        &self,
        krate: &CrateKey,
        module: &[String],
        name: &str,
        depth: usize,
        visiting: &mut Visiting,
    ) -> Option<Binding> {
        if depth > MAX_RESOLVE_DEPTH {
            return None;
        }
        let index = self.index(krate)?;

        let mut child = module.to_vec();
        child.push(name.to_string());
        if index.has_module(&child) {
            return Some(Binding::Module {
                krate: krate.clone(),
                path: child,
            });
        }

        if index.type_at(module, name).is_some() || index.trait_at(module, name).is_some() {
            return Some(Binding::Item(ItemRef {
                krate: krate.clone(),
                module_path: module.to_vec(),
                name: name.to_string(),
            }));
        }

        let key = (krate.clone(), module.to_vec(), name.to_string());
        if !visiting.insert(key.clone()) {
            return None;
        }

        let found = self.imported_member(krate, module, name, depth, visiting);
        visiting.remove(&key);
        found
    }

    fn imported_member(
        &self,
        krate: &CrateKey,
        module: &[String],
        name: &str,
        depth: usize,
        visiting: &mut Visiting,
    ) -> Option<Binding> {
        let uses = self.index(krate)?.uses_in(module);

        for entry in uses {
            if let UseEntry::Alias { name: alias, target } = entry {
                if alias == name {
                    if let Some(binding) = self.resolve(krate, module, target, depth + 1, visiting) {
                        return Some(binding);
                    }
                }
            }
        }

        for entry in uses {
            if let UseEntry::Glob { target } = entry {
                if let Some(Binding::Module { krate, path }) =
                    self.resolve(krate, module, target, depth + 1, visiting)
                {
                    if let Some(binding) = self.member(&krate, &path, name, depth + 1, visiting) {
                        return Some(binding);
                    }
                }
            }
        }

        None
    }

    fn crate_root(&self, name: &str) -> Option<Binding> {
        self.dependencies.contains_key(name).then(|| Binding::Module {
            krate: CrateKey::Dependency(name.to_string()),
            path: Vec::new(),
        })
    }

    /// 类型实现的全部契约（含父 trait 的传递闭包），按发现顺序去重
    pub fn contracts_of(&self, target: &ItemRef) -> Vec<ItemRef> {
        let mut contracts = Vec::new();
        let mut seen = HashSet::new();

        for entry in self.local.impls() {
            if is_type_param(&entry.self_path, &entry.type_params) {
                continue;
            }
            let implemented = self
                .resolve_type(&CrateKey::Local, &entry.module_path, &entry.self_path)
                .is_some_and(|item| item == *target);
            if !implemented {
                continue;
            }

            if let Some(contract) =
                self.resolve_trait(&CrateKey::Local, &entry.module_path, &entry.trait_path)
            {
                self.collect_with_supertraits(contract, &mut seen, &mut contracts);
            }
        }

        contracts
    }

    fn collect_with_supertraits(
        &self,
        contract: ItemRef,
        seen: &mut HashSet<ItemRef>,
        out: &mut Vec<ItemRef>,
    ) {
        if !seen.insert(contract.clone()) {
            return;
        }
        let supertraits = self.supertraits_of(&contract);
        out.push(contract);

        for supertrait in supertraits {
            self.collect_with_supertraits(supertrait, seen, out);
        }
    }

    fn supertraits_of(&self, contract: &ItemRef) -> Vec<ItemRef> {
        let Some(entry) = self.trait_entry(contract) else {
            return Vec::new();
        };
        entry
            .supertraits
            .iter()
            .filter_map(|path| self.resolve_trait(&contract.krate, &contract.module_path, path))
            .collect()
    }

    /// trait 能否作为 `dyn` 类型使用，父 trait 也必须满足
    pub fn is_dyn_compatible(&self, contract: &ItemRef) -> bool {
        let mut seen = HashSet::new();
        self.dyn_compatible_inner(contract, &mut seen)
    }

    fn dyn_compatible_inner(&self, contract: &ItemRef, seen: &mut HashSet<ItemRef>) -> bool {
        if !seen.insert(contract.clone()) {
            return true;
        }
        let Some(entry) = self.trait_entry(contract) else {
            return false;
        };

        entry.dyn_compatible
            && entry.supertraits.iter().all(|path| {
                match self.resolve_trait(&contract.krate, &contract.module_path, path) {
                    Some(supertrait) => self.dyn_compatible_inner(&supertrait, seen),
                    None => is_dyn_safe_external(path),
                }
            })
    }
}

fn is_dyn_safe_external(path: &RawPath) -> bool {
    path.segments
        .last()
        .is_some_and(|last| DYN_SAFE_EXTERNAL_TRAITS.contains(&last.as_str()))
}

fn parent(module: &[String]) -> Option<Vec<String>> {
    let (_, parent) = module.split_last()?;
    Some(parent.to_vec())
}

/// `impl<T> Trait for T` 这类以类型参数为实现类型的 impl
fn is_type_param(path: &RawPath, type_params: &[String]) -> bool {
    !path.leading_colon
        && path.segments.len() == 1
        && type_params.iter().any(|param| *param == path.segments[0])
}
