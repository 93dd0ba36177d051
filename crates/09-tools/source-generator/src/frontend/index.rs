//! 源码索引
//!
//! 遍历语法树，记录类型、trait、`impl Trait for Type`、`use` 声明和模块。

use crate::semantic::{
    ArgumentValue, AttributeArgument, AttributeData, SourceLocation, TypeDeclaration,
};
use infrastructure_common::Accessibility;
use quote::ToTokens;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use syn::punctuated::Punctuated;
use syn::visit::{self, Visit};
use syn::{
    Attribute, Expr, GenericParam, Generics, ItemTrait, Meta, ReturnType, Signature, Token,
    TraitItem, Type, TypeParamBound, Visibility, WherePredicate,
};

/// 未解析的路径（忽略泛型参数）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawPath {
    /// 是否以 `::` 开头
    pub leading_colon: bool,
    /// 路径段
    pub segments: Vec<String>,
}

impl RawPath {
    /// 由语法路径构建
    pub fn from_syn(path: &syn::Path) -> Self {
        Self {
            leading_colon: path.leading_colon.is_some(),
            segments: path
                .segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect(),
        }
    }

    /// 构建相对路径
    pub fn relative<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            leading_colon: false,
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }
}

/// 类型声明
#[derive(Debug, Clone)]
pub struct TypeEntry {
    /// 语法声明
    pub declaration: TypeDeclaration,
    /// 所在模块路径
    pub module_path: Vec<String>,
    /// 泛型参数个数
    pub generic_arity: usize,
    /// 是否声明在函数体等局部作用域中
    pub local_scope: bool,
}

/// trait 声明
#[derive(Debug, Clone)]
pub struct TraitEntry {
    /// 所在模块路径
    pub module_path: Vec<String>,
    /// trait 名
    pub name: String,
    /// 可访问性
    pub accessibility: Accessibility,
    /// 父 trait
    pub supertraits: Vec<RawPath>,
    /// 自身能否作为 `dyn` 类型使用（不含父 trait）
    pub dyn_compatible: bool,
}

/// `impl Trait for Type` 块
#[derive(Debug, Clone)]
pub struct ImplEntry {
    /// 所在模块路径
    pub module_path: Vec<String>,
    /// trait 路径
    pub trait_path: RawPath,
    /// 实现类型路径
    pub self_path: RawPath,
    /// impl 的类型参数名
    pub type_params: Vec<String>,
}

/// `use` 声明展开后的条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseEntry {
    /// `use a::B;` 或 `use a::B as C;`
    Alias {
        /// 引入的名称
        name: String,
        /// 目标路径
        target: RawPath,
    },
    /// `use a::*;`
    Glob {
        /// 目标模块路径
        target: RawPath,
    },
}

/// 单个 crate 的索引
#[derive(Debug, Default)]
pub struct CrateIndex {
    types: Vec<TypeEntry>,
    traits: Vec<TraitEntry>,
    impls: Vec<ImplEntry>,
    uses: BTreeMap<Vec<String>, Vec<UseEntry>>,
    modules: BTreeSet<Vec<String>>,
    type_lookup: BTreeMap<(Vec<String>, String), usize>,
    trait_lookup: BTreeMap<(Vec<String>, String), usize>,
}

impl CrateIndex {
    /// 创建空索引
    pub fn new() -> Self {
        let mut index = Self::default();
        index.modules.insert(Vec::new());
        index
    }

    /// 索引一个源文件
    pub fn index_file(&mut self, file: &syn::File, module_path: &[String], display_path: &Path) {
        for depth in 1..=module_path.len() {
            self.modules.insert(module_path[..depth].to_vec());
        }

        let mut indexer = Indexer {
            index: self,
            file: display_path,
            module_path: module_path.to_vec(),
            body_depth: 0,
        };
        indexer.visit_file(file);
    }

    /// 全部类型声明，按语法顺序
    pub fn types(&self) -> &[TypeEntry] {
        &self.types
    }

    /// 全部 impl 块，按语法顺序
    pub fn impls(&self) -> &[ImplEntry] {
        &self.impls
    }

    /// 模块是否存在
    pub fn has_module(&self, path: &[String]) -> bool {
        self.modules.contains(path)
    }

    /// 模块中声明的类型
    pub fn type_at(&self, module_path: &[String], name: &str) -> Option<&TypeEntry> {
        self.type_lookup
            .get(&(module_path.to_vec(), name.to_string()))
            .map(|&i| &self.types[i])
    }

    /// 模块中声明的 trait
    pub fn trait_at(&self, module_path: &[String], name: &str) -> Option<&TraitEntry> {
        self.trait_lookup
            .get(&(module_path.to_vec(), name.to_string()))
            .map(|&i| &self.traits[i])
    }

    /// 模块中的 `use` 条目
    pub fn uses_in(&self, module_path: &[String]) -> &[UseEntry] {
        self.uses.get(module_path).map_or(&[], Vec::as_slice)
    }

    fn add_type(&mut self, entry: TypeEntry) {
        if !entry.local_scope {
            self.type_lookup
                .entry((entry.module_path.clone(), entry.declaration.name.clone()))
                .or_insert(self.types.len());
        }
        self.types.push(entry);
    }

    fn add_trait(&mut self, entry: TraitEntry) {
        self.trait_lookup
            .entry((entry.module_path.clone(), entry.name.clone()))
            .or_insert(self.traits.len());
        self.traits.push(entry);
    }
}

struct Indexer<'a> {
    index: &'a mut CrateIndex,
    file: &'a Path,
    module_path: Vec<String>,
    body_depth: usize,
}

impl Indexer<'_> {
    fn in_body<F: FnOnce(&mut Self)>(&mut self, f: F) {
        self.body_depth += 1;
        f(self);
        self.body_depth -= 1;
    }

    fn add_type(&mut self, ident: &syn::Ident, attrs: &[Attribute], generics: &Generics) {
        let declaration = TypeDeclaration {
            name: ident.to_string(),
            location: SourceLocation::of_ident(self.file, ident),
            attributes: attrs.iter().filter_map(attribute_data).collect(),
        };
        self.index.add_type(TypeEntry {
            declaration,
            module_path: self.module_path.clone(),
            generic_arity: generics.params.len(),
            local_scope: self.body_depth > 0,
        });
    }
}

impl<'ast> Visit<'ast> for Indexer<'_> {
    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        if self.body_depth > 0 {
            visit::visit_item_mod(self, node);
            return;
        }

        self.module_path.push(node.ident.to_string());
        self.index.modules.insert(self.module_path.clone());
        visit::visit_item_mod(self, node);
        self.module_path.pop();
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        self.in_body(|this| visit::visit_item_fn(this, node));
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        self.in_body(|this| visit::visit_impl_item_fn(this, node));
    }

    fn visit_trait_item_fn(&mut self, node: &'ast syn::TraitItemFn) {
        self.in_body(|this| visit::visit_trait_item_fn(this, node));
    }

    fn visit_item_const(&mut self, node: &'ast syn::ItemConst) {
        self.in_body(|this| visit::visit_item_const(this, node));
    }

    fn visit_item_static(&mut self, node: &'ast syn::ItemStatic) {
        self.in_body(|this| visit::visit_item_static(this, node));
    }

    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        self.add_type(&node.ident, &node.attrs, &node.generics);
        visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        self.add_type(&node.ident, &node.attrs, &node.generics);
        visit::visit_item_enum(self, node);
    }

    fn visit_item_trait(&mut self, node: &'ast syn::ItemTrait) {
        if self.body_depth == 0 {
            self.index.add_trait(TraitEntry {
                module_path: self.module_path.clone(),
                name: node.ident.to_string(),
                accessibility: accessibility(&node.vis),
                supertraits: supertraits(node),
                dyn_compatible: is_dyn_compatible(node),
            });
        }
        visit::visit_item_trait(self, node);
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        if let (Some((None, trait_path, _)), Type::Path(self_ty)) = (&node.trait_, &*node.self_ty) {
            if self_ty.qself.is_none() {
                self.index.impls.push(ImplEntry {
                    module_path: self.module_path.clone(),
                    trait_path: RawPath::from_syn(trait_path),
                    self_path: RawPath::from_syn(&self_ty.path),
                    type_params: node
                        .generics
                        .type_params()
                        .map(|param| param.ident.to_string())
                        .collect(),
                });
            }
        }
        visit::visit_item_impl(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        if self.body_depth == 0 {
            let mut entries = Vec::new();
            let prefix = RawPath {
                leading_colon: node.leading_colon.is_some(),
                segments: Vec::new(),
            };
            flatten_use_tree(prefix, &node.tree, &mut entries);
            self.index
                .uses
                .entry(self.module_path.clone())
                .or_default()
                .extend(entries);
        }
    }
}

/// 展开 `use` 树
fn flatten_use_tree(prefix: RawPath, tree: &syn::UseTree, out: &mut Vec<UseEntry>) {
    match tree {
        syn::UseTree::Path(path) => {
            let mut prefix = prefix;
            prefix.segments.push(path.ident.to_string());
            flatten_use_tree(prefix, &path.tree, out);
        }
        syn::UseTree::Name(name) => {
            push_alias(prefix, &name.ident, name.ident.to_string(), out);
        }
        syn::UseTree::Rename(rename) => {
            push_alias(prefix, &rename.ident, rename.rename.to_string(), out);
        }
        syn::UseTree::Glob(_) => out.push(UseEntry::Glob { target: prefix }),
        syn::UseTree::Group(group) => {
            for item in &group.items {
                flatten_use_tree(prefix.clone(), item, out);
            }
        }
    }
}

fn push_alias(prefix: RawPath, ident: &syn::Ident, alias: String, out: &mut Vec<UseEntry>) {
    // `use Trait as _;` 只引入 trait 方法，不引入名称
    if alias == "_" {
        return;
    }

    let mut target = prefix;
    let name = if ident == "self" {
        match target.segments.last() {
            Some(last) if alias == "self" => last.clone(),
            Some(_) => alias,
            None => return,
        }
    } else {
        target.segments.push(ident.to_string());
        alias
    };
    out.push(UseEntry::Alias { name, target });
}

/// 提取属性数据，文档注释不计入
pub fn attribute_data(attr: &Attribute) -> Option<AttributeData> {
    let name = attr.path().segments.last()?.ident.to_string();
    if name == "doc" {
        return None;
    }

    let mut data = AttributeData::new(name);
    match &attr.meta {
        Meta::Path(_) => {}
        Meta::List(list) => {
            match list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
                Ok(arguments) => data.arguments = arguments.iter().map(attribute_argument).collect(),
                Err(_) => data.malformed = true,
            }
        }
        Meta::NameValue(_) => data.malformed = true,
    }
    Some(data)
}

fn attribute_argument(expr: &Expr) -> AttributeArgument {
    if let Expr::Assign(assign) = expr {
        if let Expr::Path(left) = &*assign.left {
            if let Some(name) = left.path.get_ident() {
                return AttributeArgument {
                    name: Some(name.to_string()),
                    value: argument_value(&assign.right),
                };
            }
        }
    }

    AttributeArgument {
        name: None,
        value: argument_value(expr),
    }
}

fn argument_value(expr: &Expr) -> ArgumentValue {
    match expr {
        Expr::Path(path) if path.qself.is_none() => {
            let segments = &path.path.segments;
            let member = segments.last().map(|s| s.ident.to_string());
            let enum_name = segments
                .len()
                .checked_sub(2)
                .map(|i| segments[i].ident.to_string());
            match member {
                Some(member) => ArgumentValue::Path { enum_name, member },
                None => ArgumentValue::Other(String::new()),
            }
        }
        other => ArgumentValue::Other(other.to_token_stream().to_string()),
    }
}

fn accessibility(vis: &Visibility) -> Accessibility {
    match vis {
        Visibility::Public(_) => Accessibility::Public,
        Visibility::Restricted(_) => Accessibility::Restricted,
        Visibility::Inherited => Accessibility::Private,
    }
}

/// 父 trait：`trait A: B + C` 以及 `where Self: D`
fn supertraits(item: &ItemTrait) -> Vec<RawPath> {
    let mut paths: Vec<RawPath> = trait_bounds(&item.supertraits).collect();
    if let Some(where_clause) = &item.generics.where_clause {
        for predicate in &where_clause.predicates {
            if let WherePredicate::Type(predicate) = predicate {
                if is_self_type(&predicate.bounded_ty) {
                    paths.extend(trait_bounds(&predicate.bounds));
                }
            }
        }
    }
    paths.retain(|path| !is_sized_path(path));
    paths
}

fn trait_bounds<'a>(
    bounds: &'a Punctuated<TypeParamBound, Token![+]>,
) -> impl Iterator<Item = RawPath> + 'a {
    bounds.iter().filter_map(|bound| match bound {
        TypeParamBound::Trait(bound) if matches!(bound.modifier, syn::TraitBoundModifier::None) => {
            Some(RawPath::from_syn(&bound.path))
        }
        _ => None,
    })
}

fn is_sized_path(path: &RawPath) -> bool {
    path.segments.last().is_some_and(|last| last == "Sized")
}

fn is_self_type(ty: &Type) -> bool {
    matches!(ty, Type::Path(path) if path.qself.is_none() && path.path.is_ident("Self"))
}

/// 声明中 `where Self: Sized` 是否成立
fn requires_sized(generics: &Generics) -> bool {
    generics.where_clause.as_ref().is_some_and(|where_clause| {
        where_clause.predicates.iter().any(|predicate| match predicate {
            WherePredicate::Type(predicate) => {
                is_self_type(&predicate.bounded_ty)
                    && trait_bounds(&predicate.bounds).any(|path| is_sized_path(&path))
            }
            _ => false,
        })
    })
}

/// trait 自身能否作为 `dyn` 类型使用
///
/// 父 trait 的情况由解析阶段合并。
pub fn is_dyn_compatible(item: &ItemTrait) -> bool {
    if !item.generics.params.is_empty() {
        return false;
    }
    if trait_bounds(&item.supertraits).any(|path| is_sized_path(&path)) || requires_sized(&item.generics) {
        return false;
    }

    item.items.iter().all(|trait_item| match trait_item {
        TraitItem::Const(_) | TraitItem::Type(_) => false,
        TraitItem::Fn(method) => requires_sized(&method.sig.generics) || is_dispatchable(&method.sig),
        _ => true,
    })
}

fn is_dispatchable(sig: &Signature) -> bool {
    if sig.receiver().is_none() || sig.asyncness.is_some() {
        return false;
    }
    if sig
        .generics
        .params
        .iter()
        .any(|param| !matches!(param, GenericParam::Lifetime(_)))
    {
        return false;
    }

    let mut check = SignatureCheck::default();
    for input in &sig.inputs {
        if let syn::FnArg::Typed(arg) = input {
            check.visit_type(&arg.ty);
        }
    }
    if let ReturnType::Type(_, ty) = &sig.output {
        check.visit_type(ty);
    }
    !check.mentions_self && !check.impl_trait
}

/// 参数与返回类型中是否出现 `Self` 或 `impl Trait`
#[derive(Default)]
struct SignatureCheck {
    mentions_self: bool,
    impl_trait: bool,
}

impl<'ast> Visit<'ast> for SignatureCheck {
    fn visit_path(&mut self, path: &'ast syn::Path) {
        if path.segments.first().is_some_and(|first| first.ident == "Self") {
            self.mentions_self = true;
        }
        visit::visit_path(self, path);
    }

    fn visit_type_impl_trait(&mut self, node: &'ast syn::TypeImplTrait) {
        self.impl_trait = true;
        visit::visit_type_impl_trait(self, node);
    }
}
