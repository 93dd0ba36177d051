//! 调用点收集

use crate::semantic::{InvocationSite, SourceLocation};
use std::path::Path;
use syn::visit::{self, Visit};

/// 收集文件中的全部方法调用和函数调用，按语法顺序
pub fn collect_calls(file: &syn::File, module_path: &[String], display_path: &Path) -> Vec<InvocationSite> {
    let mut collector = CallCollector {
        file: display_path,
        module_path: module_path.to_vec(),
        functions: Vec::new(),
        sites: Vec::new(),
    };
    collector.visit_file(file);
    collector.sites
}

struct CallCollector<'a> {
    file: &'a Path,
    module_path: Vec<String>,
    functions: Vec<String>,
    sites: Vec<InvocationSite>,
}

impl CallCollector<'_> {
    fn in_function<F: FnOnce(&mut Self)>(&mut self, ident: &syn::Ident, f: F) {
        self.functions.push(ident.to_string());
        f(self);
        self.functions.pop();
    }

    fn record(&mut self, callee: &syn::Ident) {
        self.sites.push(InvocationSite {
            callee: callee.to_string(),
            location: SourceLocation::of_ident(self.file, callee),
            enclosing_function: self.functions.last().cloned(),
            module_path: self.module_path.clone(),
        });
    }
}

impl<'ast> Visit<'ast> for CallCollector<'_> {
    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        // 函数体内的模块无法从外部命名，其中的调用不作为锚点
        if !self.functions.is_empty() {
            return;
        }

        self.module_path.push(node.ident.to_string());
        visit::visit_item_mod(self, node);
        self.module_path.pop();
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        self.in_function(&node.sig.ident, |this| visit::visit_item_fn(this, node));
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        self.in_function(&node.sig.ident, |this| visit::visit_impl_item_fn(this, node));
    }

    fn visit_trait_item_fn(&mut self, node: &'ast syn::TraitItemFn) {
        self.in_function(&node.sig.ident, |this| visit::visit_trait_item_fn(this, node));
    }

    fn visit_expr_method_call(&mut self, node: &'ast syn::ExprMethodCall) {
        self.record(&node.method);
        visit::visit_expr_method_call(self, node);
    }

    fn visit_expr_call(&mut self, node: &'ast syn::ExprCall) {
        if let syn::Expr::Path(path) = &*node.func {
            if let Some(last) = path.path.segments.last() {
                self.record(&last.ident);
            }
        }
        visit::visit_expr_call(self, node);
    }
}
