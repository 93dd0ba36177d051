//! 注册代码渲染
//!
//! 全局与命名空间两种放置方式各有独立的模板，共用同一个条目写出函数和记录序列。

use super::naming::{wrapper_module_name, GeneratedNames};
use super::records::RegistrationPlan;
use crate::semantic::Namespace;

/// 每级缩进的空格数
pub const INDENT_WIDTH: usize = 4;

/// 生成文件头
pub const AUTO_GENERATED_HEADER: [&str; 3] = [
    "// <auto-generated>",
    "// 由 di-source-generator 生成，请勿手动修改。",
    "// </auto-generated>",
];

/// 按缩进级别输出代码行
///
/// 空行不缩进，也不带行尾空白。
#[derive(Debug, Default)]
pub struct CodeWriter {
    buffer: String,
    level: usize,
}

impl CodeWriter {
    /// 创建写出器
    pub fn new() -> Self {
        Self::default()
    }

    /// 输出一行，空文本输出空行
    pub fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.level * INDENT_WIDTH {
                self.buffer.push(' ');
            }
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
    }

    /// 输出空行
    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// 输出 `header {`，在下一级缩进中执行 `body`，再输出 `}`
    pub fn block(&mut self, header: &str, body: impl FnOnce(&mut Self)) {
        self.line(&format!("{header} {{"));
        self.level += 1;
        body(self);
        self.level -= 1;
        self.line("}");
    }

    /// 当前缩进级别
    pub fn level(&self) -> usize {
        self.level
    }

    /// 取出输出文本
    pub fn finish(self) -> String {
        self.buffer
    }
}

/// 生成代码的放置方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// 放在包含文件的位置，不包装
    Global,
    /// 包装在以锚点命名空间命名的模块中
    Namespaced(Namespace),
}

impl Placement {
    /// 由锚点命名空间确定放置方式
    ///
    /// 没有锚点或锚点位于 crate 根时回退为全局放置。
    pub fn for_anchor(anchor: Option<Namespace>) -> Self {
        match anchor {
            Some(namespace) if !namespace.is_global() => Self::Namespaced(namespace),
            _ => Self::Global,
        }
    }
}

/// 渲染输入
#[derive(Debug, Clone, Copy)]
pub struct RegistrationSource<'a> {
    /// 生成名称
    pub names: &'a GeneratedNames,
    /// 注册记录
    pub plan: &'a RegistrationPlan,
    /// 注册接口路径
    pub registry_trait: &'a str,
}

/// 按放置方式渲染注册文件
pub fn render(source: &RegistrationSource<'_>, placement: &Placement) -> String {
    match placement {
        Placement::Global => render_global(source),
        Placement::Namespaced(namespace) => render_namespaced(source, namespace),
    }
}

/// 全局模板
pub fn render_global(source: &RegistrationSource<'_>) -> String {
    let mut writer = CodeWriter::new();
    write_header(&mut writer);
    writer.blank_line();
    write_items(&mut writer, source);
    writer.finish()
}

/// 命名空间模板
pub fn render_namespaced(source: &RegistrationSource<'_>, namespace: &Namespace) -> String {
    let wrapper = wrapper_module_name(namespace);

    let mut writer = CodeWriter::new();
    write_header(&mut writer);
    writer.blank_line();
    writer.line("#[allow(unused_imports)]");
    writer.line(&format!("pub use self::{wrapper}::*;"));
    writer.blank_line();
    writer.line(&format!("/// `{namespace}` 中生成的服务发现入口"));
    writer.block(&format!("pub mod {wrapper}"), |writer| {
        write_items(writer, source);
    });
    writer.finish()
}

/// 写出生成文件头
pub fn write_header(writer: &mut CodeWriter) {
    for line in AUTO_GENERATED_HEADER {
        writer.line(line);
    }
}

fn write_items(writer: &mut CodeWriter, source: &RegistrationSource<'_>) {
    let names = source.names;
    let registry = source.registry_trait;
    let identity = &names.identity;

    writer.line(&format!("/// 注册 `{identity}` 中发现的全部服务"));
    writer.line("#[allow(non_camel_case_types, non_snake_case)]");
    writer.block(&format!("pub trait {}", names.extension_trait), |writer| {
        writer.line(&format!("/// 注册 `{identity}` 中发现的全部服务"));
        writer.line(&format!("fn {}(&mut self) -> &mut Self;", names.extension_method));
    });
    writer.blank_line();

    writer.block(
        &format!("impl<R: {registry}> {} for R", names.extension_trait),
        |writer| {
            writer.block(
                &format!("fn {}(&mut self) -> &mut Self", names.extension_method),
                |writer| {
                    writer.line(&format!("{}(self);", names.internal_routine));
                    writer.line("self");
                },
            );
        },
    );
    writer.blank_line();

    writer.line("#[allow(non_camel_case_types, non_snake_case)]");
    writer.block(
        &format!("fn {}<R: {registry}>(services: &mut R)", names.internal_routine),
        |writer| {
            for record in source.plan.records() {
                writer.line(&record.statement());
            }
        },
    );
    writer.blank_line();

    writer.line(&format!("/// `{identity}` 服务发现入口"));
    writer.line("#[allow(non_camel_case_types, non_snake_case)]");
    writer.line(&format!("pub struct {};", names.discoverer));
    writer.blank_line();

    writer.block(&format!("impl {}", names.discoverer), |writer| {
        writer.line(&format!("/// 注册 `{identity}` 中发现的全部服务"));
        writer.block(
            &format!("pub fn discover<R: {registry}>(services: &mut R)"),
            |writer| {
                writer.line(&format!("services.{}();", names.extension_method));
            },
        );
    });
}
