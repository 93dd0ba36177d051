//! 标记定义文件
//!
//! 与分类结果无关，每轮生成开始时无条件输出。

use super::render::{write_header, CodeWriter};
use infrastructure_common::Lifetime;

/// 生命周期枚举名
pub const LIFETIME_ENUM: &str = crate::discovery::LIFETIME_ENUM_NAME;

/// 渲染标记定义
///
/// 重新导出四个标记属性宏，并声明 `ServiceLifetime` 枚举，判定值依次为 0、1、2。
pub fn marker_definitions(macros_crate: &str) -> String {
    let mut writer = CodeWriter::new();
    write_header(&mut writer);
    writer.blank_line();

    writer.line("#[allow(unused_imports)]");
    writer.line(&format!(
        "pub use ::{macros_crate}::{{inject, scoped, singleton, transient}};"
    ));
    writer.blank_line();

    writer.line("/// `#[inject]` 标记可选的生命周期参数");
    writer.line("#[allow(dead_code)]");
    writer.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
    writer.block(&format!("pub enum {LIFETIME_ENUM}"), |writer| {
        for lifetime in Lifetime::ALL {
            writer.line(&format!("/// {}", variant_doc(lifetime)));
            writer.line(&format!(
                "{} = {},",
                lifetime.variant_name(),
                lifetime.discriminant()
            ));
        }
    });

    writer.finish()
}

fn variant_doc(lifetime: Lifetime) -> &'static str {
    match lifetime {
        Lifetime::Singleton => "单例，容器生命周期内只有一个实例",
        Lifetime::Scoped => "作用域，同一作用域内共享实例",
        Lifetime::Transient => "瞬时，每次请求创建新实例",
    }
}
