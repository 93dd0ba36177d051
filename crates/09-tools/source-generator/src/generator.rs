//! 生成器驱动
//!
//! 两个阶段：[`SourceGenerator::install_static_definitions`] 无条件发布标记定义文件；
//! [`SourceGenerator::generate`] 对一个编译单元快照执行一轮生成，结果完全在内存中构建。
//! 一轮生成要么发布完整的注册文件，要么不发布（并删除上一轮遗留的文件）。

use crate::discovery::discover_services;
use crate::emission::{
    marker_definitions, render, GeneratedNames, Placement, RegistrationPlan, RegistrationSource,
};
use crate::semantic::{Namespace, SemanticModel};
use crate::sink::GenerationSink;
use infrastructure_common::{GeneratorError, GeneratorOptions, GeneratorResult};
use std::collections::BTreeMap;
use tracing::{debug, error, info};

/// 标记定义文件名
pub const MARKERS_FILE_NAME: &str = "di_markers.g.rs";

/// 注册代码文件名
pub const REGISTRATIONS_FILE_NAME: &str = "discovered_services.g.rs";

/// 一轮生成的输出：文件名到源码文本
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOutput {
    sources: BTreeMap<String, String>,
}

impl GenerationOutput {
    /// 添加文件
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(name.into(), text.into());
    }

    /// 按文件名获取文本
    pub fn get(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    /// 注册代码文本
    pub fn registrations(&self) -> Option<&str> {
        self.get(REGISTRATIONS_FILE_NAME)
    }

    /// 是否没有任何文件
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// 按文件名顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }
}

/// 服务注册代码生成器
///
/// 生成器在两次调用之间只保留配置和不可变的标记定义文本。
#[derive(Debug, Clone)]
pub struct SourceGenerator {
    options: GeneratorOptions,
    marker_source: String,
}

impl SourceGenerator {
    /// 创建生成器
    pub fn new(options: GeneratorOptions) -> Self {
        let marker_source = marker_definitions(&options.macros_crate);
        Self {
            options,
            marker_source,
        }
    }

    /// 标记定义文本
    pub fn marker_source(&self) -> &str {
        &self.marker_source
    }

    /// 发布标记定义文件
    ///
    /// 与分类结果无关，必须在任何分类之前调用。
    pub fn install_static_definitions(&self, sink: &mut dyn GenerationSink) -> GeneratorResult<()> {
        sink.add_source(MARKERS_FILE_NAME, &self.marker_source)?;
        debug!("已发布标记定义文件: {}", MARKERS_FILE_NAME);
        Ok(())
    }

    /// 触发方法名
    pub fn trigger_method(&self, names: &GeneratedNames) -> String {
        self.options
            .trigger_method
            .clone()
            .unwrap_or_else(|| names.extension_method.clone())
    }

    /// 对编译单元执行一轮生成
    ///
    /// 没有分类出任何服务时输出为空；标记目标无法解析或缺少编译单元标识时返回错误。
    pub fn generate(&self, model: &dyn SemanticModel) -> GeneratorResult<GenerationOutput> {
        let services = discover_services(model)?;
        let mut output = GenerationOutput::default();
        if services.is_empty() {
            info!("未发现任何服务，不生成注册代码");
            return Ok(output);
        }

        let identity = model
            .assembly_name()
            .ok_or(GeneratorError::MissingCompilationIdentity)?;
        let names = GeneratedNames::from_identity(identity)?;

        let trigger = self.trigger_method(&names);
        let anchor = find_anchor(model, &trigger);
        let placement = Placement::for_anchor(anchor);
        match &placement {
            Placement::Global => debug!("注册代码放置在全局作用域"),
            Placement::Namespaced(namespace) => debug!("注册代码放置在 {}", namespace),
        }

        let plan = RegistrationPlan::from_classified(&services);
        let source = RegistrationSource {
            names: &names,
            plan: &plan,
            registry_trait: &self.options.registry_trait,
        };
        output.insert(REGISTRATIONS_FILE_NAME, render(&source, &placement));

        info!(
            "已生成 {} 个服务的注册代码，共 {} 条注册",
            services.len(),
            plan.len()
        );
        Ok(output)
    }

    /// 发布一轮生成的结果
    ///
    /// 成功时发布输出中的全部文件，并删除输出中没有的注册文件；
    /// 失败时只删除上一轮遗留的注册文件，标记定义文件不受影响。
    pub fn complete_pass(
        &self,
        result: GeneratorResult<GenerationOutput>,
        sink: &mut dyn GenerationSink,
    ) -> GeneratorResult<GenerationOutput> {
        match result {
            Ok(output) => {
                for (name, text) in output.iter() {
                    sink.add_source(name, text)?;
                }
                if output.registrations().is_none() {
                    sink.remove_source(REGISTRATIONS_FILE_NAME)?;
                }
                Ok(output)
            }
            Err(e) => {
                error!("本轮生成失败: {}", e);
                sink.remove_source(REGISTRATIONS_FILE_NAME)?;
                Err(e)
            }
        }
    }

    /// 完整执行一轮：发布标记定义，生成并发布注册代码
    pub fn run_pass(
        &self,
        model: &dyn SemanticModel,
        sink: &mut dyn GenerationSink,
    ) -> GeneratorResult<GenerationOutput> {
        self.install_static_definitions(sink)?;
        let result = self.generate(model);
        self.complete_pass(result, sink)
    }
}

impl Default for SourceGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

/// 锚点：第一个位于函数体内的触发方法调用所在的命名空间
fn find_anchor(model: &dyn SemanticModel, trigger: &str) -> Option<Namespace> {
    let anchor = model
        .invocations(trigger)
        .iter()
        .find_map(|site| model.enclosing_namespace(site));

    if anchor.is_none() {
        debug!("未找到 {} 的调用点", trigger);
    }
    anchor
}
