//! # DI Source Generator
//!
//! 构建期服务发现：在 crate 源码中查找带有注入标记的类型，
//! 生成向 [`ServiceRegistry`](https://docs.rs/di-abstractions) 注册这些类型的代码。
//!
//! ## 流程
//!
//! 1. [`frontend`] 解析源码，提供只读的 [`SemanticModel`]
//! 2. [`discovery`] 按标记优先级确定生命周期，按可见性筛选契约
//! 3. [`emission`] 把分类结果转换为注册记录，再渲染为源码文本
//! 4. [`generator`] 驱动整轮生成，通过 [`sink`] 发布文件
//!
//! ## 标记
//!
//! | 标记 | 生命周期 |
//! |------|----------|
//! | `#[singleton]` | 单例 |
//! | `#[scoped]` | 作用域 |
//! | `#[transient]` | 瞬时 |
//! | `#[inject]` / `#[inject(ServiceLifetime::X)]` | 参数指定，缺省为单例 |
//!
//! 多个标记同时存在时，专用标记优先于 `#[inject]`：单例 > 作用域 > 瞬时 > `#[inject]`。
//!
//! ## 生成的入口
//!
//! 以 crate `order-service` 为例：
//!
//! ```rust,ignore
//! let mut services = ServiceCollection::new();
//! services.discover_in_order_service();
//! // 或
//! order_service_Discoverer::discover(&mut services);
//! ```

pub mod build_script;
pub mod discovery;
pub mod emission;
pub mod frontend;
pub mod generator;
pub mod semantic;
pub mod sink;

pub use discovery::{discover_services, ClassifiedType, LifetimeTier, Marker};
pub use frontend::{SourceCompilation, SourceCompilationBuilder};
pub use generator::{GenerationOutput, SourceGenerator, MARKERS_FILE_NAME, REGISTRATIONS_FILE_NAME};
pub use semantic::{
    ArgumentValue, AttributeArgument, AttributeData, CandidateType, Contract, InvocationSite,
    Namespace, SemanticModel, SourceLocation, TypeDeclaration,
};
pub use sink::{GenerationSink, InMemorySink, OutDirSink};

pub use infrastructure_common::{GeneratorError, GeneratorOptions, GeneratorResult, Lifetime};
