//! # 依赖注入具体实现
//!
//! 提供按注册顺序记录服务的 [`ServiceCollection`]，
//! 作为生成的发现代码的默认注册目标。

use di_abstractions::{ServiceDescriptor, ServiceRegistry};
use infrastructure_common::Lifetime;
use std::any::TypeId;
use tracing::{debug, warn};

/// 服务集合
///
/// 保留全部注册记录及其顺序，不做去重；同一服务的后一条注册覆盖前一条的解析结果。
#[derive(Debug, Default, Clone)]
pub struct ServiceCollection {
    /// 注册记录
    descriptors: Vec<ServiceDescriptor>,
}

impl ServiceCollection {
    /// 创建空的服务集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部注册记录
    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    /// 注册记录数量
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// 服务是否已注册（自注册或契约注册）
    pub fn is_registered<S: ?Sized + 'static>(&self) -> bool {
        self.find::<S>().is_some()
    }

    /// 服务最终生效的生命周期
    pub fn lifetime_of<S: ?Sized + 'static>(&self) -> Option<Lifetime> {
        self.find::<S>().map(|descriptor| descriptor.lifetime)
    }

    /// 以契约 `C` 注册的全部实现类型名称，按注册顺序
    pub fn implementations_of<C: ?Sized + 'static>(&self) -> Vec<&'static str> {
        let service_type = TypeId::of::<C>();
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.service_type == service_type)
            .map(|descriptor| descriptor.implementation_type_name)
            .collect()
    }

    /// 查找服务最后一条注册
    fn find<S: ?Sized + 'static>(&self) -> Option<&ServiceDescriptor> {
        let service_type = TypeId::of::<S>();
        self.descriptors
            .iter()
            .rev()
            .find(|descriptor| descriptor.service_type == service_type)
    }
}

impl ServiceRegistry for ServiceCollection {
    fn register(&mut self, descriptor: ServiceDescriptor) {
        if self.is_registered_exactly(&descriptor) {
            warn!(
                "服务重复注册: {} -> {} ({})",
                descriptor.service_type_name,
                descriptor.implementation_type_name,
                descriptor.lifetime
            );
        }

        debug!(
            "注册服务: {} -> {} ({})",
            descriptor.service_type_name, descriptor.implementation_type_name, descriptor.lifetime
        );
        self.descriptors.push(descriptor);
    }
}

impl ServiceCollection {
    fn is_registered_exactly(&self, descriptor: &ServiceDescriptor) -> bool {
        self.descriptors.iter().any(|existing| {
            existing.service_type == descriptor.service_type
                && existing.implementation_type == descriptor.implementation_type
        })
    }
}
