//! 服务注册接口
//!
//! 生成代码只依赖这里的三类注册操作，每类操作有自注册
//! （一个类型参数）和契约注册（两个类型参数）两种形式。

use infrastructure_common::Lifetime;
use std::any::{type_name, TypeId};

/// 服务注册记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceDescriptor {
    /// 服务类型ID（契约或实现本身）
    pub service_type: TypeId,
    /// 服务类型名称
    pub service_type_name: &'static str,
    /// 实现类型ID
    pub implementation_type: TypeId,
    /// 实现类型名称
    pub implementation_type_name: &'static str,
    /// 生命周期
    pub lifetime: Lifetime,
}

impl ServiceDescriptor {
    /// 自注册：服务类型即实现类型
    pub fn of<T: 'static>(lifetime: Lifetime) -> Self {
        Self::contract::<T, T>(lifetime)
    }

    /// 契约注册：以契约 `C` 暴露实现 `T`
    pub fn contract<C: ?Sized + 'static, T: 'static>(lifetime: Lifetime) -> Self {
        Self {
            service_type: TypeId::of::<C>(),
            service_type_name: type_name::<C>(),
            implementation_type: TypeId::of::<T>(),
            implementation_type_name: type_name::<T>(),
            lifetime,
        }
    }

    /// 是否为自注册
    pub fn is_self_registration(&self) -> bool {
        self.service_type == self.implementation_type
    }
}

/// 服务注册接口
///
/// 实现者只需提供 [`ServiceRegistry::register`]，其余方法按生命周期构造注册记录。
pub trait ServiceRegistry {
    /// 记录一条注册
    fn register(&mut self, descriptor: ServiceDescriptor);

    /// 注册单例服务
    fn add_singleton<T: 'static>(&mut self) {
        self.register(ServiceDescriptor::of::<T>(Lifetime::Singleton));
    }

    /// 以契约注册单例服务
    fn add_singleton_as<C: ?Sized + 'static, T: 'static>(&mut self) {
        self.register(ServiceDescriptor::contract::<C, T>(Lifetime::Singleton));
    }

    /// 注册作用域服务
    fn add_scoped<T: 'static>(&mut self) {
        self.register(ServiceDescriptor::of::<T>(Lifetime::Scoped));
    }

    /// 以契约注册作用域服务
    fn add_scoped_as<C: ?Sized + 'static, T: 'static>(&mut self) {
        self.register(ServiceDescriptor::contract::<C, T>(Lifetime::Scoped));
    }

    /// 注册瞬时服务
    fn add_transient<T: 'static>(&mut self) {
        self.register(ServiceDescriptor::of::<T>(Lifetime::Transient));
    }

    /// 以契约注册瞬时服务
    fn add_transient_as<C: ?Sized + 'static, T: 'static>(&mut self) {
        self.register(ServiceDescriptor::contract::<C, T>(Lifetime::Transient));
    }
}
