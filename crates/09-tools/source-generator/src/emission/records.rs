//! 注册记录
//!
//! 分类结果先转换为有序的注册记录序列，再交给渲染步骤统一输出。

use crate::discovery::ClassifiedType;
use infrastructure_common::{Lifetime, QualifiedName};

/// 单条注册记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    /// 生命周期
    pub lifetime: Lifetime,
    /// 契约，自注册时为空
    pub service: Option<QualifiedName>,
    /// 实现类型
    pub implementation: QualifiedName,
}

impl RegistrationRecord {
    /// 自注册记录
    pub fn self_registration(lifetime: Lifetime, implementation: QualifiedName) -> Self {
        Self {
            lifetime,
            service: None,
            implementation,
        }
    }

    /// 契约注册记录
    pub fn contract(lifetime: Lifetime, service: QualifiedName, implementation: QualifiedName) -> Self {
        Self {
            lifetime,
            service: Some(service),
            implementation,
        }
    }

    /// 渲染为一条注册语句
    pub fn statement(&self) -> String {
        match &self.service {
            None => format!(
                "services.add_{}::<{}>();",
                self.lifetime,
                self.implementation.to_path()
            ),
            Some(service) => format!(
                "services.add_{}_as::<dyn {}, {}>();",
                self.lifetime,
                service.to_path(),
                self.implementation.to_path()
            ),
        }
    }
}

/// 注册计划：按发现顺序排列的全部注册记录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationPlan {
    records: Vec<RegistrationRecord>,
}

impl RegistrationPlan {
    /// 由分类结果构建
    ///
    /// 每个服务先有一条自注册记录，紧随其后是每个契约一条记录。
    pub fn from_classified(services: &[ClassifiedType]) -> Self {
        let records = services
            .iter()
            .flat_map(|service| {
                let implementation = &service.candidate.name;
                std::iter::once(RegistrationRecord::self_registration(
                    service.lifetime,
                    implementation.clone(),
                ))
                .chain(service.contracts.iter().map(|contract| {
                    RegistrationRecord::contract(
                        service.lifetime,
                        contract.name.clone(),
                        implementation.clone(),
                    )
                }))
            })
            .collect();

        Self { records }
    }

    /// 由已排好序的记录构建
    pub fn from_records(records: Vec<RegistrationRecord>) -> Self {
        Self { records }
    }

    /// 全部注册记录
    pub fn records(&self) -> &[RegistrationRecord] {
        &self.records
    }

    /// 记录数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
