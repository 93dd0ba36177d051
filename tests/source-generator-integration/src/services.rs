//! 带注入标记的服务

use crate::contracts::{Auditable, Clock, Duplicate, Handler, Named, Notifier, Repository};
use crate::{inject, scoped, singleton, transient};

/// 系统时钟
#[singleton]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        1_700_000_000
    }
}

/// SQL 订单仓储
#[scoped]
pub struct SqlRepository;

impl Repository for SqlRepository {
    fn find(&self, id: u32) -> Option<String> {
        (id > 0).then(|| format!("order-{id}"))
    }
}

impl Named for SqlRepository {
    fn name(&self) -> &'static str {
        "sql"
    }
}

impl Auditable for SqlRepository {
    fn audit_log(&self) -> Vec<String> {
        Vec::new()
    }
}

/// 邮件通知
#[transient]
#[derive(Debug, Clone)]
pub struct EmailNotifier;

impl Notifier for EmailNotifier {
    fn notify(&self, message: &str) -> bool {
        !message.is_empty()
    }
}

impl Duplicate for EmailNotifier {
    fn duplicate(&self) -> Self {
        self.clone()
    }
}

impl Handler<String> for EmailNotifier {
    fn handle(&self, message: String) {
        self.notify(&message);
    }
}

/// 工作单元
#[inject(ServiceLifetime::Scoped)]
pub struct UnitOfWork;

/// 应用设置
#[inject]
pub struct Settings;

/// 指标收集，专用标记优先
#[singleton]
#[inject(lifetime = ServiceLifetime::Transient)]
pub struct Metrics;

/// 泛型缓存，不参与注册
#[transient]
pub struct Cache<T>(pub Vec<T>);

/// 未标记的时钟，不参与注册
pub struct ManualClock;

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        0
    }
}

/// 报表
pub mod reporting {
    use crate::contracts::Named;
    use crate::transient;

    /// 报表构建器
    #[transient]
    pub struct ReportBuilder;

    impl Named for ReportBuilder {
        fn name(&self) -> &'static str {
            "report"
        }
    }
}
