//! 服务契约

/// 时钟
pub trait Clock {
    /// 当前时间戳
    fn now(&self) -> u64;
}

/// 具名服务
pub trait Named {
    /// 服务名称
    fn name(&self) -> &'static str;
}

/// 订单仓储
pub trait Repository: Named {
    /// 按编号查找订单
    fn find(&self, id: u32) -> Option<String>;
}

/// 审计记录，仅在本 crate 内可见
pub(crate) trait Auditable {
    fn audit_log(&self) -> Vec<String>;
}

/// 通知发送
pub trait Notifier {
    /// 发送消息
    fn notify(&self, message: &str) -> bool;
}

/// 复制自身，不能作为 trait 对象
pub trait Duplicate {
    /// 返回副本
    fn duplicate(&self) -> Self;
}

/// 带类型参数的处理器，不能作为契约
pub trait Handler<M> {
    /// 处理消息
    fn handle(&self, message: M);
}
