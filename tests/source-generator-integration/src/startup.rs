//! 启动配置

include!(concat!(env!("OUT_DIR"), "/discovered_services.g.rs"));

use di_impl::ServiceCollection;

/// 构建包含全部已发现服务的服务集合
pub fn configure_services() -> ServiceCollection {
    let mut services = ServiceCollection::new();
    services.discover_in_source_generator_integration_tests();
    services
}
