//! 构建脚本生成的注册代码端到端测试

use di_impl::ServiceCollection;
use infrastructure_common::Lifetime;
use source_generator_integration_tests::contracts::{Clock, Named, Notifier, Repository};
use source_generator_integration_tests::services::reporting::ReportBuilder;
use source_generator_integration_tests::services::{
    EmailNotifier, ManualClock, Metrics, Settings, SqlRepository, SystemClock, UnitOfWork,
};
use source_generator_integration_tests::startup::{
    configure_services, source_generator_integration_tests_Discoverer,
    DiscoverIn_source_generator_integration_tests,
};

#[test]
fn test_dedicated_markers_set_lifetime() {
    let services = configure_services();

    assert_eq!(services.lifetime_of::<SystemClock>(), Some(Lifetime::Singleton));
    assert_eq!(services.lifetime_of::<SqlRepository>(), Some(Lifetime::Scoped));
    assert_eq!(services.lifetime_of::<EmailNotifier>(), Some(Lifetime::Transient));
    assert_eq!(services.lifetime_of::<ReportBuilder>(), Some(Lifetime::Transient));
}

#[test]
fn test_inject_marker_lifetime() {
    let services = configure_services();

    assert_eq!(services.lifetime_of::<UnitOfWork>(), Some(Lifetime::Scoped));
    assert_eq!(services.lifetime_of::<Settings>(), Some(Lifetime::Singleton));
    assert_eq!(services.lifetime_of::<Metrics>(), Some(Lifetime::Singleton));
}

#[test]
fn test_unmarked_and_generic_types_are_not_registered() {
    let services = configure_services();

    assert!(!services.is_registered::<ManualClock>());
    assert_eq!(services.implementations_of::<dyn Clock>().len(), 1);
}

#[test]
fn test_contracts_are_registered_as_trait_objects() {
    let services = configure_services();

    assert_eq!(services.lifetime_of::<dyn Clock>(), Some(Lifetime::Singleton));
    assert_eq!(services.lifetime_of::<dyn Repository>(), Some(Lifetime::Scoped));
    assert_eq!(services.lifetime_of::<dyn Notifier>(), Some(Lifetime::Transient));

    let named = services.implementations_of::<dyn Named>();
    assert_eq!(named.len(), 2);
    assert!(named[0].ends_with("SqlRepository"));
    assert!(named[1].ends_with("ReportBuilder"));
}

#[test]
fn test_registration_order_and_count() {
    let services = configure_services();
    let descriptors = services.descriptors();

    // 7 个自注册 + Clock、Repository、Named、Auditable、Notifier、Named
    assert_eq!(descriptors.len(), 13);
    assert!(descriptors[0].is_self_registration());
    assert!(descriptors[0].implementation_type_name.ends_with("SystemClock"));
    assert!(!descriptors[1].is_self_registration());
    assert!(descriptors[2].implementation_type_name.ends_with("SqlRepository"));
    assert!(descriptors[12].implementation_type_name.ends_with("ReportBuilder"));
}

#[test]
fn test_discoverer_matches_extension_method() {
    let mut via_trait = ServiceCollection::new();
    via_trait.discover_in_source_generator_integration_tests();

    let mut via_discoverer = ServiceCollection::new();
    source_generator_integration_tests_Discoverer::discover(&mut via_discoverer);

    let names = |services: &ServiceCollection| {
        services
            .descriptors()
            .iter()
            .map(|d| (d.service_type_name, d.implementation_type_name, d.lifetime))
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&via_trait), names(&via_discoverer));
}

#[test]
fn test_extension_method_chains() {
    let mut services = ServiceCollection::new();
    services
        .discover_in_source_generator_integration_tests()
        .discover_in_source_generator_integration_tests();

    assert_eq!(services.len(), 26);
}
