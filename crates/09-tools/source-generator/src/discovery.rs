//! 服务发现与分类
//!
//! 从语义模型中筛选带有注入标记的类型，为每个类型确定唯一的生命周期，
//! 并按可见性规则筛选可注册的契约。

use crate::semantic::{
    ArgumentValue, AttributeData, CandidateType, Contract, SemanticModel, TypeDeclaration,
};
use infrastructure_common::{GeneratorError, GeneratorResult, Lifetime, ModuleId};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// `#[inject]` 参数所属的枚举名
pub const LIFETIME_ENUM_NAME: &str = "ServiceLifetime";

/// `#[inject]` 命名参数的名称
pub const LIFETIME_ARGUMENT_NAME: &str = "lifetime";

/// 注入标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `#[singleton]`
    Singleton,
    /// `#[scoped]`
    Scoped,
    /// `#[transient]`
    Transient,
    /// `#[inject(..)]`，参数缺失或不是 `ServiceLifetime` 成员时为空
    Inject(Option<Lifetime>),
}

impl Marker {
    /// 识别属性对应的标记
    pub fn from_attribute(attribute: &AttributeData) -> Option<Self> {
        match attribute.name.as_str() {
            "singleton" => Some(Self::Singleton),
            "scoped" => Some(Self::Scoped),
            "transient" => Some(Self::Transient),
            "inject" => Some(Self::Inject(inject_argument(attribute))),
            _ => None,
        }
    }
}

/// 解析 `#[inject]` 的唯一参数
///
/// 只有一个参数、且为 `ServiceLifetime::<成员>` 形式时才有值。
fn inject_argument(attribute: &AttributeData) -> Option<Lifetime> {
    if attribute.malformed {
        return None;
    }

    let [argument] = attribute.arguments.as_slice() else {
        return None;
    };

    if let Some(name) = &argument.name {
        if name != LIFETIME_ARGUMENT_NAME {
            return None;
        }
    }

    match &argument.value {
        ArgumentValue::Path {
            enum_name: Some(enum_name),
            member,
        } if enum_name == LIFETIME_ENUM_NAME => Lifetime::from_variant_name(member),
        _ => None,
    }
}

/// 生命周期分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifetimeTier {
    /// 没有可识别的标记，不参与生成
    None,
    /// 单例
    Singleton,
    /// 作用域
    Scoped,
    /// 瞬时
    Transient,
}

impl LifetimeTier {
    /// 按优先级确定生命周期
    ///
    /// 专用标记优先于通用标记：单例 > 作用域 > 瞬时 > `#[inject]`。
    /// `#[inject]` 参数缺失、不合法或为零值时为单例。
    pub fn resolve(markers: &[Marker]) -> Self {
        if markers.contains(&Marker::Singleton) {
            return Self::Singleton;
        }
        if markers.contains(&Marker::Scoped) {
            return Self::Scoped;
        }
        if markers.contains(&Marker::Transient) {
            return Self::Transient;
        }

        markers
            .iter()
            .find_map(|marker| match marker {
                Marker::Inject(argument) => Some(argument.unwrap_or(Lifetime::Singleton)),
                _ => None,
            })
            .map_or(Self::None, Self::from)
    }

    /// 对应的生命周期，`None` 层级没有生命周期
    pub fn lifetime(self) -> Option<Lifetime> {
        match self {
            Self::None => None,
            Self::Singleton => Some(Lifetime::Singleton),
            Self::Scoped => Some(Lifetime::Scoped),
            Self::Transient => Some(Lifetime::Transient),
        }
    }
}

impl From<Lifetime> for LifetimeTier {
    fn from(lifetime: Lifetime) -> Self {
        match lifetime {
            Lifetime::Singleton => Self::Singleton,
            Lifetime::Scoped => Self::Scoped,
            Lifetime::Transient => Self::Transient,
        }
    }
}

/// 属性列表中的全部标记
pub fn markers_of(attributes: &[AttributeData]) -> Vec<Marker> {
    attributes.iter().filter_map(Marker::from_attribute).collect()
}

/// 分类完成的服务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedType {
    /// 候选类型
    pub candidate: CandidateType,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 可注册的契约，按发现顺序
    pub contracts: Vec<Contract>,
}

/// 契约是否可注册
///
/// 公开契约总是可注册；非公开契约只有声明在当前编译单元所在模块时才可注册。
pub fn is_contract_visible(contract: &Contract, source_module: &ModuleId) -> bool {
    contract.accessibility.is_public() || contract.module == *source_module
}

/// 筛选候选类型的可注册契约
///
/// 契约以 `dyn` 形式注册，因此还必须能作为 `dyn` 类型使用。重复的契约只保留第一次出现。
pub fn eligible_contracts(candidate: &CandidateType, source_module: &ModuleId) -> Vec<Contract> {
    let mut seen = HashSet::new();
    candidate
        .contracts
        .iter()
        .filter(|contract| {
            if !is_contract_visible(contract, source_module) {
                debug!("契约不可见，跳过: {} -> {}", candidate.name, contract.name);
                return false;
            }
            if !contract.dyn_compatible {
                debug!("契约无法作为 dyn 类型使用，跳过: {} -> {}", candidate.name, contract.name);
                return false;
            }
            seen.insert(contract.name.clone())
        })
        .cloned()
        .collect()
}

/// 发现并分类全部服务
///
/// 结果保持候选声明的语法顺序。带有标记的声明无法解析时中止整轮生成；
/// 没有标记的声明无法解析时跳过。
pub fn discover_services(model: &dyn SemanticModel) -> GeneratorResult<Vec<ClassifiedType>> {
    let source_module = model.source_module();
    let mut classified = Vec::new();

    for declaration in model.candidate_declarations() {
        let Some(candidate) = model.resolve_type(declaration) else {
            if has_marker(declaration) {
                return Err(GeneratorError::UnresolvableMarkerTarget {
                    type_name: declaration.name.clone(),
                    location: declaration.location.to_string(),
                });
            }
            debug!("无法解析的候选声明，跳过: {}", declaration.name);
            continue;
        };

        if let Some(service) = classify(candidate, source_module) {
            classified.push(service);
        }
    }

    info!("服务发现完成，共 {} 个服务", classified.len());
    Ok(classified)
}

/// 分类单个已解析的候选类型
pub fn classify(candidate: CandidateType, source_module: &ModuleId) -> Option<ClassifiedType> {
    let tier = LifetimeTier::resolve(&markers_of(&candidate.attributes));
    let lifetime = tier.lifetime()?;

    if candidate.name.is_generic() {
        warn!(
            "泛型类型无法注册为具体服务，跳过: {}",
            candidate.name
        );
        return None;
    }

    let contracts = eligible_contracts(&candidate, source_module);
    debug!(
        "发现服务: {} ({}, {} 个契约)",
        candidate.name,
        lifetime,
        contracts.len()
    );

    Some(ClassifiedType {
        candidate,
        lifetime,
        contracts,
    })
}

fn has_marker(declaration: &TypeDeclaration) -> bool {
    declaration
        .attributes
        .iter()
        .any(|attribute| Marker::from_attribute(attribute).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::AttributeArgument;
    use infrastructure_common::{Accessibility, QualifiedName};

    fn inject_with(value: ArgumentValue) -> AttributeData {
        AttributeData::new("inject").with_argument(AttributeArgument { name: None, value })
    }

    fn lifetime_path(enum_name: &str, member: &str) -> ArgumentValue {
        ArgumentValue::Path {
            enum_name: Some(enum_name.to_string()),
            member: member.to_string(),
        }
    }

    fn contract(name: &str, module: &str, accessibility: Accessibility) -> Contract {
        Contract {
            name: QualifiedName::external(module, Vec::<String>::new(), name),
            module: ModuleId::new(module),
            accessibility,
            dyn_compatible: true,
        }
    }

    fn candidate(attributes: Vec<AttributeData>, contracts: Vec<Contract>) -> CandidateType {
        CandidateType {
            name: QualifiedName::local(["services"], "Cache"),
            module: ModuleId::new("app"),
            attributes,
            contracts,
        }
    }

    #[test]
    fn test_dedicated_marker_beats_inject_argument() {
        let attributes = vec![
            AttributeData::new("singleton"),
            inject_with(lifetime_path("ServiceLifetime", "Transient")),
        ];
        assert_eq!(
            LifetimeTier::resolve(&markers_of(&attributes)),
            LifetimeTier::Singleton
        );
    }

    #[test]
    fn test_dedicated_marker_precedence_order() {
        let markers = [Marker::Transient, Marker::Scoped];
        assert_eq!(LifetimeTier::resolve(&markers), LifetimeTier::Scoped);

        let markers = [Marker::Inject(Some(Lifetime::Scoped)), Marker::Transient];
        assert_eq!(LifetimeTier::resolve(&markers), LifetimeTier::Transient);
    }

    #[test]
    fn test_inject_without_argument_defaults_to_singleton() {
        let attributes = vec![AttributeData::new("inject")];
        assert_eq!(
            LifetimeTier::resolve(&markers_of(&attributes)),
            LifetimeTier::Singleton
        );
    }

    #[test]
    fn test_inject_argument_values() {
        let cases = [
            (lifetime_path("ServiceLifetime", "Singleton"), LifetimeTier::Singleton),
            (lifetime_path("ServiceLifetime", "Scoped"), LifetimeTier::Scoped),
            (lifetime_path("ServiceLifetime", "Transient"), LifetimeTier::Transient),
            // 不是预期的枚举
            (lifetime_path("Lifetime", "Scoped"), LifetimeTier::Singleton),
            (lifetime_path("ServiceLifetime", "Pooled"), LifetimeTier::Singleton),
            (
                ArgumentValue::Path {
                    enum_name: None,
                    member: "Scoped".to_string(),
                },
                LifetimeTier::Singleton,
            ),
            (ArgumentValue::Other("1".to_string()), LifetimeTier::Singleton),
        ];

        for (value, expected) in cases {
            let attributes = vec![inject_with(value.clone())];
            assert_eq!(
                LifetimeTier::resolve(&markers_of(&attributes)),
                expected,
                "参数: {value:?}"
            );
        }
    }

    #[test]
    fn test_inject_named_argument() {
        let named = AttributeData::new("inject").with_argument(AttributeArgument {
            name: Some("lifetime".to_string()),
            value: lifetime_path("ServiceLifetime", "Scoped"),
        });
        assert_eq!(Marker::from_attribute(&named), Some(Marker::Inject(Some(Lifetime::Scoped))));

        let wrong_name = AttributeData::new("inject").with_argument(AttributeArgument {
            name: Some("scope".to_string()),
            value: lifetime_path("ServiceLifetime", "Scoped"),
        });
        assert_eq!(Marker::from_attribute(&wrong_name), Some(Marker::Inject(None)));
    }

    #[test]
    fn test_malformed_or_extra_arguments_default() {
        let mut malformed = AttributeData::new("inject");
        malformed.malformed = true;
        assert_eq!(Marker::from_attribute(&malformed), Some(Marker::Inject(None)));

        let extra = inject_with(lifetime_path("ServiceLifetime", "Scoped"))
            .with_argument(AttributeArgument {
                name: None,
                value: lifetime_path("ServiceLifetime", "Transient"),
            });
        assert_eq!(Marker::from_attribute(&extra), Some(Marker::Inject(None)));
    }

    #[test]
    fn test_unrecognized_attributes_yield_none() {
        let attributes = vec![AttributeData::new("derive"), AttributeData::new("doc")];
        assert_eq!(LifetimeTier::resolve(&markers_of(&attributes)), LifetimeTier::None);
        assert_eq!(LifetimeTier::None.lifetime(), None);
    }

    #[test]
    fn test_contract_visibility() {
        let source = ModuleId::new("app");
        assert!(is_contract_visible(&contract("Clock", "shared", Accessibility::Public), &source));
        assert!(is_contract_visible(&contract("Clock", "app", Accessibility::Private), &source));
        assert!(is_contract_visible(&contract("Clock", "app", Accessibility::Restricted), &source));
        assert!(!is_contract_visible(&contract("Clock", "shared", Accessibility::Restricted), &source));
    }

    #[test]
    fn test_eligible_contracts_filter_and_dedupe() {
        let public = contract("Clock", "shared", Accessibility::Public);
        let hidden = contract("Secret", "shared", Accessibility::Private);
        let mut generic = contract("Handler", "app", Accessibility::Public);
        generic.dyn_compatible = false;

        let candidate = candidate(
            vec![AttributeData::new("scoped")],
            vec![public.clone(), hidden, generic, public.clone()],
        );

        let eligible = eligible_contracts(&candidate, &ModuleId::new("app"));
        assert_eq!(eligible, vec![public]);
    }

    #[test]
    fn test_classify_skips_unmarked_and_generic() {
        let source = ModuleId::new("app");
        assert!(classify(candidate(vec![AttributeData::new("derive")], vec![]), &source).is_none());

        let mut generic = candidate(vec![AttributeData::new("scoped")], vec![]);
        generic.name = generic.name.with_generic_arity(1);
        assert!(classify(generic, &source).is_none());

        let service = classify(candidate(vec![AttributeData::new("transient")], vec![]), &source)
            .unwrap();
        assert_eq!(service.lifetime, Lifetime::Transient);
        assert!(service.contracts.is_empty());
    }
}
