use component_macros::inject;

#[allow(dead_code)]
enum ServiceLifetime {
    Singleton = 0,
    Scoped = 1,
    Transient = 2,
}

#[inject]
struct Plain;

#[inject(ServiceLifetime::Scoped)]
struct Session;

#[inject(lifetime = ServiceLifetime::Transient)]
struct Report(u32);

// 参数不合法时仍能编译，由生成器按单例处理
#[inject(42)]
struct Literal;

#[inject(Undefined::Variant, "text")]
enum Mode {
    On,
}

fn main() {
    let _ = (Plain, Session, Literal, Mode::On);
    assert_eq!(Report(7).0, 7);
}
