//! trybuild 编译期测试：标记宏只接受结构体和枚举，原样保留条目

#[test]
fn trybuild_marker_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/markers_ok.rs");
    t.pass("tests/trybuild/inject_arguments_ok.rs");
}
