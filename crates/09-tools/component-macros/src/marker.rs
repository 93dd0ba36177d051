//! 标记宏实现

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Item, Result};

/// 实现 #[singleton] / #[scoped] / #[transient]
pub fn lifetime_marker_impl(marker: &str, args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return Error::new_spanned(&args, format!("#[{marker}] 不接受参数"))
            .to_compile_error();
    }

    match parse_marked_type(marker, input) {
        Ok(item) => quote! { #item },
        Err(e) => e.to_compile_error(),
    }
}

/// 实现 #[inject]
pub fn inject_marker_impl(_args: TokenStream, input: TokenStream) -> TokenStream {
    match parse_marked_type("inject", input) {
        Ok(item) => quote! { #item },
        Err(e) => e.to_compile_error(),
    }
}

/// 解析被标记的条目，只允许结构体和枚举
fn parse_marked_type(marker: &str, input: TokenStream) -> Result<Item> {
    let item: Item = syn::parse2(input)?;
    match item {
        Item::Struct(_) | Item::Enum(_) => Ok(item),
        other => Err(Error::new_spanned(
            other,
            format!("#[{marker}] 只能标记结构体或枚举"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_passes_through_unchanged() {
        let input = quote! { pub struct SystemClock { offset: i64 } };
        let output = lifetime_marker_impl("singleton", TokenStream::new(), input.clone());
        assert_eq!(output.to_string(), input.to_string());
    }

    #[test]
    fn test_enum_accepted() {
        let input = quote! { enum Backend { Memory, Disk } };
        let output = lifetime_marker_impl("scoped", TokenStream::new(), input.clone());
        assert_eq!(output.to_string(), input.to_string());
    }

    #[test]
    fn test_arguments_rejected() {
        let output = lifetime_marker_impl(
            "transient",
            quote! { priority = 1 },
            quote! { struct Worker; },
        );
        let text = output.to_string();
        assert!(text.contains("compile_error"));
        assert!(text.contains("不接受参数"));
    }

    #[test]
    fn test_non_type_item_rejected() {
        let output = lifetime_marker_impl("singleton", TokenStream::new(), quote! { fn build() {} });
        let text = output.to_string();
        assert!(text.contains("compile_error"));
        assert!(text.contains("只能标记结构体或枚举"));
    }

    #[test]
    fn test_inject_accepts_any_arguments() {
        let input = quote! { struct UnitOfWork; };
        for args in [
            TokenStream::new(),
            quote! { ServiceLifetime::Scoped },
            quote! { lifetime = ServiceLifetime::Transient },
            quote! { 42 },
        ] {
            let output = inject_marker_impl(args, input.clone());
            assert_eq!(output.to_string(), input.to_string());
        }
    }
}
