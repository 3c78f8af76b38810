//! 宏工具函数

use quote::ToTokens;
use syn::{GenericArgument, PathArguments, Type};

/// 从类型中提取第一个泛型参数
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(GenericArgument::Type(inner_type)) => Some(inner_type),
            _ => None,
        },
        _ => None,
    }
}

/// 检查类型路径的最后一段是否为指定名称
pub fn is_type_named(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == name),
        _ => false,
    }
}

/// `Arc<T>` 中的 `T`
pub fn arc_inner(ty: &Type) -> Option<&Type> {
    if is_type_named(ty, "Arc") {
        extract_generic_type(ty)
    } else {
        None
    }
}

/// `Option<T>` 中的 `T`
pub fn option_inner(ty: &Type) -> Option<&Type> {
    if is_type_named(ty, "Option") {
        extract_generic_type(ty)
    } else {
        None
    }
}

/// 是否为 `Self`
pub fn is_self_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path.qself.is_none() && type_path.path.is_ident("Self"),
        _ => false,
    }
}

/// 两个类型的书写是否一致
pub fn same_type(a: &Type, b: &Type) -> bool {
    a.to_token_stream().to_string() == b.to_token_stream().to_string()
}
