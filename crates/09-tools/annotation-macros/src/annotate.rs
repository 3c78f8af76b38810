//! 服务注解宏实现

use crate::utils::{arc_inner, is_self_type, same_type};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parenthesized,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    token, Error, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, LitStr, Pat, Result, Token, Type,
};

/// 服务生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceLifetime {
    #[default]
    Transient,
    Scoped,
    Singleton,
}

/// `service(..)` 参数
#[derive(Default)]
pub struct ServiceArgs {
    /// 生命周期
    pub lifetime: ServiceLifetime,
    /// 服务类型别名，按书写顺序
    pub use_as: Vec<Type>,
}

impl Parse for ServiceArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = Self::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            match ident.to_string().as_str() {
                "transient" => args.lifetime = ServiceLifetime::Transient,
                "scoped" => args.lifetime = ServiceLifetime::Scoped,
                "singleton" => args.lifetime = ServiceLifetime::Singleton,
                "use_as" => {
                    let content;
                    parenthesized!(content in input);
                    args.use_as
                        .extend(Punctuated::<Type, Token![,]>::parse_terminated(&content)?);
                }
                other => {
                    return Err(Error::new(
                        ident.span(),
                        format!("未知的 service 参数: {other}，可用参数为 transient、scoped、singleton 与 use_as(..)"),
                    ))
                }
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

/// 单个注解
pub enum AnnotationArg {
    /// `service` / `service(..)`
    Service(ServiceArgs),
    /// `configure_services` / `configure_services("name")`
    ConfigureServices(Option<String>),
}

impl Parse for AnnotationArg {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let ident: Ident = input.parse()?;

        if ident == "service" {
            if input.peek(token::Paren) {
                let content;
                parenthesized!(content in input);
                return Ok(Self::Service(content.parse()?));
            }
            Ok(Self::Service(ServiceArgs::default()))
        } else if ident == "configure_services" {
            if input.peek(token::Paren) {
                let content;
                parenthesized!(content in input);
                let method_name: LitStr = content.parse()?;
                return Ok(Self::ConfigureServices(Some(method_name.value())));
            }
            Ok(Self::ConfigureServices(None))
        } else {
            Err(Error::new(
                ident.span(),
                format!("未知的注解: {ident}，可用注解为 service 与 configure_services"),
            ))
        }
    }
}

/// `#[annotate(..)]` 参数，顺序即声明顺序
pub struct AnnotateArgs {
    pub annotations: Vec<AnnotationArg>,
}

impl Parse for AnnotateArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let parsed = Punctuated::<AnnotationArg, Token![,]>::parse_terminated(input)?;
        Ok(Self {
            annotations: parsed.into_iter().collect(),
        })
    }
}

/// 实现 #[annotate] 宏
pub fn annotate_impl(args: TokenStream, item_impl: ItemImpl) -> TokenStream {
    let args = match syn::parse::<AnnotateArgs>(args) {
        Ok(args) => args,
        Err(e) => return e.to_compile_error().into(),
    };

    match expand(&args, &item_impl) {
        Ok(expanded) => expanded.into(),
        Err(e) => {
            let error = e.to_compile_error();
            quote! {
                #item_impl
                #error
            }
            .into()
        }
    }
}

fn expand(args: &AnnotateArgs, item_impl: &ItemImpl) -> Result<TokenStream2> {
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(Error::new(path.span(), "#[annotate] 只能用于固有 impl 块"));
    }
    if !item_impl.generics.params.is_empty() {
        return Err(Error::new(
            item_impl.generics.span(),
            "#[annotate] 不支持泛型 impl 块",
        ));
    }

    let self_ty = &item_impl.self_ty;

    let has_service = args
        .annotations
        .iter()
        .any(|annotation| matches!(annotation, AnnotationArg::Service(_)));
    let constructor = if has_service {
        quote!(::service_annotations::TypeDescriptor::injectable::<Self>())
    } else {
        quote!(::service_annotations::TypeDescriptor::of::<Self>())
    };

    let annotations: Vec<_> = args
        .annotations
        .iter()
        .map(|annotation| annotation_tokens(annotation, self_ty))
        .collect();

    let methods = item_impl
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(method) => Some(method_tokens(method)),
            _ => None,
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        #item_impl

        impl ::service_annotations::Annotated for #self_ty {
            fn type_descriptor() -> ::service_annotations::TypeDescriptor {
                #constructor
                    #(.annotate(#annotations))*
                    #(.method(#methods))*
            }
        }

        // 启动时登记到调用方 crate 的类型目录
        const _: () = {
            #[::service_annotations::__private::ctor]
            fn __register_annotated_type() {
                ::service_annotations::register_type(
                    env!("CARGO_CRATE_NAME"),
                    file!(),
                    line!(),
                    <#self_ty as ::service_annotations::Annotated>::type_descriptor,
                );
            }
        };
    })
}

fn annotation_tokens(annotation: &AnnotationArg, self_ty: &Type) -> TokenStream2 {
    match annotation {
        AnnotationArg::Service(service) => {
            let constructor = match service.lifetime {
                ServiceLifetime::Transient => quote!(::service_annotations::Service::transient()),
                ServiceLifetime::Scoped => quote!(::service_annotations::Service::scoped()),
                ServiceLifetime::Singleton => quote!(::service_annotations::Service::singleton()),
            };
            let aliases = service.use_as.iter().map(|ty| alias_tokens(ty, self_ty));
            quote!(#constructor #(.use_as(#aliases))*)
        }
        AnnotationArg::ConfigureServices(None) => {
            quote!(::service_annotations::ConfigureServices::new())
        }
        AnnotationArg::ConfigureServices(Some(method_name)) => {
            quote!(::service_annotations::ConfigureServices::named(#method_name))
        }
    }
}

fn alias_tokens(ty: &Type, self_ty: &Type) -> TokenStream2 {
    if is_self_type(ty) || same_type(ty, self_ty) {
        quote!(::service_annotations::ServiceType::of::<Self>())
    } else {
        quote! {
            ::service_annotations::ServiceType::alias::<Self, #ty>(
                |it: ::std::sync::Arc<Self>| -> ::std::sync::Arc<#ty> { it }
            )
        }
    }
}

/// 配置方法参数的传递方式
enum Passing {
    /// `&T`
    Borrowed,
    /// `Arc<T>`
    Shared,
    /// `T: Clone`
    Cloned,
}

/// 配置方法参数：上下文查找键与传递方式
struct HookParameter<'a> {
    key: &'a Type,
    passing: Passing,
}

impl<'a> HookParameter<'a> {
    fn from_type(ty: &'a Type) -> Result<Self> {
        if let Type::Reference(reference) = ty {
            if reference.mutability.is_some() {
                return Err(Error::new(ty.span(), "配置方法参数不能是可变引用"));
            }
            return Ok(Self {
                key: &reference.elem,
                passing: Passing::Borrowed,
            });
        }

        if let Some(inner) = arc_inner(ty) {
            return Ok(Self {
                key: inner,
                passing: Passing::Shared,
            });
        }

        Ok(Self {
            key: ty,
            passing: Passing::Cloned,
        })
    }

    fn argument(&self, binding: &Ident) -> TokenStream2 {
        match self.passing {
            Passing::Borrowed => quote!(&*#binding),
            Passing::Shared => quote!(#binding),
            Passing::Cloned => quote!((*#binding).clone()),
        }
    }
}

fn method_tokens(method: &ImplItemFn) -> Result<TokenStream2> {
    let ident = &method.sig.ident;
    let method_name = ident.to_string();

    if method.sig.receiver().is_some() {
        return Ok(quote!(::service_annotations::MethodDescriptor::instance(#method_name)));
    }
    // 泛型与异步方法只参与名称查找，不能被调用
    if !method.sig.generics.params.is_empty() || method.sig.asyncness.is_some() {
        return Ok(quote!(::service_annotations::MethodDescriptor::associated(#method_name)));
    }

    let mut parameters = Vec::new();
    let mut bindings = Vec::new();
    let mut arguments = Vec::new();

    for (index, input) in method.sig.inputs.iter().enumerate() {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        let parameter_name = match pat_type.pat.as_ref() {
            Pat::Ident(pat_ident) => pat_ident.ident.to_string(),
            _ => format!("arg{index}"),
        };
        let parameter = HookParameter::from_type(&pat_type.ty)?;
        let key = parameter.key;
        let binding = format_ident!("__argument_{}", index);

        parameters.push(quote!(.parameter::<#key>(#parameter_name)));
        bindings.push(quote!(let #binding = __arguments.get::<#key>(#index)?;));
        arguments.push(parameter.argument(&binding));
    }

    Ok(quote! {
        ::service_annotations::MethodDescriptor::associated(#method_name)
            #(#parameters)*
            .invoker(|__arguments: &::service_annotations::Arguments| {
                #(#bindings)*
                ::service_annotations::HookOutput::into_result(Self::#ident(#(#arguments),*))
            })
    })
}
