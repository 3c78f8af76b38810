//! 可注入组件派生宏实现

use crate::utils::{arc_inner, option_inner};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Result, Type};

/// 实现 #[derive(Injectable)] 宏
pub fn derive_injectable_impl(input: DeriveInput) -> TokenStream {
    match expand(&input) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data) = &input.data else {
        return Err(Error::new(struct_name.span(), "Injectable 只能派生在结构体上"));
    };

    let construct = match &data.fields {
        Fields::Named(fields) => {
            let initializers = fields.named.iter().map(|field| {
                let ident = &field.ident;
                let value = field_value(&field.ty);
                quote!(#ident: #value)
            });
            quote!(Self { #(#initializers),* })
        }
        Fields::Unnamed(fields) => {
            let values = fields.unnamed.iter().map(|field| field_value(&field.ty));
            quote!(Self(#(#values),*))
        }
        Fields::Unit => quote!(Self),
    };

    Ok(quote! {
        impl #impl_generics ::service_annotations::Injectable for #struct_name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn inject(
                resolver: &dyn ::service_annotations::ServiceResolver,
            ) -> ::service_annotations::DependencyResult<Self> {
                ::std::result::Result::Ok(#construct)
            }
        }
    })
}

/// 字段的构造表达式
fn field_value(ty: &Type) -> TokenStream2 {
    if let Some(service) = arc_inner(ty) {
        quote!(::service_annotations::ServiceResolverExt::get::<#service>(resolver)?)
    } else if let Some(service) = option_inner(ty).and_then(arc_inner) {
        quote!(::service_annotations::ServiceResolverExt::get_optional::<#service>(resolver)?)
    } else {
        quote!(::std::default::Default::default())
    }
}
