use darling::ast::{Data, Fields, Style};
use darling::util::Ignored;
use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Variants without an explicit status surface as internal server errors.
const FALLBACK_STATUS: u16 = 500;

#[derive(FromVariant)]
#[darling(attributes(api_error))]
struct ErrorVariant {
    ident: syn::Ident,
    fields: Fields<Ignored>,
    #[darling(default)]
    status: Option<u16>,
}

#[derive(FromDeriveInput)]
#[darling(attributes(api_error), supports(enum_any))]
struct ErrorEnum {
    ident: syn::Ident,
    generics: syn::Generics,
    data: Data<ErrorVariant, Ignored>,
}

pub fn derive_api_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let parsed = match ErrorEnum::from_derive_input(&input) {
        Ok(parsed) => parsed,
        Err(err) => return err.write_errors().into(),
    };

    let variants = match &parsed.data {
        Data::Enum(variants) => variants,
        // supports(enum_any) already rejected anything else
        Data::Struct(_) => {
            return darling::Error::unsupported_shape("struct")
                .with_span(&parsed.ident)
                .write_errors()
                .into();
        }
    };

    let name = &parsed.ident;
    let mut arms = Vec::new();
    for variant in variants {
        let ident = &variant.ident;
        let status = variant.status.unwrap_or(FALLBACK_STATUS);
        if !(400..=599).contains(&status) {
            return syn::Error::new(
                ident.span(),
                format!(
                    "no error response for status code {status}, valid error status codes are 4xx and 5xx"
                ),
            )
            .to_compile_error()
            .into();
        }
        let pattern = match variant.fields.style {
            Style::Unit => quote! {},
            Style::Tuple => quote! { (..) },
            Style::Struct => quote! { { .. } },
        };
        arms.push(quote! { #name::#ident #pattern => #status, });
    }

    let (impl_generics, ty_generics, where_clause) = parsed.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::core::convert::From<#name #ty_generics> for ::parapet::HttpError #where_clause {
            fn from(err: #name #ty_generics) -> Self {
                let message = ::std::string::ToString::to_string(&err);
                let status_code: u16 = match &err {
                    #(#arms)*
                };
                // Status literals were range-checked at expansion time
                ::parapet::HttpError::new(
                    status_code,
                    ::core::option::Option::Some(message),
                    ::core::option::Option::None,
                    ::core::option::Option::None,
                )
                .unwrap_or_else(|_| ::parapet::HttpError::internal_server_error())
            }
        }

        impl #impl_generics ::parapet::axum::response::IntoResponse for #name #ty_generics #where_clause {
            fn into_response(self) -> ::parapet::axum::response::Response {
                ::parapet::axum::response::IntoResponse::into_response(
                    ::parapet::HttpError::from(self),
                )
            }
        }
    };

    expanded.into()
}
