//! Derive macros producing `Encode` and `Decode` implementations for the
//! `scale-codec` crate. Structs encode each field in declaration order;
//! enums spend one byte on the zero-based variant index and then encode the
//! selected variant's fields.

use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, DeriveInput};

const ATTR_NAME: &str = "scale_codec";

// The wire format tags variants with a single byte.
const MAX_VARIANTS: usize = 256;

#[proc_macro_derive(Encode, attributes(scale_codec))]
pub fn derive_encode(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    // parse top level attrs.
    let attrs = match TopLevelAttrs::parse(&input.attrs) {
        Ok(attrs) => attrs,
        Err(e) => return e.write_errors().into(),
    };

    match &input.data {
        syn::Data::Struct(details) => encode_struct(&attrs.path, &input, details).into(),
        syn::Data::Enum(details) => encode_enum(&attrs.path, &input, details).into(),
        syn::Data::Union(_) => syn::Error::new(
            input.ident.span(),
            "Unions are not supported by the Encode derive macro",
        )
        .into_compile_error()
        .into(),
    }
}

#[proc_macro_derive(Decode, attributes(scale_codec))]
pub fn derive_decode(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    // parse top level attrs.
    let attrs = match TopLevelAttrs::parse(&input.attrs) {
        Ok(attrs) => attrs,
        Err(e) => return e.write_errors().into(),
    };

    match &input.data {
        syn::Data::Struct(details) => decode_struct(&attrs.path, &input, details).into(),
        syn::Data::Enum(details) => decode_enum(&attrs.path, &input, details).into(),
        syn::Data::Union(_) => syn::Error::new(
            input.ident.span(),
            "Unions are not supported by the Decode derive macro",
        )
        .into_compile_error()
        .into(),
    }
}

fn encode_struct(path: &syn::Path, input: &DeriveInput, details: &syn::DataStruct) -> TokenStream2 {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) =
        split_generics(&input.generics, quote!(#path::Encode));

    let field_encodes = details.fields.iter().enumerate().map(|(idx, field)| {
        let accessor = field_accessor(field, idx);
        let attribute = field_error_attribution(field, idx);
        quote!(
            #path::Encode::encode_to(&self.#accessor, __codec_out)
                .map_err(|e| e #attribute)?;
        )
    });

    quote!(
        impl #impl_generics #path::Encode for #name #ty_generics #where_clause {
            fn encode_to(
                &self,
                __codec_out: &mut #path::Encoder
            ) -> Result<(), #path::Error> {
                #( #field_encodes )*
                Ok(())
            }
        }
    )
}

fn encode_enum(path: &syn::Path, input: &DeriveInput, details: &syn::DataEnum) -> TokenStream2 {
    let name = &input.ident;

    if details.variants.len() > MAX_VARIANTS {
        return syn::Error::new(
            name.span(),
            "Encode cannot be derived for enums with more than 256 variants",
        )
        .into_compile_error();
    }

    let (impl_generics, ty_generics, where_clause) =
        split_generics(&input.generics, quote!(#path::Encode));

    // For each variant we want to spit out a match arm.
    let match_arms = details.variants.iter().enumerate().map(|(idx, variant)| {
        let index = idx as u8;
        let variant_name = &variant.ident;
        let variant_name_str = variant_name.to_string();

        let (matcher, bindings) = fields_to_matcher_and_bindings(&variant.fields);
        let field_encodes = bindings.iter().zip(variant.fields.iter().enumerate()).map(
            |(binding, (field_idx, field))| {
                let attribute = field_error_attribution(field, field_idx);
                quote!(
                    #path::Encode::encode_to(#binding, __codec_out)
                        .map_err(|e| e #attribute.at_variant(#variant_name_str))?;
                )
            },
        );

        quote!(
            Self::#variant_name #matcher => {
                __codec_out.write_byte(#index);
                #( #field_encodes )*
                Ok(())
            }
        )
    });

    let body = if details.variants.is_empty() {
        quote!(match *self {})
    } else {
        quote!(match self { #( #match_arms ),* })
    };

    quote!(
        impl #impl_generics #path::Encode for #name #ty_generics #where_clause {
            fn encode_to(
                &self,
                __codec_out: &mut #path::Encoder
            ) -> Result<(), #path::Error> {
                #body
            }
        }
    )
}

fn decode_struct(path: &syn::Path, input: &DeriveInput, details: &syn::DataStruct) -> TokenStream2 {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) =
        split_generics(&input.generics, quote!(#path::Decode));

    let min_encoded_len = min_encoded_len_of_fields(path, &details.fields);
    let constructor = fields_to_constructor(path, &details.fields, None);

    quote!(
        impl #impl_generics #path::Decode for #name #ty_generics #where_clause {
            const MIN_ENCODED_LEN: usize = #min_encoded_len;

            fn decode_from(
                __codec_input: &mut #path::Decoder<'_>
            ) -> Result<Self, #path::Error> {
                Ok(#name #constructor)
            }
        }
    )
}

fn decode_enum(path: &syn::Path, input: &DeriveInput, details: &syn::DataEnum) -> TokenStream2 {
    let name = &input.ident;

    if details.variants.len() > MAX_VARIANTS {
        return syn::Error::new(
            name.span(),
            "Decode cannot be derived for enums with more than 256 variants",
        )
        .into_compile_error();
    }

    let (impl_generics, ty_generics, where_clause) =
        split_generics(&input.generics, quote!(#path::Decode));

    let variant_count = details.variants.len();
    let match_arms = details.variants.iter().enumerate().map(|(idx, variant)| {
        let index = idx as u8;
        let variant_name = &variant.ident;
        let variant_name_str = variant_name.to_string();
        let constructor =
            fields_to_constructor(path, &variant.fields, Some(variant_name_str.as_str()));

        quote!(#index => Ok(Self::#variant_name #constructor),)
    });

    quote!(
        impl #impl_generics #path::Decode for #name #ty_generics #where_clause {
            const MIN_ENCODED_LEN: usize = 1;

            fn decode_from(
                __codec_input: &mut #path::Decoder<'_>
            ) -> Result<Self, #path::Error> {
                match __codec_input.next_byte()? {
                    #( #match_arms )*
                    index => Err(#path::Error::new(
                        #path::error::ErrorKind::WrongTypeIndex {
                            index,
                            variant_count: #variant_count,
                        }
                    )),
                }
            }
        }
    )
}

// Clone the generics, bounding every type parameter by the given trait, and
// split them for the impl block.
fn split_generics(
    generics: &syn::Generics,
    bound: TokenStream2,
) -> (TokenStream2, TokenStream2, TokenStream2) {
    let mut bounded = generics.clone();
    for param in bounded.type_params_mut() {
        param.bounds.push(syn::parse_quote!(#bound));
    }
    let (impl_generics, _, where_clause) = bounded.split_for_impl();
    let (_, ty_generics, _) = generics.split_for_impl();
    (
        quote!(#impl_generics),
        quote!(#ty_generics),
        quote!(#where_clause),
    )
}

// `self.foo` for named fields, `self.0` for unnamed ones.
fn field_accessor(field: &syn::Field, idx: usize) -> TokenStream2 {
    match &field.ident {
        Some(ident) => quote!(#ident),
        None => {
            let index = syn::Index::from(idx);
            quote!(#index)
        }
    }
}

// How an error bubbling out of this field should be annotated.
fn field_error_attribution(field: &syn::Field, idx: usize) -> TokenStream2 {
    match &field.ident {
        Some(ident) => {
            let name = ident.to_string();
            quote!(.at_field(#name))
        }
        None => quote!(.at_idx(#idx)),
    }
}

// The sum of the minimum encoded lengths of every field.
fn min_encoded_len_of_fields(path: &syn::Path, fields: &syn::Fields) -> TokenStream2 {
    let field_lens = fields.iter().map(|field| {
        let ty = &field.ty;
        quote!(+ <#ty as #path::Decode>::MIN_ENCODED_LEN)
    });
    quote!(0usize #( #field_lens )*)
}

// A matcher binding every field of a variant, plus the bound identifiers in
// field order.
fn fields_to_matcher_and_bindings(fields: &syn::Fields) -> (TokenStream2, Vec<TokenStream2>) {
    match fields {
        syn::Fields::Named(fields) => {
            let bindings: Vec<_> = fields
                .named
                .iter()
                .map(|f| {
                    let ident = &f.ident;
                    quote!(#ident)
                })
                .collect();
            (quote!({ #( #bindings ),* }), bindings)
        }
        syn::Fields::Unnamed(fields) => {
            let bindings: Vec<_> = fields
                .unnamed
                .iter()
                .enumerate()
                .map(|(idx, _)| {
                    let ident = format_ident!("_{idx}");
                    quote!(#ident)
                })
                .collect();
            (quote!(( #( #bindings ),* )), bindings)
        }
        syn::Fields::Unit => (quote!(), Vec::new()),
    }
}

// The construction expression decoding each field in order, attributing any
// failure to the field (and variant) it happened in.
fn fields_to_constructor(
    path: &syn::Path,
    fields: &syn::Fields,
    variant: Option<&str>,
) -> TokenStream2 {
    let variant_attribution = match variant {
        Some(name) => quote!(.at_variant(#name)),
        None => quote!(),
    };
    match fields {
        syn::Fields::Named(fields) => {
            let field_decodes = fields.named.iter().map(|f| {
                let ident = &f.ident;
                let name = f.ident.as_ref().map(|i| i.to_string()).unwrap_or_default();
                let ty = &f.ty;
                quote!(
                    #ident: <#ty as #path::Decode>::decode_from(__codec_input)
                        .map_err(|e| e.at_field(#name) #variant_attribution)?
                )
            });
            quote!({ #( #field_decodes ),* })
        }
        syn::Fields::Unnamed(fields) => {
            let field_decodes = fields.unnamed.iter().enumerate().map(|(idx, f)| {
                let ty = &f.ty;
                quote!(
                    <#ty as #path::Decode>::decode_from(__codec_input)
                        .map_err(|e| e.at_idx(#idx) #variant_attribution)?
                )
            });
            quote!(( #( #field_decodes ),* ))
        }
        syn::Fields::Unit => quote!(),
    }
}

#[derive(darling::FromMeta)]
struct TopLevelAttrs {
    // path to the scale_codec crate, in case it's not a top level dependency.
    path: syn::Path,
}

impl TopLevelAttrs {
    fn parse(attrs: &[syn::Attribute]) -> darling::Result<Self> {
        use darling::FromMeta;

        #[derive(FromMeta)]
        struct TopLevelAttrsInner {
            #[darling(default)]
            path: Option<syn::Path>,
        }

        let mut res = TopLevelAttrs {
            path: syn::parse_quote!(::scale_codec),
        };

        for attr in attrs {
            if !attr.path.is_ident(ATTR_NAME) {
                continue;
            }
            let meta = attr.parse_meta()?;
            let parsed_attrs = TopLevelAttrsInner::from_meta(&meta)?;

            if let Some(path) = parsed_attrs.path {
                res.path = path;
            }
        }

        Ok(res)
    }
}
