//! Implementation of the `#[visited_node]` attribute macro

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Expr, ExprLit, Item, ItemEnum, Lit, parse_quote};

pub fn visited_node_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    match expand(attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(attr: TokenStream2, item: TokenStream2) -> syn::Result<TokenStream2> {
    if !attr.is_empty() {
        return Err(syn::Error::new_spanned(
            attr,
            "#[visited_node] takes no arguments",
        ));
    }

    let mut item: Item = syn::parse2(item)?;
    match &mut item {
        Item::Struct(item) => {
            reject_repr(&item.attrs)?;
            item.attrs.insert(0, parse_quote!(#[repr(C)]));
        }
        Item::Enum(item) => {
            reject_repr(&item.attrs)?;
            assign_discriminants(item)?;
            item.attrs.insert(0, parse_quote!(#[repr(C, u8)]));
        }
        other => {
            return Err(syn::Error::new_spanned(
                other,
                "#[visited_node] only applies to structs and enums",
            ));
        }
    }

    Ok(quote!(#item))
}

/// The attribute owns the layout; a second `#[repr]` would fight it.
fn reject_repr(attrs: &[syn::Attribute]) -> syn::Result<()> {
    match attrs.iter().find(|attr| attr.path().is_ident("repr")) {
        Some(attr) => Err(syn::Error::new_spanned(
            attr,
            "#[visited_node] sets the layout itself; remove this #[repr]",
        )),
        None => Ok(()),
    }
}

fn assign_discriminants(item: &mut ItemEnum) -> syn::Result<()> {
    let mut next: u16 = 0;
    for variant in &mut item.variants {
        let value = match &variant.discriminant {
            Some((_, expr)) => parse_discriminant(expr)?,
            None => next,
        };
        if value > u16::from(u8::MAX) {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                format!("discriminant {value} does not fit in u8"),
            ));
        }

        let literal = syn::LitInt::new(&format!("{value}u8"), variant.ident.span());
        variant.discriminant = Some((Default::default(), parse_quote!(#literal)));
        next = value + 1;
    }
    Ok(())
}

fn parse_discriminant(expr: &Expr) -> syn::Result<u16> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(lit), ..
        }) => lit.base10_parse::<u16>().map_err(|_| {
            syn::Error::new_spanned(lit, "discriminant must be an integer in 0..=255")
        }),
        _ => Err(syn::Error::new_spanned(
            expr,
            "#[visited_node] only accepts integer literal discriminants",
        )),
    }
}
