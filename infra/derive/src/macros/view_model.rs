use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::{Fields, ItemStruct, Type};

pub fn expand_view_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    match expand(args, input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(args: TokenStream, input: ItemStruct) -> syn::Result<TokenStream> {
    let (inputs_ty, outputs_ty) = parse_args(args, &input)?;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "view_model does not support generic structs",
        ));
    }

    let Fields::Named(named) = &input.fields else {
        return Err(syn::Error::new_spanned(&input, "view_model requires named fields"));
    };
    for required in ["inputs", "outputs"] {
        if !named.named.iter().any(|f| f.ident.as_ref().is_some_and(|id| id == required)) {
            return Err(syn::Error::new_spanned(
                &input.ident,
                format!("view_model requires a `{required}` field"),
            ));
        }
    }

    let ident = &input.ident;
    let vis = &input.vis;
    let attrs = &input.attrs;
    let fields = &input.fields;
    let state_ident = format_ident!("{ident}State");
    let state_debug = (!derives_debug(attrs)).then(|| {
        quote! {
            impl std::fmt::Debug for #state_ident {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.debug_struct(stringify!(#state_ident)).finish_non_exhaustive()
                }
            }
        }
    });

    Ok(quote! {
        #(#attrs)*
        #vis struct #state_ident #fields

        #state_debug

        #[derive(Clone)]
        #vis struct #ident {
            state: std::sync::Arc<#state_ident>,
        }

        impl #ident {
            #vis fn from_state(state: #state_ident) -> Self {
                Self { state: std::sync::Arc::new(state) }
            }
        }

        impl std::ops::Deref for #ident {
            type Target = #state_ident;
            fn deref(&self) -> &Self::Target {
                &self.state
            }
        }

        impl std::fmt::Debug for #ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!(#ident)).finish_non_exhaustive()
            }
        }

        impl ::wf_navigation::ViewModel for #ident {
            type Inputs = #inputs_ty;
            type Outputs = #outputs_ty;

            fn inputs(&self) -> &Self::Inputs {
                &self.state.inputs
            }

            fn outputs(&self) -> &Self::Outputs {
                &self.state.outputs
            }
        }
    })
}

/// Whether the user already put `#[derive(Debug)]` on the state struct.
fn derives_debug(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().filter(|attr| attr.path().is_ident("derive")).any(|attr| {
        let mut found = false;
        let _ = attr.parse_nested_meta(|meta| {
            found |= meta.path.segments.last().is_some_and(|seg| seg.ident == "Debug");
            Ok(())
        });
        found
    })
}

fn parse_args(args: TokenStream, input: &ItemStruct) -> syn::Result<(Type, Type)> {
    let mut inputs: Option<Type> = None;
    let mut outputs: Option<Type> = None;

    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("inputs") {
            inputs = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("outputs") {
            outputs = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported view_model argument, expected `inputs` or `outputs`"))
        }
    });
    parser.parse2(args)?;

    match (inputs, outputs) {
        (Some(inputs), Some(outputs)) => Ok((inputs, outputs)),
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "view_model requires both `inputs = Type` and `outputs = Type`",
        )),
    }
}
