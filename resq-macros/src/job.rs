use darling::FromDeriveInput;
use proc_macro_error2::abort;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Path};

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(resq), supports(struct_any))]
struct ResqArgs {
    class: Option<String>,
    queue: Option<String>,
    error: Option<Path>,
}

pub fn expand_derive_job(input: DeriveInput) -> TokenStream {
    let args = match ResqArgs::from_derive_input(&input) {
        Ok(v) => v,
        Err(e) => {
            abort!(input.ident, "{}", e);
        }
    };

    let struct_ident = &input.ident;

    let type_error = match args.error {
        Some(error) => quote!(#error),
        None => quote!(JobError),
    };

    let class_name = match args.class {
        Some(class) if class.is_empty() => abort!(input.ident, "`class` cannot be empty."),
        Some(class) => quote! {
            fn class_name() -> &'static str {
                #class
            }
        },
        None => {
            let class = struct_ident.to_string();
            quote! {
                fn class_name() -> &'static str {
                    #class
                }
            }
        }
    };

    let queue = match args.queue {
        Some(queue) if queue.is_empty() => abort!(input.ident, "`queue` cannot be empty."),
        Some(queue) => quote! {
            fn queue() -> &'static str {
                #queue
            }
        },
        None => quote!(),
    };

    quote! {
        #[automatically_derived]
        #[async_trait::async_trait]
        impl resq::Job for #struct_ident {
            type Error = #type_error;

            async fn perform(&self) -> Result<(), Self::Error> {
                self.perform().await
            }

            #class_name

            #queue
        }
    }
}
