use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;

pub const HTTP_METHODS: [&str; 4] = ["get", "post", "put", "delete"];

// Inside a #[controller] impl block these attributes are consumed by the
// controller macro before they expand, so reaching this means misuse.
pub fn http_method_attribute(method: &str, _attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = TokenStream2::from(item);
    let error = syn::Error::new(
        Span::call_site(),
        format!("#[{method}] must be used on a function inside a #[controller] impl block"),
    )
    .to_compile_error();

    TokenStream::from(quote! {
        #error
        #item
    })
}
