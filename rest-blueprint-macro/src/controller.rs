use crate::http_methods::HTTP_METHODS;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    ext::IdentExt, parenthesized, parse::Parse, parse::ParseStream, parse_macro_input, Attribute,
    FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, Lit, LitBool, LitStr, Token, Type,
};

struct ControllerArgs {
    path: LitStr,
    state: Option<Type>,
    name: Option<LitStr>,
}

impl Parse for ControllerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut path = None;
        let mut state = None;
        let mut name = None;

        if input.peek(LitStr) {
            path = Some(input.parse::<LitStr>()?);
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            if key == "path" {
                path = Some(input.parse()?);
            } else if key == "state" {
                state = Some(input.parse()?);
            } else if key == "name" {
                name = Some(input.parse()?);
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    "unknown controller argument, expected `path`, `state` or `name`",
                ));
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(ControllerArgs {
            path: path.unwrap_or_else(|| LitStr::new("/", proc_macro2::Span::call_site())),
            state,
            name,
        })
    }
}

struct RouteArgs {
    rule: LitStr,
    strict_slashes: Option<LitBool>,
    defaults: Vec<(String, LitStr)>,
    extras: Vec<(String, Lit)>,
}

impl Parse for RouteArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let rule: LitStr = input.parse()?;
        let mut args = RouteArgs {
            rule,
            strict_slashes: None,
            defaults: Vec::new(),
            extras: Vec::new(),
        };

        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let key = input.call(Ident::parse_any)?;
            if key == "strict_slashes" {
                input.parse::<Token![=]>()?;
                args.strict_slashes = Some(input.parse()?);
            } else if key == "defaults" {
                let content;
                parenthesized!(content in input);
                for (name, value) in parse_pairs::<LitStr>(&content)? {
                    args.defaults.push((name, value));
                }
            } else if key == "extra" {
                let content;
                parenthesized!(content in input);
                for (name, value) in parse_pairs::<Lit>(&content)? {
                    if name == "methods" {
                        return Err(syn::Error::new(
                            key.span(),
                            "`methods` is fixed by the route attribute and cannot be an extra",
                        ));
                    }
                    args.extras.push((name, value));
                }
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    "unknown route option, expected `strict_slashes`, `defaults` or `extra`",
                ));
            }
        }
        Ok(args)
    }
}

/// Parses `key = value, ...` where keys are identifiers.
fn parse_pairs<V: Parse>(input: ParseStream) -> syn::Result<Vec<(String, V)>> {
    let mut pairs = Vec::new();
    while !input.is_empty() {
        let key = input.call(Ident::parse_any)?;
        input.parse::<Token![=]>()?;
        let value: V = input.parse()?;
        pairs.push((key.unraw().to_string(), value));
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }
    }
    Ok(pairs)
}

struct Route {
    method: &'static str,
    args: RouteArgs,
    fn_name: Ident,
}

pub fn controller_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ControllerArgs);
    let input = parse_macro_input!(item as ItemImpl);
    match generate_controller_impl(args, input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn generate_controller_impl(args: ControllerArgs, mut input: ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[controller] must be placed on an inherent impl block",
        ));
    }

    let mut routes = Vec::new();
    for item in input.items.iter_mut() {
        if let ImplItem::Fn(method) = item {
            if let Some(route) = extract_route(method)? {
                routes.push(route);
            }
        }
    }

    let name = match &args.name {
        Some(name) => name.clone(),
        None => type_name(&input.self_ty)?,
    };
    let path = &args.path;
    let state = match &args.state {
        Some(ty) => quote! { #ty },
        None => quote! { () },
    };

    let route_registrations = routes.iter().map(|route| {
        let verb = format_ident!("{}", route.method);
        let rule = &route.args.rule;
        let fn_name = &route.fn_name;
        let handler_name = fn_name.unraw().to_string();

        let strict = route.args.strict_slashes.as_ref().map(|value| {
            quote! { .strict_slashes(#value) }
        });
        let defaults = route.args.defaults.iter().map(|(key, value)| {
            quote! { .default_value(#key, #value) }
        });
        let extras = route.args.extras.iter().map(|(key, value)| {
            quote! { .extra(#key, #value) }
        });

        quote! {
            .route(
                ::rest_blueprint::#verb(#rule)
                    #strict
                    #(#defaults)*
                    #(#extras)*
                    .apply(#handler_name, ::rest_blueprint::AxumHandler::new(Self::#fn_name))
            )
        }
    });

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #input

        impl #impl_generics ::rest_blueprint::Controller for #self_ty #where_clause {
            type Group = ::rest_blueprint::AxumBlueprint<#state>;

            const ENDPOINT: &'static str = #path;

            fn name() -> &'static str {
                #name
            }

            fn import_name() -> &'static str {
                ::core::module_path!()
            }

            fn routes() -> ::rest_blueprint::ControllerBuilder<::rest_blueprint::AxumHandler<#state>> {
                ::rest_blueprint::controller(<Self as ::rest_blueprint::Controller>::ENDPOINT)
                    .named(<Self as ::rest_blueprint::Controller>::name())
                    .import_name(<Self as ::rest_blueprint::Controller>::import_name())
                    #(#route_registrations)*
            }
        }
    })
}

/// Strips the verb attributes off `method` and returns the route they
/// describe. When several are present the last one wins.
fn extract_route(method: &mut ImplItemFn) -> syn::Result<Option<Route>> {
    let mut route = None;
    for attr in &method.attrs {
        if let Some(verb) = http_method_of(attr) {
            let args = attr.parse_args::<RouteArgs>()?;
            route = Some((verb, args));
        }
    }
    let Some((method_name, args)) = route else {
        return Ok(None);
    };

    if let Some(FnArg::Receiver(receiver)) = method.sig.inputs.first() {
        return Err(syn::Error::new_spanned(
            receiver,
            "controller handlers are associated functions and cannot take `self`",
        ));
    }

    method.attrs.retain(|attr| http_method_of(attr).is_none());
    Ok(Some(Route {
        method: method_name,
        args,
        fn_name: method.sig.ident.clone(),
    }))
}

fn http_method_of(attr: &Attribute) -> Option<&'static str> {
    // `#[get(..)]` and `#[rest_blueprint::get(..)]` both count.
    let ident = attr.path().segments.last()?.ident.to_string();
    HTTP_METHODS.iter().copied().find(|method| *method == ident)
}

fn type_name(ty: &Type) -> syn::Result<LitStr> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return Ok(LitStr::new(
                &segment.ident.unraw().to_string(),
                segment.ident.span(),
            ));
        }
    }
    Err(syn::Error::new_spanned(
        ty,
        "cannot derive a blueprint name from this type, pass `name = \"...\"`",
    ))
}
