use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{parse_macro_input, Attribute, ImplItem, ImplItemFn, ItemImpl, LitInt, LitStr, Meta, Type};

const HTTP_METHODS: [&str; 5] = ["get", "post", "put", "delete", "patch"];

/// Generates an Axum router and a utoipa `OpenApi` struct from an impl block.
///
/// Usage:
/// ```ignore
/// struct UserController;
///
/// #[controller(tag = "users")]
/// impl UserController {
///     #[get("/users")]
///     #[utoipa_response(response = UserListResponse)]
///     pub async fn index() -> UserListResponse { ... }
/// }
/// ```
///
/// This expands to `impl Controller for UserController` (whose `router()`
/// registers every annotated method) and `pub struct UserControllerApi`, an
/// `OpenApi` listing the same paths.
#[proc_macro_attribute]
pub fn controller(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as ControllerArgs);
    let impl_block = parse_macro_input!(input as ItemImpl);
    let self_ty = &impl_block.self_ty;

    let struct_name = match &**self_ty {
        Type::Path(type_path) => match type_path.path.segments.last() {
            Some(segment) => segment.ident.clone(),
            None => {
                return syn::Error::new(self_ty.span(), "Expected a named struct type")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new(impl_block.span(), "Expected a struct type")
                .to_compile_error()
                .into();
        }
    };

    let mut route_registrations = Vec::new();
    let mut doc_functions = Vec::new();
    let mut doc_function_names = Vec::new();
    let mut schema_types = Vec::new();

    for item in &impl_block.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };

        let route = match extract_route_attr(&method.attrs) {
            Ok(Some(route)) => route,
            Ok(None) => continue,
            Err(err) => return err.to_compile_error().into(),
        };

        let responses = match extract_responses(&method.attrs) {
            Ok(responses) => responses,
            Err(err) => return err.to_compile_error().into(),
        };

        let fn_name = &method.sig.ident;
        let axum_method = format_ident!("{}", route.method);
        let path = &route.path;

        route_registrations.push(quote! {
            router = router.route(#path, axum::routing::#axum_method(#struct_name::#fn_name));
        });

        let wrapper_name = format_ident!("__utoipa_path_{}", fn_name);
        doc_functions.push(doc_wrapper(
            &struct_name,
            method,
            &wrapper_name,
            &route,
            args.tag.as_ref(),
            &responses,
        ));
        doc_function_names.push(wrapper_name);

        for response in &responses {
            response.collect_schemas(&mut schema_types);
        }
    }

    let unique_schemas = dedup_types(schema_types);
    let api_struct_name = format_ident!("{}Api", struct_name);

    let components = if unique_schemas.is_empty() {
        quote! {}
    } else {
        quote! { , components(schemas(#(#unique_schemas),*)) }
    };

    let expanded = quote! {
        #impl_block

        impl budget_tracker_core::controller::Controller for #self_ty {
            fn router() -> axum::Router {
                let mut router = axum::Router::new();

                #(#route_registrations)*

                router
            }
        }

        #(#doc_functions)*

        #[derive(utoipa::OpenApi)]
        #[openapi(paths(#(#doc_function_names),*) #components)]
        pub struct #api_struct_name;
    };

    TokenStream::from(expanded)
}

/// Builds a free function carrying `#[utoipa::path]` for one handler.
///
/// `utoipa::path` cannot sit on an associated function that the router also
/// uses, so the signature is mirrored on a module-level function that is
/// never called.
fn doc_wrapper(
    struct_name: &syn::Ident,
    method: &ImplItemFn,
    wrapper_name: &syn::Ident,
    route: &Route,
    tag: Option<&LitStr>,
    responses: &[ResponseDoc],
) -> proc_macro2::TokenStream {
    let fn_vis = &method.vis;
    let fn_async = method.sig.asyncness;
    let fn_inputs = &method.sig.inputs;
    let fn_output = &method.sig.output;
    let fn_generics = &method.sig.generics;
    let fn_where_clause = &method.sig.generics.where_clause;

    let utoipa_method = format_ident!("{}", route.method);
    let path_lit = LitStr::new(&route.path.value(), route.path.span());
    let handler = format!("{}::{}", struct_name, method.sig.ident);

    let tag_tokens = tag.map(|tag| quote! { tag = #tag, });
    let response_tokens = if responses.is_empty() {
        None
    } else {
        let rendered = responses.iter().map(ResponseDoc::to_tokens);
        Some(quote! { responses(#(#rendered),*), })
    };

    quote! {
        #[doc = concat!("OpenAPI description of ", #handler, ". Never called.")]
        #[allow(dead_code, unused_variables, non_snake_case)]
        #[utoipa::path(
            #utoipa_method,
            path = #path_lit,
            #tag_tokens
            #response_tokens
        )]
        #fn_vis #fn_async fn #wrapper_name #fn_generics(#fn_inputs) #fn_output #fn_where_clause {
            unreachable!("documentation-only wrapper for {}", #handler)
        }
    }
}

struct Route {
    method: String,
    path: LitStr,
}

/// Finds `#[get("/path")]`, `#[budget_tracker_macros::post("/path")]`, ...
fn extract_route_attr(attrs: &[Attribute]) -> syn::Result<Option<Route>> {
    for attr in attrs {
        let Some(segment) = attr.path().segments.last() else {
            continue;
        };

        let method = segment.ident.to_string().to_lowercase();
        if !HTTP_METHODS.contains(&method.as_str()) {
            continue;
        }

        let Meta::List(meta) = &attr.meta else {
            return Err(syn::Error::new(attr.span(), "expected a path literal, e.g. #[get(\"/users\")]"));
        };

        let path = syn::parse2::<LitStr>(meta.tokens.clone())?;

        return Ok(Some(Route { method, path }));
    }

    Ok(None)
}

fn extract_responses(attrs: &[Attribute]) -> syn::Result<Vec<ResponseDoc>> {
    let mut responses = Vec::new();

    for attr in attrs {
        let is_response = attr
            .path()
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "utoipa_response");

        if !is_response {
            continue;
        }

        let Meta::List(meta) = &attr.meta else {
            return Err(syn::Error::new(attr.span(), "expected #[utoipa_response(...)]"));
        };

        responses.push(syn::parse2::<ResponseDoc>(meta.tokens.clone())?);
    }

    Ok(responses)
}

/// One `#[utoipa_response(...)]` attribute.
enum ResponseDoc {
    /// `response = Type` where `Type: IntoResponses`.
    IntoResponses(Type),
    /// `status = 201, body = Type, description = "..."`, or a bare `Type` for a 200.
    Body {
        status: u16,
        body: Type,
        description: String,
    },
}

impl ResponseDoc {
    fn to_tokens(&self) -> proc_macro2::TokenStream {
        match self {
            Self::IntoResponses(ty) => quote! { #ty },
            Self::Body { status, body, description } => {
                let status = proc_macro2::Literal::u16_unsuffixed(*status);
                quote! { (status = #status, description = #description, body = #body) }
            }
        }
    }

    fn collect_schemas(&self, schema_types: &mut Vec<Type>) {
        match self {
            Self::IntoResponses(ty) => extract_generic_arguments(ty, schema_types),
            Self::Body { body, .. } => schema_types.push(body.clone()),
        }
    }
}

impl Parse for ResponseDoc {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let is_named = input.peek(syn::Ident) && input.peek2(syn::Token![=]);
        if !is_named {
            let body: Type = input.parse()?;
            return Ok(Self::Body {
                status: 200,
                body,
                description: "Success".into(),
            });
        }

        let mut status = None;
        let mut body = None;
        let mut response = None;
        let mut description = None;

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            input.parse::<syn::Token![=]>()?;

            match key.to_string().as_str() {
                "status" => status = Some(input.parse::<LitInt>()?.base10_parse::<u16>()?),
                "body" => body = Some(input.parse::<Type>()?),
                "response" => response = Some(input.parse::<Type>()?),
                "description" => description = Some(input.parse::<LitStr>()?.value()),
                other => {
                    return Err(syn::Error::new(key.span(), format!("Unknown argument: {}", other)));
                }
            }

            if !input.is_empty() {
                input.parse::<syn::Token![,]>()?;
            }
        }

        match (response, body) {
            (Some(_), Some(_)) => Err(input.error(
                "Cannot specify both 'body' and 'response'. Use 'body' for simple types or 'response' for IntoResponses types.",
            )),
            (Some(response), None) => Ok(Self::IntoResponses(response)),
            (None, Some(body)) => Ok(Self::Body {
                status: status.unwrap_or(200),
                body,
                description: description.unwrap_or_else(|| "Success".into()),
            }),
            (None, None) => Err(input.error("expected either 'body' or 'response'")),
        }
    }
}

#[derive(Default)]
struct ControllerArgs {
    tag: Option<LitStr>,
}

impl Parse for ControllerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = ControllerArgs::default();

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            input.parse::<syn::Token![=]>()?;

            if key == "tag" {
                args.tag = Some(input.parse()?);
            } else {
                return Err(syn::Error::new(key.span(), format!("Unknown argument: {}", key)));
            }

            if !input.is_empty() {
                input.parse::<syn::Token![,]>()?;
            }
        }

        Ok(args)
    }
}

/// `CoreResponse<User, Error>` yields `User` and `Error`. Type aliases are opaque
/// here, so their schemas have to be listed by hand.
fn extract_generic_arguments(ty: &Type, schema_types: &mut Vec<Type>) {
    let Type::Path(type_path) = ty else {
        return;
    };

    let Some(segment) = type_path.path.segments.last() else {
        return;
    };

    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
        for arg in &args.args {
            if let syn::GenericArgument::Type(inner) = arg {
                extract_generic_arguments(inner, schema_types);
                schema_types.push(inner.clone());
            }
        }
    }
}

fn dedup_types(types: Vec<Type>) -> Vec<Type> {
    let mut seen = std::collections::HashSet::new();

    types
        .into_iter()
        .filter(|ty| seen.insert(quote!(#ty).to_string()))
        .collect()
}

/// Marks a handler as `GET`. Read by `#[controller]`; the function is left untouched.
#[proc_macro_attribute]
pub fn get(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Marks a handler as `POST`.
#[proc_macro_attribute]
pub fn post(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Marks a handler as `PUT`.
#[proc_macro_attribute]
pub fn put(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Marks a handler as `DELETE`.
#[proc_macro_attribute]
pub fn delete(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Marks a handler as `PATCH`.
#[proc_macro_attribute]
pub fn patch(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Documents a response of the handler it sits on. Repeatable:
///
/// ```ignore
/// #[utoipa_response(User)]
/// #[utoipa_response(status = 404, body = Error, description = "User not found")]
/// #[utoipa_response(response = CoreResponse<User, Error>)]
/// ```
///
/// Consumed by `#[controller]`; the function is left untouched.
#[proc_macro_attribute]
pub fn utoipa_response(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}
