//! Readers for the annotations that describe functions, parameters and
//! model properties.
//!
//! Malformed annotations are logged and ignored; they never stop discovery.

use crate::model::{HttpMethod, HttpTrigger, PropertyDeclaration, ResponseDeclaration};
use log::warn;
use syn::{Attribute, LitBool, LitInt, LitStr};

/// All attributes whose last path segment is `name`.
pub fn find_all<'a>(attrs: &'a [Attribute], name: &'a str) -> impl Iterator<Item = &'a Attribute> {
    attrs.iter().filter(move |attr| {
        attr.path()
            .segments
            .last()
            .is_some_and(|segment| segment.ident == name)
    })
}

pub fn first<'a>(attrs: &'a [Attribute], name: &'a str) -> Option<&'a Attribute> {
    find_all(attrs, name).next()
}

/// Whether a marker attribute such as `#[required]` is present.
pub fn has(attrs: &[Attribute], name: &str) -> bool {
    first(attrs, name).is_some()
}

fn attr_name(attr: &Attribute) -> String {
    attr.path()
        .segments
        .last()
        .map(|segment| segment.ident.to_string())
        .unwrap_or_default()
}

/// The string of `#[name("value")]`.
pub fn string_argument(attr: &Attribute) -> Option<String> {
    match attr.parse_args::<LitStr>() {
        Ok(lit) => Some(lit.value()),
        Err(e) => {
            warn!("Ignoring malformed #[{}]: {}", attr_name(attr), e);
            None
        }
    }
}

/// `#[function_name("Name")]`
pub fn function_name(attrs: &[Attribute]) -> Option<String> {
    first(attrs, "function_name").and_then(string_argument)
}

/// `#[description("..")]` on an enum variant
pub fn description(attrs: &[Attribute]) -> Option<String> {
    first(attrs, "description").and_then(string_argument)
}

/// Arguments of `#[display(name = "..", description = "..")]`
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DisplayArgs {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub fn display(attrs: &[Attribute]) -> DisplayArgs {
    let Some(attr) = first(attrs, "display") else {
        return DisplayArgs::default();
    };

    let mut display = DisplayArgs::default();
    let parsed = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            display.name = Some(meta.value()?.parse::<LitStr>()?.value());
            Ok(())
        } else if meta.path.is_ident("description") {
            display.description = Some(meta.value()?.parse::<LitStr>()?.value());
            Ok(())
        } else {
            Err(meta.error("expected `name` or `description`"))
        }
    });

    match parsed {
        Ok(()) => display,
        Err(e) => {
            warn!("Ignoring malformed #[display]: {}", e);
            DisplayArgs::default()
        }
    }
}

/// Every `#[response(status = .., description = "..", show_schema = ..)]`,
/// in declaration order.
pub fn responses(attrs: &[Attribute]) -> Vec<ResponseDeclaration> {
    let mut responses = Vec::new();

    for attr in find_all(attrs, "response") {
        let mut status_code = None;
        let mut description = String::new();
        let mut show_schema = true;

        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("status") {
                status_code = Some(meta.value()?.parse::<LitInt>()?.base10_parse::<u16>()?);
            } else if meta.path.is_ident("description") {
                description = meta.value()?.parse::<LitStr>()?.value();
            } else if meta.path.is_ident("show_schema") {
                show_schema = meta.value()?.parse::<LitBool>()?.value;
            } else {
                return Err(meta.error("expected `status`, `description` or `show_schema`"));
            }
            Ok(())
        });

        match (parsed, status_code) {
            (Ok(()), Some(status_code)) => responses.push(ResponseDeclaration {
                status_code,
                description,
                show_schema,
            }),
            (Ok(()), None) => warn!("Ignoring #[response] without a status"),
            (Err(e), _) => warn!("Ignoring malformed #[response]: {}", e),
        }
    }

    responses
}

/// The type named by `#[produces_response_type(Type)]`.
pub fn produces_response_type(attrs: &[Attribute]) -> Option<syn::Type> {
    let attr = first(attrs, "produces_response_type")?;
    match attr.parse_args::<syn::Type>() {
        Ok(ty) => Some(ty),
        Err(e) => {
            warn!("Ignoring malformed #[produces_response_type]: {}", e);
            None
        }
    }
}

/// `#[http_trigger]` or `#[http_trigger(route = "..", methods = ["get", ..])]`
///
/// A malformed trigger still marks the parameter, with default settings.
pub fn http_trigger(attrs: &[Attribute]) -> Option<HttpTrigger> {
    let attr = first(attrs, "http_trigger")?;
    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Some(HttpTrigger::new());
    }

    let mut trigger = HttpTrigger::new();
    let parsed = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("route") {
            trigger.route = Some(meta.value()?.parse::<LitStr>()?.value());
            return Ok(());
        }
        if !meta.path.is_ident("methods") {
            return Err(meta.error("expected `route` or `methods`"));
        }

        let array: syn::ExprArray = meta.value()?.parse()?;
        let mut methods = Vec::with_capacity(array.elems.len());
        for element in &array.elems {
            let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) = element
            else {
                return Err(meta.error("methods must be string literals"));
            };
            match lit.value().parse::<HttpMethod>() {
                Ok(method) => methods.push(method),
                Err(e) => warn!("Ignoring {}", e),
            }
        }
        trigger.methods = Some(methods);
        Ok(())
    });

    match parsed {
        Ok(()) => Some(trigger),
        Err(e) => {
            warn!("Malformed #[http_trigger], using defaults: {}", e);
            Some(HttpTrigger::new())
        }
    }
}

/// Applies the property annotations (`required`, `display`, `example`,
/// `string_length`, `regex`) to a property.
pub fn property_metadata(mut property: PropertyDeclaration, attrs: &[Attribute]) -> PropertyDeclaration {
    if has(attrs, "required") {
        property = property.required();
    }
    if let Some(description) = display(attrs).description {
        property = property.with_description(description);
    }
    if let Some(example) = first(attrs, "example").and_then(string_argument) {
        property = property.with_example(example);
    }
    if let Some((min, max)) = first(attrs, "string_length").and_then(string_length) {
        property = property.with_string_length(min, max);
    }
    if let Some(pattern) = first(attrs, "regex").and_then(string_argument) {
        property = property.with_pattern(pattern);
    }
    property
}

/// `(min, max)` of `#[string_length(max = N, min = M)]`; `min` defaults to 0.
fn string_length(attr: &Attribute) -> Option<(usize, usize)> {
    let mut max: Option<usize> = None;
    let mut min: usize = 0;

    let parsed = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("max") {
            max = Some(meta.value()?.parse::<LitInt>()?.base10_parse()?);
        } else if meta.path.is_ident("min") {
            min = meta.value()?.parse::<LitInt>()?.base10_parse()?;
        } else {
            return Err(meta.error("expected `max` or `min`"));
        }
        Ok(())
    });

    match (parsed, max) {
        (Ok(()), Some(max)) => Some((min, max)),
        (Ok(()), None) => {
            warn!("Ignoring #[string_length] without `max`");
            None
        }
        (Err(e), _) => {
            warn!("Ignoring malformed #[string_length]: {}", e);
            None
        }
    }
}

/// The parts of `#[serde(..)]` that change a field's wire shape.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SerdeField {
    pub rename: Option<String>,
    pub skip: bool,
}

pub fn serde_field(attrs: &[Attribute]) -> SerdeField {
    let mut field = SerdeField::default();

    for attr in find_all(attrs, "serde") {
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                field.rename = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                field.skip = true;
            } else if meta.input.peek(syn::Token![=]) {
                meta.value()?.parse::<syn::Expr>()?;
            } else if meta.input.peek(syn::token::Paren) {
                let _nested;
                syn::parenthesized!(_nested in meta.input);
            }
            Ok(())
        });

        if let Err(e) = parsed {
            warn!("Ignoring malformed #[serde]: {}", e);
        }
    }

    field
}
