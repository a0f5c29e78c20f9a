//! Endpoint discovery from annotated Rust source.
//!
//! A function becomes an endpoint candidate when it carries
//! `#[function_name("Name")]`, whether it is a free function or an `impl`
//! method:
//!
//! ```ignore
//! #[function_name("GetWidget")]
//! #[display(name = "Get a widget")]
//! #[response(status = 200, description = "Widget found")]
//! #[response(status = 404, description = "No such widget", show_schema = false)]
//! pub async fn get_widget(
//!     #[http_trigger(route = "widgets/{id}", methods = ["get"])] req: HttpRequest,
//!     id: String,
//!     #[inject] store: WidgetStore,
//! ) -> Result<Widget, Error> {
//!     todo!()
//! }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use functions_swagger::extractor::{AnnotationExtractor, EndpointExtractor};
//! use functions_swagger::source::SourceParser;
//! use std::path::Path;
//!
//! let parsed = SourceParser::parse_file(Path::new("src/functions.rs")).unwrap();
//! let candidates = AnnotationExtractor.extract_candidates(&[parsed]);
//! println!("Found {} candidates", candidates.len());
//! ```

use crate::attributes;
use crate::model::{EndpointCandidate, ParameterDeclaration, TypeReference};
use crate::source::ParsedFile;
use crate::type_resolver::TypeResolver;
use log::{debug, info};
use syn::ext::IdentExt;
use syn::visit::{self, Visit};

/// Parameter types the function host supplies itself.
const INJECTED_TYPES: &[&str] = &["HttpRequest", "Logger", "ILogger", "ExecutionContext"];

/// Trait for building endpoint candidates from parsed Rust files.
pub trait EndpointExtractor {
    /// Extracts every endpoint candidate across the parsed files, in file
    /// order and then source order.
    fn extract_candidates(&self, parsed_files: &[ParsedFile]) -> Vec<EndpointCandidate>;
}

/// Extractor for functions marked with the endpoint annotations.
pub struct AnnotationExtractor;

impl EndpointExtractor for AnnotationExtractor {
    fn extract_candidates(&self, parsed_files: &[ParsedFile]) -> Vec<EndpointCandidate> {
        let mut resolver = TypeResolver::new(parsed_files);
        let mut visitor = FunctionVisitor {
            resolver: &mut resolver,
            candidates: Vec::new(),
        };

        for parsed_file in parsed_files {
            debug!("Extracting candidates from {}", parsed_file.path.display());
            visitor.visit_file(&parsed_file.syntax_tree);
        }

        info!("Found {} endpoint candidate(s)", visitor.candidates.len());
        visitor.candidates
    }
}

/// Visitor collecting annotated functions
struct FunctionVisitor<'r, 'a> {
    resolver: &'r mut TypeResolver<'a>,
    candidates: Vec<EndpointCandidate>,
}

impl FunctionVisitor<'_, '_> {
    fn inspect(&mut self, attrs: &[syn::Attribute], sig: &syn::Signature) {
        let Some(name) = attributes::function_name(attrs) else {
            return;
        };
        debug!("Found function {} ({})", name, sig.ident);

        let mut candidate = EndpointCandidate::new(name);
        if attributes::has(attrs, "disable") {
            candidate = candidate.disabled();
        }

        let display = attributes::display(attrs);
        if let Some(display_name) = display.name {
            candidate = candidate.with_display_name(display_name);
        }
        if let Some(description) = display.description {
            candidate = candidate.with_display_description(description);
        }

        for response in attributes::responses(attrs) {
            candidate = candidate.with_response(response);
        }
        if let Some(response_type) = attributes::produces_response_type(attrs) {
            candidate = candidate.with_response_type(self.resolver.resolve(&response_type));
        }

        let typed_inputs = sig.inputs.iter().filter_map(|input| match input {
            syn::FnArg::Typed(pat_type) => Some(pat_type),
            syn::FnArg::Receiver(_) => None,
        });
        for (index, pat_type) in typed_inputs.enumerate() {
            candidate = candidate.with_parameter(self.parameter(index, pat_type));
        }

        candidate = candidate.returning(self.resolver.resolve_return(&sig.output));
        self.candidates.push(candidate);
    }

    fn parameter(&mut self, index: usize, pat_type: &syn::PatType) -> ParameterDeclaration {
        let name = pattern_name(&pat_type.pat).unwrap_or_else(|| format!("arg{}", index));
        let attrs = &pat_type.attrs;

        if let Some(trigger) = attributes::http_trigger(attrs) {
            debug!("{} carries the HTTP trigger", name);
            return ParameterDeclaration::trigger(name, trigger);
        }

        if attributes::has(attrs, "inject") || is_injected_type(&pat_type.ty) {
            debug!("{} is supplied by the host", name);
            return ParameterDeclaration::new(name, TypeReference::FrameworkResult).injected();
        }

        let mut parameter = ParameterDeclaration::new(name, self.resolver.resolve(&pat_type.ty));
        if attributes::has(attrs, "from_query") {
            parameter = parameter.from_query();
        }
        if attributes::has(attrs, "required") {
            parameter = parameter.required();
        }
        parameter
    }
}

impl<'ast> Visit<'ast> for FunctionVisitor<'_, '_> {
    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        self.inspect(&node.attrs, &node.sig);
        visit::visit_item_fn(self, node);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        self.inspect(&node.attrs, &node.sig);
        visit::visit_impl_item_fn(self, node);
    }
}

/// Binding name of a parameter pattern; `Json(body)` binds `body`.
fn pattern_name(pat: &syn::Pat) -> Option<String> {
    match pat {
        syn::Pat::Ident(pat_ident) => Some(pat_ident.ident.unraw().to_string()),
        syn::Pat::TupleStruct(tuple) => tuple.elems.iter().find_map(pattern_name),
        syn::Pat::Tuple(tuple) => tuple.elems.iter().find_map(pattern_name),
        syn::Pat::Reference(reference) => pattern_name(&reference.pat),
        syn::Pat::Type(pat_type) => pattern_name(&pat_type.pat),
        _ => None,
    }
}

fn is_injected_type(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Reference(reference) => is_injected_type(&reference.elem),
        syn::Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| INJECTED_TYPES.iter().any(|name| segment.ident == name)),
        _ => false,
    }
}
