use crate::attributes;
use crate::model::{
    EnumMember, EnumType, GenericType, ObjectType, PrimitiveType, PropertyDeclaration, TypeReference,
};
use crate::source::ParsedFile;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use syn::ext::IdentExt;

/// Wrappers that document as the type they hold.
const TRANSPARENT_WRAPPERS: &[&str] = &["Box", "Option", "Rc", "Arc", "Json"];

/// Collections that document as arrays of their element.
const SEQUENCES: &[&str] = &["Vec", "VecDeque", "HashSet", "BTreeSet"];

/// Opaque framework response types.
const FRAMEWORK_RESULTS: &[&str] = &["HttpResponse", "HttpResponseMessage", "IActionResult", "Response"];

/// Generic parameter name -> the type it is instantiated with
type Substitutions = HashMap<String, TypeReference>;

/// Type resolver - resolves Rust types to [`TypeReference`]s using the
/// struct and enum definitions of the parsed project
pub struct TypeResolver<'a> {
    /// Struct definitions by name, including those in inline modules
    structs: HashMap<String, &'a syn::ItemStruct>,
    /// Enum definitions by name
    enums: HashMap<String, &'a syn::ItemEnum>,
    /// Fully resolved non-generic types
    type_cache: HashMap<String, TypeReference>,
    /// Types currently being resolved, to cut circular references
    resolving_stack: HashSet<String>,
}

impl<'a> TypeResolver<'a> {
    /// Create a new TypeResolver over parsed files. When a name is defined
    /// more than once, the first definition found is used.
    pub fn new(parsed_files: &'a [ParsedFile]) -> Self {
        let mut resolver = Self {
            structs: HashMap::new(),
            enums: HashMap::new(),
            type_cache: HashMap::new(),
            resolving_stack: HashSet::new(),
        };

        for parsed_file in parsed_files {
            resolver.index_items(&parsed_file.syntax_tree.items);
        }

        debug!(
            "Initialized TypeResolver with {} struct(s) and {} enum(s) from {} file(s)",
            resolver.structs.len(),
            resolver.enums.len(),
            parsed_files.len()
        );
        resolver
    }

    fn index_items(&mut self, items: &'a [syn::Item]) {
        for item in items {
            match item {
                syn::Item::Struct(item_struct) => {
                    self.structs
                        .entry(item_struct.ident.to_string())
                        .or_insert(item_struct);
                }
                syn::Item::Enum(item_enum) => {
                    self.enums
                        .entry(item_enum.ident.to_string())
                        .or_insert(item_enum);
                }
                syn::Item::Mod(item_mod) => {
                    if let Some((_, content)) = &item_mod.content {
                        self.index_items(content);
                    }
                }
                _ => {}
            }
        }
    }

    /// Find a struct definition by name across all parsed files
    pub fn find_struct_definition(&self, name: &str) -> Option<&'a syn::ItemStruct> {
        self.structs.get(name).copied()
    }

    /// Find an enum definition by name across all parsed files
    pub fn find_enum_definition(&self, name: &str) -> Option<&'a syn::ItemEnum> {
        self.enums.get(name).copied()
    }

    /// Resolve a declared type.
    pub fn resolve(&mut self, ty: &syn::Type) -> TypeReference {
        self.resolve_with(ty, &Substitutions::new())
    }

    /// Resolve a function's return type; no return type is [`TypeReference::Void`].
    pub fn resolve_return(&mut self, output: &syn::ReturnType) -> TypeReference {
        match output {
            syn::ReturnType::Default => TypeReference::Void,
            syn::ReturnType::Type(_, ty) => self.resolve(ty),
        }
    }

    /// Resolve a type by bare name.
    pub fn resolve_named(&mut self, type_name: &str) -> TypeReference {
        self.resolve_name(type_name, &[], &Substitutions::new())
    }

    fn resolve_with(&mut self, ty: &syn::Type, substitutions: &Substitutions) -> TypeReference {
        match ty {
            syn::Type::Path(type_path) => self.resolve_path(&type_path.path, substitutions),
            syn::Type::Reference(reference) => self.resolve_with(&reference.elem, substitutions),
            syn::Type::Paren(paren) => self.resolve_with(&paren.elem, substitutions),
            syn::Type::Group(group) => self.resolve_with(&group.elem, substitutions),
            syn::Type::Slice(slice) => {
                TypeReference::array(self.resolve_with(&slice.elem, substitutions))
            }
            syn::Type::Array(array) => {
                TypeReference::array(self.resolve_with(&array.elem, substitutions))
            }
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => TypeReference::Void,
            syn::Type::ImplTrait(_) | syn::Type::TraitObject(_) => TypeReference::FrameworkResult,
            _ => {
                debug!("Unsupported type syntax, documenting it as a string");
                TypeReference::Primitive(PrimitiveType::Other("Unknown".to_string()))
            }
        }
    }

    fn resolve_path(&mut self, path: &syn::Path, substitutions: &Substitutions) -> TypeReference {
        let Some(segment) = path.segments.last() else {
            return TypeReference::Primitive(PrimitiveType::Other("Unknown".to_string()));
        };
        let type_name = segment.ident.to_string();
        let arguments = type_arguments(&segment.arguments);

        if path.segments.len() == 1 && arguments.is_empty() {
            if let Some(substituted) = substitutions.get(&type_name) {
                return substituted.clone();
            }
        }

        self.resolve_name(&type_name, &arguments, substitutions)
    }

    fn resolve_name(
        &mut self,
        type_name: &str,
        arguments: &[&syn::Type],
        substitutions: &Substitutions,
    ) -> TypeReference {
        if let Some(primitive) = parse_primitive_type(type_name) {
            return TypeReference::Primitive(primitive);
        }
        if FRAMEWORK_RESULTS.contains(&type_name) {
            return TypeReference::FrameworkResult;
        }

        let first_argument = arguments.first().copied();
        if let Some(inner) = first_argument {
            if TRANSPARENT_WRAPPERS.contains(&type_name) {
                return self.resolve_with(inner, substitutions);
            }
            if SEQUENCES.contains(&type_name) {
                return TypeReference::array(self.resolve_with(inner, substitutions));
            }
        }

        if let Some(item_struct) = self.find_struct_definition(type_name) {
            return self.resolve_struct(item_struct, arguments, substitutions);
        }
        if let Some(item_enum) = self.find_enum_definition(type_name) {
            return TypeReference::Enum(parse_enum_definition(item_enum));
        }

        if let Some(inner) = first_argument {
            debug!("{} is an external generic wrapper", type_name);
            let argument = self.resolve_with(inner, substitutions);
            return TypeReference::Generic(GenericType::new(type_name, argument));
        }

        warn!("Could not resolve type: {}, documenting it as an empty object", type_name);
        TypeReference::Object(ObjectType::new(type_name))
    }

    fn resolve_struct(
        &mut self,
        item_struct: &'a syn::ItemStruct,
        arguments: &[&syn::Type],
        substitutions: &Substitutions,
    ) -> TypeReference {
        let struct_name = item_struct.ident.to_string();

        if self.resolving_stack.contains(&struct_name) {
            debug!("Circular reference to {}, cutting it with a placeholder", struct_name);
            return TypeReference::Object(ObjectType::new(struct_name));
        }

        let type_params: Vec<String> = item_struct
            .generics
            .type_params()
            .map(|param| param.ident.to_string())
            .collect();
        let is_generic = !type_params.is_empty() && !arguments.is_empty();

        if !is_generic {
            if let Some(cached) = self.type_cache.get(&struct_name) {
                debug!("Type {} found in cache", struct_name);
                return cached.clone();
            }
        }

        let resolved_arguments: Vec<TypeReference> = arguments
            .iter()
            .map(|argument| self.resolve_with(argument, substitutions))
            .collect();
        let inner_substitutions: Substitutions = type_params
            .into_iter()
            .zip(resolved_arguments.iter().cloned())
            .collect();

        let is_top_level = self.resolving_stack.is_empty();
        self.resolving_stack.insert(struct_name.clone());
        let properties = self.parse_struct_fields(item_struct, &inner_substitutions);
        self.resolving_stack.remove(&struct_name);

        match resolved_arguments.into_iter().next() {
            Some(argument) if is_generic => TypeReference::Generic(GenericType {
                name: struct_name,
                argument: Box::new(argument),
                properties,
            }),
            _ => {
                let resolved = TypeReference::Object(ObjectType {
                    name: struct_name.clone(),
                    properties,
                });
                // Types finished under another type may hold placeholders.
                if is_top_level {
                    self.type_cache.insert(struct_name, resolved.clone());
                }
                resolved
            }
        }
    }

    /// Named fields as properties; `#[serde(skip)]` fields are left out and
    /// `#[serde(rename = "..")]` is honoured.
    fn parse_struct_fields(
        &mut self,
        item_struct: &'a syn::ItemStruct,
        substitutions: &Substitutions,
    ) -> Vec<PropertyDeclaration> {
        let syn::Fields::Named(named_fields) = &item_struct.fields else {
            return Vec::new();
        };

        let mut properties = Vec::with_capacity(named_fields.named.len());
        for field in &named_fields.named {
            let Some(ident) = &field.ident else {
                continue;
            };

            let serde = attributes::serde_field(&field.attrs);
            if serde.skip {
                debug!("Skipping serde-skipped field: {}", ident);
                continue;
            }

            let name = serde.rename.unwrap_or_else(|| ident.unraw().to_string());
            let declared_type = self.resolve_with(&field.ty, substitutions);
            properties.push(attributes::property_metadata(
                PropertyDeclaration::new(name, declared_type),
                &field.attrs,
            ));
        }

        debug!("Parsed {} field(s) of {}", properties.len(), item_struct.ident);
        properties
    }
}

fn type_arguments(arguments: &syn::PathArguments) -> Vec<&syn::Type> {
    match arguments {
        syn::PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Members with explicit discriminants keep them; the others count up from
/// the previous member, starting at 0.
fn parse_enum_definition(item_enum: &syn::ItemEnum) -> EnumType {
    let mut enum_type = EnumType::new(item_enum.ident.to_string());
    let mut next_value: i64 = 0;

    for variant in &item_enum.variants {
        let value = match &variant.discriminant {
            Some((_, expr)) => discriminant_value(expr).unwrap_or_else(|| {
                warn!(
                    "Unsupported discriminant on {}::{}, numbering it {}",
                    item_enum.ident, variant.ident, next_value
                );
                next_value
            }),
            None => next_value,
        };

        let mut member = EnumMember::new(value, variant.ident.to_string());
        if let Some(description) = attributes::description(&variant.attrs) {
            member = member.with_description(description);
        }
        enum_type = enum_type.with_member(member);
        next_value = value.wrapping_add(1);
    }

    debug!("Parsed {} member(s) of {}", enum_type.members.len(), enum_type.name);
    enum_type
}

fn discriminant_value(expr: &syn::Expr) -> Option<i64> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Int(int),
            ..
        }) => int.base10_parse().ok(),
        syn::Expr::Unary(syn::ExprUnary {
            op: syn::UnOp::Neg(_),
            expr,
            ..
        }) => discriminant_value(expr).and_then(i64::checked_neg),
        syn::Expr::Paren(paren) => discriminant_value(&paren.expr),
        syn::Expr::Group(group) => discriminant_value(&group.expr),
        _ => None,
    }
}

/// Parse a primitive type name
fn parse_primitive_type(type_name: &str) -> Option<PrimitiveType> {
    match type_name {
        "String" | "str" | "char" => Some(PrimitiveType::String),
        "i8" | "i16" | "i32" | "u8" | "u16" | "u32" => Some(PrimitiveType::Int32),
        "i64" | "u64" | "isize" | "usize" => Some(PrimitiveType::Int64),
        "f32" => Some(PrimitiveType::Float),
        "bool" => Some(PrimitiveType::Boolean),
        "NaiveDate" | "NaiveDateTime" | "DateTime" | "OffsetDateTime" | "Date" | "SystemTime" => {
            Some(PrimitiveType::Date)
        }
        "f64" | "i128" | "u128" | "Uuid" | "Decimal" => {
            Some(PrimitiveType::Other(type_name.to_string()))
        }
        _ => None,
    }
}
