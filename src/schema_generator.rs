use crate::model::{EnumType, PrimitiveType, PropertyDeclaration, TypeReference};
use indexmap::IndexMap;
use log::debug;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Schema generator - converts declared types to Swagger 2.0 schema fragments
///
/// Object types met while generating are registered once, by name, in the
/// generator's [`DefinitionRegistry`] and referenced through `$ref`.
#[derive(Debug, Default)]
pub struct SchemaGenerator {
    definitions: DefinitionRegistry,
}

/// A Swagger schema fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// `{"type": .., "format": ..}`
    Primitive {
        schema_type: &'static str,
        format: Option<&'static str>,
    },
    /// `{"type": "array", "items": ..}`
    Array(Box<Schema>),
    /// `{"type": "string", "enum": [..]}`
    Enum(Vec<String>),
    /// `{"$ref": "#/definitions/<name>"}`, holding the definition name
    Reference(String),
    /// A full object schema written in place
    Object(ObjectSchema),
}

impl Schema {
    pub fn string() -> Self {
        Schema::Primitive {
            schema_type: "string",
            format: None,
        }
    }

    /// The JSON pointer a reference serializes to.
    pub fn reference_path(name: &str) -> String {
        format!("#/definitions/{}", name)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Schema::Primitive {
                schema_type,
                format,
            } => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", schema_type)?;
                if let Some(format) = format {
                    map.serialize_entry("format", format)?;
                }
                map.end()
            }
            Schema::Array(items) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("items", items)?;
                map.end()
            }
            Schema::Enum(values) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "string")?;
                map.serialize_entry("enum", values)?;
                map.end()
            }
            Schema::Reference(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$ref", &Schema::reference_path(name))?;
                map.end()
            }
            Schema::Object(object) => object.serialize(serializer),
        }
    }
}

/// Object schema: ordered properties plus the names flagged required
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl Serialize for ObjectSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "object")?;
        map.serialize_entry("properties", &self.properties)?;
        if !self.required.is_empty() {
            map.serialize_entry("required", &self.required)?;
        }
        map.end()
    }
}

/// Property definition for object schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(flatten)]
    pub schema: Schema,
}

/// Named object schemas shared through `$ref`.
///
/// A name is registered at most once and the first registration wins, so two
/// different types with the same name share whichever definition came first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DefinitionRegistry {
    definitions: IndexMap<String, ObjectSchema>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ObjectSchema> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Registers `name` with the schema produced by `build`, unless the name
    /// is already present. Returns whether a new definition was added.
    ///
    /// The name is reserved before `build` runs, so a type reached again while
    /// its own properties are generated only yields a `$ref`.
    pub fn register_with<F>(&mut self, name: &str, build: F) -> bool
    where
        F: FnOnce(&mut DefinitionRegistry) -> ObjectSchema,
    {
        if self.definitions.contains_key(name) {
            debug!("Definition for {} already registered", name);
            return false;
        }

        debug!("Registering definition: {}", name);
        self.definitions
            .insert(name.to_string(), ObjectSchema::default());
        let schema = build(self);
        self.definitions.insert(name.to_string(), schema);
        true
    }
}

impl SchemaGenerator {
    /// Create a new SchemaGenerator with an empty registry
    pub fn new() -> Self {
        debug!("Initializing SchemaGenerator");
        Self::default()
    }

    /// Map a type with the registry available: objects become `$ref`s and
    /// are registered as a side effect.
    pub fn generate_schema(&mut self, type_ref: &TypeReference) -> Schema {
        map_type(type_ref, Some(&mut self.definitions))
    }

    /// Map a type without touching any registry: objects are written in place.
    pub fn inline_schema(type_ref: &TypeReference) -> Schema {
        map_type(type_ref, None)
    }

    /// Object schema for a list of properties, written in place.
    pub fn inline_object(properties: &[PropertyDeclaration]) -> Schema {
        Schema::Object(object_schema(properties, None))
    }

    /// Get all registered definitions
    pub fn definitions(&self) -> &DefinitionRegistry {
        &self.definitions
    }

    pub fn into_definitions(self) -> DefinitionRegistry {
        self.definitions
    }
}

fn map_type(type_ref: &TypeReference, definitions: Option<&mut DefinitionRegistry>) -> Schema {
    match type_ref {
        TypeReference::Primitive(primitive) => primitive_to_schema(primitive),
        TypeReference::Array(element) => Schema::Array(Box::new(map_type(element, definitions))),
        TypeReference::Enum(enum_type) => enum_to_schema(enum_type),
        TypeReference::Object(object) => {
            object_reference(&object.name, &object.properties, definitions)
        }
        TypeReference::Generic(generic) if generic.argument.is_primitive_shaped() => {
            map_type(&generic.argument, definitions)
        }
        TypeReference::Generic(generic) => {
            object_reference(&generic.name, &generic.properties, definitions)
        }
        TypeReference::FrameworkResult | TypeReference::Void => {
            debug!("No schema for {}, using an empty object", type_ref.type_name());
            Schema::Object(ObjectSchema::default())
        }
    }
}

/// Convert a primitive type to a schema
fn primitive_to_schema(primitive: &PrimitiveType) -> Schema {
    let (schema_type, format) = match primitive {
        PrimitiveType::String => ("string", None),
        PrimitiveType::Date => ("string", Some("date")),
        PrimitiveType::Int32 => ("integer", Some("int32")),
        PrimitiveType::Int64 => ("integer", Some("int64")),
        PrimitiveType::Float => ("number", Some("float")),
        PrimitiveType::Boolean => ("boolean", None),
        PrimitiveType::Other(name) => {
            debug!("No dedicated mapping for {}, using string", name);
            ("string", None)
        }
    };

    Schema::Primitive {
        schema_type,
        format,
    }
}

fn enum_to_schema(enum_type: &EnumType) -> Schema {
    let values = enum_type
        .members
        .iter()
        .map(|member| format!("{} - {}", member.value, member.label()))
        .collect();
    Schema::Enum(values)
}

fn object_reference(
    name: &str,
    properties: &[PropertyDeclaration],
    definitions: Option<&mut DefinitionRegistry>,
) -> Schema {
    match definitions {
        Some(definitions) => {
            definitions.register_with(name, |definitions| {
                object_schema(properties, Some(definitions))
            });
            Schema::Reference(name.to_string())
        }
        None => Schema::Object(object_schema(properties, None)),
    }
}

fn object_schema(
    properties: &[PropertyDeclaration],
    mut definitions: Option<&mut DefinitionRegistry>,
) -> ObjectSchema {
    let mut schema = ObjectSchema::default();

    for property in properties {
        if property.is_required {
            schema.required.push(property.name.clone());
        }
        let property_schema = property_to_schema(property, definitions.as_deref_mut());
        schema
            .properties
            .insert(property.name.clone(), property_schema);
    }

    schema
}

fn property_to_schema(
    property: &PropertyDeclaration,
    definitions: Option<&mut DefinitionRegistry>,
) -> PropertySchema {
    PropertySchema {
        description: property.description_or_default(),
        example: property.example.clone(),
        max_length: property.string_length.map(|length| length.max),
        min_length: property.string_length.map(|length| length.min),
        pattern: property.pattern.clone(),
        schema: map_type(&property.declared_type, definitions),
    }
}
