//! Rust-specific template context builder for Graphgen codegen.
//!
//! Translates parsed schema definitions into the names and types the
//! embedded templates render: struct fields, enum variants and resolver
//! trait methods, with schema scalars and model-map bindings mapped to
//! Rust types.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::TypeBinding;
use crate::schema::{Document, TypeDefinition, TypeKind, TypeRef};

/// Root operation types; never generated as data models.
const OPERATION_ROOTS: &[&str] = &["Query", "Mutation", "Subscription"];

/// Template context for a generated struct.
#[derive(Debug, Clone, Serialize)]
pub struct ModelContext {
    pub name: String,
    pub schema_name: String,
    pub is_input: bool,
    pub fields: Vec<FieldContext>,
}

/// Template context for a struct field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldContext {
    pub name: String,
    pub schema_name: String,
    /// Whether the Rust field name differs from the schema field name
    pub renamed: bool,
    pub rust_type: String,
}

/// Template context for a generated enum.
#[derive(Debug, Clone, Serialize)]
pub struct EnumContext {
    pub name: String,
    pub schema_name: String,
    pub values: Vec<EnumValueContext>,
}

/// Template context for an enum variant.
#[derive(Debug, Clone, Serialize)]
pub struct EnumValueContext {
    pub name: String,
    pub schema_name: String,
    pub renamed: bool,
}

/// Template context for one resolver trait method.
#[derive(Debug, Clone, Serialize)]
pub struct ResolverField {
    pub fn_name: String,
    pub schema_name: String,
    pub arguments: Vec<ArgumentContext>,
    pub rust_type: String,
}

/// Template context for a resolver method argument.
#[derive(Debug, Clone, Serialize)]
pub struct ArgumentContext {
    pub name: String,
    pub rust_type: String,
}

/// Build struct contexts for every object and input type that is not an
/// operation root and not bound to an existing Rust type.
pub fn build_models(doc: &Document, bindings: &BTreeMap<String, TypeBinding>) -> Vec<ModelContext> {
    doc.definitions
        .iter()
        .filter(|def| matches!(def.kind, TypeKind::Object | TypeKind::Input))
        .filter(|def| !OPERATION_ROOTS.contains(&def.name.as_str()))
        .filter(|def| !bindings.contains_key(&def.name))
        .map(|def| ModelContext {
            name: to_upper_camel_case(&def.name),
            schema_name: def.name.clone(),
            is_input: def.kind == TypeKind::Input,
            fields: def
                .fields
                .iter()
                .map(|field| {
                    let name = escape_ident(to_snake_case(&field.name));
                    FieldContext {
                        renamed: name != field.name,
                        name,
                        schema_name: field.name.clone(),
                        rust_type: rust_type(&field.ty, bindings),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Build enum contexts for every unbound enum definition.
pub fn build_enums(doc: &Document, bindings: &BTreeMap<String, TypeBinding>) -> Vec<EnumContext> {
    doc.definitions
        .iter()
        .filter(|def| def.kind == TypeKind::Enum)
        .filter(|def| !bindings.contains_key(&def.name))
        .map(|def| EnumContext {
            name: to_upper_camel_case(&def.name),
            schema_name: def.name.clone(),
            values: def
                .values
                .iter()
                .map(|value| {
                    let name = to_upper_camel_case(value);
                    EnumValueContext {
                        renamed: name != *value,
                        name,
                        schema_name: value.clone(),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Build resolver trait methods for the fields of an operation root.
pub fn build_resolver_fields(
    def: &TypeDefinition,
    bindings: &BTreeMap<String, TypeBinding>,
) -> Vec<ResolverField> {
    def.fields
        .iter()
        .map(|field| ResolverField {
            fn_name: escape_ident(to_snake_case(&field.name)),
            schema_name: field.name.clone(),
            arguments: field
                .arguments
                .iter()
                .map(|arg| ArgumentContext {
                    name: escape_ident(to_snake_case(&arg.name)),
                    rust_type: rust_type(&arg.ty, bindings),
                })
                .collect(),
            rust_type: rust_type(&field.ty, bindings),
        })
        .collect()
}

/// Map a schema type reference to a Rust type, honoring model-map
/// bindings before built-in scalars.
pub fn rust_type(ty: &TypeRef, bindings: &BTreeMap<String, TypeBinding>) -> String {
    match ty {
        TypeRef::Named { name, non_null } => {
            let base = bindings
                .get(name)
                .map(|binding| binding.model.clone())
                .or_else(|| scalar_binding(name).map(str::to_string))
                .unwrap_or_else(|| to_upper_camel_case(name));
            wrap_nullable(base, *non_null)
        }
        TypeRef::List { of, non_null } => {
            wrap_nullable(format!("Vec<{}>", rust_type(of, bindings)), *non_null)
        }
    }
}

fn scalar_binding(name: &str) -> Option<&'static str> {
    match name {
        "ID" | "String" => Some("String"),
        "Int" => Some("i32"),
        "Float" => Some("f64"),
        "Boolean" => Some("bool"),
        _ => None,
    }
}

fn wrap_nullable(base: String, non_null: bool) -> String {
    if non_null {
        base
    } else {
        format!("Option<{base}>")
    }
}

/// Convert a schema name to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for ch in s.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else if ch.is_alphanumeric() {
            out.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
            prev_lower = false;
        }
    }
    out.trim_end_matches('_').to_string()
}

/// Convert a schema name to UpperCamelCase
pub fn to_upper_camel_case(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

const RESERVED: &[&str] = &[
    "as", "async", "await", "box", "dyn", "else", "enum", "fn", "for", "if", "impl", "in", "let",
    "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "trait",
    "type", "use", "where", "while",
];

// `self`/`super`/`crate` cannot be raw identifiers.
fn escape_ident(name: String) -> String {
    match name.as_str() {
        "self" | "super" | "crate" => format!("{name}_"),
        n if RESERVED.contains(&n) => format!("r#{name}"),
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn bindings(pairs: &[(&str, &str)]) -> BTreeMap<String, TypeBinding> {
        pairs
            .iter()
            .map(|(name, model)| {
                (
                    name.to_string(),
                    TypeBinding {
                        model: model.to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(to_snake_case("userId"), "user_id");
        assert_eq!(to_snake_case("NewTodo"), "new_todo");
        assert_eq!(to_snake_case("OPEN"), "open");
        assert_eq!(to_upper_camel_case("new_todo"), "NewTodo");
        assert_eq!(to_upper_camel_case("IN_PROGRESS"), "InProgress");
        assert_eq!(to_upper_camel_case("userId"), "UserId");
    }

    #[test]
    fn test_reserved_names_are_escaped() {
        assert_eq!(escape_ident("type".to_string()), "r#type");
        assert_eq!(escape_ident("self".to_string()), "self_");
        assert_eq!(escape_ident("text".to_string()), "text");
    }

    #[test]
    fn test_scalar_and_modifier_mapping() {
        let doc = schema::parse(
            "type Query { a: Int! b: Float c: [String!]! d: [Boolean] e: ID! }",
        )
        .unwrap();
        let fields = build_resolver_fields(doc.get("Query").unwrap(), &BTreeMap::new());
        let types: Vec<&str> = fields.iter().map(|f| f.rust_type.as_str()).collect();
        assert_eq!(
            types,
            vec![
                "i32",
                "Option<f64>",
                "Vec<String>",
                "Option<Vec<Option<bool>>>",
                "String",
            ]
        );
    }

    #[test]
    fn test_bindings_take_precedence() {
        let doc = schema::parse("scalar DateTime\ntype Query { now: DateTime! }").unwrap();
        let bindings = bindings(&[("DateTime", "chrono::DateTime<chrono::Utc>")]);
        let fields = build_resolver_fields(doc.get("Query").unwrap(), &bindings);
        assert_eq!(fields[0].rust_type, "chrono::DateTime<chrono::Utc>");
    }

    #[test]
    fn test_build_models_skips_roots_and_bound_types() {
        let doc = schema::parse(
            "type Todo { id: ID! userId: String! }\n\
             type User { id: ID! }\n\
             type Query { todos: [Todo!]! }\n\
             input NewTodo { text: String! }",
        )
        .unwrap();
        let bindings = bindings(&[("User", "crate::auth::User")]);
        let models = build_models(&doc, &bindings);

        let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Todo", "NewTodo"]);
        assert!(models[1].is_input);

        let user_id = &models[0].fields[1];
        assert_eq!(user_id.name, "user_id");
        assert!(user_id.renamed);
        assert_eq!(user_id.schema_name, "userId");
    }

    #[test]
    fn test_build_enums() {
        let doc = schema::parse("enum Status { OPEN IN_PROGRESS CLOSED }").unwrap();
        let enums = build_enums(&doc, &BTreeMap::new());
        assert_eq!(enums.len(), 1);
        let values: Vec<&str> = enums[0].values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(values, vec!["Open", "InProgress", "Closed"]);
        assert!(enums[0].values[0].renamed);
    }
}
