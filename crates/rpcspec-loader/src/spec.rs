//! # Spec Loader
//!
//! Reads an OpenRPC document and builds the [`MethodRegistry`] the checker
//! validates against.
//!
//! ## Document shape
//!
//! Only the parts a conformance check needs are read: `methods[].name`,
//! `methods[].params[]` and `methods[].result`, each a content descriptor
//! (`name`, `schema`, `required`) or a `$ref` into
//! `#/components/contentDescriptors`. Everything else is ignored.
//!
//! ## Reference inlining
//!
//! Parameter and result schemas are compiled on their own, away from the
//! document they came from, so `$ref`s into `#/components/schemas` are
//! replaced by the referenced schema before the registry is built. Other
//! `$ref`s (e.g. `#/definitions/...` inside a schema) are left for the
//! schema engine. Recursive component schemas cannot be inlined and are
//! rejected.

use std::path::Path;

use rpcspec_core::{MethodRegistry, MethodSchema, ParamSchema, RegistryError, ResultSchema};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
const DESCRIPTOR_REF_PREFIX: &str = "#/components/contentDescriptors/";

/// Error loading a specification document.
#[derive(Error, Debug)]
pub enum SpecLoadError {
    /// The document file could not be read.
    #[error("cannot read spec '{path}': {source}")]
    Io {
        /// Path to the document.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The document is not valid JSON or YAML.
    #[error("cannot parse spec '{path}': {reason}")]
    Parse {
        /// Path to the document.
        path: String,
        /// Reason parsing failed.
        reason: String,
    },

    /// The document parsed but does not have the expected shape.
    #[error("invalid spec document: {0}")]
    InvalidDocument(String),

    /// A method has no result content descriptor.
    #[error("method {method} has no result")]
    MissingResult {
        /// The method name.
        method: String,
    },

    /// A component reference does not resolve.
    #[error("unresolved reference '{reference}' in method {method}")]
    UnresolvedReference {
        /// The `$ref` value.
        reference: String,
        /// The method being loaded.
        method: String,
    },

    /// A component schema refers back to itself.
    #[error("cyclic reference '{reference}' in method {method}")]
    CyclicReference {
        /// The `$ref` value that closed the cycle.
        reference: String,
        /// The method being loaded.
        method: String,
    },

    /// The methods could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// An OpenRPC content descriptor, as far as the checker cares.
#[derive(Debug, Deserialize)]
struct ContentDescriptor {
    #[serde(default)]
    name: String,
    #[serde(default)]
    required: bool,
    schema: Value,
}

/// Load an OpenRPC document from `path` into a registry.
///
/// Files ending in `.yaml` or `.yml` are read as YAML, anything else as
/// JSON.
///
/// # Errors
///
/// Returns `SpecLoadError::Io` or `SpecLoadError::Parse` if the file cannot
/// be read or decoded, and the errors of [`parse_spec`] otherwise.
pub fn load_spec(path: &Path) -> Result<MethodRegistry, SpecLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| SpecLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let document = match ext {
        "yaml" | "yml" => {
            let yaml_value: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|e| SpecLoadError::Parse {
                    path: path.display().to_string(),
                    reason: format!("invalid YAML: {e}"),
                })?;
            yaml_to_json_value(&yaml_value).map_err(|reason| SpecLoadError::Parse {
                path: path.display().to_string(),
                reason: format!("YAML-to-JSON conversion failed: {reason}"),
            })?
        }
        _ => serde_json::from_str(&content).map_err(|e| SpecLoadError::Parse {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        })?,
    };

    let registry = parse_spec(&document)?;
    tracing::info!(
        spec = %path.display(),
        methods = registry.len(),
        "loaded specification"
    );
    Ok(registry)
}

/// Build a registry from an already-decoded OpenRPC document.
///
/// # Errors
///
/// Returns `InvalidDocument` for structural problems, `MissingResult`,
/// `UnresolvedReference` or `CyclicReference` for method-level problems,
/// and `Registry` for duplicate method names.
pub fn parse_spec(document: &Value) -> Result<MethodRegistry, SpecLoadError> {
    let methods = document
        .get("methods")
        .and_then(Value::as_array)
        .ok_or_else(|| SpecLoadError::InvalidDocument("missing 'methods' array".to_string()))?;

    let empty = Map::new();
    let components = document.get("components");
    let schemas = component_map(components, "schemas").unwrap_or(&empty);
    let descriptors = component_map(components, "contentDescriptors").unwrap_or(&empty);

    let mut registry = MethodRegistry::new();
    for (i, method) in methods.iter().enumerate() {
        let name = method
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SpecLoadError::InvalidDocument(format!("methods[{i}] has no name")))?;

        let resolver = Resolver {
            method: name,
            schemas,
            descriptors,
        };

        let params = match method.get("params") {
            None => Vec::new(),
            Some(Value::Array(params)) => params
                .iter()
                .map(|p| {
                    let cd = resolver.descriptor(p)?;
                    Ok(ParamSchema {
                        name: cd.name,
                        schema: cd.schema,
                        required: cd.required,
                    })
                })
                .collect::<Result<Vec<_>, SpecLoadError>>()?,
            Some(_) => {
                return Err(SpecLoadError::InvalidDocument(format!(
                    "params of method {name} must be an array"
                )))
            }
        };

        let result = method
            .get("result")
            .ok_or_else(|| SpecLoadError::MissingResult {
                method: name.to_string(),
            })
            .and_then(|r| resolver.descriptor(r))?;

        tracing::debug!(method = name, params = params.len(), "loaded method");
        registry.insert(MethodSchema::new(
            name,
            params,
            ResultSchema::new(result.name, result.schema),
        ))?;
    }

    Ok(registry)
}

fn component_map<'a>(components: Option<&'a Value>, kind: &str) -> Option<&'a Map<String, Value>> {
    components?.get(kind)?.as_object()
}

/// Resolves component references for a single method.
struct Resolver<'a> {
    method: &'a str,
    schemas: &'a Map<String, Value>,
    descriptors: &'a Map<String, Value>,
}

impl Resolver<'_> {
    /// Resolve a content descriptor (or a reference to one) and inline the
    /// component references in its schema.
    fn descriptor(&self, value: &Value) -> Result<ContentDescriptor, SpecLoadError> {
        let value = match ref_target(value) {
            Some(reference) => reference
                .strip_prefix(DESCRIPTOR_REF_PREFIX)
                .and_then(|name| self.descriptors.get(&unescape_pointer(name)))
                .ok_or_else(|| self.unresolved(reference))?,
            None => value,
        };

        let mut cd: ContentDescriptor = serde_json::from_value(value.clone()).map_err(|e| {
            SpecLoadError::InvalidDocument(format!(
                "bad content descriptor in method {}: {e}",
                self.method
            ))
        })?;
        cd.schema = self.inline(&cd.schema, &mut Vec::new())?;
        Ok(cd)
    }

    fn inline(&self, schema: &Value, stack: &mut Vec<String>) -> Result<Value, SpecLoadError> {
        match schema {
            Value::Object(map) => {
                if let Some(reference) = ref_target(schema) {
                    if let Some(name) = reference.strip_prefix(SCHEMA_REF_PREFIX) {
                        let name = unescape_pointer(name);
                        if stack.contains(&name) {
                            return Err(SpecLoadError::CyclicReference {
                                reference: reference.to_string(),
                                method: self.method.to_string(),
                            });
                        }
                        let target = self
                            .schemas
                            .get(&name)
                            .ok_or_else(|| self.unresolved(reference))?;

                        // Siblings of `$ref` are ignored under draft-07.
                        stack.push(name);
                        let resolved = self.inline(target, stack);
                        stack.pop();
                        return resolved;
                    }
                }
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), self.inline(v, stack)?)))
                    .collect::<Result<Map<_, _>, _>>()
                    .map(Value::Object)
            }
            Value::Array(items) => items
                .iter()
                .map(|v| self.inline(v, stack))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn unresolved(&self, reference: &str) -> SpecLoadError {
        SpecLoadError::UnresolvedReference {
            reference: reference.to_string(),
            method: self.method.to_string(),
        }
    }
}

fn ref_target(value: &Value) -> Option<&str> {
    value.get("$ref").and_then(Value::as_str)
}

/// Decode a JSON Pointer reference token (`~1` is `/`, `~0` is `~`).
fn unescape_pointer(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// OpenRPC documents written in YAML use only the JSON-compatible subset;
/// tags are dropped and scalar keys are stringified.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sum_document() -> Value {
        json!({
            "openrpc": "1.2.4",
            "info": {"title": "calculator", "version": "1.0.0"},
            "methods": [
                {
                    "name": "sum",
                    "params": [
                        {"name": "a", "required": true, "schema": {"type": "integer"}},
                        {"name": "b", "required": true, "schema": {"type": "integer"}}
                    ],
                    "result": {"name": "total", "schema": {"type": "integer"}}
                },
                {
                    "name": "greet",
                    "params": [
                        {"name": "greeting", "required": true, "schema": {"type": "string"}},
                        {"name": "loud", "schema": {"type": "boolean"}}
                    ],
                    "result": {"name": "reply", "schema": {"type": "string"}}
                }
            ]
        })
    }

    #[test]
    fn parses_methods_in_declaration_order() {
        let registry = parse_spec(&sum_document()).unwrap();
        assert_eq!(registry.len(), 2);

        let sum = registry.lookup("sum").unwrap();
        assert_eq!(sum.params.len(), 2);
        assert_eq!(sum.params[0].name, "a");
        assert!(sum.params[1].required);
        assert_eq!(sum.result.schema, json!({"type": "integer"}));
    }

    #[test]
    fn required_defaults_to_false() {
        let registry = parse_spec(&sum_document()).unwrap();
        let greet = registry.lookup("greet").unwrap();
        assert!(greet.params[0].required);
        assert!(!greet.params[1].required);
    }

    #[test]
    fn missing_params_means_no_params() {
        let doc = json!({"methods": [{"name": "eth_chainId", "result": {"name": "id", "schema": {"type": "string"}}}]});
        let registry = parse_spec(&doc).unwrap();
        assert!(registry.lookup("eth_chainId").unwrap().params.is_empty());
    }

    #[test]
    fn missing_methods_is_invalid() {
        let err = parse_spec(&json!({"openrpc": "1.2.4"})).unwrap_err();
        assert!(matches!(err, SpecLoadError::InvalidDocument(_)));
    }

    #[test]
    fn missing_name_is_invalid() {
        let doc = json!({"methods": [{"result": {"name": "r", "schema": {}}}]});
        let err = parse_spec(&doc).unwrap_err();
        assert!(err.to_string().contains("methods[0]"));
    }

    #[test]
    fn missing_result_is_rejected() {
        let doc = json!({"methods": [{"name": "eth_subscribe", "params": []}]});
        let err = parse_spec(&doc).unwrap_err();
        assert!(matches!(err, SpecLoadError::MissingResult { ref method } if method == "eth_subscribe"));
    }

    #[test]
    fn duplicate_methods_are_rejected() {
        let mut doc = sum_document();
        let first = doc["methods"][0].clone();
        doc["methods"].as_array_mut().unwrap().push(first);
        let err = parse_spec(&doc).unwrap_err();
        assert!(matches!(err, SpecLoadError::Registry(RegistryError::DuplicateMethod { .. })));
    }

    #[test]
    fn schema_references_are_inlined() {
        let doc = json!({
            "methods": [{
                "name": "eth_getBlockByNumber",
                "params": [{"name": "block", "required": true, "schema": {"$ref": "#/components/schemas/BlockTag"}}],
                "result": {"name": "block", "schema": {
                    "oneOf": [{"type": "null"}, {"$ref": "#/components/schemas/Block"}]
                }}
            }],
            "components": {"schemas": {
                "BlockTag": {"type": "string", "enum": ["latest", "earliest", "pending"]},
                "Block": {"type": "object", "properties": {"hash": {"$ref": "#/components/schemas/Hash"}}},
                "Hash": {"type": "string", "pattern": "^0x[0-9a-f]{64}$"}
            }}
        });
        let registry = parse_spec(&doc).unwrap();
        let method = registry.lookup("eth_getBlockByNumber").unwrap();
        assert_eq!(method.params[0].schema["enum"][0], "latest");
        assert_eq!(
            method.result.schema["oneOf"][1]["properties"]["hash"]["pattern"],
            "^0x[0-9a-f]{64}$"
        );
        assert!(!method.result.schema.to_string().contains("$ref"));
    }

    #[test]
    fn content_descriptor_references_resolve() {
        let doc = json!({
            "methods": [{
                "name": "eth_getBalance",
                "params": [
                    {"$ref": "#/components/contentDescriptors/Address"},
                    {"name": "block", "schema": {"type": "string"}}
                ],
                "result": {"$ref": "#/components/contentDescriptors/Balance"}
            }],
            "components": {"contentDescriptors": {
                "Address": {"name": "address", "required": true, "schema": {"type": "string"}},
                "Balance": {"name": "balance", "schema": {"type": "string"}}
            }}
        });
        let registry = parse_spec(&doc).unwrap();
        let method = registry.lookup("eth_getBalance").unwrap();
        assert_eq!(method.params[0].name, "address");
        assert!(method.params[0].required);
        assert_eq!(method.result.name, "balance");
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let doc = json!({"methods": [{
            "name": "m",
            "result": {"name": "r", "schema": {"$ref": "#/components/schemas/Missing"}}
        }]});
        let err = parse_spec(&doc).unwrap_err();
        assert!(
            matches!(err, SpecLoadError::UnresolvedReference { ref reference, .. } if reference.ends_with("Missing")),
            "Expected UnresolvedReference, got: {err}"
        );
    }

    #[test]
    fn cyclic_reference_is_rejected() {
        let doc = json!({
            "methods": [{"name": "m", "result": {"name": "r", "schema": {"$ref": "#/components/schemas/Node"}}}],
            "components": {"schemas": {
                "Node": {"type": "object", "properties": {"next": {"$ref": "#/components/schemas/Node"}}}
            }}
        });
        let err = parse_spec(&doc).unwrap_err();
        assert!(matches!(err, SpecLoadError::CyclicReference { .. }));
    }

    #[test]
    fn repeated_non_cyclic_reference_is_fine() {
        let doc = json!({
            "methods": [{"name": "m", "result": {"name": "r", "schema": {
                "type": "array",
                "items": [{"$ref": "#/components/schemas/Hash"}, {"$ref": "#/components/schemas/Hash"}]
            }}}],
            "components": {"schemas": {"Hash": {"type": "string"}}}
        });
        parse_spec(&doc).unwrap();
    }

    #[test]
    fn non_component_references_are_left_alone() {
        let schema = json!({"definitions": {"x": {"type": "string"}}, "$ref": "#/definitions/x"});
        let doc = json!({"methods": [{"name": "m", "result": {"name": "r", "schema": schema.clone()}}]});
        let registry = parse_spec(&doc).unwrap();
        assert_eq!(registry.lookup("m").unwrap().result.schema, schema);
    }

    #[test]
    fn pointer_tokens_are_unescaped() {
        assert_eq!(unescape_pointer("a~1b~0c"), "a/b~c");
    }

    #[test]
    fn yaml_conversion_stringifies_keys() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes\nname: x\n").unwrap();
        let json = yaml_to_json_value(&yaml).unwrap();
        assert_eq!(json["1"], "one");
        assert_eq!(json["true"], "yes");
        assert_eq!(json["name"], "x");
    }
}
