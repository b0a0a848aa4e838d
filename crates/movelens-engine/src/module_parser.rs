//! Module parser: one package's normalized module metadata in, module/type
//! records and intra-package edges out.
//!
//! The RPC boundary hands us semi-structured JSON; everything here is
//! defensive at the smallest granularity the data allows. A malformed module
//! key skips that module with a warning, a malformed parameter shape falls
//! back to its JSON-stringified form, and nothing in this file aborts the
//! package.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::warn;

use movelens_types::address::{is_framework_address, normalize_address};
use movelens_types::type_parsing::extract_type_refs;
use movelens_types::{
    AnalyzerConfig, CallEvidence, CallType, ConstantRecord, Edge, EdgeKind, FieldDef, Flag,
    FlagScope, FunctionSummary, ModuleNode, Severity, TypeNode, Visibility,
};

use crate::graph_builder::GraphBuilder;

/// What one package parse produced, beyond the nodes/edges already in the
/// builder: the inputs the dependency builder and the recursive frontier
/// need.
#[derive(Debug, Default)]
pub struct ParsedPackage {
    pub package_id: String,
    /// Normalized addresses of packages this one references.
    pub dep_packages: BTreeSet<String>,
    /// FQNs of the modules parsed in this pass.
    pub module_fqns: Vec<String>,
}

/// Parse every module of a package into the builder.
pub fn parse_package(
    builder: &mut GraphBuilder,
    config: &AnalyzerConfig,
    package_address: &str,
    raw_modules: &BTreeMap<String, Value>,
) -> ParsedPackage {
    let package_address = normalize_address(package_address);
    let package_id = builder.ensure_package(&package_address);

    let mut parsed = ParsedPackage {
        package_id: package_id.clone(),
        ..Default::default()
    };

    for (key, descriptor) in raw_modules {
        let Some((module_address, module_name)) = split_module_key(key, &package_address) else {
            warn!(module_key = %key, "skipping module with malformed key");
            continue;
        };
        let fqn = format!("{}::{}", module_address, module_name);

        let module_deps = parse_module(
            builder,
            config,
            &package_id,
            &package_address,
            &fqn,
            descriptor,
        );
        for dep_addr in module_deps {
            if dep_addr != package_address {
                parsed.dep_packages.insert(dep_addr);
            }
        }
        parsed.module_fqns.push(fqn);
    }

    parsed
}

/// Materialize one Package node and PKG_DEPENDS edge per discovered
/// dependency address. Purely additive; node creation is duplicate-safe.
pub fn build_package_dependencies(builder: &mut GraphBuilder, parsed: &ParsedPackage) {
    for dep_addr in &parsed.dep_packages {
        let dep_id = builder.ensure_package(dep_addr);
        builder.add_edge(Edge::new(
            EdgeKind::PkgDepends,
            parsed.package_id.clone(),
            dep_id,
        ));
    }
}

/// Split a raw module key into (address, name). Keys either carry their own
/// address (`0xabc::market`) or are a bare module name that inherits the
/// package's address.
fn split_module_key(key: &str, package_address: &str) -> Option<(String, String)> {
    if key.is_empty() {
        return None;
    }
    if !key.contains("::") {
        return Some((package_address.to_string(), key.to_string()));
    }
    let mut parts = key.splitn(2, "::");
    let addr = parts.next()?;
    let name = parts.next()?;
    if addr.is_empty() || name.is_empty() || name.contains("::") {
        return None;
    }
    Some((normalize_address(addr), name.to_string()))
}

/// Parse one module descriptor. Returns the normalized addresses of every
/// package referenced from this module's signatures.
fn parse_module(
    builder: &mut GraphBuilder,
    config: &AnalyzerConfig,
    package_id: &str,
    package_address: &str,
    fqn: &str,
    descriptor: &Value,
) -> BTreeSet<String> {
    let mut module = ModuleNode {
        fqn: fqn.to_string(),
        package: package_id.to_string(),
        functions: Vec::new(),
        types: Vec::new(),
        friends: Vec::new(),
        constants: Vec::new(),
        flags: Vec::new(),
    };

    // Friend declarations: the declaring module grants the friend caller
    // privileged access, so the edge runs declarer -> friend.
    let mut friend_edges = Vec::new();
    if let Some(friends) = descriptor.get("friends").and_then(Value::as_array) {
        for f in friends {
            let addr = f.get("address").and_then(Value::as_str);
            let name = f.get("name").and_then(Value::as_str);
            if let (Some(addr), Some(name)) = (addr, name) {
                let friend_fqn = format!("{}::{}", normalize_address(addr), name);
                module.friends.push(friend_fqn.clone());
                friend_edges.push(friend_fqn);
            }
        }
    }

    // Exposed functions, plus the cross-module references their signatures
    // imply. Evidence is keyed by referenced module FQN; the callee function
    // is a sentinel because type references alone cannot name it.
    let mut call_evidence: BTreeMap<String, Vec<CallEvidence>> = BTreeMap::new();
    let mut referenced_addresses: BTreeSet<String> = BTreeSet::new();
    if let Some(functions) = descriptor.get("exposedFunctions").and_then(Value::as_object) {
        for (fn_name, fn_desc) in functions {
            let summary = parse_function(fn_name, fn_desc);

            let mut signature_types: Vec<&str> =
                summary.params.iter().map(String::as_str).collect();
            signature_types.push(summary.returns.as_str());
            for type_str in signature_types {
                for type_ref in extract_type_refs(type_str) {
                    let target_module = type_ref.module_fqn();
                    if target_module == fqn {
                        continue;
                    }
                    if type_ref.address != package_address {
                        referenced_addresses.insert(type_ref.address.clone());
                    }
                    let evidence = call_evidence.entry(target_module).or_default();
                    let record = CallEvidence {
                        function: fn_name.clone(),
                        callee: CallEvidence::TYPE_REF.to_string(),
                    };
                    if !evidence.contains(&record) {
                        evidence.push(record);
                    }
                }
            }

            module.functions.push(summary);
        }
    }

    // Struct definitions.
    let mut defined_types = Vec::new();
    if let Some(structs) = descriptor.get("structs").and_then(Value::as_object) {
        for (struct_name, struct_desc) in structs {
            defined_types.push(parse_struct(fqn, struct_name, struct_desc));
            if config.matches_critical_marker(struct_name) {
                module.flags.push("CriticalType".to_string());
            }
        }
    }

    // Module-level constants, fed through the hardcoded-value heuristic.
    let mut constant_flags = Vec::new();
    if let Some(constants) = descriptor.get("constants").and_then(Value::as_array) {
        for (i, entry) in constants.iter().enumerate() {
            let constant = decode_constant(i, entry);
            if let Some(detail) = hardcoded_value_detail(&constant) {
                module.flags.push("HardcodedAddress".to_string());
                constant_flags.push(detail);
            }
            module.constants.push(constant);
        }
    }

    // Everything parsed; now materialize nodes and edges.
    let module_id = builder.add_module(module);
    builder.add_edge(Edge::new(
        EdgeKind::PkgContains,
        package_id.to_string(),
        module_id.clone(),
    ));

    for friend_fqn in &friend_edges {
        let friend_pkg = friend_fqn
            .split("::")
            .next()
            .map(|a| builder.ensure_package(a))
            .unwrap_or_else(|| package_id.to_string());
        let friend_id = builder.ensure_module_stub(friend_fqn, &friend_pkg);
        builder.add_edge(Edge::new(
            EdgeKind::ModFriendAllow,
            module_id.clone(),
            friend_id,
        ));
    }

    for (struct_name, type_node, field_refs) in defined_types {
        if let Some(module) = builder.module_mut(&module_id) {
            module.types.push(format!("type:{}", type_node.fqn));
        }
        let critical = config.matches_critical_marker(&struct_name);
        let type_id = builder.add_type(type_node);
        builder.add_edge(Edge::new(
            EdgeKind::ModDefinesType,
            module_id.clone(),
            type_id.clone(),
        ));
        if critical {
            builder.add_flag(Flag {
                severity: Severity::Med,
                kind: "CriticalType".to_string(),
                scope: FlagScope::Module,
                entity: module_id.clone(),
                detail: format!("defines critical type {}", struct_name),
            });
        }
        for (field_name, ref_fqn, ref_module) in field_refs {
            let ref_pkg_addr = ref_module
                .split("::")
                .next()
                .unwrap_or(package_address)
                .to_string();
            let ref_pkg = builder.ensure_package(&ref_pkg_addr);
            let ref_module_id = builder.ensure_module_stub(&ref_module, &ref_pkg);
            let ref_type_id = builder.ensure_type_stub(&ref_fqn, &ref_module_id);
            builder.add_edge(Edge {
                field: Some(field_name),
                ..Edge::new(EdgeKind::TypeUsesType, type_id.clone(), ref_type_id)
            });
        }
    }

    for detail in constant_flags {
        builder.add_flag(Flag {
            severity: Severity::Med,
            kind: "HardcodedAddress".to_string(),
            scope: FlagScope::Module,
            entity: module_id.clone(),
            detail,
        });
    }

    // One MOD_CALLS edge per distinct referenced module.
    let friends: Vec<String> = builder
        .module_mut(&module_id)
        .map(|m| m.friends.clone())
        .unwrap_or_default();
    for (target_fqn, evidence) in call_evidence {
        let target_addr = target_fqn
            .split("::")
            .next()
            .unwrap_or(package_address)
            .to_string();
        let call_type = if friends.contains(&target_fqn) {
            CallType::Friend
        } else if target_addr == package_address {
            CallType::SamePackage
        } else {
            CallType::External
        };
        let target_pkg = builder.ensure_package(&target_addr);
        let target_id = builder.ensure_module_stub(&target_fqn, &target_pkg);
        builder.add_edge(Edge {
            call_type: Some(call_type),
            evidence,
            ..Edge::new(EdgeKind::ModCalls, module_id.clone(), target_id)
        });
    }

    referenced_addresses
}

fn parse_function(name: &str, desc: &Value) -> FunctionSummary {
    let is_entry = desc.get("isEntry").and_then(Value::as_bool).unwrap_or(false);
    let visibility_str = desc.get("visibility").and_then(Value::as_str).unwrap_or("");
    // Classification priority: the entry flag wins, then declared visibility.
    let visibility = if is_entry {
        Visibility::Entry
    } else {
        match visibility_str {
            "Friend" => Visibility::Friend,
            "Private" => Visibility::Private,
            _ => Visibility::Public,
        }
    };

    let params = desc
        .get("parameters")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().map(type_to_string).collect())
        .unwrap_or_default();

    let returns = match desc.get("return").and_then(Value::as_array) {
        None => String::new(),
        Some(arr) if arr.is_empty() => String::new(),
        Some(arr) if arr.len() == 1 => type_to_string(&arr[0]),
        Some(arr) => {
            let parts: Vec<String> = arr.iter().map(type_to_string).collect();
            format!("({})", parts.join(", "))
        }
    };

    FunctionSummary {
        name: name.to_string(),
        visibility,
        is_entry,
        params,
        returns,
    }
}

type ParsedStruct = (String, TypeNode, Vec<(String, String, String)>);

/// Parse one struct descriptor into its type node plus the
/// `(field, referenced type fqn, referenced module fqn)` triples its fields
/// imply, deduplicated per referenced type.
fn parse_struct(module_fqn: &str, name: &str, desc: &Value) -> ParsedStruct {
    let fqn = format!("{}::{}", module_fqn, name);

    let abilities = desc
        .get("abilities")
        .map(abilities_from_value)
        .unwrap_or_default();
    let has_key = abilities.iter().any(|a| a == "key");

    let mut fields = Vec::new();
    let mut field_refs: Vec<(String, String, String)> = Vec::new();
    let mut seen_refs: BTreeSet<String> = BTreeSet::new();
    if let Some(arr) = desc.get("fields").and_then(Value::as_array) {
        for field in arr {
            let field_name = field
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            let type_str = field
                .get("type")
                .map(type_to_string)
                .unwrap_or_default();
            for type_ref in extract_type_refs(&type_str) {
                let ref_fqn = type_ref.fqn();
                if ref_fqn != fqn && seen_refs.insert(ref_fqn.clone()) {
                    field_refs.push((field_name.clone(), ref_fqn, type_ref.module_fqn()));
                }
            }
            fields.push(FieldDef {
                name: field_name,
                type_: type_str,
            });
        }
    }

    let type_node = TypeNode {
        fqn,
        module: format!("mod:{}", module_fqn),
        fields,
        abilities,
        has_key,
    };
    (name.to_string(), type_node, field_refs)
}

/// Lowercased, sorted, deduplicated ability names from either a bare array
/// or the RPC's `{"abilities": [...]}` wrapper.
fn abilities_from_value(value: &Value) -> Vec<String> {
    if let Some(arr) = value.as_array() {
        let mut out: Vec<String> = arr
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_ascii_lowercase)
            .collect();
        out.sort();
        out.dedup();
        return out;
    }
    if let Some(inner) = value.get("abilities") {
        return abilities_from_value(inner);
    }
    Vec::new()
}

/// Render a normalized RPC type descriptor as a Move type string. Unknown
/// shapes fall back to their JSON form rather than failing: lossy but safe.
pub fn type_to_string(v: &Value) -> String {
    if let Some(s) = v.as_str() {
        return match s {
            "Bool" => "bool".to_string(),
            "U8" => "u8".to_string(),
            "U16" => "u16".to_string(),
            "U32" => "u32".to_string(),
            "U64" => "u64".to_string(),
            "U128" => "u128".to_string(),
            "U256" => "u256".to_string(),
            "Address" => "address".to_string(),
            "Signer" => "signer".to_string(),
            other => other.to_string(),
        };
    }

    let Some(obj) = v.as_object() else {
        return v.to_string();
    };
    if obj.len() != 1 {
        return v.to_string();
    }
    let Some((tag, inner)) = obj.iter().next() else {
        return v.to_string();
    };
    match tag.as_str() {
        "Vector" => format!("vector<{}>", type_to_string(inner)),
        "Reference" => format!("&{}", type_to_string(inner)),
        "MutableReference" => format!("&mut {}", type_to_string(inner)),
        "TypeParameter" => match inner.as_u64() {
            Some(idx) => format!("T{}", idx),
            None => v.to_string(),
        },
        "Struct" => {
            let addr = inner.get("address").and_then(Value::as_str);
            let module = inner.get("module").and_then(Value::as_str);
            let name = inner.get("name").and_then(Value::as_str);
            let (Some(addr), Some(module), Some(name)) = (addr, module, name) else {
                return v.to_string();
            };
            let base = format!("{}::{}::{}", normalize_address(addr), module, name);
            let args = inner
                .get("typeArguments")
                .and_then(Value::as_array)
                .filter(|a| !a.is_empty());
            match args {
                Some(args) => {
                    let rendered: Vec<String> = args.iter().map(type_to_string).collect();
                    format!("{}<{}>", base, rendered.join(", "))
                }
                None => base,
            }
        }
        _ => v.to_string(),
    }
}

fn decode_constant(index: usize, entry: &Value) -> ConstantRecord {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("const_{}", index));
    let type_ = entry.get("type").map(type_to_string).unwrap_or_default();
    let value = entry.get("value").cloned().unwrap_or(Value::Null);
    ConstantRecord { name, type_, value }
}

/// Heuristic over decoded constants: an address-typed constant holding a
/// non-framework address is a pinned privileged account or object.
fn hardcoded_value_detail(constant: &ConstantRecord) -> Option<String> {
    if constant.type_ != "address" {
        return None;
    }
    let addr = constant.value.as_str()?;
    if !addr.starts_with("0x") || is_framework_address(addr) {
        return None;
    }
    Some(format!(
        "constant {} pins address {}",
        constant.name, addr
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_one(key: &str, descriptor: Value) -> (GraphBuilder, ParsedPackage) {
        let mut builder = GraphBuilder::new();
        let config = AnalyzerConfig::default();
        let mut raw = BTreeMap::new();
        raw.insert(key.to_string(), descriptor);
        let parsed = parse_package(&mut builder, &config, "0xa", &raw);
        (builder, parsed)
    }

    #[test]
    fn test_bare_module_key_inherits_package_address() {
        let (builder, parsed) = parse_one("market", json!({}));
        assert_eq!(parsed.module_fqns.len(), 1);
        assert!(parsed.module_fqns[0].ends_with("::market"));
        assert!(builder.has_module(&format!("mod:{}", parsed.module_fqns[0])));
    }

    #[test]
    fn test_malformed_module_key_is_skipped() {
        let (builder, parsed) = parse_one("::market", json!({}));
        assert!(parsed.module_fqns.is_empty());
        assert_eq!(builder.graph().modules.len(), 0);
        // The package node itself still exists.
        assert_eq!(builder.graph().packages.len(), 1);
    }

    #[test]
    fn test_visibility_priority_entry_wins() {
        let desc = json!({
            "exposedFunctions": {
                "do_it": {"visibility": "Friend", "isEntry": true, "parameters": [], "return": []},
                "helper": {"visibility": "Friend", "isEntry": false, "parameters": [], "return": []},
                "internal": {"visibility": "Private", "isEntry": false, "parameters": [], "return": []},
                "open": {"visibility": "Public", "isEntry": false, "parameters": [], "return": []}
            }
        });
        let (builder, parsed) = parse_one("m", desc);
        let module = &builder.graph().modules[&format!("mod:{}", parsed.module_fqns[0])];
        let vis: BTreeMap<&str, Visibility> = module
            .functions
            .iter()
            .map(|f| (f.name.as_str(), f.visibility))
            .collect();
        assert_eq!(vis["do_it"], Visibility::Entry);
        assert_eq!(vis["helper"], Visibility::Friend);
        assert_eq!(vis["internal"], Visibility::Private);
        assert_eq!(vis["open"], Visibility::Public);
    }

    #[test]
    fn test_cross_package_reference_becomes_external_call() {
        let desc = json!({
            "exposedFunctions": {
                "swap": {
                    "visibility": "Public",
                    "isEntry": false,
                    "parameters": [
                        {"Reference": {"Struct": {
                            "address": "0xb", "module": "pool", "name": "Pool",
                            "typeArguments": []
                        }}}
                    ],
                    "return": []
                }
            }
        });
        let (builder, parsed) = parse_one("m", desc);
        assert_eq!(parsed.dep_packages.len(), 1);
        let calls: Vec<_> = builder
            .graph()
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::ModCalls)
            .collect();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].call_type, Some(CallType::External));
        assert_eq!(calls[0].evidence.len(), 1);
        assert_eq!(calls[0].evidence[0].function, "swap");
        assert_eq!(calls[0].evidence[0].callee, CallEvidence::TYPE_REF);
    }

    #[test]
    fn test_same_package_reference_classification() {
        let desc = json!({
            "exposedFunctions": {
                "take": {
                    "visibility": "Public",
                    "isEntry": false,
                    "parameters": [],
                    "return": [
                        {"Struct": {"address": "0xa", "module": "vault", "name": "Receipt",
                                    "typeArguments": []}}
                    ]
                }
            }
        });
        let (builder, parsed) = parse_one("m", desc);
        assert!(parsed.dep_packages.is_empty());
        let call = builder
            .graph()
            .edges
            .iter()
            .find(|e| e.kind == EdgeKind::ModCalls)
            .unwrap();
        assert_eq!(call.call_type, Some(CallType::SamePackage));
    }

    #[test]
    fn test_friend_reference_classification() {
        let desc = json!({
            "friends": [{"address": "0xa", "name": "vault"}],
            "exposedFunctions": {
                "take": {
                    "visibility": "Public",
                    "isEntry": false,
                    "parameters": [],
                    "return": [
                        {"Struct": {"address": "0xa", "module": "vault", "name": "Receipt",
                                    "typeArguments": []}}
                    ]
                }
            }
        });
        let (builder, _) = parse_one("m", desc);
        let call = builder
            .graph()
            .edges
            .iter()
            .find(|e| e.kind == EdgeKind::ModCalls)
            .unwrap();
        assert_eq!(call.call_type, Some(CallType::Friend));
        assert!(builder
            .graph()
            .edges
            .iter()
            .any(|e| e.kind == EdgeKind::ModFriendAllow));
    }

    #[test]
    fn test_struct_with_key_ability_and_critical_flag() {
        let desc = json!({
            "structs": {
                "AdminCap": {
                    "abilities": {"abilities": ["Key"]},
                    "fields": [{"name": "id", "type": {"Struct": {
                        "address": "0x2", "module": "object", "name": "UID",
                        "typeArguments": []
                    }}}]
                }
            }
        });
        let (builder, parsed) = parse_one("m", desc);
        let type_id = format!("type:{}::AdminCap", parsed.module_fqns[0]);
        let type_node = &builder.graph().types[&type_id];
        assert!(type_node.has_key);
        assert_eq!(type_node.abilities, vec!["key"]);
        let critical: Vec<_> = builder
            .graph()
            .flags
            .iter()
            .filter(|f| f.kind == "CriticalType")
            .collect();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].severity, Severity::Med);
    }

    #[test]
    fn test_type_uses_type_edges_dedupe_per_referenced_type() {
        let coin = |name: &str| {
            json!({"name": name, "type": {"Struct": {
                "address": "0x2", "module": "coin", "name": "Coin",
                "typeArguments": [{"Struct": {"address": "0x2", "module": "sui", "name": "SUI",
                                              "typeArguments": []}}]
            }}})
        };
        let desc = json!({
            "structs": {
                "Pool": {
                    "abilities": {"abilities": ["Key"]},
                    "fields": [coin("reserve_a"), coin("reserve_b")]
                }
            }
        });
        let (builder, _) = parse_one("m", desc);
        let uses: Vec<_> = builder
            .graph()
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::TypeUsesType)
            .collect();
        // Coin and SUI once each, not once per field.
        assert_eq!(uses.len(), 2);
        let mut triples: Vec<_> = uses
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str(), e.field.as_deref()))
            .collect();
        triples.sort();
        triples.dedup();
        assert_eq!(triples.len(), 2);
    }

    #[test]
    fn test_pkg_depends_edges() {
        let desc = json!({
            "exposedFunctions": {
                "f": {"visibility": "Public", "isEntry": false,
                      "parameters": [{"Struct": {"address": "0xb", "module": "x", "name": "X",
                                                 "typeArguments": []}},
                                     {"Struct": {"address": "0xc", "module": "y", "name": "Y",
                                                 "typeArguments": []}}],
                      "return": []}
            }
        });
        let (mut builder, parsed) = parse_one("m", desc);
        build_package_dependencies(&mut builder, &parsed);
        let depends: Vec<_> = builder
            .graph()
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::PkgDepends)
            .collect();
        assert_eq!(depends.len(), 2);
    }

    #[test]
    fn test_hardcoded_address_constant_is_flagged() {
        let desc = json!({
            "constants": [
                {"name": "OWNER", "type": "Address",
                 "value": "0x5d4b302506645c37ff133b98c4b50a5ae14841659738d6d733d59d0d217a93bf"},
                {"name": "FRAMEWORK", "type": "Address", "value": "0x2"},
                {"name": "FEE_BPS", "type": "U64", "value": 30}
            ]
        });
        let (builder, parsed) = parse_one("m", desc);
        let flags: Vec<_> = builder
            .graph()
            .flags
            .iter()
            .filter(|f| f.kind == "HardcodedAddress")
            .collect();
        assert_eq!(flags.len(), 1);
        let module = &builder.graph().modules[&format!("mod:{}", parsed.module_fqns[0])];
        assert_eq!(module.constants.len(), 3);
        assert!(module.flags.contains(&"HardcodedAddress".to_string()));
    }

    #[test]
    fn test_unknown_parameter_shape_is_stringified() {
        let desc = json!({
            "exposedFunctions": {
                "f": {"visibility": "Public", "isEntry": false,
                      "parameters": [{"Exotic": {"weird": true}}],
                      "return": []}
            }
        });
        let (builder, parsed) = parse_one("m", desc);
        let module = &builder.graph().modules[&format!("mod:{}", parsed.module_fqns[0])];
        assert!(module.functions[0].params[0].contains("Exotic"));
    }

    #[test]
    fn test_type_to_string_rendering() {
        assert_eq!(type_to_string(&json!("U64")), "u64");
        assert_eq!(
            type_to_string(&json!({"Vector": "U8"})),
            "vector<u8>"
        );
        assert_eq!(
            type_to_string(&json!({"MutableReference": {"TypeParameter": 0}})),
            "&mut T0"
        );
        let coin = json!({"Struct": {"address": "0x2", "module": "coin", "name": "Coin",
                                     "typeArguments": ["U64"]}});
        assert!(type_to_string(&coin).ends_with("::coin::Coin<u64>"));
    }
}
