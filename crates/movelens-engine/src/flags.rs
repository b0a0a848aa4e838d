//! Rule-based security flag detection.
//!
//! A pure scan over the already-materialized module/type/object set. Rules
//! are independent and additive; nothing short-circuits and nothing here
//! touches the network.

use movelens_types::type_parsing::short_name;
use movelens_types::{Flag, FlagScope, Graph, OwnerKind, Severity};

/// Function names that gate protocol operation when present.
const PAUSE_NAMES: &[&str] = &["pause", "unpause", "set_pause"];
/// Capability markers for the single-owner-cap object rule.
const CAP_MARKERS: &[&str] = &["AdminCap", "UpgradeCap", "TreasuryCap"];

/// Scan the assembled graph and append findings. Module-scope findings are
/// also recorded on the module's own flag-kind list.
pub fn detect_flags(graph: &mut Graph) {
    let mut flags: Vec<Flag> = Vec::new();
    let mut module_kinds: Vec<(String, String)> = Vec::new();

    for (module_id, module) in &graph.modules {
        let mut push = |severity: Severity, kind: &str, detail: String| {
            flags.push(Flag {
                severity,
                kind: kind.to_string(),
                scope: FlagScope::Module,
                entity: module_id.clone(),
                detail,
            });
            module_kinds.push((module_id.clone(), kind.to_string()));
        };

        for type_id in &module.types {
            let name = short_name(type_id);
            if name.contains("AdminCap") {
                push(
                    Severity::High,
                    "AdminCap",
                    format!("defines admin capability {}", name),
                );
            }
            if name.contains("UpgradeCap") {
                push(
                    Severity::High,
                    "UpgradeCap",
                    format!("defines upgrade capability {}", name),
                );
            }
        }

        for function in &module.functions {
            let name = function.name.to_ascii_lowercase();
            if name.contains("mint") {
                push(Severity::Med, "MintFunction", format!("function {}", function.name));
            }
            if name.contains("burn") {
                push(Severity::Med, "BurnFunction", format!("function {}", function.name));
            }
            if PAUSE_NAMES.contains(&name.as_str()) {
                push(Severity::Med, "PauseFunction", format!("function {}", function.name));
            }
            if name.contains("set_fee") || name.contains("update_fee") {
                push(Severity::Low, "SetFeeFunction", format!("function {}", function.name));
            }
            if name.contains("blacklist") || name.contains("whitelist") {
                push(
                    Severity::Med,
                    "BlacklistFunction",
                    format!("function {}", function.name),
                );
            }
        }
    }

    for (type_id, type_node) in &graph.types {
        if !type_node.has_key && type_node.abilities.iter().any(|a| a == "store") {
            flags.push(Flag {
                severity: Severity::Low,
                kind: "StoreWithoutKey".to_string(),
                scope: FlagScope::Type,
                entity: type_id.clone(),
                detail: "storable without independent on-chain identity".to_string(),
            });
        }
        if type_node.abilities.iter().any(|a| a == "drop") {
            flags.push(Flag {
                severity: Severity::Low,
                kind: "Droppable".to_string(),
                scope: FlagScope::Type,
                entity: type_id.clone(),
                detail: "instances can be silently discarded".to_string(),
            });
        }
    }

    for (object_id, object) in &graph.objects {
        let is_cap = CAP_MARKERS.iter().any(|m| object.type_fqn.contains(m));
        if is_cap && matches!(object.owner, OwnerKind::AddressOwner { .. }) {
            flags.push(Flag {
                severity: Severity::High,
                kind: "SingleOwnerCap".to_string(),
                scope: FlagScope::Object,
                entity: object_id.clone(),
                detail: format!("capability {} held by a single address", object.type_fqn),
            });
        }
        if object.shared && object.type_fqn.contains("Treasury") {
            flags.push(Flag {
                severity: Severity::High,
                kind: "UnsafeShared".to_string(),
                scope: FlagScope::Object,
                entity: object_id.clone(),
                detail: format!("treasury object {} is shared", object.type_fqn),
            });
        }
    }

    for (module_id, kind) in module_kinds {
        if let Some(module) = graph.modules.get_mut(&module_id) {
            if !module.flags.contains(&kind) {
                module.flags.push(kind);
            }
        }
    }
    graph.flags.extend(flags);
}

#[cfg(test)]
mod tests {
    use super::*;
    use movelens_types::node_id;
    use movelens_types::{
        FunctionSummary, ModuleNode, ObjectNode, TypeNode, Visibility,
    };

    fn module_with(functions: Vec<&str>, types: Vec<&str>) -> Graph {
        let mut graph = Graph::default();
        let fqn = "0xa::m";
        for t in &types {
            let type_fqn = format!("{}::{}", fqn, t);
            graph.types.insert(
                node_id::type_(&type_fqn),
                TypeNode {
                    fqn: type_fqn,
                    module: node_id::module(fqn),
                    fields: Vec::new(),
                    abilities: vec!["key".to_string()],
                    has_key: true,
                },
            );
        }
        graph.modules.insert(
            node_id::module(fqn),
            ModuleNode {
                fqn: fqn.to_string(),
                package: node_id::package("0xa"),
                functions: functions
                    .into_iter()
                    .map(|name| FunctionSummary {
                        name: name.to_string(),
                        visibility: Visibility::Public,
                        is_entry: false,
                        params: Vec::new(),
                        returns: String::new(),
                    })
                    .collect(),
                types: types
                    .iter()
                    .map(|t| node_id::type_(&format!("{}::{}", fqn, t)))
                    .collect(),
                friends: Vec::new(),
                constants: Vec::new(),
                flags: Vec::new(),
            },
        );
        graph
    }

    fn kinds(graph: &Graph) -> Vec<&str> {
        graph.flags.iter().map(|f| f.kind.as_str()).collect()
    }

    #[test]
    fn test_admin_and_upgrade_cap_rules() {
        let mut graph = module_with(vec![], vec!["AdminCap", "UpgradeCap", "Pool"]);
        detect_flags(&mut graph);
        let kinds = kinds(&graph);
        assert!(kinds.contains(&"AdminCap"));
        assert!(kinds.contains(&"UpgradeCap"));
        let admin = graph.flags.iter().find(|f| f.kind == "AdminCap").unwrap();
        assert_eq!(admin.severity, Severity::High);
        assert_eq!(admin.scope, FlagScope::Module);
        let module = graph.modules.values().next().unwrap();
        assert!(module.flags.contains(&"AdminCap".to_string()));
    }

    #[test]
    fn test_function_name_rules() {
        let mut graph = module_with(
            vec!["mint_and_transfer", "burn", "pause", "set_pause", "update_fee_bps", "add_to_blacklist"],
            vec![],
        );
        detect_flags(&mut graph);
        let kinds = kinds(&graph);
        // mint + burn + 2 pause + fee + blacklist
        assert_eq!(kinds.iter().filter(|k| **k == "MintFunction").count(), 1);
        assert_eq!(kinds.iter().filter(|k| **k == "PauseFunction").count(), 2);
        assert!(kinds.contains(&"SetFeeFunction"));
        assert!(kinds.contains(&"BlacklistFunction"));
    }

    #[test]
    fn test_pause_rule_is_exact_match_only() {
        let mut graph = module_with(vec!["pause_trading"], vec![]);
        detect_flags(&mut graph);
        assert!(!kinds(&graph).contains(&"PauseFunction"));
    }

    #[test]
    fn test_type_ability_rules() {
        let mut graph = Graph::default();
        graph.types.insert(
            node_id::type_("0xa::m::Receipt"),
            TypeNode {
                fqn: "0xa::m::Receipt".to_string(),
                module: node_id::module("0xa::m"),
                fields: Vec::new(),
                abilities: vec!["drop".to_string(), "store".to_string()],
                has_key: false,
            },
        );
        detect_flags(&mut graph);
        let kinds = kinds(&graph);
        assert!(kinds.contains(&"StoreWithoutKey"));
        assert!(kinds.contains(&"Droppable"));
    }

    #[test]
    fn test_object_rules() {
        let mut graph = Graph::default();
        graph.objects.insert(
            node_id::object("0x1"),
            ObjectNode {
                object_id: "0x1".to_string(),
                type_fqn: "0xa::m::TreasuryCap".to_string(),
                owner: OwnerKind::AddressOwner {
                    address: "0xabc".to_string(),
                },
                shared: false,
                version: None,
                digest: None,
                content: None,
            },
        );
        graph.objects.insert(
            node_id::object("0x2"),
            ObjectNode {
                object_id: "0x2".to_string(),
                type_fqn: "0xa::m::Treasury".to_string(),
                owner: OwnerKind::Shared,
                shared: true,
                version: None,
                digest: None,
                content: None,
            },
        );
        detect_flags(&mut graph);
        let kinds = kinds(&graph);
        assert!(kinds.contains(&"SingleOwnerCap"));
        assert!(kinds.contains(&"UnsafeShared"));
    }
}
