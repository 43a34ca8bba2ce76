//! Cycle detection over the proposal logic AST.
//!
//! The AST is interpreted as a directed dependency graph:
//!
//! - vertices are the object keys reachable from the root, indexed by path;
//! - a string value naming a key visible in the current or any enclosing
//!   object scope adds an edge from the owning key to the named key;
//! - `dependencies` / `deps` / `requires` arrays add edges from the key
//!   whose object carries them to each named key;
//! - a container has an edge to each of its own keys, so a nested
//!   back-reference closes a cycle through its ancestors.
//!
//! Tarjan's strongly-connected-components algorithm runs over a flat
//! petgraph arena; a cycle is any SCC with more than one vertex, or any
//! vertex with an edge to itself. No cyclic data structures exist at the
//! implementation level.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde_json::Value;
use std::collections::HashMap;

/// Key names that declare explicit dependencies.
const DEP_KEYS: [&str; 3] = ["dependencies", "deps", "requires"];

fn is_dep_key(key: &str) -> bool {
    DEP_KEYS.contains(&key)
}

struct GraphBuilder {
    graph: DiGraph<String, ()>,
    /// Innermost-last stack of key-name scopes for reference resolution.
    scopes: Vec<HashMap<String, NodeIndex>>,
    path: Vec<String>,
}

impl GraphBuilder {
    fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            scopes: Vec::new(),
            path: Vec::new(),
        }
    }

    fn resolve(&self, name: &str) -> Option<NodeIndex> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    fn walk(&mut self, value: &Value, current: Option<NodeIndex>) {
        match value {
            Value::Object(map) => {
                // First pass: vertices for this object's keys, so siblings
                // can reference each other regardless of order.
                let mut scope = HashMap::new();
                for key in map.keys() {
                    if is_dep_key(key) {
                        continue;
                    }
                    self.path.push(key.clone());
                    let idx = self.graph.add_node(self.path.join("."));
                    self.path.pop();
                    scope.insert(key.clone(), idx);
                    if let Some(parent) = current {
                        self.graph.add_edge(parent, idx, ());
                    }
                }
                self.scopes.push(scope);

                for (key, child) in map {
                    if is_dep_key(key) {
                        if let Value::Array(items) = child {
                            for item in items {
                                if let Value::String(name) = item {
                                    if let (Some(src), Some(dst)) = (current, self.resolve(name)) {
                                        self.graph.add_edge(src, dst, ());
                                    }
                                }
                            }
                        }
                    } else if let Some(&idx) = self.scopes.last().and_then(|s| s.get(key)) {
                        self.path.push(key.clone());
                        self.walk(child, Some(idx));
                        self.path.pop();
                    }
                }
                self.scopes.pop();
            }
            Value::String(name) => {
                if let (Some(src), Some(dst)) = (current, self.resolve(name)) {
                    self.graph.add_edge(src, dst, ());
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(item, current);
                }
            }
            _ => {}
        }
    }
}

fn build_graph(ast: &Value) -> DiGraph<String, ()> {
    let mut builder = GraphBuilder::new();
    builder.walk(ast, None);
    builder.graph
}

/// Whether the AST's dependency graph contains a cycle.
pub fn detect_cycles(ast: &Value) -> bool {
    let graph = build_graph(ast);
    for scc in tarjan_scc(&graph) {
        if scc.len() > 1 {
            return true;
        }
        if let Some(&node) = scc.first() {
            if graph.contains_edge(node, node) {
                return true;
            }
        }
    }
    false
}

/// Enumerate the vertices of every cyclic component, for audit output.
pub fn find_cycles_detail(ast: &Value) -> Vec<Vec<String>> {
    let graph = build_graph(ast);
    let mut cycles = Vec::new();
    for scc in tarjan_scc(&graph) {
        if scc.len() > 1 {
            cycles.push(scc.iter().map(|&idx| graph[idx].clone()).collect());
        } else if let Some(&node) = scc.first() {
            if graph.contains_edge(node, node) {
                cycles.push(vec![graph[node].clone()]);
            }
        }
    }
    cycles
}
