use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::{
    registry::{ProviderId, ProviderRegistry},
    types::{DependencyInfo, TypeInfo},
};

/// Graph of all providers of a module
///
/// Maps every provider to the providers it depends on.
/// Used to detect circular dependencies and to find a construction order
pub struct DependencyGraph {
    map: BTreeMap<ProviderId, DependencyGraphEntry>,
    /// Required types nobody provides, with the type requiring them
    unresolved: Vec<(TypeInfo, DependencyInfo)>,
    /// Every provider, dependencies before dependents
    order: Vec<ProviderId>,
}
impl DependencyGraph {
    /// Builds the graph and checks it for circular dependencies
    pub fn new<M>(registry: &ProviderRegistry<M>) -> Result<Self, DependencyGraphErrors> {
        let mut graph = Self {
            map: Default::default(),
            unresolved: Vec::new(),
            order: Vec::with_capacity(registry.len()),
        };

        for (id, provider) in registry.iter() {
            let mut dependencies = Vec::new();
            for dependency in provider.dependencies() {
                match registry.provider_for(dependency.type_info.type_id) {
                    Some(dependency_id) if !dependencies.contains(&dependency_id) => {
                        dependencies.push(dependency_id)
                    }
                    Some(_) => {}
                    None => {
                        tracing::debug!(
                            "'{}' requires '{}' which has no provider",
                            provider.supplies(),
                            dependency.type_info
                        );
                        graph.unresolved.push((provider.supplies(), *dependency));
                    }
                }
            }

            graph.map.insert(
                id,
                DependencyGraphEntry {
                    info: provider.supplies(),
                    dependencies,
                },
            );
        }

        graph.check()?;
        Ok(graph)
    }

    /// Providers the given provider depends on, in declared order
    pub fn dependencies(&self, id: ProviderId) -> &[ProviderId] {
        self.map
            .get(&id)
            .map(|entry| entry.dependencies.as_slice())
            .unwrap_or_default()
    }

    /// Every provider, ordered so each one comes after all of its dependencies
    pub fn construction_order(&self) -> &[ProviderId] {
        &self.order
    }

    /// Required types which have no provider
    pub fn unresolved(&self) -> &[(TypeInfo, DependencyInfo)] {
        &self.unresolved
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Validates the graph and records the construction order
    ///
    /// Returns a list of all circular dependencies
    fn check(&mut self) -> Result<(), DependencyGraphErrors> {
        let mut marks = HashMap::new();
        let mut errors = Vec::new();
        let mut order = Vec::with_capacity(self.map.len());

        for id in self.map.keys() {
            let mut dependency_chain = Vec::new();
            check_recurse(self, &mut marks, &mut errors, &mut order, &mut dependency_chain, *id);
        }

        if !errors.is_empty() {
            tracing::error!("Dependency graph has {} circular dependencies", errors.len());
            return Err(DependencyGraphErrors { errors });
        }

        self.order = order;
        return Ok(());

        fn check_recurse(
            graph: &DependencyGraph,
            marks: &mut HashMap<ProviderId, Mark>,
            errors: &mut Vec<DependencyGraphError>,
            order: &mut Vec<ProviderId>,
            dependency_chain: &mut Vec<ProviderId>,
            id: ProviderId,
        ) {
            match marks.get(&id) {
                Some(Mark::Done) => return,
                Some(Mark::InProgress) => {
                    // Revisited while still on the chain - the chain from `id` onwards is a cycle
                    let start = dependency_chain
                        .iter()
                        .position(|visited| *visited == id)
                        .unwrap_or_default();
                    let mut chain: Vec<TypeInfo> = dependency_chain[start..]
                        .iter()
                        .map(|visited| graph.map[visited].info)
                        .collect();
                    let from = graph.map[&id].info;
                    let to = chain.last().copied().unwrap_or(from);
                    chain.push(from); // Add current so chain is complete

                    errors.push(DependencyGraphError::CircularDependency { from, to, chain });
                    return;
                }
                None => {}
            }

            marks.insert(id, Mark::InProgress);
            dependency_chain.push(id);

            for dependency in &graph.map[&id].dependencies {
                check_recurse(graph, marks, errors, order, dependency_chain, *dependency);
            }

            dependency_chain.pop();
            marks.insert(id, Mark::Done);
            order.push(id);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

struct DependencyGraphEntry {
    info: TypeInfo,
    dependencies: Vec<ProviderId>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyGraphError {
    #[error("A Circular Dependency exists between '{from}' and '{to}' through {}", display_chain(.chain))]
    CircularDependency {
        from: TypeInfo,
        to: TypeInfo,
        chain: Vec<TypeInfo>,
    },
}

fn display_chain(chain: &[TypeInfo]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl std::fmt::Display for DependencyGraphErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("The dependency graph had one or more errors:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraphErrors {
    pub errors: Vec<DependencyGraphError>,
}
