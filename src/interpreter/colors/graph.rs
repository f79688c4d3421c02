use std::{
    collections::{BTreeMap, HashMap, HashSet, VecDeque},
    sync::Arc,
};

use crate::interpreter::colors::script::Script;

/// One registered conversion between two formats.
#[derive(Debug)]
pub struct Conversion {
    /// The source endpoint, a graph node or a lowercase format name.
    pub from:   String,
    /// The target endpoint, a graph node or a lowercase format name.
    pub to:     String,
    /// The name of the format whose specification declared the conversion.
    pub owner:  String,
    /// The conversion script.
    pub script: Script,
}

/// The directed graph of conversions, keyed by source endpoint.
///
/// Endpoints may be format names that are only registered later, so they
/// are resolved into nodes while searching rather than when an edge is
/// added.
#[derive(Debug, Clone, Default)]
pub struct ConversionGraph {
    edges: BTreeMap<String, Vec<Arc<Conversion>>>,
}

impl ConversionGraph {
    /// Adds an edge.
    pub fn add(&mut self, conversion: Conversion) {
        self.edges
            .entry(conversion.from.clone())
            .or_default()
            .push(Arc::new(conversion));
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Returns `true` if no conversion is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    fn neighbors<'a>(&'a self,
                     node: &'a str,
                     resolve: &'a impl Fn(&str) -> String)
                     -> impl Iterator<Item = &'a Arc<Conversion>> + 'a {
        self.edges
            .iter()
            .filter(move |(key, _)| resolve(key) == node)
            .flat_map(|(_, edges)| edges)
    }

    /// Finds a shortest chain of conversions from `from` to `to`.
    ///
    /// Breadth-first, so the first path found has the fewest hops. Every
    /// node is visited at most once, which keeps cyclic graphs finite.
    /// `resolve` maps an endpoint to its node. An empty path means `from`
    /// and `to` are the same node.
    #[must_use]
    pub fn find_path(&self,
                     from: &str,
                     to: &str,
                     resolve: &impl Fn(&str) -> String)
                     -> Option<Vec<Arc<Conversion>>> {
        if from == to {
            return Some(Vec::new());
        }

        let mut visited = HashSet::from([from.to_string()]);
        let mut queue = VecDeque::from([from.to_string()]);
        let mut parent = HashMap::<String, Arc<Conversion>>::new();

        while let Some(node) = queue.pop_front() {
            for edge in self.neighbors(&node, resolve) {
                let next = resolve(&edge.to);
                if !visited.insert(next.clone()) {
                    continue;
                }
                parent.insert(next.clone(), Arc::clone(edge));
                if next == to {
                    return Some(unwind(&parent, from, to, resolve));
                }
                queue.push_back(next);
            }
        }
        None
    }
}

/// Follows parent edges back from `to` and returns them in travel order.
fn unwind(parent: &HashMap<String, Arc<Conversion>>,
          from: &str,
          to: &str,
          resolve: &impl Fn(&str) -> String)
          -> Vec<Arc<Conversion>> {
    let mut path = Vec::new();
    let mut current = to.to_string();
    while current != from {
        let Some(edge) = parent.get(&current) else {
            break;
        };
        path.push(Arc::clone(edge));
        current = resolve(&edge.from);
    }
    path.reverse();
    path
}
