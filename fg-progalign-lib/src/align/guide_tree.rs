//! Average-linkage clustering of a distance matrix into a binary merge order.
use log::debug;
use serde::Serialize;

use crate::{
    align::distance::DistanceMatrix,
    error::{AlignError, Result},
};

/// A node of the guide tree.  Leaves are numbered `0..N` after the input sequences; the
/// internal node created by the `k`-th merge is numbered `N + k`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum GuideNode {
    Leaf(usize),
    Internal { left: usize, right: usize },
}

/// One step of the clustering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Merge {
    /// The node id of the first merged cluster
    pub left: usize,
    /// The node id of the second merged cluster
    pub right: usize,
    /// The node id of the new cluster
    pub node: usize,
    /// The average distance between the two clusters when they were merged
    pub distance: f64,
    /// The sequence indices in the new cluster, those of `left` followed by those of `right`
    pub members: Vec<usize>,
}

#[derive(Debug, Clone)]
struct Cluster {
    node: usize,
    members: Vec<usize>,
}

/// The merge order produced by average-linkage (UPGMA-style) clustering.
///
/// Cluster distances are recomputed from the raw leaf distances at every step.  The pair with
/// the strictly smallest average wins, so ties go to the first pair `(a, b)`, `a < b`, in scan
/// order.  The merged cluster replaces `a` and `b` is removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideTree {
    num_leaves: usize,
    merges: Vec<Merge>,
}

impl GuideTree {
    pub fn build(distances: &DistanceMatrix) -> Result<Self> {
        let n = distances.len();
        if n == 0 {
            return Err(AlignError::invalid("cannot build a guide tree over no sequences"));
        }

        let mut clusters: Vec<Cluster> = (0..n)
            .map(|k| Cluster {
                node: k,
                members: vec![k],
            })
            .collect();
        let mut merges = Vec::with_capacity(n - 1);

        while clusters.len() > 1 {
            let mut best: Option<(f64, usize, usize)> = None;
            for a in 0..clusters.len() {
                for b in (a + 1)..clusters.len() {
                    let avg = average_distance(distances, &clusters[a], &clusters[b]);
                    if best.map_or(true, |(d, _, _)| avg < d) {
                        best = Some((avg, a, b));
                    }
                }
            }
            let (avg, a, b) = match best {
                Some(best) => best,
                None => break,
            };

            let removed = clusters.remove(b);
            let node = n + merges.len();
            let kept = &mut clusters[a];
            let left = kept.node;
            kept.members.extend(removed.members);
            kept.node = node;
            debug!(
                "Merged guide tree nodes {} and {} into {} at distance {:.3}",
                left, removed.node, node, avg
            );
            merges.push(Merge {
                left,
                right: removed.node,
                node,
                distance: avg,
                members: kept.members.clone(),
            });
        }

        Ok(Self {
            num_leaves: n,
            merges,
        })
    }

    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// The merges in the order they were performed; always `N - 1` of them.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// The id of the root node.
    pub fn root(&self) -> usize {
        self.merges.last().map_or(0, |m| m.node)
    }

    pub fn node(&self, id: usize) -> Option<GuideNode> {
        if id < self.num_leaves {
            Some(GuideNode::Leaf(id))
        } else {
            self.merges
                .get(id - self.num_leaves)
                .map(|m| GuideNode::Internal {
                    left: m.left,
                    right: m.right,
                })
        }
    }

    /// Renders the topology in Newick format, labelling leaf `k` with `names[k]`.
    pub fn newick<S: AsRef<str>>(&self, names: &[S]) -> String {
        let mut out = String::new();
        self.write_newick(self.root(), names, &mut out);
        out.push(';');
        out
    }

    fn write_newick<S: AsRef<str>>(&self, id: usize, names: &[S], out: &mut String) {
        match self.node(id) {
            Some(GuideNode::Internal { left, right }) => {
                out.push('(');
                self.write_newick(left, names, out);
                out.push(',');
                self.write_newick(right, names, out);
                out.push(')');
            }
            Some(GuideNode::Leaf(k)) => match names.get(k) {
                Some(name) => out.push_str(name.as_ref()),
                None => out.push_str(&k.to_string()),
            },
            None => (),
        }
    }
}

/// Mean of all cross distances between the members of `a` and of `b`.
fn average_distance(distances: &DistanceMatrix, a: &Cluster, b: &Cluster) -> f64 {
    let total: i64 = a
        .members
        .iter()
        .flat_map(|&p| b.members.iter().map(move |&q| i64::from(distances.get(p, q))))
        .sum();
    total as f64 / (a.members.len() * b.members.len()) as f64
}
