//! Disjoint-set forest over maze cells
//!
//! Elements are dense cell ids in `[0, n)`. Parents and ranks live in flat
//! arrays indexed by id, so `find` is an index loop rather than recursion
//! and large grids cannot blow the stack.

use alloc::vec::Vec;

/// Union-find with full path compression and union-by-rank
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    /// `n` singleton sets; every element is its own representative
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: alloc::vec![0; n],
        }
    }

    /// Representative of the set containing `x`.
    ///
    /// Two passes: walk up to the root, then relink every node on the
    /// traversed chain directly to it.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merge the sets containing `a` and `b`.
    ///
    /// The lower-rank root goes under the higher-rank one. On a tie the
    /// root of `a` becomes the parent and its rank grows by one.
    /// Returns false if they were already in the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }

        match self.rank[ra].cmp(&self.rank[rb]) {
            core::cmp::Ordering::Greater => self.parent[rb] = ra,
            core::cmp::Ordering::Less => self.parent[ra] = rb,
            core::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }

    /// Whether `a` and `b` are currently in the same set
    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Rank of `x` (only meaningful for roots)
    pub fn rank(&self, x: usize) -> u32 {
        self.rank[x]
    }

    /// Direct parent of `x`, without compression
    pub fn parent(&self, x: usize) -> usize {
        self.parent[x]
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut uf = UnionFind::new(5);
        for i in 0..5 {
            assert_eq!(uf.find(i), i, "element {} should be its own root", i);
            assert_eq!(uf.rank(i), 0);
        }
        assert_eq!(uf.len(), 5);
        assert!(!uf.is_empty());
    }

    #[test]
    fn test_union_tie_goes_to_first_root() {
        let mut uf = UnionFind::new(4);
        assert!(uf.union(2, 3));
        assert_eq!(uf.find(3), 2);
        assert_eq!(uf.rank(2), 1);
        assert!(!uf.union(3, 2), "already joined");
    }

    #[test]
    fn test_lower_rank_goes_under_higher() {
        let mut uf = UnionFind::new(4);
        uf.union(0, 1); // root 0, rank 1
        uf.union(3, 0); // rank 0 under rank 1
        assert_eq!(uf.find(3), 0);
        assert_eq!(uf.rank(0), 1);
        assert_eq!(uf.rank(3), 0);
    }

    #[test]
    fn test_path_compression_relinks_chain() {
        let mut uf = UnionFind::new(8);
        // Build a chain of roots of growing rank: 0 <- 2 <- 4 ...
        uf.union(0, 1);
        uf.union(2, 3);
        uf.union(2, 0);
        uf.union(4, 5);
        uf.union(6, 7);
        uf.union(4, 6);
        uf.union(4, 2);

        let root = uf.find(1);
        assert_eq!(root, 4);
        assert_eq!(uf.parent(1), 4, "chain should point straight at the root");
        assert_eq!(uf.parent(0), 4);
    }

    #[test]
    fn test_transitive_and_disjoint() {
        let mut uf = UnionFind::new(6);
        uf.union(0, 1);
        uf.union(1, 2);
        uf.union(4, 5);

        assert!(uf.connected(0, 2));
        assert!(uf.connected(5, 4));
        assert!(!uf.connected(0, 4));
        assert!(!uf.connected(3, 0));
        assert!(!uf.connected(3, 5));
    }
}
