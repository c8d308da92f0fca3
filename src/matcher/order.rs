//! Builds the fixed query-atom traversal order consulted throughout the search (§4.2).
//!
//! The order is computed once, at handle construction, from the query molecule alone: a
//! BFS-like sweep that always promotes the lowest-index frontier atom, falling back to the
//! lowest-index unseen atom when no component is currently open. Ties are broken by atom index
//! so the resulting order — and everything downstream of it — is deterministic (§5).

use crate::core::molecule::Molecule;

/// A single query atom's position in the traversal order, plus the parent that introduced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderEntry {
    /// Query atom index.
    pub atom: usize,
    /// The first already-ordered atom bonded to `atom`, or `None` for a new component's root.
    pub parent: Option<usize>,
}

/// The query's fixed traversal order, one entry per atom, plus a lookup from atom index back
/// to its rank in the order (used by the matcher to decide which neighbours are "already
/// mapped" at any point in the search).
#[derive(Debug, Clone)]
pub struct QueryOrder {
    entries: Vec<OrderEntry>,
    rank: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Unseen,
    Frontier,
    Placed,
}

impl QueryOrder {
    /// Computes the traversal order for `query`, per §4.2's "query ordering construction".
    pub fn build(query: &Molecule) -> Self {
        let atom_count = query.atom_count();
        let mut flags = vec![Flag::Unseen; atom_count];
        let mut parents: Vec<Option<usize>> = vec![None; atom_count];
        let mut entries = Vec::with_capacity(atom_count);

        loop {
            let next = flags
                .iter()
                .position(|&f| f == Flag::Frontier)
                .or_else(|| flags.iter().position(|&f| f == Flag::Unseen));

            let Some(atom) = next else { break };

            flags[atom] = Flag::Placed;
            entries.push(OrderEntry {
                atom,
                parent: parents[atom],
            });

            for &neighbour in query.bonded_atoms(atom) {
                let neighbour = neighbour as usize;
                if flags[neighbour] == Flag::Unseen {
                    flags[neighbour] = Flag::Frontier;
                    parents[neighbour] = Some(atom);
                }
            }
        }

        let mut rank = vec![0; atom_count];
        for (position, entry) in entries.iter().enumerate() {
            rank[entry.atom] = position;
        }

        QueryOrder { entries, rank }
    }

    /// The ordered entries, one per query atom.
    pub fn entries(&self) -> &[OrderEntry] {
        &self.entries
    }

    /// Number of atoms in the order (equal to the query's atom count).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the order is empty (a query with no atoms).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// This atom's position in the traversal order.
    pub fn rank_of(&self, atom: usize) -> usize {
        self.rank[atom]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::atom::BondType;

    #[test]
    fn linear_chain_orders_root_first_with_correct_parents() {
        let mut mol = Molecule::empty(3, 0, false);
        mol.add_bond(0, 1, BondType::Single);
        mol.add_bond(1, 2, BondType::Single);

        let order = QueryOrder::build(&mol);
        let entries = order.entries();
        assert_eq!(entries[0], OrderEntry { atom: 0, parent: None });
        assert_eq!(entries[1], OrderEntry { atom: 1, parent: Some(0) });
        assert_eq!(entries[2], OrderEntry { atom: 2, parent: Some(1) });
    }

    #[test]
    fn disconnected_components_each_get_a_parentless_root() {
        let mol = Molecule::empty(2, 0, false);
        let order = QueryOrder::build(&mol);
        assert_eq!(order.entries()[0].parent, None);
        assert_eq!(order.entries()[1].parent, None);
    }

    #[test]
    fn frontier_atoms_are_preferred_over_deeper_unseen_atoms() {
        // Star graph: atom 0 bonded to 1, 2, 3. BFS should visit 0, then 1,2,3 in index order.
        let mut mol = Molecule::empty(4, 0, false);
        mol.add_bond(0, 1, BondType::Single);
        mol.add_bond(0, 2, BondType::Single);
        mol.add_bond(0, 3, BondType::Single);

        let order = QueryOrder::build(&mol);
        let atoms: Vec<usize> = order.entries().iter().map(|e| e.atom).collect();
        assert_eq!(atoms, vec![0, 1, 2, 3]);
    }

    #[test]
    fn rank_of_matches_position_in_entries() {
        let mut mol = Molecule::empty(3, 0, false);
        mol.add_bond(0, 1, BondType::Single);
        mol.add_bond(1, 2, BondType::Single);
        let order = QueryOrder::build(&mol);
        for (i, entry) in order.entries().iter().enumerate() {
            assert_eq!(order.rank_of(entry.atom), i);
        }
    }
}
