use derive_more::Display;

/// A single operation that transforms the left-hand tree towards the right-hand tree.
///
/// Nodes are referred to by their postorder index in the tree they belong to.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Display)]
pub enum EditOperation {
    /// Insert node `node` of the right-hand tree.
    #[display(fmt = "insert {label} ({cost})")]
    Insert {
        node: usize,
        label: Box<str>,
        cost: u64,
    },

    /// Delete node `node` of the left-hand tree; its children take its place.
    #[display(fmt = "delete {label} ({cost})")]
    Delete {
        node: usize,
        label: Box<str>,
        cost: u64,
    },

    /// Relabel node `from` of the left-hand tree as node `to` of the right-hand tree.
    #[display(fmt = "rename {from_label} -> {to_label} ({cost})")]
    Rename {
        from: usize,
        to: usize,
        from_label: Box<str>,
        to_label: Box<str>,
        cost: u64,
    },
}

impl EditOperation {
    /// The cost assigned to this operation by the cost model.
    pub fn cost(&self) -> u64 {
        match self {
            EditOperation::Insert { cost, .. }
            | EditOperation::Delete { cost, .. }
            | EditOperation::Rename { cost, .. } => *cost,
        }
    }
}
