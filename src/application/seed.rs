//! Seed forests supplied by the caller
//!
//! The engine never creates a hierarchy on its own; hosts start from one
//! of these (or from an imported snapshot).

use serde::{Deserialize, Serialize};

use crate::domain::{Forest, NodeKind, TreeNode};

/// Shape of the default single-program seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedShape {
    pub program_name: String,
    pub phases: usize,
    pub blocks_per_phase: usize,
}

/// Name of the single program in the default seed.
pub const DEFAULT_PROGRAM_NAME: &str = "Doctor of Medicine";

impl Default for SeedShape {
    fn default() -> Self {
        Self {
            program_name: DEFAULT_PROGRAM_NAME.to_string(),
            phases: 2,
            blocks_per_phase: 4,
        }
    }
}

/// One program named `shape.program_name` with `shape.phases` phases of `shape.blocks_per_phase` blocks.
///
/// Ids are `prog-1`, `phase-N`, `block-N`, with blocks numbered across the
/// whole program: the second phase of the default seed holds `block-5`..`block-8`.
pub fn default_seed(shape: &SeedShape) -> Forest {
    let mut block_no = 0;
    let phases = (1..=shape.phases)
        .map(|phase_no| {
            let blocks = (0..shape.blocks_per_phase)
                .map(|_| {
                    block_no += 1;
                    TreeNode::new(
                        format!("block-{}", block_no),
                        format!("Block {}", block_no),
                        NodeKind::Block,
                    )
                })
                .collect();
            TreeNode::new(
                format!("phase-{}", phase_no),
                format!("Phase {}", phase_no),
                NodeKind::Phase,
            )
            .with_children(blocks)
        })
        .collect();

    vec![
        TreeNode::new("prog-1", shape.program_name.as_str(), NodeKind::Program)
            .with_children(phases),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{count_by_kind, flatten_blocks};

    #[test]
    fn given_default_shape_when_seeding_then_two_phases_of_four() {
        let forest = default_seed(&SeedShape::default());
        let counts = count_by_kind(&forest);
        assert_eq!((counts.programs, counts.phases, counts.blocks), (1, 2, 8));
        let ids: Vec<String> = flatten_blocks(&forest)
            .into_iter()
            .map(|b| b.id.to_string())
            .collect();
        assert_eq!(ids[4], "block-5");
        assert_eq!(forest[0].children[1].children[0].name, "Block 5");
        assert_eq!(forest[0].name, "Doctor of Medicine");
    }
}
