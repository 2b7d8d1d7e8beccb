//! Protocol constants for alt-da batcher transactions.

/// Max input size ensures the canonical chain cannot include input batches too
/// large to challenge in the Data Availability Challenge contract. Value in
/// number of bytes. This value can only be changed in a hard fork.
pub const MAX_INPUT_SIZE: usize = 130_672;

/// TxDataVersion1 is the version number for batcher transactions containing
/// alt-da commitments. It must not collide with the derivation version tags
/// used downstream when parsing frames.
pub const TX_DATA_VERSION_1: u8 = 1;
