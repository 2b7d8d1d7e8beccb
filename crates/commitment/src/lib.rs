#![no_std]
extern crate alloc;

pub mod commitment;
pub use commitment::{Commitment, CommitmentType};

pub mod constant;
pub use constant::{MAX_INPUT_SIZE, TX_DATA_VERSION_1};

pub mod errors;
pub use errors::CommitmentError;
