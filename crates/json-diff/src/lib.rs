mod diff;
pub mod lcs;

pub use diff::{default_hash, diff, diff_with, DiffOptions, Hasher, MakeContext};
pub use lcs::{LcsMatrix, Step};
