mod apply;
mod commute;
pub mod context;
mod error;
mod inverse;
mod operation;
mod rebase;
mod undo;

pub use apply::{
    apply, apply_in_place, apply_in_place_with, apply_with, FindContext, PatchOptions,
};
pub use commute::{commute, commute_patches};
pub use error::{InvalidOperation, PatchError};
pub use inverse::invert;
pub use operation::{parse_patch, Operation, Patch};
pub use rebase::rebase;
