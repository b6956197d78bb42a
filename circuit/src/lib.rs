//! Shared-subexpression arithmetic-circuit DAG and the library constructors
//! for the AIR row-shift ("matrix up" / "matrix down") polynomials and their
//! building blocks (`eq`, `next`).

mod library;
mod node;

pub use library::{eq_2n_vars, matrix_down_lde, matrix_up_lde, next};
pub use node::{eq_bit, one_minus, CircuitNode};
