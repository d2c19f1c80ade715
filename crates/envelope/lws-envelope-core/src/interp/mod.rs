//! Interpolation kernels shared by envelope evaluation.
//!
//! Span evaluation dispatches on the later key's shape; tangents dispatch on
//! the shape of the key they belong to.

pub mod functions;

pub use functions::{
    bezier, bezier2_value, bezier_time, hermite_basis, incoming_tangent, outgoing_tangent,
};
