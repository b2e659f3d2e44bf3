//! A **Closest Point Transform (CPT)** library: distance, closest surface point and closest
//! feature for every point of a uniform lattice near a triangle mesh.
//!
//! Every face, edge and vertex of a [`SurfaceMesh`] owns a characteristic region, the part
//! of space for which it is the nearest piece of the surface. Each region is bounded by a
//! convex polyhedron, scan converted onto the [`Lattice`] and evaluated exactly only at the
//! lattice points it covers, so the cost is proportional to the surface area times the
//! maximum distance rather than to the lattice size.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to process output grids in parallel

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod bbox;
pub mod cpt;
pub mod errors;
pub mod float_types;
pub mod grid;
pub mod lattice;
pub mod mesh;
pub mod region;
pub mod scan;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use bbox::{BBox, IndexBox};
pub use cpt::{CptOps, CptParams, CptStats, SerialCptOps};
pub use errors::ValidationError;
pub use float_types::Real;
pub use grid::Grid;
pub use lattice::Lattice;
pub use mesh::{SurfaceMesh, TessellationCache};
pub use scan::ScanConversion;

#[cfg(feature = "parallel")]
pub use cpt::ParallelCptOps;
