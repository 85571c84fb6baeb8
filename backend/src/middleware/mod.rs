//! Request middleware.
//!
//! Purpose: own the cross-cutting request concerns (trace scoping, error
//! remapping, content type, access logging) in one wrapper so handlers stay
//! thin.

pub mod response_mapper;

pub use response_mapper::{ResponseMapper, TRACE_ID_HEADER};
