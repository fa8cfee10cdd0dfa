//! WebGPU rendering module
//!
//! The scene graph is flattened to colored NDC triangles on the CPU each
//! frame and drawn with a single pass-through pipeline.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::tessellate;
pub use vertex::Vertex;
