//! Scene data: transforms, sphere meshes, the planet group and GPU textures.
//!
//! - `transform` holds position / Euler rotation / scale of scene nodes
//! - `sphere` tessellates UV spheres and uploads them as meshes
//! - `scene_graph` groups the Earth and atmosphere nodes
//! - `texture` wraps wgpu textures and their creation

pub mod scene_graph;
pub mod sphere;
pub mod texture;
pub mod transform;
