//! Render pipelines of the planet's two materials.
//!
//! - `basic` builds pipelines and layouts shared by both materials
//! - `earth` is the day/night surface program (`earth.wgsl`)
//! - `atmosphere` is the Fresnel rim program (`atmosphere.wgsl`)

pub mod atmosphere;
pub mod basic;
pub mod earth;
