#![warn(missing_docs)]

//! Model loading for voxslice.
//!
//! Reads Wavefront OBJ files with their MTL material libraries and diffuse
//! textures into a [`voxslice::Scene`].
//!
//! # Example
//!
//! ```no_run
//! use voxslice_scene::load_scene;
//!
//! let scene = load_scene("model.obj").unwrap();
//! println!("{} meshes, bounds {:?}", scene.meshes.len(), scene.bounds());
//! ```

pub mod error;
mod texture;
mod wavefront;

pub use error::{Result, SceneError};
pub use texture::load_texture;
pub use wavefront::load_scene;
