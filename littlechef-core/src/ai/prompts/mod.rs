//! Prompt templates for the generative model.

pub mod image;
pub mod recipe;

pub use image::{render_image_prompt, IMAGE_ASPECT_RATIO};
pub use recipe::{recipe_response_schema, render_recipe_prompt};
