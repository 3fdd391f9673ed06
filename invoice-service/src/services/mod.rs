pub mod renderer;
mod text;
pub mod validation;
