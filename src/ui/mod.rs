pub mod actor_view;
pub mod camera;
pub mod effects_view;
pub mod environment;
pub mod frame;
pub mod input;
pub mod palette;
pub mod renderer;
