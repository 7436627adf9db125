pub mod fade;
pub mod player;
pub mod scene;
