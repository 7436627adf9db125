pub mod game_save;
pub mod message;
pub mod player;
pub mod scene_image;
pub mod screen;
pub mod session;
pub mod turn;
