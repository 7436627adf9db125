pub mod app;
pub mod center_panel;
pub mod character_creation;
pub mod left_panel;
pub mod right_panel;
pub mod scene_image;
pub mod settings;
pub mod settings_io;
pub mod typewriter;
pub mod windows;
