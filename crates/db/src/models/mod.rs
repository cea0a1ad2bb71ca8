pub mod project;
pub mod pronunciation;
pub mod storyboard_version;
