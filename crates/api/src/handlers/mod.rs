pub mod project;
pub mod pronunciation;
pub mod run;
pub mod storyboard;
