pub mod project_repo;
pub mod pronunciation_repo;
pub mod storyboard_version_repo;

pub use project_repo::ProjectRepo;
pub use pronunciation_repo::PronunciationRepo;
pub use storyboard_version_repo::StoryboardVersionRepo;
