pub mod local_git;
pub mod traits;
