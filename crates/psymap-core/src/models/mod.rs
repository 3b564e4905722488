pub mod analysis;
pub mod clinical;
pub mod feedback;
pub mod input;
pub mod mbti;
pub mod traits;
