pub mod lesson;
pub mod progress;
pub mod result;
pub mod timer;
pub mod tracker;
