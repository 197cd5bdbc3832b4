mod publisher;
mod sample;
mod sysv_shm;

pub use publisher::PublishError;
pub use publisher::TimePublisher;
pub use sample::ShmTimeSample;
pub use sysv_shm::Key;
pub use sysv_shm::ShmTime;
pub use sysv_shm::Time;
