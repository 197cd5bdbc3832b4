mod derived;
mod fan_out;
#[allow(clippy::module_inception)]
mod sink;

pub use derived::gga;
pub use fan_out::FanOut;
pub use sink::Sink;
pub use sink::SinkError;
