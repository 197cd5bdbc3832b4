mod alarms;
mod status;

pub use alarms::Alarms;
pub use status::FixQuality;
pub use status::GpsdoStatus;
pub use status::LeapIndicator;
pub use status::SatelliteInView;
