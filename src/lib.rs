pub mod actuator;
pub mod async_impl;
pub mod benchmark;
pub mod config;
pub mod control;
pub mod ipc;
pub mod sensor;
pub mod telemetry;
pub mod threaded_impl;

pub use actuator::drive::{Actuator, DifferentialDrive, DriveCommand};
pub use config::{load_config, RuntimeConfig};
pub use control::heading::{ConfigError, HeadingConfig, HeadingController, TickError};
pub use control::mode::{apply_controller_transition, Mode, ModeSwitch};
pub use ipc::channels::SystemChannels;
pub use ipc::shared::{ConfigBuffer, DiagnosticLog};
pub use sensor::fault::RateFaultDetector;
pub use sensor::filter::MovingAverageFilter;
pub use sensor::gyro::{GyroParams, HeadingSample, HeadingSensor, SimulatedGyro};
pub use telemetry::{Dashboard, TelemetrySink, HEADING_KEY, OUTPUT_KEY};
