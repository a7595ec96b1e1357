use crossbeam::channel::{bounded, Receiver, Sender};
use std::sync::Arc;

use crate::actuator::drive::DriveCommand;
use crate::sensor::gyro::HeadingSample;

#[derive(Clone)]
pub struct SystemChannels {
    // Gyro loop -> control loop
    pub heading_tx: Sender<HeadingSample>,
    pub heading_rx: Arc<Receiver<HeadingSample>>,

    // Control loop -> plant (closes the simulation loop)
    pub command_tx: Sender<DriveCommand>,
    pub command_rx: Arc<Receiver<DriveCommand>>,
}

impl SystemChannels {
    pub fn new(buffer_size: usize) -> Self {
        let (heading_tx, heading_rx) = bounded(buffer_size);
        let (command_tx, command_rx) = bounded(buffer_size);

        Self {
            heading_tx,
            heading_rx: Arc::new(heading_rx),
            command_tx,
            command_rx: Arc::new(command_rx),
        }
    }
}
