//! Differential-drive actuator - rotation-only arcade mixing

/// Rotation-only drive command. The forward/back component of the arcade mix
/// is fixed at zero; the rotation value is always inside [-1, 1].
///
/// Sign convention: a positive rotation turns the robot clockwise when viewed
/// from above, which matches a gyro heading that grows clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveCommand {
    rotation: f64,
}

impl DriveCommand {
    pub fn rotation(value: f64) -> Self {
        Self {
            rotation: value.clamp(-1.0, 1.0),
        }
    }

    pub fn zero() -> Self {
        Self { rotation: 0.0 }
    }

    pub fn value(&self) -> f64 {
        self.rotation
    }

    pub fn is_zero(&self) -> bool {
        self.rotation == 0.0
    }
}

/// Single-method capability the control loop writes to once per tick.
pub trait Actuator {
    fn drive(&mut self, cmd: DriveCommand);
}

/// Two-motor drivetrain, one output per side.
///
/// `invert_rotation` flips the rotation sense for drivetrains wired
/// mirror-image, so a positive command still means clockwise at the chassis.
pub struct DifferentialDrive {
    invert_rotation: bool,
    left_output: f64,
    right_output: f64,
}

impl DifferentialDrive {
    pub fn new(invert_rotation: bool) -> Self {
        Self {
            invert_rotation,
            left_output: 0.0,
            right_output: 0.0,
        }
    }

    pub fn left_output(&self) -> f64 {
        self.left_output
    }

    pub fn right_output(&self) -> f64 {
        self.right_output
    }
}

impl Actuator for DifferentialDrive {
    fn drive(&mut self, cmd: DriveCommand) {
        let rotate = if self.invert_rotation {
            -cmd.value()
        } else {
            cmd.value()
        };
        // Arcade mix with the forward component held at zero: clockwise means
        // left side forward, right side back.
        self.left_output = rotate.clamp(-1.0, 1.0);
        self.right_output = (-rotate).clamp(-1.0, 1.0);
    }
}
