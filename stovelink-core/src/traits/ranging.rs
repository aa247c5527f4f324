//! Distance ranging trait

/// Trait for distance sensors measuring the pellet surface
///
/// Implementations handle the specific transducer (ultrasonic, time of
/// flight, etc.).
pub trait RangeSensor {
    /// Measure the distance in whole centimeters
    ///
    /// Returns 0 when there is no echo or the reading is out of range.
    /// Takes `&mut self` because a measurement drives pins.
    fn read_distance_cm(&mut self) -> u16;
}
