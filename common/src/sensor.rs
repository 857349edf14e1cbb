use crate::Reading;

/// Something that samples the methane and CO2 sensors.
pub trait ReadingSource {
    /// Takes one sample of both sensors.
    fn read(&mut self) -> Result<Reading, Box<dyn std::error::Error>>;
}
