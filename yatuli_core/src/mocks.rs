//! Test and helper mocks for yatuli_core

use yatuli_traits::AnalogInput;

/// Replays a fixed sequence of raw readings, then repeats the last one.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    seq: Vec<u16>,
    idx: usize,
    reads: u64,
}

impl ScriptedInput {
    pub fn new(seq: impl Into<Vec<u16>>) -> Self {
        Self {
            seq: seq.into(),
            idx: 0,
            reads: 0,
        }
    }

    /// Always reads `raw`.
    pub fn constant(raw: u16) -> Self {
        Self::new([raw])
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl AnalogInput for ScriptedInput {
    fn configure_input(&mut self, _pin: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }

    fn read_raw(&mut self, _pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let v = match self.seq.get(self.idx) {
            Some(&x) => {
                self.idx += 1;
                x
            }
            None => self.seq.last().copied().unwrap_or(0),
        };
        self.reads += 1;
        Ok(v)
    }
}

/// An input whose every read fails; for exercising error paths.
pub struct FailingInput;

impl AnalogInput for FailingInput {
    fn configure_input(&mut self, _pin: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }

    fn read_raw(&mut self, _pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("failing input")))
    }
}
