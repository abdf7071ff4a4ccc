//! A single trace record.

use crate::format::Samples;
use serde::Serialize;

/// One trace: fixed-size title, auxiliary data and sample array
///
/// Traces are built by the reader on every retrieval, or by a caller for
/// appending. The trace set never keeps them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub title: Vec<u8>,
    pub data: Vec<u8>,
    pub samples: Samples,
}

impl Trace {
    pub fn new(title: Vec<u8>, data: Vec<u8>, samples: Samples) -> Self {
        Self {
            title,
            data,
            samples,
        }
    }

    /// Title as text, with invalid UTF-8 replaced and trailing NULs dropped
    pub fn title_lossy(&self) -> String {
        String::from_utf8_lossy(&self.title)
            .trim_end_matches('\0')
            .to_string()
    }

    /// Samples multiplied by the header's y-scale
    pub fn scaled_samples(&self, y_scale: f32) -> Vec<f32> {
        self.samples
            .to_f32()
            .into_iter()
            .map(|s| s * y_scale)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_lossy_trims_padding() {
        let trace = Trace::new(b"run 7\0\0\0".to_vec(), vec![], Samples::U8(vec![]));
        assert_eq!(trace.title_lossy(), "run 7");
    }

    #[test]
    fn test_scaled_samples() {
        let trace = Trace::new(vec![], vec![], Samples::U16(vec![2, 4]));
        assert_eq!(trace.scaled_samples(0.5), vec![1.0, 2.0]);
    }
}
