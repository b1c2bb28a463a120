//! Arbitrary-waveform validation and wire encoding.
//!
//! The function generator's volatile memory accepts between [`MIN_POINTS`]
//! and [`MAX_POINTS`] integer samples, each within
//! [`SAMPLE_MIN`]..=[`SAMPLE_MAX`] DAC counts. A [`Waveform`] can only be
//! constructed from data that satisfies both constraints, so no partial or
//! malformed upload can reach the transport.

use std::fmt;

use crate::error::ScpiError;

pub const SAMPLE_MIN: i32 = -2047;
pub const SAMPLE_MAX: i32 = 2047;
pub const MIN_POINTS: usize = 8;
pub const MAX_POINTS: usize = 16000;

/// Fixed verb prefixing the sample list on the wire.
pub const UPLOAD_HEADER: &str = "DATA:DAC VOLATILE, ";

/// Everything wrong with a rejected sample sequence. All violations are
/// collected, not just the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformViolations {
    /// Length of the rejected sequence.
    pub length: usize,
    /// `(index, value)` of every sample outside the DAC range.
    pub out_of_range: Vec<(usize, i32)>,
}

impl WaveformViolations {
    pub fn length_invalid(&self) -> bool {
        self.length < MIN_POINTS || self.length > MAX_POINTS
    }

    pub fn any(&self) -> bool {
        self.length_invalid() || !self.out_of_range.is_empty()
    }
}

impl fmt::Display for WaveformViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        if self.length_invalid() {
            write!(
                f,
                "length {} outside [{MIN_POINTS}, {MAX_POINTS}]",
                self.length
            )?;
            first = false;
        }
        if !self.out_of_range.is_empty() {
            if !first {
                write!(f, "; ")?;
            }
            write!(
                f,
                "{} sample(s) outside [{SAMPLE_MIN}, {SAMPLE_MAX}]:",
                self.out_of_range.len()
            )?;
            for (i, (index, value)) in self.out_of_range.iter().enumerate() {
                if i >= 5 {
                    write!(f, " and {} more", self.out_of_range.len() - 5)?;
                    break;
                }
                write!(f, " [{index}]={value}")?;
            }
        }
        Ok(())
    }
}

/// A validated arbitrary-waveform sample sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform {
    samples: Vec<i32>,
}

impl Waveform {
    /// Validate and take ownership of a sample sequence.
    ///
    /// ```
    /// use benchlink::Waveform;
    ///
    /// let wf = Waveform::new(vec![0; 8]).unwrap();
    /// assert_eq!(wf.to_wire(), "DATA:DAC VOLATILE, 0,0,0,0,0,0,0,0");
    ///
    /// // Out of range and too short; both violations are reported.
    /// assert!(Waveform::new(vec![2048]).is_err());
    /// ```
    pub fn new(samples: impl Into<Vec<i32>>) -> Result<Self, ScpiError> {
        let samples = samples.into();
        let out_of_range: Vec<(usize, i32)> = samples
            .iter()
            .enumerate()
            .filter(|&(_, &v)| !(SAMPLE_MIN..=SAMPLE_MAX).contains(&v))
            .map(|(i, &v)| (i, v))
            .collect();
        let violations = WaveformViolations {
            length: samples.len(),
            out_of_range,
        };
        if violations.any() {
            return Err(ScpiError::InvalidWaveform(violations));
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Serialize as the volatile-memory upload command: a comma-separated
    /// decimal list with no enclosing brackets.
    pub fn to_wire(&self) -> String {
        let body: Vec<String> = self.samples.iter().map(ToString::to_string).collect();
        format!("{UPLOAD_HEADER}{}", body.join(","))
    }
}

impl TryFrom<Vec<i32>> for Waveform {
    type Error = ScpiError;

    fn try_from(samples: Vec<i32>) -> Result<Self, Self::Error> {
        Waveform::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_flat_waveform_encodes() {
        let wf = Waveform::new(vec![0; 8]).unwrap();
        assert_eq!(wf.to_wire(), "DATA:DAC VOLATILE, 0,0,0,0,0,0,0,0");
        assert_eq!(wf.len(), 8);
        assert!(!wf.is_empty());
    }

    #[test]
    fn boundary_values_accepted() {
        let samples = vec![SAMPLE_MIN, SAMPLE_MAX, 0, 1, -1, 100, -100, 2047];
        let wf = Waveform::new(samples).unwrap();
        assert_eq!(
            wf.to_wire(),
            "DATA:DAC VOLATILE, -2047,2047,0,1,-1,100,-100,2047"
        );
    }

    #[test]
    fn too_short_sequence_rejected() {
        let err = Waveform::new(vec![0; 7]).unwrap_err();
        match err {
            ScpiError::InvalidWaveform(v) => {
                assert!(v.length_invalid());
                assert!(v.out_of_range.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn too_long_sequence_rejected() {
        let err = Waveform::new(vec![0; MAX_POINTS + 1]).unwrap_err();
        assert!(matches!(err, ScpiError::InvalidWaveform(v) if v.length_invalid()));
    }

    #[test]
    fn out_of_range_and_length_both_reported() {
        // Single out-of-range sample: two violations at once.
        let err = Waveform::new(vec![2048]).unwrap_err();
        match err {
            ScpiError::InvalidWaveform(v) => {
                assert!(v.length_invalid());
                assert_eq!(v.out_of_range, vec![(0, 2048)]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn all_out_of_range_indices_collected() {
        let mut samples = vec![0; 8];
        samples[2] = -2048;
        samples[5] = 4000;
        let err = Waveform::new(samples).unwrap_err();
        match err {
            ScpiError::InvalidWaveform(v) => {
                assert!(!v.length_invalid());
                assert_eq!(v.out_of_range, vec![(2, -2048), (5, 4000)]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn max_length_waveform_accepted() {
        assert!(Waveform::new(vec![1; MAX_POINTS]).is_ok());
    }
}
