//! The equalizer's parameter set.
//!
//! [`ParameterSnapshot`] is a plain copyable value holding all seven
//! parameters. It is what the control side publishes and what the audio
//! side designs coefficients from. [`EqParam`] names each parameter's slot
//! and carries its [`ParamDescriptor`].
//!
//! | Index | Name           | Range        | Default | Scale  |
//! |-------|----------------|--------------|---------|--------|
//! | 0     | LowCut Freq    | 20-20000 Hz  | 20      | log    |
//! | 1     | HighCut Freq   | 20-20000 Hz  | 20000   | log    |
//! | 2     | Peak Freq      | 20-20000 Hz  | 750     | log    |
//! | 3     | Peak Gain      | -24..24 dB   | 0       | linear |
//! | 4     | Peak Quality   | 0.1-10       | 1       | linear |
//! | 5     | LowCut Slope   | 0-3 (choice) | 0       | stepped|
//! | 6     | HighCut Slope  | 0-3 (choice) | 0       | stepped|

use crate::param_info::{ParamDescriptor, ParamId, ParameterInfo};

/// Number of user-facing parameters.
pub const PARAM_COUNT: usize = 7;

/// Steepness of a cut filter.
///
/// Each step adds one second-order section, i.e. 12 dB per octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slope {
    /// One section, 12 dB/octave.
    #[default]
    Db12,
    /// Two sections, 24 dB/octave.
    Db24,
    /// Three sections, 36 dB/octave.
    Db36,
    /// Four sections, 48 dB/octave.
    Db48,
}

impl Slope {
    /// All slopes, shallowest first.
    pub const ALL: [Slope; 4] = [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48];

    /// Slope for a choice index. Out-of-range indices clamp to [`Slope::Db48`].
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Slope::Db12,
            1 => Slope::Db24,
            2 => Slope::Db36,
            _ => Slope::Db48,
        }
    }

    /// Slope for a stored parameter value: rounded, clamped to `0..=3`,
    /// NaN maps to [`Slope::Db12`].
    pub fn from_value(value: f32) -> Self {
        if value.is_nan() || value < 0.5 {
            return Slope::Db12;
        }
        // Saturating float-to-int cast; +inf becomes usize::MAX.
        Self::from_index(libm::roundf(value) as usize)
    }

    /// Choice index, `0..=3`.
    pub const fn index(self) -> usize {
        match self {
            Slope::Db12 => 0,
            Slope::Db24 => 1,
            Slope::Db36 => 2,
            Slope::Db48 => 3,
        }
    }

    /// Number of biquad sections.
    pub const fn sections(self) -> usize {
        self.index() + 1
    }

    /// Attenuation per octave well inside the stop band.
    pub const fn db_per_octave(self) -> f32 {
        12.0 * self.sections() as f32
    }

    /// Display label, e.g. `"24 dB/Octave"`.
    pub const fn label(self) -> &'static str {
        match self {
            Slope::Db12 => "12 dB/Octave",
            Slope::Db24 => "24 dB/Octave",
            Slope::Db36 => "36 dB/Octave",
            Slope::Db48 => "48 dB/Octave",
        }
    }
}

/// Slot of each parameter in [`ParameterSnapshot::to_values`] and in
/// host-facing stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum EqParam {
    /// Low-cut cutoff, Hz.
    LowCutFreq = 0,
    /// High-cut cutoff, Hz.
    HighCutFreq = 1,
    /// Peak centre frequency, Hz.
    PeakFreq = 2,
    /// Peak gain, dB.
    PeakGain = 3,
    /// Peak Q.
    PeakQuality = 4,
    /// Low-cut slope choice.
    LowCutSlope = 5,
    /// High-cut slope choice.
    HighCutSlope = 6,
}

static DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor::frequency("LowCut Freq", "LowCut", 20.0, 20000.0, 20.0)
        .with_id(ParamId(100), "low_cut_freq"),
    ParamDescriptor::frequency("HighCut Freq", "HighCut", 20.0, 20000.0, 20000.0)
        .with_id(ParamId(101), "high_cut_freq"),
    ParamDescriptor::frequency("Peak Freq", "PeakFreq", 20.0, 20000.0, 750.0)
        .with_id(ParamId(102), "peak_freq"),
    ParamDescriptor::gain_db("Peak Gain", "PeakGain", -24.0, 24.0, 0.0)
        .with_id(ParamId(103), "peak_gain"),
    ParamDescriptor::plain("Peak Quality", "PeakQ", 0.1, 10.0, 1.0, 0.05)
        .with_id(ParamId(104), "peak_quality"),
    ParamDescriptor::choice("LowCut Slope", "LCSlope", 4, 0).with_id(ParamId(105), "low_cut_slope"),
    ParamDescriptor::choice("HighCut Slope", "HCSlope", 4, 0)
        .with_id(ParamId(106), "high_cut_slope"),
];

impl EqParam {
    /// All parameters in slot order.
    pub const ALL: [EqParam; PARAM_COUNT] = [
        EqParam::LowCutFreq,
        EqParam::HighCutFreq,
        EqParam::PeakFreq,
        EqParam::PeakGain,
        EqParam::PeakQuality,
        EqParam::LowCutSlope,
        EqParam::HighCutSlope,
    ];

    /// Parameter at `index`, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Slot index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Metadata for this parameter.
    #[inline]
    pub fn descriptor(self) -> &'static ParamDescriptor {
        &DESCRIPTORS[self.index()]
    }

    /// The full descriptor table in slot order.
    pub fn descriptors() -> &'static [ParamDescriptor; PARAM_COUNT] {
        &DESCRIPTORS
    }
}

/// An immutable, internally consistent set of all equalizer parameters.
///
/// Values are in plain units. Slopes are already decoded into [`Slope`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSnapshot {
    /// Low-cut cutoff in Hz.
    pub low_cut_freq: f32,
    /// High-cut cutoff in Hz.
    pub high_cut_freq: f32,
    /// Peak centre frequency in Hz.
    pub peak_freq: f32,
    /// Peak gain in dB.
    pub peak_gain_db: f32,
    /// Peak Q.
    pub peak_quality: f32,
    /// Low-cut steepness.
    pub low_cut_slope: Slope,
    /// High-cut steepness.
    pub high_cut_slope: Slope,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self {
            low_cut_freq: 20.0,
            high_cut_freq: 20000.0,
            peak_freq: 750.0,
            peak_gain_db: 0.0,
            peak_quality: 1.0,
            low_cut_slope: Slope::Db12,
            high_cut_slope: Slope::Db12,
        }
    }
}

impl ParameterSnapshot {
    /// Builds a snapshot from raw slot values, sanitising each through its
    /// descriptor (NaN to default, clamp, round stepped values).
    ///
    /// ```rust
    /// use pareq_core::{ParameterSnapshot, Slope};
    ///
    /// let snap = ParameterSnapshot::from_values(&[5.0, 20000.0, 1000.0, 99.0, 1.0, 2.2, 7.0]);
    /// assert_eq!(snap.low_cut_freq, 20.0);
    /// assert_eq!(snap.peak_gain_db, 24.0);
    /// assert_eq!(snap.low_cut_slope, Slope::Db36);
    /// assert_eq!(snap.high_cut_slope, Slope::Db48);
    /// ```
    pub fn from_values(values: &[f32; PARAM_COUNT]) -> Self {
        let mut snapshot = Self::default();
        for (index, &value) in values.iter().enumerate() {
            snapshot.set_param(index, value);
        }
        snapshot
    }

    /// Slot values, inverse of [`from_values`](Self::from_values) for
    /// in-range input.
    pub fn to_values(&self) -> [f32; PARAM_COUNT] {
        core::array::from_fn(|index| self.get_param(index))
    }

    /// Value of `param` in plain units.
    pub fn get(&self, param: EqParam) -> f32 {
        match param {
            EqParam::LowCutFreq => self.low_cut_freq,
            EqParam::HighCutFreq => self.high_cut_freq,
            EqParam::PeakFreq => self.peak_freq,
            EqParam::PeakGain => self.peak_gain_db,
            EqParam::PeakQuality => self.peak_quality,
            EqParam::LowCutSlope => self.low_cut_slope.index() as f32,
            EqParam::HighCutSlope => self.high_cut_slope.index() as f32,
        }
    }

    /// Sets `param`, sanitised through its descriptor.
    pub fn set(&mut self, param: EqParam, value: f32) {
        let value = param.descriptor().sanitize(value);
        match param {
            EqParam::LowCutFreq => self.low_cut_freq = value,
            EqParam::HighCutFreq => self.high_cut_freq = value,
            EqParam::PeakFreq => self.peak_freq = value,
            EqParam::PeakGain => self.peak_gain_db = value,
            EqParam::PeakQuality => self.peak_quality = value,
            EqParam::LowCutSlope => self.low_cut_slope = Slope::from_value(value),
            EqParam::HighCutSlope => self.high_cut_slope = Slope::from_value(value),
        }
    }
}

impl ParameterInfo for ParameterSnapshot {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        EqParam::from_index(index).map(|p| *p.descriptor())
    }

    fn get_param(&self, index: usize) -> f32 {
        EqParam::from_index(index).map_or(0.0, |p| self.get(p))
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if let Some(param) = EqParam::from_index(index) {
            self.set(param, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param_info::ParamFlags;

    #[test]
    fn slope_mapping() {
        for (i, slope) in Slope::ALL.iter().enumerate() {
            assert_eq!(slope.index(), i);
            assert_eq!(slope.sections(), i + 1);
            assert_eq!(Slope::from_index(i), *slope);
        }
        assert_eq!(Slope::from_index(17), Slope::Db48);
        assert_eq!(Slope::Db36.db_per_octave(), 36.0);
        assert_eq!(Slope::Db24.label(), "24 dB/Octave");
    }

    #[test]
    fn slope_from_value_rounds_and_clamps() {
        assert_eq!(Slope::from_value(0.4), Slope::Db12);
        assert_eq!(Slope::from_value(0.6), Slope::Db24);
        assert_eq!(Slope::from_value(2.0), Slope::Db36);
        assert_eq!(Slope::from_value(-3.0), Slope::Db12);
        assert_eq!(Slope::from_value(f32::NAN), Slope::Db12);
        assert_eq!(Slope::from_value(f32::INFINITY), Slope::Db48);
    }

    #[test]
    fn default_matches_descriptor_defaults() {
        let snap = ParameterSnapshot::default();
        for param in EqParam::ALL {
            assert_eq!(snap.get(param), param.descriptor().default, "{param:?}");
        }
    }

    #[test]
    fn descriptor_ids_are_unique_and_stable() {
        let descs = EqParam::descriptors();
        for (i, d) in descs.iter().enumerate() {
            assert_eq!(d.id, ParamId(100 + i as u32));
            assert!(!d.string_id.is_empty());
            for other in &descs[i + 1..] {
                assert_ne!(d.string_id, other.string_id);
            }
        }
        assert!(EqParam::LowCutSlope.descriptor().flags.contains(ParamFlags::STEPPED));
        assert!(!EqParam::PeakGain.descriptor().flags.contains(ParamFlags::STEPPED));
    }

    #[test]
    fn values_roundtrip() {
        let values = [120.0, 8000.0, 2500.0, -4.5, 2.0, 3.0, 1.0];
        let snap = ParameterSnapshot::from_values(&values);
        assert_eq!(snap.to_values(), values);
        assert_eq!(snap.low_cut_slope, Slope::Db48);
        assert_eq!(snap.high_cut_slope, Slope::Db24);
    }

    #[test]
    fn set_sanitises() {
        let mut snap = ParameterSnapshot::default();
        snap.set(EqParam::PeakQuality, 0.0);
        assert_eq!(snap.peak_quality, 0.1);
        snap.set(EqParam::PeakFreq, f32::NAN);
        assert_eq!(snap.peak_freq, 750.0);
        snap.set(EqParam::HighCutFreq, 1e9);
        assert_eq!(snap.high_cut_freq, 20000.0);
    }

    #[test]
    fn parameter_info_lookup() {
        let snap = ParameterSnapshot::default();
        assert_eq!(snap.param_count(), PARAM_COUNT);
        assert_eq!(snap.find_param_by_name("peak gain"), Some(3));
        assert_eq!(snap.find_param_by_name("high_cut_slope"), Some(6));
        assert_eq!(snap.param_index_by_id(ParamId(104)), Some(4));
        assert_eq!(snap.param_index_by_id(ParamId(1)), None);
        assert!(snap.param_info(PARAM_COUNT).is_none());
        assert_eq!(snap.get_param(99), 0.0);
    }
}
