//! Bus layout negotiation.
//!
//! The equalizer runs mono or stereo, with the same layout on input and
//! output. Anything else is rejected when the host asks, never during
//! streaming.

/// Channel configuration of one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelSet {
    /// Bus not connected.
    Disabled,
    /// One channel.
    Mono,
    /// Left and right.
    Stereo,
    /// Any other channel count.
    Discrete(u16),
}

impl ChannelSet {
    /// Channel set for a raw channel count.
    pub fn from_count(channels: u16) -> Self {
        match channels {
            0 => ChannelSet::Disabled,
            1 => ChannelSet::Mono,
            2 => ChannelSet::Stereo,
            n => ChannelSet::Discrete(n),
        }
    }

    /// Number of channels.
    pub fn channel_count(self) -> u16 {
        match self {
            ChannelSet::Disabled => 0,
            ChannelSet::Mono => 1,
            ChannelSet::Stereo => 2,
            ChannelSet::Discrete(n) => n,
        }
    }
}

/// Main input and output bus configuration proposed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusLayout {
    /// Main input bus.
    pub input: ChannelSet,
    /// Main output bus.
    pub output: ChannelSet,
}

impl BusLayout {
    /// Mono in, mono out.
    pub const MONO: Self = Self {
        input: ChannelSet::Mono,
        output: ChannelSet::Mono,
    };

    /// Stereo in, stereo out.
    pub const STEREO: Self = Self {
        input: ChannelSet::Stereo,
        output: ChannelSet::Stereo,
    };
}

/// Returns `true` if the processor can run with `layout`: output is mono or
/// stereo, and input matches output.
///
/// ```rust
/// use pareq_host::{BusLayout, ChannelSet, is_layout_supported};
///
/// assert!(is_layout_supported(&BusLayout::STEREO));
/// assert!(!is_layout_supported(&BusLayout {
///     input: ChannelSet::Mono,
///     output: ChannelSet::Stereo,
/// }));
/// ```
pub fn is_layout_supported(layout: &BusLayout) -> bool {
    matches!(layout.output, ChannelSet::Mono | ChannelSet::Stereo) && layout.input == layout.output
}
