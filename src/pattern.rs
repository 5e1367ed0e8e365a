use heapless::Vec;

/// Maximum number of entries a light's pulse pattern can hold.
pub const PATTERN_CAPACITY: usize = 16;

/// Lit time of each flash in the canned patterns, in milliseconds.
pub const FLASH_MS: u32 = 250;

/// Dark time closing each cycle of the canned patterns, in milliseconds.
pub const FLASH_PAUSE_MS: u32 = 1000;

/// One entry of a pulse pattern, as yielded during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pulse {
    /// Light for this many milliseconds.
    On(u32),

    /// Stay dark for this many milliseconds.
    Off(u32),
}

/// Pattern validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternError {
    /// No entries provided.
    EmptyPattern,

    /// Pattern capacity exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for PatternError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PatternError::EmptyPattern => {
                write!(f, "pattern must have at least one entry")
            }
            PatternError::CapacityExceeded => {
                write!(f, "pattern capacity exceeded")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PatternError {}

/// A cyclic list of alternating on/off durations in milliseconds.
///
/// Entry 0 is an "on" pulse, entry 1 the following "off" gap, and so on.
/// Playback wraps to the first entry after the last one:
///
/// ```text
///   [250, 1000]                     one short flash per cycle
///   [250, 250, 250, 1000]           two short flashes
///   [250, 250, 250, 250, 250, 1000] three short flashes
///   [500, 500]                      slow blink
/// ```
///
/// # Type Parameters
/// * `N` - Maximum number of entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulsePattern<const N: usize = PATTERN_CAPACITY> {
    durations: Vec<u32, N>,
    cursor: Option<usize>,
}

impl<const N: usize> PulsePattern<N> {
    /// Creates an empty pattern.
    pub const fn new() -> Self {
        Self {
            durations: Vec::new(),
            cursor: None,
        }
    }

    /// Creates a new pattern builder.
    pub fn builder() -> PatternBuilder<N> {
        PatternBuilder::new()
    }

    /// Copies durations from a slice.
    ///
    /// An empty slice gives an empty pattern, which never plays.
    ///
    /// # Errors
    /// * `CapacityExceeded` - More than `N` durations
    pub fn from_slice(durations: &[u32]) -> Result<Self, PatternError> {
        let durations = Vec::from_slice(durations).map_err(|_| PatternError::CapacityExceeded)?;
        Ok(Self {
            durations,
            cursor: None,
        })
    }

    /// Builds `count` equal flashes separated by `flash_ms` gaps, followed by
    /// a `pause_ms` gap before the cycle repeats.
    ///
    /// # Errors
    /// * `EmptyPattern` - `count` is zero
    /// * `CapacityExceeded` - `2 * count` exceeds `N`
    pub fn flashes(count: usize, flash_ms: u32, pause_ms: u32) -> Result<Self, PatternError> {
        let mut builder = Self::builder();
        for i in 0..count {
            let gap = if i + 1 == count { pause_ms } else { flash_ms };
            builder = builder.pulse(flash_ms, gap)?;
        }
        builder.build()
    }

    /// One short flash per second: `[250, 1000]`.
    ///
    /// # Errors
    /// * `CapacityExceeded` - `N` is below 2
    pub fn single_flash() -> Result<Self, PatternError> {
        Self::flashes(1, FLASH_MS, FLASH_PAUSE_MS)
    }

    /// Two short flashes, then a pause: `[250, 250, 250, 1000]`.
    ///
    /// # Errors
    /// * `CapacityExceeded` - `N` is below 4
    pub fn double_flash() -> Result<Self, PatternError> {
        Self::flashes(2, FLASH_MS, FLASH_PAUSE_MS)
    }

    /// Three short flashes, then a pause: `[250, 250, 250, 250, 250, 1000]`.
    ///
    /// # Errors
    /// * `CapacityExceeded` - `N` is below 6
    pub fn triple_flash() -> Result<Self, PatternError> {
        Self::flashes(3, FLASH_MS, FLASH_PAUSE_MS)
    }

    /// Advances playback and returns the next pulse.
    ///
    /// Returns `None` for an empty pattern.
    pub fn advance(&mut self) -> Option<Pulse> {
        if self.durations.is_empty() {
            return None;
        }

        let next = match self.cursor {
            Some(index) if index + 1 < self.durations.len() => index + 1,
            _ => 0,
        };
        self.cursor = Some(next);

        let duration = self.durations[next];
        if next % 2 == 0 {
            Some(Pulse::On(duration))
        } else {
            Some(Pulse::Off(duration))
        }
    }

    /// Rewinds playback so the next `advance` yields the first entry.
    pub fn rewind(&mut self) {
        self.cursor = None;
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.durations.clear();
        self.cursor = None;
    }

    /// Index of the entry currently playing, if playback has started.
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    /// Returns the configured durations.
    pub fn durations(&self) -> &[u32] {
        &self.durations
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Returns true if the pattern has no entries.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Total duration of one cycle in milliseconds.
    pub fn cycle_ms(&self) -> u64 {
        self.durations.iter().map(|&d| u64::from(d)).sum()
    }
}

impl<const N: usize> Default for PulsePattern<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for pulse patterns.
#[derive(Debug)]
pub struct PatternBuilder<const N: usize> {
    durations: Vec<u32, N>,
}

impl<const N: usize> PatternBuilder<N> {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self {
            durations: Vec::new(),
        }
    }

    /// Appends a lit pulse followed by a dark gap.
    ///
    /// # Errors
    /// * `CapacityExceeded` - Both entries do not fit
    pub fn pulse(mut self, on_ms: u32, off_ms: u32) -> Result<Self, PatternError> {
        if self.durations.len() + 2 > N {
            return Err(PatternError::CapacityExceeded);
        }
        self.durations
            .extend_from_slice(&[on_ms, off_ms])
            .map_err(|_| PatternError::CapacityExceeded)?;
        Ok(self)
    }

    /// Builds the pattern.
    ///
    /// # Errors
    /// * `EmptyPattern` - No pulses were added
    pub fn build(self) -> Result<PulsePattern<N>, PatternError> {
        if self.durations.is_empty() {
            return Err(PatternError::EmptyPattern);
        }

        Ok(PulsePattern {
            durations: self.durations,
            cursor: None,
        })
    }
}

impl<const N: usize> Default for PatternBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}
