use crate::Level;

/// Accepts a new level only after it was sampled `threshold` times in a row.
///
/// Any sample matching the accepted level restarts the count, there is no partial credit across
/// a bounce.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Filter {
    level: Level,
    count: u8,
}

impl Filter {
    pub const fn new(initial: Level) -> Filter {
        Filter {
            level: initial,
            count: 0,
        }
    }

    /// Feeds one raw sample and returns the accepted level after it.
    pub fn sample(&mut self, raw: Level, threshold: u8) -> Level {
        if raw != self.level {
            self.count += 1;
            if self.count >= threshold {
                self.level = raw;
                self.count = 0;
            }
        } else {
            self.count = 0;
        }
        self.level
    }

    pub const fn level(&self) -> Level {
        self.level
    }

    /// Differing samples seen since the last match, always below the threshold.
    pub const fn count(&self) -> u8 {
        self.count
    }
}
