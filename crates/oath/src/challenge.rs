//! Challenges and the time source they are derived from

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::{CHALLENGE_LEN, TIME_MARGIN, TIME_STEP};
use crate::error::Result;

/// 8 byte big-endian moving factor sent with CALCULATE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Challenge([u8; CHALLENGE_LEN]);

impl Challenge {
    /// Challenge for an explicit counter value
    pub const fn from_counter(counter: u64) -> Self {
        Self(counter.to_be_bytes())
    }

    /// TOTP challenge for a point in time: `(secs + 10) / 30`
    ///
    /// The margin moves the step boundary ten seconds earlier, so a code is
    /// never displayed just before it expires.
    pub const fn from_unix_time(secs: u64) -> Self {
        Self::from_counter(secs.saturating_add(TIME_MARGIN) / TIME_STEP)
    }

    /// TOTP challenge for the current time of `clock`
    ///
    /// # Errors
    /// Returns whatever error `clock` reports when it cannot tell the time.
    pub fn now(clock: &impl Clock) -> Result<Self> {
        clock.unix_seconds().map(Self::from_unix_time)
    }

    /// The counter encoded in this challenge
    pub const fn counter(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }

    /// Raw challenge bytes
    pub const fn as_bytes(&self) -> &[u8; CHALLENGE_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Challenge {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Source of wall-clock time
pub trait Clock: Send + Sync + fmt::Debug {
    /// Seconds since the Unix epoch
    ///
    /// # Errors
    /// Fails when the time source cannot produce a time at or after the epoch.
    fn unix_seconds(&self) -> Result<u64>;
}

/// The system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> Result<u64> {
        Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
    }
}

/// A clock frozen at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn unix_seconds(&self) -> Result<u64> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_challenge_from_time() {
        assert_eq!(Challenge::from_unix_time(0).counter(), 0);
        assert_eq!(Challenge::from_unix_time(19).counter(), 0);
        assert_eq!(Challenge::from_unix_time(20).counter(), 1);
        assert_eq!(Challenge::from_unix_time(49).counter(), 1);
        assert_eq!(Challenge::from_unix_time(50).counter(), 2);

        // 1_234_567_890 + 10 = 1_234_567_900, / 30 = 41_152_263
        let challenge = Challenge::from_unix_time(1_234_567_890);
        assert_eq!(challenge.counter(), 41_152_263);
        assert_eq!(challenge.as_bytes(), &hex!("000000000273EF07"));
    }

    #[test]
    fn test_challenge_from_counter() {
        let challenge = Challenge::from_counter(12_345_678);
        assert_eq!(challenge.as_ref(), &hex!("0000000000BC614E"));
    }

    #[test]
    fn test_challenge_saturates() {
        assert_eq!(Challenge::from_unix_time(u64::MAX).counter(), u64::MAX / 30);
    }

    #[test]
    fn test_clocks() {
        let fixed = FixedClock(59);
        assert_eq!(Challenge::now(&fixed).unwrap().counter(), 2);
        // Any sane system clock is well past 2020
        assert!(SystemClock.unix_seconds().unwrap() > 1_577_836_800);
    }

    #[test]
    fn test_clock_before_epoch() {
        #[derive(Debug)]
        struct RewoundClock;

        impl Clock for RewoundClock {
            fn unix_seconds(&self) -> Result<u64> {
                let later = UNIX_EPOCH + std::time::Duration::from_secs(1);
                Ok(UNIX_EPOCH.duration_since(later)?.as_secs())
            }
        }

        let err = Challenge::now(&RewoundClock).unwrap_err();
        assert!(matches!(err, crate::Error::Clock(_)));
        assert!(err.to_string().starts_with("System clock is set before the Unix epoch"));
    }
}
