//! Pull-based iteration over generated IDs

use std::iter::FusedIterator;

use super::SnowflakeGenerator;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::snowflake::Snowflake;

/// Blocking iterator over a generator's IDs
///
/// Each call to `next` runs [`SnowflakeGenerator::generate`]. The iterator
/// ends once the generator is closed; any other failure is yielded as an
/// `Err` item.
#[derive(Debug)]
pub struct Iter<'a, C> {
    generator: &'a SnowflakeGenerator<C>,
}

impl<C: Clock> Iterator for Iter<'_, C> {
    type Item = Result<Snowflake>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.generator.generate() {
            Err(Error::Closed) => None,
            result => Some(result),
        }
    }
}

impl<C: Clock> FusedIterator for Iter<'_, C> {}

impl<C: Clock> SnowflakeGenerator<C> {
    /// Iterate over freshly generated IDs until the generator is closed
    pub fn iter(&self) -> Iter<'_, C> {
        Iter { generator: self }
    }
}

impl<'a, C: Clock> IntoIterator for &'a SnowflakeGenerator<C> {
    type Item = Result<Snowflake>;
    type IntoIter = Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::config::GeneratorConfig;
    use crate::epoch::Epoch;
    use crate::SnowflakeGenerator;

    #[test]
    fn test_iter_yields_increasing_ids() {
        let config = GeneratorConfig::new(Epoch::UNIX, 2, 4).unwrap();
        let generator = SnowflakeGenerator::with_clock(config, ManualClock::new(5_000));

        let ids: Vec<_> = generator.iter().take(5).map(Result::unwrap).collect();
        assert_eq!(ids.len(), 5);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_iter_ends_after_close() {
        let config = GeneratorConfig::new(Epoch::UNIX, 2, 4).unwrap();
        let generator = SnowflakeGenerator::with_clock(config, ManualClock::new(5_000));

        let mut taken = 0;
        for id in &generator {
            id.unwrap();
            taken += 1;
            if taken == 3 {
                generator.close();
            }
        }
        assert_eq!(taken, 3);
        assert_eq!(generator.iter().next(), None);
    }
}
