use crate::{AlgorithmKind, InvalidConfigError, UnitCost};
use std::collections::BTreeSet;

/// The size above which only cheap algorithms run by default.
pub const DEFAULT_SIZE_THRESHOLD: usize = 256;

/// How a pair of trees should be compared.
///
/// Built once through [`TedConfig::builder`] and shared by reference across comparisons.
///
/// # Example
///
/// ```rust
/// use ted_engine::{AlgorithmKind, TedConfig, Weighted};
///
/// let config = TedConfig::builder()
///     .enabled([AlgorithmKind::ZhangShasha, AlgorithmKind::Klein])
///     .size_threshold(64)
///     .cost_model(Weighted { insert: 1, delete: 1, rename: 2 })
///     .build()?;
///
/// assert_eq!(config.size_threshold(), 64);
/// assert_eq!(config.cost_model().rename, 2);
/// # Ok::<(), ted_engine::InvalidConfigError>(())
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TedConfig<C = UnitCost> {
    enabled: BTreeSet<AlgorithmKind>,
    cheap: BTreeSet<AlgorithmKind>,
    size_threshold: usize,
    fallback: bool,
    cost_model: C,
}

impl TedConfig {
    /// Starts from the defaults: every algorithm, unit costs and the fallback enabled.
    pub fn builder() -> TedConfigBuilder {
        TedConfigBuilder::default()
    }
}

impl Default for TedConfig {
    fn default() -> Self {
        let TedConfigBuilder {
            enabled,
            cheap,
            size_threshold,
            fallback,
            cost_model,
        } = TedConfigBuilder::default();

        TedConfig {
            enabled,
            cheap,
            size_threshold,
            fallback,
            cost_model,
        }
    }
}

impl<C> TedConfig<C> {
    /// The algorithms the caller asked for.
    pub fn enabled(&self) -> &BTreeSet<AlgorithmKind> {
        &self.enabled
    }

    /// The algorithms that may still run on trees larger than the size threshold.
    pub fn cheap(&self) -> &BTreeSet<AlgorithmKind> {
        &self.cheap
    }

    /// The largest tree size on which every enabled algorithm runs.
    pub fn size_threshold(&self) -> usize {
        self.size_threshold
    }

    /// Whether [`AlgorithmKind::Simple`] runs when nothing else would.
    pub fn fallback(&self) -> bool {
        self.fallback
    }

    /// The costs of the edit operations.
    pub fn cost_model(&self) -> &C {
        &self.cost_model
    }
}

/// Accumulates the options of a [`TedConfig`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TedConfigBuilder<C = UnitCost> {
    enabled: BTreeSet<AlgorithmKind>,
    cheap: BTreeSet<AlgorithmKind>,
    size_threshold: usize,
    fallback: bool,
    cost_model: C,
}

impl Default for TedConfigBuilder {
    fn default() -> Self {
        TedConfigBuilder {
            enabled: AlgorithmKind::ALL.into_iter().collect(),
            cheap: [AlgorithmKind::Simple, AlgorithmKind::Adaptive].into(),
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            fallback: true,
            cost_model: UnitCost,
        }
    }
}

impl<C> TedConfigBuilder<C> {
    /// Replaces the set of enabled algorithms.
    pub fn enabled(mut self, algorithms: impl IntoIterator<Item = AlgorithmKind>) -> Self {
        self.enabled = algorithms.into_iter().collect();
        self
    }

    /// Adds one algorithm to the enabled set.
    pub fn enable(mut self, algorithm: AlgorithmKind) -> Self {
        self.enabled.insert(algorithm);
        self
    }

    /// Removes one algorithm from the enabled set.
    pub fn disable(mut self, algorithm: AlgorithmKind) -> Self {
        self.enabled.remove(&algorithm);
        self
    }

    /// Replaces the set of algorithms allowed to run above the size threshold.
    pub fn cheap(mut self, algorithms: impl IntoIterator<Item = AlgorithmKind>) -> Self {
        self.cheap = algorithms.into_iter().collect();
        self
    }

    /// Sets the largest tree size on which every enabled algorithm runs.
    pub fn size_threshold(mut self, size_threshold: usize) -> Self {
        self.size_threshold = size_threshold;
        self
    }

    /// Sets whether Simple runs when nothing else would.
    pub fn fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Replaces the cost model, possibly with one of another type.
    pub fn cost_model<D>(self, cost_model: D) -> TedConfigBuilder<D> {
        TedConfigBuilder {
            enabled: self.enabled,
            cheap: self.cheap,
            size_threshold: self.size_threshold,
            fallback: self.fallback,
            cost_model,
        }
    }

    /// Fails if no algorithm could ever run.
    pub fn build(self) -> Result<TedConfig<C>, InvalidConfigError> {
        if self.enabled.is_empty() && !self.fallback {
            return Err(InvalidConfigError::NothingEnabled);
        }

        Ok(TedConfig {
            enabled: self.enabled,
            cheap: self.cheap,
            size_threshold: self.size_threshold,
            fallback: self.fallback,
            cost_model: self.cost_model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Weighted;
    use assert_matches::assert_matches;

    #[test]
    fn defaults_enable_everything_and_keep_the_fallback() {
        let config = TedConfig::default();
        assert_eq!(config.enabled().len(), 4);
        assert_eq!(
            config.cheap().iter().copied().collect::<Vec<_>>(),
            [AlgorithmKind::Simple, AlgorithmKind::Adaptive]
        );
        assert_eq!(config.size_threshold(), DEFAULT_SIZE_THRESHOLD);
        assert!(config.fallback());
        assert_eq!(Ok(config), TedConfig::builder().build());
    }

    #[test]
    fn algorithms_can_be_toggled() {
        let config = TedConfig::builder()
            .enabled([])
            .enable(AlgorithmKind::Klein)
            .enable(AlgorithmKind::Simple)
            .disable(AlgorithmKind::Simple)
            .build()
            .unwrap();

        assert_eq!(config.enabled().iter().collect::<Vec<_>>(), [&AlgorithmKind::Klein]);
    }

    #[test]
    fn nothing_enabled_is_allowed_with_a_fallback() {
        let config = TedConfig::builder().enabled([]).build().unwrap();
        assert!(config.enabled().is_empty());
    }

    #[test]
    fn nothing_enabled_without_a_fallback_is_rejected() {
        let result = TedConfig::builder()
            .enabled([])
            .fallback(false)
            .build();

        assert_matches!(result, Err(InvalidConfigError::NothingEnabled));
    }

    #[test]
    fn the_cost_model_can_be_replaced() {
        let cost = Weighted {
            insert: 2,
            delete: 3,
            rename: 5,
        };

        let config = TedConfig::builder()
            .size_threshold(10)
            .cost_model(cost)
            .build()
            .unwrap();

        assert_eq!(config.cost_model(), &cost);
        assert_eq!(config.size_threshold(), 10);
    }
}
