//! Q-Learning configuration.

/// Configuration for the Q-Learning solver.
///
/// # Defaults
///
/// ```
/// use u_netroute::qlearning::QlConfig;
///
/// let config = QlConfig::default();
/// assert_eq!(config.episodes, 2000);
/// assert!((config.alpha - 0.15).abs() < 1e-10);
/// assert!((config.gamma - 0.92).abs() < 1e-10);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_netroute::qlearning::QlConfig;
///
/// let config = QlConfig::default()
///     .with_episodes(500)
///     .with_alpha(0.1)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QlConfig {
    /// Number of training episodes. Each episode walks every demand
    /// once.
    pub episodes: usize,

    /// Learning rate α, strictly inside (0, 1].
    pub alpha: f64,

    /// Discount factor γ, inside [0, 1).
    pub gamma: f64,

    /// Initial exploration rate ε₀ (0.0–1.0).
    pub epsilon: f64,

    /// Exploration floor ε never decays below.
    pub min_epsilon: f64,

    /// Per-episode exponential decay factor, inside (0, 1].
    pub epsilon_decay: f64,

    /// Terminal bonus scale. Reaching the destination rewards
    /// `goal_reward / path cost`, so cheaper complete paths reinforce
    /// harder.
    pub goal_reward: f64,

    /// Penalty applied to the last transition when a walk dies in a
    /// dead end or hits the hop bound without arriving.
    pub dead_end_penalty: f64,

    /// Hop bound per demand walk. `None` uses the model default (twice
    /// the node count).
    pub max_hops: Option<usize>,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for QlConfig {
    fn default() -> Self {
        Self {
            episodes: 2000,
            alpha: 0.15,
            gamma: 0.92,
            epsilon: 1.0,
            min_epsilon: 0.01,
            epsilon_decay: 0.99,
            goal_reward: 2000.0,
            dead_end_penalty: 50.0,
            max_hops: None,
            seed: None,
        }
    }
}

impl QlConfig {
    /// Sets the episode budget.
    pub fn with_episodes(mut self, n: usize) -> Self {
        self.episodes = n;
        self
    }

    /// Sets the learning rate.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the discount factor.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the initial exploration rate.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.clamp(0.0, 1.0);
        self
    }

    /// Sets the exploration floor.
    pub fn with_min_epsilon(mut self, min_epsilon: f64) -> Self {
        self.min_epsilon = min_epsilon;
        self
    }

    /// Sets the per-episode epsilon decay factor.
    pub fn with_epsilon_decay(mut self, decay: f64) -> Self {
        self.epsilon_decay = decay;
        self
    }

    /// Sets the terminal bonus scale.
    pub fn with_goal_reward(mut self, reward: f64) -> Self {
        self.goal_reward = reward;
        self
    }

    /// Sets the dead-end/cutoff penalty.
    pub fn with_dead_end_penalty(mut self, penalty: f64) -> Self {
        self.dead_end_penalty = penalty;
        self
    }

    /// Sets the hop bound per demand walk.
    pub fn with_max_hops(mut self, hops: usize) -> Self {
        self.max_hops = Some(hops);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Exploration rate used in `episode` (0-based):
    /// `max(min_epsilon, epsilon · decay^episode)`.
    pub fn epsilon_at(&self, episode: usize) -> f64 {
        (self.epsilon * self.epsilon_decay.powi(episode as i32)).max(self.min_epsilon)
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.episodes == 0 {
            return Err("episodes must be at least 1".into());
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err("alpha must be in (0, 1]".into());
        }
        if !(0.0..1.0).contains(&self.gamma) {
            return Err("gamma must be in [0, 1)".into());
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err("epsilon must be in [0, 1]".into());
        }
        if self.min_epsilon < 0.0 || self.min_epsilon > self.epsilon {
            return Err("min_epsilon must be in [0, epsilon]".into());
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err("epsilon_decay must be in (0, 1]".into());
        }
        if self.goal_reward < 0.0 {
            return Err("goal_reward must be non-negative".into());
        }
        if self.dead_end_penalty < 0.0 {
            return Err("dead_end_penalty must be non-negative".into());
        }
        if self.max_hops == Some(0) {
            return Err("max_hops must be positive or None".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QlConfig::default();
        assert_eq!(config.episodes, 2000);
        assert!((config.alpha - 0.15).abs() < 1e-10);
        assert!((config.gamma - 0.92).abs() < 1e-10);
        assert!((config.epsilon - 1.0).abs() < 1e-10);
        assert!((config.min_epsilon - 0.01).abs() < 1e-10);
        assert!((config.epsilon_decay - 0.99).abs() < 1e-10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = QlConfig::default()
            .with_episodes(100)
            .with_alpha(0.2)
            .with_gamma(0.8)
            .with_epsilon(0.9)
            .with_min_epsilon(0.05)
            .with_epsilon_decay(0.95)
            .with_goal_reward(500.0)
            .with_dead_end_penalty(10.0)
            .with_max_hops(20)
            .with_seed(42);

        assert_eq!(config.episodes, 100);
        assert!((config.alpha - 0.2).abs() < 1e-10);
        assert!((config.gamma - 0.8).abs() < 1e-10);
        assert_eq!(config.max_hops, Some(20));
        assert_eq!(config.seed, Some(42));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_epsilon_schedule_decays_to_floor() {
        let config = QlConfig::default();
        assert!((config.epsilon_at(0) - 1.0).abs() < 1e-10);
        assert!(config.epsilon_at(1) < config.epsilon_at(0));
        assert!(config.epsilon_at(100) < 0.4);
        // Far enough out, only the floor remains: exploitation dominates.
        assert_eq!(config.epsilon_at(10_000), config.min_epsilon);
    }

    #[test]
    fn test_epsilon_schedule_is_monotone() {
        let config = QlConfig::default();
        for episode in 0..500 {
            assert!(config.epsilon_at(episode + 1) <= config.epsilon_at(episode));
        }
    }

    #[test]
    fn test_validate_zero_episodes() {
        assert!(QlConfig::default().with_episodes(0).validate().is_err());
    }

    #[test]
    fn test_validate_alpha_range() {
        assert!(QlConfig::default().with_alpha(0.0).validate().is_err());
        assert!(QlConfig::default().with_alpha(1.5).validate().is_err());
        assert!(QlConfig::default().with_alpha(1.0).validate().is_ok());
    }

    #[test]
    fn test_validate_gamma_range() {
        assert!(QlConfig::default().with_gamma(1.0).validate().is_err());
        assert!(QlConfig::default().with_gamma(-0.1).validate().is_err());
        assert!(QlConfig::default().with_gamma(0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_min_epsilon_above_epsilon() {
        let config = QlConfig::default().with_epsilon(0.1).with_min_epsilon(0.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_decay_range() {
        assert!(QlConfig::default().with_epsilon_decay(0.0).validate().is_err());
        assert!(QlConfig::default().with_epsilon_decay(1.1).validate().is_err());
        assert!(QlConfig::default().with_epsilon_decay(1.0).validate().is_ok());
    }
}
