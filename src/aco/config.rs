//! ACO configuration.

/// Configuration for the Ant Colony solver.
///
/// # Defaults
///
/// ```
/// use u_netroute::aco::AcoConfig;
///
/// let config = AcoConfig::default();
/// assert_eq!(config.ants, 20);
/// assert_eq!(config.iterations, 30);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_netroute::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_ants(40)
///     .with_evaporation(0.3)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Number of ants per iteration.
    pub ants: usize,

    /// Number of colony iterations.
    pub iterations: usize,

    /// Pheromone influence exponent (history).
    pub alpha: f64,

    /// Heuristic influence exponent (inverse edge cost).
    pub beta: f64,

    /// Evaporation rate ρ, strictly inside (0, 1). Each iteration every
    /// edge keeps a `1 - ρ` fraction of its pheromone.
    pub evaporation: f64,

    /// Deposit constant Q; the iteration-best candidate deposits
    /// `Q / score` on each of its edges.
    pub deposit: f64,

    /// Pheromone every edge starts with.
    pub initial_pheromone: f64,

    /// Lower bound pheromone never evaporates below, so exploration
    /// never fully dies out.
    pub min_pheromone: f64,

    /// Hop bound for ant walks. `None` uses the model default (twice
    /// the node count).
    pub max_hops: Option<usize>,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            ants: 20,
            iterations: 30,
            alpha: 1.0,
            beta: 2.0,
            evaporation: 0.5,
            deposit: 100.0,
            initial_pheromone: 1.0,
            min_pheromone: 0.01,
            max_hops: None,
            seed: None,
        }
    }
}

impl AcoConfig {
    /// Sets the colony size.
    pub fn with_ants(mut self, n: usize) -> Self {
        self.ants = n;
        self
    }

    /// Sets the iteration budget.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Sets the pheromone influence exponent.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the heuristic influence exponent.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the evaporation rate.
    pub fn with_evaporation(mut self, rho: f64) -> Self {
        self.evaporation = rho;
        self
    }

    /// Sets the deposit constant.
    pub fn with_deposit(mut self, q: f64) -> Self {
        self.deposit = q;
        self
    }

    /// Sets the initial pheromone level.
    pub fn with_initial_pheromone(mut self, tau: f64) -> Self {
        self.initial_pheromone = tau;
        self
    }

    /// Sets the pheromone floor.
    pub fn with_min_pheromone(mut self, tau: f64) -> Self {
        self.min_pheromone = tau;
        self
    }

    /// Sets the hop bound for ant walks.
    pub fn with_max_hops(mut self, hops: usize) -> Self {
        self.max_hops = Some(hops);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.ants == 0 {
            return Err("ants must be at least 1".into());
        }
        if self.iterations == 0 {
            return Err("iterations must be at least 1".into());
        }
        if !(self.evaporation > 0.0 && self.evaporation < 1.0) {
            return Err("evaporation must be strictly between 0 and 1".into());
        }
        if self.alpha < 0.0 {
            return Err("alpha must be non-negative".into());
        }
        if self.beta < 0.0 {
            return Err("beta must be non-negative".into());
        }
        if self.deposit <= 0.0 {
            return Err("deposit must be positive".into());
        }
        if self.min_pheromone <= 0.0 {
            return Err("min_pheromone must be positive".into());
        }
        if self.initial_pheromone < self.min_pheromone {
            return Err("initial_pheromone must not be below min_pheromone".into());
        }
        if self.max_hops == Some(0) {
            return Err("max_hops must be positive or None".into());
        }
        Ok(())
    }
}
