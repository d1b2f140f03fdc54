//! Strategy selection and parameters.

/// Diversification operator used by iterated local search to escape the
/// current local optimum.
///
/// `SegmentReversal` is a weak kick (one random 2-opt move) that converges
/// quickly; `DoubleBridge` is the classic strong 4-opt kick that explores
/// more aggressively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerturbationScheme {
    SegmentReversal,
    #[default]
    DoubleBridge,
}

/// Parameters for the simulated-annealing strategy.
///
/// # Examples
///
/// ```
/// use station_tour::solver::SaParams;
///
/// let params = SaParams::default()
///     .with_cooling_rate(0.98)
///     .with_iterations_per_temperature(200)
///     .with_seed(42);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SaParams {
    /// Starting temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// The run stops once temperature falls below this floor.
    pub min_temperature: f64,

    /// Geometric cooling factor in (0, 1): `T ← cooling_rate · T` per epoch.
    pub cooling_rate: f64,

    /// Neighbor proposals evaluated at each temperature level.
    pub iterations_per_temperature: usize,

    /// Stop after this many consecutive epochs without a new best.
    pub max_stale_epochs: usize,

    /// RNG seed; `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for SaParams {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 1e-6,
            cooling_rate: 0.95,
            iterations_per_temperature: 100,
            max_stale_epochs: 50,
            seed: None,
        }
    }
}

impl SaParams {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_stale_epochs(mut self, n: usize) -> Self {
        self.max_stale_epochs = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if self.min_temperature <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return Err("min_temperature must be less than initial_temperature".into());
        }
        if self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err("iterations_per_temperature must be at least 1".into());
        }
        Ok(())
    }
}

/// Parameters for the iterated-local-search strategy.
///
/// # Examples
///
/// ```
/// use station_tour::solver::{IlsParams, PerturbationScheme};
///
/// let params = IlsParams::default()
///     .with_perturbation(PerturbationScheme::SegmentReversal)
///     .with_max_iterations(500);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct IlsParams {
    /// Kick operator applied between descents.
    pub perturbation: PerturbationScheme,

    /// Maximum perturb-and-descend iterations.
    pub max_iterations: usize,

    /// Stop after this many consecutive iterations without a new best.
    pub max_no_improve: usize,

    /// RNG seed; `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for IlsParams {
    fn default() -> Self {
        Self {
            perturbation: PerturbationScheme::default(),
            max_iterations: 200,
            max_no_improve: 50,
            seed: None,
        }
    }
}

impl IlsParams {
    pub fn with_perturbation(mut self, scheme: PerturbationScheme) -> Self {
        self.perturbation = scheme;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.max_no_improve == 0 {
            return Err("max_no_improve must be at least 1".into());
        }
        Ok(())
    }
}

/// Which heuristic drives the search, with its parameters.
#[derive(Debug, Clone)]
pub enum Strategy {
    SimulatedAnnealing(SaParams),
    IteratedLocalSearch(IlsParams),
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::SimulatedAnnealing(_) => "simulated-annealing",
            Strategy::IteratedLocalSearch(_) => "iterated-local-search",
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            Strategy::SimulatedAnnealing(params) => params.validate(),
            Strategy::IteratedLocalSearch(params) => params.validate(),
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::SimulatedAnnealing(SaParams::default())
    }
}
