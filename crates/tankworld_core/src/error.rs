use thiserror::Error;

/// Engine error taxonomy.
///
/// Domain events (starvation, fold, no mate found) are not errors: they are
/// recorded by the tracker and the tick proceeds. `SimError` covers the
/// cases that must fail before or outside a tick.
#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] anyhow::Error),

    #[error("carrying capacity reached at {population} live fish")]
    CapacityReached { population: usize },

    #[error("snapshot streams diverged at frame {frame}")]
    Divergence { frame: u64 },
}
