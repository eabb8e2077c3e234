//! Background animations for kosmo.
//!
//! Two independent animations share one canvas: a drifting star field whose
//! nearby stars are joined by fading lines, and a spark trail emitted from
//! the mouse pointer. Both are stepped once per frame by the host loop and
//! owned by a [`Scene`].

mod animations;
mod chars;
mod color;
mod scene;

pub use animations::sparks::{
    GRAVITY, LIFE_STEP, MAX_SPARKS, SPARK_PALETTE, SPAWN_BATCH, Spark, SparkEmitter,
    VELOCITY_DECAY,
};
pub use animations::starfield::{
    DEFAULT_STAR_COUNT, Link, MAX_LINE_OPACITY, Star, StarField, StarFieldOptions,
};
pub use color::{blend, gradient};
pub use scene::{Scene, SceneOptions, SceneView, time_seed};
