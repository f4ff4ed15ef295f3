pub mod animation;
pub mod audio;
pub mod camera;
pub mod clock;
pub mod constants;
pub mod curve;
pub mod error;
pub mod field;
pub mod params;
pub mod pipeline;
pub mod session;
pub mod viewport;

pub use animation::*;
pub use audio::*;
pub use camera::*;
pub use clock::*;
pub use curve::{Curve, CurveBuilder};
pub use error::Error;
pub use field::*;
pub use params::*;
pub use pipeline::*;
pub use session::*;
pub use viewport::*;
