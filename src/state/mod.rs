//! State Module - the interaction engines
//!
//! Each engine owns its state and exposes it to renderers as signals:
//!
//! - **Section** - active section tracking and scroll-to navigation
//! - **Reveal** - one-shot visibility reveal and staged transitions
//! - **Rotation** - frame-driven dial angle
//! - **Pressure** - governance levers to pressure score, band and gauge
//! - **CountUp** - stat counters that climb after a reveal
//! - **Highlight** - pick-at-most-one interactions (cards, nodes, scenario)
//! - **Navigation** - scrolled bar styling and mobile menu
//!
//! None of the engines read each other's state.

mod count_up;
mod highlight;
mod navigation;
mod pressure;
mod reveal;
mod rotation;
mod section;

pub use count_up::*;
pub use highlight::*;
pub use navigation::*;
pub use pressure::*;
pub use reveal::*;
pub use rotation::*;
pub use section::*;
