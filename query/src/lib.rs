pub mod dsl;
pub mod engine;
pub mod error;
mod exploratory;
mod hybrid;
pub mod planner;
pub mod projector;
mod route;
mod scope;
pub mod score;
mod shortest;
mod weighted;

pub use dsl::{
    HybridOverrides, HybridParams, NavigationFormat, NavigationMode, NavigationOptions,
    NavigationRequest, ValidationError,
};
pub use engine::{NavigationEngine, NavigationResponse, PathOutcome};
pub use error::NavigationError;
pub use planner::{NavigationPlanner, NavigationStrategy};
pub use projector::{EdgeResult, NavigationPath, NodeResult, Projection};
