pub mod inspect;

pub use inspect::{DockerInspector, InspectError, InspectSource};
