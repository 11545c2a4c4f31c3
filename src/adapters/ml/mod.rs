//! ML control plane adapters.
//!
//! - `HttpControlPlane` - REST calls against the ML and storage services
//! - `MockControlPlane` - Demonstration data, no I/O
//! - `FallbackControlPlane` - Primary backend with mocked data when it is down

mod fallback;
mod http_control_plane;
mod mock_control_plane;

pub use fallback::FallbackControlPlane;
pub use http_control_plane::HttpControlPlane;
pub use mock_control_plane::MockControlPlane;
