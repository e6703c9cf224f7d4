//! The session-authenticated proxy core: route configuration, request and
//! response transforms, the upstream dispatcher, and the generic handler
//! that ties them together.

pub mod handler;
pub mod route;
pub mod transform;
pub mod upstream;

pub use route::{ProxyResource, RouteConfig};
pub use upstream::{Envelope, UpstreamClient};
