//! Web framework integration surface.
//!
//! This module is the boundary between an HTTP framework's request
//! lifecycle and the disinfect pipeline. It handles:
//! - Collecting the query, route parameters and body of a request
//! - Carrying the route's override alongside them
//! - Substituting the disinfected values back before handlers run
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: Framework glue fills a `RequestAdapter`
//!    from its own request type and reads the replacements back out.
//!
//! 2. **Explicit Route Settings**: The route override travels with the
//!    adapter. Nothing here reaches into framework-owned route state.
//!
//! 3. **No Shared Mutable State**: The registered `Disinfect` is read-only;
//!    each request owns its adapter.
//!
//! # Example Flow
//!
//! ```ignore
//! // In a framework-specific hook that runs after authentication:
//! let mut adapter = RequestAdapter::from_framework_request(&req);
//! adapter.set_route_override(route_settings_for(&req));
//!
//! disinfect_request(&filter, &mut adapter);
//!
//! req.replace_query(adapter.query().clone());
//! ```

mod adapter;
mod middleware;

pub use adapter::RequestAdapter;
pub use middleware::{disinfect_request, RequestOutcome};
