//! The request handed to wrapped handlers.

use std::ops::Deref;

use axiom_core::RequestContext;
use axiom_log::Logger;

/// An inbound request with the request-scoped child logger attached.
///
/// Dereferences to the underlying `RequestContext`.
#[derive(Debug, Clone)]
pub struct AxiomRequest {
    request: RequestContext,
    /// Child logger; its events carry the final response status.
    pub log: Logger,
}

impl AxiomRequest {
    pub fn new(request: RequestContext, log: Logger) -> Self {
        Self { request, log }
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn into_parts(self) -> (RequestContext, Logger) {
        (self.request, self.log)
    }
}

impl Deref for AxiomRequest {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axiom_log::MemoryTransport;
    use http::Method;
    use std::sync::Arc;

    #[test]
    fn test_derefs_to_request() {
        let log = Logger::new(Arc::new(MemoryTransport::new()));
        let req = AxiomRequest::new(RequestContext::new(Method::GET, "https://a.test/p"), log);

        assert_eq!(req.pathname(), "/p");
        assert_eq!(req.method, Method::GET);

        req.log.info("inside handler");
        assert_eq!(req.log.pending(), 1);
    }
}
