//! Intent dispatch.
//!
//! The table maps action names to handlers. It is built from
//! [`handler_for`], checked for completeness when constructed and read-only
//! afterwards, so one instance can be shared by every request.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::handlers::{Handler, handler_for};
use crate::intent::Intent;
use crate::response::{Reply, ResponseError};
use crate::webhook::{Conversation, WebhookRequest};

/// Said when the request cannot be fulfilled.
pub const FALLBACK_TEXT: &str = "Sorry, I don't know how to handle that yet.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unrecognized intent '{0}'")]
    UnknownIntent(String),

    #[error("intent '{0}' is registered more than once")]
    DuplicateRoute(Intent),

    #[error("intent '{0}' has no handler")]
    MissingRoute(Intent),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FulfillmentError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("failed to build reply for '{intent}': {source}")]
    Build {
        intent: Intent,
        #[source]
        source: ResponseError,
    },
}

/// An intent together with the handler that fulfills it.
#[derive(Clone, Copy)]
pub struct Route {
    pub intent: Intent,
    pub handler: Handler,
}

impl Route {
    pub fn for_intent(intent: Intent) -> Self {
        Self {
            intent,
            handler: handler_for(intent),
        }
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route").field("intent", &self.intent).finish_non_exhaustive()
    }
}

/// Result of fulfilling one request. `reply` is always sendable; `error`
/// records why it is the fallback, if it is.
#[derive(Debug)]
pub struct Fulfillment {
    pub intent: Option<Intent>,
    pub reply: Reply,
    pub error: Option<FulfillmentError>,
}

impl Fulfillment {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug)]
pub struct DispatchTable {
    routes: HashMap<&'static str, Route>,
}

impl DispatchTable {
    /// Builds the table for the full intent catalog.
    pub fn new() -> Result<Self, DispatchError> {
        Self::from_routes(Intent::ALL.map(Route::for_intent))
    }

    /// Builds a table from explicit routes. Every catalog intent must appear
    /// exactly once.
    pub fn from_routes(routes: impl IntoIterator<Item = Route>) -> Result<Self, DispatchError> {
        let mut table = HashMap::with_capacity(Intent::ALL.len());
        for route in routes {
            if table.insert(route.intent.as_str(), route).is_some() {
                return Err(DispatchError::DuplicateRoute(route.intent));
            }
        }
        if let Some(missing) = Intent::ALL
            .into_iter()
            .find(|intent| !table.contains_key(intent.as_str()))
        {
            return Err(DispatchError::MissingRoute(missing));
        }

        info!(routes = table.len(), "dispatch table ready");
        Ok(Self { routes: table })
    }

    /// Exact, case-sensitive lookup of an action name.
    pub fn resolve(&self, intent_name: &str) -> Result<Route, DispatchError> {
        self.routes
            .get(intent_name)
            .copied()
            .ok_or_else(|| DispatchError::UnknownIntent(intent_name.to_string()))
    }

    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.routes.values().map(|route| route.intent)
    }

    /// Resolves and runs the handler for the conversation's intent.
    pub fn dispatch(&self, conv: &Conversation<'_>) -> Result<(Intent, Reply), FulfillmentError> {
        let route = self.resolve(conv.intent_name())?;
        let reply = (route.handler)(conv).map_err(|source| FulfillmentError::Build {
            intent: route.intent,
            source,
        })?;
        Ok((route.intent, reply))
    }

    /// Runs dispatch and replaces any failure with the fallback reply.
    pub fn fulfill(&self, request: &WebhookRequest) -> Fulfillment {
        match self.dispatch(&Conversation::new(request)) {
            Ok((intent, reply)) => Fulfillment {
                intent: Some(intent),
                reply,
                error: None,
            },
            Err(e) => {
                let intent = match &e {
                    FulfillmentError::Dispatch(_) => {
                        warn!(
                            intent = %request.action(),
                            "no handler for intent, sending fallback"
                        );
                        None
                    }
                    FulfillmentError::Build { intent, source } => {
                        error!(
                            intent = %intent,
                            error = %source,
                            "failed to build reply, sending fallback"
                        );
                        Some(*intent)
                    }
                };
                Fulfillment {
                    intent,
                    reply: fallback_reply(),
                    error: Some(e),
                }
            }
        }
    }
}

/// Reply sent for unknown intents and failed handlers. Keeps the
/// conversation open so the user can try again.
pub fn fallback_reply() -> Reply {
    Reply::ask(FALLBACK_TEXT)
}
