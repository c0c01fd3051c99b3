use std::future::Future;

use tracing::{debug, info, warn};
use url::Url;

use crate::model::notice::NoticeLevel;
use crate::model::outcome::Outcome;
use crate::model::page::Page;
use crate::model::target::{LikeState, Representation, Resource, TargetId};
use crate::ops::classify::{Reply, classify};
use crate::ops::token::{Token, TokenResolver};

pub const HEADER_TOKEN: &str = "X-CSRFToken";
pub const HEADER_REQUESTED_WITH: &str = "X-Requested-With";
pub const REQUESTED_WITH_XHR: &str = "XMLHttpRequest";
/// Query flag telling the endpoint to answer with JSON instead of a redirect.
pub const AJAX_PARAM: (&str, &str) = ("ajax", "1");

/// Why a like attempt did not settle successfully. Every variant is
/// recovered locally: the control is rolled back and re-enabled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToggleError {
    #[error("Security token missing. Please refresh the page.")]
    TokenNotFound,
    #[error("Please log in to like posts.")]
    AuthRequired,
    #[error("{0}")]
    ServerError(String),
    #[error("Server returned an error page. Please refresh and try again.")]
    MalformedResponse,
    #[error("network error: {0}")]
    Transport(String),
    #[error("invalid like address: {0}")]
    InvalidResource(String),
    #[error("a like request for this post is already in progress")]
    InFlight,
    #[error("no like control at index {0}")]
    UnknownTarget(TargetId),
}

impl ToggleError {
    fn from_outcome(outcome: Outcome) -> Option<Self> {
        match outcome {
            Outcome::Success { .. } => None,
            Outcome::AuthRequired => Some(ToggleError::AuthRequired),
            Outcome::ServerError { message } => Some(ToggleError::ServerError(message)),
            Outcome::MalformedResponse => Some(ToggleError::MalformedResponse),
        }
    }

    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ToggleError::TokenNotFound => self.to_string(),
            _ => format!("Failed to update like: {}", self),
        }
    }
}

/// The network layer failed before a response was available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// One POST to a like endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeRequest {
    pub resource: Resource,
    /// Absolute endpoint including `?ajax=1`
    pub url: Url,
    pub token: Token,
    /// Page the request originates from
    pub referer: Url,
}

/// Sends a like request and hands back the raw reply.
pub trait Transport {
    fn send(
        &self,
        request: LikeRequest,
    ) -> impl Future<Output = Result<Reply, TransportError>> + Send;
}

/// An attempt that passed `begin` and is waiting for its reply.
#[derive(Debug)]
pub struct Pending {
    pub target: TargetId,
    pub request: LikeRequest,
    snapshot: Representation,
    /// State when the attempt began; another settle may change it meanwhile
    state_before: LikeState,
}

/// Drives the like control: disable, discover a token, send once,
/// classify, then apply or roll back.
pub struct ToggleController<T> {
    transport: T,
    resolver: TokenResolver,
}

impl<T> ToggleController<T> {
    pub fn new(transport: T) -> Self {
        Self::with_resolver(transport, TokenResolver::default())
    }

    pub fn with_resolver(transport: T, resolver: TokenResolver) -> Self {
        ToggleController {
            transport,
            resolver,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Capture the current representation, enter the loading state and
    /// prepare the request. On failure the control is already restored.
    pub fn begin(&self, page: &mut Page, id: TargetId) -> Result<Pending, ToggleError> {
        let (snapshot, state_before, resource) = {
            let target = page
                .targets
                .get_mut(id)
                .ok_or(ToggleError::UnknownTarget(id))?;
            if target.in_flight {
                debug!(resource = %target.resource, "like already in flight, rejecting");
                return Err(ToggleError::InFlight);
            }
            let snapshot = target.representation.clone();
            target.disabled = true;
            target.in_flight = true;
            target.representation = Representation::loading(target.state.engaged);
            (snapshot, target.state, target.resource.clone())
        };

        let prepared = self
            .resolver
            .resolve(page)
            .and_then(|token| build_request(page, &resource, token));

        match prepared {
            Ok(request) => {
                debug!(url = %request.url, "like request prepared");
                Ok(Pending {
                    target: id,
                    request,
                    snapshot,
                    state_before,
                })
            }
            Err(err) => {
                warn!(resource = %resource, error = %err, "like aborted before sending");
                let target = &mut page.targets[id];
                target.representation = snapshot;
                target.disabled = false;
                target.in_flight = false;
                page.notify(NoticeLevel::Error, err.user_message());
                Err(err)
            }
        }
    }

    /// Classify the reply and apply it. This is the only exit from an
    /// attempt that reached the network: the control is always re-enabled.
    pub fn settle(
        &self,
        page: &mut Page,
        pending: Pending,
        reply: Result<Reply, TransportError>,
    ) -> Result<LikeState, ToggleError> {
        let result = match reply {
            Ok(reply) => match classify(&reply) {
                Outcome::Success { engaged, count } => Ok(LikeState { engaged, count }),
                other => Err(ToggleError::from_outcome(other).unwrap_or(ToggleError::MalformedResponse)),
            },
            Err(err) => Err(ToggleError::Transport(err.0)),
        };

        let Some(target) = page.targets.get_mut(pending.target) else {
            return Err(ToggleError::UnknownTarget(pending.target));
        };
        target.disabled = false;
        target.in_flight = false;

        match result {
            Ok(state) => {
                let resource = target.resource.clone();
                for other in page.targets.iter_mut().filter(|t| t.resource == resource) {
                    other.state = state;
                    if !other.in_flight {
                        other.representation = Representation::settled(state);
                    }
                }
                let displays = page.counts.publish(&resource, state);
                info!(
                    resource = %resource,
                    liked = state.engaged,
                    count = state.count,
                    displays,
                    "like settled"
                );
                Ok(state)
            }
            Err(err) => {
                warn!(resource = %target.resource, error = %err, "like failed, rolling back");
                target.representation = if target.state == pending.state_before {
                    pending.snapshot
                } else {
                    Representation::settled(target.state)
                };
                page.notify(NoticeLevel::Error, err.user_message());
                Err(err)
            }
        }
    }
}

impl<T: Transport> ToggleController<T> {
    /// Run one complete like attempt against `page.targets[id]`.
    pub async fn activate(&self, page: &mut Page, id: TargetId) -> Result<LikeState, ToggleError> {
        let pending = self.begin(page, id)?;
        let reply = self.transport.send(pending.request.clone()).await;
        self.settle(page, pending, reply)
    }
}

fn build_request(page: &Page, resource: &Resource, token: Token) -> Result<LikeRequest, ToggleError> {
    let referer = page.address.current().clone();
    let mut url = referer
        .join(resource.as_str())
        .map_err(|e| ToggleError::InvalidResource(format!("{}: {}", resource, e)))?;
    // The token and cookies only ever go back to the page's own origin
    if url.origin() != referer.origin() {
        return Err(ToggleError::InvalidResource(format!(
            "{} is not on {}",
            resource,
            referer.origin().ascii_serialization()
        )));
    }
    url.query_pairs_mut().append_pair(AJAX_PARAM.0, AJAX_PARAM.1);
    Ok(LikeRequest {
        resource: resource.clone(),
        url,
        token,
        referer,
    })
}
