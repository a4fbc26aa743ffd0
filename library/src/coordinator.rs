/*!
Offer/answer negotiation with glare resolution.

Both peers run the same code. When both send an offer at the same time,
their fixed [`Role`]s decide the outcome: the impolite peer ignores the remote offer
and waits for an answer to its own, the polite peer drops its own offer
and answers the remote one.
*/

use std::cell::Cell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use log::{debug, info, warn};
use peer_negotiation_protocol::{IceCandidate, Role, SessionDescription, SignalingMessage};

use crate::channel::SignalingChannel;
use crate::engine::ConnectivityEngine;

/// Transient negotiation flags, they overlap so they aren't a single state enum.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct NegotiationState {
    /// Our own offer is being created, installed and sent
    pub making_offer: bool,
    /// A remote offer collided with ours and was ignored, never cleared afterwards
    pub ignore_offer: bool,
    /// Remote answer is being applied
    pub is_setting_remote_answer_pending: bool,
}

struct CoordinatorInner<E, C> {
    role: Role,
    engine: Rc<E>,
    channel: Rc<C>,
    state: Cell<NegotiationState>,
}

/// Drives one peer's side of a session.
///
/// Engine and channel are shared with whoever created them,
/// the coordinator only calls their operations.
/// This is a pointer to the underlying state and can be cloned freely,
/// each clone operates on the same session.
pub struct NegotiationCoordinator<E, C> {
    inner: Rc<CoordinatorInner<E, C>>,
}

impl<E, C> Clone for NegotiationCoordinator<E, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E, C> Debug for NegotiationCoordinator<E, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NegotiationCoordinator")
            .field("role", &self.inner.role)
            .field("state", &self.inner.state.get())
            .finish_non_exhaustive()
    }
}

impl<E, C> NegotiationCoordinator<E, C>
where
    E: ConnectivityEngine,
    C: SignalingChannel,
{
    #[must_use]
    pub fn new(role: Role, engine: Rc<E>, channel: Rc<C>) -> Self {
        Self {
            inner: Rc::new(CoordinatorInner {
                role,
                engine,
                channel,
                state: Cell::new(NegotiationState::default()),
            }),
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.inner.role
    }

    /// Snapshot of the negotiation flags.
    #[must_use]
    pub fn state(&self) -> NegotiationState {
        self.inner.state.get()
    }

    fn update(&self, change: impl FnOnce(&mut NegotiationState)) {
        let mut state = self.inner.state.get();
        change(&mut state);
        self.inner.state.set(state);
    }

    /// Engine decided a new offer is needed, either for the initial setup or a renegotiation.
    ///
    /// `making_offer` is cleared once the round ends, whether it succeeded or not.
    /// If an offer is already in flight the event is skipped.
    ///
    /// # Errors
    /// Fails if creating or installing the offer fails, or if it can't be sent.
    pub async fn on_negotiation_needed(&self) -> crate::Result<()> {
        if self.state().making_offer {
            debug!("offer already in flight, skipping negotiation needed event");
            return Ok(());
        }
        debug!("negotiation needed ({} peer)", self.inner.role);

        self.update(|state| state.making_offer = true);
        let result = self.send_offer().await;
        self.update(|state| state.making_offer = false);
        result
    }

    async fn send_offer(&self) -> crate::Result<()> {
        let offer = self.inner.engine.create_offer().await?;
        self.inner
            .engine
            .set_local_description(offer.clone())
            .await?;
        self.inner.channel.send(&SignalingMessage::from(offer))?;
        debug!("sent an offer successfully");
        Ok(())
    }

    /// Engine discovered a local candidate, `None` marks the end of candidates.
    ///
    /// Candidates without an address are not relayed.
    ///
    /// # Errors
    /// Fails if the candidate can't be sent.
    pub fn on_local_ice_candidate(&self, candidate: Option<IceCandidate>) -> crate::Result<()> {
        let Some(candidate) = candidate else {
            debug!("local candidates gathering finished");
            return Ok(());
        };
        if !candidate.has_address() {
            debug!("dropping local candidate without address: {}", candidate.candidate);
            return Ok(());
        }
        debug!("signaled candidate: {:#?}", candidate);
        self.inner
            .channel
            .send(&SignalingMessage::IceCandidate(candidate))?;
        Ok(())
    }

    /// Handle a message relayed from the remote peer.
    ///
    /// # Errors
    /// Fails if an engine operation or sending the answer fails.
    /// Candidate failures caused by an ignored offer are not reported.
    pub async fn on_remote_message(&self, message: SignalingMessage) -> crate::Result<()> {
        match message {
            SignalingMessage::Offer(sdp) => self.handle_offer(sdp).await,
            SignalingMessage::Answer(sdp) => self.handle_answer(sdp).await,
            SignalingMessage::IceCandidate(candidate) => self.handle_candidate(candidate).await,
        }
    }

    async fn handle_offer(&self, sdp: String) -> crate::Result<()> {
        let signaling_state = self.inner.engine.signaling_state();
        let collision = self.state().making_offer || !signaling_state.is_stable();

        if collision && !self.inner.role.is_polite() {
            self.update(|state| state.ignore_offer = true);
            warn!(
                "impolite peer ignoring colliding offer (signaling state: {})",
                signaling_state
            );
            return Ok(());
        }
        if collision {
            info!("polite peer dropping its own offer in favour of the remote one");
        }

        let engine = &self.inner.engine;
        engine
            .set_remote_description(SessionDescription::offer(sdp))
            .await?;
        let answer = engine.create_answer().await?;
        engine.set_local_description(answer.clone()).await?;
        self.inner.channel.send(&SignalingMessage::from(answer))?;
        debug!("received an offer and sent an answer");
        Ok(())
    }

    async fn handle_answer(&self, sdp: String) -> crate::Result<()> {
        self.update(|state| state.is_setting_remote_answer_pending = true);
        let result = self
            .inner
            .engine
            .set_remote_description(SessionDescription::answer(sdp))
            .await;
        self.update(|state| state.is_setting_remote_answer_pending = false);
        result?;
        debug!("received answer from peer and set remote description");
        Ok(())
    }

    async fn handle_candidate(&self, candidate: IceCandidate) -> crate::Result<()> {
        match self.inner.engine.add_remote_candidate(candidate).await {
            Ok(()) => {
                debug!("added remote candidate");
                Ok(())
            }
            Err(err) if self.state().ignore_offer => {
                debug!("candidate of an ignored offer rejected: {}", err);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
