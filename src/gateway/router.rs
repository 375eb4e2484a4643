use std::sync::Arc;

use super::dispatcher::Dispatcher;
use super::events::{InboundEvent, ServerEvent};
use super::session::ChatSession;
use crate::presence::PresenceRegistry;

/// Applies client events to the presence registry and fans the results out
/// through the dispatcher.
///
/// The registry lock is only held inside `register_name`/`unregister_name`;
/// every send happens afterwards with the count those calls returned.
pub struct BroadcastRouter {
    presence: Arc<PresenceRegistry>,
    dispatcher: Arc<Dispatcher>,
}

impl BroadcastRouter {
    pub fn new(presence: Arc<PresenceRegistry>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            presence,
            dispatcher,
        }
    }

    pub fn presence(&self) -> &Arc<PresenceRegistry> {
        &self.presence
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn handle(&self, session: &mut ChatSession, event: InboundEvent) {
        let id = session.id();
        match event {
            InboundEvent::AddUser { name } => {
                if !session.mark_named(name.as_str()) {
                    tracing::debug!(session_id = %id, "ignoring repeated add user");
                    return;
                }
                let num_users = self.presence.register_name(&name);
                tracing::info!(session_id = %id, username = %name, num_users, "user joined");

                self.dispatcher.send_to(id, &ServerEvent::Login { num_users });
                self.dispatcher.broadcast_except(
                    id,
                    &ServerEvent::UserJoined {
                        username: name,
                        num_users,
                    },
                );
            }
            InboundEvent::Message { text } => {
                let Some(username) = self.sender_name(session) else {
                    return;
                };
                self.dispatcher.broadcast_except(
                    id,
                    &ServerEvent::NewMessage {
                        username,
                        message: text,
                    },
                );
            }
            InboundEvent::Typing => {
                if let Some(username) = self.sender_name(session) {
                    self.dispatcher
                        .broadcast_except(id, &ServerEvent::Typing { username });
                }
            }
            InboundEvent::StopTyping => {
                if let Some(username) = self.sender_name(session) {
                    self.dispatcher
                        .broadcast_except(id, &ServerEvent::StopTyping { username });
                }
            }
        }
    }

    /// Close `session` and announce its departure if it had joined. Safe to
    /// call more than once.
    pub fn disconnect(&self, session: &mut ChatSession) {
        let id = session.id();
        self.dispatcher.remove_session(id);

        let Some(username) = session.close() else {
            return;
        };
        let num_users = self.presence.unregister_name(&username);
        tracing::info!(session_id = %id, username = %username, num_users, "user left");

        self.dispatcher.broadcast_except(
            id,
            &ServerEvent::UserLeft {
                username,
                num_users,
            },
        );
    }

    fn sender_name(&self, session: &ChatSession) -> Option<String> {
        let name = session.name().map(str::to_string);
        if name.is_none() {
            tracing::debug!(session_id = %session.id(), "dropping event from unnamed session");
        }
        name
    }
}
