//! A single gateway connection
//!
//! Connects, performs the Hello/Identify (or Resume) handshake, then reads
//! frames until the socket ends. Heartbeats run on the same task as the read
//! loop, so a slow handler delays the next beat.

use std::collections::HashSet;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use relay_core::Snowflake;
use tokio::net::TcpStream;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};

use crate::client::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::events::{
    GatewayEventType, GuildCreateEvent, GuildDeleteEvent, GuildMemberRemoveEvent, MemberPayload,
    PresenceUpdateEvent, ReadyEvent,
};
use crate::handlers::{EventHandler, ReadyInfo};
use crate::protocol::{
    CloseCode, GatewayMessage, HelloPayload, IdentifyPayload, OpCode, ResumePayload,
};
use crate::state::GatewayState;

use super::Session;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;
type WsRead = SplitStream<WsStream>;

/// One WebSocket connection to the gateway
pub(crate) struct Connection<'a> {
    config: &'a GatewayConfig,
    state: &'a GatewayState,
    handler: &'a dyn EventHandler,
    session: &'a mut Session,

    /// Whether the last heartbeat was acknowledged
    acked: bool,

    /// READY or RESUMED was received on this connection
    established: bool,

    /// Guilds listed in READY that have not arrived yet
    pending_guilds: HashSet<Snowflake>,

    /// When to stop waiting for `pending_guilds`
    ready_deadline: Option<Instant>,
}

impl<'a> Connection<'a> {
    pub(crate) fn new(
        config: &'a GatewayConfig,
        state: &'a GatewayState,
        handler: &'a dyn EventHandler,
        session: &'a mut Session,
    ) -> Self {
        Self {
            config,
            state,
            handler,
            session,
            acked: true,
            established: false,
            pending_guilds: HashSet::new(),
            ready_deadline: None,
        }
    }

    /// Whether the session got past the handshake
    pub(crate) fn established(&self) -> bool {
        self.established
    }

    /// Run until the connection ends
    ///
    /// `Ok` means the stream ended without a close frame.
    pub(crate) async fn run(&mut self) -> GatewayResult<()> {
        let url = self.session.connect_url(&self.config.url);
        debug!(url = %url, resuming = self.session.resumable().is_some(), "Connecting to gateway");

        let (socket, _) = tokio::time::timeout(
            self.config.connect_timeout,
            tokio_tungstenite::connect_async(url.as_str()),
        )
        .await
        .map_err(|_| GatewayError::ConnectTimeout)??;

        let (mut sink, mut read) = socket.split();

        let hello = self.expect_hello(&mut read).await?;
        let period = Duration::from_millis(hello.heartbeat_interval.max(1));
        let jitter = period.mul_f64(rand::random::<f64>());
        let mut heartbeat = tokio::time::interval_at(Instant::now() + jitter, period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(interval_ms = hello.heartbeat_interval, "Received Hello");

        self.handshake(&mut sink).await?;

        loop {
            let deadline = self.ready_deadline;
            tokio::select! {
                frame = read.next() => {
                    let Some(frame) = frame else {
                        return Ok(());
                    };
                    if let Some(reply) = self.on_frame(frame?).await? {
                        send(&mut sink, &reply).await?;
                    }
                }
                _ = heartbeat.tick() => {
                    if !self.acked {
                        return Err(GatewayError::ZombieConnection);
                    }
                    self.acked = false;
                    send(&mut sink, &GatewayMessage::heartbeat(self.session.last_sequence())).await?;
                    trace!("Heartbeat sent");
                }
                () = wait_until(deadline), if deadline.is_some() => {
                    warn!(missing = self.pending_guilds.len(), "Guild sync timed out, continuing without them");
                    self.emit_ready().await;
                }
            }
        }
    }

    async fn expect_hello(&self, read: &mut WsRead) -> GatewayResult<HelloPayload> {
        loop {
            let frame = tokio::time::timeout(self.config.connect_timeout, read.next())
                .await
                .map_err(|_| GatewayError::ConnectTimeout)?;

            match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    let message = GatewayMessage::from_json(&text)?;
                    return message
                        .as_hello()
                        .ok_or(GatewayError::UnexpectedOpCode(message.op));
                }
                Some(Ok(WsMessage::Close(frame))) => return Err(close_error(frame)),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => {
                    return Err(GatewayError::Closed {
                        code: None,
                        reason: "closed before Hello".to_string(),
                    })
                }
            }
        }
    }

    /// Resume when a session exists, identify otherwise
    async fn handshake(&self, sink: &mut WsSink) -> GatewayResult<()> {
        let message = match self.session.resumable() {
            Some((session_id, seq)) => {
                info!(session_id, seq, "Resuming gateway session");
                GatewayMessage::resume(&ResumePayload {
                    token: self.config.token.clone(),
                    session_id: session_id.to_string(),
                    seq,
                })?
            }
            None => {
                info!(intents = self.config.intents.bits(), "Identifying");
                GatewayMessage::identify(
                    &IdentifyPayload::new(self.config.token.clone())
                        .with_intents(self.config.intents),
                )?
            }
        };
        send(sink, &message).await
    }

    /// Handle one frame; returns a message to send back, if any
    async fn on_frame(&mut self, frame: WsMessage) -> GatewayResult<Option<GatewayMessage>> {
        let text = match frame {
            WsMessage::Text(text) => text,
            WsMessage::Close(frame) => return Err(close_error(frame)),
            _ => return Ok(None),
        };

        let message = match GatewayMessage::from_json(&text) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Dropping undecodable gateway frame");
                return Ok(None);
            }
        };

        match message.op {
            OpCode::Dispatch => {
                if let Some(seq) = message.s {
                    self.session.set_sequence(seq);
                }
                self.dispatch(&message).await;
            }
            OpCode::Heartbeat => {
                debug!("Gateway requested a heartbeat");
                return Ok(Some(GatewayMessage::heartbeat(self.session.last_sequence())));
            }
            OpCode::HeartbeatAck => {
                self.acked = true;
            }
            OpCode::Reconnect => return Err(GatewayError::ReconnectRequested),
            OpCode::InvalidSession => {
                let resumable = message.as_invalid_session().unwrap_or(false);
                return Err(GatewayError::InvalidSession { resumable });
            }
            op => debug!(%op, "Ignoring gateway op"),
        }

        Ok(None)
    }

    async fn dispatch(&mut self, message: &GatewayMessage) {
        let Some(name) = message.event_name() else {
            return;
        };
        let Some(kind) = GatewayEventType::from_str(name) else {
            trace!(event = name, "Ignoring dispatch");
            return;
        };

        if let Err(e) = self.apply(kind, message).await {
            warn!(event = %kind, error = %e, "Failed to decode dispatch");
        }
    }

    async fn apply(
        &mut self,
        kind: GatewayEventType,
        message: &GatewayMessage,
    ) -> Result<(), serde_json::Error> {
        match kind {
            GatewayEventType::Ready => self.on_ready(message.decode()?).await,
            GatewayEventType::Resumed => self.on_resumed().await,
            GatewayEventType::GuildCreate => self.on_guild_create(&message.decode()?).await,
            GatewayEventType::GuildDelete => {
                let event: GuildDeleteEvent = message.decode()?;
                info!(guild_id = %event.id, unavailable = event.unavailable, "Guild removed");
                self.state.cache().remove_guild(event.id);
            }
            GatewayEventType::GuildMemberAdd | GatewayEventType::GuildMemberUpdate => {
                let payload: MemberPayload = message.decode()?;
                let member = payload
                    .guild_id
                    .and_then(|guild_id| payload.to_member(guild_id));
                match member {
                    Some(member) => self.state.cache().upsert_member(member),
                    None => debug!(user_id = %payload.user.id, "Member event without guild or user"),
                }
            }
            GatewayEventType::GuildMemberRemove => {
                let event: GuildMemberRemoveEvent = message.decode()?;
                self.state.cache().remove_member(event.guild_id, event.user.id);
            }
            GatewayEventType::PresenceUpdate => {
                self.on_presence_update(&message.decode()?).await;
            }
        }
        Ok(())
    }

    async fn on_ready(&mut self, event: ReadyEvent) {
        info!(
            session_id = %event.session_id,
            user_id = %event.user.id,
            guilds = event.guilds.len(),
            "Gateway session ready, syncing guilds"
        );

        self.established = true;
        self.state.cache().clear();
        self.session
            .start(event.session_id, event.resume_gateway_url);
        self.pending_guilds = event.guilds.iter().map(|guild| guild.id).collect();

        if self.pending_guilds.is_empty() {
            self.emit_ready().await;
        } else {
            self.ready_deadline = Some(Instant::now() + self.config.ready_timeout);
        }
    }

    async fn on_resumed(&mut self) {
        info!(seq = ?self.session.last_sequence(), "Gateway session resumed");
        self.established = true;
        self.emit_ready().await;
    }

    async fn on_guild_create(&mut self, event: &GuildCreateEvent) {
        if !self.state.cache().add_guild(event) {
            warn!(guild_id = %event.id, "Guild unavailable");
        }
        self.pending_guilds.remove(&event.id);

        if self.ready_deadline.is_some() && self.pending_guilds.is_empty() {
            self.emit_ready().await;
        }
    }

    async fn on_presence_update(&mut self, event: &PresenceUpdateEvent) {
        let Some(guild_id) = event.guild_id else {
            debug!(user_id = %event.user.id, "Presence update without guild");
            return;
        };

        self.state.cache().apply_presence(guild_id, event);
        self.handler
            .on_presence_update(&event.to_presence(guild_id))
            .await;
    }

    /// Mark the gateway ready; the handler hears about it once per session
    async fn emit_ready(&mut self) {
        self.ready_deadline = None;
        let missing_guilds = self.pending_guilds.len();
        self.pending_guilds.clear();
        self.state.set_ready(true);

        if !self.session.mark_ready() {
            return;
        }

        let ready = ReadyInfo {
            session_id: self.session.session_id().unwrap_or_default().to_string(),
            guilds: self.state.cache().guild_count(),
            missing_guilds,
        };
        info!(guilds = ready.guilds, missing = ready.missing_guilds, "Gateway ready");
        self.handler.on_ready(&ready).await;
    }
}

async fn send(sink: &mut WsSink, message: &GatewayMessage) -> GatewayResult<()> {
    sink.send(WsMessage::Text(message.to_json()?.into())).await?;
    Ok(())
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Map a close frame onto the error that ends the connection
fn close_error(frame: Option<CloseFrame<'_>>) -> GatewayError {
    let Some(frame) = frame else {
        return GatewayError::Closed {
            code: None,
            reason: String::new(),
        };
    };

    let code = u16::from(frame.code);
    match CloseCode::from_u16(code) {
        Some(close) if !close.should_reconnect() => GatewayError::FatalClose(close),
        _ => GatewayError::Closed {
            code: Some(code),
            reason: frame.reason.to_string(),
        },
    }
}
