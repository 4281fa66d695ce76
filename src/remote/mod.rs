// SPDX-License-Identifier: MPL-2.0
//! Remote control of embedded third-party players.
//!
//! Embedded players live in cross-origin iframes we do not own, and which
//! message schema a given frame understands is not knowable from outside.
//! Each [`RemotePlayerAdapter`] speaks one known schema; [`RemoteControl`]
//! sends every schema to the frame. There is no acknowledgement channel,
//! so delivery failures are logged at trace level and otherwise ignored.

use crate::host::{ElementId, MediaHost};
use crate::media_state::Volume;
use serde_json::{json, Value};

/// A command understood by embedded players.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemoteCommand {
    Play,
    Pause,
    Unmute,
    SetVolume(Volume),
}

/// One message schema for remote-controlling an embedded player.
///
/// Methods return `None` when the schema has no equivalent command.
pub trait RemotePlayerAdapter {
    fn name(&self) -> &'static str;
    fn play(&self) -> Option<Value>;
    fn pause(&self) -> Option<Value>;
    fn unmute(&self) -> Option<Value>;
    fn set_volume(&self, volume: Volume) -> Option<Value>;

    /// Payload for `command`, dispatching to the matching method.
    fn payload(&self, command: RemoteCommand) -> Option<Value> {
        match command {
            RemoteCommand::Play => self.play(),
            RemoteCommand::Pause => self.pause(),
            RemoteCommand::Unmute => self.unmute(),
            RemoteCommand::SetVolume(volume) => self.set_volume(volume),
        }
    }
}

/// YouTube IFrame API: `{event: 'command', func, args}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YouTubeIframeApi;

impl YouTubeIframeApi {
    fn command(func: &str, args: Value) -> Value {
        json!({ "event": "command", "func": func, "args": args })
    }
}

impl RemotePlayerAdapter for YouTubeIframeApi {
    fn name(&self) -> &'static str {
        "youtube-iframe-api"
    }

    fn play(&self) -> Option<Value> {
        Some(Self::command("playVideo", json!([])))
    }

    fn pause(&self) -> Option<Value> {
        Some(Self::command("pauseVideo", json!([])))
    }

    fn unmute(&self) -> Option<Value> {
        Some(Self::command("unMute", json!([])))
    }

    fn set_volume(&self, volume: Volume) -> Option<Value> {
        Some(Self::command("setVolume", json!([volume.percent()])))
    }
}

/// Vimeo-style player API: `{method, value}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodCall;

impl RemotePlayerAdapter for MethodCall {
    fn name(&self) -> &'static str {
        "method-call"
    }

    fn play(&self) -> Option<Value> {
        Some(json!({ "method": "play" }))
    }

    fn pause(&self) -> Option<Value> {
        Some(json!({ "method": "pause" }))
    }

    fn unmute(&self) -> Option<Value> {
        Some(json!({ "method": "setMuted", "value": false }))
    }

    fn set_volume(&self, volume: Volume) -> Option<Value> {
        Some(json!({ "method": "setVolume", "value": volume.value() }))
    }
}

/// TikTok embed player v1: `{type, value, 'x-tiktok-player': true}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TikTokPlayer;

impl TikTokPlayer {
    fn message(kind: &str, value: Value) -> Value {
        json!({ "type": kind, "value": value, "x-tiktok-player": true })
    }
}

impl RemotePlayerAdapter for TikTokPlayer {
    fn name(&self) -> &'static str {
        "tiktok-player"
    }

    fn play(&self) -> Option<Value> {
        Some(Self::message("play", Value::Null))
    }

    fn pause(&self) -> Option<Value> {
        Some(Self::message("pause", Value::Null))
    }

    fn unmute(&self) -> Option<Value> {
        Some(Self::message("unMute", Value::Null))
    }

    fn set_volume(&self, _volume: Volume) -> Option<Value> {
        None
    }
}

/// Bare string commands understood by simple wrappers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BareCommand;

impl RemotePlayerAdapter for BareCommand {
    fn name(&self) -> &'static str {
        "bare-command"
    }

    fn play(&self) -> Option<Value> {
        Some(Value::from("play"))
    }

    fn pause(&self) -> Option<Value> {
        Some(Value::from("pause"))
    }

    fn unmute(&self) -> Option<Value> {
        Some(Value::from("unmute"))
    }

    fn set_volume(&self, _volume: Volume) -> Option<Value> {
        None
    }
}

/// Sends each command in every known schema.
pub struct RemoteControl {
    adapters: Vec<Box<dyn RemotePlayerAdapter>>,
}

impl std::fmt::Debug for RemoteControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.adapters.iter().map(|a| a.name()))
            .finish()
    }
}

impl Default for RemoteControl {
    fn default() -> Self {
        Self::new(vec![
            Box::new(YouTubeIframeApi),
            Box::new(MethodCall),
            Box::new(TikTokPlayer),
            Box::new(BareCommand),
        ])
    }
}

impl RemoteControl {
    #[must_use]
    pub fn new(adapters: Vec<Box<dyn RemotePlayerAdapter>>) -> Self {
        Self { adapters }
    }

    /// Sends `command` through every adapter. Returns how many payloads the
    /// host accepted.
    pub fn send(&self, host: &mut dyn MediaHost, frame: &ElementId, command: RemoteCommand) -> usize {
        let mut delivered = 0;
        for adapter in &self.adapters {
            let Some(payload) = adapter.payload(command) else {
                continue;
            };
            match host.post_message(frame, &payload) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    tracing::trace!(frame = %frame, adapter = adapter.name(), error = %err, "remote command dropped");
                }
            }
        }
        delivered
    }

    /// Best-effort unmute, volume and play, as one pulse attempt.
    pub fn assert_playing(
        &self,
        host: &mut dyn MediaHost,
        frame: &ElementId,
        unmute: bool,
        volume: Volume,
    ) {
        if unmute {
            self.send(host, frame, RemoteCommand::Unmute);
            self.send(host, frame, RemoteCommand::SetVolume(volume));
        }
        self.send(host, frame, RemoteCommand::Play);
    }

    pub fn pause(&self, host: &mut dyn MediaHost, frame: &ElementId) -> usize {
        self.send(host, frame, RemoteCommand::Pause)
    }
}
