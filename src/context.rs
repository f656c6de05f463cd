use std::mem;

use rand::{rngs::StdRng, SeedableRng};

use crate::{fs::FileSystem, network::Network, save::Save, save::SaveStore};

/// Name shown in prompts before anyone logs in.
pub static GUEST: &str = "guest";

/// Something the host has to do on behalf of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Clear the display buffer
    ClearScreen,
    /// End the session and go back to a fresh one
    Logout,
    /// Leave the game
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }

    /// One line of markup, sender coloured like in the chat window.
    pub fn to_markup(&self) -> String {
        let color = match self.sender.as_str() {
            "zer0" => "#FF0000",
            "CR" => "#007C00",
            _ => "$primary",
        };
        format!("[{color}]\u{25cf} {}[/] {}", self.sender, self.text)
    }
}

/// State every command runs against.
///
/// There is one context per session; nothing in the simulation is global.
#[derive(Debug)]
pub struct Context {
    pub network: Network,
    pub saves: SaveStore,
    /// Profile of the logged in player, if any.
    pub player: Option<Save>,
    /// Randomness for games of chance.
    pub rng: StdRng,
    effects: Vec<Effect>,
    messages: Vec<ChatMessage>,
}

impl Context {
    pub fn new(network: Network, saves: SaveStore) -> Self {
        Self {
            network,
            saves,
            player: None,
            rng: StdRng::from_rng(&mut rand::rng()),
            effects: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Replace the random source, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn player_name(&self) -> &str {
        self.player
            .as_ref()
            .map(|save| save.username.as_str())
            .unwrap_or(GUEST)
    }

    /// File system of the device the session is attached to.
    pub fn file_system(&self) -> &FileSystem {
        &self.network.current_device().file_system
    }

    pub fn file_system_mut(&mut self) -> &mut FileSystem {
        &mut self.network.current_device_mut().file_system
    }

    pub fn request(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn post_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub(crate) fn take_effects(&mut self) -> Vec<Effect> {
        mem::take(&mut self.effects)
    }

    pub(crate) fn take_messages(&mut self) -> Vec<ChatMessage> {
        mem::take(&mut self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_until_a_profile_is_loaded() {
        let mut ctx = Context::new(Network::world(), SaveStore::new("unused"));
        assert_eq!(ctx.player_name(), GUEST);

        ctx.player = Some(Save::create("neo", "trinity"));
        assert_eq!(ctx.player_name(), "neo");
    }

    #[test]
    fn effects_are_drained_once() {
        let mut ctx = Context::new(Network::world(), SaveStore::new("unused"));
        ctx.request(Effect::ClearScreen);
        ctx.request(Effect::Quit);

        assert_eq!(ctx.take_effects(), vec![Effect::ClearScreen, Effect::Quit]);
        assert!(ctx.take_effects().is_empty());
    }

    #[test]
    fn chat_markup_colours_known_senders() {
        assert_eq!(
            ChatMessage::new("zer0", "hi").to_markup(),
            "[#FF0000]\u{25cf} zer0[/] hi"
        );
        assert!(ChatMessage::new("someone", "hi")
            .to_markup()
            .starts_with("[$primary]"));
    }
}
