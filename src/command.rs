//! Mention commands.
//!
//! A mention's text is split on single spaces. The first token is the bot
//! mention itself, the second is the command and the rest are its options.

use std::collections::HashMap;

use serde_json::Value;

use crate::{
    action::{Content, ResponseAction},
    error::RouteError,
    slack::{
        block::{self, SlackBlock, MUSIC_PROMPT},
        payloads::AppMention,
    },
};

/// Block id of the genre picker. Interaction callbacks carrying this id are
/// answers to the `music` prompt.
pub const SELECT_VERSION_ACTION: &str = "select-version";

pub const GENRES: [&str; 3] = ["chill", "rock", "nogizaka46"];
const GENRE_ICON: &str = ":headphones:";
const UNSUPPORTED_CLIENT: &str = "This client is not supported.";
const HELP: &str = "Please type *music* or *ping*";
// Carries a zero-width joiner and variation selector before the last mark.
const REPEAT_REPLY: &str = "*いや同じこと2回ぃぃ\u{200d}\u{fe0f}！*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation<'a> {
    pub command: &'a str,
    pub options: Vec<&'a str>,
}

impl<'a> CommandInvocation<'a> {
    pub fn parse(text: &'a str) -> Result<Self, RouteError> {
        let tokens: Vec<&str> = text.split(' ').collect();
        if tokens.len() < 2 {
            return Err(RouteError::TooFewTokens);
        }

        Ok(Self {
            command: tokens[1],
            options: tokens[2..].to_vec(),
        })
    }
}

struct PingRule {
    matches: fn(&[&str]) -> bool,
    reply: &'static str,
}

/// Replies to `ping` with arguments. Checked in order; the first match wins.
const PING_RULES: &[PingRule] = &[
    PingRule {
        matches: |opts| opts.len() > 1,
        reply: "*いやちょっと多いぃ！*",
    },
    PingRule {
        matches: |opts| opts[0] == "pong",
        reply: "*いやそれ俺が言うやつぅ！*",
    },
    PingRule {
        matches: |opts| opts[0] == "ping",
        reply: REPEAT_REPLY,
    },
    PingRule {
        matches: |_| true,
        reply: "*いや想定外ぃぃ！*",
    },
];

pub fn route(event: &AppMention) -> Result<ResponseAction, RouteError> {
    let invocation = CommandInvocation::parse(&event.text)?;

    let action = match invocation.command {
        "ping" => ping(&event.channel, &invocation.options),
        "music" => music(event)?,
        _ => ResponseAction::PostMessage {
            channel: event.channel.clone(),
            content: Content::blocks(vec![block::section(HELP)]),
        },
    };

    Ok(action)
}

fn ping(channel: &str, options: &[&str]) -> ResponseAction {
    let content = if options.is_empty() {
        Content::text("pong")
    } else {
        let reply = PING_RULES
            .iter()
            .find(|rule| (rule.matches)(options))
            .map(|rule| rule.reply)
            .unwrap_or_default();
        Content::blocks(vec![block::section(reply)])
    };

    ResponseAction::PostMessage {
        channel: channel.to_string(),
        content,
    }
}

fn music(event: &AppMention) -> Result<ResponseAction, RouteError> {
    let options: Vec<Value> = GENRES
        .iter()
        .map(|genre| block::option(genre, GENRE_ICON))
        .collect();

    let mut template: HashMap<&str, String> = HashMap::new();
    template.insert("block_id", SELECT_VERSION_ACTION.to_string());
    template.insert("options", Value::Array(options).to_string());

    let blocks = SlackBlock::new(MUSIC_PROMPT).fill(template).blocks()?;

    Ok(ResponseAction::PostEphemeral {
        channel: event.channel.clone(),
        user: event.user.clone(),
        content: Content::Blocks {
            blocks,
            fallback: Some(UNSUPPORTED_CLIENT.to_string()),
        },
    })
}
