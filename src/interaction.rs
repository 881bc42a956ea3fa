//! Answers to interactive components.
//!
//! The only component this bot sends is the `music` genre picker. Picking a
//! genre removes the prompt and posts one of three recommendations, chosen by
//! the wall-clock second. The choice is not random in any real sense.

use chrono::{DateTime, Timelike, Utc};
use tracing::debug;

use crate::{
    action::{Content, ResponseAction},
    command::SELECT_VERSION_ACTION,
    error::RouteError,
    slack::payloads::{InteractionCallback, InteractionType},
};

const RECOMMENDATIONS: &[(&str, [&str; 3])] = &[
    (
        "chill",
        [
            "https://www.youtube.com/watch?v=fCbYoBTIBDU&list=PLN5VowuWXMKbRxDAu3EiftGIRyDR4Ar9v&index=23",
            "https://www.youtube.com/watch?v=DhcIUYHiJDI",
            "https://www.youtube.com/watch?v=ZeIGVnkYX04",
        ],
    ),
    (
        "rock",
        [
            "https://www.youtube.com/watch?v=bs1rRIVBzh0&list=PLN5VowuWXMKaXddkh5NkCRGdoW3mXsCuq&index=10",
            "https://www.youtube.com/watch?v=yXq_KSBmpEI&list=PLN5VowuWXMKaXddkh5NkCRGdoW3mXsCuq&index=13",
            "https://www.youtube.com/watch?v=FAU7NyiqwQY",
        ],
    ),
    (
        "nogizaka46",
        [
            "https://www.youtube.com/watch?v=jEZv7KWhVrU&list=PLUae9wntmJNMvIRkoHL98S462nqZshKmW&index=75",
            "https://www.youtube.com/watch?v=NvitdI9IGTM&list=PLUae9wntmJNMvIRkoHL98S462nqZshKmW&index=124",
            "https://www.youtube.com/watch?v=m-DngT-YioA&list=PLUae9wntmJNMvIRkoHL98S462nqZshKmW&index=40",
        ],
    ),
];

/// The recommendation text for `genre` at wall-clock second `second`.
pub fn recommendation(genre: &str, second: u32) -> Option<String> {
    let (_, links) = RECOMMENDATIONS.iter().find(|(name, _)| *name == genre)?;
    let link = links[(second % 3) as usize];

    Some(format!(
        ":headphones: *{}* <{}|Recommended songs>",
        genre, link
    ))
}

/// Resolves a callback into the actions to run, in order.
///
/// Only the first block action is considered. A genre pick always yields the
/// delete of the original prompt first, then the recommendation.
pub fn resolve(
    callback: &InteractionCallback,
    now: DateTime<Utc>,
) -> Result<Vec<ResponseAction>, RouteError> {
    if callback.kind != InteractionType::BlockActions {
        return Ok(vec![ResponseAction::NoOp]);
    }

    let action = callback.block_actions.first().ok_or(RouteError::NoActions)?;
    if action.block_id != SELECT_VERSION_ACTION {
        debug!(block_id = %action.block_id, "Ignoring action from unknown block");
        return Ok(vec![ResponseAction::NoOp]);
    }

    debug!(
        action_id = %action.action_id,
        user = callback.user.as_ref().map(|u| u.id.as_str()).unwrap_or_default(),
        "Resolving genre selection"
    );

    let mut actions = vec![ResponseAction::DeleteOriginal {
        response_url: callback.response_url.clone(),
    }];

    let genre = action.selected_value();
    match (recommendation(genre, now.second()), &callback.channel) {
        (Some(text), Some(channel)) => actions.push(ResponseAction::PostMessage {
            channel: channel.id.clone(),
            content: Content::Text(text),
        }),
        (None, _) => debug!(genre, "No recommendations for selection"),
        (Some(_), None) => debug!("Interaction has no channel to answer in"),
    }

    Ok(actions)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::slack::payloads::{BlockAction, SelectedOption, SlackChannel};

    const RESPONSE_URL: &str = "https://hooks.slack.com/actions/T1/2/xyz";

    fn callback(block_id: &str, value: &str) -> InteractionCallback {
        InteractionCallback {
            kind: InteractionType::BlockActions,
            block_actions: vec![BlockAction {
                block_id: block_id.to_string(),
                action_id: "a1".to_string(),
                selected_option: Some(SelectedOption {
                    value: value.to_string(),
                }),
            }],
            response_url: RESPONSE_URL.to_string(),
            channel: Some(SlackChannel {
                id: "C456".to_string(),
            }),
            user: None,
        }
    }

    fn at_second(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, second).unwrap()
    }

    #[test]
    fn test_should_delete_then_recommend() {
        let actions = resolve(&callback(SELECT_VERSION_ACTION, "rock"), at_second(3)).unwrap();

        assert_eq!(
            actions,
            vec![
                ResponseAction::DeleteOriginal {
                    response_url: RESPONSE_URL.to_string()
                },
                ResponseAction::PostMessage {
                    channel: "C456".to_string(),
                    content: Content::text(
                        ":headphones: *rock* <https://www.youtube.com/watch?v=bs1rRIVBzh0&list=PLN5VowuWXMKaXddkh5NkCRGdoW3mXsCuq&index=10|Recommended songs>"
                    ),
                },
            ]
        );
    }

    #[test]
    fn test_should_pick_by_second_modulo_three() {
        let first = resolve(&callback(SELECT_VERSION_ACTION, "chill"), at_second(3)).unwrap();
        let again = resolve(&callback(SELECT_VERSION_ACTION, "chill"), at_second(3)).unwrap();
        let same_slot = resolve(&callback(SELECT_VERSION_ACTION, "chill"), at_second(57)).unwrap();
        let next_slot = resolve(&callback(SELECT_VERSION_ACTION, "chill"), at_second(4)).unwrap();

        assert_eq!(first, again);
        assert_eq!(first, same_slot);
        assert_ne!(first, next_slot);
        assert_eq!(
            recommendation("chill", 4).as_deref(),
            Some(":headphones: *chill* <https://www.youtube.com/watch?v=DhcIUYHiJDI|Recommended songs>")
        );
        assert_eq!(
            recommendation("chill", 5).as_deref(),
            Some(":headphones: *chill* <https://www.youtube.com/watch?v=ZeIGVnkYX04|Recommended songs>")
        );
    }

    #[test]
    fn test_should_only_delete_for_unknown_genre() {
        let actions = resolve(&callback(SELECT_VERSION_ACTION, "jazz"), at_second(0)).unwrap();
        assert_eq!(
            actions,
            vec![ResponseAction::DeleteOriginal {
                response_url: RESPONSE_URL.to_string()
            }]
        );
    }

    #[test]
    fn test_should_honour_only_first_action() {
        let mut cb = callback("other-block", "rock");
        cb.block_actions.push(BlockAction {
            block_id: SELECT_VERSION_ACTION.to_string(),
            action_id: "a2".to_string(),
            selected_option: Some(SelectedOption {
                value: "rock".to_string(),
            }),
        });

        assert_eq!(resolve(&cb, at_second(0)).unwrap(), vec![ResponseAction::NoOp]);
    }

    #[test]
    fn test_should_reject_empty_actions() {
        let mut cb = callback(SELECT_VERSION_ACTION, "rock");
        cb.block_actions.clear();

        assert!(matches!(
            resolve(&cb, at_second(0)),
            Err(RouteError::NoActions)
        ));
    }

    #[test]
    fn test_should_ignore_other_interaction_types() {
        let mut cb = callback(SELECT_VERSION_ACTION, "rock");
        cb.kind = InteractionType::Other;
        cb.block_actions.clear();

        assert_eq!(resolve(&cb, at_second(0)).unwrap(), vec![ResponseAction::NoOp]);
    }
}
