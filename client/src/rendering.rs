//! Terminal rendering of broadcasts

use shared::{decode_scores, Message, HINT_SENDER, PUZZLE_SENDER, SCORES_SENDER};

/// One display line per message. System senders get their own prefixes;
/// everything else is shown as `name: text`.
pub fn render(message: &Message) -> String {
    if !message.is_system() {
        return format!("{}: {}", message.username, message.message);
    }

    match message.username.as_str() {
        PUZZLE_SENDER => format!("Puzzle: {}", message.message),
        HINT_SENDER => format!("Hint: {}", message.message),
        SCORES_SENDER => match decode_scores(&message.message) {
            Ok(scores) if scores.is_empty() => "Scores: (none yet)".to_string(),
            Ok(scores) => {
                let standings: Vec<String> = scores
                    .iter()
                    .map(|(name, score)| format!("{} {}", name, score))
                    .collect();
                format!("Scores: {}", standings.join(", "))
            }
            // Show a report we cannot parse as-is.
            Err(_) => format!("Scores: {}", message.message),
        },
        _ => format!("[{}] {}", message.username, message.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CORRECT_GUESS;

    #[test]
    fn test_render_puzzle_and_hint() {
        assert_eq!(render(&Message::new(PUZZLE_SENDER, "TAC")), "Puzzle: TAC");
        assert_eq!(render(&Message::new(HINT_SENDER, "Pet")), "Hint: Pet");
    }

    #[test]
    fn test_render_scores() {
        let report = Message::new(SCORES_SENDER, r#"{"Bob":0,"Ann":1}"#);
        assert_eq!(render(&report), "Scores: Ann 1, Bob 0");

        let empty = Message::new(SCORES_SENDER, "{}");
        assert_eq!(render(&empty), "Scores: (none yet)");

        let garbled = Message::new(SCORES_SENDER, "oops");
        assert_eq!(render(&garbled), "Scores: oops");
    }

    #[test]
    fn test_render_participant_lines() {
        assert_eq!(render(&Message::new("Ann", "dog")), "Ann: dog");
        assert_eq!(
            render(&Message::new("Ann", CORRECT_GUESS)),
            "Ann: Guessed correctly"
        );
    }

    #[test]
    fn test_render_lookalike_sender_as_participant() {
        assert_eq!(render(&Message::new("scores", "{}")), "scores: {}");
        assert_eq!(render(&Message::new("Susie", "hi")), "Susie: hi");
    }
}
