use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Sender label for score reports.
pub const SCORES_SENDER: &str = "Scores";
/// Sender label for new puzzle announcements.
pub const PUZZLE_SENDER: &str = "SusieDent";
/// Sender label for hint announcements.
pub const HINT_SENDER: &str = "SusieDentsAssistantThatGivesHints";
/// Body that replaces a correct guess before it is relayed.
pub const CORRECT_GUESS: &str = "Guessed correctly";

/// Every sender label the server uses for its own announcements.
pub const RESERVED_SENDERS: [&str; 3] = [SCORES_SENDER, PUZZLE_SENDER, HINT_SENDER];

/// Mapping of participant identity to correct-guess count.
pub type Scores = BTreeMap<String, u32>;

/// The single message shape exchanged in both directions.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub username: String,
    pub message: String,
}

impl Message {
    /// Builds a message from any sender, participant or system.
    pub fn new(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            message: message.into(),
        }
    }

    /// Score report carrying the standings as an embedded JSON object.
    pub fn scores(scores: &Scores) -> Self {
        Self::new(SCORES_SENDER, encode_scores(scores))
    }

    /// Announcement of a puzzle's scrambled word.
    pub fn puzzle(puzzle: &Puzzle) -> Self {
        Self::new(PUZZLE_SENDER, puzzle.scrambled.clone())
    }

    /// Announcement of a puzzle's hint.
    pub fn hint(puzzle: &Puzzle) -> Self {
        Self::new(HINT_SENDER, puzzle.hint.clone())
    }

    /// True when the sender is one of the server's own announcers.
    pub fn is_system(&self) -> bool {
        RESERVED_SENDERS.contains(&self.username.as_str())
    }
}

/// Renders a score report body. Keys come out sorted.
pub fn encode_scores(scores: &Scores) -> String {
    serde_json::to_string(scores).unwrap_or_default()
}

/// Parses a score report body back into standings.
pub fn decode_scores(body: &str) -> Result<Scores, serde_json::Error> {
    serde_json::from_str(body)
}

#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("puzzle set is empty")]
    Empty,
    #[error("puzzle {index}: answer is empty")]
    EmptyAnswer { index: usize },
    #[error("puzzle {index}: answer {answer:?} is not upper-case alphabetic")]
    InvalidAnswer { index: usize, answer: String },
    #[error("puzzle {index}: {scrambled:?} is not an anagram of {answer:?}")]
    NotAnAnagram {
        index: usize,
        answer: String,
        scrambled: String,
    },
    #[error("malformed puzzle catalogue: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read puzzle catalogue: {0}")]
    Io(#[from] std::io::Error),
}

/// A scrambled word, its answer and a clue.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub answer: String,
    pub scrambled: String,
    pub hint: String,
}

impl Puzzle {
    /// Builds an unchecked puzzle. Validation happens when it joins a
    /// [`PuzzleSet`].
    pub fn new(
        answer: impl Into<String>,
        scrambled: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            answer: answer.into(),
            scrambled: scrambled.into(),
            hint: hint.into(),
        }
    }

    /// Case-normalised exact comparison against the answer. Only ASCII
    /// letters are folded, matching the upper-case ASCII answers.
    pub fn is_solved_by(&self, guess: &str) -> bool {
        guess.to_ascii_uppercase() == self.answer
    }

    fn validate(&self, index: usize) -> Result<(), PuzzleError> {
        if self.answer.is_empty() {
            return Err(PuzzleError::EmptyAnswer { index });
        }
        if !self.answer.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(PuzzleError::InvalidAnswer {
                index,
                answer: self.answer.clone(),
            });
        }
        if !is_anagram(&self.answer, &self.scrambled) {
            return Err(PuzzleError::NotAnAnagram {
                index,
                answer: self.answer.clone(),
                scrambled: self.scrambled.clone(),
            });
        }
        Ok(())
    }
}

/// Same multiset of characters.
pub fn is_anagram(a: &str, b: &str) -> bool {
    let mut left: Vec<char> = a.chars().collect();
    let mut right: Vec<char> = b.chars().collect();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

/// Immutable, validated, non-empty puzzle catalogue.
#[derive(Debug, Clone)]
pub struct PuzzleSet {
    puzzles: Vec<Puzzle>,
}

impl PuzzleSet {
    /// Validates every puzzle and rejects an empty catalogue. Errors name
    /// the index of the first bad entry.
    pub fn new(puzzles: Vec<Puzzle>) -> Result<Self, PuzzleError> {
        if puzzles.is_empty() {
            return Err(PuzzleError::Empty);
        }
        for (index, puzzle) in puzzles.iter().enumerate() {
            puzzle.validate(index)?;
        }
        Ok(Self { puzzles })
    }

    /// Parses a JSON array of `{answer, scrambled, hint}` objects.
    pub fn from_json(json: &str) -> Result<Self, PuzzleError> {
        let puzzles: Vec<Puzzle> = serde_json::from_str(json)?;
        Self::new(puzzles)
    }

    /// Reads and parses a catalogue file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PuzzleError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Uniform pick; repeats across calls are allowed.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> &Puzzle {
        &self.puzzles[rng.gen_range(0..self.puzzles.len())]
    }

    /// Whether `puzzle` is one of the catalogue's entries.
    pub fn contains(&self, puzzle: &Puzzle) -> bool {
        self.puzzles.contains(puzzle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Puzzle> {
        self.puzzles.iter()
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}

impl Default for PuzzleSet {
    fn default() -> Self {
        let puzzles = BUILTIN
            .iter()
            .map(|(answer, scrambled, hint)| Puzzle::new(*answer, *scrambled, *hint))
            .collect();
        Self { puzzles }
    }
}

const BUILTIN: [(&str, &str, &str); 20] = [
    ("GRAPPLING", "PIGGAPNLR", "Struggle without weapons"),
    ("MOMENTARY", "TYRMANOME", "Over in a jiffy"),
    ("HALLMARKS", "SLRMKHAAL", "Certify that purity"),
    ("HANDIWORK", "RAIWDHOKN", "Wowee - you made that?"),
    ("EVERGREEN", "VEEEGERRN", "Leafy boys"),
    ("DIGNITIES", "IENIDISTG", "Self respect"),
    ("ECOSYSTEM", "ESSEOTMCY", "Interconnected system"),
    ("INHIBITED", "NTIIBDHIE", "hold back"),
    ("MUDDINESS", "DEIUSDNSM", "Sloppy wet earthiness"),
    ("SLINGSHOT", "TNHGLSISO", "Forked stick + elastic"),
    ("DISCOUNTS", "CDTNOUSIS", "Reductions"),
    ("ANXIETIES", "EIASENXTI", "feelings of worry"),
    ("OVERDRAFT", "FODATRRVE", "Deficit"),
    ("SPECTACLE", "AECLESCPT", "Striking performance"),
    ("DAYDREAMS", "MYRSDADAE", "Pleasant thoughts"),
    ("SOLICITOR", "TLROCOISI", "Legal professional"),
    ("HARROWING", "IOGWRRNHA", "Disturbing"),
    ("INTERVIEW", "NEWVERTII", "meeting"),
    ("ASHAMEDLY", "LADEYMSHA", "Feeling disgrace"),
    ("CREATURES", "TEEUARCRS", "Animals"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cat() -> Puzzle {
        Puzzle::new("CAT", "TAC", "Pet")
    }

    #[test]
    fn test_builtin_catalogue_is_valid() {
        let set = PuzzleSet::default();
        assert_eq!(set.len(), 20);

        let puzzles: Vec<Puzzle> = set.iter().cloned().collect();
        assert!(PuzzleSet::new(puzzles).is_ok());

        for puzzle in set.iter() {
            assert!(is_anagram(&puzzle.answer, &puzzle.scrambled));
            assert!(puzzle.answer.chars().all(|c| c.is_ascii_uppercase()));
            assert!(!puzzle.hint.is_empty());
        }
    }

    #[test]
    fn test_rejects_empty_set() {
        assert!(matches!(PuzzleSet::new(vec![]), Err(PuzzleError::Empty)));
    }

    #[test]
    fn test_rejects_bad_puzzles() {
        let empty = Puzzle::new("", "", "nothing");
        assert!(matches!(
            PuzzleSet::new(vec![cat(), empty]),
            Err(PuzzleError::EmptyAnswer { index: 1 })
        ));

        let lower = Puzzle::new("cat", "tac", "Pet");
        assert!(matches!(
            PuzzleSet::new(vec![lower]),
            Err(PuzzleError::InvalidAnswer { index: 0, .. })
        ));

        let wrong = Puzzle::new("CAT", "TAT", "Pet");
        assert!(matches!(
            PuzzleSet::new(vec![wrong]),
            Err(PuzzleError::NotAnAnagram { index: 0, .. })
        ));
    }

    #[test]
    fn test_anagram_counts_repeated_letters() {
        assert!(is_anagram("EVERGREEN", "VEEEGERRN"));
        assert!(!is_anagram("EVERGREEN", "VEEGERRNN"));
        assert!(!is_anagram("CAT", "CATS"));
    }

    #[test]
    fn test_guess_is_case_normalised() {
        let puzzle = cat();
        assert!(puzzle.is_solved_by("cat"));
        assert!(puzzle.is_solved_by("CaT"));
        assert!(puzzle.is_solved_by("CAT"));
        assert!(!puzzle.is_solved_by(" cat"));
        assert!(!puzzle.is_solved_by("TAC"));
    }

    #[test]
    fn test_guess_folds_only_ascii_letters() {
        let muddiness = Puzzle::new("MUDDINESS", "DUMSNIDES", "Lack of clarity");
        assert!(muddiness.is_solved_by("muddiness"));
        assert!(!muddiness.is_solved_by("muddine\u{df}"));

        let slingshot = Puzzle::new("SLINGSHOT", "GNOHLSTIS", "Catapult");
        assert!(slingshot.is_solved_by("slingshot"));
        assert!(!slingshot.is_solved_by("\u{17f}lingshot"));
    }

    #[test]
    fn test_choose_returns_member() {
        let set = PuzzleSet::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let puzzle = set.choose(&mut rng);
            assert!(set.contains(puzzle));
        }
    }

    #[test]
    fn test_from_json() {
        let json = r#"[{"answer":"CAT","scrambled":"TAC","hint":"Pet"}]"#;
        let set = PuzzleSet::from_json(json).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&cat()));

        assert!(matches!(
            PuzzleSet::from_json("[{\"answer\":\"CAT\"}]"),
            Err(PuzzleError::Json(_))
        ));
        assert!(matches!(
            PuzzleSet::from_json("[]"),
            Err(PuzzleError::Empty)
        ));
    }

    #[test]
    fn test_wire_field_names() {
        let msg = Message::new("Ann", "cat");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"username":"Ann","message":"cat"}"#);

        let parsed: Message = serde_json::from_str(r#"{"message":"hi","username":"Bob"}"#).unwrap();
        assert_eq!(parsed, Message::new("Bob", "hi"));
    }

    #[test]
    fn test_score_report_is_sorted_json() {
        let mut scores = Scores::new();
        scores.insert("Zed".to_string(), 2);
        scores.insert("Ann".to_string(), 1);

        let msg = Message::scores(&scores);
        assert_eq!(msg.username, SCORES_SENDER);
        assert_eq!(msg.message, r#"{"Ann":1,"Zed":2}"#);
        assert_eq!(decode_scores(&msg.message).unwrap(), scores);

        assert_eq!(encode_scores(&Scores::new()), "{}");
    }

    #[test]
    fn test_system_messages() {
        let puzzle = cat();
        let announce = Message::puzzle(&puzzle);
        let hint = Message::hint(&puzzle);

        assert_eq!(announce, Message::new(PUZZLE_SENDER, "TAC"));
        assert_eq!(hint, Message::new(HINT_SENDER, "Pet"));
        assert!(announce.is_system());
        assert!(hint.is_system());
        assert!(!Message::new("Ann", "cat").is_system());
    }
}
