use serde::{Deserialize, Serialize};

/// The drill types the engine tracks. The lowercase kebab-case name is
/// the stable key used in persisted state, pool file names, and the
/// progress log.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseType {
    Naming,
    Listening,
    Typing,
    SentenceCompletion,
    Categories,
    Rhyming,
    Synonyms,
    Association,
    ScrambledSentences,
    Speaking,
}

impl std::str::FromStr for ExerciseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "naming" => Ok(Self::Naming),
            "listening" => Ok(Self::Listening),
            "typing" => Ok(Self::Typing),
            "sentence-completion" => Ok(Self::SentenceCompletion),
            "categories" => Ok(Self::Categories),
            "rhyming" => Ok(Self::Rhyming),
            "synonyms" => Ok(Self::Synonyms),
            "association" => Ok(Self::Association),
            "scrambled-sentences" => Ok(Self::ScrambledSentences),
            "speaking" => Ok(Self::Speaking),
            other => Err(format!("unknown exercise type '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_is_kebab_case() {
        assert_eq!(ExerciseType::Naming.to_string(), "naming");
        assert_eq!(
            ExerciseType::SentenceCompletion.to_string(),
            "sentence-completion"
        );
        assert_eq!(
            ExerciseType::ScrambledSentences.to_string(),
            "scrambled-sentences"
        );
    }

    #[test]
    fn test_from_str_roundtrip() {
        for ex in [
            ExerciseType::Naming,
            ExerciseType::Listening,
            ExerciseType::Typing,
            ExerciseType::SentenceCompletion,
            ExerciseType::Categories,
            ExerciseType::Rhyming,
            ExerciseType::Synonyms,
            ExerciseType::Association,
            ExerciseType::ScrambledSentences,
            ExerciseType::Speaking,
        ] {
            let parsed = ExerciseType::from_str(&ex.to_string()).unwrap();
            assert_eq!(parsed, ex);
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            ExerciseType::from_str("Rhyming").unwrap(),
            ExerciseType::Rhyming
        );
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!(ExerciseType::from_str("jumping").is_err());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&ExerciseType::SentenceCompletion).unwrap();
        assert_eq!(json, "\"sentence-completion\"");
        let back: ExerciseType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ExerciseType::SentenceCompletion);
    }
}
