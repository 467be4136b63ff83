//! Lexical normalization: reduces an English word to a canonical base form.
//!
//! This is a fixed rule cascade, not a learned model: an irregular-verb
//! lookup, a modal lookup, then ordered suffix heuristics with minimum-length
//! guards so short words are never over-stripped.

/// Reduces `word` to its canonical base form.
///
/// The cascade is ordered and the first matching rule wins: lowercase,
/// irregular/perfect-tense forms, modal auxiliaries, suffix heuristics,
/// otherwise the lowercased word unchanged. Total and idempotent.
pub fn normalize(word: &str) -> String {
    let word = word.to_lowercase();

    if let Some(base) = irregular_base(&word) {
        return base.to_string();
    }
    if let Some(base) = modal_base(&word) {
        return base.to_string();
    }

    let len = word.chars().count();
    let double_s = word.ends_with("ss");

    // Plural and third-person forms.
    if len > 4 && word.ends_with("ies") {
        return swap_suffix(&word, 3, "y");
    }
    if len > 4 && word.ends_with("ves") {
        return swap_suffix(&word, 3, "f");
    }
    if len > 4 && word.ends_with("es") && !double_s {
        return swap_suffix(&word, 2, "");
    }
    if len > 3 && word.ends_with('s') && !double_s {
        return swap_suffix(&word, 1, "");
    }

    // Progressive, past, and participle forms. "ying" and "ied" run before
    // the bare "ing"/"ed" rules so the y-stem rewrites can ever fire.
    if len > 5 && word.ends_with("ying") {
        return swap_suffix(&word, 4, "ie");
    }
    if len > 4 && word.ends_with("ied") {
        return swap_suffix(&word, 3, "y");
    }
    if len > 5 && word.ends_with("ing") {
        return swap_suffix(&word, 3, "");
    }
    if len > 4 && word.ends_with("ed") {
        return swap_suffix(&word, 2, "");
    }

    word
}

/// Irregular verbs, "to be" forms, and perfect-tense participles.
fn irregular_base(word: &str) -> Option<&'static str> {
    let base = match word {
        "am" | "is" | "are" | "was" | "were" | "been" => "be",
        "has" | "had" => "have",
        "does" | "did" | "done" => "do",
        "goes" | "went" | "gone" => "go",
        "comes" | "came" => "come",
        "becomes" | "became" => "become",
        "felt" => "feel",
        "kept" => "keep",
        "left" => "leave",
        "made" => "make",
        "saw" | "seen" => "see",
        "thought" => "think",
        "took" => "take",
        "told" => "tell",
        "bought" => "buy",
        "caught" => "catch",
        "taught" => "teach",
        "built" => "build",
        "wrote" | "written" => "write",
        "spoke" | "spoken" => "speak",
        "drove" | "driven" => "drive",
        "ate" | "eaten" => "eat",
        "fell" | "fallen" => "fall",
        "gave" | "given" => "give",
        "knew" | "known" => "know",
        "showed" | "shown" => "show",
        "ran" => "run",
        "swam" | "swum" => "swim",
        "sang" | "sung" => "sing",
        "drank" | "drunk" => "drink",
        _ => return None,
    };
    Some(base)
}

/// Modal auxiliaries mapped to their root verb.
fn modal_base(word: &str) -> Option<&'static str> {
    let base = match word {
        "would" => "will",
        "should" => "shall",
        "could" => "can",
        "might" => "may",
        "must" => "must",
        _ => return None,
    };
    Some(base)
}

// Suffixes are ASCII, so byte arithmetic lands on a char boundary.
fn swap_suffix(word: &str, strip: usize, replacement: &str) -> String {
    let mut base = word.to_string();
    base.truncate(word.len() - strip);
    base.push_str(replacement);
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    const IRREGULAR_INPUTS: &[&str] = &[
        "am", "is", "are", "was", "were", "been", "has", "had", "does", "did", "done", "goes",
        "went", "gone", "comes", "came", "becomes", "became", "felt", "kept", "left", "made",
        "saw", "seen", "thought", "took", "told", "bought", "caught", "taught", "built", "wrote",
        "written", "spoke", "spoken", "drove", "driven", "ate", "eaten", "fell", "fallen", "gave",
        "given", "knew", "known", "showed", "shown", "ran", "swam", "swum", "sang", "sung",
        "drank", "drunk",
    ];

    const MODAL_INPUTS: &[&str] = &["would", "should", "could", "might", "must"];

    #[test]
    fn irregular_forms() {
        assert_eq!(normalize("went"), "go");
        assert_eq!(normalize("was"), "be");
        assert_eq!(normalize("been"), "be");
        assert_eq!(normalize("done"), "do");
        assert_eq!(normalize("written"), "write");
        assert_eq!(normalize("taught"), "teach");
    }

    #[test]
    fn modal_forms() {
        assert_eq!(normalize("would"), "will");
        assert_eq!(normalize("should"), "shall");
        assert_eq!(normalize("could"), "can");
        assert_eq!(normalize("might"), "may");
        assert_eq!(normalize("must"), "must");
    }

    #[test]
    fn plural_suffixes() {
        assert_eq!(normalize("stories"), "story");
        assert_eq!(normalize("leaves"), "leaf");
        assert_eq!(normalize("wishes"), "wish");
        assert_eq!(normalize("dogs"), "dog");
        assert_eq!(normalize("users"), "user");
        assert_eq!(normalize("segments"), "segment");
    }

    #[test]
    fn verb_suffixes() {
        assert_eq!(normalize("testing"), "test");
        assert_eq!(normalize("interviewed"), "interview");
        assert_eq!(normalize("walked"), "walk");
        assert_eq!(normalize("feeling"), "feel");
        assert_eq!(normalize("studied"), "study");
        assert_eq!(normalize("studying"), "studie");
    }

    #[test]
    fn length_guards_protect_short_words() {
        assert_eq!(normalize("using"), "using");
        assert_eq!(normalize("red"), "red");
        assert_eq!(normalize("yes"), "yes");
        assert_eq!(normalize("its"), "its");
        assert_eq!(normalize("be"), "be");
    }

    #[test]
    fn double_s_is_never_stripped() {
        assert_eq!(normalize("class"), "class");
        assert_eq!(normalize("less"), "less");
        assert_eq!(normalize("business"), "business");
    }

    #[test]
    fn lowercases_input() {
        assert_eq!(normalize("Interview"), "interview");
        assert_eq!(normalize("WENT"), "go");
    }

    #[test]
    fn total_on_degenerate_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "   ");
        assert_eq!(normalize("123"), "123");
    }

    #[test]
    fn idempotent_over_table_words() {
        let suffix_samples = [
            "stories",
            "leaves",
            "wishes",
            "dogs",
            "studying",
            "studied",
            "testing",
            "walked",
            "interviews",
            "frustrations",
        ];
        for word in IRREGULAR_INPUTS
            .iter()
            .chain(MODAL_INPUTS)
            .chain(suffix_samples.iter())
        {
            let once = normalize(word);
            assert_eq!(normalize(&once), once, "normalize not idempotent for {word}");
        }
    }
}
