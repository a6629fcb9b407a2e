const PROFANE: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Masks banned words with `****`. Only whole space-separated words match,
/// so `Sharbert!` is left alone.
pub fn strip_profane(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            if PROFANE.contains(&word.to_lowercase().as_str()) {
                "****"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_banned_words_case_insensitively() {
        assert_eq!(
            strip_profane("This is a Kerfuffle opinion I need to share"),
            "This is a **** opinion I need to share"
        );
    }

    #[test]
    fn ignores_punctuated_words() {
        assert_eq!(strip_profane("what a fornax!"), "what a fornax!");
    }

    #[test]
    fn keeps_spacing() {
        assert_eq!(strip_profane("a  sharbert "), "a  **** ");
    }
}
