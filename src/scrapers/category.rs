//! Keyword-based category inference.
//!
//! Last-resort fallback when neither the listing markup nor the article page
//! names a category. The table is scanned top to bottom and the first
//! keyword set with a substring hit wins, so earlier rows take precedence
//! when a title mentions two sports.

/// Keyword sets and the category they map to, in priority order.
pub const CATEGORY_KEYWORDS: &[(&[&str], &str)] = &[
    (
        &[
            "liga", "sepak", "pssi", "timnas", "arsenal", "manchester", "barcelona", "real",
            "ronaldo", "messi", "juventus", "chelsea", "mu", "premier", "la liga", "spanyol",
        ],
        "Sepak Bola",
    ),
    (
        &["basket", "nba", "lakers", "celtics", "warriors", "lebron", "heat"],
        "Basket",
    ),
    (&["tenis", "wimbledon", "djokovic", "serena", "nadal"], "Tenis"),
    (&["f1", "verstappen", "hamilton", "alonso", "formula"], "F1"),
    (
        &["mma", "ufc", "conor", "dana white", "tinju", "petarung"],
        "MMA",
    ),
    (
        &["bulu tangkis", "badminton", "thomas", "uber", "ganda"],
        "Bulu Tangkis",
    ),
    (&["motogp", "buriram", "ducati", "marquez"], "MotoGP"),
    (
        &["ragam", "hiburan", "video", "byon", "showbiz", "vidio"],
        "Ragam",
    ),
    (&["news", "berita"], "News"),
];

/// Infer a category from title keywords.
///
/// Returns `None` for an absent title or when no keyword matches.
pub fn infer(title: Option<&str>) -> Option<String> {
    let lowered = title?.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, category)| category.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_football() {
        assert_eq!(
            infer(Some("Messi Cetak 2 Gol saat Paris Menang 3-1 atas Lyon")).as_deref(),
            Some("Sepak Bola")
        );
    }

    #[test]
    fn test_infer_is_case_insensitive() {
        assert_eq!(infer(Some("NBA: LAKERS Menang")).as_deref(), Some("Basket"));
        assert_eq!(infer(Some("Verstappen Juara")).as_deref(), Some("F1"));
        assert_eq!(infer(Some("Marquez Tercepat di Buriram")).as_deref(), Some("MotoGP"));
    }

    #[test]
    fn test_earlier_row_wins_ties() {
        // "lebron" is Basket, "messi" is Sepak Bola; football is listed first.
        assert_eq!(
            infer(Some("LeBron dan Messi Bertemu")).as_deref(),
            Some("Sepak Bola")
        );
    }

    #[test]
    fn test_infer_no_match_or_absent() {
        assert_eq!(infer(Some("Cuaca Cerah Hari Ini")), None);
        assert_eq!(infer(None), None);
        assert_eq!(infer(Some("")), None);
    }

    #[test]
    fn test_infer_is_deterministic() {
        let title = "Djokovic Maju ke Semifinal";
        let first = infer(Some(title));
        for _ in 0..10 {
            assert_eq!(infer(Some(title)), first);
        }
        assert_eq!(first.as_deref(), Some("Tenis"));
    }
}
