//! Material category lookup.

/// Category when nothing else matches.
pub const FALLBACK_CATEGORY: &str = "Other Materials";

/// Category for an id number that is not a number at all (NaN).
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Upper bound (exclusive) of each KBOB id range.
const KBOB_RANGES: &[(f64, &str)] = &[
    (1.0, "Foundation/Excavation"),
    (2.0, "Concrete"),
    (3.0, "Masonry"),
    (4.0, "Mineral/Stone"),
    (5.0, "Mortar/Plaster"),
    (6.0, "Facade/Windows"),
    (7.0, "Metal"),
    (8.0, "Wood"),
    (9.0, "Sealants/Adhesives"),
    (10.0, "Membranes/Foils"),
    (11.0, "Insulation"),
    (12.0, "Flooring"),
    (13.0, "Doors"),
    (14.0, "Plastics/Pipes"),
    (15.0, "Coatings"),
    (21.0, FALLBACK_CATEGORY),
];

const KBOB_LAST_RANGE: &str = "Kitchen/Interior";

/// Lower-case substrings, German and English, checked in table order.
const KEYWORDS: &[(&str, &[&str])] = &[
    ("Insulation", &["dämm", "insulation", "mineralwolle", "wolle"]),
    ("Concrete", &["beton", "concrete"]),
    ("Masonry", &["ziegel", "brick", "mauer", "masonry"]),
    (
        "Metal",
        &["stahl", "steel", "metal", "aluminium", "aluminum", "kupfer", "copper"],
    ),
    ("Wood", &["holz", "wood", "timber"]),
    ("Facade/Windows", &["glas", "glass", "fenster", "window"]),
    (
        "Mortar/Plaster",
        &["mörtel", "putz", "mortar", "plaster", "gips", "gypsum"],
    ),
    ("Mineral/Stone", &["stein", "stone", "mineral"]),
    (
        "Membranes/Foils",
        &["folie", "foil", "membran", "abdichtung", "bitumen"],
    ),
    (
        "Plastics/Pipes",
        &["kunststoff", "plastic", "pvc", "rohr", "pipe"],
    ),
    ("Flooring", &["bodenbelag", "flooring", "parkett", "estrich", "linoleum"]),
    ("Coatings", &["farbe", "paint", "lack", "coating", "beschichtung"]),
];

/// Category for a numeric KBOB id (the leading group of ids like `"06.012"`).
#[must_use]
pub fn kbob_category(id: f64) -> &'static str {
    if id.is_nan() {
        return UNCATEGORIZED;
    }
    KBOB_RANGES
        .iter()
        .find(|(upper, _)| id < *upper)
        .map_or(KBOB_LAST_RANGE, |(_, category)| *category)
}

/// Category for free text by substring match, if any keyword occurs.
#[must_use]
pub fn keyword_category(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
}

/// Category from a classification path (most specific level first), then
/// from the material name, then [`FALLBACK_CATEGORY`].
#[must_use]
pub fn classify(classification: &[String], name: &str) -> &'static str {
    classification
        .iter()
        .rev()
        .find_map(|level| keyword_category(level))
        .or_else(|| keyword_category(name))
        .unwrap_or(FALLBACK_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_in_either_language_share_a_category() {
        let cases = [
            ("Beton C20/25", "Concrete"),
            ("Stahl S235", "Metal"),
            ("Holz Fichte", "Wood"),
            ("Mineralwolle Dämmung", "Insulation"),
            ("Glasscheibe", "Facade/Windows"),
            ("Ziegel", "Masonry"),
            ("Unknown Material", "Other Materials"),
            ("Test Concrete", "Concrete"),
        ];
        for (name, expected) in cases {
            assert_eq!(classify(&[], name), expected, "{name}");
        }
    }

    #[test]
    fn classification_takes_precedence_over_name() {
        let path = vec![
            "Mineralische Baustoffe".to_string(),
            "Beton".to_string(),
            "Transportbeton".to_string(),
        ];
        assert_eq!(classify(&path, "Ziegel-Ersatz"), "Concrete");
    }

    #[test]
    fn kbob_ranges() {
        assert_eq!(kbob_category(0.0), "Foundation/Excavation");
        assert_eq!(kbob_category(1.0), "Concrete");
        assert_eq!(kbob_category(6.5), "Metal");
        assert_eq!(kbob_category(14.99), "Coatings");
        assert_eq!(kbob_category(17.0), "Other Materials");
        assert_eq!(kbob_category(21.0), "Kitchen/Interior");
        assert_eq!(kbob_category(f64::NAN), "Uncategorized");
    }
}
