//! Language detection and term-map translation (§4.5 steps 1-2).
//!
//! Grounded in `MultilingualProcessor.language_patterns` /
//! `translation_maps` — a keyword-scoring detector and a literal,
//! case-insensitive term substitution, not a general translator.

use crate::types::Language;

struct LangTerms {
    lang: Language,
    keywords: &'static [&'static str],
    translations: &'static [(&'static str, &'static str)],
}

const LANGUAGES: &[LangTerms] = &[
    LangTerms {
        lang: Language::Es,
        keywords: &[
            "soldadura", "soldador", "electrodo", "arco", "corriente", "voltaje", "necesito",
            "busco", "quiero", "ayuda", "recomendación", "para soldar", "máquina", "equipo",
            "acero", "aluminio", "inoxidable",
        ],
        translations: &[
            ("soldadura", "welding"),
            ("soldador", "welder"),
            ("necesito", "I need"),
            ("busco", "I'm looking for"),
            ("quiero", "I want"),
            ("para soldar", "for welding"),
            ("acero", "steel"),
            ("aluminio", "aluminum"),
            ("inoxidable", "stainless steel"),
            ("máquina", "machine"),
            ("equipo", "equipment"),
        ],
    },
    LangTerms {
        lang: Language::Fr,
        keywords: &[
            "soudage", "soudeur", "électrode", "arc", "courant", "tension", "besoin", "cherche",
            "veux", "aide", "recommandation", "pour souder", "machine", "équipement", "acier",
            "aluminium", "inoxydable",
        ],
        translations: &[
            ("soudage", "welding"),
            ("soudeur", "welder"),
            ("besoin", "need"),
            ("cherche", "looking for"),
            ("veux", "want"),
            ("pour souder", "for welding"),
            ("acier", "steel"),
            ("aluminium", "aluminum"),
            ("inoxydable", "stainless steel"),
            ("équipement", "equipment"),
        ],
    },
    LangTerms {
        lang: Language::De,
        keywords: &[
            "schweißen", "schweißer", "elektrode", "lichtbogen", "strom", "spannung", "brauche",
            "suche", "möchte", "hilfe", "empfehlung", "zum schweißen", "maschine", "ausrüstung",
            "stahl", "aluminium", "rostfrei",
        ],
        translations: &[
            ("schweißen", "welding"),
            ("schweißer", "welder"),
            ("brauche", "need"),
            ("suche", "looking for"),
            ("möchte", "want"),
            ("zum schweißen", "for welding"),
            ("stahl", "steel"),
            ("aluminium", "aluminum"),
            ("rostfrei", "stainless steel"),
            ("maschine", "machine"),
            ("ausrüstung", "equipment"),
        ],
    },
    LangTerms {
        lang: Language::Pt,
        keywords: &[
            "soldagem", "soldador", "eletrodo", "arco", "corrente", "voltagem", "preciso",
            "procuro", "quero", "ajuda", "recomendação", "para soldar", "máquina", "equipamento",
            "aço", "alumínio", "inoxidável",
        ],
        translations: &[
            ("soldagem", "welding"),
            ("soldador", "welder"),
            ("preciso", "I need"),
            ("procuro", "I'm looking for"),
            ("quero", "I want"),
            ("para soldar", "for welding"),
            ("aço", "steel"),
            ("alumínio", "aluminum"),
            ("inoxidável", "stainless steel"),
            ("máquina", "machine"),
            ("equipamento", "equipment"),
        ],
    },
    LangTerms {
        lang: Language::It,
        keywords: &[
            "saldatura", "saldatore", "elettrodo", "arco", "corrente", "tensione", "ho bisogno",
            "cerco", "voglio", "aiuto", "raccomandazione", "per saldare", "macchina",
            "attrezzatura", "acciaio", "alluminio", "inossidabile",
        ],
        translations: &[
            ("saldatura", "welding"),
            ("saldatore", "welder"),
            ("ho bisogno", "I need"),
            ("cerco", "I'm looking for"),
            ("voglio", "I want"),
            ("per saldare", "for welding"),
            ("acciaio", "steel"),
            ("alluminio", "aluminum"),
            ("inossidabile", "stainless steel"),
            ("macchina", "machine"),
            ("attrezzatura", "equipment"),
        ],
    },
];

/// Scores the lowercased query against each supported language's keyword
/// set. Ties and zero matches default to English (§4.5 step 1).
pub fn detect_language(query: &str) -> (Language, f32) {
    let lower = query.to_lowercase();

    let mut best: Option<(Language, usize)> = None;
    let mut total_matches = 0usize;

    for entry in LANGUAGES {
        let score = entry.keywords.iter().filter(|kw| lower.contains(*kw)).count();
        total_matches += score;
        if score > 0 && best.as_ref().map(|(_, best_score)| score > *best_score).unwrap_or(true) {
            best = Some((entry.lang, score));
        }
    }

    match best {
        Some((lang, score)) => {
            let confidence = (score as f32 / total_matches.max(1) as f32).clamp(0.0, 1.0);
            (lang, confidence)
        }
        None => (Language::En, 0.0),
    }
}

/// Applies the literal term map for `lang`, case-insensitively, leaving
/// unmatched tokens untouched (§4.5 step 2).
pub fn translate_to_english(query: &str, lang: Language) -> String {
    apply_term_map(query, lang, false)
}

/// Reverses the direction of the same term map for back-translation (C7).
pub fn translate_from_english(text: &str, lang: Language) -> String {
    apply_term_map(text, lang, true)
}

fn apply_term_map(text: &str, lang: Language, reversed: bool) -> String {
    if lang == Language::En {
        return text.to_string();
    }
    let Some(entry) = LANGUAGES.iter().find(|e| e.lang == lang) else {
        return text.to_string();
    };

    let mut result = text.to_string();
    for (foreign, english) in entry.translations {
        let (from, to) = if reversed { (*english, *foreign) } else { (*foreign, *english) };
        result = replace_case_insensitive(&result, from, to);
    }
    result
}

fn replace_case_insensitive(haystack: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        return haystack.to_string();
    }
    let lower_haystack = haystack.to_lowercase();
    let lower_from = from.to_lowercase();

    let mut result = String::with_capacity(haystack.len());
    let mut cursor = 0;
    while let Some(rel) = lower_haystack[cursor..].find(&lower_from) {
        let start = cursor + rel;
        let end = start + from.len();
        result.push_str(&haystack[cursor..start]);
        result.push_str(to);
        cursor = end;
    }
    result.push_str(&haystack[cursor..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_spanish_from_keywords() {
        let (lang, confidence) = detect_language("necesito soldadura para acero");
        assert_eq!(lang, Language::Es);
        assert!(confidence > 0.0);
    }

    #[test]
    fn defaults_to_english_on_no_match() {
        let (lang, confidence) = detect_language("I need a welder for steel");
        assert_eq!(lang, Language::En);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn translates_known_spanish_terms() {
        let translated = translate_to_english("necesito soldadura para acero", Language::Es);
        assert!(translated.contains("I need"));
        assert!(translated.contains("welding"));
        assert!(translated.contains("steel"));
    }

    #[test]
    fn english_passthrough_is_identity() {
        assert_eq!(translate_to_english("need a MIG welder", Language::En), "need a MIG welder");
    }
}
