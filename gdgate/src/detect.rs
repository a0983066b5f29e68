//! Source language detection for callers that leave the source empty

use whatlang::Lang;

/// Upper-case ISO 639-1 code of the detected language, or `""` when the
/// text is too short to call or the language has no two-letter code here
pub fn detect_source_lang(text: &str) -> String {
    whatlang::detect_lang(text)
        .and_then(iso_639_1)
        .map(str::to_string)
        .unwrap_or_default()
}

fn iso_639_1(lang: Lang) -> Option<&'static str> {
    let code = match lang {
        Lang::Ara => "AR",
        Lang::Bul => "BG",
        Lang::Ces => "CS",
        Lang::Cmn => "ZH",
        Lang::Dan => "DA",
        Lang::Deu => "DE",
        Lang::Ell => "EL",
        Lang::Eng => "EN",
        Lang::Est => "ET",
        Lang::Fin => "FI",
        Lang::Fra => "FR",
        Lang::Hun => "HU",
        Lang::Ind => "ID",
        Lang::Ita => "IT",
        Lang::Jpn => "JA",
        Lang::Kor => "KO",
        Lang::Lav => "LV",
        Lang::Lit => "LT",
        Lang::Nld => "NL",
        Lang::Nob => "NB",
        Lang::Pol => "PL",
        Lang::Por => "PT",
        Lang::Ron => "RO",
        Lang::Rus => "RU",
        Lang::Slk => "SK",
        Lang::Slv => "SL",
        Lang::Spa => "ES",
        Lang::Swe => "SV",
        Lang::Tur => "TR",
        Lang::Ukr => "UK",
        _ => return None,
    };
    Some(code)
}
