//! Alternative spellings of a word to try during lookup and suggestion.

use smallvec::SmallVec;
use unicode_casing::CharExt;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_titlecase::StrTitleCase;

/// An ordered set of word spellings. Most words produce one to three.
pub type WordForms = SmallVec<[String; 4]>;

fn push_unique(forms: &mut WordForms, form: String) {
    if !forms.contains(&form) {
        forms.push(form);
    }
}

pub fn nfc(word: &str) -> String {
    word.nfc().collect()
}

pub fn nfd(word: &str) -> String {
    word.nfd().collect()
}

/// Decompose the word and drop all combining marks.
pub fn strip_accents(word: &str) -> String {
    word.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// True if every letter is an uppercase letter, ignoring combining marks.
/// Titlecase letters such as `ǅ` do not count as uppercase.
pub fn is_upper_case(word: &str) -> bool {
    let mut seen_upper = false;
    for c in word.chars() {
        if is_combining_mark(c) && seen_upper {
            continue;
        }
        if !c.is_uppercase() || c.is_titlecase() {
            return false;
        }
        seen_upper = true;
    }
    seen_upper
}

pub fn uc_first(word: &str) -> String {
    word.to_titlecase()
}

/// The spellings to try when searching for `word`, in order.
///
/// A dictionary without case information only holds lowercase forms, so
/// it is searched with the lowercase and accent-free spellings. A case
/// sensitive dictionary is searched in lowercase when ignoring case, and
/// otherwise with the word as given, its lowercase form, and for all-caps
/// words the capitalized form.
pub fn word_search_forms(
    word: &str,
    is_dictionary_case_sensitive: bool,
    ignore_case: bool,
) -> WordForms {
    let word = nfc(word);
    let lc = word.to_lowercase();
    let mut forms = WordForms::new();
    if !is_dictionary_case_sensitive {
        let stripped = strip_accents(&lc);
        forms.push(lc);
        push_unique(&mut forms, stripped);
    } else if ignore_case {
        forms.push(lc);
    } else {
        let capitalized = is_upper_case(&word).then(|| uc_first(&lc));
        forms.push(word);
        push_unique(&mut forms, lc);
        if let Some(capitalized) = capitalized {
            push_unique(&mut forms, capitalized);
        }
    }
    forms
}

/// The word, its NFC and NFD forms, and whatever `map_word` makes of them.
pub fn outer_word_forms(
    word: &str,
    map_word: impl Fn(&str) -> Vec<String>,
) -> WordForms {
    let mut forms = WordForms::new();
    forms.push(word.to_string());
    push_unique(&mut forms, nfc(word));
    push_unique(&mut forms, nfd(word));
    let base = forms.clone();
    for form in &base {
        for mapped in map_word(form) {
            push_unique(&mut forms, mapped);
        }
    }
    forms
}

/// Spellings to generate suggestions from: the NFC form and its lowercase.
pub fn word_suggest_forms(word: &str) -> WordForms {
    let word = nfc(word);
    let lc = word.to_lowercase();
    let mut forms = WordForms::new();
    forms.push(word);
    push_unique(&mut forms, lc);
    forms
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_strip_accents() {
        assert_eq!("Koln", strip_accents("Köln"));
        assert_eq!("Koln", strip_accents("Ko\u{308}ln"));
        assert_eq!("cafe", strip_accents("café"));
    }

    #[test]
    fn test_is_upper_case() {
        assert!(is_upper_case("HOUSE"));
        assert!(is_upper_case("A\u{301}B"));
        assert!(!is_upper_case("House"));
        assert!(!is_upper_case("HOUSE2"));
        assert!(!is_upper_case(""));
        assert!(!is_upper_case("\u{1c5}"));
    }

    #[test]
    fn test_search_forms_case_insensitive_dict() {
        let forms = word_search_forms("HOUSE", false, true);
        assert_eq!(&["house"], forms.as_slice());
        let forms = word_search_forms("Café", false, false);
        assert_eq!(&["café", "cafe"], forms.as_slice());
    }

    #[test]
    fn test_search_forms_case_sensitive_dict() {
        let forms = word_search_forms("Köln", true, true);
        assert_eq!(&["köln"], forms.as_slice());
        let forms = word_search_forms("KÖLN", true, false);
        assert_eq!(&["KÖLN", "köln", "Köln"], forms.as_slice());
        let forms = word_search_forms("Ko\u{308}ln", true, false);
        assert_eq!(&["Köln", "köln"], forms.as_slice());
        let forms = word_search_forms("köln", true, false);
        assert_eq!(&["köln"], forms.as_slice());
    }

    #[test]
    fn test_outer_word_forms() {
        let forms = outer_word_forms("Köln", |_| Vec::new());
        assert_eq!(&["Köln", "Ko\u{308}ln"], forms.as_slice());
        let forms = outer_word_forms("cafe", |w| vec![w.replace('e', "é")]);
        assert_eq!(&["cafe", "café"], forms.as_slice());
    }

    #[test]
    fn test_suggest_forms() {
        assert_eq!(&["Hous", "hous"], word_suggest_forms("Hous").as_slice());
        assert_eq!(&["hous"], word_suggest_forms("hous").as_slice());
        assert_eq!(&["HOUS", "hous"], word_suggest_forms("HOUS").as_slice());
        assert_eq!(&["h\u{f6}us"], word_suggest_forms("ho\u{308}us").as_slice());
    }

    #[test]
    fn test_uc_first() {
        assert_eq!("House", uc_first("house"));
        assert_eq!("\u{1c5}emal", uc_first("\u{1c6}emal"));
    }
}
