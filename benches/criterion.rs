use criterion::{black_box, criterion_group, criterion_main, Criterion};

use spelldict::trie::{parse_dictionary, ParseOptions};
use spelldict::{
    create_collection, create_flag_words_dictionary, create_spelling_dictionary, SearchOptions,
    SpellingDictionary, SpellingDictionaryCollection, SpellingDictionaryOptions, SuggestOptions,
};

/// A few thousand made-up words with a plausible spread of lengths.
fn word_list() -> Vec<String> {
    let syllables = ["ka", "lo", "mir", "ten", "sa", "bru", "ve", "dor", "qui", "an"];
    let mut words = Vec::new();
    for a in syllables {
        for b in syllables {
            words.push(format!("{a}{b}"));
            for c in syllables {
                words.push(format!("{a}{b}{c}"));
                words.push(format!("{a}{b}{c}s"));
            }
        }
    }
    words
}

fn collection(words: &[String]) -> SpellingDictionaryCollection {
    create_collection(
        vec![
            create_spelling_dictionary(
                words,
                "bench",
                "generated",
                &SpellingDictionaryOptions::default(),
            ),
            create_flag_words_dictionary(&["kalomir", "tensa*"], "flags", "generated"),
        ],
        "bench",
        None,
    )
}

fn parse_words(c: &mut Criterion) {
    let words = word_list();

    c.bench_function("parse_words", |b| {
        b.iter(|| parse_dictionary(black_box(&words), &ParseOptions::default()))
    });
}

fn has_words(c: &mut Criterion) {
    let words = word_list();
    let dict = collection(&words);
    let opts = SearchOptions::default();

    c.bench_function("has_known", |b| b.iter(|| dict.has(black_box("brumirten"), &opts)));
    c.bench_function("has_unknown", |b| b.iter(|| dict.has(black_box("brumirtne"), &opts)));
    c.bench_function("has_forbidden", |b| b.iter(|| dict.has(black_box("Kalomir"), &opts)));
}

fn suggest_words(c: &mut Criterion) {
    let words = word_list();
    let dict = collection(&words);

    c.bench_function("suggest_swap", |b| {
        b.iter(|| dict.suggest(black_box("brumitren"), &SuggestOptions::default()))
    });
    c.bench_function("suggest_compound", |b| {
        b.iter(|| dict.suggest(black_box("kalomirtensave"), &SuggestOptions::default()))
    });
}

criterion_group!(benches, parse_words, has_words, suggest_words);
criterion_main!(benches);
