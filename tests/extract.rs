use healthcare_cleaner::{
    config::Settings,
    nlp::{
        abbrev::AbbreviationDetector,
        kb::KnowledgeBase,
        linker::{AliasLinker, Linker},
        ner::{DictionaryNer, Ner},
        ConceptExtractor, NO_TERMS_SENTINEL,
    },
};

fn extractor() -> ConceptExtractor {
    ConceptExtractor::from_kb(KnowledgeBase::builtin(), &Settings::default())
}

#[test]
fn diabetes_and_hypertension_are_linked() {
    let concepts = extractor().concepts("Patient has type 2 diabetes mellitus and hypertension.");
    assert_eq!(
        concepts,
        vec![
            "Diabetes Mellitus, Non-Insulin-Dependent".to_string(),
            "Hypertensive disease".to_string(),
        ]
    );
    let summary = extractor().extract("Patient has type 2 diabetes mellitus and hypertension.");
    assert_ne!(summary, NO_TERMS_SENTINEL);
    assert_eq!(
        summary,
        "Diabetes Mellitus, Non-Insulin-Dependent, Hypertensive disease"
    );
}

#[test]
fn benign_note_returns_sentinel() {
    assert_eq!(
        extractor().extract("Patient reports feeling fine."),
        NO_TERMS_SENTINEL
    );
    assert_eq!(extractor().extract(""), NO_TERMS_SENTINEL);
}

#[test]
fn repeated_mentions_collapse_to_one_concept() {
    let concepts = extractor().concepts("Hypertension noted. History of hypertension and HTN.");
    assert_eq!(concepts, vec!["Hypertensive disease".to_string()]);
}

#[test]
fn concepts_follow_first_occurrence() {
    let ex = extractor();
    assert_eq!(
        ex.concepts("Asthma with hypertension."),
        vec!["Asthma".to_string(), "Hypertensive disease".to_string()]
    );
    assert_eq!(
        ex.concepts("Hypertension with asthma."),
        vec!["Hypertensive disease".to_string(), "Asthma".to_string()]
    );
}

#[test]
fn plural_mentions_are_recognised() {
    let concepts = extractor().concepts("Complains of headaches and seizures.");
    assert!(concepts.contains(&"Headache".to_string()));
    assert!(concepts.contains(&"Seizures".to_string()));
}

#[test]
fn recogniser_prefers_longest_alias() {
    let ner = DictionaryNer::from_kb(&KnowledgeBase::builtin());
    let spans = ner.extract("Known type 2 diabetes mellitus.");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text, "type 2 diabetes mellitus");
    assert_eq!(spans[0].start, 6);
}

#[test]
fn linker_ranks_exact_then_fuzzy() {
    let linker = AliasLinker::new(KnowledgeBase::builtin(), 0.85, 5);

    let exact = linker.candidates("High Blood-Pressure");
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].cui, "C0020538");
    assert_eq!(exact[0].score, 1.0);

    let fuzzy = linker.candidates("hypertensoin");
    assert_eq!(fuzzy[0].cui, "C0020538");
    assert!(fuzzy[0].score < 1.0);

    assert!(linker.candidates("xyzzy").is_empty());
    assert!(linker.candidates("   ").is_empty());
}

#[test]
fn linker_respects_candidate_limit() {
    let linker = AliasLinker::new(KnowledgeBase::builtin(), 0.0, 2);
    assert_eq!(linker.candidates("zzzz").len(), 2);
}

#[test]
fn abbreviation_long_form_is_recovered() {
    let found = AbbreviationDetector
        .detect("History of chronic obstructive pulmonary disease (COPD). Seen in 2019 (see notes).");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].short_form, "COPD");
    assert_eq!(found[0].long_form, "chronic obstructive pulmonary disease");
}

#[test]
fn abbreviation_occurrences_link_through_long_form() {
    let table = "cui,canonical_name,aliases\n\
                 C0024117,Chronic Obstructive Airway Disease,chronic obstructive pulmonary disease\n";
    let text = "History of chronic obstructive pulmonary disease (COPD). COPD exacerbation last winter.";

    let kb = KnowledgeBase::from_reader(table.as_bytes()).expect("valid table");
    let with = ConceptExtractor::from_kb(kb.clone(), &Settings::default());
    let mentions = with.mentions(text);
    assert_eq!(mentions.len(), 3);
    assert!(mentions[1..]
        .iter()
        .all(|m| m.span.text == "COPD" && m.query == "chronic obstructive pulmonary disease"));
    assert_eq!(
        with.concepts(text),
        vec!["Chronic Obstructive Airway Disease".to_string()]
    );

    let settings = Settings {
        resolve_abbreviations: false,
        ..Settings::default()
    };
    let without = ConceptExtractor::from_kb(kb, &settings);
    assert_eq!(without.mentions(text).len(), 1);
}

#[test]
fn knowledge_base_rejects_bad_tables() {
    assert!(KnowledgeBase::from_reader("cui,canonical_name,aliases\n".as_bytes()).is_err());
    assert!(
        KnowledgeBase::from_reader("cui,canonical_name,aliases\n,Fever,pyrexia\n".as_bytes())
            .is_err()
    );

    let kb = KnowledgeBase::from_reader("cui,canonical_name\nC0015967,Fever\n".as_bytes())
        .expect("aliases column is optional");
    assert_eq!(kb.cuis_for_alias("FEVER"), ["C0015967".to_string()]);
    assert_eq!(
        kb.entity("C0015967").map(|e| e.canonical_name.as_str()),
        Some("Fever")
    );
}

#[test]
fn inserting_a_known_concept_merges_aliases() {
    let mut kb = KnowledgeBase::default();
    let name = String::from("Fever");
    let aliases = vec!["pyrexia".to_string(), "Febrile".to_string()];
    kb.insert("C0015967", &name, aliases.iter().map(String::as_str));
    kb.insert("C0015967", "Pyrexia", ["high temperature"]);

    assert_eq!(kb.len(), 1);
    let entity = kb.entity("C0015967").expect("inserted");
    assert_eq!(entity.canonical_name, "Fever");
    assert!(entity.aliases.contains(&"fever".to_string()));
    assert!(entity.aliases.contains(&"high temperature".to_string()));
    assert_eq!(kb.cuis_for_alias("febrile"), ["C0015967".to_string()]);
}
