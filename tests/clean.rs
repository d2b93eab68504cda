use std::collections::HashMap;

use healthcare_cleaner::{
    api::{session::Session, views::BarChart},
    config::Settings,
    data::{self, Dataset, SUGGESTED_COLUMN, TEXT_COLUMN},
    error::{DatasetError, SessionError},
    nlp::{kb::KnowledgeBase, ConceptExtractor, NO_TERMS_SENTINEL},
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

const NOTES: &str = "ID,TEXT,DIAGNOSIS
r1,Patient has type 2 diabetes mellitus and hypertension.,Diabetes
r2,Patient reports feeling fine.,Healthy
r3,\"Fever, cough and headache since Monday.\",Flu
r4,Wheezing with asthma and shortness of breath.,Asthma
r5,Hypertension noted. History of hypertension and HTN.,Hypertension
";

fn extractor() -> ConceptExtractor {
    ConceptExtractor::from_kb(KnowledgeBase::builtin(), &Settings::default())
}

fn dataset(csv: &str) -> Dataset {
    Dataset::from_csv_bytes(csv.as_bytes().to_vec()).expect("valid csv")
}

fn summaries_by_id(cleaned: &Dataset) -> HashMap<String, String> {
    let ids = cleaned.text_values("ID").expect("ids");
    let summaries = cleaned.text_values(SUGGESTED_COLUMN).expect("summaries");
    ids.into_iter()
        .zip(summaries)
        .map(|(id, s)| (id.to_string(), s.to_string()))
        .collect()
}

#[test]
fn clean_appends_exactly_one_column() {
    let raw = dataset(NOTES);
    let cleaned = data::clean(&raw, &extractor()).expect("clean succeeds");

    assert_eq!(cleaned.row_count(), raw.row_count());
    let mut expected = raw.column_names();
    expected.push(SUGGESTED_COLUMN.to_string());
    assert_eq!(cleaned.column_names(), expected);
    assert_eq!(
        cleaned.text_values(TEXT_COLUMN).expect("text"),
        raw.text_values(TEXT_COLUMN).expect("text")
    );
    assert!(!raw.has_column(SUGGESTED_COLUMN));
}

#[test]
fn summaries_are_sentinel_or_distinct_names() {
    let ex = extractor();
    let raw = dataset(NOTES);
    let cleaned = data::clean(&raw, &ex).expect("clean succeeds");

    let texts = raw.text_values(TEXT_COLUMN).expect("text");
    let summaries = cleaned.text_values(SUGGESTED_COLUMN).expect("summaries");
    for (text, summary) in texts.iter().zip(&summaries) {
        let concepts = ex.concepts(text);
        if concepts.is_empty() {
            assert_eq!(*summary, NO_TERMS_SENTINEL);
            continue;
        }
        assert_eq!(*summary, concepts.join(", "));
        let mut unique = concepts.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), concepts.len());
        assert!(concepts.iter().all(|c| !c.is_empty()));
    }

    let by_id = summaries_by_id(&cleaned);
    assert_eq!(by_id["r2"], NO_TERMS_SENTINEL);
    assert_eq!(by_id["r3"], "Fever, Coughing, Headache");
    assert_eq!(by_id["r5"], "Hypertensive disease");
}

#[test]
fn stored_summary_joins_names_that_contain_commas() {
    let raw = dataset("ID,TEXT\nr1,Type 2 diabetes with poorly controlled diabetes.\n");
    let cleaned = data::clean(&raw, &extractor()).expect("clean succeeds");
    let stored = cleaned.text_values(SUGGESTED_COLUMN).expect("summaries")[0].to_string();

    // Canonical names are joined verbatim, so a name with ", " splits into
    // more pieces than there are concepts and pieces may repeat.
    assert_eq!(
        stored,
        "Diabetes Mellitus, Non-Insulin-Dependent, Diabetes Mellitus"
    );
    let pieces: Vec<&str> = stored.split(", ").collect();
    assert_eq!(
        pieces,
        vec!["Diabetes Mellitus", "Non-Insulin-Dependent", "Diabetes Mellitus"]
    );
    assert!(stored.starts_with("Diabetes Mellitus, Non-Insulin-Dependent"));
    assert!(stored.ends_with(", Diabetes Mellitus"));
}

#[test]
fn late_non_numeric_value_does_not_break_loading() {
    let mut csv = String::from("ID,TEXT\n");
    for id in 0..150 {
        csv.push_str(&format!("{id},fever\n"));
    }
    csv.push_str("A-1,cough\n");

    let raw = dataset(&csv);
    assert_eq!(raw.row_count(), 151);
    let ids = raw.text_values("ID").expect("ids read as text");
    assert_eq!(ids[0], "0");
    assert_eq!(ids[150], "A-1");

    let cleaned = data::clean(&raw, &extractor()).expect("clean succeeds");
    let summaries = cleaned.text_values(SUGGESTED_COLUMN).expect("summaries");
    assert_eq!(summaries[0], "Fever");
    assert_eq!(summaries[150], "Coughing");
}

#[test]
fn missing_text_column_aborts_cleaning() {
    let raw = dataset("ID,NOTE\nr1,fever\n");
    let err = data::clean(&raw, &extractor()).unwrap_err();
    assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == TEXT_COLUMN));
    assert_eq!(raw.column_names(), vec!["ID".to_string(), "NOTE".to_string()]);
}

#[test]
fn null_or_numeric_text_is_fatal() {
    let err = data::clean(&dataset("ID,TEXT\nr1,fever\nr2,\n"), &extractor()).unwrap_err();
    assert!(matches!(err, DatasetError::NullValue { row: 1, .. }));

    let err = data::clean(&dataset("ID,TEXT\nr1,1\nr2,2\n"), &extractor()).unwrap_err();
    assert!(matches!(err, DatasetError::NonTextColumn { .. }));
}

#[test]
fn cleaning_twice_yields_same_summaries() {
    let ex = extractor();
    let once = data::clean(&dataset(NOTES), &ex).expect("first run");
    let twice = data::clean(&once, &ex).expect("second run");

    assert_eq!(twice.column_names(), once.column_names());
    assert_eq!(
        twice.text_values(SUGGESTED_COLUMN).expect("summaries"),
        once.text_values(SUGGESTED_COLUMN).expect("summaries")
    );
}

#[test]
fn row_order_does_not_change_summaries() {
    let ex = extractor();
    let mut lines: Vec<&str> = NOTES.lines().collect();
    let header = lines.remove(0);
    let baseline = summaries_by_id(&data::clean(&dataset(NOTES), &ex).expect("clean"));

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..4 {
        lines.shuffle(&mut rng);
        let shuffled = format!("{header}\n{}\n", lines.join("\n"));
        let cleaned = data::clean(&dataset(&shuffled), &ex).expect("clean");
        assert_eq!(summaries_by_id(&cleaned), baseline);
    }
}

#[test]
fn diagnosis_counts_rank_most_frequent_first() {
    let csv = "TEXT,DIAGNOSIS\na,Flu\nb,Cold\nc,Flu\nd,Cold\ne,Cold\nf,Flu\ng,Cold\nh,Cold\n";
    let counts = dataset(csv)
        .value_counts("DIAGNOSIS")
        .expect("counts")
        .expect("column present");
    assert_eq!(
        counts,
        vec![("Cold".to_string(), 5), ("Flu".to_string(), 3)]
    );

    let chart = BarChart::from_counts(&counts);
    assert_eq!(chart.bars[0].label, "Cold");
    assert!(chart.bars[0].y < chart.bars[1].y);
    assert_eq!(chart.bars[0].width, "480.0");
    assert_eq!(chart.bars[0].colour, "#440154");
    assert_eq!(chart.bars[1].colour, "#fde725");

    assert_eq!(dataset("TEXT\na\n").value_counts("DIAGNOSIS").expect("ok"), None);
}

#[test]
fn cleaned_csv_round_trips() {
    let cleaned = data::clean(&dataset(NOTES), &extractor()).expect("clean");
    let bytes = cleaned.to_csv_bytes().expect("serialise");
    let text = String::from_utf8(bytes.clone()).expect("utf-8");
    assert!(text.starts_with("ID,TEXT,DIAGNOSIS,SUGGESTED_DIAGNOSIS\n"));

    let reloaded = Dataset::from_csv_bytes(bytes).expect("reload");
    assert_eq!(reloaded.row_count(), 5);
    assert_eq!(summaries_by_id(&reloaded), summaries_by_id(&cleaned));
}

#[test]
fn preview_limits_rows_and_selects_columns() {
    let raw = dataset(NOTES);
    let preview = raw.preview(2).expect("preview");
    assert_eq!(preview.rows.len(), 2);
    assert_eq!(preview.columns, raw.column_names());

    let narrow = raw.preview_columns(&["ID", "DIAGNOSIS"], 10).expect("preview");
    assert_eq!(narrow.rows.len(), 5);
    assert_eq!(narrow.rows[0], vec!["r1".to_string(), "Diabetes".to_string()]);
}

#[test]
fn session_moves_forward_and_resets_on_upload() {
    let ex = extractor();
    let mut session = Session::default();
    assert!(matches!(session.clean(&ex), Err(SessionError::NoDataset)));
    assert!(matches!(session.cleaned(), Err(SessionError::NotCleaned)));

    session.upload("broken.csv".into(), dataset("ID\nr1\n"));
    assert!(session.clean(&ex).is_err());
    assert_eq!(session.phase(), "loaded");

    session.upload("notes.csv".into(), dataset(NOTES));
    session.clean(&ex).expect("clean succeeds");
    assert_eq!(session.phase(), "cleaned");
    assert!(session.cleaned().expect("cleaned").has_column(SUGGESTED_COLUMN));

    session.clean(&ex).expect("re-clean from raw");
    assert_eq!(session.phase(), "cleaned");

    session.upload("notes.csv".into(), dataset(NOTES));
    assert_eq!(session.phase(), "loaded");
}
