//! Concept knowledge base keyed by UMLS concept identifiers.

use std::{io::Read, path::Path};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::info;

use crate::{error::KnowledgeBaseError, nlp::text::normalize_term};

/// Seed concepts as `(cui, canonical name, aliases)`.
const SEED_CONCEPTS: &[(&str, &str, &[&str])] = &[
    (
        "C0011860",
        "Diabetes Mellitus, Non-Insulin-Dependent",
        &[
            "type 2 diabetes mellitus",
            "type 2 diabetes",
            "type ii diabetes",
            "diabetes mellitus type 2",
            "t2dm",
            "niddm",
        ],
    ),
    (
        "C0011854",
        "Diabetes Mellitus, Insulin-Dependent",
        &["type 1 diabetes mellitus", "type 1 diabetes", "t1dm", "iddm"],
    ),
    ("C0011849", "Diabetes Mellitus", &["diabetes", "diabetes mellitus"]),
    (
        "C0020538",
        "Hypertensive disease",
        &["hypertension", "high blood pressure", "htn"],
    ),
    ("C0020649", "Hypotension", &["hypotension", "low blood pressure"]),
    ("C0021400", "Influenza", &["influenza", "flu"]),
    ("C0009443", "Common Cold", &["common cold", "head cold"]),
    ("C0010200", "Coughing", &["cough", "coughing"]),
    ("C0015967", "Fever", &["fever", "pyrexia", "febrile"]),
    ("C0018681", "Headache", &["headache", "cephalalgia"]),
    ("C0027497", "Nausea", &["nausea"]),
    ("C0042963", "Vomiting", &["vomiting", "emesis"]),
    ("C0011991", "Diarrhea", &["diarrhea", "diarrhoea"]),
    ("C0015672", "Fatigue", &["fatigue", "tiredness"]),
    (
        "C0013404",
        "Dyspnea",
        &["dyspnea", "dyspnoea", "shortness of breath", "breathlessness"],
    ),
    ("C0008031", "Chest Pain", &["chest pain"]),
    ("C0004096", "Asthma", &["asthma"]),
    (
        "C0024117",
        "Chronic Obstructive Airway Disease",
        &[
            "chronic obstructive pulmonary disease",
            "chronic obstructive airway disease",
            "copd",
        ],
    ),
    ("C0032285", "Pneumonia", &["pneumonia"]),
    ("C0006277", "Bronchitis", &["bronchitis"]),
    (
        "C0027051",
        "Myocardial Infarction",
        &["myocardial infarction", "heart attack"],
    ),
    (
        "C0018802",
        "Congestive heart failure",
        &["congestive heart failure", "heart failure", "chf"],
    ),
    ("C0004238", "Atrial Fibrillation", &["atrial fibrillation", "afib"]),
    (
        "C0010054",
        "Coronary Arteriosclerosis",
        &["coronary artery disease", "coronary arteriosclerosis", "cad"],
    ),
    (
        "C0038454",
        "Cerebrovascular accident",
        &["stroke", "cerebrovascular accident", "cva"],
    ),
    ("C0002871", "Anemia", &["anemia", "anaemia"]),
    (
        "C0042029",
        "Urinary tract infection",
        &["urinary tract infection", "uti"],
    ),
    (
        "C0017168",
        "Gastroesophageal reflux disease",
        &["gastroesophageal reflux disease", "acid reflux", "gerd"],
    ),
    ("C0003873", "Rheumatoid Arthritis", &["rheumatoid arthritis"]),
    ("C0029408", "Degenerative polyarthritis", &["osteoarthritis"]),
    (
        "C0020443",
        "Hypercholesterolemia",
        &["hypercholesterolemia", "high cholesterol"],
    ),
    ("C0028754", "Obesity", &["obesity", "obese"]),
    ("C0011570", "Mental Depression", &["depression"]),
    ("C0003467", "Anxiety", &["anxiety"]),
    ("C0014544", "Epilepsy", &["epilepsy", "seizure disorder"]),
    ("C0036572", "Seizures", &["seizure", "convulsion"]),
    (
        "C1561643",
        "Chronic Kidney Diseases",
        &["chronic kidney disease", "ckd"],
    ),
    (
        "C0041912",
        "Upper Respiratory Infections",
        &["upper respiratory infection", "upper respiratory tract infection"],
    ),
    ("C1260880", "Rhinorrhea", &["rhinorrhea", "runny nose"]),
    ("C0242429", "Sore Throat", &["sore throat"]),
    ("C0015230", "Exanthema", &["rash", "exanthema"]),
    ("C0020517", "Hypersensitivity", &["allergy", "allergies"]),
    ("C0025598", "Metformin", &["metformin"]),
    ("C0004057", "Aspirin", &["aspirin"]),
    ("C0065374", "Lisinopril", &["lisinopril"]),
    ("C0021641", "Insulin", &["insulin"]),
    ("C0000970", "Acetaminophen", &["acetaminophen", "paracetamol"]),
    ("C0020740", "Ibuprofen", &["ibuprofen"]),
    ("C0002645", "Amoxicillin", &["amoxicillin"]),
    ("C0286651", "atorvastatin", &["atorvastatin"]),
    ("C0006142", "Malignant neoplasm of breast", &["breast cancer"]),
    ("C0242379", "Malignant neoplasm of lung", &["lung cancer"]),
];

/// A concept with its preferred display name and surface aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub cui: String,
    pub canonical_name: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ConceptRow {
    cui: String,
    canonical_name: String,
    #[serde(default)]
    aliases: String,
}

/// In-memory concept table with a normalised alias index.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entities: IndexMap<String, Entity>,
    alias_index: IndexMap<String, Vec<String>>,
}

impl KnowledgeBase {
    /// Knowledge base seeded with common clinical concepts.
    pub fn builtin() -> Self {
        let mut kb = Self::default();
        for (cui, name, aliases) in SEED_CONCEPTS {
            kb.insert(cui, name, aliases.iter().copied());
        }
        kb
    }

    /// Load a concept table from a CSV file with `cui,canonical_name,aliases` headers.
    pub fn from_csv_path(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let origin = path.display().to_string();
        let reader = csv::Reader::from_path(path).map_err(|source| KnowledgeBaseError::Read {
            origin: origin.clone(),
            source,
        })?;
        let kb = Self::from_csv(reader, &origin)?;
        info!(path = %origin, concepts = kb.len(), aliases = kb.alias_count(), "loaded concept table");
        Ok(kb)
    }

    /// Load a concept table from any CSV reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, KnowledgeBaseError> {
        Self::from_csv(csv::Reader::from_reader(reader), "<reader>")
    }

    fn from_csv<R: Read>(
        mut reader: csv::Reader<R>,
        origin: &str,
    ) -> Result<Self, KnowledgeBaseError> {
        let mut kb = Self::default();
        for (idx, result) in reader.deserialize::<ConceptRow>().enumerate() {
            let row = result.map_err(|source| KnowledgeBaseError::Read {
                origin: origin.to_string(),
                source,
            })?;
            // header is line 1
            let line = idx + 2;
            if row.cui.trim().is_empty() {
                return Err(KnowledgeBaseError::EmptyField { row: line, field: "cui" });
            }
            if row.canonical_name.trim().is_empty() {
                return Err(KnowledgeBaseError::EmptyField {
                    row: line,
                    field: "canonical_name",
                });
            }
            kb.insert(
                row.cui.trim(),
                row.canonical_name.trim(),
                row.aliases.split('|').map(str::trim).filter(|a| !a.is_empty()),
            );
        }
        if kb.is_empty() {
            return Err(KnowledgeBaseError::Empty);
        }
        Ok(kb)
    }

    /// Add a concept, merging aliases when the identifier is already known.
    pub fn insert<'a, I>(&mut self, cui: &str, canonical_name: &'a str, aliases: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let entity = self
            .entities
            .entry(cui.to_string())
            .or_insert_with(|| Entity {
                cui: cui.to_string(),
                canonical_name: canonical_name.to_string(),
                aliases: Vec::new(),
            });

        for alias in std::iter::once(canonical_name).chain(aliases) {
            let key = normalize_term(alias);
            if key.is_empty() {
                continue;
            }
            if !entity.aliases.contains(&key) {
                entity.aliases.push(key.clone());
            }
            let cuis = self.alias_index.entry(key).or_default();
            if !cuis.iter().any(|c| c == cui) {
                cuis.push(cui.to_string());
            }
        }
    }

    /// Resolve a concept identifier to its entity.
    pub fn entity(&self, cui: &str) -> Option<&Entity> {
        self.entities.get(cui)
    }

    /// Concepts carrying the given alias; the alias is normalised first.
    pub fn cuis_for_alias(&self, alias: &str) -> &[String] {
        self.alias_index
            .get(normalize_term(alias).as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate normalised aliases alongside the concepts that carry them.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.alias_index
            .iter()
            .map(|(alias, cuis)| (alias.as_str(), cuis.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.alias_index.len()
    }
}
