use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Broad field-of-study buckets used to compare programs across languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    ComputerScience,
    Engineering,
    Business,
    Medicine,
    Science,
    Arts,
    Education,
    Law,
    SocialSciences,
    Hospitality,
    Sports,
    Agriculture,
}

impl FieldCategory {
    pub const fn label(self) -> &'static str {
        match self {
            FieldCategory::ComputerScience => "computer science",
            FieldCategory::Engineering => "engineering",
            FieldCategory::Business => "business",
            FieldCategory::Medicine => "medicine",
            FieldCategory::Science => "science",
            FieldCategory::Arts => "arts",
            FieldCategory::Education => "education",
            FieldCategory::Law => "law",
            FieldCategory::SocialSciences => "social sciences",
            FieldCategory::Hospitality => "hospitality",
            FieldCategory::Sports => "sports",
            FieldCategory::Agriculture => "agriculture",
        }
    }
}

/// Checked in order; the first category with a keyword hit wins.
const FIELD_KEYWORDS: &[(FieldCategory, &[&str])] = &[
    (
        FieldCategory::ComputerScience,
        &[
            "computer science",
            "sains komputer",
            "computing",
            "informatik",
            "information technology",
            "teknologi maklumat",
            "sistem maklumat",
            "software",
            "kejuruteraan perisian",
            "data science",
            "sains data",
        ],
    ),
    (
        FieldCategory::Engineering,
        &[
            "engineering",
            "kejuruteraan",
            "civil",
            "awam",
            "mechanical",
            "mekanikal",
            "electrical",
            "elektrik",
            "electronics",
            "elektronik",
            "chemical",
            "kimia",
            "industrial",
            "industri",
            "aerospace",
            "aeroangkasa",
            "biomedical",
            "bioperubatan",
        ],
    ),
    (
        FieldCategory::Business,
        &[
            "business",
            "perniagaan",
            "accounting",
            "perakaunan",
            "finance",
            "kewangan",
            "marketing",
            "pemasaran",
            "management",
            "pengurusan",
            "entrepreneurship",
            "keusahawanan",
            "economics",
            "ekonomi",
            "logistics",
            "logistik",
            "supply chain",
            "rantaian bekalan",
            "perbankan",
            "banking",
            "insurance",
            "insurans",
        ],
    ),
    (
        FieldCategory::Medicine,
        &[
            "medicine",
            "perubatan",
            "medical",
            "pharmacy",
            "farmasi",
            "nursing",
            "kejururawatan",
            "dentistry",
            "pergigian",
            "physiotherapy",
            "fisioterapi",
            "radiography",
            "radiografi",
            "public health",
            "kesihatan awam",
            "nutrition",
            "pemakanan",
            "dietetik",
            "optometry",
            "optometri",
            "allied health",
            "kesihatan sekutu",
        ],
    ),
    (
        FieldCategory::Science,
        &[
            "science",
            "sains",
            "biology",
            "biologi",
            "chemistry",
            "physics",
            "fizik",
            "mathematics",
            "matematik",
            "statistics",
            "statistik",
            "actuarial",
            "aktuari",
            "geology",
            "geologi",
            "environmental",
            "alam sekitar",
            "biotechnology",
            "bioteknologi",
        ],
    ),
    (
        FieldCategory::Arts,
        &[
            "arts",
            "sastera",
            "design",
            "reka bentuk",
            "graphic",
            "grafik",
            "animation",
            "animasi",
            "architecture",
            "seni bina",
            "interior",
            "dalaman",
            "urban planning",
            "perancangan bandar",
            "quantity surveying",
            "ukur bahan",
        ],
    ),
    (
        FieldCategory::Education,
        &[
            "education",
            "pendidikan",
            "teaching",
            "pengajaran",
            "early childhood",
            "awal kanak kanak",
        ],
    ),
    (FieldCategory::Law, &["law", "undang undang", "legal"]),
    (
        FieldCategory::SocialSciences,
        &[
            "psychology",
            "psikologi",
            "counseling",
            "kaunseling",
            "communication",
            "komunikasi",
            "journalism",
            "kewartawanan",
            "public relations",
            "perhubungan awam",
            "political",
            "politik",
            "sociology",
            "sosiologi",
            "history",
            "sejarah",
            "geography",
            "geografi",
            "international relations",
            "hubungan antarabangsa",
            "social work",
            "kerja sosial",
        ],
    ),
    (
        FieldCategory::Hospitality,
        &[
            "hospitality",
            "hospitaliti",
            "tourism",
            "pelancongan",
            "event management",
            "pengurusan acara",
        ],
    ),
    (
        FieldCategory::Sports,
        &[
            "sports",
            "sukan",
            "sports science",
            "sains sukan",
            "sports management",
            "pengurusan sukan",
        ],
    ),
    (
        FieldCategory::Agriculture,
        &[
            "agriculture",
            "pertanian",
            "forestry",
            "perhutanan",
            "fisheries",
            "perikanan",
            "food science",
            "sains makanan",
        ],
    ),
];

/// Qualification and filler words that say nothing about the field itself.
const QUALIFICATION_WORDS: &[&str] = &[
    "diploma",
    "sarjana",
    "ijazah",
    "bachelor",
    "degree",
    "foundation",
    "asas",
    "program",
    "programme",
    "programs",
    "courses",
    "course",
    "bidang",
    "pengajian",
    "kepujian",
    "hons",
];

/// Lowercase, strip punctuation and qualification words, collapse whitespace.
pub(crate) fn normalize_study_text(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let spaced: String = lowered
        .chars()
        .map(|ch| {
            if ch.is_ascii_lowercase() || ch == '&' || ch.is_whitespace() {
                ch
            } else {
                ' '
            }
        })
        .collect();

    let mut kept = Vec::new();
    let mut words = spaced.split_whitespace().peekable();
    while let Some(word) = words.next() {
        // "muda" only qualifies as part of "sarjana muda"
        if word == "sarjana" && words.peek() == Some(&"muda") {
            words.next();
            continue;
        }
        if !QUALIFICATION_WORDS.contains(&word) {
            kept.push(word);
        }
    }
    kept.join(" ")
}

/// Field category for free text in English or Malay.
pub fn field_category_of(value: &str) -> Option<FieldCategory> {
    let cleaned = normalize_study_text(value);
    if cleaned.is_empty() {
        return None;
    }

    FIELD_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| cleaned.contains(keyword)))
        .map(|(category, _)| *category)
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("translation service unavailable: {0}")]
    Unavailable(String),
}

/// Renders program names in English and buckets them into field categories.
pub trait CourseTranslator: Send + Sync {
    fn translate(&self, text: &str) -> Result<String, TranslationError>;
    fn map_to_field_category(&self, text: &str) -> Option<FieldCategory>;
}

/// Leaves text untouched and never assigns a category.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTranslator;

impl CourseTranslator for NoopTranslator {
    fn translate(&self, text: &str) -> Result<String, TranslationError> {
        Ok(text.to_string())
    }

    fn map_to_field_category(&self, _text: &str) -> Option<FieldCategory> {
        None
    }
}

/// Phrase-glossary translator for Malay programme names.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlossaryTranslator;

const MAX_PHRASE_WORDS: usize = 3;

static MALAY_GLOSSARY: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn malay_glossary() -> &'static HashMap<&'static str, &'static str> {
    MALAY_GLOSSARY.get_or_init(|| {
        const PHRASES: &[(&str, &str)] = &[
            // Qualifications
            ("ijazah sarjana muda", "Bachelor of"),
            ("sarjana muda", "Bachelor of"),
            ("ijazah sarjana", "Master of"),
            ("ijazah kedoktoran", "Doctor of Philosophy in"),
            ("diploma", "Diploma in"),
            ("asasi", "Foundation in"),
            ("dengan kepujian", "with Honours"),
            ("kepujian", "Honours"),
            ("dan", "and"),
            // Computing
            ("sains komputer", "Computer Science"),
            ("teknologi maklumat", "Information Technology"),
            ("sistem maklumat", "Information Systems"),
            ("kejuruteraan perisian", "Software Engineering"),
            ("sains data", "Data Science"),
            // Engineering
            ("kejuruteraan elektrik", "Electrical Engineering"),
            ("kejuruteraan elektronik", "Electronic Engineering"),
            ("kejuruteraan mekanikal", "Mechanical Engineering"),
            ("kejuruteraan awam", "Civil Engineering"),
            ("kejuruteraan kimia", "Chemical Engineering"),
            ("kejuruteraan", "Engineering"),
            // Business
            ("pentadbiran perniagaan", "Business Administration"),
            ("perniagaan", "Business"),
            ("perakaunan", "Accounting"),
            ("kewangan", "Finance"),
            ("perbankan", "Banking"),
            ("pemasaran", "Marketing"),
            ("pengurusan", "Management"),
            ("ekonomi", "Economics"),
            ("keusahawanan", "Entrepreneurship"),
            // Health
            ("perubatan", "Medicine"),
            ("farmasi", "Pharmacy"),
            ("kejururawatan", "Nursing"),
            ("pergigian", "Dentistry"),
            ("kesihatan awam", "Public Health"),
            // Sciences
            ("sains", "Science"),
            ("biologi", "Biology"),
            ("kimia", "Chemistry"),
            ("fizik", "Physics"),
            ("matematik", "Mathematics"),
            ("statistik", "Statistics"),
            ("bioteknologi", "Biotechnology"),
            // Arts, education, law, social sciences
            ("seni bina", "Architecture"),
            ("reka bentuk grafik", "Graphic Design"),
            ("pendidikan", "Education"),
            ("undang-undang", "Law"),
            ("psikologi", "Psychology"),
            ("komunikasi", "Communication"),
            ("sains sosial", "Social Science"),
            ("pelancongan", "Tourism"),
            ("hospitaliti", "Hospitality"),
            ("sains sukan", "Sports Science"),
            ("pertanian", "Agriculture"),
        ];

        PHRASES.iter().copied().collect()
    })
}

fn split_punctuation(token: &str) -> (&str, &str, &str) {
    let start = token
        .find(|ch: char| ch.is_alphanumeric())
        .unwrap_or(token.len());
    let end = token
        .rfind(|ch: char| ch.is_alphanumeric())
        .map(|index| index + token[index..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(start);
    (&token[..start], &token[start..end.max(start)], &token[end.max(start)..])
}

impl GlossaryTranslator {
    fn render(&self, text: &str) -> Option<String> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let glossary = malay_glossary();
        let mut rendered = Vec::with_capacity(tokens.len());
        let mut translated_any = false;
        let mut index = 0;

        while index < tokens.len() {
            let longest = (1..=MAX_PHRASE_WORDS.min(tokens.len() - index))
                .rev()
                .find_map(|width| {
                    let window = &tokens[index..index + width];
                    let (prefix, _, _) = split_punctuation(window[0]);
                    let (_, _, suffix) = split_punctuation(window[width - 1]);
                    let phrase = window
                        .iter()
                        .map(|token| split_punctuation(token).1.to_lowercase())
                        .collect::<Vec<_>>()
                        .join(" ");
                    glossary
                        .get(phrase.as_str())
                        .map(|english| (width, format!("{prefix}{english}{suffix}")))
                });

            match longest {
                Some((width, english)) => {
                    rendered.push(english);
                    translated_any = true;
                    index += width;
                }
                None => {
                    rendered.push(tokens[index].to_string());
                    index += 1;
                }
            }
        }

        translated_any.then(|| rendered.join(" "))
    }
}

impl CourseTranslator for GlossaryTranslator {
    fn translate(&self, text: &str) -> Result<String, TranslationError> {
        Ok(self.render(text).unwrap_or_else(|| text.to_string()))
    }

    fn map_to_field_category(&self, text: &str) -> Option<FieldCategory> {
        field_category_of(text)
    }
}
