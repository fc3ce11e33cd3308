use crate::extraction::field_category_of;

/// Decides whether a declared program or major satisfies an offer's restricted lists.
pub trait ProgramCompatibility: Send + Sync {
    fn is_compatible(&self, declared: &str, courses: &[String], majors: &[String]) -> bool;
}

/// Case-insensitive equality or substring match in either direction.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringCompatibility;

impl ProgramCompatibility for SubstringCompatibility {
    fn is_compatible(&self, declared: &str, courses: &[String], majors: &[String]) -> bool {
        let declared = normalize(declared);
        if declared.is_empty() {
            return false;
        }

        courses
            .iter()
            .chain(majors)
            .any(|entry| text_overlaps(&declared, &normalize(entry)))
    }
}

/// Substring matching plus field-of-study buckets, so `Sarjana Muda Sains Komputer`
/// satisfies a `Bachelor of Computer Science` entry.
///
/// `other` as the declared value is a wildcard, and list entries such as
/// `All fields` or `Applicable to all programmes` accept everyone.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldAwareCompatibility;

impl ProgramCompatibility for FieldAwareCompatibility {
    fn is_compatible(&self, declared: &str, courses: &[String], majors: &[String]) -> bool {
        let declared = normalize(declared);
        if declared.is_empty() {
            return false;
        }
        if declared == "other" {
            return true;
        }

        let declared_field = field_category_of(&declared);

        // courses are consulted before majors
        [courses, majors].into_iter().any(|entries| {
            entries.iter().any(|entry| {
                let entry = normalize(entry);
                if entry.is_empty() {
                    return false;
                }
                if accepts_all_fields(&entry) {
                    return true;
                }
                if declared_field.is_some() && field_category_of(&entry) == declared_field {
                    return true;
                }
                text_overlaps(&declared, &entry)
            })
        })
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn text_overlaps(declared: &str, entry: &str) -> bool {
    !entry.is_empty() && (entry == declared || entry.contains(declared) || declared.contains(entry))
}

pub(crate) fn accepts_all_fields(entry: &str) -> bool {
    if ["all fields", "all programmes", "all programs"]
        .iter()
        .any(|phrase| entry.contains(phrase))
    {
        return true;
    }

    entry.find("applicable to all").is_some_and(|index| {
        let rest = &entry[index + "applicable to all".len()..];
        rest.contains("programmes") || rest.contains("programs")
    })
}
