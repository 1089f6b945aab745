//! The résumé document model handed to templates as JSON.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Root of a parsed résumé.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub name: String,
    pub contact_lines: Vec<String>,
    pub email: String,
    pub meta_bullets: Vec<String>,
    pub links: Vec<Link>,
    pub summary: String,
    pub work: Vec<Job>,
    pub education: Vec<String>,
    pub skills: Skills,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// One `###` entry of the Work Experience section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub title: String,
    pub company: String,
    pub location: String,
    pub dates: String,
    pub company_description: String,
    pub groups: Vec<BulletGroup>,
}

/// A labeled or unlabeled run of bullets inside a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletGroup {
    pub heading: Option<String>,
    pub bullets: Vec<String>,
}

/// Category → description pairs, kept in the order they were first written.
///
/// Serializes as a JSON object. Inserting an existing category replaces its
/// description without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skills(Vec<(String, String)>);

impl Skills {
    pub fn insert(&mut self, category: impl Into<String>, description: impl Into<String>) {
        let category = category.into();
        let description = description.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == category) {
            Some(entry) => entry.1 = description,
            None => self.0.push((category, description)),
        }
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == category)
            .map(|(_, description)| description.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(c, d)| (c.as_str(), d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend(&mut self, other: Skills) {
        for (category, description) in other.0 {
            self.insert(category, description);
        }
    }
}

impl Serialize for Skills {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, description) in &self.0 {
            map.serialize_entry(category, description)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Skills {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SkillsVisitor;

        impl<'de> Visitor<'de> for SkillsVisitor {
            type Value = Skills;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of skill category to description")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Skills, A::Error> {
                let mut skills = Skills::default();
                while let Some((category, description)) =
                    access.next_entry::<String, String>()?
                {
                    skills.insert(category, description);
                }
                Ok(skills)
            }
        }

        deserializer.deserialize_map(SkillsVisitor)
    }
}

/// A `##` section of the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    /// Unique anchor slug derived from the title.
    pub id: String,
    #[serde(flatten)]
    pub body: SectionBody,
}

/// Section payload, tagged by `kind` in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SectionBody {
    Text { html: String },
    Links { links: Vec<Link>, html: String },
    Work { items: Vec<Job> },
    Skills { skills: Skills, html: String },
}

impl SectionBody {
    pub fn kind(&self) -> &'static str {
        match self {
            SectionBody::Text { .. } => "text",
            SectionBody::Links { .. } => "links",
            SectionBody::Work { .. } => "work",
            SectionBody::Skills { .. } => "skills",
        }
    }
}

/// Everything a template needs: page title, résumé fields and ordered sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(flatten)]
    pub resume: Resume,
    pub sections: Vec<Section>,
}
