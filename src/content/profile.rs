//! Profile data model and loader.
//!
//! A profile is a TOML document.  Every section is optional so a partial
//! file still renders; missing sections simply come out empty.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The profile compiled into the binary.
pub const DEFAULT_PROFILE: &str = include_str!("default.toml");

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid profile: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    /// Second half of the name, drawn in the accent colour.
    pub accent_name: String,
    /// Words scrolled by the marquee under the skills.
    pub philosophy: Vec<String>,
    pub hero: Hero,
    pub about: About,
    pub education: Vec<Education>,
    pub skills: Vec<SkillGroup>,
    pub experience: Vec<Job>,
    pub projects: Vec<Project>,
    /// Floating badge next to the testimonials.
    pub badge: Option<Stat>,
    pub testimonials: Vec<Testimonial>,
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Hero {
    /// Title lines, revealed one after another.
    pub lines: Vec<String>,
    pub subtitle: String,
    pub tagline: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    pub eyebrow: String,
    pub heading: String,
    pub paragraphs: Vec<String>,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub period: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub role: String,
    pub company: String,
    pub location: String,
    pub period: String,
    pub impact: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub category: String,
    pub tech: Vec<String>,
    pub description: String,
    pub url: String,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub name: String,
    pub role: String,
    pub content: String,
    /// Stars, 0 to 5.
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub eyebrow: String,
    pub heading: String,
    /// Label of the magnetic call-to-action button.
    pub cta: String,
    pub cta_url: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Profile {
    pub fn from_toml(source: &str) -> Result<Self, ProfileError> {
        let mut profile: Profile = toml::from_str(source)?;
        for t in &mut profile.testimonials {
            t.rating = t.rating.min(5);
        }
        Ok(profile)
    }

    pub fn builtin() -> Result<Self, ProfileError> {
        Self::from_toml(DEFAULT_PROFILE)
    }

    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let source = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_toml(&source)?;
        tracing::info!(path = %path.display(), "loaded profile");
        Ok(profile)
    }

    /// `name` followed by the accent half, for the navbar and footer.
    pub fn full_name(&self) -> String {
        if self.accent_name.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.accent_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profile_parses() {
        let p = Profile::builtin().unwrap();
        assert_eq!(p.full_name(), "Kaif Ahmed Sherdi");
        assert_eq!(p.hero.lines.len(), 2);
        assert_eq!(p.education.len(), 2);
        assert_eq!(p.skills.len(), 3);
        assert_eq!(p.projects.len(), 3);
        assert_eq!(p.testimonials.len(), 6);
        assert_eq!(p.philosophy.len(), 4);
        assert_eq!(p.badge.as_ref().map(|b| b.value.as_str()), Some("98%"));
        assert_eq!(p.contact.links.len(), 3);
    }

    #[test]
    fn partial_profile_fills_defaults() {
        let p = Profile::from_toml(
            r#"
            name = "Ada"

            [[testimonials]]
            name = "Charles"
            rating = 9
            "#,
        )
        .unwrap();
        assert_eq!(p.full_name(), "Ada");
        assert!(p.projects.is_empty());
        assert_eq!(p.testimonials[0].rating, 5);
        assert!(p.hero.lines.is_empty());
    }

    #[test]
    fn malformed_profile_is_a_parse_error() {
        let err = Profile::from_toml("name = [").unwrap_err();
        assert!(matches!(err, ProfileError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = Profile::load(Path::new("/nonexistent/folio.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/folio.toml"));
    }
}
