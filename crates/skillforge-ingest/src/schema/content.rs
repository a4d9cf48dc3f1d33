//! Study content payload schema (resources, quiz, tutorial)

use super::required;
use crate::error::{Error, Result};
use serde::Deserialize;
use skillforge_core::{QuizQuestion, Resource, ResourceKind};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResource {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl RawResource {
    pub fn into_resource(self, path: &str) -> Result<Resource> {
        let title = required(self.title, &format!("{}.title", path))?;
        let kind = match self.kind.as_deref().map(str::trim) {
            Some(k) if k.eq_ignore_ascii_case("video") => ResourceKind::Video,
            Some(k) if k.eq_ignore_ascii_case("article") => ResourceKind::Article,
            Some(other) => {
                return Err(Error::InvalidSchema(format!(
                    "{}.type: expected video or article, got '{}'",
                    path, other
                )))
            }
            None => return Err(Error::MissingField(format!("{}.type", path))),
        };
        Ok(Resource {
            title,
            url: self.url,
            search_query: self.search_query,
            kind,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuiz {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub correct_index: Option<f64>,
}

impl RawQuiz {
    pub fn into_question(self, path: &str) -> Result<QuizQuestion> {
        let question = required(self.question, &format!("{}.question", path))?;
        let options = self.options.unwrap_or_default();
        if options.is_empty() {
            return Err(Error::InvalidSchema(format!("{}.options: no options", path)));
        }
        let index = self
            .correct_index
            .ok_or_else(|| Error::MissingField(format!("{}.correctIndex", path)))?;
        if index.fract() != 0.0 || index < 0.0 || index >= options.len() as f64 {
            return Err(Error::InvalidSchema(format!(
                "{}.correctIndex: {} is not an index into {} options",
                path,
                index,
                options.len()
            )));
        }
        Ok(QuizQuestion {
            question,
            options,
            correct_index: index as usize,
        })
    }
}

/// Any of the three content payload shapes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContent {
    #[serde(default)]
    pub resources: Option<Vec<RawResource>>,
    #[serde(default)]
    pub quiz: Option<Vec<RawQuiz>>,
    #[serde(default)]
    pub tutorial: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_is_case_insensitive() {
        let raw: RawResource =
            serde_json::from_str(r#"{"title":"Intro","type":"Video","searchQuery":"rust intro"}"#)
                .unwrap();
        let resource = raw.into_resource("resources[0]").unwrap();
        assert_eq!(resource.kind, ResourceKind::Video);
        assert_eq!(resource.search_query.as_deref(), Some("rust intro"));
        assert_eq!(resource.url, None);
    }

    #[test]
    fn test_resource_rejects_unknown_kind() {
        let raw: RawResource =
            serde_json::from_str(r#"{"title":"Intro","type":"podcast"}"#).unwrap();
        let err = raw.into_resource("resources[1]").unwrap_err();
        assert!(err.to_string().contains("resources[1].type"));
    }

    #[test]
    fn test_quiz_index_in_range() {
        let raw: RawQuiz = serde_json::from_str(
            r#"{"question":"2+2?","options":["3","4","5"],"correctIndex":1}"#,
        )
        .unwrap();
        assert_eq!(raw.into_question("quiz[0]").unwrap().correct_index, 1);

        let raw: RawQuiz =
            serde_json::from_str(r#"{"question":"2+2?","options":["3","4"],"correctIndex":2}"#)
                .unwrap();
        assert!(matches!(
            raw.into_question("quiz[0]"),
            Err(Error::InvalidSchema(ref m)) if m.starts_with("quiz[0].correctIndex")
        ));
    }

    #[test]
    fn test_quiz_needs_options() {
        let raw: RawQuiz =
            serde_json::from_str(r#"{"question":"?","options":[],"correctIndex":0}"#).unwrap();
        assert!(matches!(
            raw.into_question("quiz[3]"),
            Err(Error::InvalidSchema(ref m)) if m.starts_with("quiz[3].options")
        ));
        let raw: RawQuiz =
            serde_json::from_str(r#"{"question":"?","options":["only"],"correctIndex":0}"#)
                .unwrap();
        assert_eq!(raw.into_question("quiz[3]").unwrap().options, vec!["only"]);
    }
}
