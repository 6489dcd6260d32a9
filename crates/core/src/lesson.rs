use serde::{Deserialize, Deserializer, Serialize};

/// A single generated lesson.
///
/// Every string field tolerates a JSON `null` or a missing key and reads it as
/// empty, since the generator does not always emit the optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub concept: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub command: String,
    /// May embed `<tag>...</tag>` markers from the track's tag vocabulary.
    #[serde(default, deserialize_with = "nullable_string")]
    pub example_output: String,
    #[serde(
        rename = "practiceCommand",
        default,
        deserialize_with = "nullable_string"
    )]
    pub practice_command: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub hint: String,
}

impl Lesson {
    /// The exact command the learner must type, if this lesson has an exercise.
    pub fn practice(&self) -> Option<&str> {
        non_blank(&self.practice_command)
    }

    pub fn hint(&self) -> Option<&str> {
        non_blank(&self.hint)
    }
}

/// An ordered set of lessons for one module.
///
/// Insertion order is teaching order. An empty `lessons` vector is a valid,
/// loaded module; "no module" is modelled as `Option::None` by the session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LessonSet {
    #[serde(rename = "moduleName", default, deserialize_with = "nullable_string")]
    pub module_name: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub lessons: Vec<Lesson>,
}

impl LessonSet {
    pub fn new(module_name: impl Into<String>, lessons: Vec<Lesson>) -> Self {
        Self {
            module_name: module_name.into(),
            lessons,
        }
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Lesson> {
        self.lessons.get(index)
    }

    /// Returns a new set with `more` appended after the existing lessons.
    /// The module name is kept.
    pub fn extended(&self, more: Vec<Lesson>) -> Self {
        let mut lessons = Vec::with_capacity(self.lessons.len() + more.len());
        lessons.extend(self.lessons.iter().cloned());
        lessons.extend(more);
        Self {
            module_name: self.module_name.clone(),
            lessons,
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(title: &str) -> Lesson {
        Lesson {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_lesson_set_parses_generator_shape() {
        let json = r#"{
            "moduleName": "Git Basics",
            "lessons": [
                {
                    "title": "Adding a File",
                    "concept": "Stages changes.",
                    "command": "git add <filename>",
                    "example_output": "On branch <branch>main</branch>",
                    "practiceCommand": "git add README.md",
                    "hint": "Name the file.",
                    "difficulty": "easy"
                },
                {
                    "title": "What is a commit?",
                    "concept": "A snapshot.",
                    "command": "",
                    "example_output": ""
                }
            ]
        }"#;

        let set: LessonSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.module_name, "Git Basics");
        assert_eq!(set.len(), 2);
        assert_eq!(set.lessons[0].practice(), Some("git add README.md"));
        assert_eq!(set.lessons[0].hint(), Some("Name the file."));
        assert_eq!(set.lessons[1].practice(), None);
        assert_eq!(set.lessons[1].hint(), None);
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let json = r#"{
            "moduleName": "Docker",
            "lessons": [
                {"title": "Run", "concept": null, "command": "docker run",
                 "example_output": null, "practiceCommand": null, "hint": null}
            ]
        }"#;

        let set: LessonSet = serde_json::from_str(json).unwrap();
        let lesson = &set.lessons[0];
        assert_eq!(lesson.concept, "");
        assert_eq!(lesson.practice(), None);
        assert_eq!(lesson.hint(), None);
    }

    #[test]
    fn test_null_or_missing_lessons_is_empty_set() {
        let null_lessons: LessonSet =
            serde_json::from_str(r#"{"moduleName": "x", "lessons": null}"#).unwrap();
        let missing: LessonSet = serde_json::from_str(r#"{"moduleName": "x"}"#).unwrap();

        assert!(null_lessons.is_empty());
        assert!(missing.is_empty());
    }

    #[test]
    fn test_blank_practice_command_means_no_exercise() {
        let l = Lesson {
            practice_command: "   ".to_string(),
            hint: "\t".to_string(),
            ..Default::default()
        };
        assert_eq!(l.practice(), None);
        assert_eq!(l.hint(), None);
    }

    #[test]
    fn test_extended_preserves_order_and_name() {
        let set = LessonSet::new("Branching", vec![lesson("a"), lesson("b")]);
        let bigger = set.extended(vec![lesson("c")]);

        assert_eq!(bigger.module_name, "Branching");
        let titles: Vec<_> = bigger.lessons.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
        assert_eq!(set.len(), 2);
    }
}
