use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::domain::QuizDocument;

/// One violated rule, addressed by a JSON-ish path such as `quiz[2].options`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every rule a generated quiz broke, sorted by field path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn new(mut violations: Vec<Violation>) -> Self {
        violations.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .violations
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ValidationFailure {}

/// Turns a generic JSON value into a [`QuizDocument`] and checks every schema invariant.
///
/// The value is walked field by field first. Missing or mistyped fields are reported at their
/// path (`quiz[0].explanation: missing`) and replaced by placeholders, so cardinality, option,
/// answer, difficulty and id-uniqueness rules still run on everything that is well formed.
/// Rule results that only concern a placeholder are dropped.
pub fn validate_quiz(mut raw: Value) -> Result<QuizDocument, ValidationFailure> {
    let Value::Object(fields) = &mut raw else {
        return Err(ValidationFailure::new(vec![Violation::new(
            "$",
            "expected a JSON object",
        )]));
    };

    let mut shape = ShapeCheck::default();
    shape.check_object(fields, &DOCUMENT_FIELDS, "");
    shape.check_questions(fields);

    let document: QuizDocument = serde_json::from_value(raw).map_err(|err| {
        let mut violations = shape.violations.clone();
        violations.push(Violation::new("$", err.to_string()));
        ValidationFailure::new(violations)
    })?;

    let mut rules = Vec::new();
    if let Err(errors) = document.validate() {
        collect_violations(&errors, "", &mut rules);
    }
    for (index, question) in document.quiz.iter().enumerate() {
        if let Err(errors) = question.validate() {
            collect_violations(&errors, &format!("quiz[{}]", index), &mut rules);
        }
    }

    let mut violations = shape.violations.clone();
    violations.extend(rules.into_iter().filter(|v| !shape.hides(&v.field)));

    if violations.is_empty() {
        Ok(document)
    } else {
        Err(ValidationFailure::new(violations))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Integer,
    Text,
    TextList,
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            FieldKind::Integer => "expected an integer",
            FieldKind::Text => "expected a string",
            FieldKind::TextList => "expected an array of strings",
        }
    }

    fn placeholder(self) -> Value {
        match self {
            FieldKind::Integer => Value::from(0),
            FieldKind::Text => Value::String(String::new()),
            FieldKind::TextList => Value::Array(Vec::new()),
        }
    }
}

const DOCUMENT_FIELDS: [(&str, FieldKind); 8] = [
    ("id", FieldKind::Integer),
    ("title", FieldKind::Text),
    ("summary", FieldKind::Text),
    ("key_entities", FieldKind::TextList),
    ("organizations", FieldKind::TextList),
    ("locations", FieldKind::TextList),
    ("sections", FieldKind::TextList),
    ("suggested_topics", FieldKind::TextList),
];

const QUESTION_FIELDS: [(&str, FieldKind); 6] = [
    ("question_id", FieldKind::Text),
    ("text", FieldKind::Text),
    ("options", FieldKind::TextList),
    ("answer", FieldKind::Text),
    ("explanation", FieldKind::Text),
    ("difficulty", FieldKind::Text),
];

/// Shape violations found while walking the raw value, and the paths patched over.
#[derive(Default)]
struct ShapeCheck {
    violations: Vec<Violation>,
    patched: Vec<String>,
}

impl ShapeCheck {
    fn flag(&mut self, path: String, message: &str) {
        self.violations.push(Violation::new(path.clone(), message));
        self.patched.push(path);
    }

    fn check_object(
        &mut self,
        object: &mut Map<String, Value>,
        fields: &[(&str, FieldKind)],
        prefix: &str,
    ) {
        for (name, kind) in fields {
            let path = join_path(prefix, name);
            match object.get_mut(*name) {
                Some(value) => self.check_value(value, *kind, path),
                None => {
                    self.flag(path, "missing");
                    object.insert(name.to_string(), kind.placeholder());
                }
            }
        }
    }

    fn check_value(&mut self, value: &mut Value, kind: FieldKind, path: String) {
        match value {
            Value::Array(items) if kind == FieldKind::TextList => {
                for (index, item) in items.iter_mut().enumerate() {
                    if !item.is_string() {
                        self.flag(format!("{}[{}]", path, index), FieldKind::Text.expected());
                        *item = FieldKind::Text.placeholder();
                    }
                }
            }
            _ => {
                let well_formed = match kind {
                    FieldKind::Integer => value.as_i64().is_some(),
                    FieldKind::Text => value.is_string(),
                    FieldKind::TextList => false,
                };
                if !well_formed {
                    self.flag(path, kind.expected());
                    *value = kind.placeholder();
                }
            }
        }
    }

    fn check_questions(&mut self, document: &mut Map<String, Value>) {
        match document.get_mut("quiz") {
            Some(Value::Array(questions)) => {
                for (index, question) in questions.iter_mut().enumerate() {
                    let prefix = format!("quiz[{}]", index);
                    match question {
                        Value::Object(fields) => {
                            self.check_object(fields, &QUESTION_FIELDS, &prefix)
                        }
                        other => {
                            self.flag(prefix, "expected an object");
                            *other = question_placeholder();
                        }
                    }
                }
            }
            Some(other) => {
                self.flag("quiz".to_string(), "expected an array of questions");
                *other = Value::Array(Vec::new());
            }
            None => {
                self.flag("quiz".to_string(), "missing");
                document.insert("quiz".to_string(), Value::Array(Vec::new()));
            }
        }
    }

    /// Whether a rule result at `path` was computed from a placeholder.
    fn hides(&self, path: &str) -> bool {
        self.patched.iter().any(|patched| {
            let inside_patched = path
                .strip_prefix(patched.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'));
            // answer-in-options reports on the question itself
            let answer_rule = is_question_path(path)
                && (*patched == format!("{}.answer", path)
                    || *patched == format!("{}.options", path));
            // question id uniqueness reports on the document root
            let id_rule = path == "$"
                && (patched.ends_with(".question_id") || is_question_path(patched));

            inside_patched || answer_rule || id_rule
        })
    }
}

fn is_question_path(path: &str) -> bool {
    path.starts_with("quiz[") && path.ends_with(']') && !path.contains('.')
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn question_placeholder() -> Value {
    Value::Object(
        QUESTION_FIELDS
            .iter()
            .map(|(name, kind)| (name.to_string(), kind.placeholder()))
            .collect(),
    )
}

fn collect_violations(errors: &ValidationErrors, prefix: &str, out: &mut Vec<Violation>) {
    for (field, field_errors) in errors.field_errors() {
        let field = field.to_string();
        let path = match (prefix.is_empty(), field.as_str()) {
            (true, "__all__") => "$".to_string(),
            (false, "__all__") => prefix.to_string(),
            (true, _) => field,
            (false, _) => format!("{}.{}", prefix, field),
        };

        for error in field_errors.iter() {
            out.push(Violation::new(path.clone(), describe(error)));
        }
    }
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    if error.code == "length" {
        let found = error
            .params
            .get("value")
            .and_then(|value| value.as_array())
            .map(|items| items.len());
        let bound = |name: &str| error.params.get(name).and_then(|v| v.as_u64());

        let expected = match (bound("equal"), bound("min"), bound("max")) {
            (Some(equal), _, _) => format!("exactly {}", equal),
            (None, Some(min), Some(max)) => format!("between {} and {}", min, max),
            (None, Some(min), None) => format!("at least {}", min),
            (None, None, Some(max)) => format!("at most {}", max),
            (None, None, None) => "a different number of".to_string(),
        };

        return match found {
            Some(found) => format!("must contain {} items (found {})", expected, found),
            None => format!("must contain {} items", expected),
        };
    }

    format!("failed rule '{}'", error.code)
}
