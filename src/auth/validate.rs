use regex::Regex;
use std::sync::LazyLock;

use crate::models::sign_up::{Field, FieldError, FieldErrors, RuleKind, SignUpValues};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is a valid regex")
});

enum Check {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Pattern(&'static LazyLock<Regex>),
}

struct Rule {
    check: Check,
    message: &'static str,
}

/// Declared rules per field, checked in order; the first failure wins.
static RULES: &[(Field, &[Rule])] = &[
    (
        Field::Username,
        &[
            Rule { check: Check::MaxLength(20), message: "Your username have more than 20 characters." },
            Rule { check: Check::MinLength(3), message: "Your username needs to be at least 3 characters." },
        ],
    ),
    (
        Field::Email,
        &[
            Rule { check: Check::Required, message: "" },
            Rule { check: Check::Pattern(&EMAIL_PATTERN), message: "Invalid email address" },
        ],
    ),
    (
        Field::Password,
        &[
            Rule { check: Check::MaxLength(40), message: "Your password have more than 40 characters." },
            Rule { check: Check::MinLength(6), message: "Your password needs to be at least 6 characters." },
        ],
    ),
    (Field::Consent, &[Rule { check: Check::Required, message: "" }]),
];

enum Value<'a> {
    Text(&'a str),
    Checked(bool),
}

impl Check {
    fn kind(&self) -> RuleKind {
        match self {
            Check::Required => RuleKind::Required,
            Check::MinLength(_) => RuleKind::MinLength,
            Check::MaxLength(_) => RuleKind::MaxLength,
            Check::Pattern(_) => RuleKind::Pattern,
        }
    }

    fn passes(&self, value: &Value<'_>) -> bool {
        match (self, value) {
            (Check::Required, Value::Text(s)) => !s.is_empty(),
            (Check::Required, Value::Checked(b)) => *b,
            (Check::MinLength(min), Value::Text(s)) => text_len(s) >= *min,
            (Check::MaxLength(max), Value::Text(s)) => text_len(s) <= *max,
            (Check::Pattern(re), Value::Text(s)) => re.is_match(s),
            (_, Value::Checked(_)) => true,
        }
    }
}

/// Length as the browser counts it (UTF-16 code units).
fn text_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn value_of(values: &SignUpValues, field: Field) -> Value<'_> {
    match field {
        Field::Username => Value::Text(&values.username),
        Field::Email => Value::Text(&values.email),
        Field::Password => Value::Text(&values.password),
        Field::Consent => Value::Checked(values.checkbox),
    }
}

/// Run the rule table against posted values.
pub fn validate(values: &SignUpValues) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (field, rules) in RULES {
        let value = value_of(values, *field);
        if let Some(rule) = rules.iter().find(|r| !r.check.passes(&value)) {
            log::debug!("Field '{}' failed {:?}", field.as_str(), rule.check.kind());
            errors.insert(*field, FieldError {
                kind: rule.check.kind(),
                message: rule.message.to_string(),
            });
        }
    }
    errors
}
