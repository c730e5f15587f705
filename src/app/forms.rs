//! Form decoding and validation.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::form_urlencoded;

use crate::request::Request;

/// Compiled on first use. The pattern is a literal, so compiling it cannot
/// fail at runtime once `email_pattern` passes.
pub static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

/// Decoded `application/x-www-form-urlencoded` body. Repeated keys keep the
/// last value.
#[derive(Debug, Default)]
pub struct Form(HashMap<String, String>);

impl Form {
    pub fn parse(body: &[u8]) -> Self {
        Self(form_urlencoded::parse(body).into_owned().collect())
    }

    /// `None` when the request declares a content type other than a
    /// urlencoded form.
    pub fn from_request(req: &Request) -> Option<Self> {
        match req.header("content-type") {
            Some(ct) if !ct.starts_with("application/x-www-form-urlencoded") => None,
            _ => Some(Self::parse(req.body())),
        }
    }

    /// The trimmed value of `key`, or `""` if absent.
    pub fn get(&self, key: &str) -> &str {
        self.raw(key).trim()
    }

    /// The value of `key` exactly as submitted. Used for secrets, where
    /// surrounding whitespace is part of the value.
    pub fn raw(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or_default()
    }
}

/// Accumulated validation errors for one form submission.
#[derive(Debug, Default, Serialize)]
pub struct Validator {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub non_field_errors: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, String>,
}

impl Validator {
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// Records `message` for `key` unless that field already has an error.
    pub fn add_field_error(&mut self, key: &str, message: &str) {
        self.field_errors.entry(key.to_owned()).or_insert_with(|| message.to_owned());
    }

    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_owned());
    }

    pub fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_field_error(key, message);
        }
    }
}

pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

pub fn permitted_value<T: PartialEq>(value: T, permitted: &[T]) -> bool {
    permitted.contains(&value)
}

pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}

// ── Forms ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SnippetCreateForm {
    pub title: String,
    pub content: String,
    pub expires: u32,
    #[serde(flatten)]
    pub validator: Validator,
}

impl Default for SnippetCreateForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            expires: 365,
            validator: Validator::default(),
        }
    }
}

impl SnippetCreateForm {
    /// `None` if `expires` is not a number at all.
    pub fn decode(form: &Form) -> Option<Self> {
        let expires = form.get("expires").parse().ok()?;
        Some(Self {
            title: form.get("title").to_owned(),
            content: form.get("content").to_owned(),
            expires,
            validator: Validator::default(),
        })
    }

    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.title), "title", "This field cannot be blank");
        v.check_field(
            max_chars(&self.title, 100),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(not_blank(&self.content), "content", "This field cannot be blank");
        v.check_field(
            permitted_value(self.expires, &[1, 7, 365]),
            "expires",
            "This field must equal 1, 7 or 365",
        );
        v.valid()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct UserSignupForm {
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    #[serde(flatten)]
    pub validator: Validator,
}

impl UserSignupForm {
    pub fn decode(form: &Form) -> Self {
        Self {
            name: form.get("name").to_owned(),
            email: form.get("email").to_owned(),
            password: form.raw("password").to_owned(),
            validator: Validator::default(),
        }
    }

    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.name), "name", "This field cannot be blank");
        v.check_field(not_blank(&self.email), "email", "This field cannot be blank");
        v.check_field(matches(&self.email, &EMAIL_RX), "email", "This field must be a valid email address");
        v.check_field(not_blank(&self.password), "password", "This field cannot be blank");
        v.check_field(min_chars(&self.password, 8), "password", "This field must be at least 8 characters long");
        v.valid()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct UserLoginForm {
    pub email: String,
    #[serde(skip)]
    pub password: String,
    #[serde(flatten)]
    pub validator: Validator,
}

impl UserLoginForm {
    pub fn decode(form: &Form) -> Self {
        Self {
            email: form.get("email").to_owned(),
            password: form.raw("password").to_owned(),
            validator: Validator::default(),
        }
    }

    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.email), "email", "This field cannot be blank");
        v.check_field(matches(&self.email, &EMAIL_RX), "email", "This field must be a valid email address");
        v.check_field(not_blank(&self.password), "password", "This field cannot be blank");
        v.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_urlencoded_and_trims() {
        let form = Form::parse(b"title=+Hello%20there+&content=a%26b&title=later");
        assert_eq!(form.get("title"), "later");
        assert_eq!(form.get("content"), "a&b");
        assert_eq!(form.get("missing"), "");
    }

    #[test]
    fn rejects_non_form_content_type() {
        let headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];
        let req = Request::new("POST", "/snippet/create", headers, b"{}".to_vec());
        assert!(Form::from_request(&req).is_none());

        let req = Request::new("POST", "/snippet/create", Vec::new(), b"title=x".to_vec());
        assert_eq!(Form::from_request(&req).unwrap().get("title"), "x");
    }

    #[test]
    fn snippet_form_collects_first_error_per_field() {
        let long_title = "x".repeat(101);
        let body = format!("title={long_title}&content=&expires=30");
        let mut form = SnippetCreateForm::decode(&Form::parse(body.as_bytes())).unwrap();

        assert!(!form.validate());
        let errors = &form.validator.field_errors;
        assert_eq!(errors["title"], "This field cannot be more than 100 characters long");
        assert_eq!(errors["content"], "This field cannot be blank");
        assert_eq!(errors["expires"], "This field must equal 1, 7 or 365");
    }

    #[test]
    fn snippet_form_needs_numeric_expires() {
        assert!(SnippetCreateForm::decode(&Form::parse(b"title=a&content=b&expires=soon")).is_none());
    }

    #[test]
    fn email_pattern() {
        assert!(matches("alice@example.com", &EMAIL_RX));
        assert!(!matches("alice@", &EMAIL_RX));
        assert!(!matches("not an email", &EMAIL_RX));
    }

    #[test]
    fn signup_form_checks_password_length() {
        let mut form = UserSignupForm::decode(&Form::parse(b"name=Bob&email=bob@example.com&password=short"));
        assert!(!form.validate());
        assert_eq!(form.validator.field_errors.len(), 1);
        assert!(form.validator.field_errors.contains_key("password"));
    }

    #[test]
    fn passwords_keep_surrounding_whitespace() {
        let form = Form::parse(b"name=+Bob+&email=bob@example.com&password=+secret12+");
        let signup = UserSignupForm::decode(&form);
        assert_eq!(signup.name, "Bob");
        assert_eq!(signup.password, " secret12 ");

        let login = UserLoginForm::decode(&form);
        assert_eq!(login.password, " secret12 ");

        let mut blank = UserLoginForm::decode(&Form::parse(b"email=bob@example.com&password=+++"));
        assert!(!blank.validate());
        assert_eq!(blank.validator.field_errors["password"], "This field cannot be blank");
    }
}
