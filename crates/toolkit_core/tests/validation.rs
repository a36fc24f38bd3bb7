use toolkit_core::{Field, FormData, Validation};

fn field(value: &str) -> Field {
    Field::new("field", "Field", value)
}

#[test]
fn new_validation_is_valid() {
    let validation = Validation::new(None);
    assert!(validation.valid());
    assert!(validation.errors().is_empty());
    assert!(validation.data.is_none());
}

#[test]
fn first_error_per_key_wins() {
    let mut validation = Validation::new(None);
    validation.add_error("x", "first");
    validation.add_error("x", "second");

    assert_eq!(validation.errors["x"], "first");
    assert_eq!(validation.errors().len(), 1);
    assert!(!validation.valid());
}

#[test]
fn rule_failure_makes_validation_invalid() {
    let mut validation = Validation::new(None);
    validation.required(&[field("ok")]);
    assert!(validation.valid());

    validation.required(&[field("  ")]);
    assert!(!validation.valid());
    assert_eq!(validation.error("field"), Some("Field cannot be blank"));
}

#[test]
fn required_checks_every_field() {
    let mut validation = Validation::new(None);
    validation.required(&[
        Field::new("first_name", "First name", ""),
        Field::new("last_name", "Last name", "Lovelace"),
        Field::new("email", "Email", "\t"),
    ]);

    assert_eq!(validation.errors().len(), 2);
    assert_eq!(validation.error("first_name"), Some("First name cannot be blank"));
    assert_eq!(validation.error("email"), Some("Email cannot be blank"));
    assert_eq!(validation.error("last_name"), None);
}

#[test]
fn min_length_trims_and_reports_by_name() {
    let mut validation = Validation::new(None);
    validation.min_length(&[Field::new("password", "Password", "  abc  ")], 4);
    validation.min_length(&[Field::new("username", "Username", "ada")], 3);

    assert_eq!(
        validation.error("password"),
        Some("password must be at least 4 characters")
    );
    assert_eq!(validation.error("username"), None);
}

#[test]
fn integer_rule_accepts_signed_whole_numbers() {
    let mut validation = Validation::new(None);
    validation.integer(&[
        Field::new("a", "A", "42"),
        Field::new("b", "B", "-7"),
        Field::new("c", "C", "+3"),
    ]);
    assert!(validation.valid());

    validation.integer(&[
        Field::new("d", "D", "4.2"),
        Field::new("e", "E", " 1"),
        Field::new("f", "F", ""),
    ]);
    assert_eq!(validation.error("d"), Some("D must be an integer"));
    assert_eq!(validation.errors().len(), 3);
}

#[test]
fn float_rule_accepts_decimal_values() {
    let mut validation = Validation::new(None);
    validation.float(&[
        Field::new("a", "A", "3.14"),
        Field::new("b", "B", "-2"),
        Field::new("c", "C", "1e-3"),
    ]);
    assert!(validation.valid());

    validation.float(&[Field::new("price", "Price", "12,50")]);
    assert_eq!(validation.error("price"), Some("Price must contain decimal values"));
}

#[test]
fn date_iso_rule_requires_strict_layout() {
    let mut validation = Validation::new(None);
    validation.date_iso(&[Field::new("start", "Start", "2024-03-01")]);
    assert!(validation.valid());

    validation.date_iso(&[
        Field::new("end", "End", "2024-3-1"),
        Field::new("due", "Due", "2024-02-30"),
    ]);
    assert_eq!(
        validation.error("end"),
        Some("End must be a date in YYYY-MM-DD format")
    );
    assert!(validation.error("due").is_some());
}

#[test]
fn email_rule_flags_invalid_addresses() {
    let mut validation = Validation::new(None);
    validation.email(&[Field::new("email", "Email", "ada@example.com")]);
    assert!(validation.valid());

    validation.email(&[Field::new("backup", "Backup email", "ada.example.com")]);
    assert_eq!(
        validation.error("backup"),
        Some("Backup email must be a valid email address")
    );
}

#[test]
fn email_rule_keeps_legacy_local_part_quirks() {
    let mut validation = Validation::new(None);
    validation.email(&[
        Field::new("spaced", "Spaced", "two words@example.com"),
        Field::new("escaped", "Escaped", r#""a\b"@example.com"#),
    ]);

    assert_eq!(validation.error("spaced"), None);
    assert_eq!(
        validation.error("escaped"),
        Some("Escaped must be a valid email address")
    );
}

#[test]
fn float_rule_accepts_hexadecimal_and_flags_overflow() {
    let mut validation = Validation::new(None);
    validation.float(&[
        Field::new("hex", "Hex", "0x1p-2"),
        Field::new("inf", "Inf", "+Inf"),
    ]);
    assert!(validation.valid());

    validation.float(&[
        Field::new("huge", "Huge", "1e400"),
        Field::new("bare_hex", "Bare hex", "0x1F"),
    ]);
    assert_eq!(validation.error("huge"), Some("Huge must contain decimal values"));
    assert_eq!(
        validation.error("bare_hex"),
        Some("Bare hex must contain decimal values")
    );
}

#[test]
fn no_spaces_only_flags_empty_or_single_space_values() {
    let mut validation = Validation::new(None);
    validation.no_spaces(&[
        Field::new("inner", "Inner", "a b"),
        Field::new("plain", "Plain", "ab"),
    ]);
    assert!(validation.valid());

    validation.no_spaces(&[
        Field::new("space", "Space", " "),
        Field::new("empty", "Empty", ""),
    ]);
    assert_eq!(validation.error("space"), Some("Space does not allow any spaces"));
    assert_eq!(validation.error("empty"), Some("Empty does not allow any spaces"));
}

#[test]
fn check_records_message_when_condition_fails() {
    let mut validation = Validation::new(None);
    validation.check(true, "terms", "must accept terms");
    assert!(validation.valid());

    validation.check(false, "terms", "must accept terms");
    assert_eq!(validation.error("terms"), Some("must accept terms"));
}

#[test]
fn has_returns_true_for_empty_fields() {
    let request = FormData::parse("name=Ada&blank=");
    let validation = Validation::new(None);

    assert!(!validation.has("name", &request));
    assert!(validation.has("blank", &request));
    assert!(validation.has("missing", &request));
}

#[test]
fn rules_over_submitted_form_keep_first_failure() {
    let form = FormData::parse("email=not-an-email&age=&start=2024-03-01");
    let mut validation = Validation::new(Some(form));

    let email = validation.field("email", "Email");
    let age = validation.field("age", "Age");
    let start = validation.field("start", "Start date");
    let missing = validation.field("missing", "Missing");
    assert_eq!(missing.value, "");

    validation.required(&[email.clone(), age.clone(), start.clone()]);
    validation.email(&[email]);
    validation.integer(&[age]);
    validation.date_iso(&[start]);

    assert_eq!(validation.error("email"), Some("Email must be a valid email address"));
    assert_eq!(validation.error("age"), Some("Age cannot be blank"));
    assert_eq!(validation.error("start"), None);
    assert_eq!(validation.errors().len(), 2);
}

#[test]
fn errors_serialize_as_a_flat_map() {
    let mut validation = Validation::new(None);
    validation.add_error("email", "Email cannot be blank");

    let json = serde_json::to_value(validation.errors()).unwrap();
    assert_eq!(json, serde_json::json!({ "email": "Email cannot be blank" }));
}
