//! Payload checks for create and update requests.
//!
//! Create payloads must carry every required field. Update payloads are
//! partial: each column has its own rule for when a supplied key counts as
//! "present", recorded in [`UPDATE_POLICY`].

use jiff::civil::Date;
use serde_json::{Map, Value};

use crate::{
    entities::movie_log,
    error::ValidationError,
    models::{NewMovie, date_to_store},
};

const REQUIRED_FIELDS: [&str; 3] = ["movie_name", "watch_date", "rating"];

const RATING_MIN: i64 = 0;
const RATING_MAX: i64 = 10;

const INVALID_RATING: &str = "Rating must be a valid integer";
const RATING_OUT_OF_RANGE: &str = "Rating must be between 0 and 10";
const INVALID_DATE: &str = "Invalid date format. Use YYYY-MM-DD";

pub fn validate_create(payload: &Value) -> Result<NewMovie, ValidationError> {
    let empty = Map::new();
    let fields = payload.as_object().unwrap_or(&empty);

    for field in REQUIRED_FIELDS {
        if !is_supplied(fields.get(field)) {
            return Err(ValidationError::new(format!("{field} is required")));
        }
    }

    let rating = parse_rating(&fields["rating"])?;
    let watch_date = parse_watch_date(&fields["watch_date"])?;
    let movie_name = text("movie_name", &fields["movie_name"])?;
    let review = match fields.get("review") {
        None => Some(String::new()),
        Some(value) => optional_text("review", value)?,
    };

    Ok(NewMovie { movie_name, watch_date, rating, review })
}

/// When a key supplied in an update payload is applied to its column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    /// Key present with a truthy value; `null`, `""`, `0`, `false` and empty
    /// containers are skipped silently.
    Truthy,
    /// Key present with any non-null value.
    NonNull,
    /// Key present at all, `null` included.
    KeyPresent,
}

impl Presence {
    pub fn admits(self, value: &Value) -> bool {
        match self {
            Presence::Truthy => is_truthy(value),
            Presence::NonNull => !value.is_null(),
            Presence::KeyPresent => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateField {
    MovieName,
    WatchDate,
    Rating,
    Review,
}

impl UpdateField {
    pub fn key(self) -> &'static str {
        match self {
            UpdateField::MovieName => "movie_name",
            UpdateField::WatchDate => "watch_date",
            UpdateField::Rating => "rating",
            UpdateField::Review => "review",
        }
    }

    fn assign(self, value: &Value) -> Result<Assignment, ValidationError> {
        Ok(match self {
            UpdateField::MovieName => Assignment::MovieName(text(self.key(), value)?),
            UpdateField::WatchDate => Assignment::WatchDate(parse_watch_date(value)?),
            UpdateField::Rating => Assignment::Rating(parse_rating(value)?),
            UpdateField::Review => Assignment::Review(optional_text(self.key(), value)?),
        })
    }
}

/// Evaluation order is the order of the resulting assignments. `review` is
/// the only column applied on bare key presence.
pub const UPDATE_POLICY: [(UpdateField, Presence); 4] = [
    (UpdateField::MovieName, Presence::Truthy),
    (UpdateField::WatchDate, Presence::Truthy),
    (UpdateField::Rating, Presence::NonNull),
    (UpdateField::Review, Presence::KeyPresent),
];

/// A single validated `column = value` pair of an update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Assignment {
    MovieName(String),
    WatchDate(Date),
    Rating(i32),
    Review(Option<String>),
}

impl Assignment {
    pub fn column(&self) -> movie_log::Column {
        match self {
            Assignment::MovieName(_) => movie_log::Column::MovieName,
            Assignment::WatchDate(_) => movie_log::Column::WatchDate,
            Assignment::Rating(_) => movie_log::Column::Rating,
            Assignment::Review(_) => movie_log::Column::Review,
        }
    }

    pub fn into_value(self) -> sea_orm::Value {
        match self {
            Assignment::MovieName(name) => name.into(),
            Assignment::WatchDate(date) => date_to_store(date).into(),
            Assignment::Rating(rating) => rating.into(),
            Assignment::Review(review) => review.into(),
        }
    }
}

/// Builds the ordered assignment list for a partial update.
pub fn build_update(payload: &Value) -> Result<Vec<Assignment>, ValidationError> {
    let Some(fields) = payload.as_object() else {
        return Err(ValidationError::new("No data provided"));
    };

    let mut assignments = Vec::with_capacity(UPDATE_POLICY.len());
    for (field, presence) in UPDATE_POLICY {
        let Some(value) = fields.get(field.key()) else {
            continue;
        };
        if presence.admits(value) {
            assignments.push(field.assign(value)?);
        }
    }

    if assignments.is_empty() {
        return Err(ValidationError::new("No valid fields to update"));
    }
    Ok(assignments)
}

fn is_supplied(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Accepts JSON integers, numeric strings, and fractional numbers (truncated
/// toward zero).
fn parse_rating(value: &Value) -> Result<i32, ValidationError> {
    let rating = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ValidationError::new(INVALID_RATING))?;

    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return Err(ValidationError::new(RATING_OUT_OF_RANGE));
    }
    Ok(rating as i32)
}

fn parse_watch_date(value: &Value) -> Result<Date, ValidationError> {
    value.as_str().and_then(parse_date).ok_or_else(|| ValidationError::new(INVALID_DATE))
}

/// Strict `YYYY-MM-DD` with a real calendar date.
pub fn parse_date(raw: &str) -> Option<Date> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
    if !shaped {
        return None;
    }
    raw.parse::<Date>().ok().filter(|date| date.year() >= 1)
}

fn text(field: &str, value: &Value) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ValidationError::new(format!("{field} must be a string")))
}

fn optional_text(field: &str, value: &Value) -> Result<Option<String>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        other => text(field, other).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use sea_orm::IdenStatic;
    use serde_json::json;

    use super::*;

    fn create_err(payload: Value) -> String {
        validate_create(&payload).unwrap_err().to_string()
    }

    fn update_err(payload: Value) -> String {
        build_update(&payload).unwrap_err().to_string()
    }

    #[test]
    fn create_accepts_complete_payload() {
        let movie = validate_create(&json!({
            "movie_name": "Inception",
            "watch_date": "2024-02-20",
            "rating": 8,
            "review": "Mind-bending"
        }))
        .unwrap();

        assert_eq!(movie.movie_name, "Inception");
        assert_eq!(movie.watch_date, date(2024, 2, 20));
        assert_eq!(movie.rating, 8);
        assert_eq!(movie.review.as_deref(), Some("Mind-bending"));
    }

    #[test]
    fn create_defaults_absent_review_to_empty() {
        let movie =
            validate_create(&json!({"movie_name": "X", "watch_date": "2024-05-01", "rating": 7}))
                .unwrap();
        assert_eq!(movie.review.as_deref(), Some(""));

        let movie = validate_create(
            &json!({"movie_name": "X", "watch_date": "2024-05-01", "rating": 7, "review": null}),
        )
        .unwrap();
        assert_eq!(movie.review, None);
    }

    #[test]
    fn create_reports_first_missing_field() {
        assert_eq!(create_err(json!({})), "movie_name is required");
        assert_eq!(create_err(json!(null)), "movie_name is required");
        assert_eq!(
            create_err(json!({"movie_name": "", "watch_date": "2024-01-01", "rating": 5})),
            "movie_name is required"
        );
        assert_eq!(
            create_err(json!({"movie_name": "X", "watch_date": null, "rating": 5})),
            "watch_date is required"
        );
        assert_eq!(
            create_err(json!({"movie_name": "X", "watch_date": "2024-01-01"})),
            "rating is required"
        );
        assert_eq!(
            create_err(json!({"movie_name": "X", "watch_date": "2024-01-01", "rating": ""})),
            "rating is required"
        );
    }

    #[test]
    fn zero_rating_counts_as_supplied_on_create() {
        let movie =
            validate_create(&json!({"movie_name": "X", "watch_date": "2024-01-01", "rating": 0}))
                .unwrap();
        assert_eq!(movie.rating, 0);
    }

    #[test]
    fn rating_bounds_and_parsing() {
        let base = |rating: Value| json!({"movie_name": "X", "watch_date": "2024-01-01", "rating": rating});

        assert_eq!(create_err(base(json!(11))), RATING_OUT_OF_RANGE);
        assert_eq!(create_err(base(json!(-1))), RATING_OUT_OF_RANGE);
        assert_eq!(create_err(base(json!("abc"))), INVALID_RATING);
        assert_eq!(create_err(base(json!("7.5"))), INVALID_RATING);
        assert_eq!(create_err(base(json!(true))), INVALID_RATING);
        assert_eq!(create_err(base(json!([7]))), INVALID_RATING);

        assert_eq!(validate_create(&base(json!(10))).unwrap().rating, 10);
        assert_eq!(validate_create(&base(json!(" 6 "))).unwrap().rating, 6);
        assert_eq!(validate_create(&base(json!(7.9))).unwrap().rating, 7);
    }

    #[test]
    fn rating_is_checked_before_date() {
        assert_eq!(
            create_err(json!({"movie_name": "X", "watch_date": "nope", "rating": 42})),
            RATING_OUT_OF_RANGE
        );
    }

    #[test]
    fn date_must_be_strict_calendar_date() {
        assert_eq!(parse_date("2024-01-15"), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("2024-02-29"), Some(date(2024, 2, 29)));

        for raw in [
            "2023-02-29",
            "2024-13-01",
            "2024-04-31",
            "2024-1-15",
            "24-01-15",
            "2024/01/15",
            "2024-01-15T00:00",
            "20240115",
            "0000-01-01",
            "",
        ] {
            assert_eq!(parse_date(raw), None, "{raw} should be rejected");
        }

        assert_eq!(
            create_err(json!({"movie_name": "X", "watch_date": "01/15/2024", "rating": 5})),
            INVALID_DATE
        );
        assert_eq!(
            create_err(json!({"movie_name": "X", "watch_date": 20240115, "rating": 5})),
            INVALID_DATE
        );
    }

    #[test]
    fn policy_keeps_review_asymmetry_visible() {
        assert_eq!(
            UPDATE_POLICY.map(|(field, _)| field),
            [UpdateField::MovieName, UpdateField::WatchDate, UpdateField::Rating, UpdateField::Review]
        );
        assert!(!Presence::Truthy.admits(&json!("")));
        assert!(!Presence::Truthy.admits(&json!(0)));
        assert!(Presence::NonNull.admits(&json!(0)));
        assert!(!Presence::NonNull.admits(&Value::Null));
        assert!(Presence::KeyPresent.admits(&Value::Null));
        assert!(Presence::KeyPresent.admits(&json!("")));
    }

    #[test]
    fn update_preserves_field_order() {
        let assignments = build_update(&json!({
            "review": "Better the second time",
            "rating": "9",
            "watch_date": "2024-03-10",
            "movie_name": "The Dark Knight"
        }))
        .unwrap();

        assert_eq!(
            assignments,
            vec![
                Assignment::MovieName("The Dark Knight".to_string()),
                Assignment::WatchDate(date(2024, 3, 10)),
                Assignment::Rating(9),
                Assignment::Review(Some("Better the second time".to_string())),
            ]
        );
        assert_eq!(
            assignments.iter().map(|a| a.column().as_str().to_owned()).collect::<Vec<_>>(),
            vec!["movie_name", "watch_date", "rating", "review"]
        );
    }

    #[test]
    fn update_skips_falsy_name_and_date() {
        let assignments =
            build_update(&json!({"movie_name": "", "watch_date": null, "rating": 0})).unwrap();
        assert_eq!(assignments, vec![Assignment::Rating(0)]);
    }

    #[test]
    fn update_review_applies_on_presence_alone() {
        assert_eq!(
            build_update(&json!({"review": ""})).unwrap(),
            vec![Assignment::Review(Some(String::new()))]
        );
        assert_eq!(build_update(&json!({"review": null})).unwrap(), vec![Assignment::Review(None)]);
    }

    #[test]
    fn update_without_qualifying_fields_is_rejected() {
        assert_eq!(update_err(json!({})), "No valid fields to update");
        assert_eq!(
            update_err(json!({"movie_name": "", "watch_date": "", "rating": null})),
            "No valid fields to update"
        );
        assert_eq!(update_err(json!({"unrelated": 1})), "No valid fields to update");
        assert_eq!(update_err(json!(null)), "No data provided");
        assert_eq!(update_err(json!([1, 2])), "No data provided");
    }

    #[test]
    fn update_invalid_field_aborts_whole_request() {
        assert_eq!(update_err(json!({"movie_name": "X", "watch_date": "2024-02-30"})), INVALID_DATE);
        assert_eq!(update_err(json!({"movie_name": "X", "rating": 11})), RATING_OUT_OF_RANGE);
        assert_eq!(update_err(json!({"rating": "ten"})), INVALID_RATING);
        assert_eq!(update_err(json!({"review": 5})), "review must be a string");
    }

    #[test]
    fn date_assignment_binds_iso_text() {
        assert_eq!(
            Assignment::WatchDate(date(2024, 1, 15)).into_value(),
            sea_orm::Value::String(Some(Box::new("2024-01-15".to_string())))
        );
    }
}
