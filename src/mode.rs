// Game mode offered within a slot, with its vote tally

use crate::coerce::{CoercionError, IntegerInput};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mode {
    token: String,
    label: String,
    description: String,
    min_attendance: Option<i64>,
    max_attendance: Option<i64>,
    votes: i64,
}

impl Mode {
    pub fn builder() -> ModeBuilder {
        ModeBuilder::default()
    }

    pub fn to_builder(&self) -> ModeBuilder {
        ModeBuilder {
            mode: self.clone(),
            error: None,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn min_attendance(&self) -> Option<i64> {
        self.min_attendance
    }

    pub fn max_attendance(&self) -> Option<i64> {
        self.max_attendance
    }

    pub fn votes(&self) -> i64 {
        self.votes
    }
}

// Builder keeping the first coercion failure; reported by `build`
#[derive(Debug, Clone, Default)]
pub struct ModeBuilder {
    mode: Mode,
    error: Option<CoercionError>,
}

impl ModeBuilder {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.mode.token = token.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.mode.label = label.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.mode.description = description.into();
        self
    }

    pub fn min_attendance(mut self, value: impl IntegerInput) -> Self {
        if let Some(value) = self.nullable("minAttendance", value) {
            self.mode.min_attendance = value;
        }
        self
    }

    pub fn max_attendance(mut self, value: impl IntegerInput) -> Self {
        if let Some(value) = self.nullable("maxAttendance", value) {
            self.mode.max_attendance = value;
        }
        self
    }

    pub fn votes(mut self, value: impl IntegerInput) -> Self {
        match value.to_integer() {
            Some(votes) => self.mode.votes = votes,
            None => self.fail(CoercionError::not_an_integer("votes", &value)),
        }
        self
    }

    pub fn build(self) -> Result<Mode, CoercionError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.mode),
        }
    }

    fn nullable(&mut self, field: &'static str, value: impl IntegerInput) -> Option<Option<i64>> {
        if value.is_null() {
            return Some(None);
        }
        match value.to_integer() {
            Some(number) => Some(Some(number)),
            None => {
                self.fail(CoercionError::not_an_integer(field, &value));
                None
            }
        }
    }

    fn fail(&mut self, err: CoercionError) {
        self.error.get_or_insert(err);
    }
}
