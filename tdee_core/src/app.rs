//! Application state for the calculator form and history view.
//!
//! `App` owns the mutable copy of everything a front end renders: the raw
//! form, the current field errors, the most recent result, the history log,
//! and which of the two views is showing. The pieces underneath (validate,
//! calculate, append_history) stay pure; this layer sequences them and
//! holds the storage handle.

use crate::engine;
use crate::history::{append_history, load_history};
use crate::store::HistoryStore;
use crate::types::{ActivityLevel, Gender, HistoryEntry, TdeeForm};
use crate::validate::{validate, Field, FieldErrors};
use chrono::Utc;

/// Notification title shown when a submit is rejected
pub const INVALID_INPUT_TITLE: &str = "Invalid Input";

/// Notification body shown when a submit is rejected
pub const INVALID_INPUT_MESSAGE: &str = "Please check all fields and try again.";

/// Owns the calculator state and the storage handle
pub struct App<S: HistoryStore> {
    store: S,
    form: TdeeForm,
    errors: FieldErrors,
    tdee: Option<u32>,
    history: Vec<HistoryEntry>,
    show_history: bool,
}

impl<S: HistoryStore> App<S> {
    /// Create the app and perform the one startup read of the history log
    pub fn new(store: S) -> Self {
        let history = load_history(&store);
        Self {
            store,
            form: TdeeForm::default(),
            errors: FieldErrors::new(),
            tdee: None,
            history,
            show_history: false,
        }
    }

    /// Replace a numeric form field and dismiss its pending error.
    ///
    /// Editing a field withdraws that field's message immediately, before
    /// any resubmit; errors on other fields stay put.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Age => self.form.age = value,
            Field::Weight => self.form.weight = value,
            Field::Height => self.form.height = value,
        }
        self.errors.remove(&field);
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.form.gender = gender;
    }

    pub fn set_activity(&mut self, activity: ActivityLevel) {
        self.form.activity = activity;
    }

    /// Submit the current form.
    ///
    /// On success the new TDEE is recorded and returned, and the entry is
    /// prepended to the history; persistence trouble is swallowed by the
    /// history layer, so the result survives a failed save. On validation
    /// failure the error mapping is stored for rendering and None comes
    /// back, with the previous result left untouched.
    pub fn submit(&mut self) -> Option<u32> {
        match validate(&self.form) {
            Ok(input) => {
                self.errors.clear();
                let entry = engine::calculate(&input, Utc::now());
                self.history = append_history(&mut self.store, entry, &self.history);
                self.tdee = Some(entry.tdee);
                Some(entry.tdee)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    /// Switch between the calculator form and the history view
    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
    }

    pub fn form(&self) -> &TdeeForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Most recent successful result, if any
    pub fn tdee(&self) -> Option<u32> {
        self.tdee
    }

    /// Current history log, newest first
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn showing_history(&self) -> bool {
        self.show_history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HISTORY_KEY;
    use crate::store::MemoryStore;
    use crate::{Error, Result};

    struct FailingStore;

    impl HistoryStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Storage("read refused".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("write refused".to_string()))
        }
    }

    fn app() -> App<MemoryStore> {
        App::new(MemoryStore::new())
    }

    fn fill_valid(app: &mut App<impl HistoryStore>) {
        app.set_field(Field::Age, "25");
        app.set_field(Field::Weight, "70");
        app.set_field(Field::Height, "175");
        app.set_gender(Gender::Male);
        app.set_activity(ActivityLevel::Sedentary);
    }

    #[test]
    fn test_submit_valid_form() {
        let mut app = app();
        fill_valid(&mut app);

        assert_eq!(app.submit(), Some(2009));
        assert_eq!(app.tdee(), Some(2009));
        assert!(app.errors().is_empty());
        assert_eq!(app.history().len(), 1);
        assert_eq!(app.history()[0].tdee, 2009);
    }

    #[test]
    fn test_submit_invalid_form_sets_errors() {
        let mut app = app();
        app.set_field(Field::Age, "14");

        assert_eq!(app.submit(), None);
        assert_eq!(app.tdee(), None);
        assert_eq!(app.errors().len(), 3);
        assert!(app.history().is_empty());
    }

    #[test]
    fn test_invalid_submit_keeps_previous_result() {
        let mut app = app();
        fill_valid(&mut app);
        app.submit();

        app.set_field(Field::Age, "nope");
        assert_eq!(app.submit(), None);

        assert_eq!(app.tdee(), Some(2009));
        assert_eq!(app.history().len(), 1);
    }

    #[test]
    fn test_editing_a_field_clears_only_its_error() {
        let mut app = app();
        app.submit();
        assert_eq!(app.errors().len(), 3);

        app.set_field(Field::Age, "30");
        assert_eq!(app.errors().len(), 2);
        assert!(!app.errors().contains_key(&Field::Age));
        assert!(app.errors().contains_key(&Field::Weight));
        assert!(app.errors().contains_key(&Field::Height));
    }

    #[test]
    fn test_successful_submit_clears_stale_errors() {
        let mut app = app();
        app.submit();
        assert!(!app.errors().is_empty());

        fill_valid(&mut app);
        // Only age/weight/height edits clear errors individually, but a
        // passing submit resets the whole mapping
        assert_eq!(app.submit(), Some(2009));
        assert!(app.errors().is_empty());
    }

    #[test]
    fn test_submit_persists_through_store() {
        let mut app = app();
        fill_valid(&mut app);
        app.submit();

        let App { store, .. } = app;
        let payload = store.get(HISTORY_KEY).unwrap().expect("history saved");
        let entries: Vec<HistoryEntry> = serde_json::from_str(&payload).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tdee, 2009);
    }

    #[test]
    fn test_new_app_loads_existing_history() {
        let mut seeded = MemoryStore::new();
        seeded
            .set(
                HISTORY_KEY,
                r#"[{"age":25,"gender":"female","weight":60.0,"height":165.0,"activityLevel":1.55,"tdee":2085,"date":1700000000000}]"#,
            )
            .unwrap();

        let app = App::new(seeded);
        assert_eq!(app.history().len(), 1);
        assert_eq!(app.history()[0].tdee, 2085);
    }

    #[test]
    fn test_save_failure_still_returns_result() {
        let mut app = App::new(FailingStore);
        fill_valid(&mut app);

        assert_eq!(app.submit(), Some(2009));
        assert_eq!(app.tdee(), Some(2009));
        // The entry was dropped, so the in-memory log matches storage
        assert!(app.history().is_empty());
    }

    #[test]
    fn test_toggle_history_flips_view() {
        let mut app = app();
        assert!(!app.showing_history());

        app.toggle_history();
        assert!(app.showing_history());

        app.toggle_history();
        assert!(!app.showing_history());
    }

    #[test]
    fn test_resubmit_after_correction() {
        let mut app = app();
        fill_valid(&mut app);
        app.set_field(Field::Weight, "29");

        assert_eq!(app.submit(), None);
        assert_eq!(
            app.errors()[&Field::Weight],
            "Weight must be between 30 and 300 kg"
        );

        app.set_field(Field::Weight, "70");
        assert_eq!(app.submit(), Some(2009));
        assert!(app.errors().is_empty());
    }
}
