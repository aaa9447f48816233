use std::mem;

use tracing::warn;

use city_manager_core::types::{City, CityFormData, CityId, StateSnapshot};
use city_manager_store::{CityStore, StoreError};

use crate::notify::{Notification, NotificationSink};

/// Observable state of the add/edit form.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    /// No form is open.
    Idle,
    /// An empty form is open for a new city.
    Adding,
    /// The form is open for an existing city, pre-populated with the field
    /// values captured when the form was opened.
    Editing { id: CityId, initial: CityFormData },
}

impl EditorState {
    pub fn form_visible(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn editing_target(&self) -> Option<&CityId> {
        match self {
            Self::Editing { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Outcome of a form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(City),
    Updated(City),
    /// The submission arrived with no form open; nothing was mutated.
    Ignored,
}

/// Tracks which record, if any, is being edited and routes form submissions
/// and deletions against the store.
pub struct EditCoordinator<S> {
    store: CityStore,
    state: EditorState,
    sink: S,
}

impl<S: NotificationSink> EditCoordinator<S> {
    pub fn new(store: CityStore, sink: S) -> Self {
        Self {
            store,
            state: EditorState::Idle,
            sink,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn form_visible(&self) -> bool {
        self.state.form_visible()
    }

    pub fn editing_target(&self) -> Option<&CityId> {
        self.state.editing_target()
    }

    pub fn store(&self) -> &CityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CityStore {
        &mut self.store
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.store.snapshot()
    }

    /// Opens an empty form for a new city.
    pub fn open_add_form(&mut self) {
        self.state = EditorState::Adding;
    }

    /// Opens the form pre-populated with the city's current field values.
    ///
    /// The values are captured at the moment of the transition; later store
    /// mutations do not retroactively update an already-open form.
    pub fn open_edit_form(&mut self, id: &CityId) -> Result<(), StoreError> {
        let city = self
            .store
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.state = EditorState::Editing {
            id: city.id.clone(),
            initial: city.form_data(),
        };
        Ok(())
    }

    /// Dismisses the form, discarding unsaved data.
    pub fn cancel(&mut self) {
        self.state = EditorState::Idle;
    }

    /// Routes a submission to create or update depending on the open form.
    ///
    /// On a store error the form state is restored so the caller can correct
    /// the submitted data and retry.
    pub fn submit(&mut self, data: CityFormData) -> Result<SubmitOutcome, StoreError> {
        match mem::replace(&mut self.state, EditorState::Idle) {
            EditorState::Idle => Ok(SubmitOutcome::Ignored),
            EditorState::Adding => match self.store.create(data) {
                Ok(city) => {
                    self.sink.notify(&Notification::success(
                        "City added successfully",
                        format!("{} has been added to the list.", city.name),
                    ));
                    Ok(SubmitOutcome::Created(city))
                }
                Err(err) => {
                    self.state = EditorState::Adding;
                    Err(err)
                }
            },
            EditorState::Editing { id, initial } => match self.store.update(&id, data) {
                Ok(city) => {
                    self.sink.notify(&Notification::success(
                        "City updated successfully",
                        format!("{} has been updated.", city.name),
                    ));
                    Ok(SubmitOutcome::Updated(city))
                }
                Err(err) => {
                    self.state = EditorState::Editing { id, initial };
                    Err(err)
                }
            },
        }
    }

    /// Deletes a city; a missing id is a benign no-op.
    ///
    /// Deleting the record behind an open edit form closes the form so no
    /// dangling editing target survives the removal.
    pub fn delete_city(&mut self, id: &CityId) -> Option<City> {
        match self.store.delete(id) {
            Ok(removed) => {
                if self.state.editing_target() == Some(id) {
                    self.state = EditorState::Idle;
                }
                self.sink.notify(&Notification::success(
                    "City deleted",
                    format!("{} has been removed.", removed.name),
                ));
                Some(removed)
            }
            Err(err) => {
                warn!(id = %id, error = %err, "delete skipped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use city_manager_core::types::ValidationError;

    use super::*;

    /// Sink that records delivered notifications for assertions.
    #[derive(Clone, Default)]
    struct RecordingSink {
        delivered: Rc<RefCell<Vec<Notification>>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&mut self, notification: &Notification) {
            self.delivered.borrow_mut().push(notification.clone());
        }
    }

    fn form_data(name: &str, population: u64) -> CityFormData {
        CityFormData {
            name: name.to_string(),
            country: "Norway".to_string(),
            population,
            timezone: "CET".to_string(),
        }
    }

    fn coordinator() -> (EditCoordinator<RecordingSink>, RecordingSink) {
        let sink = RecordingSink::default();
        (EditCoordinator::new(CityStore::new(), sink.clone()), sink)
    }

    #[test]
    fn starts_idle_with_no_form() {
        let (coordinator, _) = coordinator();
        assert_eq!(*coordinator.state(), EditorState::Idle);
        assert!(!coordinator.form_visible());
        assert!(coordinator.editing_target().is_none());
    }

    #[test]
    fn submit_in_adding_creates_and_notifies() {
        let (mut coordinator, sink) = coordinator();
        coordinator.open_add_form();
        assert!(coordinator.form_visible());

        let outcome = coordinator
            .submit(form_data("Oslo", 700_000))
            .expect("submit succeeds");

        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert_eq!(*coordinator.state(), EditorState::Idle);
        assert_eq!(coordinator.store().len(), 1);

        let delivered = sink.delivered.borrow();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].title, "City added successfully");
        assert_eq!(delivered[0].message, "Oslo has been added to the list.");
    }

    #[test]
    fn submit_in_editing_updates_and_notifies() {
        let (mut coordinator, sink) = coordinator();
        coordinator.open_add_form();
        coordinator
            .submit(form_data("Oslo", 700_000))
            .expect("create succeeds");
        let id = coordinator.store().list()[0].id.clone();

        coordinator.open_edit_form(&id).expect("city exists");
        assert_eq!(coordinator.editing_target(), Some(&id));

        let outcome = coordinator
            .submit(form_data("Oslo", 720_000))
            .expect("submit succeeds");

        assert!(matches!(outcome, SubmitOutcome::Updated(_)));
        assert_eq!(*coordinator.state(), EditorState::Idle);
        assert_eq!(coordinator.store().list()[0].population, 720_000);
        assert_eq!(
            sink.delivered.borrow().last().map(|n| n.title.clone()),
            Some("City updated successfully".to_string())
        );
    }

    #[test]
    fn submit_while_idle_is_ignored() {
        let (mut coordinator, sink) = coordinator();

        let outcome = coordinator
            .submit(form_data("Oslo", 700_000))
            .expect("idle submit is not an error");

        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(coordinator.store().is_empty());
        assert!(sink.delivered.borrow().is_empty());
    }

    #[test]
    fn failed_submit_keeps_the_form_open() {
        let (mut coordinator, _) = coordinator();
        coordinator.open_add_form();

        let err = coordinator
            .submit(form_data("", 700_000))
            .expect_err("blank name rejected");

        assert_eq!(
            err,
            StoreError::Validation(ValidationError::EmptyField("name"))
        );
        assert_eq!(*coordinator.state(), EditorState::Adding);
        assert!(coordinator.store().is_empty());
    }

    #[test]
    fn open_edit_form_captures_current_values() {
        let (mut coordinator, _) = coordinator();
        coordinator.open_add_form();
        coordinator
            .submit(form_data("Oslo", 700_000))
            .expect("create succeeds");
        let id = coordinator.store().list()[0].id.clone();

        coordinator.open_edit_form(&id).expect("city exists");
        // Mutating the store behind the coordinator must not change the
        // captured form values.
        coordinator
            .store_mut()
            .update(&id, form_data("Oslo", 999_999))
            .expect("update succeeds");

        match coordinator.state() {
            EditorState::Editing { initial, .. } => assert_eq!(initial.population, 700_000),
            other => panic!("expected editing state, got {other:?}"),
        }
    }

    #[test]
    fn open_edit_form_for_missing_city_errors() {
        let (mut coordinator, _) = coordinator();
        let missing = CityId::new("missing");
        let err = coordinator
            .open_edit_form(&missing)
            .expect_err("missing id rejected");
        assert_eq!(err, StoreError::NotFound(missing));
        assert_eq!(*coordinator.state(), EditorState::Idle);
    }

    #[test]
    fn cancel_discards_any_open_form() {
        let (mut coordinator, _) = coordinator();
        coordinator.open_add_form();
        coordinator.cancel();
        assert_eq!(*coordinator.state(), EditorState::Idle);
    }

    #[test]
    fn deleting_the_edited_city_returns_to_idle() {
        let (mut coordinator, _) = coordinator();
        coordinator.open_add_form();
        coordinator
            .submit(form_data("Oslo", 700_000))
            .expect("create succeeds");
        let id = coordinator.store().list()[0].id.clone();

        coordinator.open_edit_form(&id).expect("city exists");
        let removed = coordinator.delete_city(&id);

        assert!(removed.is_some());
        assert_eq!(*coordinator.state(), EditorState::Idle);
        assert!(coordinator.editing_target().is_none());
        assert!(coordinator.store().is_empty());
    }

    #[test]
    fn deleting_an_unrelated_city_keeps_the_form_open() {
        let (mut coordinator, _) = coordinator();
        coordinator.open_add_form();
        coordinator
            .submit(form_data("Oslo", 700_000))
            .expect("create succeeds");
        coordinator.open_add_form();
        coordinator
            .submit(form_data("Bergen", 280_000))
            .expect("create succeeds");
        let oslo = coordinator.store().list()[0].id.clone();
        let bergen = coordinator.store().list()[1].id.clone();

        coordinator.open_edit_form(&oslo).expect("city exists");
        coordinator.delete_city(&bergen);

        assert_eq!(coordinator.editing_target(), Some(&oslo));
    }

    #[test]
    fn deleting_a_missing_city_is_a_benign_no_op() {
        let (mut coordinator, sink) = coordinator();
        coordinator.open_add_form();
        coordinator
            .submit(form_data("Oslo", 700_000))
            .expect("create succeeds");

        let missing = CityId::new("missing");
        let removed = coordinator.delete_city(&missing);

        assert!(removed.is_none());
        assert_eq!(coordinator.store().len(), 1);
        // Only the create notification was delivered.
        assert_eq!(sink.delivered.borrow().len(), 1);
    }

    #[test]
    fn delete_notification_references_the_city_name() {
        let (mut coordinator, sink) = coordinator();
        coordinator.open_add_form();
        coordinator
            .submit(form_data("Oslo", 700_000))
            .expect("create succeeds");
        let id = coordinator.store().list()[0].id.clone();

        coordinator.delete_city(&id);

        let delivered = sink.delivered.borrow();
        let last = delivered.last().expect("delete notification delivered");
        assert_eq!(last.title, "City deleted");
        assert_eq!(last.message, "Oslo has been removed.");
    }
}
