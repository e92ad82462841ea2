use my_space_domain::{reconcile, Credentials, ImageRecord, PendingSet, Session, User};
use tracing::{debug, info, warn};

use crate::{
    ApplicationError, CurrentSessionQuery, DeleteImageCommand, EndSessionCommand, GalleryView,
    ImageHost, LoginCommand, LogoutCommand, NotificationKind, PrepareUploadCommand,
    RefreshGalleryCommand, SessionStore, UploadFile, UploadImageCommand, UploadSource,
    UploadTracker,
};

pub const USER_KEY: &str = "my_space_user";
pub const PENDING_UPLOADS_KEY: &str = "temp_uploaded_images";

const USER_ID: &str = "usr_1";

pub struct ApplicationService {
    host: Box<dyn ImageHost>,
    store: Box<dyn SessionStore>,
    uploads: Box<dyn UploadSource>,
    credentials: Credentials,
}

impl ApplicationService {
    pub fn new(
        host: Box<dyn ImageHost>,
        store: Box<dyn SessionStore>,
        uploads: Box<dyn UploadSource>,
        credentials: Credentials,
    ) -> Self {
        Self {
            host,
            store,
            uploads,
            credentials,
        }
    }

    pub fn login(&self, command: LoginCommand) -> Result<Session, ApplicationError> {
        if command.email.is_empty() || command.password.is_empty() {
            return Err(ApplicationError::InvalidCredentials(
                "Credentials required".to_string(),
            ));
        }
        if self.credentials.is_blank()
            || !self.credentials.matches(&command.email, &command.password)
        {
            debug!(email = %command.email, "login rejected");
            return Err(ApplicationError::InvalidCredentials(
                "Invalid email or password".to_string(),
            ));
        }

        let user = User::from_email(USER_ID, &command.email);
        let user_json = serde_json::to_string(&user)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))?;
        self.store.set(USER_KEY, &user_json)?;
        info!(user = %user.email, "signed in");

        Ok(session_for(user))
    }

    pub fn logout(&self, _command: LogoutCommand) -> Result<(), ApplicationError> {
        self.store.remove(USER_KEY)
    }

    pub fn end_session(&self, _command: EndSessionCommand) -> Result<(), ApplicationError> {
        self.store.clear()
    }

    pub fn current_session(
        &self,
        _query: CurrentSessionQuery,
    ) -> Result<Option<Session>, ApplicationError> {
        let Some(raw) = self.store.get(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Ok(Some(session_for(user))),
            Err(error) => {
                warn!("discarding unreadable stored user: {error}");
                Ok(None)
            }
        }
    }

    pub fn prepare_upload(
        &self,
        command: PrepareUploadCommand,
    ) -> Result<Vec<UploadFile>, ApplicationError> {
        if command.path.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "upload path must not be empty".to_string(),
            ));
        }
        let files = self.uploads.collect_images(&command.path)?;
        if files.is_empty() {
            return Err(ApplicationError::InvalidInput(format!(
                "no image files found under {}",
                command.path
            )));
        }
        Ok(files)
    }

    pub fn upload_image(
        &self,
        session: &Session,
        command: UploadImageCommand,
        tracker: &UploadTracker,
    ) -> Result<ImageRecord, ApplicationError> {
        let file = command.file;
        debug!(user = %session.user.email, file = %file.file_name, bytes = file.size(), "uploading");
        tracker.begin(file.size());

        let record = match self.host.upload(&file, tracker.sink()) {
            Ok(record) => record,
            Err(error) => {
                tracker.fail(error.to_string());
                return Err(error);
            }
        };

        let mut pending = self.load_pending();
        pending.push_front(record.clone());
        if let Err(error) = self.save_pending(&pending) {
            warn!(image = %record.id, "uploaded image not remembered as pending: {error}");
        }

        info!(image = %record.id, "upload finished");
        tracker.succeed(record.clone());
        Ok(record)
    }

    /// Merges pending uploads with the host listing. Storage and listing
    /// failures degrade to whatever data is still available.
    pub fn refresh_gallery(
        &self,
        session: &Session,
        _command: RefreshGalleryCommand,
    ) -> Vec<ImageRecord> {
        let pending = self.load_pending();
        let listing = match self.host.list() {
            Ok(listing) => listing,
            Err(error) => {
                warn!(user = %session.user.email, "showing pending uploads only: {error}");
                Vec::new()
            }
        };

        let result = reconcile(&pending, &listing);
        let confirmed = result.confirmed(&pending);
        if confirmed > 0 {
            debug!(confirmed, "pending uploads confirmed by listing");
            if let Err(error) = self.save_pending(&result.pending) {
                warn!("could not prune pending uploads: {error}");
            }
        }

        result.merged
    }

    pub fn delete_image(
        &self,
        session: &Session,
        view: &mut GalleryView,
        command: DeleteImageCommand,
    ) -> Result<(), ApplicationError> {
        let view_before = view.snapshot();
        let Some(removed) = view.remove(&command.image_id) else {
            return Err(ApplicationError::InvalidInput(format!(
                "image {} is not in the gallery",
                command.image_id
            )));
        };

        let pending_before = self.load_pending();
        let mut pending = pending_before.clone();
        let was_pending = pending.remove(&command.image_id).is_some();
        if was_pending {
            if let Err(error) = self.save_pending(&pending) {
                warn!(image = %command.image_id, "could not drop pending upload: {error}");
            }
        }

        match self.host.delete(&command.image_id) {
            Ok(()) => {
                info!(user = %session.user.email, image = %command.image_id, "image deleted");
                view.notify(
                    NotificationKind::Success,
                    format!("\"{}\" deleted successfully", removed.name),
                );
                Ok(())
            }
            Err(error) => {
                warn!(image = %command.image_id, "rolling back delete: {error}");
                view.restore(view_before);
                if was_pending {
                    if let Err(error) = self.save_pending(&pending_before) {
                        warn!("could not restore pending upload: {error}");
                    }
                }
                view.notify(NotificationKind::Error, "Failed to delete image");
                Err(error)
            }
        }
    }

    pub fn pending_uploads(&self, _session: &Session) -> PendingSet {
        self.load_pending()
    }

    fn load_pending(&self) -> PendingSet {
        let raw = match self.store.get(PENDING_UPLOADS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PendingSet::new(),
            Err(error) => {
                warn!("pending uploads unavailable: {error}");
                return PendingSet::new();
            }
        };
        let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(error) => {
                warn!("discarding unreadable pending uploads: {error}");
                return PendingSet::new();
            }
        };

        let records: Vec<ImageRecord> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<ImageRecord>(entry) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!("skipping malformed pending upload: {error}");
                    None
                }
            })
            .collect();
        PendingSet::from(records)
    }

    fn save_pending(&self, pending: &PendingSet) -> Result<(), ApplicationError> {
        let json = serde_json::to_string(pending)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))?;
        self.store.set(PENDING_UPLOADS_KEY, &json)
    }
}

fn session_for(user: User) -> Session {
    let token = format!("tok_{}", user.id);
    Session { user, token }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use my_space_domain::{ImageId, UploadProgress, UploadState, UploadedAt};

    use super::*;
    use crate::ProgressSink;

    #[derive(Default, Clone)]
    struct FakeStore {
        entries: Rc<RefCell<HashMap<String, String>>>,
    }

    impl SessionStore for FakeStore {
        fn get(&self, key: &str) -> Result<Option<String>, ApplicationError> {
            Ok(self.entries.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), ApplicationError> {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), ApplicationError> {
            self.entries.borrow_mut().remove(key);
            Ok(())
        }

        fn clear(&self) -> Result<(), ApplicationError> {
            self.entries.borrow_mut().clear();
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    struct FakeHost {
        listing: Rc<RefCell<Vec<ImageRecord>>>,
        listing_fails: Rc<Cell<bool>>,
        upload_fails: Rc<Cell<bool>>,
        delete_fails: Rc<Cell<bool>>,
        deleted: Rc<RefCell<Vec<ImageId>>>,
    }

    impl ImageHost for FakeHost {
        fn upload(
            &self,
            file: &UploadFile,
            progress: ProgressSink,
        ) -> Result<ImageRecord, ApplicationError> {
            if self.upload_fails.get() {
                return Err(ApplicationError::Upload("status 400".to_string()));
            }
            progress(UploadProgress {
                sent: file.size(),
                total: file.size(),
            });
            let id = ImageId::new(file.file_name.trim_end_matches(".jpg"))?;
            Ok(ImageRecord::new(
                id.clone(),
                format!("https://host/{id}.jpg"),
                Some(UploadedAt::parse("2024-06-01T00:00:00Z")?),
            )
            .with_size(file.size()))
        }

        fn list(&self) -> Result<Vec<ImageRecord>, ApplicationError> {
            if self.listing_fails.get() {
                return Err(ApplicationError::ListingFetch("status 500".to_string()));
            }
            Ok(self.listing.borrow().clone())
        }

        fn delete(&self, image_id: &ImageId) -> Result<(), ApplicationError> {
            if self.delete_fails.get() {
                return Err(ApplicationError::Delete("status 401".to_string()));
            }
            self.deleted.borrow_mut().push(image_id.clone());
            Ok(())
        }
    }

    struct FakeUploads {
        files: Vec<UploadFile>,
    }

    impl UploadSource for FakeUploads {
        fn collect_images(&self, _path: &str) -> Result<Vec<UploadFile>, ApplicationError> {
            Ok(self.files.clone())
        }
    }

    struct Harness {
        service: ApplicationService,
        host: FakeHost,
        store: FakeStore,
    }

    fn harness() -> Harness {
        let host = FakeHost::default();
        let store = FakeStore::default();
        let service = ApplicationService::new(
            Box::new(host.clone()),
            Box::new(store.clone()),
            Box::new(FakeUploads {
                files: vec![jpeg("beach.jpg")],
            }),
            Credentials::new("me@example.com", "secret"),
        );
        Harness {
            service,
            host,
            store,
        }
    }

    fn jpeg(name: &str) -> UploadFile {
        UploadFile {
            file_name: name.to_string(),
            mime_type: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        }
    }

    fn record(id: &str, uploaded_at: &str, url: &str) -> ImageRecord {
        ImageRecord::new(
            ImageId::new(id).expect("id"),
            url,
            Some(UploadedAt::parse(uploaded_at).expect("timestamp")),
        )
    }

    fn sign_in(harness: &Harness) -> Session {
        harness
            .service
            .login(LoginCommand {
                email: "me@example.com".to_string(),
                password: "secret".to_string(),
            })
            .expect("login should work")
    }

    fn stored_pending(store: &FakeStore) -> Vec<String> {
        let raw = store
            .entries
            .borrow()
            .get(PENDING_UPLOADS_KEY)
            .cloned()
            .unwrap_or_else(|| "[]".to_string());
        let pending: PendingSet = serde_json::from_str(&raw).expect("pending json");
        pending.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn login_stores_user_and_logout_clears_it() {
        let harness = harness();
        let session = sign_in(&harness);
        assert_eq!(session.user.name, "me");

        let restored = harness
            .service
            .current_session(CurrentSessionQuery)
            .expect("query")
            .expect("session present");
        assert_eq!(restored, session);

        harness.service.logout(LogoutCommand).expect("logout");
        assert!(harness
            .service
            .current_session(CurrentSessionQuery)
            .expect("query")
            .is_none());
    }

    #[test]
    fn end_session_forgets_pending_uploads() {
        let harness = harness();
        let session = sign_in(&harness);
        harness
            .service
            .upload_image(
                &session,
                UploadImageCommand {
                    file: jpeg("beach.jpg"),
                },
                &UploadTracker::new(),
            )
            .expect("upload");
        assert_eq!(harness.service.pending_uploads(&session).len(), 1);

        harness
            .service
            .end_session(EndSessionCommand)
            .expect("end session");

        assert!(harness.store.entries.borrow().is_empty());
    }

    #[test]
    fn wrong_credentials_write_no_session() {
        let harness = harness();
        let result = harness.service.login(LoginCommand {
            email: "me@example.com".to_string(),
            password: "nope".to_string(),
        });
        assert!(matches!(
            result,
            Err(ApplicationError::InvalidCredentials(ref msg)) if msg == "Invalid email or password"
        ));

        let empty = harness.service.login(LoginCommand {
            email: String::new(),
            password: "secret".to_string(),
        });
        assert!(matches!(
            empty,
            Err(ApplicationError::InvalidCredentials(ref msg)) if msg == "Credentials required"
        ));
        assert!(harness.store.entries.borrow().get(USER_KEY).is_none());
    }

    #[test]
    fn upload_is_visible_before_the_listing_catches_up() {
        let harness = harness();
        let session = sign_in(&harness);
        let tracker = UploadTracker::new();

        let files = harness
            .service
            .prepare_upload(PrepareUploadCommand {
                path: "beach.jpg".to_string(),
            })
            .expect("prepare");
        let uploaded = harness
            .service
            .upload_image(
                &session,
                UploadImageCommand {
                    file: files[0].clone(),
                },
                &tracker,
            )
            .expect("upload");
        assert!(matches!(tracker.state(), UploadState::Succeeded(_)));
        assert_eq!(uploaded.size, 4);

        harness
            .host
            .listing
            .borrow_mut()
            .push(record("older", "2024-01-01", "https://host/older.jpg"));
        let merged = harness
            .service
            .refresh_gallery(&session, RefreshGalleryCommand);
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["beach", "older"]);
        assert_eq!(stored_pending(&harness.store), vec!["beach"]);

        harness.host.listing.borrow_mut().push(uploaded.clone());
        let merged = harness
            .service
            .refresh_gallery(&session, RefreshGalleryCommand);
        assert_eq!(merged.len(), 2);
        assert!(stored_pending(&harness.store).is_empty());
    }

    #[test]
    fn failed_upload_leaves_pending_untouched() {
        let harness = harness();
        let session = sign_in(&harness);
        harness.host.upload_fails.set(true);
        let tracker = UploadTracker::new();

        let result = harness.service.upload_image(
            &session,
            UploadImageCommand {
                file: jpeg("beach.jpg"),
            },
            &tracker,
        );

        assert!(matches!(result, Err(ApplicationError::Upload(_))));
        assert!(matches!(tracker.state(), UploadState::Failed(_)));
        assert!(harness
            .store
            .entries
            .borrow()
            .get(PENDING_UPLOADS_KEY)
            .is_none());
    }

    #[test]
    fn listing_failure_degrades_to_pending_only() {
        let harness = harness();
        let session = sign_in(&harness);
        harness
            .store
            .set(
                PENDING_UPLOADS_KEY,
                &serde_json::to_string(&PendingSet::from(vec![record(
                    "a",
                    "2024-01-02",
                    "local",
                )]))
                .expect("json"),
            )
            .expect("seed");
        harness.host.listing_fails.set(true);

        let merged = harness
            .service
            .refresh_gallery(&session, RefreshGalleryCommand);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].url, "local");
        assert_eq!(stored_pending(&harness.store), vec!["a"]);
    }

    #[test]
    fn unreadable_pending_storage_is_ignored() {
        let harness = harness();
        let session = sign_in(&harness);
        harness
            .store
            .set(PENDING_UPLOADS_KEY, "{not json")
            .expect("seed");
        harness
            .host
            .listing
            .borrow_mut()
            .push(record("b", "2024-01-01", "b"));

        let merged = harness
            .service
            .refresh_gallery(&session, RefreshGalleryCommand);

        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn delete_success_updates_view_and_pending() {
        let harness = harness();
        let session = sign_in(&harness);
        harness
            .store
            .set(
                PENDING_UPLOADS_KEY,
                &serde_json::to_string(&PendingSet::from(vec![record(
                    "a",
                    "2024-01-02",
                    "local",
                )]))
                .expect("json"),
            )
            .expect("seed");
        let mut view = GalleryView::new(
            harness
                .service
                .refresh_gallery(&session, RefreshGalleryCommand),
        );

        harness
            .service
            .delete_image(
                &session,
                &mut view,
                DeleteImageCommand {
                    image_id: ImageId::new("a").expect("id"),
                },
            )
            .expect("delete");

        assert!(view.is_empty());
        assert!(stored_pending(&harness.store).is_empty());
        assert_eq!(harness.host.deleted.borrow().len(), 1);
        let note = view.take_notification().expect("notification");
        assert_eq!(note.kind, NotificationKind::Success);
        assert_eq!(note.message, "\"a\" deleted successfully");
    }

    #[test]
    fn failed_delete_restores_previous_view() {
        let harness = harness();
        let session = sign_in(&harness);
        harness
            .store
            .set(
                PENDING_UPLOADS_KEY,
                &serde_json::to_string(&PendingSet::from(vec![record(
                    "a",
                    "2024-01-02",
                    "local",
                )]))
                .expect("json"),
            )
            .expect("seed");
        harness
            .host
            .listing
            .borrow_mut()
            .push(record("b", "2024-01-01", "b"));
        harness.host.delete_fails.set(true);

        let mut view = GalleryView::new(
            harness
                .service
                .refresh_gallery(&session, RefreshGalleryCommand),
        );
        let image_id = ImageId::new("a").expect("id");
        view.select(&image_id);
        let before = view.snapshot();

        let result = harness.service.delete_image(
            &session,
            &mut view,
            DeleteImageCommand {
                image_id: image_id.clone(),
            },
        );

        assert!(matches!(result, Err(ApplicationError::Delete(_))));
        assert_eq!(view.snapshot(), before);
        assert_eq!(stored_pending(&harness.store), vec!["a"]);
        let note = view.notification().expect("notification");
        assert_eq!(note.kind, NotificationKind::Error);
        assert_eq!(note.message, "Failed to delete image");
    }

    #[test]
    fn deleting_unknown_image_is_rejected() {
        let harness = harness();
        let session = sign_in(&harness);
        let mut view = GalleryView::default();

        let result = harness.service.delete_image(
            &session,
            &mut view,
            DeleteImageCommand {
                image_id: ImageId::new("ghost").expect("id"),
            },
        );

        assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
        assert!(harness.host.deleted.borrow().is_empty());
    }

    #[test]
    fn malformed_pending_entry_does_not_drop_its_neighbours() {
        let harness = harness();
        let session = sign_in(&harness);
        harness.store.entries.borrow_mut().insert(
            PENDING_UPLOADS_KEY.to_string(),
            r#"[{"id":"keep","url":"https://host/keep.jpg","name":"keep","uploadedAt":"2024-05-01T00:00:00Z","size":7},{"id":"","url":"x","name":"x"}]"#
                .to_string(),
        );

        let merged = harness
            .service
            .refresh_gallery(&session, RefreshGalleryCommand);
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["keep"]);

        harness
            .service
            .upload_image(
                &session,
                UploadImageCommand {
                    file: jpeg("beach.jpg"),
                },
                &UploadTracker::new(),
            )
            .expect("upload");
        assert_eq!(stored_pending(&harness.store), vec!["beach", "keep"]);
    }
}
