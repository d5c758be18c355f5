use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::NutritionApi;
use crate::error::ApiError;
use crate::models::User;

/// Remembers the selected user id between runs.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Option<Uuid> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        raw.trim().parse().ok()
    }

    pub fn save(&self, id: Uuid) {
        if let Err(e) = std::fs::write(&self.path, id.to_string()) {
            warn!(error = %e, path = %self.path.display(), "could not persist selected user");
        }
    }

    pub fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, path = %self.path.display(), "could not clear selected user"),
        }
    }
}

/// The user list and the per-session selected user.
pub struct UserSession {
    api: Arc<dyn NutritionApi>,
    store: SelectionStore,
    users: Vec<User>,
    selected: Option<Uuid>,
}

impl UserSession {
    pub fn new(api: Arc<dyn NutritionApi>, store: SelectionStore) -> Self {
        let selected = store.load();
        Self {
            api,
            store,
            users: Vec::new(),
            selected,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn selected_user(&self) -> Option<&User> {
        let id = self.selected?;
        self.users.iter().find(|u| u.id == id)
    }

    /// Install a fresh user list. A remembered selection survives only if it
    /// is still listed; otherwise the first user is selected.
    pub fn apply_users(&mut self, users: Vec<User>) {
        self.users = users;
        let still_valid = self
            .selected
            .is_some_and(|id| self.users.iter().any(|u| u.id == id));
        if still_valid {
            return;
        }
        self.selected = self.users.first().map(|u| u.id);
        match self.selected {
            Some(id) => {
                debug!(user_id = %id, "defaulting to first user");
                self.store.save(id);
            }
            None => self.store.clear(),
        }
    }

    pub fn select_user(&mut self, id: Uuid) {
        self.selected = Some(id);
        self.store.save(id);
    }

    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let users = self.api.list_users().await?;
        self.apply_users(users);
        Ok(())
    }

    /// Create a user and reload the list. A blank name does nothing.
    pub async fn create_user(&mut self, name: &str) -> Result<Option<User>, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let user = self.api.create_user(name).await?;
        info!(user_id = %user.id, "user created");
        self.refresh().await?;
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;

    fn temp_store() -> SelectionStore {
        SelectionStore::new(std::env::temp_dir().join(format!("brotein-user-{}", Uuid::new_v4())))
    }

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: None,
        }
    }

    #[test]
    fn first_user_is_selected_and_persisted() {
        let store = temp_store();
        let mut session = UserSession::new(Arc::new(FakeApi::new()), store.clone());
        let (a, b) = (user("Ana"), user("Ben"));
        session.apply_users(vec![a.clone(), b.clone()]);
        assert_eq!(session.selected_user(), Some(&a));
        assert_eq!(store.load(), Some(a.id));

        session.select_user(b.id);
        assert_eq!(store.load(), Some(b.id));

        // A new session restores the stored choice.
        let mut restored = UserSession::new(Arc::new(FakeApi::new()), store.clone());
        restored.apply_users(vec![a, b.clone()]);
        assert_eq!(restored.selected_user(), Some(&b));
        store.clear();
    }

    #[test]
    fn stale_selection_falls_back_and_empty_list_clears() {
        let store = temp_store();
        store.save(Uuid::new_v4());
        let mut session = UserSession::new(Arc::new(FakeApi::new()), store.clone());

        let c = user("Cai");
        session.apply_users(vec![c.clone()]);
        assert_eq!(session.selected_user(), Some(&c));

        session.apply_users(vec![]);
        assert!(session.selected_user().is_none());
        assert_eq!(store.load(), None);
    }

    #[tokio::test]
    async fn create_user_refreshes_list() {
        let api = Arc::new(FakeApi::new());
        let store = temp_store();
        let mut session = UserSession::new(api.clone(), store.clone());

        assert!(session.create_user("   ").await.unwrap().is_none());
        assert!(api.calls().is_empty());

        let created = session.create_user(" Dee ").await.unwrap().unwrap();
        assert_eq!(created.name, "Dee");
        assert_eq!(api.calls(), vec!["create_user:Dee", "list_users"]);
        assert_eq!(session.selected_user(), Some(&created));
        store.clear();
    }
}
