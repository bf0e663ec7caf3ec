//! In-process collaborators
//!
//! Used by the CLI and by tests in place of the REST backend: a workspace
//! that keeps its file list in memory and an auth form that accepts any
//! non-empty credentials.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::info;

use crate::collaborators::{AuthService, CodeRunner, FileCandidates, ProjectService};
use crate::command::FieldKind;
use crate::error::ServiceError;
use crate::resolver::{CandidateFile, FileHandle};
use crate::session::Collaborators;

#[derive(Debug, Default)]
struct WorkspaceState {
    project: Option<String>,
    files: Vec<String>,
    selected: Option<FileHandle>,
}

/// Project and file tree held in memory
///
/// Clones share state, so one handle can serve as both the file supplier
/// and the project service.
#[derive(Debug, Default, Clone)]
pub struct LocalWorkspace {
    state: Arc<Mutex<WorkspaceState>>,
}

impl LocalWorkspace {
    /// Empty workspace with no project open
    pub fn new() -> Self {
        Self::default()
    }

    /// Workspace with an open project containing `files`
    pub fn with_files(project: &str, files: &[&str]) -> Self {
        let workspace = Self::new();
        {
            let mut state = workspace.lock();
            state.project = Some(project.to_owned());
            state.files = files.iter().map(|&f| f.to_owned()).collect();
        }
        workspace
    }

    /// Name of the open project
    pub fn project(&self) -> Option<String> {
        self.lock().project.clone()
    }

    /// Files in the open project, in creation order
    pub fn files(&self) -> Vec<String> {
        self.lock().files.clone()
    }

    /// File currently open in the editor
    pub fn selected(&self) -> Option<FileHandle> {
        self.lock().selected.clone()
    }

    fn lock(&self) -> MutexGuard<'_, WorkspaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileCandidates for LocalWorkspace {
    fn list_file_candidates(&self) -> Vec<CandidateFile> {
        self.lock()
            .files
            .iter()
            .map(|path| {
                let label = path.rsplit('/').next().unwrap_or(path);
                CandidateFile::with_handle(label, path)
            })
            .collect()
    }

    fn current_file(&self) -> Option<FileHandle> {
        self.selected()
    }
}

impl ProjectService for LocalWorkspace {
    fn create_project(&self, name: &str) -> Result<(), ServiceError> {
        let mut state = self.lock();
        state.project = Some(name.to_owned());
        state.files.clear();
        state.selected = None;
        info!(project = name, "project created");
        Ok(())
    }

    fn create_file(&self, relative_path: &str) -> Result<(), ServiceError> {
        let mut state = self.lock();
        if state.project.is_none() {
            return Err(ServiceError::Rejected("no project open".to_owned()));
        }
        if state.files.iter().any(|f| f == relative_path) {
            return Err(ServiceError::Rejected(format!(
                "file already exists: {relative_path}"
            )));
        }
        state.files.push(relative_path.to_owned());
        info!(path = relative_path, "file created");
        Ok(())
    }

    fn open_file(&self, file: &FileHandle) -> Result<(), ServiceError> {
        let mut state = self.lock();
        if !state.files.contains(&file.0) {
            return Err(ServiceError::Rejected(format!("no such file: {file}")));
        }
        state.selected = Some(file.clone());
        info!(path = %file, "file opened");
        Ok(())
    }

    fn save_file(&self, file: &FileHandle) -> Result<(), ServiceError> {
        if !self.lock().files.contains(&file.0) {
            return Err(ServiceError::Rejected(format!("no such file: {file}")));
        }
        info!(path = %file, "file saved");
        Ok(())
    }
}

#[derive(Debug)]
struct AuthState {
    login: String,
    password: String,
    login_mode: bool,
    selected: Option<FieldKind>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            login: String::new(),
            password: String::new(),
            login_mode: true,
            selected: None,
        }
    }
}

/// Authentication form held in memory
///
/// Publishes the authenticated flag on a `watch` channel, the signal a
/// [`SpeechSubscription`](crate::session::SpeechSubscription) forwards to
/// the engine.
#[derive(Debug, Clone)]
pub struct LocalAuth {
    state: Arc<Mutex<AuthState>>,
    status: Arc<watch::Sender<bool>>,
}

impl Default for LocalAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalAuth {
    /// Logged-out form in login mode
    pub fn new() -> Self {
        let (status, _) = watch::channel(false);
        Self {
            state: Arc::default(),
            status: Arc::new(status),
        }
    }

    /// Receiver for the authenticated flag
    pub fn status(&self) -> watch::Receiver<bool> {
        self.status.subscribe()
    }

    /// Login field content
    pub fn login(&self) -> String {
        self.lock().login.clone()
    }

    /// Password field content
    pub fn password(&self) -> String {
        self.lock().password.clone()
    }

    /// Whether the form is in login (not account creation) mode
    pub fn is_login_mode(&self) -> bool {
        self.lock().login_mode
    }

    /// Field last selected by voice
    pub fn selected_field(&self) -> Option<FieldKind> {
        self.lock().selected
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuthService for LocalAuth {
    fn select_field(&mut self, field: FieldKind) {
        self.lock().selected = Some(field);
    }

    fn fill_field(&mut self, field: FieldKind, value: &str) {
        let mut state = self.lock();
        match field {
            FieldKind::Login => state.login = value.to_owned(),
            FieldKind::Password => state.password = value.to_owned(),
        }
        state.selected = None;
    }

    fn set_login_mode(&mut self, login: bool) {
        self.lock().login_mode = login;
    }

    fn submit_login(&mut self) -> Result<(), ServiceError> {
        let state = self.lock();
        if state.login.is_empty() || state.password.is_empty() {
            return Err(ServiceError::Rejected("login and password are required".to_owned()));
        }
        if !state.login_mode && !state.login.contains('.') {
            return Err(ServiceError::Rejected(
                "the login must contain a dot, like 'john.doe'".to_owned(),
            ));
        }
        drop(state);

        info!("authenticated");
        self.status.send_replace(true);
        Ok(())
    }

    fn log_out(&mut self) -> Result<(), ServiceError> {
        info!("logged out");
        self.status.send_replace(false);
        Ok(())
    }
}

/// Code runner that only records the request
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingRunner;

impl CodeRunner for LoggingRunner {
    fn run(&self) -> Result<(), ServiceError> {
        info!("run requested");
        Ok(())
    }
}

/// Dispatcher collaborators backed by a local workspace and auth form
pub fn collaborators(workspace: &LocalWorkspace, auth: &LocalAuth) -> Collaborators {
    Collaborators {
        files: Box::new(workspace.clone()),
        projects: Box::new(workspace.clone()),
        auth: Box::new(auth.clone()),
        runner: Box::new(LoggingRunner),
    }
}
