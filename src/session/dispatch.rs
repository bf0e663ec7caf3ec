use tracing::debug;

use crate::collaborators::{AuthService, CodeRunner, EditingSurface, FileCandidates, ProjectService};
use crate::command::Command;
use crate::dictation::EditOperation;
use crate::resolver::{self, DEFAULT_THRESHOLD};

use super::machine::Outcome;
use super::worker::{Call, ServiceWorker};

/// Non-editor collaborators a [`Dispatcher`] drives
pub struct Collaborators {
    /// File tree snapshot supplier
    pub files: Box<dyn FileCandidates>,
    /// Project/file REST service
    pub projects: Box<dyn ProjectService>,
    /// Authentication form and session
    pub auth: Box<dyn AuthService>,
    /// Code runner
    pub runner: Box<dyn CodeRunner>,
}

/// Carries engine outcomes out to the collaborators
///
/// Edits and file tree lookups happen inline. Project, auth and run calls
/// are queued to a background worker in the order they were dispatched and
/// never block the caller; their failures are logged and dropped, and the
/// engine's mode never depends on them.
pub struct Dispatcher<S> {
    surface: S,
    files: Box<dyn FileCandidates>,
    worker: ServiceWorker,
    threshold: f64,
}

impl<S: EditingSurface> Dispatcher<S> {
    /// Dispatcher using the default file-match threshold
    pub fn new(surface: S, collaborators: Collaborators) -> Self {
        Self::with_threshold(surface, collaborators, DEFAULT_THRESHOLD)
    }

    /// Dispatcher with a custom file-match threshold
    pub fn with_threshold(surface: S, collaborators: Collaborators, threshold: f64) -> Self {
        let Collaborators {
            files,
            projects,
            auth,
            runner,
        } = collaborators;
        Self {
            surface,
            files,
            worker: ServiceWorker::spawn(projects, auth, runner),
            threshold,
        }
    }

    /// The editing surface
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Block until every collaborator call dispatched so far has completed
    pub fn wait_idle(&self) {
        self.worker.wait_idle();
    }

    /// Carry out one outcome
    pub fn dispatch(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Edit(op) => self.apply_edit(op),
            Outcome::Command(command) => self.run_command(command),
            Outcome::Ignored => {}
        }
    }

    fn apply_edit(&mut self, op: &EditOperation) {
        let at = self.surface.cursor();
        self.surface.apply_edit(at, op);
        self.surface.focus();
    }

    fn run_command(&self, command: &Command) {
        let call = match command {
            Command::SelectField(field) => Call::SelectField(*field),
            Command::FillField(field, value) => Call::FillField(*field, value.clone()),
            Command::SwitchAuthMode(login) => Call::SetLoginMode(*login),
            Command::SubmitAuthForm => Call::SubmitLogin,
            Command::CreateProject(name) => Call::CreateProject(name.clone()),
            Command::CreateFile(path) => Call::CreateFile(path.clone()),
            Command::RunCode => Call::Run,
            Command::OpenFile(query) => {
                let candidates = self.files.list_file_candidates();
                match resolver::resolve_file_with_threshold(query, &candidates, self.threshold) {
                    Some(file) => Call::OpenFile(file.handle.clone()),
                    None => {
                        debug!(query = %query, "open dropped, no matching file");
                        return;
                    }
                }
            }
            Command::SaveCurrentFile => match self.files.current_file() {
                Some(file) => Call::SaveFile(file),
                None => {
                    debug!("save dropped, no file selected");
                    return;
                }
            },
            Command::LogOut => Call::LogOut,
            Command::EnterEdit | Command::ExitEdit | Command::Unrecognized => return,
        };
        self.worker.submit(call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{
        MockAuthService, MockCodeRunner, MockEditingSurface, MockFileCandidates,
        MockProjectService, Position,
    };
    use crate::command::FieldKind;
    use crate::error::ServiceError;
    use crate::resolver::{CandidateFile, FileHandle};
    use mockall::predicate::eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    struct Mocks {
        files: MockFileCandidates,
        projects: MockProjectService,
        auth: MockAuthService,
        runner: MockCodeRunner,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                files: MockFileCandidates::new(),
                projects: MockProjectService::new(),
                auth: MockAuthService::new(),
                runner: MockCodeRunner::new(),
            }
        }

        fn into_dispatcher(self) -> Dispatcher<MockEditingSurface> {
            Dispatcher::new(
                MockEditingSurface::new(),
                Collaborators {
                    files: Box::new(self.files),
                    projects: Box::new(self.projects),
                    auth: Box::new(self.auth),
                    runner: Box::new(self.runner),
                },
            )
        }
    }

    #[test]
    fn test_edit_applied_at_cursor_then_focused() {
        let mut surface = MockEditingSurface::new();
        let mut seq = mockall::Sequence::new();
        surface
            .expect_cursor()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(Position::new(3, 7));
        surface
            .expect_apply_edit()
            .with(eq(Position::new(3, 7)), eq(EditOperation::DeleteWord))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        surface
            .expect_focus()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mocks = Mocks::new();
        let mut dispatcher = Dispatcher::new(
            surface,
            Collaborators {
                files: Box::new(mocks.files),
                projects: Box::new(mocks.projects),
                auth: Box::new(mocks.auth),
                runner: Box::new(mocks.runner),
            },
        );
        dispatcher.dispatch(&Outcome::Edit(EditOperation::DeleteWord));
    }

    #[test]
    fn test_create_project() {
        let mut mocks = Mocks::new();
        mocks
            .projects
            .expect_create_project()
            .with(eq("Demo"))
            .times(1)
            .returning(|_| Ok(()));

        let mut dispatcher = mocks.into_dispatcher();
        dispatcher.dispatch(&Outcome::Command(Command::CreateProject("Demo".to_owned())));
    }

    #[test]
    fn test_collaborator_failure_is_swallowed() {
        let mut mocks = Mocks::new();
        mocks
            .projects
            .expect_create_file()
            .with(eq("main.py"))
            .times(1)
            .returning(|_| Err(ServiceError::Network("refused".to_owned())));

        let mut dispatcher = mocks.into_dispatcher();
        dispatcher.dispatch(&Outcome::Command(Command::CreateFile("main.py".to_owned())));
    }

    #[test]
    fn test_open_file_resolves_candidate() {
        let mut mocks = Mocks::new();
        mocks.files.expect_list_file_candidates().returning(|| {
            vec![
                CandidateFile::with_handle("main.py", "src/main.py"),
                CandidateFile::with_handle("utils.py", "src/utils.py"),
                CandidateFile::with_handle("README.md", "README.md"),
            ]
        });
        mocks
            .projects
            .expect_open_file()
            .with(eq(FileHandle("src/main.py".to_owned())))
            .times(1)
            .returning(|_| Ok(()));

        let mut dispatcher = mocks.into_dispatcher();
        dispatcher.dispatch(&Outcome::Command(Command::OpenFile("mainpy".to_owned())));
    }

    #[test]
    fn test_open_file_below_threshold_dropped() {
        let mut mocks = Mocks::new();
        mocks
            .files
            .expect_list_file_candidates()
            .returning(|| vec![CandidateFile::new("README.md")]);
        mocks.projects.expect_open_file().never();

        let mut dispatcher = mocks.into_dispatcher();
        dispatcher.dispatch(&Outcome::Command(Command::OpenFile("xyz".to_owned())));
    }

    #[test]
    fn test_save_uses_current_file() {
        let mut mocks = Mocks::new();
        mocks
            .files
            .expect_current_file()
            .returning(|| Some(FileHandle("src/app.py".to_owned())));
        mocks
            .projects
            .expect_save_file()
            .with(eq(FileHandle("src/app.py".to_owned())))
            .times(1)
            .returning(|_| Ok(()));

        let mut dispatcher = mocks.into_dispatcher();
        dispatcher.dispatch(&Outcome::Command(Command::SaveCurrentFile));
    }

    #[test]
    fn test_save_without_selection_is_noop() {
        let mut mocks = Mocks::new();
        mocks.files.expect_current_file().returning(|| None);
        mocks.projects.expect_save_file().never();

        let mut dispatcher = mocks.into_dispatcher();
        dispatcher.dispatch(&Outcome::Command(Command::SaveCurrentFile));
    }

    #[test]
    fn test_auth_commands() {
        let mut mocks = Mocks::new();
        mocks
            .auth
            .expect_select_field()
            .with(eq(FieldKind::Login))
            .times(1)
            .return_const(());
        mocks
            .auth
            .expect_fill_field()
            .with(eq(FieldKind::Login), eq("john.doe"))
            .times(1)
            .return_const(());
        mocks
            .auth
            .expect_set_login_mode()
            .with(eq(false))
            .times(1)
            .return_const(());
        mocks
            .auth
            .expect_submit_login()
            .times(1)
            .returning(|| Err(ServiceError::Unauthorized));
        mocks.auth.expect_log_out().times(1).returning(|| Ok(()));

        let mut dispatcher = mocks.into_dispatcher();
        for command in [
            Command::SelectField(FieldKind::Login),
            Command::FillField(FieldKind::Login, "john.doe".to_owned()),
            Command::SwitchAuthMode(false),
            Command::SubmitAuthForm,
            Command::LogOut,
        ] {
            dispatcher.dispatch(&Outcome::Command(command));
        }
    }

    #[test]
    fn test_run_code() {
        let mut mocks = Mocks::new();
        mocks.runner.expect_run().times(1).returning(|| Ok(()));

        let mut dispatcher = mocks.into_dispatcher();
        dispatcher.dispatch(&Outcome::Command(Command::RunCode));
    }

    #[test]
    fn test_mode_commands_touch_no_collaborator() {
        // mocks without expectations panic on any call
        let mut dispatcher = Mocks::new().into_dispatcher();
        dispatcher.dispatch(&Outcome::Command(Command::EnterEdit));
        dispatcher.dispatch(&Outcome::Command(Command::ExitEdit));
        dispatcher.dispatch(&Outcome::Command(Command::Unrecognized));
        dispatcher.dispatch(&Outcome::Ignored);
    }

    #[test]
    fn test_calls_run_in_dispatch_order() {
        let mut mocks = Mocks::new();
        let mut seq = mockall::Sequence::new();
        mocks
            .projects
            .expect_create_project()
            .with(eq("Demo"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mocks
            .projects
            .expect_create_file()
            .with(eq("main.py"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut dispatcher = mocks.into_dispatcher();
        dispatcher.dispatch(&Outcome::Command(Command::CreateProject("Demo".to_owned())));
        dispatcher.dispatch(&Outcome::Command(Command::CreateFile("main.py".to_owned())));
    }

    struct SlowProjects {
        created: Arc<AtomicBool>,
    }

    impl ProjectService for SlowProjects {
        fn create_project(&self, _name: &str) -> Result<(), ServiceError> {
            thread::sleep(Duration::from_millis(500));
            self.created.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn create_file(&self, _relative_path: &str) -> Result<(), ServiceError> {
            Ok(())
        }

        fn open_file(&self, _file: &FileHandle) -> Result<(), ServiceError> {
            Ok(())
        }

        fn save_file(&self, _file: &FileHandle) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    #[test]
    fn test_slow_service_does_not_block_dispatch() {
        let created = Arc::new(AtomicBool::new(false));
        let mocks = Mocks::new();
        let mut dispatcher = Dispatcher::new(
            MockEditingSurface::new(),
            Collaborators {
                files: Box::new(mocks.files),
                projects: Box::new(SlowProjects {
                    created: Arc::clone(&created),
                }),
                auth: Box::new(mocks.auth),
                runner: Box::new(mocks.runner),
            },
        );

        let started = Instant::now();
        dispatcher.dispatch(&Outcome::Command(Command::CreateProject("Demo".to_owned())));
        assert!(started.elapsed() < Duration::from_millis(100));
        assert!(!created.load(Ordering::SeqCst));

        dispatcher.wait_idle();
        assert!(created.load(Ordering::SeqCst));
    }
}
