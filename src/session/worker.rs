use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::collaborators::{AuthService, CodeRunner, ProjectService};
use crate::command::FieldKind;
use crate::error::ServiceError;
use crate::resolver::FileHandle;

/// One queued collaborator call
#[derive(Debug)]
pub(super) enum Call {
    CreateProject(String),
    CreateFile(String),
    OpenFile(FileHandle),
    SaveFile(FileHandle),
    SelectField(FieldKind),
    FillField(FieldKind, String),
    SetLoginMode(bool),
    SubmitLogin,
    LogOut,
    Run,
    Flush(mpsc::Sender<()>),
}

struct Services {
    projects: Box<dyn ProjectService>,
    auth: Box<dyn AuthService>,
    runner: Box<dyn CodeRunner>,
}

impl Services {
    fn handle(&mut self, call: Call) {
        match call {
            Call::CreateProject(name) => {
                report("create project", self.projects.create_project(&name));
            }
            Call::CreateFile(path) => report("create file", self.projects.create_file(&path)),
            Call::OpenFile(file) => report("open file", self.projects.open_file(&file)),
            Call::SaveFile(file) => report("save file", self.projects.save_file(&file)),
            Call::SelectField(field) => self.auth.select_field(field),
            Call::FillField(field, value) => self.auth.fill_field(field, &value),
            Call::SetLoginMode(login) => self.auth.set_login_mode(login),
            Call::SubmitLogin => report("submit login", self.auth.submit_login()),
            Call::LogOut => report("log out", self.auth.log_out()),
            Call::Run => report("run code", self.runner.run()),
            Call::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

/// Runs collaborator calls on a dedicated thread, in submission order
///
/// Submitting never waits for the call to complete. Dropping the worker
/// lets queued calls drain, then joins the thread.
pub(super) struct ServiceWorker {
    tx: Option<mpsc::Sender<Call>>,
    handle: Option<JoinHandle<()>>,
}

impl ServiceWorker {
    pub(super) fn spawn(
        projects: Box<dyn ProjectService>,
        auth: Box<dyn AuthService>,
        runner: Box<dyn CodeRunner>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<Call>();
        let mut services = Services {
            projects,
            auth,
            runner,
        };

        let spawned = thread::Builder::new()
            .name("voice-ide-services".to_owned())
            .spawn(move || {
                while let Ok(call) = rx.recv() {
                    services.handle(call);
                }
                debug!("service worker stopped");
            });

        match spawned {
            Ok(handle) => Self {
                tx: Some(tx),
                handle: Some(handle),
            },
            Err(e) => {
                warn!(error = %e, "failed to start service worker, collaborator calls disabled");
                Self {
                    tx: None,
                    handle: None,
                }
            }
        }
    }

    /// Queue a call
    pub(super) fn submit(&self, call: Call) {
        let Some(tx) = &self.tx else {
            warn!(?call, "service worker unavailable, call dropped");
            return;
        };
        if let Err(mpsc::SendError(call)) = tx.send(call) {
            warn!(?call, "service worker stopped, call dropped");
        }
    }

    /// Block until every call queued so far has run
    pub(super) fn wait_idle(&self) {
        let (done_tx, done_rx) = mpsc::channel();
        self.submit(Call::Flush(done_tx));
        let _ = done_rx.recv();
    }
}

impl Drop for ServiceWorker {
    fn drop(&mut self) {
        drop(self.tx.take());
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Err(panic) = handle.join() {
            if thread::panicking() {
                warn!("service worker panicked");
            } else {
                std::panic::resume_unwind(panic);
            }
        }
    }
}

fn report(action: &str, result: Result<(), ServiceError>) {
    match result {
        Ok(()) => info!(action, "dispatched"),
        Err(e) => warn!(action, error = %e, "collaborator failed"),
    }
}
